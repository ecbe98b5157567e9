// backuptool/src/backup/s3_upload.rs
use aws_sdk_s3 as s3;
use s3::config::Region;
use s3::error::DisplayErrorContext;
use s3::primitives::ByteStream;
use std::path::Path;

use crate::config::SpacesConfig;
use crate::errors::{BackupError, Result};

async fn build_client(spaces: &SpacesConfig) -> s3::Client {
    let mut loader = aws_config::defaults(s3::config::BehaviorVersion::latest())
        .region(Region::new(spaces.region.clone()))
        .credentials_provider(s3::config::Credentials::new(
            &spaces.access_key_id,
            &spaces.secret_access_key,
            None,     // session_token
            None,     // expiry
            "Static", // provider_name
        ));

    if let Some(endpoint_url) = &spaces.endpoint_url {
        println!("✅ Using custom object storage endpoint: {}", endpoint_url);
        loader = loader.endpoint_url(endpoint_url);
    }

    let sdk_config = loader.load().await;
    let mut builder = s3::config::Builder::from(&sdk_config);
    if spaces.force_path_style {
        builder = builder.force_path_style(true);
    }

    s3::Client::from_conf(builder.build())
}

/// Streams a local file to the configured bucket under `s3_key`.
///
/// The body is a `ByteStream` over the file, so archives larger than memory
/// upload fine. `content_md5` is attached when integrity mode is on; buckets
/// with object lock reject uploads without it. Transport and auth failures
/// are wrapped verbatim into `UploadTransport`, never reinterpreted, and no
/// compensating delete of a partial remote object is attempted here.
pub async fn upload_file_to_spaces(
    spaces: &SpacesConfig,
    file_path: &Path,
    s3_key: &str,
    content_md5: Option<String>,
) -> Result<()> {
    println!(
        "👉 Uploading {} to bucket {} with key {}",
        file_path.display(),
        spaces.bucket_name,
        s3_key
    );

    let client = build_client(spaces).await;

    let body = ByteStream::from_path(file_path).await.map_err(|e| {
        BackupError::UploadTransport(format!(
            "failed to open {} for streaming: {}",
            file_path.display(),
            e
        ))
    })?;

    let mut request = client
        .put_object()
        .bucket(&spaces.bucket_name)
        .key(s3_key)
        .body(body);

    if let Some(md5) = content_md5 {
        request = request.content_md5(md5);
    }

    request.send().await.map_err(|e| {
        BackupError::UploadTransport(format!(
            "failed to upload {} to bucket {} with key {}: {}",
            file_path.display(),
            spaces.bucket_name,
            s3_key,
            DisplayErrorContext(e)
        ))
    })?;

    println!(
        "✅ Uploaded backup to bucket {} with key {}",
        spaces.bucket_name, s3_key
    );
    Ok(())
}
