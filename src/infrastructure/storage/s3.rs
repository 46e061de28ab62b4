use super::{content_type_for, StorageError, StorageResult, VideoStorage};
use crate::config::settings::{AppConfig, StorageBackend};
use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Builder, Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Grant, ObjectCannedAcl, Permission};
use aws_sdk_s3::Client;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

const ALL_USERS_GROUP_URI: &str = "http://acs.amazonaws.com/groups/global/AllUsers";

/// S3-compatible backend (AWS S3, MinIO, GCS XML interop).
#[derive(Clone)]
pub struct S3VideoStorage {
    client: Client,
    raw_bucket: String,
    processed_bucket: String,
    public_read: bool,
}

impl S3VideoStorage {
    pub async fn new(config: &AppConfig) -> StorageResult<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.s3_region.clone()));

        if let Some(endpoint) = &config.s3_endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        match (&config.access_key, &config.secret_key) {
            (Some(access_key), Some(secret_key)) => {
                let credentials = Credentials::new(access_key, secret_key, None, None, "static");
                loader = loader.credentials_provider(credentials);
            }
            (None, None) => {}
            _ => {
                return Err(StorageError::Config(
                    "AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY must be set together".to_string(),
                ));
            }
        }

        let shared = loader.load().await;

        // Custom endpoints (MinIO and friends) need path-style addressing.
        let s3_config = Builder::from(&shared)
            .force_path_style(config.s3_endpoint.is_some())
            .build();

        info!(
            raw_bucket = %config.raw_video_bucket,
            processed_bucket = %config.processed_video_bucket,
            "✅ S3 client configured"
        );

        Ok(Self {
            client: Client::from_conf(s3_config),
            raw_bucket: config.raw_video_bucket.clone(),
            processed_bucket: config.processed_video_bucket.clone(),
            public_read: config.processed_public_read,
        })
    }
}

/// True when anonymous users (the AllUsers group) may read the object.
fn grants_public_read(grants: &[Grant]) -> bool {
    grants.iter().any(|grant| {
        let readable = matches!(
            grant.permission(),
            Some(Permission::Read) | Some(Permission::FullControl)
        );
        let everyone = grant.grantee().and_then(|g| g.uri()) == Some(ALL_USERS_GROUP_URI);
        readable && everyone
    })
}

#[async_trait]
impl VideoStorage for S3VideoStorage {
    async fn download_raw(&self, file_name: &str, destination: &Path) -> StorageResult<()> {
        let object = self
            .client
            .get_object()
            .bucket(&self.raw_bucket)
            .key(file_name)
            .send()
            .await
            .map_err(|e| {
                let missing = e
                    .as_service_error()
                    .map(|err| err.is_no_such_key())
                    .unwrap_or(false);
                if missing {
                    StorageError::NotFound(format!("s3://{}/{}", self.raw_bucket, file_name))
                } else {
                    StorageError::DownloadFailed(DisplayErrorContext(&e).to_string())
                }
            })?;

        let mut body = object.body.into_async_read();
        let mut file = tokio::fs::File::create(destination).await?;
        let bytes = tokio::io::copy(&mut body, &mut file)
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;
        file.flush().await?;

        info!(
            "⬇️ s3://{}/{} downloaded to {} ({} bytes)",
            self.raw_bucket,
            file_name,
            destination.display(),
            bytes
        );
        Ok(())
    }

    async fn upload_processed(&self, source: &Path, file_name: &str) -> StorageResult<()> {
        let body = ByteStream::from_path(source)
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        self.client
            .put_object()
            .bucket(&self.processed_bucket)
            .key(file_name)
            .content_type(content_type_for(file_name))
            .body(body)
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed(DisplayErrorContext(&e).to_string()))?;

        info!(
            "⬆️ {} uploaded to s3://{}/{}",
            source.display(),
            self.processed_bucket,
            file_name
        );

        if self.public_read {
            self.client
                .put_object_acl()
                .bucket(&self.processed_bucket)
                .key(file_name)
                .acl(ObjectCannedAcl::PublicRead)
                .send()
                .await
                .map_err(|e| {
                    StorageError::UploadFailed(format!(
                        "could not make object public: {}",
                        DisplayErrorContext(&e)
                    ))
                })?;

            // Some S3-compatible stores accept the ACL call but ignore it.
            match self.is_public(file_name).await {
                Ok(true) => info!("🌍 s3://{}/{} is now public", self.processed_bucket, file_name),
                Ok(false) => warn!(
                    "s3://{}/{} accepted public-read but its ACL has no public grant",
                    self.processed_bucket, file_name
                ),
                Err(e) => warn!(
                    "Could not confirm public-read on s3://{}/{}: {}",
                    self.processed_bucket, file_name, e
                ),
            }
        }

        Ok(())
    }

    async fn is_public(&self, file_name: &str) -> StorageResult<bool> {
        let acl = self
            .client
            .get_object_acl()
            .bucket(&self.processed_bucket)
            .key(file_name)
            .send()
            .await
            .map_err(|e| StorageError::DownloadFailed(DisplayErrorContext(&e).to_string()))?;

        Ok(grants_public_read(acl.grants()))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::types::{Grantee, Type};

    fn grant(grantee: Grantee, permission: Permission) -> Grant {
        Grant::builder().grantee(grantee).permission(permission).build()
    }

    fn all_users() -> Grantee {
        Grantee::builder()
            .r#type(Type::Group)
            .uri(ALL_USERS_GROUP_URI)
            .build()
            .unwrap()
    }

    fn owner() -> Grantee {
        Grantee::builder()
            .r#type(Type::CanonicalUser)
            .id("owner-canonical-id")
            .build()
            .unwrap()
    }

    #[test]
    fn all_users_read_grant_is_public() {
        assert!(grants_public_read(&[
            grant(owner(), Permission::FullControl),
            grant(all_users(), Permission::Read),
        ]));
    }

    #[test]
    fn owner_only_acl_is_private() {
        assert!(!grants_public_read(&[grant(owner(), Permission::FullControl)]));
        assert!(!grants_public_read(&[]));
    }

    #[test]
    fn all_users_write_grant_is_not_read_access() {
        assert!(!grants_public_read(&[grant(all_users(), Permission::Write)]));
    }
}
