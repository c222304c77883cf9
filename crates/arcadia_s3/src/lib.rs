use arcadia_core::prelude::*;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::{debug, error, instrument};

/// S3-compatible stores generally ignore the region, but the SDK requires one.
const DEFAULT_REGION: &str = "us-east-1";

#[derive(Clone)]
pub struct S3CoverStorage {
    client: Client,
    bucket: String,
    /// Account segment of public URLs (the access key id).
    account: String,
    cdn_origin: String,
    prefix: String,
}

impl S3CoverStorage {
    pub fn new(client: Client, account: String, covers: &CoverConfig) -> Self {
        Self {
            client,
            bucket: covers.bucket.clone(),
            account,
            cdn_origin: covers.cdn_origin.clone(),
            prefix: covers.key_prefix.clone(),
        }
    }

    /// Builds a client with static credentials against the configured endpoint.
    pub fn from_config(config: &CatalogConfig) -> Self {
        let credentials = Credentials::new(
            &config.storage_access_key,
            &config.storage_secret_key,
            None,
            None,
            "arcadia",
        );
        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(Region::new(DEFAULT_REGION))
            .endpoint_url(&config.covers.storage_endpoint)
            .force_path_style(true)
            .build();

        Self::new(
            Client::from_conf(s3_config),
            config.storage_access_key.clone(),
            &config.covers,
        )
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

impl CoverStorage for S3CoverStorage {
    #[instrument(skip(self, data), fields(bucket = %self.bucket, size = data.len()))]
    async fn put_object(&self, key: &str, data: Bytes, content_type: &str) -> Result<(), StorageError> {
        debug!("Uploading cover to S3...");
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to upload cover: {e:?}");
                StorageError::Generic(format!("S3 Upload Error: {e:?}"))
            })?;

        debug!("Upload successful");
        Ok(())
    }

    #[instrument(skip(self), fields(bucket = %self.bucket))]
    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        debug!("Deleting cover from S3...");
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to delete cover: {:?}", e);
                StorageError::Generic(format!("S3 Delete Error: {:?}", e))
            })?;

        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        cdn_url(&self.cdn_origin, &self.account, &self.bucket, key)
    }

    fn cover_prefix(&self) -> &str {
        &self.prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn public_urls_point_at_the_cdn() {
        let config = CatalogConfig::new("postgres://localhost/games", "AKID", "secret");
        let storage = S3CoverStorage::from_config(&config);

        assert_eq!(storage.bucket(), "files");
        assert_eq!(storage.cover_prefix(), "games/covers");
        assert_eq!(
            storage.public_url("games/covers/abc.png"),
            "https://cdn.poehali.dev/projects/AKID/files/games/covers/abc.png"
        );
    }

    #[tokio::test]
    async fn custom_cover_settings_are_used() {
        let covers = CoverConfig {
            bucket: "media".into(),
            cdn_origin: "https://cdn.example.com".into(),
            key_prefix: "covers".into(),
            ..Default::default()
        };
        let config = CatalogConfig::new("postgres://localhost/games", "ACC", "secret")
            .with_covers(covers);
        let storage = S3CoverStorage::from_config(&config);

        assert_eq!(storage.cover_prefix(), "covers");
        assert_eq!(
            storage.public_url("covers/x.jpg"),
            "https://cdn.example.com/projects/ACC/media/covers/x.jpg"
        );
    }
}
