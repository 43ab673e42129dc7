use crate::config::StorageConfig;
use crate::storage::error::StorageError;
use crate::storage::object_store::ObjectStore;
use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{config::Region, Client};
use bytes::Bytes;
use tracing::{debug, info};

/// S3-compatible implementation of the ObjectStore trait
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
    region: String,
    public_base_url: Option<String>,
}

impl S3ObjectStore {
    /// Create a new S3ObjectStore instance from configuration
    pub async fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        let config_loader = aws_config::from_env().region(Region::new(config.region.clone()));

        // If access key and secret are provided, use them for credentials
        let aws_config = if let (Some(access_key), Some(secret_key)) =
            (&config.access_key_id, &config.secret_access_key)
        {
            let credentials = Credentials::new(
                access_key,
                secret_key,
                None,
                None,
                "StaticCredentialsProvider",
            );

            config_loader.credentials_provider(credentials).load().await
        } else {
            config_loader.load().await
        };

        // Create S3 client with endpoint override if provided
        let mut client_builder = aws_sdk_s3::config::Builder::from(&aws_config);
        if let Some(endpoint) = &config.endpoint {
            client_builder = client_builder.endpoint_url(endpoint);
        }

        let s3_config = client_builder.build();
        let client = Client::from_conf(s3_config);

        info!("Connected to storage in region {}", config.region);

        Ok(Self {
            client,
            bucket: config.bucket.clone(),
            region: config.region.clone(),
            public_base_url: config.public_base_url.clone(),
        })
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        debug!("Uploading object to bucket {}: {}", self.bucket, key);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .cache_control("max-age=3600")
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| StorageError::Write(key.to_string(), e.to_string()))?;

        debug!("Successfully uploaded object: {}", key);
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        debug!("Deleting object from bucket {}: {}", self.bucket, key);

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| match e {
                _ if e.to_string().contains("NoSuchKey") => {
                    StorageError::NotFound(key.to_string())
                }
                _ => StorageError::Delete(key.to_string(), e.to_string()),
            })?;

        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        match &self.public_base_url {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), key),
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            ),
        }
    }
}
