use anyhow::{Context, anyhow};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::operation::create_bucket::CreateBucketError;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::operation::head_bucket::HeadBucketError;
use aws_sdk_s3::operation::head_object::HeadObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{Client, error::SdkError};

use super::core::{content_hash, key_path, normalize_prefix};
use crate::application::ports::storage_port::{StoragePort, StoredBlob};
use crate::bootstrap::config::Config;

pub struct S3StoragePort {
    client: Client,
    bucket: String,
    root_prefix: String,
}

impl S3StoragePort {
    pub async fn new(cfg: &Config) -> anyhow::Result<Self> {
        let bucket = cfg
            .s3_bucket
            .clone()
            .context("S3_BUCKET must be set when STORAGE_BACKEND=s3")?;

        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &cfg.s3_region {
            loader = loader.region(Region::new(region.clone()));
        }
        let shared_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared_config);
        if let (Some(access), Some(secret)) = (&cfg.s3_access_key, &cfg.s3_secret_key) {
            let creds = Credentials::new(access.clone(), secret.clone(), None, None, "ngo-s3-static");
            builder = builder.credentials_provider(creds);
        }
        if let Some(endpoint) = &cfg.s3_endpoint {
            builder = builder.endpoint_url(endpoint.clone());
        }
        if cfg.s3_use_path_style {
            builder = builder.force_path_style(true);
        }
        let client = Client::from_conf(builder.build());

        ensure_bucket(&client, &bucket).await?;
        tracing::info!(bucket = %bucket, "s3_storage_ready");

        Ok(Self {
            client,
            bucket,
            root_prefix: normalize_prefix(&cfg.storage_root),
        })
    }

    fn object_key(&self, key: &str) -> anyhow::Result<String> {
        let rel = key_path(key)?.to_string_lossy().replace('\\', "/");
        Ok(if self.root_prefix.is_empty() {
            rel
        } else {
            format!("{}/{}", self.root_prefix, rel)
        })
    }
}

#[async_trait]
impl StoragePort for S3StoragePort {
    async fn put(
        &self,
        key: &str,
        bytes: &[u8],
        content_type: Option<&str>,
    ) -> anyhow::Result<StoredBlob> {
        let object_key = self.object_key(key)?;
        let mut req = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .body(ByteStream::from(bytes.to_vec()));
        if let Some(ct) = content_type {
            req = req.content_type(ct);
        }
        req.send()
            .await
            .with_context(|| format!("failed to upload {object_key}"))?;
        Ok(StoredBlob {
            key: key.to_string(),
            size: bytes.len() as i64,
            content_hash: content_hash(bytes),
        })
    }

    async fn get(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        let object_key = self.object_key(key)?;
        let resp = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(SdkError::ServiceError(service_err)) => {
                return match service_err.err() {
                    GetObjectError::NoSuchKey(_) => Err(anyhow!("blob {key} not found")),
                    other => Err(anyhow!("get_object error for {}: {}", object_key, other)),
                };
            }
            Err(err) => return Err(anyhow!("get_object failed for {}: {}", object_key, err)),
        };
        let data = resp
            .body
            .collect()
            .await
            .with_context(|| format!("failed to read body of {object_key}"))?;
        Ok(data.into_bytes().to_vec())
    }

    async fn delete(&self, key: &str) -> anyhow::Result<()> {
        // DeleteObject succeeds for missing keys.
        let object_key = self.object_key(key)?;
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .send()
            .await
            .with_context(|| format!("failed to delete object {object_key}"))?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> anyhow::Result<bool> {
        let object_key = self.object_key(key)?;
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(SdkError::ServiceError(service_err)) => {
                let head_err: &HeadObjectError = service_err.err();
                if head_err.is_not_found() {
                    Ok(false)
                } else {
                    Err(anyhow!("head_object error for {}: {}", object_key, head_err))
                }
            }
            Err(other) => Err(anyhow!("head_object failed for {}: {}", object_key, other)),
        }
    }
}

async fn ensure_bucket(client: &Client, bucket: &str) -> anyhow::Result<()> {
    match client.head_bucket().bucket(bucket).send().await {
        Ok(_) => return Ok(()),
        Err(SdkError::ServiceError(service_err)) => {
            if !matches!(service_err.err(), HeadBucketError::NotFound(_)) {
                return Err(anyhow!(service_err.err().to_string()));
            }
        }
        Err(err) => return Err(anyhow!(err.to_string())),
    }

    tracing::info!(bucket = %bucket, "s3_bucket_create");
    match client.create_bucket().bucket(bucket).send().await {
        Ok(_) => Ok(()),
        Err(SdkError::ServiceError(service_err)) => match service_err.err() {
            CreateBucketError::BucketAlreadyOwnedByYou(_) => Ok(()),
            CreateBucketError::BucketAlreadyExists(_) => Ok(()),
            other => Err(anyhow!(other.to_string())),
        },
        Err(err) => Err(anyhow!(err.to_string())),
    }
}
