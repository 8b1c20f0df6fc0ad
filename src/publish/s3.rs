//! S3 publisher

use crate::config::PublishConfig;
use crate::publish::{PublishError, PublishResult, Publisher};
use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;

/// Uploads feeds to an S3 bucket with a public-read ACL
pub struct S3Publisher {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Publisher {
    /// Creates a publisher from an existing client
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Builds a client from the default AWS credential chain
    ///
    /// `region` and `endpoint` from the config override what the environment
    /// provides; an endpoint switches to path-style addressing so
    /// S3-compatible stores work.
    pub async fn from_config(config: &PublishConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(ref region) = config.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(ref endpoint) = config.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self::new(
            aws_sdk_s3::Client::from_conf(builder.build()),
            config.bucket.clone(),
        )
    }
}

#[async_trait]
impl Publisher for S3Publisher {
    async fn publish(
        &self,
        path: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> PublishResult<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(path)
            .acl(ObjectCannedAcl::PublicRead)
            .content_type(content_type)
            .body(ByteStream::from(content))
            .send()
            .await
            .map_err(|e| PublishError::Upload {
                path: format!("s3://{}/{}", self.bucket, path),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        tracing::info!("Uploaded to s3: {}", path);
        Ok(())
    }
}
