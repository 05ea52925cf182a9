use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use tracing::info;

use super::{public_url, ResumeStore, ResumeUpload, StorageError, StoredResume};

pub struct S3ResumeStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl S3ResumeStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String, public_base_url: String) -> Self {
        Self {
            client,
            bucket,
            public_base_url,
        }
    }
}

#[async_trait]
impl ResumeStore for S3ResumeStore {
    async fn store(&self, upload: ResumeUpload) -> Result<StoredResume, StorageError> {
        let size = upload.bytes.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&upload.key)
            .body(ByteStream::from(upload.bytes))
            .content_type(upload.content_type)
            .send()
            .await
            .map_err(|e| StorageError::Upload(format!("S3 put_object failed: {e}")))?;

        info!(bytes = size, "Uploaded resume to s3://{}/{}", self.bucket, upload.key);

        Ok(StoredResume {
            url: public_url(&self.public_base_url, &upload.key),
            key: upload.key,
        })
    }

    async fn discard(&self, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Delete(format!("S3 delete_object failed: {e}")))?;

        info!("Removed resume s3://{}/{}", self.bucket, key);
        Ok(())
    }
}
