use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use super::{public_url, ResumeStore, ResumeUpload, StorageError, StoredResume};

#[derive(Debug, Clone, Copy)]
enum Behaviour {
    Ok,
    Fail,
    Delay(Duration),
}

/// Test double that keeps uploads in a map.
pub struct InMemoryResumeStore {
    base_url: String,
    behaviour: Behaviour,
    objects: Mutex<HashMap<String, (Bytes, String)>>,
}

impl InMemoryResumeStore {
    pub fn new() -> Self {
        Self::with(Behaviour::Ok)
    }

    /// Every upload fails.
    pub fn failing() -> Self {
        Self::with(Behaviour::Fail)
    }

    /// Every upload sleeps first; pair with a short upload timeout.
    pub fn slow(delay: Duration) -> Self {
        Self::with(Behaviour::Delay(delay))
    }

    fn with(behaviour: Behaviour) -> Self {
        Self {
            base_url: "https://test-bucket.s3.amazonaws.com".to_string(),
            behaviour,
            objects: Mutex::new(HashMap::new()),
        }
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    pub fn content_type(&self, key: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|(_, content_type)| content_type.clone())
    }
}

#[async_trait]
impl ResumeStore for InMemoryResumeStore {
    async fn store(&self, upload: ResumeUpload) -> Result<StoredResume, StorageError> {
        match self.behaviour {
            Behaviour::Ok => {}
            Behaviour::Fail => return Err(StorageError::Upload("bucket unavailable".into())),
            Behaviour::Delay(delay) => tokio::time::sleep(delay).await,
        }

        let url = public_url(&self.base_url, &upload.key);
        self.objects
            .lock()
            .unwrap()
            .insert(upload.key.clone(), (upload.bytes, upload.content_type));
        Ok(StoredResume {
            key: upload.key,
            url,
        })
    }

    async fn discard(&self, key: &str) -> Result<(), StorageError> {
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }
}
