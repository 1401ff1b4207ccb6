use async_trait::async_trait;
use serde_json::json;

use crate::bridge::Invoke;
use crate::error::{AppError, ListingError};
use crate::models::DirectoryEntry;
use crate::services::listing_service::ListingProvider;

/// Typed calls over an [`Invoke`] bridge.
pub struct Api<I> {
    bridge: I,
}

impl<I: Invoke> Api<I> {
    pub fn new(bridge: I) -> Self {
        Self { bridge }
    }

    pub async fn list_directory_contents(
        &self,
        directory_path: &str,
    ) -> Result<Vec<DirectoryEntry>, AppError> {
        let value = self
            .bridge
            .invoke(
                "list_directory_contents",
                json!({ "directoryPath": directory_path }),
            )
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn get_home_directory(&self) -> Result<String, AppError> {
        let value = self.bridge.invoke("get_home_directory", json!({})).await?;
        Ok(serde_json::from_value(value)?)
    }
}

#[async_trait]
impl<I: Invoke> ListingProvider for Api<I> {
    async fn list(&self, directory_path: &str) -> Result<Vec<DirectoryEntry>, ListingError> {
        self.list_directory_contents(directory_path)
            .await
            .map_err(|err| match err {
                AppError::Listing(listing) => listing,
                other => ListingError::Host(other.to_string()),
            })
    }
}
