use crate::error::{AppError, ListingError};
use crate::models::DirectoryEntry;
use crate::services::listing_service::{FsListingProvider, ListingOptions, ListingProvider};

pub async fn list_directory_contents(
    directory_path: String,
    options: ListingOptions,
) -> Result<Vec<DirectoryEntry>, ListingError> {
    if directory_path.is_empty() {
        return Err(ListingError::NotFound(directory_path));
    }
    FsListingProvider::new(options).list(&directory_path).await
}

pub fn get_home_directory() -> Result<String, AppError> {
    let dirs = directories::BaseDirs::new()
        .ok_or_else(|| AppError::General("could not resolve home directory".to_string()))?;
    Ok(dirs.home_dir().to_string_lossy().to_string())
}
