use std::fs;
use std::path::Path;

use async_trait::async_trait;

use crate::error::ListingError;
use crate::models::{DirectoryEntry, EntryOrder};

/// Asynchronously returns the children of a directory.
///
/// Implementations make a single round trip per call and return direct
/// children only. No particular order is promised.
#[async_trait]
pub trait ListingProvider: Send + Sync {
    async fn list(&self, directory_path: &str) -> Result<Vec<DirectoryEntry>, ListingError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ListingOptions {
    pub show_hidden: bool,
}

/// Lists a directory on the local filesystem.
pub fn read_directory(
    directory_path: &str,
    options: ListingOptions,
) -> Result<Vec<DirectoryEntry>, ListingError> {
    let dir_path = Path::new(directory_path);
    let metadata =
        fs::metadata(dir_path).map_err(|e| ListingError::from_io(directory_path, &e))?;
    if !metadata.is_dir() {
        return Err(ListingError::NotADirectory(directory_path.to_string()));
    }

    let read_dir =
        fs::read_dir(dir_path).map_err(|e| ListingError::from_io(directory_path, &e))?;

    let mut entries = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| ListingError::from_io(directory_path, &e))?;
        let name = entry.file_name().to_string_lossy().to_string();
        if !options.show_hidden && name.starts_with('.') {
            continue;
        }

        // Entries that vanish between read_dir and stat are skipped.
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        let is_directory = metadata.is_dir();

        entries.push(DirectoryEntry {
            path: entry.path().to_string_lossy().to_string(),
            name,
            is_directory,
            size: if is_directory { 0 } else { metadata.len() },
            modified: metadata
                .modified()
                .ok()
                .map(|t| chrono::DateTime::<chrono::Utc>::from(t).to_rfc3339()),
        });
    }

    order_entries(&mut entries, EntryOrder::DirectoriesFirst);
    Ok(entries)
}

pub fn order_entries(entries: &mut [DirectoryEntry], order: EntryOrder) {
    match order {
        EntryOrder::DirectoriesFirst => entries.sort_by(|a, b| {
            b.is_directory
                .cmp(&a.is_directory)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
                .then_with(|| a.name.cmp(&b.name))
        }),
        EntryOrder::AsListed => {}
    }
}

/// [`ListingProvider`] backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsListingProvider {
    options: ListingOptions,
}

impl FsListingProvider {
    pub fn new(options: ListingOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl ListingProvider for FsListingProvider {
    async fn list(&self, directory_path: &str) -> Result<Vec<DirectoryEntry>, ListingError> {
        let path = directory_path.to_string();
        let options = self.options;
        tokio::task::spawn_blocking(move || read_directory(&path, options))
            .await
            .map_err(|e| ListingError::Host(format!("listing task failed: {e}")))?
    }
}
