pub mod config;
pub mod file_entry;

pub use config::{EntryOrder, PickerConfig};
pub use file_entry::DirectoryEntry;
