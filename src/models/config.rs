use serde::{Deserialize, Serialize};

/// How the browser orders a listing before showing it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum EntryOrder {
    /// Directories before files, case-insensitive by name within each group.
    #[default]
    DirectoriesFirst,
    /// Whatever order the listing provider returned.
    AsListed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Navigation floor when none is given on the command line.
    pub base_path: Option<String>,
    pub show_hidden: bool,
    pub entry_order: EntryOrder,
    pub log_filter: String,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            base_path: None,
            show_hidden: false,
            entry_order: EntryOrder::DirectoriesFirst,
            log_filter: "warn".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let config: PickerConfig = serde_json::from_str(r#"{"show_hidden":true}"#).unwrap();
        assert!(config.show_hidden);
        assert_eq!(config.entry_order, EntryOrder::DirectoriesFirst);
        assert_eq!(config.log_filter, "warn");
        assert!(config.base_path.is_none());
    }

    #[test]
    fn test_entry_order_uses_snake_case() {
        let config: PickerConfig = serde_json::from_str(r#"{"entry_order":"as_listed"}"#).unwrap();
        assert_eq!(config.entry_order, EntryOrder::AsListed);
    }
}
