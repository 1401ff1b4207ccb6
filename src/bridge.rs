//! Generic invocation primitive toward the host process.
//!
//! Front-end code never calls host functions directly; it names a command
//! and hands over an argument map. [`LocalHost`] answers those commands in
//! process.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::commands::file_commands;
use crate::error::AppError;
use crate::services::listing_service::ListingOptions;

#[async_trait]
pub trait Invoke: Send + Sync {
    async fn invoke(&self, command: &str, args: Value) -> Result<Value, AppError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDirectoryArgs {
    directory_path: String,
}

/// Dispatches bridge commands to the in-process host commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalHost {
    options: ListingOptions,
}

impl LocalHost {
    pub fn new(options: ListingOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl Invoke for LocalHost {
    async fn invoke(&self, command: &str, args: Value) -> Result<Value, AppError> {
        tracing::trace!(command, %args, "host command");
        match command {
            "list_directory_contents" => {
                let args: ListDirectoryArgs = parse_args(command, args)?;
                let entries =
                    file_commands::list_directory_contents(args.directory_path, self.options)
                        .await?;
                Ok(serde_json::to_value(entries)?)
            }
            "get_home_directory" => Ok(Value::String(file_commands::get_home_directory()?)),
            other => Err(AppError::UnknownCommand(other.to_string())),
        }
    }
}

fn parse_args<T: DeserializeOwned>(command: &str, args: Value) -> Result<T, AppError> {
    serde_json::from_value(args).map_err(|e| AppError::InvalidArgs {
        command: command.to_string(),
        reason: e.to_string(),
    })
}
