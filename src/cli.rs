use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::{Parser, ValueHint};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::api::Api;
use crate::bridge::LocalHost;
use crate::error::AppError;
use crate::models::{DirectoryEntry, EntryOrder, PickerConfig};
use crate::render::render;
use crate::services::browser::{DirectoryBrowser, GestureOutcome};
use crate::services::listing_service::{ListingOptions, ListingProvider};

const HELP: &str = "commands: <number> open or pick an entry, up, refresh, close, help";

#[derive(Parser, Debug)]
#[command(
    name = "frogger-picker",
    version,
    about = "Pick a file below a base directory; the chosen entry is printed as JSON"
)]
pub struct Args {
    /// Directory to browse; navigation never leaves it. Defaults to the
    /// configured base path, then the home directory.
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub base: Option<String>,

    /// Show dot-files.
    #[arg(long)]
    pub show_hidden: bool,

    #[arg(long, value_enum)]
    pub order: Option<EntryOrder>,

    /// Config file to read instead of the platform default.
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Persist the effective settings to the config file.
    #[arg(long)]
    pub write_config: bool,
}

impl Args {
    /// Command-line values win over the config file.
    pub fn apply_to(&self, mut config: PickerConfig) -> PickerConfig {
        if let Some(base) = &self.base {
            config.base_path = Some(base.clone());
        }
        if self.show_hidden {
            config.show_hidden = true;
        }
        if let Some(order) = self.order {
            config.entry_order = order;
        }
        config
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(usize),
    Up,
    Refresh,
    Close,
    Help,
    Empty,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    if let Ok(index) = line.parse::<usize>() {
        return Command::Open(index);
    }
    match line.to_ascii_lowercase().as_str() {
        "up" | ".." | "back" => Command::Up,
        "refresh" | "r" => Command::Refresh,
        "close" | "q" | "quit" => Command::Close,
        "help" | "?" => Command::Help,
        _ => Command::Unknown(line.to_string()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Selected(DirectoryEntry),
    Closed,
}

pub type DecisionSlot = Arc<Mutex<Option<Decision>>>;

/// Mounts a browser whose callbacks record the caller's decision.
pub fn mount_picker(
    base_path: String,
    provider: Arc<dyn ListingProvider>,
    order: EntryOrder,
) -> Result<(DirectoryBrowser, DecisionSlot), AppError> {
    let decision: DecisionSlot = Arc::new(Mutex::new(None));
    let on_select = Arc::clone(&decision);
    let on_close = Arc::clone(&decision);

    let browser = DirectoryBrowser::mount(
        base_path,
        provider,
        move |entry| {
            let mut slot = on_select
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            slot.get_or_insert(Decision::Selected(entry));
        },
        move || {
            let mut slot = on_close
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            slot.get_or_insert(Decision::Closed);
        },
    )?
    .with_entry_order(order);

    Ok((browser, decision))
}

fn take_decision(decision: &DecisionSlot) -> Option<Decision> {
    decision
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .take()
}

enum SessionEvent {
    Listing(bool),
    Input(Option<String>),
}

fn draw<W: Write>(browser: &DirectoryBrowser, out: &mut W) -> Result<(), AppError> {
    for line in render(browser) {
        writeln!(out, "{line}")?;
    }
    prompt(out)
}

fn prompt<W: Write>(out: &mut W) -> Result<(), AppError> {
    write!(out, "> ")?;
    out.flush()?;
    Ok(())
}

/// Renders the browser to `out` and feeds it commands read from `input`
/// until the user picks a file or closes. End of input counts as closing.
///
/// Input is read while a listing is in flight, so `up` and `close` work
/// against a slow provider. The view is redrawn whenever a listing lands.
pub async fn run_session<R, W>(
    browser: &mut DirectoryBrowser,
    decision: &DecisionSlot,
    input: R,
    out: &mut W,
) -> Result<Decision, AppError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    draw(browser, out)?;

    loop {
        let event = tokio::select! {
            biased;
            applied = browser.next_response() => SessionEvent::Listing(applied),
            line = lines.next_line() => SessionEvent::Input(line?),
        };

        let line = match event {
            SessionEvent::Listing(applied) => {
                if applied {
                    writeln!(out)?;
                    draw(browser, out)?;
                }
                continue;
            }
            SessionEvent::Input(None) => {
                writeln!(out)?;
                browser.close();
                return Ok(take_decision(decision).unwrap_or(Decision::Closed));
            }
            SessionEvent::Input(Some(line)) => line,
        };

        let command = parse_command(&line);
        let outcome = match &command {
            Command::Open(index) => browser.select_index(*index),
            Command::Up => browser.navigate_up(),
            Command::Refresh => browser.refresh(),
            Command::Close => browser.close(),
            Command::Help => {
                writeln!(out, "{HELP}")?;
                prompt(out)?;
                continue;
            }
            Command::Empty => {
                prompt(out)?;
                continue;
            }
            Command::Unknown(text) => {
                writeln!(out, "unknown command {text:?}; {HELP}")?;
                prompt(out)?;
                continue;
            }
        };

        if let Some(decision) = take_decision(decision) {
            return Ok(decision);
        }

        if outcome == GestureOutcome::Ignored {
            match command {
                Command::Up => writeln!(out, "already at the base directory")?,
                Command::Open(index) => writeln!(out, "no entry {index}")?,
                _ => {}
            }
        }
        draw(browser, out)?;
    }
}

/// Runs an interactive pick on the local filesystem through the host bridge.
pub async fn pick(config: &PickerConfig) -> Result<Decision, AppError> {
    let api = Api::new(LocalHost::new(ListingOptions {
        show_hidden: config.show_hidden,
    }));
    let base_path = match &config.base_path {
        Some(base) => base.clone(),
        None => api.get_home_directory().await?,
    };
    tracing::info!(base_path = %base_path, "starting picker");

    let (mut browser, decision) = mount_picker(base_path, Arc::new(api), config.entry_order)?;
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stderr = std::io::stderr();
    run_session(&mut browser, &decision, stdin, &mut stderr).await
}
