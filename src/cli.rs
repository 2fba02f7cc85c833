//! CLI - scriptable access to the catalog and local library
//!
//! Every subcommand prints JSON when `--json` is given or stdout is not a
//! terminal, so the same binary works from scripts.
//!
//! # Examples
//!
//! ```bash
//! # Save a profile (verifies the login first)
//! couchtv login home --url http://tv.example:8080 --username alice --password secret
//!
//! # Browse
//! couchtv categories movies
//! couchtv streams series --category 12
//! couchtv search movies "blade runner" --json
//!
//! # Library
//! couchtv history
//! couchtv history --remove 4711
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::api::ApiError;
use crate::models::CatalogKind;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    /// General error
    Error = 1,
    InvalidArgs = 2,
    NetworkError = 3,
    /// Login rejected or account expired
    AuthError = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<&ApiError> for ExitCode {
    fn from(e: &ApiError) -> Self {
        match e {
            ApiError::Auth(_) => ExitCode::AuthError,
            ApiError::Network(_) | ApiError::Status(_) => ExitCode::NetworkError,
            ApiError::UnsupportedKind(_) => ExitCode::InvalidArgs,
            ApiError::InvalidResponse(_) => ExitCode::Error,
        }
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// couchtv - lean-back IPTV browser for the terminal
///
/// Run without arguments to launch the interactive TUI.
/// Use subcommands for scripting.
#[derive(Parser, Debug)]
#[command(
    name = "couchtv",
    version,
    about = "Lean-back IPTV browser and player",
    long_about = "Browse an Xtream-compatible catalog with arrow keys, Enter and Back, \
                  and play through mpv with resume support.\n\n\
                  Run without arguments to launch the interactive TUI.\n\
                  Use subcommands for automation and scripting.",
    after_help = "EXAMPLES:\n\
                  couchtv                                  Launch interactive TUI\n\
                  couchtv login home --url HOST -u USER    Save a profile\n\
                  couchtv search movies \"heat\" --json      Search the catalog\n\
                  couchtv history                          Show continue-watching"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Profile to use instead of the configured one
    #[arg(long, short = 'p', global = true)]
    pub profile: Option<String>,

    /// Subcommand to run (omit for TUI mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Verify a login and save it as a profile
    Login(LoginCmd),

    /// List or delete saved profiles
    Profiles(ProfilesCmd),

    /// List categories of a catalog section
    #[command(visible_alias = "cat")]
    Categories(CategoriesCmd),

    /// List streams of a catalog section
    #[command(visible_alias = "ls")]
    Streams(StreamsCmd),

    /// Show movie or series details
    #[command(visible_alias = "i")]
    Info(InfoCmd),

    /// Search a catalog section by name
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// Show or edit continue-watching history
    History(HistoryCmd),

    /// Show favorite movies and series
    #[command(visible_alias = "fav")]
    Favorites(FavoritesCmd),
}

/// Catalog section
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    #[value(alias = "vod")]
    Movies,
    Series,
    #[value(alias = "livetv")]
    Live,
}

impl From<KindArg> for CatalogKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Movies => CatalogKind::Movies,
            KindArg::Series => CatalogKind::Series,
            KindArg::Live => CatalogKind::Live,
        }
    }
}

#[derive(Args, Debug)]
pub struct LoginCmd {
    /// Profile name
    pub name: String,

    /// Server URL (http:// is assumed when missing)
    #[arg(long)]
    pub url: String,

    #[arg(long, short = 'u')]
    pub username: String,

    #[arg(long, short = 'P')]
    pub password: String,

    /// Save without contacting the server
    #[arg(long)]
    pub no_verify: bool,
}

#[derive(Args, Debug)]
pub struct ProfilesCmd {
    /// Delete the named profile
    #[arg(long)]
    pub delete: Option<String>,
}

#[derive(Args, Debug)]
pub struct CategoriesCmd {
    #[arg(value_enum)]
    pub kind: KindArg,
}

#[derive(Args, Debug)]
pub struct StreamsCmd {
    #[arg(value_enum)]
    pub kind: KindArg,

    /// Only this category id
    #[arg(long)]
    pub category: Option<String>,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "50")]
    pub limit: usize,
}

#[derive(Args, Debug)]
pub struct InfoCmd {
    #[arg(value_enum)]
    pub kind: KindArg,

    /// Movie or series id
    pub id: String,
}

#[derive(Args, Debug)]
pub struct SearchCmd {
    #[arg(value_enum)]
    pub kind: KindArg,

    /// Name fragment, at least three characters
    pub query: String,

    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,
}

#[derive(Args, Debug)]
pub struct HistoryCmd {
    /// Remove the record for this content id
    #[arg(long, conflicts_with = "clear")]
    pub remove: Option<String>,

    /// Remove every record
    #[arg(long)]
    pub clear: bool,
}

#[derive(Args, Debug)]
pub struct FavoritesCmd {}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print `data` as JSON, or the human rendering from `text`
    pub fn print<T: Serialize>(&self, data: &T, text: impl FnOnce() -> String) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(&JsonOutput::success(data))?);
        } else {
            println!("{}", text());
        }
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet and JSON mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
