//! Subcommands and the options they share.

pub mod apply;
pub mod plan;
pub mod show;

use clap::Args;
use colored::{ColoredString, Colorize};

use megaverse_core::{Attribute, Cell, CellKind, Color, Direction, Operation, Verb};
use megaverse_sync::{
    config::{ENV_BASE_URL, ENV_CANDIDATE_ID, ENV_RETRY_DELAY_SECS, ENV_TIMEOUT_SECS},
    Config, ConfigError,
};

/// Connection options accepted by every subcommand. Each falls back to its
/// environment variable.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Candidate id [env: CANDIDATE_ID]
    #[arg(long, global = true)]
    pub candidate_id: Option<String>,

    /// API base URL [env: MEGAVERSE_BASE_URL]
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Seconds to wait before retrying a rate-limited call [env: MEGAVERSE_RETRY_DELAY_SECS]
    #[arg(long, global = true, value_name = "SECS")]
    pub retry_delay: Option<u64>,

    /// HTTP timeout in seconds [env: MEGAVERSE_TIMEOUT_SECS]
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl GlobalArgs {
    /// Flags first, then the environment.
    pub fn config(&self) -> Result<Config, ConfigError> {
        let flag = |key: &str| -> Option<String> {
            match key {
                ENV_CANDIDATE_ID => self.candidate_id.clone(),
                ENV_BASE_URL => self.base_url.clone(),
                ENV_RETRY_DELAY_SECS => self.retry_delay.map(|s| s.to_string()),
                ENV_TIMEOUT_SECS => self.timeout.map(|s| s.to_string()),
                _ => None,
            }
        };
        let config = Config::from_lookup(|key| flag(key).or_else(|| std::env::var(key).ok()))?;
        tracing::debug!(
            "config: candidate={} base={} retry={:?} timeout={:?}",
            config.candidate_id,
            config.base_url,
            config.retry_delay,
            config.timeout
        );
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Shared rendering
// ---------------------------------------------------------------------------

pub(crate) fn verb_label(verb: Verb) -> ColoredString {
    match verb {
        Verb::Create => "create".green(),
        Verb::Delete => "delete".red(),
    }
}

pub(crate) fn attribute_label(op: &Operation) -> String {
    op.cell
        .attribute
        .map(|a| a.to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// One-character rendering of a cell for `show`.
pub(crate) fn glyph(cell: &Cell) -> ColoredString {
    match (cell.kind, cell.attribute) {
        (CellKind::Space, _) => "·".bright_black(),
        (CellKind::Polyanet, _) => "P".bold(),
        (CellKind::Soloon, Some(Attribute::Color(color))) => match color {
            Color::Blue => "S".blue(),
            Color::Red => "S".red(),
            Color::Purple => "S".magenta(),
            Color::White => "S".white(),
        },
        (CellKind::Soloon, _) => "S".normal(),
        (CellKind::Cometh, Some(Attribute::Direction(direction))) => match direction {
            Direction::Up => "↑".yellow(),
            Direction::Down => "↓".yellow(),
            Direction::Right => "→".yellow(),
            Direction::Left => "←".yellow(),
        },
        (CellKind::Cometh, _) => "C".yellow(),
    }
}
