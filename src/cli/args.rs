use clap::{ArgAction, Parser};
use std::path::PathBuf;
use tracing::Level;

use crate::ledger::DEFAULT_LEDGER;
use crate::units::{Unit, UnitError};

#[derive(Parser, Debug, Clone)]
#[command(name = "casesize")]
#[command(about = "Measure each case directory and record its size in a sorted ledger")]
#[command(version)]
pub struct Args {
    /// Directory whose subdirectories are the cases to measure
    #[arg(default_value = ".")]
    pub base: PathBuf,

    /// Fixed display unit: B, kB, MB, GB, TB or PB (default: auto)
    #[arg(short = 'u', long)]
    pub unit: Option<String>,

    /// Ledger file to update
    #[arg(short = 'l', long, default_value = DEFAULT_LEDGER)]
    pub ledger: PathBuf,

    /// Output all results as single JSON object
    #[arg(long)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Parsed display unit; `None` selects the unit automatically.
    pub fn effective_unit(&self) -> Result<Option<Unit>, UnitError> {
        self.unit.as_deref().map(str::parse::<Unit>).transpose()
    }

    pub const fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_args() -> Args {
        Args {
            base: PathBuf::from("."),
            unit: None,
            ledger: PathBuf::from(DEFAULT_LEDGER),
            json: false,
            verbose: 0,
        }
    }

    #[test]
    fn test_parse_defaults() {
        let args = Args::parse_from(["casesize"]);
        assert_eq!(args.base, PathBuf::from("."));
        assert_eq!(args.ledger, PathBuf::from("filesize.txt"));
        assert!(args.unit.is_none());
        assert!(!args.json);
    }

    #[test]
    fn test_parse_base_and_flags() {
        let args = Args::parse_from(["casesize", "/runs", "-u", "GB", "--json", "-vv"]);
        assert_eq!(args.base, PathBuf::from("/runs"));
        assert_eq!(args.unit.as_deref(), Some("GB"));
        assert!(args.json);
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_effective_unit_auto() {
        assert_eq!(default_args().effective_unit(), Ok(None));
    }

    #[test]
    fn test_effective_unit_explicit() {
        let mut args = default_args();
        args.unit = Some("kB".to_string());
        assert_eq!(args.effective_unit(), Ok(Some(Unit::KB)));
    }

    #[test]
    fn test_effective_unit_invalid() {
        let mut args = default_args();
        args.unit = Some("KiB".to_string());
        assert!(args.effective_unit().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = default_args();
        assert_eq!(args.log_level(), Level::WARN);
        args.verbose = 1;
        assert_eq!(args.log_level(), Level::INFO);
        args.verbose = 5;
        assert_eq!(args.log_level(), Level::TRACE);
    }
}
