use std::io::{self, Write};

use anyhow::{Context, Result};
use crossterm::{
    execute,
    style::{style, Print, PrintStyledContent, Stylize},
};

use super::{ledger_cases, list_cases};
use crate::cli::Args;
use crate::ledger;
use crate::scanner::{scan, ConsoleProgress};
use crate::units::Unit;

pub fn run(args: &Args, unit: Option<Unit>) -> Result<()> {
    let cases = list_cases(&args.base)
        .with_context(|| format!("Failed to list {}", args.base.display()))?;

    let mut stdout = io::stdout();
    let mut progress = ConsoleProgress::stdout();

    for case in ledger_cases(cases) {
        execute!(
            stdout,
            PrintStyledContent(style(&case.id).bold()),
            Print("\n")
        )?;

        let measurement = scan(&case.path, unit, &mut progress)?;
        ledger::update(&args.ledger, &case.id, &measurement, &case.path)?;
    }

    stdout.flush()?;
    Ok(())
}
