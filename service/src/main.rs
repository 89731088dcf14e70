use std::io::{self, BufRead, Write};
use std::time::Instant;

use color_eyre::eyre;
use tracing::trace;

use crate::command::{Outcome, Shell};

mod command;

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt::try_init().map_err(|e| eyre::eyre!(e))?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut shell = Shell::new();

    for line in stdin.lock().lines() {
        let line = line?;

        let start = Instant::now();
        let outcome = shell.handle(&line, &mut out)?;
        out.flush()?;
        trace!(duration = ?start.elapsed(), "command handled");

        if outcome == Outcome::Halt {
            break;
        }
    }

    Ok(())
}
