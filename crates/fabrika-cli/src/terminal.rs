//! Terminal implementation of the grid host: notices go to stderr,
//! confirmations are read from stdin.

use std::io::{self, BufRead, Write};

use fabrika_grid::{GridHost, Notice};

#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalHost {
    assume_yes: bool,
}

impl TerminalHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every confirmation with yes (`--yes`).
    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }
}

impl GridHost for TerminalHost {
    fn notify(&self, notice: &Notice) {
        tracing::warn!(kind = notice.kind.as_str(), "{}", notice.message);
        eprintln!("{notice}");
    }

    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        eprint!("{prompt} [y/N] ");
        if io::stderr().flush().is_err() {
            return false;
        }
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(_) => is_yes(&line),
            Err(_) => false,
        }
    }
}

/// Whether a typed answer means yes. Anything unrecognized is a no.
pub fn is_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "д" | "да"
    )
}

/// Read one line from stdin after printing `prompt`.
pub fn prompt_line(prompt: &str) -> io::Result<String> {
    eprint!("{prompt}");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(|c: char| c == '\r' || c == '\n').to_string())
}
