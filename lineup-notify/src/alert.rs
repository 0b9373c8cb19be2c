//! Terminal alert sink

use lineup_common::notify::{Alert, AlertSink};
use std::io::{self, Write};
use std::sync::Mutex;
use tracing::warn;

/// ASCII BEL; the terminal beeps or flashes
const BELL: &str = "\x07";

/// Prints each alert on its own line and rings the terminal bell
pub struct TerminalAlert<W: Write + Send> {
    out: Mutex<W>,
}

impl TerminalAlert<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalAlert<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

impl<W: Write + Send> AlertSink for TerminalAlert<W> {
    fn deliver(&self, alert: &Alert) {
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        let written = writeln!(
            out,
            "{}[{}] {}",
            BELL,
            alert.timestamp.format("%H:%M:%S"),
            alert.message()
        )
        .and_then(|_| out.flush());

        if let Err(e) = written {
            warn!("Failed to write alert to terminal: {}", e);
        }
    }
}
