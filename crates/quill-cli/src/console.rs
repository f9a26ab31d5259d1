//! Terminal display sink.
//!
//! Output text goes to stdout; states and notices go to stderr so the output
//! can be piped.

use colored::Colorize;
use quill_application::DisplaySink;
use quill_core::session::SessionState;
use std::io::Write;
use std::sync::Mutex;

pub struct ConsoleSink {
    /// When unset, renders are ignored and the caller prints the text itself
    streaming: bool,
    /// Text already written to stdout for the current session
    printed: Mutex<String>,
}

impl ConsoleSink {
    pub fn new(streaming: bool) -> Self {
        Self {
            streaming,
            printed: Mutex::new(String::new()),
        }
    }
}

impl DisplaySink for ConsoleSink {
    fn render(&self, text: &str, is_final: bool) {
        if !self.streaming {
            return;
        }

        let mut printed = self.printed.lock().unwrap_or_else(|e| e.into_inner());
        let mut stdout = std::io::stdout().lock();
        match text.strip_prefix(printed.as_str()) {
            Some(suffix) => {
                let _ = write!(stdout, "{suffix}");
            }
            None => {
                let _ = write!(stdout, "\n{text}");
            }
        }
        if is_final {
            let _ = writeln!(stdout);
        }
        let _ = stdout.flush();

        printed.clear();
        printed.push_str(text);
    }

    fn state_changed(&self, state: SessionState) {
        let label = format!("[{state}]");
        let label = match state {
            SessionState::Completed => label.green(),
            SessionState::Failed => label.red(),
            _ => label.dimmed(),
        };
        eprintln!("{label}");
    }

    fn notice(&self, message: &str) {
        eprintln!("{}", message.yellow());
    }

    fn clear(&self) {
        self.printed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}
