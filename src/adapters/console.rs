//! Terminal reporter: a spinner while an operation runs, one line when it ends.

use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use crossterm::cursor::MoveToColumn;
use crossterm::style::{PrintStyledContent, Stylize};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{execute, queue};
use std::io::{self, IsTerminal, Write};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use swissgit_core::ports::Reporter;
use swissgit_core::OperationOutcome;
use tracing::debug;

const GLYPHS: [char; 4] = ['-', '\\', '|', '/'];
const TICK: Duration = Duration::from_millis(100);

pub const SUCCESS_MARK: &str = "✔";
pub const FAILURE_MARK: &str = "✗";

/// Final line for an outcome, without colour. `Quiet` prints nothing.
pub fn plain_line(name: &str, outcome: &OperationOutcome) -> Option<String> {
    match outcome {
        OperationOutcome::Success(summary) => Some(format!("{} {}: {}", SUCCESS_MARK, name, summary)),
        OperationOutcome::Failure(message) => Some(format!("{} {}: {}", FAILURE_MARK, name, message)),
        OperationOutcome::Quiet => None,
    }
}

struct Spinner {
    stop: Sender<()>,
    handle: JoinHandle<()>,
}

impl Spinner {
    fn spawn(label: String) -> Self {
        let (stop, stopped) = bounded::<()>(1);

        let handle = thread::spawn(move || {
            let mut stdout = io::stdout();
            for glyph in GLYPHS.iter().cycle() {
                // Drawing is cosmetic; a broken terminal must not affect the operation
                let _ = queue!(stdout, MoveToColumn(0), Clear(ClearType::CurrentLine));
                let _ = write!(stdout, "{} {}", glyph, label);
                let _ = stdout.flush();

                match stopped.recv_timeout(TICK) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    _ => break,
                }
            }
            let _ = execute!(stdout, MoveToColumn(0), Clear(ClearType::CurrentLine));
        });

        Self { stop, handle }
    }

    fn halt(self) {
        let _ = self.stop.send(());
        if self.handle.join().is_err() {
            debug!("Spinner thread panicked");
        }
    }
}

pub struct ConsoleReporter {
    animate: bool,
    colour: bool,
    spinner: Option<Spinner>,
}

impl ConsoleReporter {
    /// Animate and colour only when stdout is a terminal
    pub fn new() -> Self {
        let tty = io::stdout().is_terminal();
        Self {
            animate: tty,
            colour: tty,
            spinner: None,
        }
    }

    pub fn plain() -> Self {
        Self {
            animate: false,
            colour: false,
            spinner: None,
        }
    }

    fn print_line(&self, name: &str, outcome: &OperationOutcome) -> io::Result<()> {
        let mut stdout = io::stdout().lock();

        if !self.colour {
            if let Some(line) = plain_line(name, outcome) {
                writeln!(stdout, "{}", line)?;
            }
            return Ok(());
        }

        match outcome {
            OperationOutcome::Success(summary) => {
                queue!(stdout, PrintStyledContent(SUCCESS_MARK.green()))?;
                writeln!(stdout, " {}: {}", name.bold(), summary)?;
            }
            OperationOutcome::Failure(message) => {
                queue!(stdout, PrintStyledContent(FAILURE_MARK.red()))?;
                writeln!(stdout, " {}: {}", name.bold(), message.as_str().red())?;
            }
            OperationOutcome::Quiet => {}
        }
        stdout.flush()
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for ConsoleReporter {
    fn start(&mut self, label: &str) {
        self.stop();
        if self.animate {
            self.spinner = Some(Spinner::spawn(label.to_string()));
        }
    }

    fn stop(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.halt();
        }
    }

    fn finish(&mut self, name: &str, outcome: &OperationOutcome) {
        if let Err(e) = self.print_line(name, outcome) {
            debug!("Could not write result line: {}", e);
        }
    }
}

impl Drop for ConsoleReporter {
    fn drop(&mut self) {
        self.stop();
    }
}
