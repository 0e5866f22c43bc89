//! Confirmation gate.
//! Every destructive or directory-creating step asks a `Confirm` implementation
//! first. A negative answer turns into `CustodyError::UserAbort`, which the
//! top-level handler treats as a normal (but fatal) stop.
//!
//! Implementations:
//! - `ConsolePrompt`: interactive y/n prompt, "n" on empty input.
//! - `AssumeYes`: answers every question affirmatively (`--yes`).
//! - `ScriptedConfirm`: replays fixed answers and records the questions.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use tracing::{debug, warn};

use crate::errors::CustodyError;

/// Outcome of a single yes/no question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    Abort,
}

/// Capability to ask the operator a yes/no question.
pub trait Confirm {
    fn ask(&mut self, message: &str) -> Decision;
}

/// Ask and convert an abort into a `UserAbort` error.
pub fn require(confirm: &mut dyn Confirm, message: &str) -> anyhow::Result<()> {
    match confirm.ask(message) {
        Decision::Proceed => {
            debug!(prompt = message, "confirmed");
            Ok(())
        }
        Decision::Abort => Err(CustodyError::UserAbort {
            prompt: message.to_string(),
        }
        .into()),
    }
}

/// Line-based prompt over any reader/writer pair.
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}

impl ConsolePrompt<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on the process's stdin/stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_answer(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_ascii_lowercase()))
    }

    fn ask_io(&mut self, message: &str) -> io::Result<Decision> {
        writeln!(self.output, "  {message}")?;
        writeln!(self.output, "      [y] Yes (continue)")?;
        writeln!(self.output, "      [n] No  (exit)")?;
        write!(self.output, "  Your selection is [n]: ")?;
        self.output.flush()?;
        loop {
            let Some(answer) = self.read_answer()? else {
                // EOF behaves like the default answer.
                return Ok(Decision::Abort);
            };
            match answer.as_str() {
                "y" | "yes" => return Ok(Decision::Proceed),
                "n" | "no" | "" => return Ok(Decision::Abort),
                _ => {
                    write!(self.output, "  Enter y or n as your selection [n]: ")?;
                    self.output.flush()?;
                }
            }
        }
    }
}

impl<R: BufRead, W: Write> Confirm for ConsolePrompt<R, W> {
    fn ask(&mut self, message: &str) -> Decision {
        match self.ask_io(message) {
            Ok(d) => d,
            Err(e) => {
                warn!(error = %e, "Prompt failed; treating as 'no'");
                Decision::Abort
            }
        }
    }
}

/// Non-interactive gate that approves everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn ask(&mut self, message: &str) -> Decision {
        debug!(prompt = message, "auto-confirmed");
        Decision::Proceed
    }
}

/// Replays a fixed list of answers in order; once exhausted it answers `Abort`
/// (the prompt default). Every question asked is recorded.
#[derive(Debug, Default, Clone)]
pub struct ScriptedConfirm {
    answers: VecDeque<Decision>,
    asked: Vec<String>,
}

impl ScriptedConfirm {
    pub fn new(answers: impl IntoIterator<Item = Decision>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    /// Answer `Proceed` to the next `n` questions.
    pub fn yes(n: usize) -> Self {
        Self::new(std::iter::repeat_n(Decision::Proceed, n))
    }

    /// Questions asked so far, in order.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl Confirm for ScriptedConfirm {
    fn ask(&mut self, message: &str) -> Decision {
        self.asked.push(message.to_string());
        self.answers.pop_front().unwrap_or(Decision::Abort)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompt(input: &str) -> (Decision, String) {
        let mut out = Vec::new();
        let d = ConsolePrompt::new(Cursor::new(input.as_bytes()), &mut out).ask("Proceed?");
        (d, String::from_utf8(out).unwrap())
    }

    #[test]
    fn yes_proceeds() {
        let (d, out) = prompt("y\n");
        assert_eq!(d, Decision::Proceed);
        assert!(out.contains("Proceed?"));
    }

    #[test]
    fn empty_line_defaults_to_no() {
        assert_eq!(prompt("\n").0, Decision::Abort);
    }

    #[test]
    fn eof_defaults_to_no() {
        assert_eq!(prompt("").0, Decision::Abort);
    }

    #[test]
    fn garbage_reprompts_until_valid() {
        let (d, out) = prompt("maybe\nY\n");
        assert_eq!(d, Decision::Proceed);
        assert!(out.contains("Enter y or n"));
    }

    #[test]
    fn require_maps_abort_to_user_abort() {
        let mut c = ScriptedConfirm::new([Decision::Abort]);
        let err = require(&mut c, "Create this directory?").unwrap_err();
        let ce = err.downcast_ref::<CustodyError>().unwrap();
        assert!(matches!(ce, CustodyError::UserAbort { .. }));
        assert_eq!(c.asked(), ["Create this directory?"]);
    }

    #[test]
    fn scripted_defaults_to_abort_when_exhausted() {
        let mut c = ScriptedConfirm::yes(1);
        assert_eq!(c.ask("a"), Decision::Proceed);
        assert_eq!(c.ask("b"), Decision::Abort);
    }
}
