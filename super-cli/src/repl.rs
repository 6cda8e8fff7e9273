//! Line-oriented interactive session.
//!
//! Each input line is one command. Results of `calculate` appear once the
//! reveal cue fires; a refused calculation leaves a notice that is cleared
//! by its own cue a few seconds later.

use std::io::Write;

use anyhow::Result;
use super_core::format::format_currency;
use super_core::{DeferredCue, EstimatorSession, SessionPhase, VisaCategory};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

use crate::cues::CueScheduler;
use crate::logging;
use crate::report::{render_rates, render_session};

pub const HELP: &str = "\
Commands:
  arrival <year>          set the arrival year (blank for the default)
  departure <year>        set the departure year (blank for this year)
  salary <year> <amount>  set the salary earned in a year
  visa <year> <code>      set the visa category for a year
  show                    list the years and the current estimate
  calculate               calculate the estimated payout
  reset                   clear every entry
  rates                   list tax rates by visa category
  log <level>             change the log filter, e.g. debug
  help                    show this help
  quit                    leave
";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}', try 'help'")]
    Unknown(String),

    #[error("'{command}' needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("'{0}' is not a year")]
    InvalidYear(String),

    #[error("unknown visa category '{0}', see 'rates' for the codes")]
    UnknownVisa(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Arrival(String),
    Departure(String),
    Salary { year: i32, amount: String },
    Visa { year: i32, category: VisaCategory },
    Show,
    Calculate,
    Reset,
    Rates,
    Log(String),
    Help,
    Quit,
}

impl Command {
    /// Parses one input line. Blank lines give `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let mut parts = line.trim().splitn(2, char::is_whitespace);
        let Some(name) = parts.next().filter(|n| !n.is_empty()) else {
            return Ok(None);
        };
        let rest = parts.next().unwrap_or("").trim();

        let command = match name.to_ascii_lowercase().as_str() {
            "arrival" => Self::Arrival(rest.to_string()),
            "departure" => Self::Departure(rest.to_string()),
            "salary" => {
                let (year, amount) = year_and_value(rest, "salary", "a year and an amount")?;
                Self::Salary {
                    year,
                    amount: amount.to_string(),
                }
            }
            "visa" => {
                let (year, code) = year_and_value(rest, "visa", "a year and a visa code")?;
                let category = VisaCategory::parse(code)
                    .ok_or_else(|| CommandError::UnknownVisa(code.to_string()))?;
                Self::Visa { year, category }
            }
            "show" => Self::Show,
            "calculate" | "calc" => Self::Calculate,
            "reset" => Self::Reset,
            "rates" => Self::Rates,
            "log" if rest.is_empty() => {
                return Err(CommandError::MissingArgument {
                    command: "log",
                    argument: "a level",
                });
            }
            "log" => Self::Log(rest.to_string()),
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

fn year_and_value<'a>(
    rest: &'a str,
    command: &'static str,
    argument: &'static str,
) -> Result<(i32, &'a str), CommandError> {
    let mut parts = rest.splitn(2, char::is_whitespace);
    let year = parts.next().filter(|y| !y.is_empty());
    let value = parts.next().map(str::trim).filter(|v| !v.is_empty());

    match (year, value) {
        (Some(year), Some(value)) => year
            .parse()
            .map(|year| (year, value))
            .map_err(|_| CommandError::InvalidYear(year.to_string())),
        _ => Err(CommandError::MissingArgument { command, argument }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Drives an [`EstimatorSession`] from text commands, writing replies to
/// `out`.
pub struct Repl<W> {
    session: EstimatorSession,
    cues: CueScheduler,
    out: W,
    notice: Option<String>,
    pending_reveals: usize,
}

impl<W: Write> Repl<W> {
    pub fn new(
        session: EstimatorSession,
        out: W,
    ) -> Self {
        Self {
            session,
            cues: CueScheduler::new(),
            out,
            notice: None,
            pending_reveals: 0,
        }
    }

    pub fn session(&self) -> &EstimatorSession {
        &self.session
    }

    /// The notice from the last refused calculation, until it is dismissed.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Reads commands until `quit` or end of input, handling cues as they
    /// fall due. Results still waiting to be revealed are shown before
    /// returning.
    pub async fn run<R>(
        &mut self,
        input: R,
    ) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if self.handle_line(&line)? == Flow::Quit {
                        break;
                    }
                }
                Some(cue) = self.cues.next() => self.on_cue(cue)?,
            }
        }

        while self.pending_reveals > 0 {
            match self.cues.next().await {
                Some(cue) => self.on_cue(cue)?,
                None => break,
            }
        }
        self.out.flush()?;
        Ok(())
    }

    fn handle_line(
        &mut self,
        line: &str,
    ) -> Result<Flow> {
        match Command::parse(line) {
            Ok(Some(command)) => self.execute(command),
            Ok(None) => Ok(Flow::Continue),
            Err(e) => {
                writeln!(self.out, "error: {e}")?;
                Ok(Flow::Continue)
            }
        }
    }

    fn execute(
        &mut self,
        command: Command,
    ) -> Result<Flow> {
        debug!(?command, "executing command");
        match command {
            Command::Arrival(text) => {
                self.session.set_arrival_year(&text);
                self.write_range()?;
            }
            Command::Departure(text) => {
                self.session.set_departure_year(&text);
                self.write_range()?;
            }
            Command::Salary { year, amount } => {
                if let Some(index) = self.index_of(year)? {
                    self.session.set_salary(index, &amount)?;
                    let salary = self.session.records()[index].salary;
                    writeln!(self.out, "{year}: salary {}", format_currency(salary))?;
                }
            }
            Command::Visa { year, category } => {
                if let Some(index) = self.index_of(year)? {
                    self.session.set_visa_category(index, category)?;
                    writeln!(self.out, "{year}: {}", category.label())?;
                }
            }
            Command::Show => {
                if let Some(notice) = &self.notice {
                    writeln!(self.out, "notice: {notice}")?;
                }
                write!(self.out, "{}", render_session(&self.session))?;
            }
            Command::Calculate => match self.session.calculate() {
                Ok(submission) => {
                    self.notice = None;
                    writeln!(self.out, "Calculating...")?;
                    self.cues.schedule(submission.cue);
                    self.pending_reveals += 1;
                }
                Err(refusal) => {
                    writeln!(self.out, "notice: {refusal}")?;
                    self.notice = Some(refusal.to_string());
                    self.cues.schedule(refusal.cue());
                }
            },
            Command::Reset => {
                self.session.reset();
                self.notice = None;
                writeln!(self.out, "Cleared.")?;
                self.write_range()?;
            }
            Command::Rates => write!(self.out, "{}", render_rates(self.session.estimator()))?,
            Command::Log(directive) => match logging::set_log_level(&directive) {
                Ok(()) => {
                    info!(%directive, "log level changed");
                    writeln!(self.out, "log level set to '{directive}'")?;
                }
                Err(e) => writeln!(self.out, "error: {e}")?,
            },
            Command::Help => write!(self.out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn on_cue(
        &mut self,
        cue: DeferredCue,
    ) -> Result<()> {
        debug!(?cue, "cue fired");
        match cue {
            DeferredCue::RevealResults => {
                self.pending_reveals = self.pending_reveals.saturating_sub(1);
                // A reset before the cue fired leaves nothing to reveal.
                if self.session.phase() == SessionPhase::ShowingResults {
                    write!(self.out, "{}", render_session(&self.session))?;
                }
            }
            DeferredCue::DismissNotice => self.notice = None,
        }
        Ok(())
    }

    fn index_of(
        &mut self,
        year: i32,
    ) -> Result<Option<usize>> {
        let range = self.session.range();
        let index = range.position(year);
        if index.is_none() {
            writeln!(
                self.out,
                "error: {year} is outside the range {} to {}",
                range.start, range.end
            )?;
        }
        Ok(index)
    }

    fn write_range(&mut self) -> Result<()> {
        let range = self.session.range();
        if range.is_empty() {
            writeln!(
                self.out,
                "Departure {} is before arrival {}; no years to enter.",
                range.end, range.start
            )?;
        } else {
            writeln!(
                self.out,
                "Years {} to {} ({} year(s))",
                range.start,
                range.end,
                range.len()
            )?;
        }
        Ok(())
    }
}
