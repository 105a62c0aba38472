//! Script Runner
//!
//! Executes a command script against a ring registry. A script is a header
//! line carrying the initial station count and the command count, one line
//! of initial station numbers, then one command per line. Every command
//! that yields a report writes one station number line to the output.

use std::io::{BufRead, Lines, Write};

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::ring::{RingRegistry, StationId};
use crate::script::command::Command;

// =============================================================================
// Script Summary
// =============================================================================

/// Outcome of a completed script run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptSummary {
    /// Stations in the initial ring
    pub initial_stations: usize,
    /// Commands applied
    pub commands_applied: usize,
    /// Report lines written
    pub reports_emitted: usize,
    /// Close commands refused at the minimum ring size
    pub closes_refused: u64,
    /// Stations live after the final command
    pub final_stations: usize,
}

// =============================================================================
// Command Application
// =============================================================================

/// Apply one command to the registry.
///
/// Returns the station number to report, or `None` for a close refused at
/// the minimum ring size.
pub fn apply_command(registry: &mut RingRegistry, command: &Command) -> Result<Option<StationId>> {
    match *command {
        Command::BuildNext { at, station } => registry.build_next(at, station).map(Some),
        Command::BuildPrev { at, station } => registry.build_prev(at, station).map(Some),
        Command::CloseNext { at } => registry.close_next(at),
        Command::ClosePrev { at } => registry.close_prev(at),
    }
}

// =============================================================================
// Script Runner
// =============================================================================

/// Execute a complete script from `reader`, writing report lines to
/// `writer`.
///
/// Parse failures carry the 1-based script line they were found on. A
/// command naming a station outside the ring fails the run with the
/// registry's error.
pub fn run_script<R: BufRead, W: Write>(reader: R, mut writer: W) -> Result<ScriptSummary> {
    let mut lines = ScriptLines::new(reader);

    let (line, header) = lines.next_line()?;
    let (station_count, command_count) = parse_header(line, &header)?;

    let (line, stations) = lines.next_line()?;
    let numbers = parse_stations(line, &stations, station_count)?;

    let mut registry = RingRegistry::new(&numbers)?;
    debug!(
        stations = numbers.len(),
        commands = command_count,
        "ring built"
    );

    let mut summary = ScriptSummary {
        initial_stations: numbers.len(),
        commands_applied: 0,
        reports_emitted: 0,
        closes_refused: 0,
        final_stations: numbers.len(),
    };

    for _ in 0..command_count {
        let (line, text) = lines.next_line()?;
        let command: Command = text.parse().map_err(|err| at_line(line, err))?;
        trace!(line, command = %command, "applying");

        if let Some(report) = apply_command(&mut registry, &command)? {
            writeln!(writer, "{report}")?;
            summary.reports_emitted += 1;
        }
        summary.commands_applied += 1;
    }

    lines.finish()?;
    writer.flush()?;

    summary.closes_refused = registry.stats().closes_refused;
    summary.final_stations = registry.station_count();
    Ok(summary)
}

// =============================================================================
// Line Scanner
// =============================================================================

/// Line reader tracking 1-based line numbers
struct ScriptLines<R> {
    lines: Lines<R>,
    line: usize,
}

impl<R: BufRead> ScriptLines<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
        }
    }

    /// Next line with its number; running out of lines is a parse error
    fn next_line(&mut self) -> Result<(usize, String)> {
        match self.lines.next() {
            Some(text) => {
                self.line += 1;
                Ok((self.line, text?))
            }
            None => Err(Error::ScriptParse {
                line: self.line + 1,
                reason: "unexpected end of script".to_string(),
            }),
        }
    }

    /// Accept trailing blank lines, reject anything else
    fn finish(mut self) -> Result<()> {
        for text in self.lines.by_ref() {
            self.line += 1;
            if !text?.trim().is_empty() {
                return Err(Error::ScriptParse {
                    line: self.line,
                    reason: "unexpected content after the final command".to_string(),
                });
            }
        }
        Ok(())
    }
}

// =============================================================================
// Line Parsing
// =============================================================================

/// Parse the header line: station count, then command count
fn parse_header(line: usize, text: &str) -> Result<(usize, usize)> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() != 2 {
        return Err(Error::ScriptParse {
            line,
            reason: format!("expected 2 integers in the header, got {}", tokens.len()),
        });
    }
    Ok((
        parse_count(line, tokens[0], "station count")?,
        parse_count(line, tokens[1], "command count")?,
    ))
}

fn parse_count(line: usize, token: &str, what: &str) -> Result<usize> {
    token.parse::<usize>().map_err(|_| Error::ScriptParse {
        line,
        reason: format!("invalid {what}: {token:?}"),
    })
}

/// Parse the initial station line; the token count must match the header
fn parse_stations(line: usize, text: &str, expected: usize) -> Result<Vec<u32>> {
    let mut numbers = Vec::with_capacity(expected);
    for token in text.split_whitespace() {
        let number = token.parse::<u32>().map_err(|_| Error::ScriptParse {
            line,
            reason: format!("invalid station number: {token:?}"),
        })?;
        numbers.push(number);
    }
    if numbers.len() != expected {
        return Err(Error::ScriptParse {
            line,
            reason: format!("expected {expected} station numbers, got {}", numbers.len()),
        });
    }
    Ok(numbers)
}

/// Pin a command parse failure to its script line
fn at_line(line: usize, err: Error) -> Error {
    match err {
        Error::CommandParse(reason) => Error::ScriptParse { line, reason },
        other => other,
    }
}
