//! Script Commands
//!
//! The four neighbor commands understood by the registry, with parsing of
//! the `BN`/`BP`/`CN`/`CP` mnemonics used on script lines.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::ring::StationId;

// =============================================================================
// Command
// =============================================================================

/// A single registry command as written on a script line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `BN i j`: build station `j` immediately after station `i`
    BuildNext { at: StationId, station: StationId },
    /// `BP i j`: build station `j` immediately before station `i`
    BuildPrev { at: StationId, station: StationId },
    /// `CN i`: close the station immediately after station `i`
    CloseNext { at: StationId },
    /// `CP i`: close the station immediately before station `i`
    ClosePrev { at: StationId },
}

impl Command {
    /// The mnemonic for this command
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Command::BuildNext { .. } => "BN",
            Command::BuildPrev { .. } => "BP",
            Command::CloseNext { .. } => "CN",
            Command::ClosePrev { .. } => "CP",
        }
    }

    /// The reference station this command resolves against
    pub fn at(&self) -> StationId {
        match *self {
            Command::BuildNext { at, .. }
            | Command::BuildPrev { at, .. }
            | Command::CloseNext { at }
            | Command::ClosePrev { at } => at,
        }
    }

    /// The new station number, for build commands
    pub fn station(&self) -> Option<StationId> {
        match *self {
            Command::BuildNext { station, .. } | Command::BuildPrev { station, .. } => {
                Some(station)
            }
            Command::CloseNext { .. } | Command::ClosePrev { .. } => None,
        }
    }

    /// Check if this command can be refused at the minimum ring size
    pub fn is_close(&self) -> bool {
        matches!(self, Command::CloseNext { .. } | Command::ClosePrev { .. })
    }
}

// =============================================================================
// Parsing
// =============================================================================

fn parse_station(mnemonic: &str, token: Option<&str>) -> Result<StationId> {
    let token =
        token.ok_or_else(|| Error::CommandParse(format!("{mnemonic}: missing station number")))?;
    token
        .parse::<u32>()
        .map(StationId::new)
        .map_err(|_| Error::CommandParse(format!("invalid station number: {token:?}")))
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut tokens = s.split_whitespace();
        let mnemonic = tokens
            .next()
            .ok_or_else(|| Error::CommandParse("empty command line".to_string()))?;

        let command = match mnemonic {
            "BN" => Command::BuildNext {
                at: parse_station(mnemonic, tokens.next())?,
                station: parse_station(mnemonic, tokens.next())?,
            },
            "BP" => Command::BuildPrev {
                at: parse_station(mnemonic, tokens.next())?,
                station: parse_station(mnemonic, tokens.next())?,
            },
            "CN" => Command::CloseNext {
                at: parse_station(mnemonic, tokens.next())?,
            },
            "CP" => Command::ClosePrev {
                at: parse_station(mnemonic, tokens.next())?,
            },
            other => return Err(Error::CommandParse(format!("unknown command: {other:?}"))),
        };

        if let Some(extra) = tokens.next() {
            return Err(Error::CommandParse(format!(
                "unexpected trailing token: {extra:?}"
            )));
        }

        Ok(command)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Command::BuildNext { at, station } | Command::BuildPrev { at, station } => {
                write!(f, "{} {} {}", self.mnemonic(), at, station)
            }
            Command::CloseNext { at } | Command::ClosePrev { at } => {
                write!(f, "{} {}", self.mnemonic(), at)
            }
        }
    }
}
