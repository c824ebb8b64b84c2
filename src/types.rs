//! This module defines the core data structures and types used throughout the DFA simulator,
//! including the raw table grid, verdicts, state/symbol indices, and the error taxonomy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Rule;

/// Column holding the start/final marker cell of each body row.
pub const MARKER_COLUMN: usize = 0;
/// Column holding the state name of each body row.
pub const STATE_COLUMN: usize = 1;
/// First column holding an alphabet symbol (header) or a transition target (body).
pub const FIRST_SYMBOL_COLUMN: usize = 2;
/// The reserved "no symbol" sentinel. Never an alphabet member, never consumed.
pub const EPSILON: &str = "";

/// A two-dimensional, row-major grid of text cells as produced by a tabular reader.
///
/// Rows may be ragged; a cell that is not present reads as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Builds a grid from anything that looks like rows of string cells.
    pub fn from_rows<R, C, S>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the cell at `(row, column)`, or `""` when the grid does not reach that far.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
            .unwrap_or(EPSILON)
    }

    /// Checks whether every cell of a row is blank (or the row does not exist).
    pub fn is_blank_row(&self, row: usize) -> bool {
        self.rows
            .get(row)
            .is_none_or(|cells| cells.iter().all(|cell| cell.trim().is_empty()))
    }
}

/// Index of a state in declaration (row) order. Only an automaton hands these out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct StateId(pub(crate) usize);

impl StateId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Index of an alphabet symbol in header (column) order. Only an automaton hands these out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SymbolId(pub(crate) usize);

impl SymbolId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The binary outcome of a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Accepted,
    Rejected,
}

impl Verdict {
    pub fn is_accepted(self) -> bool {
        self == Verdict::Accepted
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Accepted => write!(f, "Accepted"),
            Verdict::Rejected => write!(f, "Rejected"),
        }
    }
}

/// Structural problems in a table that prevent it from describing a total DFA.
///
/// Row and column numbers are zero-based grid coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("No start state (marked with '{0}') found in the table")]
    MissingStartState(String),
    #[error("Only a single state may be the starting state, found '{first}' and '{second}'")]
    MultipleStartStates { first: String, second: String },
    #[error("Duplicate state: {0}")]
    DuplicateState(String),
    #[error("Duplicate symbol: {0}")]
    DuplicateSymbol(String),
    #[error("Missing transition for state {state} with input {symbol}")]
    UndefinedTransition { state: String, symbol: String },
    #[error("Transition for state {state} with input {symbol} targets undeclared state {target}")]
    DanglingTransitionTarget {
        state: String,
        symbol: String,
        target: String,
    },
    #[error("The table declares no states")]
    EmptyStateSet,
    #[error("The table declares no input symbols")]
    EmptyAlphabet,
    #[error("Row {row} has transitions but no state name")]
    EmptyStateName { row: usize },
    #[error("Header column {column} is blank; the empty string is reserved for epsilon")]
    EmptySymbol { column: usize },
    #[error("Invalid table configuration: {0}")]
    InvalidConfig(String),
}

/// Errors raised while simulating an input against a valid automaton.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum RunError {
    #[error("Symbol '{symbol}' at position {position} is not in the input alphabet")]
    UnknownSymbol { symbol: String, position: usize },
}

/// Represents the errors that can occur anywhere in the simulator pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DfaError {
    /// The table text could not be read as delimited rows and cells.
    #[error("Table parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// The table was readable but does not describe a valid DFA.
    #[error("Invalid DFA: {0}")]
    Build(#[from] BuildError),
    /// An input string contained a symbol outside the alphabet.
    #[error("Rejected: {0}")]
    Run(#[from] RunError),
    /// Reading a table or configuration file failed.
    #[error("File error: {0}")]
    FileError(String),
    /// The configuration was malformed or inconsistent.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}
