//! This crate provides the core logic for a deterministic finite automaton simulator.
//! It includes modules for reading transition tables, validating them into total automata,
//! running input strings against them, and rendering their contents for verbose output.

pub mod automaton;
pub mod builder;
pub mod config;
pub mod loader;
pub mod parser;
pub mod report;
pub mod samples;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the `Automaton` struct and its stepper from the automaton module.
pub use automaton::{Automaton, Simulation, Trace, TraceStep};
/// Re-exports the `build` function from the builder module.
pub use builder::build;
/// Re-exports the configuration types from the config module.
pub use config::{TableConfig, Tokenization};
/// Re-exports the `AutomatonLoader` struct from the loader module.
pub use loader::AutomatonLoader;
/// Re-exports the table parsing functions from the parser module.
pub use parser::{parse, parse_table, Delimiter};
/// Re-exports the snapshot types from the report module.
pub use report::{Snapshot, TransitionEntry};
/// Re-exports `SampleManager` and `SAMPLES` from the samples module.
pub use samples::{SampleManager, SAMPLES};
/// Re-exports the core value and error types from the types module.
pub use types::{BuildError, DfaError, Grid, RunError, StateId, SymbolId, Verdict};
