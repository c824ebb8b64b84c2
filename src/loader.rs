//! This module provides the `AutomatonLoader` struct, responsible for reading transition tables
//! from files, strings, and directories and turning them into automata.

use crate::automaton::Automaton;
use crate::builder::build;
use crate::config::TableConfig;
use crate::parser::{parse_table, Delimiter};
use crate::types::DfaError;
use std::fs;
use std::path::{Path, PathBuf};

/// File extensions recognised as transition tables.
pub const TABLE_EXTENSIONS: [&str; 2] = ["csv", "tsv"];

/// `AutomatonLoader` is a utility struct for loading automata from transition tables.
pub struct AutomatonLoader;

impl AutomatonLoader {
    /// Loads an automaton from a `.csv` or `.tsv` table file.
    ///
    /// # Returns
    ///
    /// * `Ok(Automaton)` if the file is read, parsed, and describes a valid DFA.
    /// * `Err(DfaError::FileError)` if the file cannot be read.
    /// * `Err(DfaError::ParseError)` or `Err(DfaError::Build)` if its content is not a valid table.
    pub fn load(path: &Path, config: &TableConfig) -> Result<Automaton, DfaError> {
        let content = fs::read_to_string(path).map_err(|e| {
            DfaError::FileError(format!(
                "The file '{}' could not be read: {}",
                path.display(),
                e
            ))
        })?;

        let grid = parse_table(&content, Delimiter::from_path(path))?;
        let automaton = build(&grid, config)?;

        tracing::debug!(path = %path.display(), "loaded automaton");
        Ok(automaton)
    }

    /// Loads an automaton from comma separated table text.
    pub fn load_from_string(content: &str, config: &TableConfig) -> Result<Automaton, DfaError> {
        crate::parser::parse(content, config)
    }

    /// Loads every table file (`.csv` or `.tsv`) in a directory.
    ///
    /// Subdirectories and other files are skipped. Each table yields its own result, so one
    /// broken table does not hide the others.
    pub fn load_all(
        directory: &Path,
        config: &TableConfig,
    ) -> Vec<Result<(PathBuf, Automaton), DfaError>> {
        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(DfaError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        let mut results: Vec<_> = entries
            .filter_map(|entry| {
                let path = match entry {
                    Ok(entry) => entry.path(),
                    Err(e) => {
                        return Some(Err(DfaError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                if path.is_dir() || !is_table_file(&path) {
                    return None;
                }

                match Self::load(&path, config) {
                    Ok(automaton) => Some(Ok((path, automaton))),
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "skipping table");
                        Some(Err(e))
                    }
                }
            })
            .collect();

        // Directory order is platform dependent.
        results.sort_by(|a, b| match (a, b) {
            (Ok((a, _)), Ok((b, _))) => a.cmp(b),
            (Ok(_), Err(_)) => std::cmp::Ordering::Less,
            (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
            (Err(_), Err(_)) => std::cmp::Ordering::Equal,
        });

        results
    }
}

fn is_table_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            TABLE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}
