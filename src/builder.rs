//! This module turns a raw table [`Grid`] into a validated [`Automaton`].
//!
//! The table layout is one header row of alphabet symbols followed by body rows of
//! `[marker, state, target per symbol...]`. Validation runs in a fixed order and stops at the
//! first violation:
//!
//! 1. state names (non-empty, unique, at least one),
//! 2. alphabet symbols (non-empty, unique, at least one),
//! 3. transition targets (present for every state and symbol, naming a declared state),
//! 4. exactly one start marker,
//! 5. any number of final markers.

use std::collections::HashMap;

use crate::automaton::Automaton;
use crate::config::TableConfig;
use crate::types::{
    BuildError, Grid, StateId, SymbolId, FIRST_SYMBOL_COLUMN, MARKER_COLUMN, STATE_COLUMN,
};

/// A non-blank body row and the state it declares.
struct StateRow<'a> {
    row: usize,
    name: &'a str,
}

/// Builds an automaton from a table grid, or reports the first problem found.
///
/// The grid is only read. On success the returned automaton is complete: every state has a
/// transition for every symbol of the alphabet.
///
/// # Arguments
///
/// * `grid` - The raw table cells.
/// * `config` - Marker tokens and the position of the header row. Overlapping or empty
///   markers are rejected before the grid is read.
pub fn build(grid: &Grid, config: &TableConfig) -> Result<Automaton, BuildError> {
    config.check().map_err(BuildError::InvalidConfig)?;

    let state_rows = collect_states(grid, config)?;
    let symbols = collect_alphabet(grid, config)?;

    let index: HashMap<&str, StateId> = state_rows
        .iter()
        .enumerate()
        .map(|(i, state)| (state.name, StateId(i)))
        .collect();

    let table = collect_transitions(grid, &state_rows, &symbols, &index)?;
    let start = find_start_state(grid, config, &state_rows)?;
    let finals = find_final_states(grid, config, &state_rows);

    let automaton = Automaton::from_parts(
        state_rows.iter().map(|state| state.name.to_string()).collect(),
        symbols.iter().map(|(_, symbol)| symbol.to_string()).collect(),
        table,
        start,
        finals,
    );

    tracing::debug!(
        states = automaton.states().len(),
        symbols = automaton.alphabet().len(),
        start = automaton.start(),
        "built automaton"
    );

    Ok(automaton)
}

/// Row indices of the body: everything below the header that is not entirely blank.
fn body_rows<'a>(grid: &'a Grid, config: &TableConfig) -> impl Iterator<Item = usize> + 'a {
    (config.header_row + 1..grid.row_count()).filter(move |&row| !grid.is_blank_row(row))
}

fn collect_states<'a>(
    grid: &'a Grid,
    config: &TableConfig,
) -> Result<Vec<StateRow<'a>>, BuildError> {
    let mut states: Vec<StateRow<'a>> = Vec::new();

    for row in body_rows(grid, config) {
        let name = grid.cell(row, STATE_COLUMN).trim();
        if name.is_empty() {
            return Err(BuildError::EmptyStateName { row });
        }

        if states.iter().any(|state| state.name == name) {
            return Err(BuildError::DuplicateState(name.to_string()));
        }

        states.push(StateRow { row, name });
    }

    if states.is_empty() {
        return Err(BuildError::EmptyStateSet);
    }

    Ok(states)
}

/// Reads the alphabet from the header row, in column order.
///
/// Trailing blank header cells are padding and do not form columns; a blank cell between
/// two symbols would make the epsilon sentinel an alphabet member and is rejected.
fn collect_alphabet<'a>(
    grid: &'a Grid,
    config: &TableConfig,
) -> Result<Vec<(usize, &'a str)>, BuildError> {
    let header = grid
        .rows()
        .get(config.header_row)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let last = header
        .iter()
        .rposition(|cell| !cell.trim().is_empty())
        .filter(|&column| column >= FIRST_SYMBOL_COLUMN);

    let Some(last) = last else {
        return Err(BuildError::EmptyAlphabet);
    };

    let mut symbols: Vec<(usize, &'a str)> = Vec::new();
    for (column, cell) in header
        .iter()
        .enumerate()
        .take(last + 1)
        .skip(FIRST_SYMBOL_COLUMN)
    {
        let symbol = cell.trim();
        if symbol.is_empty() {
            return Err(BuildError::EmptySymbol { column });
        }

        if symbols.iter().any(|(_, seen)| *seen == symbol) {
            return Err(BuildError::DuplicateSymbol(symbol.to_string()));
        }

        symbols.push((column, symbol));
    }

    Ok(symbols)
}

/// Builds the dense row-major transition table (`state * alphabet_len + symbol`).
fn collect_transitions(
    grid: &Grid,
    states: &[StateRow],
    symbols: &[(usize, &str)],
    index: &HashMap<&str, StateId>,
) -> Result<Vec<StateId>, BuildError> {
    let mut table = Vec::with_capacity(states.len() * symbols.len());

    for state in states {
        for &(column, symbol) in symbols {
            let target = grid.cell(state.row, column).trim();
            if target.is_empty() {
                return Err(BuildError::UndefinedTransition {
                    state: state.name.to_string(),
                    symbol: symbol.to_string(),
                });
            }

            let Some(&next) = index.get(target) else {
                return Err(BuildError::DanglingTransitionTarget {
                    state: state.name.to_string(),
                    symbol: symbol.to_string(),
                    target: target.to_string(),
                });
            };

            table.push(next);
        }
    }

    Ok(table)
}

fn find_start_state(
    grid: &Grid,
    config: &TableConfig,
    states: &[StateRow],
) -> Result<StateId, BuildError> {
    let mut marked = states
        .iter()
        .enumerate()
        .filter(|(_, state)| has_marker(grid, state.row, &config.start_marker));

    let Some((start, first)) = marked.next() else {
        return Err(BuildError::MissingStartState(config.start_marker.clone()));
    };

    if let Some((_, second)) = marked.next() {
        return Err(BuildError::MultipleStartStates {
            first: first.name.to_string(),
            second: second.name.to_string(),
        });
    }

    Ok(StateId(start))
}

fn find_final_states(grid: &Grid, config: &TableConfig, states: &[StateRow]) -> Vec<bool> {
    states
        .iter()
        .map(|state| has_marker(grid, state.row, &config.final_marker))
        .collect()
}

fn has_marker(grid: &Grid, row: usize, marker: &str) -> bool {
    grid.cell(row, MARKER_COLUMN).contains(marker)
}

/// Position of a `(state, symbol)` entry in a dense transition table.
pub(crate) fn table_offset(state: StateId, symbol: SymbolId, alphabet_len: usize) -> usize {
    state.0 * alphabet_len + symbol.0
}
