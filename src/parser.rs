//! This module provides the tabular reader for DFA transition tables, utilizing the `pest` crate.
//! It turns delimited text (comma or tab separated) into a [`Grid`] of cells, and offers a
//! one-call `parse` that also builds the automaton.

use crate::{
    automaton::Automaton,
    builder::build,
    config::TableConfig,
    types::{DfaError, Grid},
};
use pest::{iterators::Pair, Parser as PestParser};
use pest_derive::Parser as PestParser;
use std::path::Path;

/// Derives a `PestParser` for the table grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct TableParser;

/// The cell separator of a table.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
}

impl Delimiter {
    /// Picks the delimiter from a file extension: `.tsv` is tab separated, anything else comma.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("tsv") => Delimiter::Tab,
            _ => Delimiter::Comma,
        }
    }

    fn rule(self) -> Rule {
        match self {
            Delimiter::Comma => Rule::csv_table,
            Delimiter::Tab => Rule::tsv_table,
        }
    }
}

/// Parses comma separated table text and builds the automaton it describes.
///
/// # Returns
///
/// * `Ok(Automaton)` if the text is a well-formed table of a total DFA.
/// * `Err(DfaError::ParseError)` if the text is not a readable table.
/// * `Err(DfaError::Build)` if the table does not describe a valid DFA.
pub fn parse(input: &str, config: &TableConfig) -> Result<Automaton, DfaError> {
    let grid = parse_table(input, Delimiter::Comma)?;
    Ok(build(&grid, config)?)
}

/// Parses delimited text into a grid of cells.
///
/// A leading byte order mark and trailing line breaks are ignored. Bare cells are trimmed and
/// lose a leading apostrophe (the spreadsheet prefix for forcing text, as in `'-->`); quotes
/// after the first character of a bare cell are plain text. Quoted cells are kept verbatim apart
/// from unescaping doubled quotes, and spaces outside their quotes are dropped.
pub fn parse_table(input: &str, delimiter: Delimiter) -> Result<Grid, DfaError> {
    let input = input
        .strip_prefix('\u{feff}')
        .unwrap_or(input)
        .trim_end_matches(['\r', '\n']);

    let rows = TableParser::parse(delimiter.rule(), input)
        .map_err(|e| DfaError::ParseError(Box::new(e)))?
        .flat_map(Pair::into_inner)
        .filter(|pair| matches!(pair.as_rule(), Rule::csv_row | Rule::tsv_row))
        .map(parse_row)
        .collect();

    Ok(Grid::new(rows))
}

/// Parses the cells of a single `csv_row` or `tsv_row`.
fn parse_row(pair: Pair<Rule>) -> Vec<String> {
    pair.into_inner()
        .map(|cell| match cell.as_rule() {
            Rule::quoted => cell
                .into_inner()
                .next()
                .map(|text| text.as_str().replace("\"\"", "\""))
                .unwrap_or_default(),
            _ => parse_bare(cell.as_str()),
        })
        .collect()
}

fn parse_bare(input: &str) -> String {
    let cell = input.trim();
    cell.strip_prefix('\'').unwrap_or(cell).to_string()
}
