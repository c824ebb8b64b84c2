//! This module provides the read-only projection of an automaton ([`Snapshot`]) and the text
//! renderings used for verbose output: the five-tuple listing, step traces, result lines,
//! JSON, and a delimited table that the parser reads back.

use serde::{Deserialize, Serialize};

use crate::automaton::{Automaton, Trace};
use crate::config::TableConfig;
use crate::types::{RunError, Verdict};

/// The five-tuple of an automaton in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub states: Vec<String>,
    pub alphabet: Vec<String>,
    pub start: String,
    pub final_states: Vec<String>,
    pub transitions: Vec<TransitionEntry>,
}

/// One entry `δ(state, symbol) = target` of the transition function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionEntry {
    pub state: String,
    pub symbol: String,
    pub target: String,
}

impl From<&Automaton> for Snapshot {
    fn from(automaton: &Automaton) -> Self {
        Self {
            states: automaton.states().to_vec(),
            alphabet: automaton.alphabet().to_vec(),
            start: automaton.start().to_string(),
            final_states: automaton.final_states().map(String::from).collect(),
            transitions: automaton
                .transitions()
                .map(|(state, symbol, target)| TransitionEntry {
                    state: state.to_string(),
                    symbol: symbol.to_string(),
                    target: target.to_string(),
                })
                .collect(),
        }
    }
}

impl Snapshot {
    /// Returns the target of `δ(state, symbol)`, if both are declared.
    pub fn target(&self, state: &str, symbol: &str) -> Option<&str> {
        self.transitions
            .iter()
            .find(|t| t.state == state && t.symbol == symbol)
            .map(|t| t.target.as_str())
    }

    /// The transitions leaving each state, in state order. `transitions` is row-major, one
    /// entry per alphabet symbol.
    pub fn rows(&self) -> impl Iterator<Item = &[TransitionEntry]> + '_ {
        self.transitions.chunks(self.alphabet.len().max(1))
    }
}

/// Lists the five-tuple, one component per line.
///
/// ```text
/// Q (States): {q0, q1}
/// Sigma (Input Alphabet): {a}
/// q0 (Start State): q0
/// F (Final States): {q1}
/// Transition Function (delta):
///   δ(q0, a) = q1
///   δ(q1, a) = q1
/// ```
pub fn render_snapshot(snapshot: &Snapshot) -> String {
    let mut out = String::new();

    out.push_str(&format!("Q (States): {}\n", format_set(&snapshot.states)));
    out.push_str(&format!(
        "Sigma (Input Alphabet): {}\n",
        format_set(&snapshot.alphabet)
    ));
    out.push_str(&format!("q0 (Start State): {}\n", snapshot.start));
    out.push_str(&format!(
        "F (Final States): {}\n",
        format_set(&snapshot.final_states)
    ));
    out.push_str("Transition Function (delta):\n");
    for t in &snapshot.transitions {
        out.push_str(&format!("  δ({}, {}) = {}\n", t.state, t.symbol, t.target));
    }

    out
}

/// Renders each step of a trace followed by the result line for `input`, the text the trace
/// was tokenized from.
pub fn render_trace(input: &str, trace: &Trace) -> String {
    let mut out = String::new();

    for step in &trace.steps {
        out.push_str(&format!(
            "  {}: {} --{}--> {}\n",
            step.position, step.from, step.symbol, step.to
        ));
    }

    out.push_str(&result_line(input, &trace.outcome));
    out.push('\n');
    out
}

/// The one-line summary of a run: `Result for string 'w': Accepted`.
///
/// An unknown symbol is reported as a rejection together with its cause.
pub fn result_line(input: &str, outcome: &Result<Verdict, RunError>) -> String {
    match outcome {
        Ok(verdict) => format!("Result for string '{input}': {verdict}"),
        Err(e) => format!("Result for string '{input}': {} ({e})", Verdict::Rejected),
    }
}

/// Serializes a snapshot as pretty-printed JSON.
pub fn to_json(snapshot: &Snapshot) -> serde_json::Result<String> {
    serde_json::to_string_pretty(snapshot)
}

/// Writes the snapshot back out as a comma separated table in the layout the builder reads,
/// using the markers from `config`. Rows above `config.header_row` are left empty.
pub fn to_table(snapshot: &Snapshot, config: &TableConfig) -> String {
    let mut lines: Vec<String> = vec![String::new(); config.header_row];

    let header = ["".to_string(), "".to_string()]
        .into_iter()
        .chain(snapshot.alphabet.iter().map(|symbol| quote_cell(symbol)));
    lines.push(header.collect::<Vec<_>>().join(","));

    for (state, row) in snapshot.states.iter().zip(snapshot.rows()) {
        let mut marker = String::new();
        if *state == snapshot.start {
            marker.push_str(&config.start_marker);
        }
        if snapshot.final_states.contains(state) {
            marker.push_str(&config.final_marker);
        }

        let targets = row.iter().map(|t| quote_cell(&t.target));

        let row = [quote_cell(&marker), quote_cell(state)]
            .into_iter()
            .chain(targets)
            .collect::<Vec<_>>()
            .join(",");
        lines.push(row);
    }

    lines.join("\n") + "\n"
}

fn format_set(items: &[String]) -> String {
    format!("{{{}}}", items.join(", "))
}

/// Quotes a cell when it would otherwise be misread by the table parser.
fn quote_cell(cell: &str) -> String {
    let needs_quotes = cell.contains([',', '"', '\n', '\r'])
        || cell.starts_with('\'')
        || cell.trim() != cell;

    if needs_quotes {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}
