//! This module defines the `Automaton` struct, an immutable and validated DFA, together with the
//! `Simulation` stepper that walks its transition graph one input symbol at a time.

use serde::Serialize;
use std::collections::HashMap;

use crate::builder::table_offset;
use crate::config::Tokenization;
use crate::report::Snapshot;
use crate::types::{RunError, StateId, SymbolId, Verdict};

/// A deterministic finite automaton with a total transition function.
///
/// States and symbols are kept in declaration order and addressed by [`StateId`] and
/// [`SymbolId`]. The transition function is a dense `states x alphabet` table, so every lookup
/// is defined. Values of this type only come out of [`crate::builder::build`], which proves
/// totality first; nothing mutates an automaton afterwards, so it can be shared freely between
/// threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automaton {
    states: Vec<String>,
    alphabet: Vec<String>,
    state_index: HashMap<String, StateId>,
    symbol_index: HashMap<String, SymbolId>,
    table: Vec<StateId>,
    start: StateId,
    finals: Vec<bool>,
}

impl Automaton {
    /// Assembles an automaton from already validated parts.
    pub(crate) fn from_parts(
        states: Vec<String>,
        alphabet: Vec<String>,
        table: Vec<StateId>,
        start: StateId,
        finals: Vec<bool>,
    ) -> Self {
        debug_assert_eq!(table.len(), states.len() * alphabet.len());
        debug_assert_eq!(finals.len(), states.len());

        let state_index = states
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), StateId(i)))
            .collect();
        let symbol_index = alphabet
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), SymbolId(i)))
            .collect();

        Self {
            states,
            alphabet,
            state_index,
            symbol_index,
            table,
            start,
            finals,
        }
    }

    /// Returns the state names in declaration order.
    pub fn states(&self) -> &[String] {
        &self.states
    }

    /// Returns the alphabet in header order.
    pub fn alphabet(&self) -> &[String] {
        &self.alphabet
    }

    /// Returns the name of the start state.
    pub fn start(&self) -> &str {
        self.name_of(self.start)
    }

    pub fn start_id(&self) -> StateId {
        self.start
    }

    /// Returns the accepting states in declaration order.
    pub fn final_states(&self) -> impl Iterator<Item = &str> + '_ {
        self.states
            .iter()
            .zip(&self.finals)
            .filter(|&(_, &is_final)| is_final)
            .map(|(name, _)| name.as_str())
    }

    /// Checks whether `state` is an accepting state. Unknown names are not accepting.
    pub fn is_final(&self, state: &str) -> bool {
        self.state_id(state).is_some_and(|id| self.finals[id.0])
    }

    pub fn state_id(&self, state: &str) -> Option<StateId> {
        self.state_index.get(state).copied()
    }

    pub fn symbol_id(&self, symbol: &str) -> Option<SymbolId> {
        self.symbol_index.get(symbol).copied()
    }

    /// Returns the name of a state, or `None` if `id` is out of range for this automaton.
    pub fn state_name(&self, id: StateId) -> Option<&str> {
        self.states.get(id.0).map(String::as_str)
    }

    /// Returns the name of a symbol, or `None` if `id` is out of range for this automaton.
    pub fn symbol_name(&self, id: SymbolId) -> Option<&str> {
        self.alphabet.get(id.0).map(String::as_str)
    }

    /// The transition function on indices.
    ///
    /// Total over the ids this automaton issues. Ids taken from a different automaton may fall
    /// outside its table, in which case the result is `None`.
    pub fn next(&self, state: StateId, symbol: SymbolId) -> Option<StateId> {
        if state.0 < self.states.len() && symbol.0 < self.alphabet.len() {
            Some(self.delta(state, symbol))
        } else {
            None
        }
    }

    /// Looks up `δ(state, symbol)` by name. `None` only when a name is not declared.
    pub fn transition(&self, state: &str, symbol: &str) -> Option<&str> {
        let state = self.state_id(state)?;
        let symbol = self.symbol_id(symbol)?;
        Some(self.name_of(self.delta(state, symbol)))
    }

    /// Unchecked lookup for ids that came out of this automaton.
    fn delta(&self, state: StateId, symbol: SymbolId) -> StateId {
        self.table[table_offset(state, symbol, self.alphabet.len())]
    }

    fn name_of(&self, state: StateId) -> &str {
        &self.states[state.0]
    }

    /// Iterates the full transition function as `(state, symbol, target)`, row by row.
    pub fn transitions(&self) -> impl Iterator<Item = (&str, &str, &str)> + '_ {
        self.states.iter().enumerate().flat_map(move |(q, state)| {
            self.alphabet.iter().enumerate().map(move |(s, symbol)| {
                let target = self.delta(StateId(q), SymbolId(s));
                (state.as_str(), symbol.as_str(), self.name_of(target))
            })
        })
    }

    /// Starts a fresh simulation at the start state.
    pub fn simulate(&self) -> Simulation<'_> {
        Simulation::new(self)
    }

    /// Decides whether the input is accepted.
    ///
    /// Every element of `input` is one symbol. A symbol outside the alphabet stops the run with
    /// [`RunError::UnknownSymbol`], whatever the verdict would otherwise have been. The empty
    /// input is accepted exactly when the start state is final.
    pub fn run<S: AsRef<str>>(&self, input: &[S]) -> Result<Verdict, RunError> {
        let mut simulation = self.simulate();
        simulation.feed(input)?;
        Ok(simulation.verdict())
    }

    /// Splits `input` into symbols with `tokenization`, then runs it.
    pub fn run_str(&self, input: &str, tokenization: &Tokenization) -> Result<Verdict, RunError> {
        self.run(&tokenization.tokenize(input))
    }

    /// Runs the input while recording every step taken.
    pub fn trace<S: AsRef<str>>(&self, input: &[S]) -> Trace {
        let mut simulation = self.simulate();
        let mut steps = Vec::with_capacity(input.len());

        let outcome = input
            .iter()
            .try_for_each(|symbol| {
                let from = simulation.state_id();
                let position = simulation.position();
                let to = simulation.step(symbol)?;

                steps.push(TraceStep {
                    position,
                    from: self.name_of(from).to_string(),
                    symbol: symbol.as_ref().to_string(),
                    to: self.name_of(to).to_string(),
                });
                Ok::<(), RunError>(())
            })
            .map(|()| simulation.verdict());

        Trace {
            input: input.iter().map(|s| s.as_ref().to_string()).collect(),
            steps,
            outcome,
        }
    }

    /// Returns a read-only projection of the five-tuple for display or serialization.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from(self)
    }
}

/// An in-progress walk over an automaton. The automaton itself is only borrowed.
#[derive(Debug, Clone)]
pub struct Simulation<'a> {
    automaton: &'a Automaton,
    state: StateId,
    position: usize,
}

impl<'a> Simulation<'a> {
    pub fn new(automaton: &'a Automaton) -> Self {
        Self {
            automaton,
            state: automaton.start,
            position: 0,
        }
    }

    /// Consumes one symbol and moves to the next state.
    ///
    /// # Returns
    ///
    /// * `Ok(StateId)` with the new current state.
    /// * `Err(RunError::UnknownSymbol)` if the symbol is not in the alphabet. The simulation
    ///   stays where it was.
    pub fn step<S: AsRef<str>>(&mut self, symbol: S) -> Result<StateId, RunError> {
        let symbol = symbol.as_ref();
        let Some(id) = self.automaton.symbol_id(symbol) else {
            return Err(RunError::UnknownSymbol {
                symbol: symbol.to_string(),
                position: self.position,
            });
        };

        let next = self.automaton.delta(self.state, id);
        tracing::trace!(
            position = self.position,
            from = self.automaton.name_of(self.state),
            symbol,
            to = self.automaton.name_of(next),
            "step"
        );

        self.state = next;
        self.position += 1;
        Ok(next)
    }

    /// Consumes every symbol of `input` in order, stopping at the first unknown one.
    pub fn feed<S: AsRef<str>>(&mut self, input: &[S]) -> Result<(), RunError> {
        for symbol in input {
            self.step(symbol)?;
        }
        Ok(())
    }

    /// Returns the name of the current state.
    pub fn state(&self) -> &'a str {
        self.automaton.name_of(self.state)
    }

    pub fn state_id(&self) -> StateId {
        self.state
    }

    /// Returns how many symbols have been consumed.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_accepting(&self) -> bool {
        self.automaton.finals[self.state.0]
    }

    /// The verdict if the input ended here.
    pub fn verdict(&self) -> Verdict {
        if self.is_accepting() {
            Verdict::Accepted
        } else {
            Verdict::Rejected
        }
    }

    /// Returns to the start state with nothing consumed.
    pub fn reset(&mut self) {
        self.state = self.automaton.start;
        self.position = 0;
    }
}

/// One transition taken during a traced run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceStep {
    pub position: usize,
    pub from: String,
    pub symbol: String,
    pub to: String,
}

/// The step-by-step record of a run and how it ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trace {
    pub input: Vec<String>,
    pub steps: Vec<TraceStep>,
    pub outcome: Result<Verdict, RunError>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use crate::config::TableConfig;
    use crate::types::Grid;

    fn starts_and_ends_with_a() -> Automaton {
        let grid = Grid::from_rows([
            vec!["", "", "a", "b"],
            vec!["-->", "q0", "q1", "q2"],
            vec!["*", "q1", "q1", "ds"],
            vec!["", "q2", "ds", "q2"],
            vec!["", "ds", "ds", "ds"],
        ]);
        build(&grid, &TableConfig::default()).unwrap()
    }

    fn chars(input: &str) -> Vec<String> {
        input.chars().map(String::from).collect()
    }

    #[test]
    fn test_accepts_aaaa() {
        let dfa = starts_and_ends_with_a();
        assert_eq!(dfa.run(&chars("aaaa")), Ok(Verdict::Accepted));
    }

    #[test]
    fn test_rejects_bbbba() {
        let dfa = starts_and_ends_with_a();
        assert_eq!(dfa.run(&chars("bbbba")), Ok(Verdict::Rejected));
    }

    #[test]
    fn test_empty_input_follows_start_state() {
        let dfa = starts_and_ends_with_a();
        assert_eq!(dfa.run::<&str>(&[]), Ok(Verdict::Rejected));

        let grid = Grid::from_rows([vec!["", "", "a"], vec!["-->*", "q0", "q0"]]);
        let accepting = build(&grid, &TableConfig::default()).unwrap();
        assert_eq!(accepting.run::<&str>(&[]), Ok(Verdict::Accepted));
    }

    #[test]
    fn test_unknown_symbol() {
        let dfa = starts_and_ends_with_a();
        assert_eq!(
            dfa.run(&chars("ac")),
            Err(RunError::UnknownSymbol {
                symbol: "c".to_string(),
                position: 1,
            })
        );
    }

    #[test]
    fn test_unknown_symbol_takes_precedence_over_acceptance() {
        let dfa = starts_and_ends_with_a();

        // "aaa" is accepted; an unknown symbol anywhere must still surface.
        for input in ["xaaa", "axaa", "aaxa", "aaax"] {
            let result = dfa.run(&chars(input));
            assert!(
                matches!(result, Err(RunError::UnknownSymbol { ref symbol, .. }) if symbol == "x"),
                "{input}: {result:?}"
            );
        }
    }

    #[test]
    fn test_epsilon_is_never_consumed() {
        let dfa = starts_and_ends_with_a();
        assert_eq!(
            dfa.run(&["a", ""]),
            Err(RunError::UnknownSymbol {
                symbol: String::new(),
                position: 1,
            })
        );
    }

    #[test]
    fn test_runs_are_deterministic() {
        let dfa = starts_and_ends_with_a();
        let inputs = ["", "a", "ab", "aba", "abba", "bab", "aaaa", "bbbba"];

        let first: Vec<_> = inputs.iter().map(|w| dfa.run(&chars(w))).collect();
        for _ in 0..3 {
            let again: Vec<_> = inputs.iter().map(|w| dfa.run(&chars(w))).collect();
            assert_eq!(first, again);
        }
    }

    #[test]
    fn test_run_str_tokenization() {
        let dfa = starts_and_ends_with_a();
        assert_eq!(
            dfa.run_str("aaa", &Tokenization::Chars),
            Ok(Verdict::Accepted)
        );
        assert_eq!(
            dfa.run_str("aba", &Tokenization::Chars),
            Ok(Verdict::Rejected)
        );

        let spaced = Tokenization::Separated {
            separator: " ".to_string(),
        };
        assert_eq!(dfa.run_str("a a a", &spaced), Ok(Verdict::Accepted));
        assert_eq!(dfa.run_str("a b a", &spaced), Ok(Verdict::Rejected));
        assert_eq!(dfa.run_str("a b", &spaced), Ok(Verdict::Rejected));
    }

    #[test]
    fn test_multi_character_symbols() {
        let grid = Grid::from_rows([
            vec!["", "", "coin", "push"],
            vec!["-->*", "locked", "unlocked", "locked"],
            vec!["", "unlocked", "unlocked", "locked"],
        ]);
        let turnstile = build(&grid, &TableConfig::default()).unwrap();

        assert_eq!(turnstile.run(&["coin", "push"]), Ok(Verdict::Accepted));
        assert_eq!(turnstile.run(&["push", "coin"]), Ok(Verdict::Rejected));
        assert!(turnstile.run(&["c", "o", "i", "n"]).is_err());
    }

    #[test]
    fn test_simulation_steps() {
        let dfa = starts_and_ends_with_a();
        let mut simulation = dfa.simulate();

        assert_eq!(simulation.state(), "q0");
        assert_eq!(simulation.position(), 0);

        simulation.step("a").unwrap();
        assert_eq!(simulation.state(), "q1");
        assert!(simulation.is_accepting());

        simulation.step("b").unwrap();
        assert_eq!(simulation.state(), "ds");
        assert_eq!(simulation.verdict(), Verdict::Rejected);

        let error = simulation.step("z").unwrap_err();
        assert_eq!(
            error,
            RunError::UnknownSymbol {
                symbol: "z".to_string(),
                position: 2,
            }
        );
        assert_eq!(simulation.state(), "ds");

        simulation.reset();
        assert_eq!(simulation.state(), "q0");
        assert_eq!(simulation.position(), 0);
    }

    #[test]
    fn test_trace_records_steps() {
        let dfa = starts_and_ends_with_a();
        let trace = dfa.trace(&chars("ab"));

        assert_eq!(trace.input, vec!["a", "b"]);
        assert_eq!(
            trace.steps,
            vec![
                TraceStep {
                    position: 0,
                    from: "q0".to_string(),
                    symbol: "a".to_string(),
                    to: "q1".to_string(),
                },
                TraceStep {
                    position: 1,
                    from: "q1".to_string(),
                    symbol: "b".to_string(),
                    to: "ds".to_string(),
                },
            ]
        );
        assert_eq!(trace.outcome, Ok(Verdict::Rejected));
    }

    #[test]
    fn test_trace_stops_at_unknown_symbol() {
        let dfa = starts_and_ends_with_a();
        let trace = dfa.trace(&chars("aca"));

        assert_eq!(trace.steps.len(), 1);
        assert_eq!(
            trace.outcome,
            Err(RunError::UnknownSymbol {
                symbol: "c".to_string(),
                position: 1,
            })
        );
    }

    #[test]
    fn test_trace_agrees_with_run() {
        let dfa = starts_and_ends_with_a();
        for input in ["", "a", "abba", "bab", "ac", "aaaa"] {
            assert_eq!(dfa.trace(&chars(input)).outcome, dfa.run(&chars(input)));
        }
    }

    #[test]
    fn test_transitions_are_total() {
        let dfa = starts_and_ends_with_a();
        let transitions: Vec<_> = dfa.transitions().collect();

        assert_eq!(transitions.len(), dfa.states().len() * dfa.alphabet().len());
        assert_eq!(transitions[0], ("q0", "a", "q1"));
        assert_eq!(transitions[7], ("ds", "b", "ds"));
        assert!(transitions
            .iter()
            .all(|(_, _, target)| dfa.state_id(target).is_some()));
    }

    #[test]
    fn test_lookup_by_name() {
        let dfa = starts_and_ends_with_a();

        assert_eq!(dfa.transition("q2", "a"), Some("ds"));
        assert_eq!(dfa.transition("q9", "a"), None);
        assert_eq!(dfa.transition("q0", "c"), None);
        assert!(dfa.is_final("q1"));
        assert!(!dfa.is_final("q0"));
        assert!(!dfa.is_final("missing"));
    }

    #[test]
    fn test_index_lookups_are_bounds_checked() {
        let dfa = starts_and_ends_with_a();
        let q0 = dfa.state_id("q0").unwrap();
        let b = dfa.symbol_id("b").unwrap();

        assert_eq!(dfa.next(q0, b).and_then(|id| dfa.state_name(id)), Some("q2"));
        assert_eq!(dfa.symbol_name(b), Some("b"));

        // Only two symbols: column 2 of state 0 must not alias into the next row.
        assert_eq!(dfa.next(StateId(0), SymbolId(2)), None);
        assert_eq!(dfa.next(StateId(4), SymbolId(0)), None);
        assert_eq!(dfa.state_name(StateId(4)), None);
        assert_eq!(dfa.symbol_name(SymbolId(2)), None);
    }

    #[test]
    fn test_ids_from_a_larger_automaton() {
        let small = starts_and_ends_with_a();
        let grid = Grid::from_rows([
            vec!["", "", "a", "b", "c"],
            vec!["-->", "p0", "p1", "p0", "p0"],
            vec!["", "p1", "p1", "p1", "p1"],
            vec!["", "p2", "p2", "p2", "p2"],
            vec!["", "p3", "p3", "p3", "p3"],
            vec!["*", "p4", "p4", "p4", "p4"],
        ]);
        let large = build(&grid, &TableConfig::default()).unwrap();

        let p4 = large.state_id("p4").unwrap();
        let c = large.symbol_id("c").unwrap();
        assert_eq!((p4.index(), c.index()), (4, 2));
        assert_eq!(small.next(p4, c), None);
        assert_eq!(small.next(small.start_id(), c), None);
    }

    #[test]
    fn test_shared_across_threads() {
        let dfa = starts_and_ends_with_a();

        std::thread::scope(|scope| {
            let handles: Vec<_> = ["aaaa", "bbbba", "aaa", "ab"]
                .into_iter()
                .map(|input| {
                    let dfa = &dfa;
                    scope.spawn(move || dfa.run(&chars(input)))
                })
                .collect();

            let verdicts: Vec<_> = handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .collect();

            assert_eq!(
                verdicts,
                vec![
                    Ok(Verdict::Accepted),
                    Ok(Verdict::Rejected),
                    Ok(Verdict::Accepted),
                    Ok(Verdict::Rejected),
                ]
            );
        });
    }
}
