use crate::automaton::Automaton;
use crate::config::TableConfig;
use crate::parser::parse;
use crate::types::DfaError;

// Embedded sample tables
const SAMPLE_TEXTS: [(&str, &str); 3] = [
    (
        "starts-and-ends-with-a",
        include_str!("../samples/starts-and-ends-with-a.csv"),
    ),
    (
        "even-number-of-zeros",
        include_str!("../samples/even-number-of-zeros.csv"),
    ),
    (
        "binary-divisible-by-three",
        include_str!("../samples/binary-divisible-by-three.csv"),
    ),
];

/// A named, prebuilt automaton.
#[derive(Debug, Clone)]
pub struct Sample {
    pub name: &'static str,
    pub source: &'static str,
    pub automaton: Automaton,
}

lazy_static::lazy_static! {
    /// Samples are built once on first use and shared read-only afterwards.
    pub static ref SAMPLES: Vec<Sample> = load_samples();
}

fn load_samples() -> Vec<Sample> {
    SAMPLE_TEXTS
        .iter()
        .filter_map(
            |&(name, source)| match parse(source, &TableConfig::default()) {
                Ok(automaton) => Some(Sample {
                    name,
                    source,
                    automaton,
                }),
                Err(e) => {
                    tracing::warn!(sample = name, error = %e, "failed to build sample");
                    None
                }
            },
        )
        .collect()
}

pub struct SampleManager;

impl SampleManager {
    /// List all sample names
    pub fn names() -> Vec<&'static str> {
        SAMPLES.iter().map(|sample| sample.name).collect()
    }

    /// Get a sample automaton by its name
    pub fn get(name: &str) -> Result<&'static Automaton, DfaError> {
        SAMPLES
            .iter()
            .find(|sample| sample.name == name)
            .map(|sample| &sample.automaton)
            .ok_or_else(|| {
                DfaError::ConfigError(format!(
                    "Sample '{}' not found, available: {}",
                    name,
                    Self::names().join(", ")
                ))
            })
    }

    /// Get the table text a sample was built from
    pub fn source(name: &str) -> Option<&'static str> {
        SAMPLES
            .iter()
            .find(|sample| sample.name == name)
            .map(|sample| sample.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RunError, Verdict};

    fn chars(input: &str) -> Vec<String> {
        input.chars().map(String::from).collect()
    }

    #[test]
    fn test_all_samples_build() {
        assert_eq!(SAMPLES.len(), SAMPLE_TEXTS.len());
        assert_eq!(
            SampleManager::names(),
            vec![
                "starts-and-ends-with-a",
                "even-number-of-zeros",
                "binary-divisible-by-three"
            ]
        );
    }

    #[test]
    fn test_starts_and_ends_with_a_scenarios() {
        let dfa = SampleManager::get("starts-and-ends-with-a").unwrap();

        assert_eq!(dfa.run(&chars("aaaa")), Ok(Verdict::Accepted));
        assert_eq!(dfa.run(&chars("bbbba")), Ok(Verdict::Rejected));
        assert_eq!(dfa.run(&chars("")), Ok(Verdict::Rejected));
        assert_eq!(
            dfa.run(&chars("ac")),
            Err(RunError::UnknownSymbol {
                symbol: "c".to_string(),
                position: 1,
            })
        );
    }

    #[test]
    fn test_even_number_of_zeros() {
        let dfa = SampleManager::get("even-number-of-zeros").unwrap();

        assert_eq!(dfa.run(&chars("")), Ok(Verdict::Accepted));
        assert_eq!(dfa.run(&chars("1001")), Ok(Verdict::Accepted));
        assert_eq!(dfa.run(&chars("10")), Ok(Verdict::Rejected));
    }

    #[test]
    fn test_binary_divisible_by_three() {
        let dfa = SampleManager::get("binary-divisible-by-three").unwrap();

        for n in 0u32..64 {
            let expected = if n % 3 == 0 {
                Verdict::Accepted
            } else {
                Verdict::Rejected
            };
            assert_eq!(dfa.run(&chars(&format!("{n:b}"))), Ok(expected), "{n}");
        }
    }

    #[test]
    fn test_unknown_sample() {
        let error = SampleManager::get("palindromes").unwrap_err();
        assert!(matches!(error, DfaError::ConfigError(_)));
        assert!(error.to_string().contains("even-number-of-zeros"));
        assert!(SampleManager::source("palindromes").is_none());
    }
}
