//! Benchmark output parsing.
//!
//! The executable prints one line per structure, for example
//!
//! ```text
//! [skiplist] inserts: 12.345 ms, search hit: 3.210 ms, search miss: 4.000 ms (ignore=7)
//! ```
//!
//! A [`LineGrammar`] pulls those lines out of the captured output; the
//! [`Parser`] folds them into a [`RunResult`]. Anything else the executable
//! prints is ignored.

use super::{RunResult, Timings};
use crate::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

static OLYMPICS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^\[(?P<name>[^\]]+)\]\s+inserts:\s+(?P<ins>[\d.]+)\s+ms,\s+search hit:\s+(?P<hit>[\d.]+)\s+ms,\s+search miss:\s+(?P<miss>[\d.]+)\s+ms",
    )
    .expect("measurement line pattern is valid")
});

/// One recognized measurement line.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementLine {
    /// Structure name, trimmed
    pub name: String,
    /// Insert phase in milliseconds
    pub insert_ms: f64,
    /// Search-hit phase in milliseconds
    pub search_hit_ms: f64,
    /// Search-miss phase in milliseconds
    pub search_miss_ms: f64,
}

impl MeasurementLine {
    /// Convert into timings with the derived total.
    pub fn timings(&self) -> Timings {
        Timings::new(self.insert_ms, self.search_hit_ms, self.search_miss_ms)
    }
}

/// A textual line format emitted by some benchmark executable.
///
/// Additional output formats are supported by adding grammars to the
/// [`Parser`]; nothing downstream of parsing changes.
pub trait LineGrammar: Send + Sync {
    /// Short identifier used in logs.
    fn id(&self) -> &str;

    /// Extract every measurement line from `output`, in order of appearance.
    fn scan(&self, output: &str) -> Vec<MeasurementLine>;
}

/// The `[name] inserts: X ms, search hit: Y ms, search miss: Z ms` format.
#[derive(Debug, Clone, Copy, Default)]
pub struct OlympicsGrammar;

impl LineGrammar for OlympicsGrammar {
    fn id(&self) -> &str {
        "olympics"
    }

    fn scan(&self, output: &str) -> Vec<MeasurementLine> {
        OLYMPICS_LINE
            .captures_iter(output)
            .filter_map(|caps| {
                let name = caps["name"].trim();
                let parsed = (
                    parse_ms(&caps["ins"]),
                    parse_ms(&caps["hit"]),
                    parse_ms(&caps["miss"]),
                );
                match parsed {
                    (Some(insert_ms), Some(search_hit_ms), Some(search_miss_ms))
                        if !name.is_empty() =>
                    {
                        Some(MeasurementLine {
                            name: name.to_string(),
                            insert_ms,
                            search_hit_ms,
                            search_miss_ms,
                        })
                    }
                    _ => {
                        tracing::warn!(line = &caps[0], "Skipping malformed measurement line");
                        None
                    }
                }
            })
            .collect()
    }
}

fn parse_ms(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0)
}

/// Turns captured executable output into a [`RunResult`].
pub struct Parser {
    grammars: Vec<Box<dyn LineGrammar>>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Create a parser that understands the default line format.
    pub fn new() -> Self {
        Self {
            grammars: vec![Box::new(OlympicsGrammar)],
        }
    }

    /// Add another accepted line format.
    pub fn with_grammar(mut self, grammar: impl LineGrammar + 'static) -> Self {
        self.grammars.push(Box::new(grammar));
        self
    }

    /// Parse the output of one repetition.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoMeasurementsParsed`] when no grammar matches a
    /// single line.
    pub fn parse(&self, output: &str, repetition: usize) -> Result<RunResult> {
        let mut result = RunResult::new();

        for grammar in &self.grammars {
            for line in grammar.scan(output) {
                if result.insert(line.name.clone(), line.timings()).is_some() {
                    tracing::debug!(
                        grammar = grammar.id(),
                        name = %line.name,
                        "Structure reported twice, keeping the later line"
                    );
                }
            }
        }

        if result.is_empty() {
            return Err(Error::NoMeasurementsParsed { repetition });
        }

        tracing::debug!(repetition, structures = result.len(), "Parsed repetition output");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAMPLE: &str = "\
Benchmark with N_insert=100000, N_hit=100000, N_miss=100000, seed=42
[skiplist] inserts: 35.120 ms, search hit: 20.004 ms, search miss: 21.500 ms (ignore=99)
[list]     inserts: 0.912 ms, search hit: 5012.750 ms, search miss: 9980.001 ms (ignore=99)

Summary (wall-clock CPU time):
  skiplist total: 76.624 ms
  list     total: 14993.663 ms
Speedup (list/skiplist): 195.68x (lower is slower)
";

    #[test]
    fn test_parse_executable_output() {
        let run = Parser::new().parse(SAMPLE, 1).unwrap();
        assert_eq!(run.len(), 2);

        let skiplist = run.get("skiplist").unwrap();
        assert_eq!(skiplist.insert_ms, 35.120);
        assert_eq!(skiplist.search_hit_ms, 20.004);
        assert_eq!(skiplist.search_miss_ms, 21.500);
        assert!((skiplist.total_ms - 76.624).abs() < 1e-9);

        let list = run.get("list").unwrap();
        assert_eq!(list.search_miss_ms, 9980.001);
    }

    #[test]
    fn test_name_is_trimmed() {
        let run = Parser::new()
            .parse("[  hash map ] inserts: 1 ms, search hit: 2 ms, search miss: 3 ms", 1)
            .unwrap();
        assert!(run.get("hash map").is_some());
    }

    #[test]
    fn test_blank_name_is_skipped() {
        let output = "\
[   ] inserts: 1.0 ms, search hit: 2.0 ms, search miss: 3.0 ms
[list] inserts: 4.0 ms, search hit: 5.0 ms, search miss: 6.0 ms
";
        let run = Parser::new().parse(output, 1).unwrap();
        assert_eq!(run.names().collect::<Vec<_>>(), vec!["list"]);
        assert!(run.get("").is_none());
    }

    #[test]
    fn test_lines_must_start_at_line_start() {
        let output = "prefix [list] inserts: 1.0 ms, search hit: 2.0 ms, search miss: 3.0 ms\n";
        let err = Parser::new().parse(output, 3).unwrap_err();
        assert!(matches!(err, Error::NoMeasurementsParsed { repetition: 3 }));
    }

    #[test]
    fn test_no_measurements_is_an_error() {
        let err = Parser::new().parse("segfault\n", 2).unwrap_err();
        assert!(matches!(err, Error::NoMeasurementsParsed { repetition: 2 }));
    }

    #[test]
    fn test_malformed_number_is_skipped() {
        let output = "\
[bad] inserts: 1.2.3 ms, search hit: 2.0 ms, search miss: 3.0 ms
[good] inserts: 1.0 ms, search hit: 2.0 ms, search miss: 3.0 ms
";
        let run = Parser::new().parse(output, 1).unwrap();
        assert_eq!(run.len(), 1);
        assert!(run.get("bad").is_none());
    }

    struct CsvGrammar;

    impl LineGrammar for CsvGrammar {
        fn id(&self) -> &str {
            "csv"
        }

        fn scan(&self, output: &str) -> Vec<MeasurementLine> {
            output
                .lines()
                .filter_map(|line| line.strip_prefix("csv,"))
                .filter_map(|rest| {
                    let fields: Vec<&str> = rest.split(',').collect();
                    Some(MeasurementLine {
                        name: fields.first()?.to_string(),
                        insert_ms: fields.get(1)?.parse().ok()?,
                        search_hit_ms: fields.get(2)?.parse().ok()?,
                        search_miss_ms: fields.get(3)?.parse().ok()?,
                    })
                })
                .collect()
        }
    }

    #[test]
    fn test_additional_grammar() {
        let output = "csv,btree,1,2,3\n[list] inserts: 4 ms, search hit: 5 ms, search miss: 6 ms\n";
        let run = Parser::new().with_grammar(CsvGrammar).parse(output, 1).unwrap();
        assert_eq!(run.len(), 2);
        assert_eq!(run.get("btree").unwrap().total_ms, 6.0);
    }

    fn structure_name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_]{0,11}"
    }

    proptest! {
        #[test]
        fn prop_parser_recovers_every_line(
            entries in prop::collection::btree_map(
                structure_name(),
                (0u32..1_000_000, 0u32..1_000_000, 0u32..1_000_000),
                1..8,
            )
        ) {
            let mut output = String::from("warming up\n");
            for (name, (ins, hit, miss)) in &entries {
                output.push_str(&format!(
                    "[{}] inserts: {:.3} ms, search hit: {:.3} ms, search miss: {:.3} ms (ignore=0)\nnoise\n",
                    name,
                    *ins as f64 / 1000.0,
                    *hit as f64 / 1000.0,
                    *miss as f64 / 1000.0,
                ));
            }

            let run = Parser::new().parse(&output, 1).unwrap();
            prop_assert_eq!(run.len(), entries.len());

            for (name, (ins, hit, miss)) in &entries {
                let t = run.get(name).unwrap();
                let (ins, hit, miss) = (*ins as f64 / 1000.0, *hit as f64 / 1000.0, *miss as f64 / 1000.0);
                prop_assert!((t.insert_ms - ins).abs() < 1e-9);
                prop_assert!((t.search_hit_ms - hit).abs() < 1e-9);
                prop_assert!((t.search_miss_ms - miss).abs() < 1e-9);
                prop_assert!((t.total_ms - (ins + hit + miss)).abs() < 1e-6);
            }
        }
    }
}
