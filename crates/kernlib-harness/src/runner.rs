//! Test execution engine.

use std::io::{self, Write};
use std::time::Instant;

use crate::diff;
use crate::execute::execute_fixture_case;
use crate::fixtures::{FixtureCase, FixtureSet};
use crate::structured_log::{LogEmitter, LogEntry, LogLevel, Outcome};
use crate::verify::VerificationResult;

/// Runs fixture sets and collects verification results.
pub struct TestRunner {
    /// Name of the test campaign.
    pub campaign: String,
}

impl TestRunner {
    #[must_use]
    pub fn new(campaign: impl Into<String>) -> Self {
        Self {
            campaign: campaign.into(),
        }
    }

    /// Run all cases in a set and return results.
    pub fn run(&self, fixture_set: &FixtureSet) -> Vec<VerificationResult> {
        fixture_set
            .cases
            .iter()
            .map(|case| verify_case(&fixture_set.family, case))
            .collect()
    }

    /// Like [`run`](Self::run), emitting one `case_result` entry per case.
    pub fn run_logged<W: Write>(
        &self,
        fixture_set: &FixtureSet,
        log: &mut LogEmitter<W>,
    ) -> io::Result<Vec<VerificationResult>> {
        let mut results = Vec::with_capacity(fixture_set.cases.len());
        for case in &fixture_set.cases {
            let started = Instant::now();
            let result = verify_case(&fixture_set.family, case);
            let latency_ns = u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX);

            let (level, outcome) = if result.passed {
                (LogLevel::Info, Outcome::Pass)
            } else if result.actual.starts_with("unsupported:") {
                (LogLevel::Error, Outcome::Error)
            } else {
                (LogLevel::Warn, Outcome::Fail)
            };
            let mut entry = LogEntry::new("", level, "case_result")
                .with_campaign(&self.campaign)
                .with_function(&fixture_set.family, &case.function)
                .with_case(&case.name)
                .with_outcome(outcome)
                .with_latency_ns(latency_ns);
            if let Some(code) = result.actual.strip_prefix("error:") {
                entry = entry.with_error_code(code);
            }
            if !result.passed {
                entry = entry.with_details(serde_json::json!({
                    "expected": result.expected,
                    "actual": result.actual,
                }));
            }
            log.emit_entry(entry)?;
            results.push(result);
        }
        Ok(results)
    }
}

fn verify_case(family: &str, case: &FixtureCase) -> VerificationResult {
    let actual = match execute_fixture_case(&case.function, &case.inputs) {
        Ok(output) => output,
        Err(err) => format!("unsupported:{err}"),
    };
    let passed = actual == case.expected_output;
    VerificationResult {
        family: family.to_string(),
        case_name: case.name.clone(),
        function: case.function.clone(),
        section: case.section.clone(),
        passed,
        diff: (!passed).then(|| diff::render_diff(&case.expected_output, &actual)),
        expected: case.expected_output.clone(),
        actual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structured_log::validate_log_line;

    fn fixture(cases: &str) -> FixtureSet {
        FixtureSet::from_json(&format!(
            r#"{{"version":"v1","family":"mixed","captured_at":"2026-10-16T00:00:00Z","cases":[{cases}]}}"#
        ))
        .expect("valid fixture json")
    }

    #[test]
    fn passing_cases() {
        let set = fixture(
            r#"
            {"name":"width","function":"render","section":"printf/width",
             "inputs":{"template":"[%5d]","args":[{"int":42}]},"expected_output":"[   42]"},
            {"name":"quotes","function":"split_cmdline","section":"cmdline/quoting",
             "inputs":{"line":"a \"b c\""},"expected_output":"[\"a\", \"b c\"]"},
            {"name":"hex","function":"strtoul","section":"strtoul/base",
             "inputs":{"s":"0x1f","base":16},"expected_output":"31 4"}
            "#,
        );
        let results = TestRunner::new("smoke").run(&set);
        assert_eq!(results.len(), 3);
        for r in &results {
            assert!(r.passed, "{}: {:?} != {:?}", r.case_name, r.actual, r.expected);
            assert!(r.diff.is_none());
            assert_eq!(r.family, "mixed");
        }
    }

    #[test]
    fn mismatch_carries_diff() {
        let set = fixture(
            r#"{"name":"wrong","function":"render","section":"printf/width",
                "inputs":{"template":"%d","args":[{"int":7}]},"expected_output":"8"}"#,
        );
        let results = TestRunner::new("smoke").run(&set);
        assert!(!results[0].passed);
        assert_eq!(results[0].actual, "7");
        assert!(results[0].diff.as_deref().unwrap().contains("-8\n+7\n"));
    }

    #[test]
    fn unknown_function_is_unsupported() {
        let set = fixture(
            r#"{"name":"nope","function":"memfrob","section":"x","inputs":{},"expected_output":""}"#,
        );
        let results = TestRunner::new("smoke").run(&set);
        assert!(results[0].actual.starts_with("unsupported:"));
        assert!(!results[0].passed);
    }

    #[test]
    fn logged_run_emits_valid_lines() {
        let set = fixture(
            r#"
            {"name":"ok","function":"render","section":"printf/string",
             "inputs":{"template":"%s","args":[{"str":null}]},"expected_output":"(null)"},
            {"name":"open","function":"split_cmdline","section":"cmdline/errors",
             "inputs":{"line":"\"abc"},"expected_output":"error:UnterminatedQuote"}
            "#,
        );
        let mut log = LogEmitter::new(Vec::new(), "smoke", "run-1");
        let results = TestRunner::new("smoke").run_logged(&set, &mut log).unwrap();
        assert!(results.iter().all(|r| r.passed));

        let text = String::from_utf8(log.into_inner().unwrap()).unwrap();
        let entries: Vec<LogEntry> = text
            .lines()
            .enumerate()
            .map(|(i, line)| validate_log_line(line, i + 1).unwrap())
            .collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].outcome, Some(Outcome::Pass));
        assert_eq!(entries[1].error_code.as_deref(), Some("UnterminatedQuote"));
        assert_eq!(entries[1].trace_id, "smoke::run-1::002");
    }
}
