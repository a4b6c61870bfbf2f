//! CLI entrypoint for the kernlib conformance harness.

use std::io::{self, BufRead};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use kernlib_core::cmdline::{TokenizerConfig, split_cmdline_with};
use kernlib_core::errno::{self, Error};
use kernlib_core::stdio::{FormatArg, WriteDevice, vprintf};
use kernlib_core::stdlib::conversion::strtoul;
use kernlib_core::stdlib::env::EnvTable;
use kernlib_harness::execute::{OwnedArg, parse_cli_arg};
use kernlib_harness::fixtures::fixture_paths;
use kernlib_harness::structured_log::{ArtifactIndex, LogEmitter, LogLevel, now_utc};
use kernlib_harness::verify::VerificationSummary;
use kernlib_harness::{ConformanceReport, FixtureSet, HarnessError, TestRunner};

/// Conformance tooling for kernlib.
#[derive(Debug, Parser)]
#[command(name = "kernlib-harness")]
#[command(about = "Conformance testing harness for kernlib")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Verify the library against fixture files.
    Verify {
        /// Directory containing fixture JSON files.
        #[arg(long)]
        fixture: PathBuf,
        /// Output report path (markdown).
        #[arg(long)]
        report: Option<PathBuf>,
        /// Also write the report as JSON.
        #[arg(long)]
        report_json: Option<PathBuf>,
        /// Optional fixed timestamp string for deterministic report generation.
        #[arg(long)]
        timestamp: Option<String>,
        /// Write one JSONL entry per case here.
        #[arg(long)]
        log: Option<PathBuf>,
        /// Write a SHA-256 index of the produced files here.
        #[arg(long)]
        artifact_index: Option<PathBuf>,
    },
    /// Render a template to stdout.
    Render {
        /// printf-style template.
        template: String,
        /// Arguments: `int:-5`, `uint:7`, `ptr:0x10`, `char:x`, `float:1.5`,
        /// `cp:8364`, `str:text` or `null`.
        args: Vec<String>,
    },
    /// Split a command line and print one argument per line.
    ///
    /// Continuation lines for open quotes are read from stdin.
    Split {
        line: String,
        /// Variable assignment `NAME=VALUE`; repeatable.
        #[arg(long = "env")]
        env: Vec<String>,
        /// Staging limit in bytes, including terminators.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Parse an unsigned numeral.
    Strtoul {
        s: String,
        /// Radix; 0 guesses from the prefix.
        #[arg(long, default_value_t = 0)]
        base: u32,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Verify {
            fixture,
            report,
            report_json,
            timestamp,
            log,
            artifact_index,
        } => {
            eprintln!("Verifying against fixtures in {}", fixture.display());
            let mut fixture_sets = Vec::new();
            for path in fixture_paths(&fixture)? {
                match FixtureSet::from_file(&path) {
                    Ok(set) => fixture_sets.push(set),
                    Err(err) => eprintln!("Skipping {}: {}", path.display(), err),
                }
            }
            if fixture_sets.is_empty() {
                return Err(HarnessError::NoFixtures(fixture).into());
            }

            let run_id = timestamp.clone().unwrap_or_else(now_utc);
            let runner = TestRunner::new("fixture-verify");
            let mut results = Vec::new();
            match &log {
                Some(path) => {
                    let mut emitter = LogEmitter::to_file(path, &runner.campaign, &run_id)?;
                    emitter.emit(LogLevel::Info, "run_start")?;
                    for set in &fixture_sets {
                        results.extend(runner.run_logged(set, &mut emitter)?);
                    }
                    emitter.emit(LogLevel::Info, "run_end")?;
                    emitter.flush()?;
                }
                None => {
                    for set in &fixture_sets {
                        results.extend(runner.run(set));
                    }
                }
            }

            results.sort_by(|a, b| {
                a.family
                    .cmp(&b.family)
                    .then_with(|| a.case_name.cmp(&b.case_name))
            });

            let summary = VerificationSummary::from_results(results);
            let report_doc = ConformanceReport {
                title: String::from("kernlib Conformance Report"),
                timestamp: timestamp.unwrap_or_else(now_utc),
                summary,
            };

            eprintln!(
                "Verification complete: total={}, passed={}, failed={}",
                report_doc.summary.total, report_doc.summary.passed, report_doc.summary.failed
            );
            for failure in report_doc.summary.failures() {
                eprintln!(
                    "FAIL {}/{}: expected {:?}, got {:?}",
                    failure.family, failure.case_name, failure.expected, failure.actual
                );
            }

            let mut index = ArtifactIndex::new(&run_id);
            if let Some(path) = &report {
                std::fs::write(path, report_doc.to_markdown())?;
                eprintln!("Report written to {}", path.display());
                index.add_file(path, "report-markdown")?;
            }
            if let Some(path) = &report_json {
                std::fs::write(path, report_doc.to_json())?;
                index.add_file(path, "report-json")?;
            }
            if let Some(path) = &log {
                index.add_file(path, "log-jsonl")?;
            }
            if let Some(path) = artifact_index {
                std::fs::write(&path, index.to_json()?)?;
                eprintln!("Artifact index written to {}", path.display());
            }

            if !report_doc.summary.all_passed() {
                return Err(format!("{} fixture case(s) failed", report_doc.summary.failed).into());
            }
        }
        Command::Render { template, args } => {
            let owned = args
                .iter()
                .map(|arg| parse_cli_arg(arg))
                .collect::<Result<Vec<OwnedArg>, _>>()?;
            let format_args: Vec<FormatArg<'_>> =
                owned.iter().map(OwnedArg::as_format_arg).collect();

            let mut device = WriteDevice::new(io::stdout().lock());
            let count = vprintf(&mut device, template.as_bytes(), &format_args);
            if let Some(err) = device.take_error() {
                return Err(err.into());
            }
            eprintln!("\n[{count} bytes]");
        }
        Command::Split { line, env, limit } => {
            let mut table = EnvTable::new();
            for entry in &env {
                if !table.set_entry(entry.as_bytes()) {
                    return Err(format!("invalid assignment '{entry}'").into());
                }
            }
            let config = limit.map_or_else(TokenizerConfig::default, TokenizerConfig::with_limit);

            let stdin = io::stdin();
            let mut input = stdin.lock();
            let mut continuation = |buf: &mut Vec<u8>| -> Result<bool, Error> {
                eprint!("> ");
                let start = buf.len();
                match input.read_until(b'\n', buf) {
                    Ok(0) => Ok(false),
                    Ok(_) => {
                        while buf.len() > start && matches!(buf.last(), Some(b'\n' | b'\r')) {
                            buf.pop();
                        }
                        Ok(true)
                    }
                    Err(err) => Err(Error::LineSource(err.to_string())),
                }
            };

            let argv = split_cmdline_with(&config, line.as_bytes(), &mut continuation, &table)?;
            eprintln!("argc={}", argv.argc());
            for arg in argv.argv() {
                println!("{}", arg.escape_ascii());
            }
        }
        Command::Strtoul { s, base } => {
            errno::clear_last_error();
            let (value, consumed) = strtoul(s.as_bytes(), base);
            if let Some(code) = errno::clear_last_error() {
                return Err(format!("strtoul failed: {code}").into());
            }
            println!("{value} {consumed}");
        }
    }

    Ok(())
}
