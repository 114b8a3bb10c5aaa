//! pdfclean CLI - PDF content-tree extraction and glyph normalization

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use crossbeam_channel::Receiver;
use indicatif::{ProgressBar, ProgressStyle};

use pdfclean::render::{self, JsonFormat};
use pdfclean::{
    input, BatchReport, BatchRunner, CommaPolicy, ErrorMode, ExtractEvent, ExtractOptions,
    NormalizeOptions,
};

/// Output file written in persistence mode when `--output` is not given.
const PERSIST_OUTPUT: &str = "pdf_parsed.json";

#[derive(Parser)]
#[command(name = "pdfclean")]
#[command(version)]
#[command(about = "Extract PDF content trees and normalize glyphs for search indexing", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize an extracted JSON payload (literal, file path, or stdin)
    Clean {
        /// Literal payload or path to a payload file; stdin if omitted
        #[arg(value_name = "PAYLOAD")]
        input: Option<String>,

        #[command(flatten)]
        normalize: NormalizeArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Extract PDF files into a JSON payload
    Extract {
        /// Optional leading persistence flag (true/false), then PDF files
        #[arg(value_name = "[PERSIST] FILE", num_args = 0..)]
        args: Vec<String>,

        /// Keep decoded text as is, without normalization
        #[arg(long)]
        raw: bool,

        /// Directory for per-page SVG plots (defaults to "." when persisting)
        #[arg(long, value_name = "DIR", env = "PDFCLEAN_ARTIFACT_DIR")]
        artifact_dir: Option<PathBuf>,

        /// Hide the progress bar
        #[arg(long)]
        no_progress: bool,

        #[command(flatten)]
        normalize: NormalizeArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show version information
    Version,
}

#[derive(Args)]
struct NormalizeArgs {
    /// What a comma does to its text span
    #[arg(
        long,
        value_enum,
        default_value = "drop-span",
        env = "PDFCLEAN_COMMA_POLICY"
    )]
    comma_policy: CommaMode,

    /// Leave full-width Latin letters, digits and punctuation as they are
    #[arg(long)]
    no_fold: bool,
}

impl NormalizeArgs {
    fn options(&self) -> NormalizeOptions {
        NormalizeOptions::new()
            .with_comma_policy(self.comma_policy.into())
            .with_width_fold(!self.no_fold)
    }
}

#[derive(Args)]
struct OutputArgs {
    /// Output file (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output compact JSON
    #[arg(long)]
    compact: bool,

    /// Write a JSON summary of successes and failures
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Exit with status 1 if any document or page failed
    #[arg(long, env = "PDFCLEAN_STRICT")]
    strict: bool,

    /// Process documents and pages one at a time
    #[arg(long)]
    sequential: bool,
}

impl OutputArgs {
    fn format(&self) -> JsonFormat {
        if self.compact {
            JsonFormat::Compact
        } else {
            JsonFormat::Pretty
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum CommaMode {
    /// Drop every span that contains a comma
    DropSpan,
    /// Replace the comma with an empty glyph and keep the span
    BlankGlyph,
}

impl From<CommaMode> for CommaPolicy {
    fn from(mode: CommaMode) -> Self {
        match mode {
            CommaMode::DropSpan => CommaPolicy::DropSpan,
            CommaMode::BlankGlyph => CommaPolicy::BlankGlyph,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Clean {
            input,
            normalize,
            output,
        } => cmd_clean(input.as_deref(), &normalize, &output),
        Commands::Extract {
            args,
            raw,
            artifact_dir,
            no_progress,
            normalize,
            output,
        } => cmd_extract(&args, raw, artifact_dir, no_progress, &normalize, &output),
        Commands::Version => {
            cmd_version();
            Ok(true)
        }
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

/// Returns `Ok(false)` when `--strict` is set and something failed.
fn cmd_clean(
    raw: Option<&str>,
    normalize: &NormalizeArgs,
    output: &OutputArgs,
) -> Result<bool, Box<dyn std::error::Error>> {
    let payload = match raw {
        Some(arg) => input::load_payload(arg.as_bytes())?.into_owned(),
        None => input::load_payload_from_reader(io::stdin().lock())?,
    };
    let decoded = input::decode_documents(&payload)?;

    let options = ExtractOptions::new()
        .with_normalize(normalize.options())
        .with_parallel(!output.sequential);
    let report = BatchRunner::new(options).normalize_decoded(decoded);

    let json = render::report_to_json(&report, output.format())?;
    match &output.output {
        Some(path) => {
            fs::write(path, &json)?;
            eprintln!("{} {}", "Saved to".green(), path.display());
        }
        None => println!("{}", json),
    }

    finish(&report, output)
}

fn cmd_extract(
    args: &[String],
    raw: bool,
    artifact_dir: Option<PathBuf>,
    no_progress: bool,
    normalize: &NormalizeArgs,
    output: &OutputArgs,
) -> Result<bool, Box<dyn std::error::Error>> {
    let (persist, paths) = split_persist_flag(args);
    if paths.is_empty() {
        return Err("no input files".into());
    }

    let mut options = ExtractOptions::new()
        .with_error_mode(ErrorMode::Lenient)
        .with_parallel(!output.sequential);
    options = if raw {
        options.raw()
    } else {
        options.with_normalize(normalize.options())
    };
    let artifact_dir = match artifact_dir {
        Some(dir) => Some(dir),
        None if persist => Some(PathBuf::from(".")),
        None => None,
    };
    if let Some(dir) = artifact_dir {
        options = options.with_artifacts(dir);
    }

    let start = Instant::now();
    let report = if persist && !no_progress {
        run_with_progress(BatchRunner::new(options), paths)
    } else {
        BatchRunner::new(options).run_files(paths)
    };

    let json = render::report_to_json(&report, output.format())?;
    let target = match (&output.output, persist) {
        (Some(path), _) => Some(path.clone()),
        (None, true) => Some(PathBuf::from(PERSIST_OUTPUT)),
        (None, false) => None,
    };
    match target {
        Some(path) => fs::write(&path, &json)?,
        None => println!("{}", json),
    }

    if persist {
        println!("complete. time: {:.6}s", start.elapsed().as_secs_f64());
    }

    finish(&report, output)
}

/// Run the batch while a progress bar follows its events.
fn run_with_progress(runner: BatchRunner, paths: &[String]) -> BatchReport {
    let (tx, rx) = crossbeam_channel::unbounded();
    let runner = runner.with_events(tx);

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    std::thread::scope(|scope| {
        let tracker = scope.spawn(|| track_progress(rx, &pb));
        let report = runner.run_files(paths);
        // Closing the channel ends the tracker.
        drop(runner);
        let _ = tracker.join();
        pb.finish_and_clear();
        report
    })
}

fn track_progress(events: Receiver<ExtractEvent>, pb: &ProgressBar) {
    let mut pages = 0usize;
    for event in events.iter() {
        match event {
            ExtractEvent::PageDone { .. } => {
                pages += 1;
                pb.set_message(format!("{} pages", pages));
            }
            ExtractEvent::DocumentDone { .. } => pb.inc(1),
        }
    }
}

/// Report failures on stderr, write the summary, and decide the exit status.
fn finish(report: &BatchReport, output: &OutputArgs) -> Result<bool, Box<dyn std::error::Error>> {
    for doc in &report.documents {
        if let Some(e) = doc.error() {
            eprintln!(
                "{} document {} ({}): {}",
                "Failed".red().bold(),
                doc.index,
                doc.name,
                e
            );
        }
        for failure in &doc.page_failures {
            eprintln!(
                "{} document {} ({}) page {}: {}",
                "Warning".yellow().bold(),
                doc.index,
                doc.name,
                failure.page,
                failure.error
            );
        }
    }

    if let Some(path) = &output.report {
        write_report(report, path)?;
    }

    Ok(!output.strict || report.is_complete())
}

fn write_report(report: &BatchReport, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let json = render::summary_to_json(&report.summary(), JsonFormat::Pretty)?;
    fs::write(path, json)?;
    Ok(())
}

/// Split an optional leading persistence flag from the file arguments.
///
/// A first argument that does not parse as a boolean is a file, and
/// persistence stays on.
fn split_persist_flag(args: &[String]) -> (bool, &[String]) {
    match args.split_first() {
        Some((first, rest)) => match parse_bool(first) {
            Some(persist) => (persist, rest),
            None => (true, args),
        },
        None => (true, args),
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

fn cmd_version() {
    println!("{} {}", "pdfclean".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF content-tree extraction and glyph normalization");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_bool() {
        for s in ["1", "t", "T", "TRUE", "true", "True"] {
            assert_eq!(parse_bool(s), Some(true), "{s}");
        }
        for s in ["0", "f", "F", "FALSE", "false", "False"] {
            assert_eq!(parse_bool(s), Some(false), "{s}");
        }
        for s in ["yes", "tRuE", "", "a.pdf"] {
            assert_eq!(parse_bool(s), None, "{s}");
        }
    }

    #[test]
    fn test_split_persist_flag() {
        let args = strings(&["false", "a.pdf", "b.pdf"]);
        let (persist, paths) = split_persist_flag(&args);
        assert!(!persist);
        assert_eq!(paths, &args[1..]);

        let args = strings(&["a.pdf", "b.pdf"]);
        let (persist, paths) = split_persist_flag(&args);
        assert!(persist);
        assert_eq!(paths.len(), 2);

        let args = strings(&["1"]);
        let (persist, paths) = split_persist_flag(&args);
        assert!(persist);
        assert!(paths.is_empty());

        let (persist, paths) = split_persist_flag(&[]);
        assert!(persist);
        assert!(paths.is_empty());
    }

    #[test]
    fn test_cli_parses_extract() {
        let cli = Cli::try_parse_from([
            "pdfclean",
            "extract",
            "false",
            "a.pdf",
            "--raw",
            "--comma-policy",
            "blank-glyph",
        ])
        .unwrap();
        match cli.command {
            Commands::Extract {
                args,
                raw,
                normalize,
                ..
            } => {
                assert_eq!(args, strings(&["false", "a.pdf"]));
                assert!(raw);
                assert_eq!(normalize.options().comma_policy, CommaPolicy::BlankGlyph);
            }
            _ => panic!("expected extract"),
        }
    }

    #[test]
    fn test_clean_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.json");
        let summary = dir.path().join("summary.json");
        let cli = Cli::try_parse_from([
            "pdfclean",
            "clean",
            r#"[[], 7]"#,
            "-o",
            out.to_str().unwrap(),
            "--report",
            summary.to_str().unwrap(),
            "--strict",
        ])
        .unwrap();

        let ok = match cli.command {
            Commands::Clean {
                input,
                normalize,
                output,
            } => cmd_clean(input.as_deref(), &normalize, &output).unwrap(),
            _ => panic!("expected clean"),
        };

        assert!(!ok);
        assert_eq!(fs::read_to_string(&out).unwrap(), "[\n  [],\n  null\n]");
        let summary: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&summary).unwrap()).unwrap();
        assert_eq!(summary["failed"], 1);
        assert_eq!(summary["documents"][1]["status"], "failed");
    }
}
