//! Line counting tool for source trees.
//!
//! Walks a directory recursively, classifies every line of the selected
//! file types as code, comment, or whitespace, and prints a per-type
//! breakdown, grand totals, and a proportional distribution chart.
//!
//! Supported file types: C/C++ (c, cc, cpp, h, hh, hpp), Objective-C
//! (m, mm), C# (cs), Java, Go, Rust, JavaScript and TypeScript (js, jsx,
//! ts, tsx), Swift, Scala, Python (py), and Lua (lua).

mod classify;
mod error;
mod tags;

use std::collections::BTreeMap;
use std::fmt::Write as FmtWrite;
use std::fs;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, Instant};

use clap::{ArgAction, Parser};
use colored::*;
use rayon::prelude::*;

use classify::{LineClassifier, LineCounts};
use error::Error;

// Fixed width for the type and distribution label columns.
const LABEL_WIDTH: usize = 12;
const TABLE_WIDTH: usize = 66;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Counts code, comment, and whitespace lines per source file type",
    after_help = supported_types_help()
)]
struct Args {
    /// Comma-separated source file types to count, e.g. `cpp,h,py`
    #[arg(short, long, required = true, value_delimiter = ',', value_name = "TYPES")]
    files: Vec<String>,

    /// Root of the recursive search
    #[arg(default_value = ".")]
    path: String,

    /// Directory suffix to skip while walking (repeatable)
    #[arg(short, long, action = ArgAction::Append, value_name = "DIR")]
    ignore: Vec<String>,

    /// Print per-file counts before the summary
    #[arg(short, long)]
    verbose: bool,
}

fn supported_types_help() -> String {
    format!(
        "Supported file types: {}",
        tags::SUPPORTED_EXTENSIONS.join(", ")
    )
}

/// One file selected by the walk, extension already normalized to the
/// lowercase registry form.
#[derive(Debug)]
struct Candidate {
    path: PathBuf,
    extension: String,
}

/// Counts for one classified file plus the number of raw lines read.
#[derive(Debug, Clone, Copy)]
struct FileCounts {
    counts: LineCounts,
    lines: u64,
}

/// Per-file classification result, kept in walk order until merged.
#[derive(Debug)]
struct FileOutcome {
    path: PathBuf,
    extension: String,
    result: Result<FileCounts, Error>,
}

#[derive(Debug, Default)]
struct ExtensionStats {
    files: u64,
    lines: u64,
    counts: LineCounts,
}

/// Aggregated results for a whole run. `lines_processed` is the number of
/// raw lines read; a line holding both code and a trailing comment counts
/// once here but in two categories of `totals`.
#[derive(Debug, Default)]
struct RunSummary {
    files_read: u64,
    lines_processed: u64,
    totals: LineCounts,
    by_extension: BTreeMap<String, ExtensionStats>,
    failures: Vec<Error>,
}

/// Reads a file line by line, converting invalid UTF-8 sequences to
/// replacement characters so a stray binary file cannot abort a run.
struct LossyLineReader {
    reader: BufReader<Box<dyn Read + Send>>,
    buffer: Vec<u8>,
}

impl LossyLineReader {
    fn open(path: &Path) -> io::Result<Self> {
        let file = fs::File::open(path)?;
        Ok(Self::from_reader(Box::new(file)))
    }

    fn from_reader(reader: Box<dyn Read + Send>) -> Self {
        Self {
            reader: BufReader::new(reader),
            buffer: Vec::with_capacity(8 * 1024),
        }
    }

    #[cfg(test)]
    fn with_reader<R: Read + Send + 'static>(reader: R) -> Self {
        Self::from_reader(Box::new(reader))
    }
}

impl Iterator for LossyLineReader {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buffer.clear();
        match self.reader.read_until(b'\n', &mut self.buffer) {
            Ok(0) => None,
            Ok(_) => {
                let text = String::from_utf8_lossy(&self.buffer);
                let line = text.trim_end_matches(['\n', '\r']).to_string();
                Some(Ok(line))
            }
            Err(err) => Some(Err(err)),
        }
    }
}

/// Normalizes the `--files` list against the registry. Duplicates collapse;
/// entries keep first-appearance order. Unknown types fail the whole run.
fn requested_extensions(raw: &[String]) -> Result<Vec<String>, Error> {
    let mut extensions = Vec::new();
    for entry in raw {
        let normalized = entry.trim().trim_start_matches('.').to_lowercase();
        if tags::lookup(&normalized).is_none() {
            return Err(Error::UnsupportedFileType(entry.trim().to_string()));
        }
        if !extensions.iter().any(|e| *e == normalized) {
            extensions.push(normalized);
        }
    }
    Ok(extensions)
}

/// Returns the normalized extension when `path` matches the requested set.
fn matching_extension(path: &Path, extensions: &[String]) -> Option<String> {
    let extension = path.extension()?.to_str()?.to_lowercase();
    extensions
        .iter()
        .any(|e| *e == extension)
        .then_some(extension)
}

/// Walks `dir` depth-first with entries in name order, collecting files
/// whose extension is in `extensions`. Unreadable directories and entries
/// are reported, recorded as failures, and skipped.
fn collect_source_files(
    dir: &Path,
    extensions: &[String],
    ignore: &[String],
    candidates: &mut Vec<Candidate>,
    failures: &mut Vec<Error>,
) {
    if ignore.iter().any(|d| dir.ends_with(Path::new(d))) {
        return;
    }

    let read_dir = match fs::read_dir(dir) {
        Ok(read_dir) => read_dir,
        Err(err) => {
            eprintln!("Error reading directory {}: {}", dir.display(), err);
            failures.push(Error::FileRead {
                path: dir.to_path_buf(),
                source: err,
            });
            return;
        }
    };

    let mut entries = Vec::new();
    for entry_result in read_dir {
        match entry_result {
            Ok(entry) => entries.push(entry),
            Err(err) => {
                eprintln!("Error reading entry in {}: {}", dir.display(), err);
                failures.push(Error::FileRead {
                    path: dir.to_path_buf(),
                    source: err,
                });
            }
        }
    }
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(err) => {
                eprintln!("Error getting file type for {}: {}", path.display(), err);
                failures.push(Error::FileRead { path, source: err });
                continue;
            }
        };
        if file_type.is_dir() {
            collect_source_files(&path, extensions, ignore, candidates, failures);
        } else if file_type.is_file() {
            if let Some(extension) = matching_extension(&path, extensions) {
                candidates.push(Candidate { path, extension });
            }
        }
        // Symlinks and special files are skipped to avoid cycles.
    }
}

/// Reads one file and classifies every line with a fresh classifier.
fn classify_file(path: &Path, extension: &str) -> Result<FileCounts, Error> {
    let read_error = |source| Error::FileRead {
        path: path.to_path_buf(),
        source,
    };

    let mut classifier = LineClassifier::for_extension(extension)?;
    let mut lines = 0u64;
    for line in LossyLineReader::open(path).map_err(read_error)? {
        let line = line.map_err(read_error)?;
        lines += 1;
        classifier.classify(&line);
    }
    Ok(FileCounts {
        counts: classifier.counts(),
        lines,
    })
}

/// Folds per-file outcomes into the run summary. Extensions aggregate in
/// sorted order; failed files join the walk failures in walk order.
fn merge_outcomes(outcomes: Vec<FileOutcome>, walk_failures: Vec<Error>) -> RunSummary {
    let mut summary = RunSummary {
        failures: walk_failures,
        ..RunSummary::default()
    };
    for outcome in outcomes {
        match outcome.result {
            Ok(file) => {
                summary.files_read += 1;
                summary.lines_processed += file.lines;
                summary.totals.accumulate(file.counts);
                let stats = summary.by_extension.entry(outcome.extension).or_default();
                stats.files += 1;
                stats.lines += file.lines;
                stats.counts.accumulate(file.counts);
            }
            Err(err) => summary.failures.push(err),
        }
    }
    summary
}

fn print_verbose_counts(outcomes: &[FileOutcome]) {
    for outcome in outcomes {
        if let Ok(file) = &outcome.result {
            println!("File: {}", outcome.path.display());
            println!("  Code lines: {}", file.counts.code);
            println!("  Comment lines: {}", file.counts.comment);
            println!("  Whitespace lines: {}", file.counts.whitespace);
            println!();
        }
    }
}

fn safe_rate(value: u64, elapsed_secs: f64) -> f64 {
    if elapsed_secs <= f64::EPSILON {
        0.0
    } else {
        value as f64 / elapsed_secs
    }
}

fn safe_percentage(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        (numerator as f64 / denominator as f64) * 100.0
    }
}

fn format_breakdown_row(label: &str, files: u64, lines: u64, counts: &LineCounts) -> String {
    format!(
        "{:<width$} {:>8} {:>10} {:>10} {:>11} {:>10}",
        label,
        files,
        counts.code,
        counts.comment,
        counts.whitespace,
        lines,
        width = LABEL_WIDTH
    )
}

/// One chart row: label, rounded percentage, and a `#` bar whose length
/// equals the percentage. A zero denominator renders as 0% with no bar.
fn distribution_row(label: &str, count: u64, total: u64, color: Color) -> String {
    let percent = safe_percentage(count, total).round() as u64;
    let bar = "#".repeat(percent as usize);
    format!(
        "{:<width$} {:>3}%  {}",
        label,
        percent,
        bar.color(color),
        width = LABEL_WIDTH
    )
}

/// Renders the full end-of-run report as a string.
fn build_summary_report(summary: &RunSummary, elapsed: Duration) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "\n{}", "Breakdown by file type:".blue().bold());
    let _ = writeln!(output, "{}", "-".repeat(TABLE_WIDTH));
    let _ = writeln!(
        output,
        "{:<width$} {:>8} {:>10} {:>10} {:>11} {:>10}",
        "Type",
        "Files",
        "Code",
        "Comments",
        "Whitespace",
        "Lines",
        width = LABEL_WIDTH
    );
    let _ = writeln!(output, "{}", "-".repeat(TABLE_WIDTH));
    for (extension, stats) in &summary.by_extension {
        let _ = writeln!(
            output,
            "{}",
            format_breakdown_row(extension, stats.files, stats.lines, &stats.counts)
        );
    }
    let _ = writeln!(output, "{}", "-".repeat(TABLE_WIDTH));
    let _ = writeln!(
        output,
        "{}",
        format_breakdown_row(
            "total",
            summary.files_read,
            summary.lines_processed,
            &summary.totals
        )
    );

    let _ = writeln!(output, "\n{}", "Summary:".blue().bold());
    let _ = writeln!(
        output,
        "Total number of files read: {}",
        summary.files_read.to_string().bright_yellow()
    );
    if summary.failures.is_empty() {
        let _ = writeln!(
            output,
            "Total number of files failed: {}",
            "0".bright_yellow()
        );
    } else {
        let _ = writeln!(
            output,
            "Total number of files failed: {}",
            summary.failures.len().to_string().red().bold()
        );
        for failure in &summary.failures {
            let _ = writeln!(output, "  {}", failure);
        }
    }
    let _ = writeln!(
        output,
        "Total lines of code: {}",
        summary.totals.code.to_string().bright_yellow()
    );
    let _ = writeln!(
        output,
        "Total lines of comments: {}",
        summary.totals.comment.to_string().bright_yellow()
    );
    let _ = writeln!(
        output,
        "Total lines of whitespace: {}",
        summary.totals.whitespace.to_string().bright_yellow()
    );
    let _ = writeln!(
        output,
        "Total lines processed: {}",
        summary.lines_processed.to_string().bright_yellow()
    );

    let secs = elapsed.as_secs_f64();
    let _ = writeln!(
        output,
        "Scanned {} files ({}) and {} lines ({}) in {} seconds",
        summary.files_read.to_string().bright_yellow(),
        format!("{:.1} files/sec", safe_rate(summary.files_read, secs)).bright_yellow(),
        summary.lines_processed.to_string().bright_yellow(),
        format!("{:.1} lines/sec", safe_rate(summary.lines_processed, secs)).bright_yellow(),
        format!("{:.2}", secs).bright_yellow()
    );

    let _ = writeln!(output, "\n{}", "Line distribution:".blue().bold());
    let total = summary.lines_processed;
    let _ = writeln!(
        output,
        "{}",
        distribution_row("Code", summary.totals.code, total, Color::Green)
    );
    let _ = writeln!(
        output,
        "{}",
        distribution_row("Comments", summary.totals.comment, total, Color::Cyan)
    );
    let _ = writeln!(
        output,
        "{}",
        distribution_row("Whitespace", summary.totals.whitespace, total, Color::Yellow)
    );

    output
}

fn run(args: &Args) -> Result<(), Error> {
    println!(
        "{} {}",
        env!("CARGO_PKG_NAME").bright_cyan().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_yellow()
    );

    let extensions = requested_extensions(&args.files)?;

    let root = Path::new(&args.path);
    if !root.exists() {
        return Err(Error::RootNotFound(root.to_path_buf()));
    }
    let root = fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());

    let start = Instant::now();
    let mut candidates = Vec::new();
    let mut failures = Vec::new();
    if root.is_file() {
        if let Some(extension) = matching_extension(&root, &extensions) {
            candidates.push(Candidate {
                path: root,
                extension,
            });
        }
    } else {
        collect_source_files(
            &root,
            &extensions,
            &args.ignore,
            &mut candidates,
            &mut failures,
        );
    }

    let outcomes: Vec<FileOutcome> = candidates
        .into_par_iter()
        .map(|candidate| {
            let result = classify_file(&candidate.path, &candidate.extension);
            FileOutcome {
                path: candidate.path,
                extension: candidate.extension,
                result,
            }
        })
        .collect();

    for outcome in &outcomes {
        match &outcome.result {
            Ok(_) => {}
            Err(Error::FileRead { source, .. }) => {
                eprintln!(
                    "Error counting lines in {}: {}",
                    outcome.path.display(),
                    source
                );
            }
            Err(err) => {
                eprintln!(
                    "Error counting lines in {}: {}",
                    outcome.path.display(),
                    err
                );
            }
        }
    }

    if args.verbose {
        print_verbose_counts(&outcomes);
    }

    let summary = merge_outcomes(outcomes, failures);
    print!("{}", build_summary_report(&summary, start.elapsed()));
    Ok(())
}

fn main() {
    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("{} {}", "Error:".red().bold(), err);
        if matches!(err, Error::UnsupportedFileType(_)) {
            eprintln!("{}", supported_types_help());
        }
        process::exit(err.exit_code());
    }
}
