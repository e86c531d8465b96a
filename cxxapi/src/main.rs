//! cxxapi: build a C++ API snapshot from declaration records.
//!
//! - **stdin mode**: `cxxapi < records.jsonl`
//! - **file mode**: `cxxapi -o api/ReactCommon.api records/*.json`

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use cxxapi::record::{self, RecordFormat};
use cxxapi::{build_snapshot, Record, SnapshotConfig};
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "cxxapi",
    about = "Build a canonical C++ API snapshot from declaration records"
)]
struct Cli {
    /// Record files, JSON arrays or JSON Lines (glob patterns supported).
    /// If omitted, reads from stdin.
    files: Vec<String>,

    /// Write the snapshot to this file instead of stdout
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Include enum values and variable initializers
    #[arg(long)]
    store_initializers: bool,

    /// Log skipped and dropped declarations
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let records = if cli.files.is_empty() {
        read_stdin()?
    } else {
        read_inputs(&collect_inputs(&cli.files)?)?
    };
    debug!(records = records.len(), "read records");

    let snapshot = build_snapshot(records).context("failed to build snapshot")?;
    let config = SnapshotConfig {
        store_initializers: cli.store_initializers,
    };
    let text = snapshot.render(&config);

    match &cli.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create output directory: {}", parent.display()))?;
            }
            fs::write(path, &text).with_context(|| format!("failed to write {}", path.display()))?;
        }
        None => print!("{}", text),
    }
    Ok(())
}

/// Logs go to stderr. `-v` forces debug output; otherwise `RUST_LOG` applies,
/// falling back to warnings only.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn read_stdin() -> Result<Vec<Record>> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;
    record::parse_records(&input).context("failed to parse records from stdin")
}

/// One input file and the layout its records are in.
#[derive(Debug, PartialEq, Eq)]
struct RecordInput {
    path: PathBuf,
    format: RecordFormat,
}

impl RecordInput {
    fn from_path(path: PathBuf) -> Option<Self> {
        let format = RecordFormat::from_path(&path)?;
        Some(Self { path, format })
    }

    fn read(&self) -> Result<Vec<Record>> {
        let content =
            fs::read_to_string(&self.path).with_context(|| format!("failed to read {}", self.path.display()))?;
        let records = self
            .format
            .parse(&content)
            .with_context(|| format!("failed to parse {}", self.path.display()))?;
        debug!(file = %self.path.display(), format = ?self.format, records = records.len(), "parsed record file");
        Ok(records)
    }
}

fn read_inputs(inputs: &[RecordInput]) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for input in inputs {
        records.extend(input.read()?);
    }
    Ok(records)
}

/// Resolve the command-line inputs to record files.
///
/// A file named explicitly must have a record extension. Directories are
/// scanned non-recursively and glob patterns are expanded; both keep only
/// record files.
fn collect_inputs(patterns: &[String]) -> Result<Vec<RecordInput>> {
    let mut inputs = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            let input = RecordInput::from_path(path.to_path_buf())
                .ok_or_else(|| anyhow!("unsupported file type: {}", path.display()))?;
            inputs.push(input);
            continue;
        }
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            inputs.extend(
                entries
                    .flatten()
                    .map(|entry| entry.path())
                    .filter(|p| p.is_file())
                    .filter_map(RecordInput::from_path),
            );
            continue;
        }
        let matches: Vec<RecordInput> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .filter_map(RecordInput::from_path)
            .collect();
        if matches.is_empty() {
            warn!("no record files matched: {}", pattern);
        }
        inputs.extend(matches);
    }
    inputs.sort_by(|a, b| a.path.cmp(&b.path));
    inputs.dedup_by(|a, b| a.path == b.path);
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn names(inputs: &[RecordInput]) -> Vec<String> {
        inputs
            .iter()
            .map(|i| i.path.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn directories_keep_record_files_sorted() {
        let dir = TempDir::new().unwrap();
        for name in ["b.json", "a.jsonl", "notes.txt"] {
            fs::write(dir.path().join(name), "").unwrap();
        }

        let inputs = collect_inputs(&[dir.path().to_string_lossy().to_string()]).unwrap();
        assert_eq!(names(&inputs), ["a.jsonl", "b.json"]);
        assert_eq!(inputs[0].format, RecordFormat::Lines);
        assert_eq!(inputs[1].format, RecordFormat::Array);
    }

    #[test]
    fn globs_skip_other_files_and_dedup() {
        let dir = TempDir::new().unwrap();
        for name in ["api.json", "api.txt"] {
            fs::write(dir.path().join(name), "").unwrap();
        }

        let pattern = format!("{}/api.*", dir.path().display());
        let explicit = dir.path().join("api.json").to_string_lossy().to_string();
        let inputs = collect_inputs(&[pattern, explicit]).unwrap();
        assert_eq!(names(&inputs), ["api.json"]);
    }

    #[test]
    fn explicit_file_needs_a_record_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.xml");
        fs::write(&path, "").unwrap();

        let err = collect_inputs(&[path.to_string_lossy().to_string()]).unwrap_err();
        assert!(err.to_string().starts_with("unsupported file type"));
    }

    #[test]
    fn inputs_parse_in_their_own_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("r.ndjson");
        fs::write(&path, "{\"kind\": \"namespace\", \"qualified_name\": \"a\"}\n").unwrap();

        let inputs = collect_inputs(&[path.to_string_lossy().to_string()]).unwrap();
        let records = read_inputs(&inputs).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].qualified_name, "a");
    }
}
