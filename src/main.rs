//! Tower Stats command-line tool.
//!
//! Ingests OCR text from Battle Report screenshots into the local run
//! history, and lists, removes, and exports stored runs. Every ingested
//! screenshot is also archived with its outcome.

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::thread;

use tower_stats::analysis::{self, DataSetStats};
use tower_stats::config::{load_config, AppConfig};
use tower_stats::ingest::{
    create_ingest_queue, run_ingest_worker, IngestItem, ScreenshotArchive, StoredScreenshot,
};
use tower_stats::{log, paths, HalfSplitPairer, JsonFileBackend, RecordStore};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Ingest {
        files: Vec<PathBuf>,
        photo_date: Option<DateTime<Utc>>,
    },
    List,
    History,
    Show(usize),
    Remove(usize),
    Export,
    Stats,
    Help,
}

fn main() {
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();

    let exit_code = run(std::env::args_os(), &mut stdout, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run<I, W, E>(args: I, out: &mut W, err: &mut E) -> i32
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let command = match parse_args(args) {
        Ok(command) => command,
        Err(message) => {
            let _ = writeln!(err, "error: {message}");
            let _ = write_usage(err);
            return 2;
        }
    };

    if command == Command::Help {
        return if write_usage(out).is_ok() { 0 } else { 1 };
    }

    if let Err(e) = paths::ensure_directories() {
        log(&format!("Warning: Failed to create data directories: {}", e));
    }

    let config = load_config(&paths::get_config_path());

    match execute(command, &config, out) {
        Ok(()) => 0,
        Err(e) => {
            let _ = writeln!(err, "error: {e:#}");
            1
        }
    }
}

fn parse_args<I>(args: I) -> Result<Command, String>
where
    I: IntoIterator<Item = OsString>,
{
    let mut args = args
        .into_iter()
        .skip(1)
        .map(|arg| arg.into_string().map_err(|arg| format!("invalid UTF-8 argument: {arg:?}")));

    let Some(name) = args.next().transpose()? else {
        return Ok(Command::Help);
    };

    match name.as_str() {
        "ingest" => {
            let mut files = Vec::new();
            let mut photo_date = None;
            while let Some(arg) = args.next().transpose()? {
                if arg == "--photo-date" {
                    let value = args
                        .next()
                        .transpose()?
                        .ok_or("--photo-date needs a value")?;
                    photo_date = Some(parse_photo_date(&value)?);
                } else {
                    files.push(PathBuf::from(arg));
                }
            }
            if files.is_empty() {
                return Err("ingest needs at least one OCR text file".to_string());
            }
            Ok(Command::Ingest { files, photo_date })
        }
        "list" => Ok(Command::List),
        "history" => Ok(Command::History),
        "show" => Ok(Command::Show(parse_index(args.next().transpose()?)?)),
        "remove" => Ok(Command::Remove(parse_index(args.next().transpose()?)?)),
        "export" => Ok(Command::Export),
        "stats" => Ok(Command::Stats),
        "help" | "-h" | "--help" => Ok(Command::Help),
        other => Err(format!("unknown command: {other}")),
    }
}

fn parse_photo_date(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|date| date.with_timezone(&Utc))
        .map_err(|e| format!("invalid --photo-date {value:?}: {e}"))
}

fn parse_index(value: Option<String>) -> Result<usize, String> {
    let value = value.ok_or("missing run index")?;
    value
        .parse::<usize>()
        .map_err(|_| format!("invalid run index: {value}"))
}

fn write_usage<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Usage: tower-stats <command>")?;
    writeln!(out)?;
    writeln!(out, "Commands:")?;
    writeln!(
        out,
        "  ingest <ocr.txt>... [--photo-date <RFC3339>]  Add runs from OCR text files"
    )?;
    writeln!(out, "  list                                          List stored runs")?;
    writeln!(out, "  history                                       List archived screenshots")?;
    writeln!(out, "  show <index>                                  Show one stored run")?;
    writeln!(out, "  remove <index>                                Remove a stored run")?;
    writeln!(out, "  export                                        Write runs CSV and statistics JSON")?;
    writeln!(out, "  stats                                         Print efficiency statistics")?;
    writeln!(out, "  help                                          Show this message")?;
    Ok(())
}

fn open_store(config: &AppConfig) -> Result<RecordStore<JsonFileBackend>> {
    RecordStore::open(JsonFileBackend::new(config.store_path()))
}

fn execute<W: Write>(command: Command, config: &AppConfig, out: &mut W) -> Result<()> {
    match command {
        Command::Ingest { files, photo_date } => ingest(files, photo_date, config, out),
        Command::List => {
            let store = open_store(config)?;
            if store.is_empty() {
                writeln!(out, "No runs stored")?;
            }
            for (index, record) in store.records().iter().enumerate() {
                let date = record
                    .photo_date
                    .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "-".to_string());
                writeln!(
                    out,
                    "{:>4}  {:<24} {:<16} {}",
                    index,
                    record.summary(),
                    record.game_time,
                    date
                )?;
            }
            Ok(())
        }
        Command::History => {
            let archived = ScreenshotArchive::new(config.archive_path()).load()?;
            if archived.is_empty() {
                writeln!(out, "No screenshots archived")?;
            }
            for entry in &archived {
                let date = entry
                    .creation_date
                    .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "-".to_string());
                writeln!(
                    out,
                    "{:<16}  {}: {} - {}",
                    date,
                    entry.source.display(),
                    entry.record.summary(),
                    describe(entry)
                )?;
            }
            Ok(())
        }
        Command::Show(index) => {
            let store = open_store(config)?;
            let record = store
                .get(index)
                .ok_or_else(|| anyhow!("No run at index {}", index))?;
            for row in record.detail_rows() {
                writeln!(out, "{:<22}{}", row.label, row.value)?;
            }
            Ok(())
        }
        Command::Remove(index) => {
            let mut store = open_store(config)?;
            match store.remove_at(index)? {
                Some(record) => {
                    writeln!(out, "Removed {}", record.summary())?;
                    Ok(())
                }
                None => bail!("No run at index {}", index),
            }
        }
        Command::Export => {
            let store = open_store(config)?;
            let (csv_path, json_path) = analysis::generate_analysis(
                store.records(),
                config.export_csv_path(),
                config.statistics_json_path(),
            )?;
            writeln!(out, "Runs: {}", csv_path.display())?;
            writeln!(out, "Statistics: {}", json_path.display())?;
            Ok(())
        }
        Command::Stats => {
            let store = open_store(config)?;
            let stats = DataSetStats::from_records(store.records());
            writeln!(out, "Runs: {}", stats.total_runs)?;
            writeln!(
                out,
                "{:<18}{:>14}{:>14}{:>14}{:>14}{:>14}",
                "column", "mean", "median", "min", "max", "std_dev"
            )?;
            for column in &stats.columns {
                writeln!(
                    out,
                    "{:<18}{:>14.2}{:>14.2}{:>14.2}{:>14.2}{:>14.2}",
                    format!("{:?}", column.column),
                    column.mean,
                    column.median,
                    column.min,
                    column.max,
                    column.std_dev
                )?;
            }
            Ok(())
        }
        Command::Help => write_usage(out).map_err(Into::into),
    }
}

/// Reads every file, then feeds them through the ingest worker, which is the
/// only writer of the store for the duration of the batch.
fn ingest<W: Write>(
    files: Vec<PathBuf>,
    photo_date: Option<DateTime<Utc>>,
    config: &AppConfig,
    out: &mut W,
) -> Result<()> {
    let mut items = Vec::with_capacity(files.len());
    for file in files {
        let text = fs::read_to_string(&file)
            .context(format!("Failed to read OCR text: {}", file.display()))?;
        items.push(IngestItem::new(file, text, photo_date));
    }

    let mut store = open_store(config)?;
    let pairer = HalfSplitPairer::default();
    let limits = config.limits();
    let (sender, receiver) = create_ingest_queue();

    let results = thread::scope(|scope| {
        let worker = scope.spawn(|| run_ingest_worker(receiver, &pairer, &limits, &mut store));
        for item in items {
            if sender.send(item).is_err() {
                break;
            }
        }
        drop(sender);
        worker.join()
    })
    .map_err(|_| anyhow!("Ingest worker panicked"))?;

    for result in &results {
        writeln!(
            out,
            "{}: {} - {}",
            result.source.display(),
            result.record.summary(),
            describe(result)
        )?;
    }

    ScreenshotArchive::new(config.archive_path()).append(&results)?;

    Ok(())
}

fn describe(result: &StoredScreenshot) -> String {
    if result.is_added {
        "added".to_string()
    } else if result.is_duplicate {
        "already stored".to_string()
    } else if result.record.has_parsing_error {
        let fields: Vec<String> = result
            .record
            .invalid_fields()
            .iter()
            .map(|field| field.to_string())
            .collect();
        format!("needs correction ({})", fields.join(", "))
    } else {
        "not saved".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<OsString> {
        std::iter::once("tower-stats")
            .chain(list.iter().copied())
            .map(OsString::from)
            .collect()
    }

    #[test]
    fn test_parse_no_args_is_help() {
        assert_eq!(parse_args(args(&[])), Ok(Command::Help));
    }

    #[test]
    fn test_parse_ingest() {
        let command = parse_args(args(&[
            "ingest",
            "a.txt",
            "--photo-date",
            "2025-03-01T12:00:00Z",
            "b.txt",
        ]))
        .unwrap();

        let Command::Ingest { files, photo_date } = command else {
            panic!("expected ingest");
        };
        assert_eq!(files, vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
        assert_eq!(
            photo_date.unwrap().to_rfc3339(),
            "2025-03-01T12:00:00+00:00"
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(args(&["ingest"])).is_err());
        assert!(parse_args(args(&["ingest", "a.txt", "--photo-date"])).is_err());
        assert!(parse_args(args(&["ingest", "a.txt", "--photo-date", "yesterday"])).is_err());
        assert!(parse_args(args(&["show"])).is_err());
        assert!(parse_args(args(&["remove", "x"])).is_err());
        assert!(parse_args(args(&["frobnicate"])).is_err());
    }

    #[test]
    fn test_parse_index_commands() {
        assert_eq!(parse_args(args(&["show", "3"])), Ok(Command::Show(3)));
        assert_eq!(parse_args(args(&["remove", "0"])), Ok(Command::Remove(0)));
        assert_eq!(parse_args(args(&["history"])), Ok(Command::History));
    }

    #[test]
    fn test_usage_error_exit_code() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = run(args(&["frobnicate"]), &mut out, &mut err);
        assert_eq!(code, 2);
        let err = String::from_utf8(err).unwrap();
        assert!(err.contains("unknown command: frobnicate"));
        assert!(err.contains("Usage: tower-stats"));
    }

    #[test]
    fn test_help_exit_code() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        assert_eq!(run(args(&["help"]), &mut out, &mut err), 0);
        assert!(String::from_utf8(out).unwrap().contains("ingest"));
    }
}
