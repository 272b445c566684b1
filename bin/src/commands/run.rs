//! Run command implementation.
//!
//! This module drives one incremental load from the API or a board snapshot
//! into the SQLite database, optionally exporting the delta to a file.

use crate::progress::EndpointProgress;
use crate::settings::Settings;
use anyhow::{Context, Result, bail};
use clap::{Args, ValueEnum};
use std::fs::File;
use std::future::Future;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use trowel_lib::prelude::*;
use trowel_lib::{Endpoint, ExportFormat, endpoints};

/// Where records come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Source {
    /// Paginated history API
    Api,
    /// Board snapshot file
    Board,
}

/// Arguments of `trowel run`.
#[derive(Debug, Args)]
pub(crate) struct RunArgs {
    /// Record source
    #[arg(long, value_enum, default_value = "api")]
    source: Source,

    /// Board snapshot JSON with `dates`, `names` and `prices` columns
    #[arg(long, required_if_eq("source", "board"))]
    board_file: Option<PathBuf>,

    /// Restrict the API run to these instrument ids
    #[arg(short, long = "instrument", value_name = "ID")]
    instruments: Vec<u32>,

    /// Compute the delta without appending it
    #[arg(long)]
    dry_run: bool,

    /// Write the new records to this file
    #[arg(long, value_name = "FILE")]
    export: Option<PathBuf>,

    /// Export format (csv, json, ndjson). Defaults to the file extension, else csv
    #[arg(short, long, requires = "export")]
    format: Option<ExportFormat>,
}

/// Runs one incremental load.
pub(crate) async fn run(args: RunArgs, settings: &Settings, quiet: bool) -> Result<()> {
    settings.validate()?;

    let catalog = InstrumentCatalog::builtin();
    let config = settings.load_config(args.dry_run)?;
    let db_path = settings.db_path();
    let mut sink = SqliteSink::open(&db_path)
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;
    info!(db = %db_path.display(), table = %config.table, "sink opened");

    let load = IncrementalLoad::new(&catalog, &config);

    let report = match args.source {
        Source::Api => {
            let selected = select_endpoints(&catalog, &args.instruments)?;
            let client = ApiClient::new(settings.client_config())
                .context("Failed to build HTTP client")?;
            let progress = EndpointProgress::new(selected.len(), quiet);

            let outcome = until_interrupted(
                load.with_observer(&progress)
                    .run_api(&client, &selected, &mut sink),
            )
            .await;
            match &outcome {
                Ok(result) => progress.finish_run(result),
                Err(_) => progress.abandon("interrupted"),
            }
            outcome??
        }
        Source::Board => {
            if !args.instruments.is_empty() {
                bail!("--instrument applies to the api source only");
            }
            let path = args
                .board_file
                .as_deref()
                .context("--board-file is required for the board source")?;
            until_interrupted(load.run_board(&SnapshotFile::new(path), &mut sink)).await??
        }
    };

    println!("{report}");
    for url in &report.failed_endpoints {
        println!("  failed: {url}");
    }
    if report.skipped_fields > 0 {
        println!("  {} malformed fields stored as null", report.skipped_fields);
    }

    if let Some(path) = &args.export {
        let format = match args.format {
            Some(format) => format,
            None => format_from_extension(path),
        };
        export(&report.delta, path, format)?;
        if !quiet {
            println!("Exported {} records to {}", report.delta.len(), path.display());
        }
    }

    Ok(())
}

/// Races `fut` against Ctrl-C.
///
/// Appends happen synchronously in one transaction at the end of a run, so
/// an interrupt before completion leaves the table untouched.
async fn until_interrupted<F, T>(fut: F) -> Result<T>
where
    F: Future<Output = T>,
{
    tokio::select! {
        out = fut => Ok(out),
        _ = tokio::signal::ctrl_c() => bail!("Interrupted; nothing was appended"),
    }
}

fn select_endpoints(catalog: &InstrumentCatalog, ids: &[u32]) -> Result<Vec<Endpoint>> {
    for id in ids {
        catalog.require(*id)?;
    }
    let selected: Vec<Endpoint> = endpoints(catalog)
        .into_iter()
        .filter(|e| ids.is_empty() || ids.contains(&e.instrument_id()))
        .collect();
    if selected.is_empty() {
        bail!("No API endpoints for the selected instruments");
    }
    Ok(selected)
}

fn format_from_extension(path: &Path) -> ExportFormat {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| ext.parse().ok())
        .unwrap_or_default()
}

fn export(records: &[CanonicalRecord], path: &Path, format: ExportFormat) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    format
        .write_records(records, &mut writer)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    writer.flush()?;
    Ok(())
}
