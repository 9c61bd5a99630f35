use crate::ui::format::{format_timestamp, report_plain_text};
use anyhow::Context;
use scan_service::{Analyzer, HistoryStore, ScanError};
use scan_types::{AnalysisKind, AnalysisRequest, HistoryItem};
use std::io::Write;
use std::path::Path;
use tokio::io::AsyncReadExt;

pub(crate) struct ScanOptions {
    pub(crate) kind: AnalysisKind,
    pub(crate) json: bool,
    pub(crate) save_history: bool,
}

/// Reads scan input from `file`, or stdin when no file is given.
pub(crate) async fn read_input(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read input {}", path.display())),
        None => {
            let mut raw = String::new();
            tokio::io::stdin()
                .read_to_string(&mut raw)
                .await
                .context("failed to read input from stdin")?;
            Ok(raw)
        }
    }
}

pub(crate) async fn run_scan<W: Write>(
    analyzer: Option<&Analyzer>,
    history: &mut HistoryStore,
    options: ScanOptions,
    raw_text: String,
    out: &mut W,
) -> anyhow::Result<()> {
    let request = AnalysisRequest::new(options.kind, raw_text);
    let analyzer = analyzer.ok_or(ScanError::MissingApiKey)?;
    let report = analyzer.analyze(&request).await?;

    if options.save_history {
        if let Err(err) = history.append(request.kind, &request.raw_text, report.clone()) {
            tracing::error!(error = %err, "failed to save history");
            eprintln!("warning: report not saved: {err}");
        }
    }

    if options.json {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}", report_plain_text(&report))?;
    }
    Ok(())
}

pub(crate) fn print_history<W: Write>(
    history: &HistoryStore,
    limit: usize,
    json: bool,
    out: &mut W,
) -> anyhow::Result<()> {
    let items: Vec<&HistoryItem> = history.newest_first().take(limit).collect();
    if json {
        serde_json::to_writer_pretty(&mut *out, &items)?;
        writeln!(out)?;
        return Ok(());
    }

    let stats = history.stats();
    writeln!(
        out,
        "{} scans, {} high risk ({}%), {} phishing, {} logs: {}",
        stats.total,
        stats.high_risk,
        stats.high_risk_percent(),
        stats.phishing,
        stats.logs,
        stats.posture().label()
    )?;
    for item in items {
        writeln!(
            out,
            "{}  {:<8}  {:<6}  {}",
            format_timestamp(&item.timestamp),
            item.kind.as_str(),
            item.result.risk_level().as_str(),
            item.result.headline()
        )?;
    }
    Ok(())
}
