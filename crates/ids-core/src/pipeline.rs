//! End-to-end passes used by the CLI: simulate, analyze, and alert.
//!
//! Each pass validates its inputs before doing any work and writes its
//! artifacts only once the in-memory result is complete.

use crate::alert::{score, ScoreReport};
use crate::baseline::{estimate_log, save_baseline, BaselineEstimate};
use crate::events::{Phase, ProgressSink};
use crate::generate::seeded_rng;
use crate::simulate::SimulationEngine;
use crate::table::{ActivityTable, RawLog};
use ids_common::{BaselineStats, EventCatalogue, Result, StatsSet};
use ids_config::ensure_consistent;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Validate, seed, and simulate one pass.
pub fn simulate_checked<P: ProgressSink + ?Sized>(
    events: &EventCatalogue,
    stats: &StatsSet,
    days: u32,
    seed: Option<u64>,
    phase: Phase,
    progress: &mut P,
) -> Result<ActivityTable> {
    ensure_consistent(events, stats)?;
    let mut rng = seeded_rng(seed);
    tracing::info!(%phase, days, events = events.len(), seeded = seed.is_some(), "starting simulation");
    SimulationEngine::new(events, stats)
        .with_phase(phase)
        .run(days, &mut rng, progress)
}

/// Simulate the baseline period and persist it to `out`.
pub fn simulate_to_file<P: ProgressSink + ?Sized>(
    events: &EventCatalogue,
    stats: &StatsSet,
    days: u32,
    seed: Option<u64>,
    out: &Path,
    progress: &mut P,
) -> Result<ActivityTable> {
    let table = simulate_checked(events, stats, days, seed, Phase::Baseline, progress)?;
    table.save(out)?;
    tracing::info!(path = %out.display(), days = table.len(), "activity log written");
    Ok(table)
}

/// Estimate a baseline from the log at `log` and persist it to `out`.
pub fn analyze_file(log: &Path, out: &Path) -> Result<BaselineEstimate> {
    let raw = RawLog::read(log)?;
    let estimate = estimate_log(&raw)?;
    save_baseline(&estimate.stats, out)?;
    tracing::info!(
        path = %out.display(),
        events = estimate.stats.len(),
        rows = estimate.diagnostics.rows,
        "baseline written"
    );
    Ok(estimate)
}

/// Result of one live analysis iteration.
#[derive(Debug, Clone, Serialize)]
pub struct LiveAnalysis {
    #[serde(skip)]
    pub table: ActivityTable,
    pub report: ScoreReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_log: Option<PathBuf>,
}

/// Options for one live iteration.
#[derive(Debug, Clone, Copy)]
pub struct LiveOptions<'a> {
    pub days: u32,
    pub seed: u64,
    /// Where to persist the generated live table, if anywhere.
    pub live_log: Option<&'a Path>,
}

/// Simulate a live period from `live_stats` and score it against `baseline`.
///
/// The generator is reseeded with `options.seed` on every call so repeated
/// iterations over the same inputs give the same verdicts.
pub fn analyze_live<P: ProgressSink + ?Sized>(
    events: &EventCatalogue,
    baseline: &BaselineStats,
    live_stats: &StatsSet,
    options: LiveOptions<'_>,
    progress: &mut P,
) -> Result<LiveAnalysis> {
    let table = simulate_checked(
        events,
        live_stats,
        options.days,
        Some(options.seed),
        Phase::Live,
        progress,
    )?;
    if let Some(path) = options.live_log {
        table.save(path)?;
        tracing::debug!(path = %path.display(), "live log written");
    }

    let report = score(events, baseline, &table);
    tracing::info!(
        days = report.days.len(),
        alerts = report.alert_days().len(),
        threshold = report.threshold,
        "live analysis complete"
    );
    Ok(LiveAnalysis {
        table,
        report,
        live_log: options.live_log.map(Path::to_path_buf),
    })
}
