//! Activity IDS command line.
//!
//! Non-interactive driver over the library: check inputs, simulate a
//! baseline period, estimate baseline statistics, and score live periods.

use clap::{Args, Parser, Subcommand};
use ids_common::{
    error::{format_error_human, StructuredError},
    BaselineStats, Error, EventCatalogue, OutputFormat, StatsSet,
};
use ids_config::{check_consistency, load_events, load_settings, load_stats, ResolvedSettings};
use ids_core::baseline::load_baseline;
use ids_core::events::TracingProgress;
use ids_core::exit_codes::ExitCode;
use ids_core::logging::{generate_run_id, init_logging, LogConfig, LogFormat, LogLevel};
use ids_core::pipeline::{analyze_file, analyze_live, simulate_to_file, LiveAnalysis, LiveOptions};
use ids_core::BaselineEstimate;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

/// Activity IDS - simulate activity, learn a baseline, flag anomalous days
#[derive(Parser)]
#[command(name = "ids-core")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Settings file (overrides IDS_CONFIG and the config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "human")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Load event definitions and statistics and report inconsistencies
    Check(InputArgs),

    /// Simulate the baseline period and write the activity log
    Simulate(SimulateArgs),

    /// Estimate baseline statistics from an activity log
    Analyze(AnalyzeArgs),

    /// Simulate live periods and score them against the baseline
    Alert(AlertArgs),

    /// Check, simulate and analyze in one go
    Run(SimulateArgs),

    /// Print version information
    Version,
}

#[derive(Args, Debug, Clone)]
struct InputArgs {
    /// Event definitions file
    #[arg(long, short = 'e')]
    events: Option<PathBuf>,

    /// Event statistics file
    #[arg(long, short = 's')]
    stats: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SimulateArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Number of days to simulate
    #[arg(long, short = 'd', value_parser = clap::value_parser!(u32).range(1..))]
    days: u32,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Activity log output path
    #[arg(long, short = 'o')]
    out: Option<PathBuf>,

    /// Baseline output path (run only)
    #[arg(long)]
    baseline: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Activity log to read
    #[arg(long)]
    log: Option<PathBuf>,

    /// Baseline output path
    #[arg(long, short = 'o')]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct AlertArgs {
    /// Event definitions file
    #[arg(long, short = 'e')]
    events: Option<PathBuf>,

    /// Baseline statistics file
    #[arg(long, short = 'b')]
    baseline: Option<PathBuf>,

    /// Live statistics file; repeat for several iterations
    #[arg(long, short = 'l', required = true)]
    live: Vec<PathBuf>,

    /// Number of live days to simulate per iteration
    #[arg(long, short = 'd', value_parser = clap::value_parser!(u32).range(1..))]
    days: u32,

    /// Seed used before every live iteration
    #[arg(long)]
    seed: Option<u64>,

    /// Live log output path
    #[arg(long)]
    live_log: Option<PathBuf>,

    /// Do not write the live log
    #[arg(long, conflicts_with = "live_log")]
    no_live_log: bool,
}

fn main() {
    let cli = Cli::parse();

    let cli_level = if cli.global.quiet {
        Some(LogLevel::Error)
    } else {
        match cli.global.verbose {
            0 => None,
            1 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    };
    let cli_format = cli.global.format.is_machine().then_some(LogFormat::Jsonl);
    init_logging(&LogConfig::from_env(cli_level, cli_format));

    let run_id = generate_run_id();
    let span = tracing::info_span!("run", run_id = %run_id);
    let _guard = span.enter();

    let exit_code = match cli.command {
        Commands::Version => {
            print_version(&cli.global);
            ExitCode::Clean
        }
        command => match load_settings(cli.global.config.as_deref()) {
            Ok(resolved) => {
                tracing::debug!(
                    source = %resolved.source,
                    path = ?resolved.path,
                    "settings resolved"
                );
                dispatch(&cli.global, &resolved, command)
            }
            Err(err) => report_error(&cli.global, "settings", &err),
        },
    };

    std::process::exit(exit_code.as_i32());
}

fn dispatch(global: &GlobalOpts, resolved: &ResolvedSettings, command: Commands) -> ExitCode {
    match command {
        Commands::Check(args) => run_check(global, resolved, &args),
        Commands::Simulate(args) => run_simulate(global, resolved, &args),
        Commands::Analyze(args) => run_analyze(global, resolved, &args),
        Commands::Alert(args) => run_alert(global, resolved, &args),
        Commands::Run(args) => run_pipeline(global, resolved, &args),
        Commands::Version => {
            print_version(global);
            ExitCode::Clean
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

fn events_path(resolved: &ResolvedSettings, arg: &Option<PathBuf>) -> PathBuf {
    arg.clone()
        .unwrap_or_else(|| resolved.settings.paths.events.clone())
}

fn load_inputs(
    resolved: &ResolvedSettings,
    args: &InputArgs,
) -> Result<(EventCatalogue, StatsSet), Error> {
    let events = load_events(&events_path(resolved, &args.events))?;
    let stats_path = args
        .stats
        .clone()
        .unwrap_or_else(|| resolved.settings.paths.stats.clone());
    let stats = load_stats(&stats_path)?;
    Ok((events, stats))
}

fn run_check(global: &GlobalOpts, resolved: &ResolvedSettings, args: &InputArgs) -> ExitCode {
    let (events, stats) = match load_inputs(resolved, args) {
        Ok(inputs) => inputs,
        Err(err) => return report_error(global, "check", &err),
    };
    let issues = check_consistency(&events, &stats);

    match global.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "command": "check",
            "consistent": issues.is_empty(),
            "events": events.values().collect::<Vec<_>>(),
            "stats": stats,
            "issues": issues,
        })),
        OutputFormat::Summary => {
            println!(
                "check: {} events, {} stats, {} issue(s)",
                events.len(),
                stats.len(),
                issues.len()
            );
        }
        OutputFormat::Human => {
            println!("Events ({}):", events.len());
            for def in events.values() {
                println!("  {}", def);
            }
            println!("Statistics ({}):", stats.len());
            for (name, stat) in &stats {
                println!("  {}: mean={} std_dev={}", name, stat.mean, stat.std_dev);
            }
            if issues.is_empty() {
                println!("Definitions and statistics are consistent.");
            } else {
                println!("Inconsistencies:");
                for issue in &issues {
                    println!("  - {}", issue);
                }
            }
        }
    }

    if issues.is_empty() {
        ExitCode::Clean
    } else {
        ExitCode::ConsistencyError
    }
}

fn run_simulate(global: &GlobalOpts, resolved: &ResolvedSettings, args: &SimulateArgs) -> ExitCode {
    match simulate_step(resolved, args) {
        Ok((out, days)) => {
            match global.format {
                OutputFormat::Json => print_json(&serde_json::json!({
                    "command": "simulate",
                    "days": days,
                    "activity_log": out,
                })),
                _ => println!("Simulated {} day(s); activity log written to {}", days, out.display()),
            }
            ExitCode::Clean
        }
        Err(err) => report_error(global, "simulate", &err),
    }
}

fn simulate_step(resolved: &ResolvedSettings, args: &SimulateArgs) -> Result<(PathBuf, usize), Error> {
    let (events, stats) = load_inputs(resolved, &args.input)?;
    let out = args
        .out
        .clone()
        .unwrap_or_else(|| resolved.settings.paths.activity_log.clone());
    let seed = args.seed.or(resolved.settings.simulation.baseline_seed);
    let table = simulate_to_file(&events, &stats, args.days, seed, &out, &mut TracingProgress)?;
    Ok((out, table.len()))
}

fn run_analyze(global: &GlobalOpts, resolved: &ResolvedSettings, args: &AnalyzeArgs) -> ExitCode {
    let log = args
        .log
        .clone()
        .unwrap_or_else(|| resolved.settings.paths.activity_log.clone());
    let out = args
        .out
        .clone()
        .unwrap_or_else(|| resolved.settings.paths.baseline.clone());

    match analyze_file(&log, &out) {
        Ok(estimate) => {
            print_baseline(global, "analyze", &out, &estimate);
            ExitCode::Clean
        }
        Err(err) => report_error(global, "analyze", &err),
    }
}

fn run_pipeline(global: &GlobalOpts, resolved: &ResolvedSettings, args: &SimulateArgs) -> ExitCode {
    let (log, _) = match simulate_step(resolved, args) {
        Ok(done) => done,
        Err(err) => return report_error(global, "run", &err),
    };
    let out = args
        .baseline
        .clone()
        .unwrap_or_else(|| resolved.settings.paths.baseline.clone());
    match analyze_file(&log, &out) {
        Ok(estimate) => {
            print_baseline(global, "run", &out, &estimate);
            ExitCode::Clean
        }
        Err(err) => report_error(global, "run", &err),
    }
}

fn run_alert(global: &GlobalOpts, resolved: &ResolvedSettings, args: &AlertArgs) -> ExitCode {
    let events = match load_events(&events_path(resolved, &args.events)) {
        Ok(events) => events,
        Err(err) => return report_error(global, "alert", &err),
    };
    let baseline_path = args
        .baseline
        .clone()
        .unwrap_or_else(|| resolved.settings.paths.baseline.clone());
    let baseline = match load_baseline(&baseline_path) {
        Ok(baseline) => baseline,
        Err(err) => return report_error(global, "alert", &err),
    };

    let live_log = if args.no_live_log || !resolved.settings.simulation.write_live_log {
        None
    } else {
        Some(
            args.live_log
                .clone()
                .unwrap_or_else(|| resolved.settings.paths.live_log.clone()),
        )
    };
    let options = LiveOptions {
        days: args.days,
        seed: args.seed.unwrap_or(resolved.settings.simulation.live_seed),
        live_log: live_log.as_deref(),
    };

    let mut outcome = ExitCode::Clean;
    let mut iterations = Vec::with_capacity(args.live.len());
    for live_path in &args.live {
        let result = alert_iteration(&events, &baseline, live_path, options);
        match &result {
            Ok(analysis) => {
                if outcome == ExitCode::Clean {
                    outcome = ExitCode::for_alerts(analysis.report.any_alert());
                }
                if !global.format.is_machine() {
                    print_live(global, live_path, analysis);
                }
            }
            Err(err) => {
                tracing::error!(live = %live_path.display(), error = %err, "live iteration failed");
                outcome = ExitCode::from(err);
                if !global.format.is_machine() {
                    eprintln!("{}", format_error_human(err, use_color(global)));
                }
            }
        }
        iterations.push(iteration_json(live_path, &result));
    }

    if global.format == OutputFormat::Json {
        print_json(&serde_json::json!({
            "command": "alert",
            "baseline": baseline_path,
            "iterations": iterations,
        }));
    }
    outcome
}

fn alert_iteration(
    events: &EventCatalogue,
    baseline: &BaselineStats,
    live_path: &Path,
    options: LiveOptions<'_>,
) -> Result<LiveAnalysis, Error> {
    let live_stats = load_stats(live_path)?;
    analyze_live(events, baseline, &live_stats, options, &mut TracingProgress)
}

// ============================================================================
// Output
// ============================================================================

fn use_color(global: &GlobalOpts) -> bool {
    !global.no_color && std::io::stderr().is_terminal()
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(err) => tracing::error!(error = %err, "failed to render JSON output"),
    }
}

fn report_error(global: &GlobalOpts, command: &str, err: &Error) -> ExitCode {
    tracing::debug!(command, code = err.code(), "command failed");
    match global.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "command": command,
            "error": StructuredError::from(err),
        })),
        _ => eprintln!("{}", format_error_human(err, use_color(global))),
    }
    ExitCode::from(err)
}

fn print_baseline(global: &GlobalOpts, command: &str, out: &Path, estimate: &BaselineEstimate) {
    match global.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "command": command,
            "baseline_path": out,
            "baseline": estimate.stats,
            "diagnostics": estimate.diagnostics,
        })),
        OutputFormat::Summary => println!(
            "{}: {} event(s) from {} day(s), {} cell(s) skipped",
            command,
            estimate.stats.len(),
            estimate.diagnostics.rows,
            estimate.diagnostics.total_skipped()
        ),
        OutputFormat::Human => {
            println!("Baseline statistics written to {}", out.display());
            println!("{:<24} {:>10} {:>10}", "Event", "Mean", "StdDev");
            for (name, base) in &estimate.stats {
                println!("{:<24} {:>10.2} {:>10.2}", name, base.mean, base.std_dev);
            }
            if estimate.diagnostics.total_skipped() > 0 {
                println!(
                    "Skipped {} malformed or empty cell(s).",
                    estimate.diagnostics.total_skipped()
                );
            }
        }
    }
}

fn print_live(global: &GlobalOpts, live_path: &Path, analysis: &LiveAnalysis) {
    let report = &analysis.report;
    if global.format == OutputFormat::Summary {
        println!(
            "{}: {} day(s), {} alert(s), threshold {}",
            live_path.display(),
            report.days.len(),
            report.alert_days().len(),
            report.threshold
        );
        return;
    }

    println!("Live statistics: {}", live_path.display());
    for day in report.days.values() {
        println!("{}", day);
    }
    if report.diagnostics.total_skipped() > 0 {
        let names: Vec<&str> = report
            .diagnostics
            .skipped_names
            .keys()
            .map(String::as_str)
            .collect();
        println!("Skipped events without baseline or definition: {}", names.join(", "));
    }
}

fn iteration_json(live_path: &Path, result: &Result<LiveAnalysis, Error>) -> serde_json::Value {
    match result {
        Ok(analysis) => serde_json::json!({
            "live": live_path,
            "status": "ok",
            "result": analysis,
        }),
        Err(err) => serde_json::json!({
            "live": live_path,
            "status": "error",
            "error": StructuredError::from(err),
        }),
    }
}

fn print_version(global: &GlobalOpts) {
    match global.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "ids_core_version": env!("CARGO_PKG_VERSION"),
            "rust_version": env!("CARGO_PKG_RUST_VERSION"),
        })),
        _ => println!("ids-core {}", env!("CARGO_PKG_VERSION")),
    }
}
