use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use cloud_sched::events::TracingObserver;
use cloud_sched::metrics::MetricsReport;
use cloud_sched::scheduler::{Job, ScheduleResults, Scheduler};
use cloud_sched::workload::{demo_jobs, load_jobs_file, parse_job, random_jobs};
use cloud_sched::SchedulerConfig;

#[derive(Parser, Debug)]
#[command(name = "cloud-sched")]
#[command(version)]
#[command(about = "Hybrid sequential / leader-follower group scheduler simulation")]
#[command(propagate_version = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Schedule a batch of jobs and print the report
    Run(RunArgs),
}

#[derive(Clone, Debug, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

// =============================================================================
// Run Arguments
// =============================================================================

#[derive(Parser, Debug)]
struct RunArgs {
    /// Job as "id:burst:priority" (repeatable)
    /// Example: --job 1:5:2 --job 2:3:1
    #[arg(long = "job", value_name = "ID:BURST:PRIORITY")]
    jobs: Vec<String>,

    /// JSON file with an array of {id, burst_time, priority}
    #[arg(long, conflicts_with = "jobs")]
    jobs_file: Option<PathBuf>,

    /// Generate this many random jobs instead
    #[arg(long, conflicts_with_all = ["jobs", "jobs_file"])]
    random: Option<usize>,

    /// Seed for --random
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Largest burst time for --random
    #[arg(long, default_value = "10")]
    max_burst: u64,

    /// Largest priority for --random
    #[arg(long, default_value = "5")]
    max_priority: i64,

    /// Wall milliseconds per simulated time-unit
    #[arg(long, default_value = "1000")]
    time_unit_ms: u64,

    /// Jobs drawn per group
    #[arg(long, default_value = "3")]
    group_size: usize,

    /// Time-units charged per unit of burst time
    #[arg(long, default_value = "0.1")]
    scale_factor: f64,

    /// Time-units per countdown step inside a group
    #[arg(long, default_value = "0.1")]
    unit_delay: f64,

    /// Time-units the leader waits before counting down
    #[arg(long, default_value = "0.5")]
    leader_head_start: f64,

    /// Output format
    #[arg(long, short = 'o', default_value = "table")]
    output: OutputFormat,
}

// =============================================================================
// JSON Output Types
// =============================================================================

#[derive(Serialize)]
struct RunOutput<'a> {
    results: &'a ScheduleResults,
    metrics: &'a MetricsReport,
}

// =============================================================================
// Helper Functions
// =============================================================================

fn build_workload(args: &RunArgs) -> Result<Vec<Job>, Box<dyn std::error::Error>> {
    if let Some(path) = &args.jobs_file {
        return Ok(load_jobs_file(path)?);
    }
    if let Some(count) = args.random {
        return Ok(random_jobs(count, args.max_burst, args.max_priority, args.seed)?);
    }
    if args.jobs.is_empty() {
        tracing::info!("No jobs given, using the demo workload");
        return Ok(demo_jobs());
    }

    Ok(args
        .jobs
        .iter()
        .map(|spec| parse_job(spec))
        .collect::<Result<Vec<_>, _>>()?)
}

fn format_time(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "-".to_string(),
    }
}

fn print_table(results: &ScheduleResults, report: &MetricsReport) {
    println!("Execution Complete. Process Order:");
    println!(
        "{:<6} {:<6} {:<6} {:<8} {:>8} {:>8} {:>11} {:>9}",
        "PID", "BURST", "PRIO", "ROLE", "START", "END", "TURNAROUND", "WAITING"
    );
    println!("{}", "-".repeat(70));

    for job in &report.jobs {
        let role = if job.is_leader { "leader" } else { "-" };
        println!(
            "{:<6} {:<6} {:<6} {:<8} {:>8.2} {:>8.2} {:>11.2} {:>9.2}",
            job.id,
            job.burst_time,
            job.priority,
            role,
            job.start_time,
            job.end_time,
            job.turnaround,
            job.waiting
        );
    }

    println!();
    println!("Total Processes:      {}", results.total_processes);
    println!("Total Execution Time: {:.2} time-units", results.total_execution_time);
    match report.throughput {
        Some(t) => println!("Throughput:           {:.2} processes per time-unit", t),
        None => println!("Throughput:           no data"),
    }
    println!("Avg Turnaround:       {}", format_time(report.average_turnaround));
    println!("Avg Waiting:          {}", format_time(report.average_waiting));
    println!("Makespan:             {:.2}", report.makespan);
}

// =============================================================================
// Run Implementation
// =============================================================================

async fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = SchedulerConfig::new(Duration::from_millis(args.time_unit_ms))
        .with_group_size(args.group_size)
        .with_scale_factor(args.scale_factor)
        .with_unit_delay(args.unit_delay)
        .with_leader_head_start(args.leader_head_start);

    let jobs = build_workload(&args)?;

    tracing::info!(
        jobs = jobs.len(),
        group_size = config.group_size,
        time_unit = ?config.time_unit,
        "Starting cloud-sched run"
    );

    let mut scheduler = Scheduler::new(config)?;
    scheduler.subscribe(Arc::new(TracingObserver));
    for job in jobs {
        scheduler.add(job)?;
    }

    scheduler.schedule().await?;

    let results = scheduler.into_results();
    let report = MetricsReport::from_results(&results)?;

    match args.output {
        OutputFormat::Json => {
            let output = RunOutput {
                results: &results,
                metrics: &report,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Table => print_table(&results, &report),
    }
    Ok(())
}

// =============================================================================
// Main Entry Point
// =============================================================================

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Logs go to stderr so JSON output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Commands::Run(run_args) => {
            run(run_args).await?;
        }
    }

    Ok(())
}
