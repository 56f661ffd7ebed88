use std::path::PathBuf;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::database::{self, WarehouseOptions};
use crate::reporting::domain::ranges::{RangePreset, ALL_PRESETS};
use crate::reporting::queries::postgres::PostgresQueries;
use crate::reporting::queries::DynDepositQueries;
use crate::reporting::services::ReportService;
use crate::site;

#[derive(Parser)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Refresh the published dashboard artifact.
    Refresh(RefreshOpts),
    /// Assemble the report payload and print it to stdout.
    Payload(PayloadOpts),
}

#[derive(Args)]
struct WarehouseOpts {
    /// Account identifier for the warehouse.
    #[clap(long = "warehouse-account", env = "WAREHOUSE_ACCOUNT")]
    warehouse_account: String,

    /// User the warehouse session authenticates as.
    #[clap(long = "warehouse-user", env = "WAREHOUSE_USER")]
    warehouse_user: String,

    /// Credential for the warehouse user.
    #[clap(
        long = "warehouse-password",
        env = "WAREHOUSE_PASSWORD",
        hide_env_values = true
    )]
    warehouse_password: String,

    /// Compute unit the report queries run on.
    #[clap(long = "warehouse-name", env = "WAREHOUSE_NAME")]
    warehouse_name: String,

    /// Database holding the posted-transactions table.
    #[clap(
        long = "warehouse-database",
        env = "WAREHOUSE_DATABASE",
        default_value = "analytics"
    )]
    warehouse_database: String,

    /// The number of seconds before a warehouse connection times out.
    #[clap(long = "warehouse-timeout", default_value = "5")]
    warehouse_timeout: u8,
}

impl From<&WarehouseOpts> for WarehouseOptions {
    fn from(opts: &WarehouseOpts) -> Self {
        Self {
            account: opts.warehouse_account.clone(),
            user: opts.warehouse_user.clone(),
            password: opts.warehouse_password.clone(),
            warehouse: opts.warehouse_name.clone(),
            database: opts.warehouse_database.clone(),
            timeout_seconds: opts.warehouse_timeout,
        }
    }
}

#[derive(Args)]
struct RunOpts {
    #[clap(flatten)]
    warehouse: WarehouseOpts,

    /// Date treated as "today" when resolving rolling ranges.
    ///
    /// Defaults to the current date in UTC. Overriding it makes a run fully
    /// deterministic.
    #[clap(long = "as-of", value_name = "YYYY-MM-DD")]
    as_of: Option<NaiveDate>,

    /// Limit the run to specific range presets. May be repeated.
    #[clap(long = "range", value_name = "NAME")]
    ranges: Vec<String>,
}

#[derive(Args)]
struct RefreshOpts {
    #[clap(flatten)]
    run: RunOpts,

    /// Directory containing the dashboard templates.
    #[clap(long = "template-dir", default_value = "templates")]
    template_dir: PathBuf,

    /// Path the rendered dashboard is published to.
    #[clap(long = "output", default_value = "index.html")]
    output: PathBuf,
}

#[derive(Args)]
struct PayloadOpts {
    #[clap(flatten)]
    run: RunOpts,
}

pub async fn run_with_sys_args() -> anyhow::Result<()> {
    use tracing_subscriber::prelude::*;

    let cli = Cli::parse();

    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(EnvFilter::from_default_env());
    tracing_subscriber::registry().with(fmt_layer).init();

    match cli.command {
        Commands::Refresh(opts) => refresh(opts).await,
        Commands::Payload(opts) => print_payload(opts).await,
    }
}

async fn refresh(opts: RefreshOpts) -> anyhow::Result<()> {
    // Load templates before touching the warehouse so a configuration
    // problem fails the run without any queries being issued.
    let templates = site::load_templates(&opts.template_dir)?;

    let (service, presets, as_of) = prepare(&opts.run).await?;

    let payload = service.assemble(&presets, as_of).await;
    let page = site::render_dashboard(&templates, &payload, as_of)?;
    site::publish(&opts.output, &page)?;

    let degraded = payload.degraded_ranges();
    if degraded.is_empty() {
        info!(output = %opts.output.display(), "Published refreshed dashboard.");
    } else {
        info!(
            output = %opts.output.display(),
            degraded = degraded.join(", "),
            "Published dashboard with degraded ranges."
        );
    }

    Ok(())
}

async fn print_payload(opts: PayloadOpts) -> anyhow::Result<()> {
    let (service, presets, as_of) = prepare(&opts.run).await?;

    let payload = service.assemble(&presets, as_of).await;
    println!("{}", payload.to_json()?);

    Ok(())
}

async fn prepare(opts: &RunOpts) -> anyhow::Result<(ReportService, Vec<RangePreset>, NaiveDate)> {
    let presets = selected_presets(&opts.ranges)?;

    // Snapshot "today" once so every rolling range in the run agrees on it.
    let as_of = opts.as_of.unwrap_or_else(|| Utc::now().date_naive());
    info!(%as_of, "Starting report run.");

    let connection = database::connect(&WarehouseOptions::from(&opts.warehouse)).await?;
    let deposit_queries: DynDepositQueries = Arc::new(PostgresQueries(connection));

    Ok((ReportService::new(deposit_queries), presets, as_of))
}

fn selected_presets(names: &[String]) -> anyhow::Result<Vec<RangePreset>> {
    if names.is_empty() {
        return Ok(ALL_PRESETS.to_vec());
    }

    names
        .iter()
        .map(|name| Ok(RangePreset::from_name(name)?))
        .collect()
}
