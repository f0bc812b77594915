use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use keystone_meta::api::{build_router, cors_layer, state::AppState};
use keystone_meta::config::{AppConfig, ViewConfig, ViewOverrides};
use keystone_meta::models::{
    CompositionRecord, GemUsage, KeyLevelRecord, Role, SlotUsage, SpecUsage, TalentBuildUsage,
};
use keystone_meta::storage::load_records;
use keystone_meta::views::{self, CompositionScope};

#[derive(Parser)]
#[command(name = "keystone-meta")]
#[command(about = "Mythic+ statistics aggregation engine")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one statistics view over a saved record dump and print it as JSON
    View {
        /// Which view to compute
        #[arg(value_enum)]
        kind: ViewKind,

        /// Record dump (JSON array or JSONL)
        #[arg(long)]
        input: PathBuf,

        /// Restrict to one dungeon (compositions, specs)
        #[arg(long)]
        dungeon: Option<String>,

        /// Role to report (specs)
        #[arg(long)]
        role: Option<Role>,

        /// Class name (talents)
        #[arg(long)]
        class: Option<String>,

        /// Specialization name (talents)
        #[arg(long)]
        spec: Option<String>,

        /// Keep only the first N entries (0 = all)
        #[arg(long)]
        top_n: Option<usize>,

        /// Drop groups with less total usage than this
        #[arg(long)]
        min_usage: Option<u64>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ViewKind {
    BestItems,
    BestEnchants,
    Slots,
    GemOverview,
    GemsBySlot,
    Compositions,
    KeyLevels,
    Specs,
    Talents,
}

/// Parameters of a single `view` invocation.
struct ViewArgs {
    kind: ViewKind,
    input: PathBuf,
    dungeon: Option<String>,
    role: Option<Role>,
    class: Option<String>,
    spec: Option<String>,
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {:?}", cli.config))?;

    let log_level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    init_tracing(&log_level, cli.json_logs);

    tracing::info!("Starting keystone-meta v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::View {
            kind,
            input,
            dungeon,
            role,
            class,
            spec,
            top_n,
            min_usage,
            pretty,
        } => {
            let view_config = config.views.merged(&ViewOverrides { top_n, min_usage });
            let args = ViewArgs {
                kind,
                input,
                dungeon,
                role,
                class,
                spec,
                pretty,
            };
            let output = run_view(&args, &view_config)?;
            println!("{}", output);
        }
        Commands::Serve { host, port } => {
            let host = host.unwrap_or(config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let state = AppState::new(config.views);
            let app = build_router(state).layer(cors_layer(&config.server.cors_origin));
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // stdout carries view output, so logs go to stderr
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
    });
    let plain_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(plain_layer)
        .init();
}

fn run_view(args: &ViewArgs, config: &ViewConfig) -> Result<String> {
    let input = args.input.as_path();
    tracing::info!("Computing {:?} from {:?}", args.kind, input);

    match args.kind {
        ViewKind::BestItems => {
            let records: Vec<SlotUsage> = load(input)?;
            render(&views::best_items_by_slot(&records, config)?, args.pretty)
        }
        ViewKind::BestEnchants => {
            let records: Vec<SlotUsage> = load(input)?;
            render(&views::best_enchants_by_slot(&records, config)?, args.pretty)
        }
        ViewKind::Slots => {
            let records: Vec<SlotUsage> = load(input)?;
            render(&views::slot_usage_table(&records, config)?, args.pretty)
        }
        ViewKind::GemOverview => {
            let records: Vec<GemUsage> = load(input)?;
            render(&views::gem_combination_overview(&records, config)?, args.pretty)
        }
        ViewKind::GemsBySlot => {
            let records: Vec<GemUsage> = load(input)?;
            render(&views::gem_combinations_by_slot(&records, config)?, args.pretty)
        }
        ViewKind::Compositions => {
            let records: Vec<CompositionRecord> = load(input)?;
            let scope = match &args.dungeon {
                Some(dungeon) => CompositionScope::Dungeon(dungeon.clone()),
                None => CompositionScope::Global,
            };
            render(&views::team_compositions(&records, &scope, config)?, args.pretty)
        }
        ViewKind::KeyLevels => {
            let records: Vec<KeyLevelRecord> = load(input)?;
            render(&views::key_level_distribution(&records, config)?, args.pretty)
        }
        ViewKind::Specs => {
            let role = args.role.context("--role is required for the specs view")?;
            let records: Vec<SpecUsage> = load(input)?;
            let view = match &args.dungeon {
                Some(dungeon) => views::spec_usage_by_dungeon_role(&records, dungeon, role, config)?,
                None => views::spec_usage_by_role(&records, role, config)?,
            };
            render(&view, args.pretty)
        }
        ViewKind::Talents => {
            let class = args
                .class
                .as_deref()
                .context("--class is required for the talents view")?;
            let spec = args
                .spec
                .as_deref()
                .context("--spec is required for the talents view")?;
            let records: Vec<TalentBuildUsage> = load(input)?;
            render(&views::talent_builds(&records, class, spec, config)?, args.pretty)
        }
    }
}

fn load<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    load_records(path).with_context(|| format!("loading records from {:?}", path))
}

fn render<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
