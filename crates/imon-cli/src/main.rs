use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "imon")]
#[command(about = "Inventory minimum-stock monitor", long_about = None)]
struct Cli {
    /// Layered config paths in merge order (base -> site -> local). Repeatable.
    #[arg(long = "config", global = true)]
    config_paths: Vec<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Authenticate against the inventory API and exit
    Login {
        /// User e-mail
        #[arg(long)]
        user: String,
    },

    /// Upload a minimum-stock sheet (CSV) for a user
    Upload {
        #[arg(long)]
        user: String,

        /// CSV with key, name and minimum-quantity columns
        #[arg(long)]
        file: PathBuf,
    },

    /// Reconcile the user's list against the catalog
    Check {
        #[arg(long)]
        user: String,

        /// Upload this sheet first, in the same session
        #[arg(long)]
        file: Option<PathBuf>,

        /// Ignore the shared catalog snapshot and fetch everything
        #[arg(long, default_value_t = false)]
        refresh: bool,

        /// Statuses to list (critical, low, ok, not_found). Default: critical,low
        #[arg(long = "status", value_delimiter = ',', conflicts_with = "all")]
        statuses: Vec<String>,

        /// List every row regardless of status
        #[arg(long, default_value_t = false)]
        all: bool,

        /// Case-insensitive filter on key or name
        #[arg(long)]
        search: Option<String>,

        /// Write CSV + printable HTML + manifest under exports/<run_id>/
        #[arg(long, default_value_t = false)]
        export: bool,

        /// Override the configured exports directory
        #[arg(long = "export-dir", requires = "export")]
        export_dir: Option<PathBuf>,

        /// Title of the printable document
        #[arg(long, default_value = imon_report::DEFAULT_TITLE)]
        title: String,

        /// Print the first raw catalog record (only available after a fetch)
        #[arg(long = "raw-sample", default_value_t = false)]
        raw_sample: bool,
    },

    /// Local cache inspection
    Cache {
        #[command(subcommand)]
        cmd: CacheCmd,
    },
}

#[derive(Subcommand)]
enum CacheCmd {
    /// Show what the store holds for the catalog and, optionally, a user
    Status {
        #[arg(long)]
        user: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env.local if present (dev convenience). Silent if missing.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::ConfigHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = imon_config::load_layered_yaml(&path_refs)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }

        Commands::Login { user } => {
            let (loaded, cfg) = commands::load_config(&cli.config_paths)?;
            let api = commands::http_api(&cfg);
            let ctx = commands::open_session(&loaded, &cfg, &api, &user).await?;
            println!("authenticated=true user={}", ctx.user);
            println!("namespace={}", ctx.minimum_stock_ns);
        }

        Commands::Upload { user, file } => {
            commands::check::upload(&cli.config_paths, &user, &file).await?;
        }

        Commands::Check {
            user,
            file,
            refresh,
            statuses,
            all,
            search,
            export,
            export_dir,
            title,
            raw_sample,
        } => {
            commands::check::check(commands::check::CheckArgs {
                config_paths: cli.config_paths,
                user,
                file,
                refresh,
                statuses,
                all,
                search,
                export,
                export_dir,
                title,
                raw_sample,
            })
            .await?;
        }

        Commands::Cache { cmd } => match cmd {
            CacheCmd::Status { user } => {
                commands::cache::status(&cli.config_paths, user.as_deref())?;
            }
        },
    }

    Ok(())
}

fn init_tracing() {
    // stderr keeps stdout a clean key=value report.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}
