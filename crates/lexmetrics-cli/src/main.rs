//! lexmetrics CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "lexmetrics",
    version,
    about = "Linguistic quality metrics for educational resources"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single resource in detail
    Analyze {
        /// Resource file or directory (overrides the configured store)
        #[arg(long)]
        data: Option<PathBuf>,

        /// Resource ID
        #[arg(long)]
        id: String,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Analyze a batch of resources
    Batch {
        /// Resource file or directory (overrides the configured store)
        #[arg(long)]
        data: Option<PathBuf>,

        /// Only resources of this type (e.g. comprension, escritura)
        #[arg(long = "type")]
        resource_type: Option<String>,

        /// Only resources owned by this user
        #[arg(long)]
        owner: Option<String>,

        /// Maximum number of matching resources to take
        #[arg(long)]
        limit: Option<usize>,

        /// Number of matching resources to skip
        #[arg(long)]
        offset: Option<usize>,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,

        /// Also save the analysis as JSON to this file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Analyze resources concurrently
        #[arg(long)]
        parallel: bool,
    },

    /// Quality report for one user's resources
    UserReport {
        /// Resource file or directory (overrides the configured store)
        #[arg(long)]
        data: Option<PathBuf>,

        /// Owner ID
        #[arg(long)]
        user_id: String,

        /// Display name (defaults to the ID)
        #[arg(long)]
        user_name: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Validate resource files
    Validate {
        /// Resource file or directory
        #[arg(long)]
        data: PathBuf,
    },

    /// Create a starter config and example resources
    Init,
}

#[tokio::main]
async fn main() {
    let directive: tracing_subscriber::filter::Directive = match "lexmetrics=info".parse() {
        Ok(directive) => directive,
        Err(e) => {
            eprintln!("Error: invalid log directive: {e}");
            process::exit(1);
        }
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(directive))
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Analyze { data, id, format } => {
            commands::analyze::execute(config, data, id, format).await
        }
        Commands::Batch {
            data,
            resource_type,
            owner,
            limit,
            offset,
            format,
            output,
            parallel,
        } => {
            commands::batch::execute(commands::batch::BatchArgs {
                config,
                data,
                resource_type,
                owner,
                limit,
                offset,
                format,
                output,
                parallel,
            })
            .await
        }
        Commands::UserReport {
            data,
            user_id,
            user_name,
            format,
        } => commands::user_report::execute(config, data, user_id, user_name, format).await,
        Commands::Validate { data } => commands::validate::execute(data),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
