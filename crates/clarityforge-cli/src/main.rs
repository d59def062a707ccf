//! clarityforge CLI: explain a topic, get a structured critique back.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

use commands::analyze::OutputFormat;
use commands::schema::Dialect;

#[derive(Parser)]
#[command(
    name = "clarityforge",
    version,
    about = "Feynman-technique feedback on your explanations"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one explanation and print the result
    Analyze {
        /// Topic being explained (defaults to "General Knowledge")
        #[arg(long, default_value = "")]
        topic: String,

        /// Explanation text
        #[arg(long, conflicts_with = "file")]
        explanation: Option<String>,

        /// Read the explanation from a file ("-" for stdin)
        #[arg(long)]
        file: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write json/html output to this path instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the configured model
        #[arg(long)]
        model: Option<String>,
    },

    /// Interactive session: type an explanation, then `:submit`
    Session {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the configured model
        #[arg(long)]
        model: Option<String>,
    },

    /// Print the response schema sent to the model
    Schema {
        /// Schema dialect
        #[arg(long, value_enum, default_value_t = Dialect::Gemini)]
        dialect: Dialect,
    },

    /// Create a starter clarityforge.toml
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(
                    "clarityforge=info"
                        .parse()
                        .unwrap_or_else(|_| tracing_subscriber::filter::LevelFilter::INFO.into()),
                )
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            topic,
            explanation,
            file,
            format,
            output,
            config,
            model,
        } => {
            commands::analyze::execute(commands::analyze::AnalyzeArgs {
                topic,
                explanation,
                file,
                format,
                output,
                config,
                model,
            })
            .await
        }
        Commands::Session { config, model } => commands::session::execute(config, model).await,
        Commands::Schema { dialect } => commands::schema::execute(dialect),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
