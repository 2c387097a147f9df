//! Blockwright CLI - discover, validate and create platform building blocks

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod config;
mod display;
mod error;
mod exit_codes;
mod logging;
mod util;

use commands::Context;
use config::{GlobalArgs, Settings};
use error::Result;

#[derive(Parser)]
#[command(name = "blockwright")]
#[command(author = "Blockwright Contributors")]
#[command(version)]
#[command(about = "Discover, validate and create Kratix platform building blocks", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// List building blocks available in the cluster
    List,

    /// Show the schema of a building block
    Describe {
        /// Building block (Promise) name
        name: String,
    },

    /// Validate a spec against a building block schema
    Validate {
        /// Building block (Promise) name
        name: String,

        /// Spec as a JSON object, @file or - for stdin
        #[arg(long)]
        spec: String,
    },

    /// Validate a spec and create a building block instance
    Create {
        /// Building block (Promise) name
        name: String,

        /// Name of the resource to create
        resource_name: String,

        /// Target namespace
        #[arg(short, long)]
        namespace: String,

        /// Spec as a JSON object, @file or - for stdin
        #[arg(long)]
        spec: String,
    },

    /// Read building block instances (every known kind when no URI is given)
    Resources {
        /// Resource URI, e.g. k8s://githubrepos
        uri: Option<String>,

        /// Only list the readable URIs
        #[arg(long, conflicts_with = "uri")]
        list: bool,
    },

    /// List callable tools and their arguments
    Tools,

    /// Invoke a tool by name
    Call {
        /// Tool name
        tool: String,

        /// Arguments as a JSON object, @file or - for stdin
        #[arg(long)]
        args: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    miette::set_panic_hook();

    // Existing variables win over .env entries
    let env_file = dotenvy::dotenv();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() {
                exit_codes::USAGE_ERROR
            } else {
                exit_codes::SUCCESS
            };
            let _ = err.print();
            return exit(code);
        }
    };

    match run(cli, env_file).await {
        Ok(()) => exit(exit_codes::SUCCESS),
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            exit(code)
        }
    }
}

fn exit(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

async fn run(cli: Cli, env_file: dotenvy::Result<PathBuf>) -> Result<()> {
    let settings = Settings::resolve(&cli.global)?;
    logging::init(&settings.log_level, settings.log_format)?;

    match env_file {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded environment file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Failed to load .env file"),
    }

    match cli.command {
        Commands::Tools => commands::tools::run(settings.json),
        Commands::Resources { list: true, .. } => commands::resources::list(settings.json),
        command => {
            let ctx = Context::connect(&settings).await?;
            match command {
                Commands::List => commands::list::run(&ctx).await,
                Commands::Describe { name } => commands::describe::run(&ctx, &name).await,
                Commands::Validate { name, spec } => commands::validate::run(&ctx, &name, &spec).await,
                Commands::Create {
                    name,
                    resource_name,
                    namespace,
                    spec,
                } => commands::create::run(&ctx, &name, &resource_name, &namespace, &spec).await,
                Commands::Resources { uri, .. } => commands::resources::run(&ctx, uri.as_deref()).await,
                Commands::Call { tool, args } => commands::call::run(&ctx, &tool, args.as_deref()).await,
                Commands::Tools => commands::tools::run(settings.json),
            }
        }
    }
}
