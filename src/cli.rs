use clap::{Parser, Subcommand};
use std::path::PathBuf;
use anyhow::Result;

use crate::config::{OutputFormat, Strategy};
use crate::core::Engine;

#[derive(Parser)]
#[command(name = "callflow")]
#[command(about = "Discovers what code runs when a Java method is called")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Project root the source roots are relative to (defaults to current directory)
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default callflow.toml
    Init {
        /// Target directory (defaults to the project root)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Overwrite an existing configuration
        #[arg(long)]
        force: bool,
    },

    /// Build the call graph of one method
    Analyze {
        /// Fully qualified type name, e.g. com.acme.rest.UserController
        type_name: String,

        /// Method name (overloads are not distinguished)
        method: String,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Analyzer strategy
        #[arg(short, long, value_enum)]
        strategy: Option<Strategy>,
    },

    /// Analyze several entry points concurrently
    Batch {
        /// Entries as <Type>#<method>
        #[arg(required = true)]
        entries: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Directory receiving one report per entry
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Analyzer strategy
        #[arg(short, long, value_enum)]
        strategy: Option<Strategy>,
    },

    /// Locate the controller handling a method and analyze it
    Endpoint {
        /// Handler method name
        method: String,

        /// Restrict the search to this controller's simple name
        #[arg(long)]
        controller: Option<String>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Analyzer strategy
        #[arg(short, long, value_enum)]
        strategy: Option<Strategy>,
    },
}

impl Cli {
    pub async fn execute(self, engine: Engine) -> Result<()> {
        match self.command {
            Commands::Init { path, force } => {
                engine.init(path, force)
            }
            Commands::Analyze { type_name, method, format, output, strategy } => {
                engine.analyze(&type_name, &method, format, output, strategy)
            }
            Commands::Batch { entries, format, output_dir, strategy } => {
                engine.batch(entries, format, output_dir, strategy).await.map(|_| ())
            }
            Commands::Endpoint { method, controller, format, output, strategy } => {
                engine.endpoint(&method, controller.as_deref(), format, output, strategy)
            }
        }
    }
}
