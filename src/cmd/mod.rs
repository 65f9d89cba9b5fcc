mod generate;
mod load;
mod query;
mod run;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate as gen_completions, Shell};
use std::io;

#[derive(Parser)]
#[command(name = "order-etl")]
#[command(version)]
#[command(
    about = "Generate synthetic orders, build a star schema, and load it into DuckDB or PostgreSQL",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline: generate, transform, load
    Run(run::RunArgs),

    /// Generate the raw-order interchange file only
    Generate(generate::GenerateArgs),

    /// Transform and load an existing interchange file
    Load(load::LoadArgs),

    /// Run read-only aggregate reports against a loaded store
    Query(query::QueryArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Run(args) => run::run(args),
        Commands::Generate(args) => generate::run(args),
        Commands::Load(args) => load::run(args),
        Commands::Query(args) => query::run(args),
        Commands::Completions { shell } => {
            gen_completions(shell, &mut Cli::command(), "order-etl", &mut io::stdout());
            Ok(())
        }
    }
}
