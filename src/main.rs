use clap::Parser;
use llama_admin::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Args(args) => cli::args::run(args).await,
        Command::Validate(args) => cli::validate::run(args).await,
        Command::Params(args) => cli::params::run(args).await,
        Command::Set(args) => cli::set::run(args).await,
    }
}
