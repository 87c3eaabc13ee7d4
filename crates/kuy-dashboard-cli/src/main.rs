mod cli;
mod commands;
mod config;
mod display;
mod error;
mod logging;
mod output;
mod progress;
mod source;

use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();
    let output = output::OutputContext::from_global(&cli.global);
    logging::init(&cli.global, output.use_color);

    let result = match cli.command {
        cli::Commands::List(args) => commands::list::run(args, &cli.global, &output).await,
        cli::Commands::Show(args) => commands::show::run(args, &cli.global, &output).await,
        cli::Commands::Add(args) => commands::add::run(args, &cli.global, &output).await,
        cli::Commands::Edit(args) => commands::edit::run(args, &cli.global, &output).await,
        cli::Commands::Delete(args) => commands::delete::run(args, &cli.global, &output).await,
        cli::Commands::Schemas(args) => commands::schemas::run(args, &cli.global, &output),
        cli::Commands::Summary => commands::summary::run(&cli.global, &output).await,
        cli::Commands::Profile => commands::profile::run(&cli.global, &output).await,
        cli::Commands::Login(args) => commands::login::run(args, &cli.global, &output).await,
        cli::Commands::Completions(args) => commands::completions::run(args),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            output.print_error(&e);
            std::process::exit(e.exit_code() as i32);
        }
    }
}
