use crate::demo::{run_demo, DemoArgs};
use crate::server;
use crate::validate::{run_validate, ValidateArgs};
use clap::{Args, Parser, Subcommand};
use puppyhub::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "PuppyHub Adoption Application",
    about = "Serve, demonstrate, and check puppy adoption applications from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Walk a sample application through every step and submit it
    Demo(DemoArgs),
    /// Check a saved application document against the form rules
    Validate(ValidateArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args).await,
        Command::Validate(args) => run_validate(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve_without_subcommand() {
        let cli = Cli::try_parse_from(["puppyhub-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_demo_latency_and_validate_path() {
        let cli = Cli::try_parse_from(["puppyhub-api", "demo", "--latency-ms", "0"])
            .expect("parses demo");
        match cli.command {
            Some(Command::Demo(args)) => assert_eq!(args.latency_ms, 0),
            other => panic!("expected demo command, got {other:?}"),
        }

        let cli = Cli::try_parse_from(["puppyhub-api", "validate", "saved.json"])
            .expect("parses validate");
        match cli.command {
            Some(Command::Validate(args)) => assert_eq!(args.path.to_str(), Some("saved.json")),
            other => panic!("expected validate command, got {other:?}"),
        }
    }
}
