use crate::error::AppError;
use crate::evaluate::{run_evaluate, run_profiles, EvaluateArgs};
use crate::infra::EvaluationDefaults;
use crate::server;
use clap::{Args, Parser, Subcommand};
use roster_engine::config::AppConfig;

#[derive(Parser, Debug)]
#[command(
    name = "roster-engine",
    about = "Validate and score monthly duty rosters",
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
    /// Validate and score one candidate roster from files
    Evaluate(EvaluateArgs),
    /// List the built-in strategy profiles and their weights
    Profiles,
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
        Command::Evaluate(args) => {
            let config = AppConfig::load()?;
            run_evaluate(args, &EvaluationDefaults::load(&config.evaluation)?)
        }
        Command::Profiles => {
            let config = AppConfig::load()?;
            run_profiles(&EvaluationDefaults::load(&config.evaluation)?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn evaluate_accepts_repeated_holidays() {
        let cli = Cli::try_parse_from([
            "roster-engine",
            "evaluate",
            "--staff",
            "staff.csv",
            "--schedule",
            "schedule.json",
            "--profile",
            "b",
            "--holiday",
            "2025-09-03",
            "--holiday",
            "2025-09-17",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Evaluate(args)) => {
                assert_eq!(args.holidays.len(), 2);
                assert_eq!(args.profile, Some(roster_engine::ProfilePreset::B));
                assert!(args.rules.is_none());
            }
            other => panic!("expected evaluate, got {other:?}"),
        }
    }

    #[test]
    fn profile_and_weights_are_exclusive() {
        let result = Cli::try_parse_from([
            "roster-engine",
            "evaluate",
            "--staff",
            "staff.csv",
            "--schedule",
            "schedule.json",
            "--profile",
            "A",
            "--weights",
            "weights.json",
        ]);

        assert!(result.is_err());
    }
}
