//! Kickoff CLI
//!
//! Triggers a build on a Jenkins-style CI server and, when asked to, waits for
//! its result. The exit status is non-zero whenever the build (or the wait for
//! it) did not succeed.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "kickoff")]
#[command(about = "Trigger CI builds and wait for their result", long_about = None)]
struct Cli {
    /// CI server base URL
    #[arg(long, global = true, env = "KICKOFF_URL", default_value = "")]
    url: String,

    /// User name for Basic authentication
    #[arg(long, global = true, env = "KICKOFF_USER")]
    user: Option<String>,

    /// API token for Basic authentication
    #[arg(long, global = true, env = "KICKOFF_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// Extra request header as "Name: value"; overrides defaults with the same name.
    /// KICKOFF_HEADERS takes one header per line.
    #[arg(
        long = "header",
        global = true,
        env = "KICKOFF_HEADERS",
        value_delimiter = '\n',
        hide_env_values = true
    )]
    headers: Vec<String>,

    /// Accept invalid TLS certificates
    #[arg(long, global = true, env = "KICKOFF_INSECURE")]
    insecure: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; stdout is reserved for the report
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kickoff=info,kickoff_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::new(
        cli.url,
        cli.user,
        cli.api_token,
        &cli.headers,
        cli.insecure,
    )?;
    config.validate()?;

    handle_command(cli.command, &config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    fn parse_wait(args: &[&str]) -> bool {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Trigger(trigger) => trigger.wait,
            Commands::Status(_) => panic!("expected trigger"),
        }
    }

    #[test]
    fn test_wait_flag_is_an_explicit_boolean() {
        assert!(!parse_wait(&["kickoff", "trigger", "deploy"]));
        assert!(parse_wait(&["kickoff", "trigger", "--wait", "deploy"]));
        assert!(parse_wait(&["kickoff", "trigger", "deploy", "--wait=true"]));
        assert!(!parse_wait(&["kickoff", "trigger", "deploy", "--wait=false"]));
        assert!(Cli::try_parse_from(["kickoff", "trigger", "deploy", "--wait=maybe"]).is_err());
    }

    #[test]
    fn test_repeated_headers() {
        let cli = Cli::try_parse_from([
            "kickoff",
            "--url",
            "https://ci.example.com",
            "--header",
            "X-Team: platform",
            "--header",
            "X-Trace: 1",
            "status",
            "deploy",
        ])
        .unwrap();
        assert_eq!(cli.headers, vec!["X-Team: platform", "X-Trace: 1"]);
        assert_eq!(cli.url, "https://ci.example.com");
    }

    #[test]
    fn test_header_values_keep_commas() {
        let cli = Cli::try_parse_from([
            "kickoff",
            "--header",
            "Accept: application/json, text/plain",
            "--header",
            "X-Team: platform\nX-Trace: 1",
            "status",
            "deploy",
        ])
        .unwrap();
        assert_eq!(
            cli.headers,
            vec![
                "Accept: application/json, text/plain",
                "X-Team: platform",
                "X-Trace: 1"
            ]
        );
    }
}
