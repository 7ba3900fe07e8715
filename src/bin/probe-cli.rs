use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "probe-cli")]
#[command(about = "Query a running liveness probe; exits non-zero unless it reports WORKING", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Give up on the request after this many seconds.
    #[arg(short, long, default_value_t = 30)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check dependencies one after another
    Serial,
    /// Check dependencies concurrently
    Parallel,
}

impl Commands {
    fn path(&self) -> &'static str {
        match self {
            Commands::Serial => "/healthcheck/",
            Commands::Parallel => "/parallel-healthcheck/",
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let url = format!("{}{}", cli.url.trim_end_matches('/'), cli.command.path());

    match check(&url, Duration::from_secs(cli.timeout_secs)).await {
        Ok(body) if body.starts_with("WORKING") => {
            println!("{}", body);
            ExitCode::SUCCESS
        }
        Ok(body) => {
            eprintln!("{}", body);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: could not query {}: {}", url, e);
            ExitCode::from(2)
        }
    }
}

async fn check(url: &str, timeout: Duration) -> Result<String, reqwest::Error> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    client.get(url).send().await?.text().await
}
