use clap::Parser;
use tracing::error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use deal_finder::api::cli::{Cli, Command, run_analyze};
use deal_finder::api::run_http_server;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match Cli::parse().command {
        Command::Serve(args) => {
            if let Err(e) = run_http_server(args.host, args.port).await {
                error!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Command::Analyze(args) => {
            let pretty = args.pretty;
            let result = match run_analyze(args) {
                Ok(result) => result,
                Err(e) => {
                    eprintln!("Invalid input: {e}");
                    std::process::exit(1);
                }
            };
            let json = if pretty {
                serde_json::to_string_pretty(&result)
            } else {
                serde_json::to_string(&result)
            };
            match json {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("Failed to serialize result: {e}");
                    std::process::exit(1);
                }
            }
        }
    }
}
