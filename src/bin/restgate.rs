use clap::Parser;
use restgate::cli::{run_cli, Cli};
use restgate::logging::{init_logging_with_config, LogConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = init_logging_with_config(&LogConfig::from_env()) {
        eprintln!("Warning: {e:#}");
    }

    match run_cli(&cli) {
        Ok(response) => {
            println!("{} {}", response.status, response.reason());
            for (name, value) in &response.headers {
                println!("{name}: {value}");
            }
            println!();
            match serde_json::to_string_pretty(&response.body) {
                Ok(body) => println!("{body}"),
                Err(e) => eprintln!("Error: cannot render body: {e}"),
            }
            if response.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
