use clap::Parser;
use osticket_cli::cli::dispatcher::Dispatcher;
use osticket_cli::cli::main_types::Cli;
use osticket_cli::storage::config::Config;
use osticket_cli::utils::logging::{log_error, print_verbose};
use std::path::PathBuf;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config_path = cli
        .config_dir
        .as_ref()
        .map(|dir| PathBuf::from(dir).join("config.toml"));

    let config = match Config::load(config_path.clone()) {
        Ok(config) => config,
        Err(err) => {
            log_error(&format!("loading config: {}", err));
            std::process::exit(1);
        }
    };

    if cli.verbose {
        print_verbose(true, "Verbose mode is enabled");
        if let Some(config_dir) = &cli.config_dir {
            print_verbose(true, &format!("Using config directory: {}", config_dir));
        }
    }

    let mut dispatcher = Dispatcher::new(config, config_path, cli.verbose);

    if let Err(e) = dispatcher.dispatch(cli.command).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
