// filelist-cli: terminal frontend for filelist-core
// Argument parsing, config overrides, output and the interactive shell

mod cli;
mod output;
mod run;
mod shell;

use std::io::{self, BufRead, IsTerminal, Write};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use filelist_core::{ClientConfig, FileListClient, config};
use log::warn;

use cli::{Cli, FileCommand};
use output::{OutputFormat, Presenter};

/// Log filter: our crates at `warn` (or `debug` when verbose), deps at `warn`.
/// `RUST_LOG` replaces it entirely.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let default_filter = format!("warn,filelist={level},filelist_core={level}");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

/// Load config from the home directory. Problems are returned as a warning
/// to print once logging is up.
fn load_config() -> (ClientConfig, Option<String>) {
    let Some(home) = config::home_dir() else {
        return (
            ClientConfig::default(),
            Some("could not determine home directory; using default config".to_string()),
        );
    };
    match ClientConfig::load(&home) {
        Ok(config) => (config, None),
        Err(e) => (
            ClientConfig::default(),
            Some(format!("{}; using default config", e)),
        ),
    }
}

/// Ask for a new name on the terminal. Empty input or end of input cancels.
fn prompt_new_name() -> Option<String> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        eprint!("Enter new file name: ");
        io::stderr().flush().ok();
    }
    let mut input = String::new();
    match stdin.lock().read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(input.trim_end_matches(['\r', '\n']).to_string()),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let (mut config, config_warning) = load_config();
    cli.apply_to(&mut config);
    init_logging(config.verbose);
    if let Some(warning) = config_warning {
        warn!("{}", warning);
    }

    let command = cli.command();
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Table
    };
    let presenter = Arc::new(Presenter::new(format, command == FileCommand::Shell));

    let client = match FileListClient::from_config(&config, Arc::clone(&presenter)) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    // Every command needs the current list to resolve ids and names.
    let loaded = client.load_all().await.is_ok();

    let ok = match command {
        FileCommand::List => {
            if loaded {
                presenter.print_latest();
            } else {
                eprintln!("Could not load the file list from {}", config.base_url());
            }
            loaded
        }
        FileCommand::Upload { path, name } => {
            run::upload(&client, &presenter, path.as_deref(), name.as_deref()).await
        }
        FileCommand::Download { id } => run::download(&client, &presenter, &id).await,
        FileCommand::Rename { id, name } => {
            let name = name.or_else(prompt_new_name);
            run::rename(&client, &presenter, &id, name.as_deref()).await
        }
        FileCommand::Delete { id } => run::delete(&client, &presenter, &id).await,
        FileCommand::Shell => {
            shell::run_shell(&client, &presenter).await;
            true
        }
    };

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
