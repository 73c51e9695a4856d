//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use filelist_core::{ClientConfig, FileId};
use std::path::PathBuf;

const CLI_AFTER_HELP: &str = "\
EXAMPLES:
  filelist                             List files on the service
  filelist upload ./scan.pdf -n invoice
  filelist download 7 --download-dir ~/Downloads
  filelist rename 7 contract           Prompts for a name when omitted
  filelist delete 7
  filelist --host files.lan shell      Interactive session

CONFIG:
  $FILELIST_HOME/config.toml (default ~/.filelist/config.toml)
  Keys: host, port, scheme, request_timeout_seconds, download_dir, verbose";

/// filelist - list, upload, rename, download and delete files on a storage service
#[derive(Parser, Debug)]
#[command(
    name = "filelist",
    version,
    about = "List, upload, rename, download and delete files on a storage service",
    after_help = CLI_AFTER_HELP
)]
pub struct Cli {
    /// Service host (overrides config)
    #[arg(long, global = true, value_name = "HOST")]
    pub host: Option<String>,

    /// Service port (overrides config)
    #[arg(short = 'p', long, global = true, value_name = "PORT")]
    pub port: Option<u16>,

    /// Directory downloads are saved into (overrides config)
    #[arg(long = "download-dir", global = true, value_name = "DIR")]
    pub download_dir: Option<PathBuf>,

    /// Print JSON instead of a table
    #[arg(long, global = true)]
    pub json: bool,

    /// Log every request to stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<FileCommand>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum FileCommand {
    /// List files (default)
    #[command(visible_alias = "ls")]
    List,

    /// Upload a file
    #[command(visible_alias = "up")]
    Upload {
        /// File to upload
        path: Option<PathBuf>,
        /// Name to store it under
        #[arg(short = 'n', long, value_name = "NAME")]
        name: Option<String>,
    },

    /// Download a file into the download directory
    #[command(visible_alias = "get")]
    Download {
        /// File id
        id: FileId,
    },

    /// Rename a file
    #[command(visible_alias = "mv")]
    Rename {
        /// File id
        id: FileId,
        /// New name (prompted for when omitted)
        name: Option<String>,
    },

    /// Delete a file
    #[command(visible_alias = "rm")]
    Delete {
        /// File id
        id: FileId,
    },

    /// Interactive session
    Shell,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded config.
    pub fn apply_to(&self, config: &mut ClientConfig) {
        if let Some(ref host) = self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(ref dir) = self.download_dir {
            config.download_dir = Some(dir.clone());
        }
        if self.verbose {
            config.verbose = true;
        }
    }

    pub fn command(&self) -> FileCommand {
        self.command.clone().unwrap_or(FileCommand::List)
    }
}
