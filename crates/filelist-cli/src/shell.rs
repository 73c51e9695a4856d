//! Interactive session: one client, many commands.
//!
//! Lines are split shell-style, so names with spaces can be quoted:
//! `mv 3 "quarterly report"`.

use std::future::Future;
use std::io::Write;
use std::path::Path;
use std::pin::Pin;

use filelist_core::{FileId, FileListClient};
use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::output::Presenter;
use crate::run;

const SHELL_HELP: &str = "\
commands:
  ls                       show the file list
  refresh                  reload the list from the service
  up <path> [name]         upload a file
  get <id>                 download a file
  mv <id> [name]           rename a file (prompts when name is omitted)
  rm <id>                  delete a file
  help                     this text
  quit                     leave";

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    List,
    Refresh,
    Upload {
        path: Option<String>,
        name: Option<String>,
    },
    Download(FileId),
    Rename(FileId, Option<String>),
    Delete(FileId),
    Help,
    Quit,
    Empty,
    Unknown(String),
}

/// Parse a line typed at the prompt.
pub fn parse_line(line: &str) -> ShellCommand {
    let Some(words) = shlex::split(line) else {
        return ShellCommand::Unknown(line.trim().to_string());
    };
    let mut words = words.into_iter();
    let Some(verb) = words.next() else {
        return ShellCommand::Empty;
    };
    let id = |word: Option<String>| word.and_then(|w| w.parse::<FileId>().ok());

    match verb.as_str() {
        "ls" | "list" => ShellCommand::List,
        "refresh" | "reload" => ShellCommand::Refresh,
        "up" | "upload" => ShellCommand::Upload {
            path: words.next(),
            name: words.next(),
        },
        "get" | "download" => match id(words.next()) {
            Some(id) => ShellCommand::Download(id),
            None => ShellCommand::Unknown(verb),
        },
        "mv" | "rename" => match id(words.next()) {
            Some(id) => ShellCommand::Rename(id, words.next()),
            None => ShellCommand::Unknown(verb),
        },
        "rm" | "delete" => match id(words.next()) {
            Some(id) => ShellCommand::Delete(id),
            None => ShellCommand::Unknown(verb),
        },
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        _ => ShellCommand::Unknown(verb),
    }
}

fn prompt(text: &str) {
    eprint!("{}", text);
    std::io::stderr().flush().ok();
}

/// Read the next line from stdin, or `None` at end of input.
async fn next_line(lines: &mut Lines<BufReader<Stdin>>) -> Option<String> {
    match lines.next_line().await {
        Ok(line) => line,
        Err(e) => {
            log::error!("failed to read input: {}", e);
            None
        }
    }
}

/// A command that is waiting on the service.
type InFlight<'a> = Pin<Box<dyn Future<Output = ()> + 'a>>;

/// Run the interactive loop until `quit` or end of input.
///
/// Input keeps being read while earlier commands wait on the service, so a
/// slow or hung request only holds up its own id. End of input waits for
/// the outstanding commands; `quit` leaves without them.
pub async fn run_shell(client: &FileListClient, presenter: &Presenter) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut in_flight: FuturesUnordered<InFlight<'_>> = FuturesUnordered::new();
    // Set while the prompt is asking for the new name of this id.
    let mut naming: Option<FileId> = None;
    let mut input_open = true;
    // The initial load already rendered the list live.
    eprintln!("type 'help' for commands");
    prompt("filelist> ");

    loop {
        tokio::select! {
            line = next_line(&mut lines), if input_open => {
                let Some(line) = line else {
                    input_open = false;
                    continue;
                };
                if let Some(id) = naming.take() {
                    in_flight.push(Box::pin(async move {
                        run::rename(client, presenter, &id, Some(line.as_str())).await;
                    }));
                    prompt("filelist> ");
                    continue;
                }

                match parse_line(&line) {
                    ShellCommand::Empty => {}
                    ShellCommand::List => client.render(),
                    ShellCommand::Refresh => in_flight.push(Box::pin(async move {
                        let _ = client.load_all().await;
                    })),
                    ShellCommand::Upload { path, name } => in_flight.push(Box::pin(async move {
                        let path = path.as_deref().map(Path::new);
                        run::upload(client, presenter, path, name.as_deref()).await;
                    })),
                    ShellCommand::Download(id) => in_flight.push(Box::pin(async move {
                        run::download(client, presenter, &id).await;
                    })),
                    ShellCommand::Rename(id, Some(name)) => in_flight.push(Box::pin(async move {
                        run::rename(client, presenter, &id, Some(name.as_str())).await;
                    })),
                    ShellCommand::Rename(id, None) => {
                        naming = Some(id);
                        prompt("Enter new file name: ");
                        continue;
                    }
                    ShellCommand::Delete(id) => in_flight.push(Box::pin(async move {
                        run::delete(client, presenter, &id).await;
                    })),
                    ShellCommand::Help => eprintln!("{}", SHELL_HELP),
                    ShellCommand::Quit => {
                        if !in_flight.is_empty() {
                            log::warn!("leaving with {} request(s) unanswered", in_flight.len());
                        }
                        return;
                    }
                    ShellCommand::Unknown(word) => {
                        eprintln!("unknown or incomplete command '{}'; type 'help'", word)
                    }
                }
                prompt("filelist> ");
            }
            Some(()) = in_flight.next(), if !in_flight.is_empty() => {}
            else => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quoted_names() {
        assert_eq!(
            parse_line(r#"mv 3 "quarterly report""#),
            ShellCommand::Rename(FileId::Int(3), Some("quarterly report".to_string()))
        );
        assert_eq!(
            parse_line("up './my scan.pdf' invoice"),
            ShellCommand::Upload {
                path: Some("./my scan.pdf".to_string()),
                name: Some("invoice".to_string())
            }
        );
    }

    #[test]
    fn upload_without_path_still_parses() {
        assert_eq!(
            parse_line("up"),
            ShellCommand::Upload {
                path: None,
                name: None
            }
        );
    }

    #[test]
    fn id_commands_need_an_id() {
        assert_eq!(parse_line("rm 4"), ShellCommand::Delete(FileId::Int(4)));
        assert_eq!(parse_line("get k7"), ShellCommand::Download(FileId::Text("k7".into())));
        assert_eq!(parse_line("rm"), ShellCommand::Unknown("rm".to_string()));
        assert_eq!(parse_line("mv 5"), ShellCommand::Rename(FileId::Int(5), None));
    }

    #[test]
    fn misc_lines() {
        assert_eq!(parse_line("   "), ShellCommand::Empty);
        assert_eq!(parse_line("ls"), ShellCommand::List);
        assert_eq!(parse_line("refresh"), ShellCommand::Refresh);
        assert_eq!(parse_line("exit"), ShellCommand::Quit);
        assert_eq!(parse_line("help"), ShellCommand::Help);
        assert_eq!(parse_line("frobnicate"), ShellCommand::Unknown("frobnicate".into()));
        assert!(matches!(parse_line("mv 1 \"unterminated"), ShellCommand::Unknown(_)));
    }
}
