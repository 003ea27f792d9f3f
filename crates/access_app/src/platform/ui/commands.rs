use std::path::PathBuf;

use access_core::AccessibilityMode;

pub const HELP: &str = "\
Commands:
  file <path>      select a PDF or text document (clears the URL)
  url <address>    enter a web page address (clears the document)
  mode <name>      default, dyslexia or high-contrast
  submit           send the current input for processing
  download         download the result bundle, if any
  ping             check that the processing service answers
  help             show this list
  quit             leave the session";

/// One line typed in an interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    SelectFile(PathBuf),
    EnterUrl(String),
    SelectMode(AccessibilityMode),
    Submit,
    Download,
    Ping,
    Help,
    Quit,
}

/// Parses an input line. `Ok(None)` for a blank line.
pub fn parse_command(line: &str) -> Result<Option<UserCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "file" | "open" => {
            if rest.is_empty() {
                return Err("usage: file <path>".to_string());
            }
            UserCommand::SelectFile(PathBuf::from(rest))
        }
        // An empty address is allowed: it clears both inputs.
        "url" => UserCommand::EnterUrl(rest.to_string()),
        "mode" => UserCommand::SelectMode(rest.parse().map_err(|err| format!("{err}"))?),
        "submit" | "go" => UserCommand::Submit,
        "download" => UserCommand::Download,
        "ping" => UserCommand::Ping,
        "help" | "?" => UserCommand::Help,
        "quit" | "exit" => UserCommand::Quit,
        other => return Err(format!("unknown command '{other}' (type 'help')")),
    };
    Ok(Some(command))
}
