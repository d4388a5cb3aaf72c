//! Prefix commands typed into a chat channel, e.g.
//! `!add_assignment essay "2024-06-10 12:00" five pages --priority 4`.

use thiserror::Error;

pub const DEFAULT_PREFIX: &str = "!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add {
        name: String,
        deadline: String,
        details: Option<String>,
        priority: Option<i64>,
    },
    List {
        show_all: bool,
        /// `None` means the service's configured default.
        limit: Option<i64>,
    },
    Remove {
        name: String,
    },
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrefixError {
    #[error("Message is not a command")]
    NotACommand,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Missing argument <{argument}> for {command}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("Unterminated quote in command")]
    UnterminatedQuote,

    #[error("Expected a number, got '{0}'")]
    InvalidNumber(String),
}

/// Split on whitespace, keeping `"double quoted"` runs together.
pub fn tokenize(input: &str) -> Result<Vec<String>, PrefixError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for c in input.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    tokens.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }

    if in_quotes {
        return Err(PrefixError::UnterminatedQuote);
    }
    if has_token {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Parse a chat message. Messages that do not start with `prefix` yield
/// [`PrefixError::NotACommand`] so callers can ignore them.
pub fn parse(message: &str, prefix: &str) -> Result<Command, PrefixError> {
    let body = message
        .trim_start()
        .strip_prefix(prefix)
        .ok_or(PrefixError::NotACommand)?;
    let mut tokens = tokenize(body)?.into_iter();
    let name = tokens.next().ok_or(PrefixError::NotACommand)?;
    let args: Vec<String> = tokens.collect();

    match name.as_str() {
        "add_assignment" | "assignment_add" => parse_add(args),
        "show_assignments" | "assignment_list" => parse_list(args),
        "remove_assignment" | "assignment_remove" => {
            let name = args.into_iter().next().ok_or(PrefixError::MissingArgument {
                command: "remove_assignment",
                argument: "name",
            })?;
            Ok(Command::Remove { name })
        }
        "help" => Ok(Command::Help),
        _ => Err(PrefixError::UnknownCommand(name)),
    }
}

fn parse_number(token: &str) -> Result<i64, PrefixError> {
    token
        .parse()
        .map_err(|_| PrefixError::InvalidNumber(token.to_string()))
}

fn parse_add(mut args: Vec<String>) -> Result<Command, PrefixError> {
    // The priority flag is only recognised as the final two tokens, so
    // details may contain "-p" freely.
    let mut priority = None;
    match args.as_slice() {
        [.., flag, value] if flag == "--priority" || flag == "-p" => {
            priority = Some(parse_number(value)?);
            args.truncate(args.len() - 2);
        }
        [.., flag] if flag == "--priority" || flag == "-p" => {
            return Err(PrefixError::MissingArgument {
                command: "add_assignment",
                argument: "priority",
            });
        }
        _ => {}
    }

    let mut rest = args.into_iter().peekable();
    let name = rest.next().ok_or(PrefixError::MissingArgument {
        command: "add_assignment",
        argument: "name",
    })?;
    let mut deadline = rest.next().ok_or(PrefixError::MissingArgument {
        command: "add_assignment",
        argument: "deadline",
    })?;
    // An unquoted deadline arrives as separate date and time tokens.
    if !deadline.contains(' ') {
        if let Some(time) = rest.next_if(|t| t.contains(':')) {
            deadline = format!("{} {}", deadline, time);
        }
    }

    let details = rest.collect::<Vec<_>>().join(" ");
    Ok(Command::Add {
        name,
        deadline,
        details: (!details.is_empty()).then_some(details),
        priority,
    })
}

fn parse_list(args: Vec<String>) -> Result<Command, PrefixError> {
    let mut show_all = false;
    let mut limit = None;
    for token in args {
        match token.as_str() {
            "all" | "--all" => show_all = true,
            other => limit = Some(parse_number(other)?),
        }
    }
    Ok(Command::List { show_all, limit })
}
