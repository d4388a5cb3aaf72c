//! Command-line interface definition and handlers

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::assignment::{Assignment, DATE_FORMAT_HUMAN};
use crate::commands::{AddRequest, ListRequest, Listing};
use crate::config::Config;
use crate::error::AssignmentError;
use crate::presenter::{
    self, format_deadline, format_deadline_at, priority_stars, Entry, TimeFormat,
};
use crate::reply::Reply;

#[derive(Parser)]
#[command(name = "assignments", version, about = "Track assignments and their deadlines")]
pub struct Cli {
    #[command(flatten)]
    pub config: Config,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new assignment (overwrites one with the same name)
    Add(AddArgs),
    /// List upcoming assignments
    List(ListArgs),
    /// Remove an assignment
    Remove {
        /// Name of the assignment to remove
        name: String,
    },
    /// Show a single assignment
    Show {
        /// Name of the assignment
        name: String,
        /// How to format the deadline
        #[arg(long, value_enum, default_value_t = TimeFormat::Long)]
        style: TimeFormat,
    },
    /// Handle one chat message, e.g. `say '!show_assignments all'`
    Say {
        /// Message text
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        message: Vec<String>,
    },
    /// Open the terminal board (default)
    Board,
}

#[derive(Args)]
pub struct AddArgs {
    /// Name of the assignment
    pub name: String,

    #[arg(help = format!("Due date ({})", DATE_FORMAT_HUMAN))]
    pub deadline: String,

    /// Additional details
    #[arg(long, short)]
    pub details: Option<String>,

    /// Priority level (1-5)
    #[arg(long, short, allow_negative_numbers = true)]
    pub priority: Option<i64>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Include past assignments
    #[arg(long)]
    pub all: bool,

    /// Maximum number of assignments to show
    #[arg(long, allow_negative_numbers = true)]
    pub limit: Option<i64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct AssignmentJson<'a> {
    name: &'a str,
    #[serde(flatten)]
    assignment: &'a Assignment,
    relative: String,
}

fn print_reply(reply: &Reply) {
    println!("{}", reply.to_plain_text());
}

pub fn add(config: &Config, args: AddArgs) -> Result<()> {
    let service = config.service();
    let author = config.author();
    let request = AddRequest {
        name: args.name.clone(),
        deadline: args.deadline,
        details: args.details,
        priority: args.priority,
        added_by: Some(author.id.clone()),
    };
    match service.add(request) {
        Ok(assignment) => {
            print_reply(&Reply::added(&args.name, &assignment, &author.display_name));
            Ok(())
        }
        Err(e @ AssignmentError::InvalidDeadline(_)) => {
            print_reply(&Reply::invalid_deadline());
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}

pub fn list(config: &Config, args: ListArgs) -> Result<()> {
    let service = config.service();
    let now = presenter::now();
    let request = ListRequest {
        show_all: args.all,
        limit: args.limit.unwrap_or(service.default_limit()),
    };
    let listing = service.list_at(request, now)?;

    if args.json {
        let entries: &[Entry] = match &listing {
            Listing::Entries(entries) => entries.as_slice(),
            _ => &[],
        };
        let json: Vec<AssignmentJson> = entries
            .iter()
            .map(|(name, assignment)| AssignmentJson {
                name,
                assignment,
                relative: format_deadline_at(assignment.deadline, TimeFormat::Relative, now),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    print_reply(&Reply::listed(&listing, now));
    Ok(())
}

pub fn remove(config: &Config, name: &str) -> Result<()> {
    let service = config.service();
    match service.remove(name) {
        Ok(_) => {
            print_reply(&Reply::removed(name));
            Ok(())
        }
        Err(AssignmentError::NotFound(_)) => {
            print_reply(&Reply::not_found(name));
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

pub fn show(config: &Config, name: &str, style: TimeFormat) -> Result<()> {
    println!("{}", show_text(config, name, style)?);
    Ok(())
}

/// Text printed by `show`. A missing name yields the not-found reply, the
/// same way `remove` reports it.
pub fn show_text(config: &Config, name: &str, style: TimeFormat) -> Result<String> {
    let service = config.service();
    let Some(assignment) = service.get(name)? else {
        return Ok(Reply::not_found(name).to_plain_text());
    };

    let mut lines = vec![
        name.to_string(),
        format!("  Due:      {}", format_deadline(assignment.deadline, style)),
        format!("  Priority: {}", priority_stars(assignment.priority)),
    ];
    if !assignment.details.is_empty() {
        lines.push(format!("  Details:  {}", assignment.details));
    }
    if let Some(added_by) = &assignment.added_by {
        lines.push(format!("  Added by: {}", added_by));
    }
    if let Some(added_at) = assignment.added_at {
        lines.push(format!("  Added at: {}", format_deadline(added_at, TimeFormat::Short)));
    }
    Ok(lines.join("\n"))
}

pub fn say(config: &Config, message: &[String]) -> Result<()> {
    let service = config.service();
    let message = message.join(" ");
    match service.dispatch(&message, &config.prefix, &config.author()) {
        Some(reply) => print_reply(&reply),
        None => println!("(not a command; messages start with '{}')", config.prefix),
    }
    Ok(())
}
