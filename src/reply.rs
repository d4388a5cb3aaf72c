//! Platform-neutral replies. Chat integrations turn these into embeds; the
//! terminal surfaces print them as text.

use chrono::NaiveDateTime;
use std::path::Path;

use crate::assignment::{Assignment, DATE_FORMAT_HUMAN};
use crate::commands::Listing;
use crate::error::AssignmentError;
use crate::presenter::{format_assignment, format_deadline, priority_stars, TimeFormat};
use crate::prefix::PrefixError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyField {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub title: String,
    pub description: String,
    pub fields: Vec<ReplyField>,
    pub tone: Tone,
    pub footer: Option<String>,
    /// Only the invoking user should see this reply.
    pub ephemeral: bool,
}

impl Reply {
    pub fn new(title: impl Into<String>, description: impl Into<String>, tone: Tone) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            fields: Vec::new(),
            tone,
            footer: None,
            ephemeral: false,
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(ReplyField {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn ephemeral(mut self) -> Self {
        self.ephemeral = true;
        self
    }

    pub fn added(name: &str, assignment: &Assignment, added_by: &str) -> Self {
        let mut reply = Reply::new(
            "✅ Assignment Added",
            format!("Successfully added **{}**", name),
            Tone::Success,
        )
        .field(
            "Due Date",
            format_deadline(assignment.deadline, TimeFormat::Long),
        );
        if !assignment.details.is_empty() {
            reply = reply.field("Details", assignment.details.clone());
        }
        reply
            .field("Priority", priority_stars(assignment.priority))
            .footer(format!("Added by {}", added_by))
    }

    pub fn listed(listing: &Listing, now: NaiveDateTime) -> Self {
        match listing {
            Listing::Empty => Reply::new(
                "📭 No Assignments",
                "You haven't added any assignments yet.",
                Tone::Info,
            )
            .ephemeral(),
            Listing::NothingUpcoming => Reply::new(
                "📭 No Upcoming Assignments",
                "All your assignments are completed!",
                Tone::Success,
            )
            .ephemeral(),
            Listing::Entries(entries) => {
                let mut reply = Reply::new(
                    "📝 Your Assignments",
                    format!("Showing {} assignments", entries.len()),
                    Tone::Info,
                );
                for (name, assignment) in entries {
                    reply = reply.field(name.clone(), format_assignment(name, assignment, now));
                }
                reply
            }
        }
    }

    pub fn removed(name: &str) -> Self {
        Reply::new(
            "🗑️ Assignment Removed",
            format!("**{}** has been successfully removed.", name),
            Tone::Success,
        )
    }

    pub fn not_found(name: &str) -> Self {
        Reply::new(
            "❌ Assignment Not Found",
            format!("Couldn't find an assignment named **{}**.", name),
            Tone::Error,
        )
        .ephemeral()
    }

    pub fn invalid_deadline() -> Self {
        Reply::new(
            "❌ Invalid Date Format",
            format!(
                "Please use this exact format: `{}`\nExample: `2023-12-31 23:59`",
                DATE_FORMAT_HUMAN
            ),
            Tone::Error,
        )
        .ephemeral()
    }

    pub fn corrupt_store(path: &Path) -> Self {
        Reply::new(
            "⚠️ Assignment Store Unreadable",
            format!(
                "The assignment file `{}` could not be read. A copy was kept for recovery; no changes were made.",
                path.display()
            ),
            Tone::Warning,
        )
        .ephemeral()
    }

    pub fn usage(error: &PrefixError, prefix: &str) -> Self {
        Reply::new("❓ Invalid Command", error.to_string(), Tone::Warning)
            .footer(format!("Type {}help for the list of commands", prefix))
            .ephemeral()
    }

    pub fn help(prefix: &str) -> Self {
        Reply::new("📖 Assignment Commands", "", Tone::Info)
            .field(
                format!("{}add_assignment <name> <deadline> [details...] [--priority N]", prefix),
                format!("Add a new assignment. Deadline format: {}", DATE_FORMAT_HUMAN),
            )
            .field(
                format!("{}show_assignments [all] [limit]", prefix),
                "List upcoming assignments, or all of them including past ones",
            )
            .field(
                format!("{}remove_assignment <name>", prefix),
                "Remove an assignment",
            )
            .ephemeral()
    }

    /// Map a failed command to the reply shown to the user.
    pub fn from_error(error: &AssignmentError) -> Self {
        match error {
            AssignmentError::InvalidDeadline(_) => Reply::invalid_deadline(),
            AssignmentError::NotFound(name) => Reply::not_found(name),
            AssignmentError::CorruptStore { path, .. } => Reply::corrupt_store(path),
            other => Reply::new("❌ Something Went Wrong", other.to_string(), Tone::Error).ephemeral(),
        }
    }

    pub fn to_plain_text(&self) -> String {
        let mut out = self.title.clone();
        if !self.description.is_empty() {
            out.push('\n');
            out.push_str(&self.description);
        }
        for field in &self.fields {
            out.push_str("\n\n");
            out.push_str(&field.name);
            out.push('\n');
            out.push_str(field.value.trim_end());
        }
        if let Some(footer) = &self.footer {
            out.push_str("\n\n");
            out.push_str(footer);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::{parse_deadline, Priority};

    fn sample(details: &str) -> Assignment {
        Assignment::new(
            parse_deadline("2023-12-31 23:59").unwrap(),
            details,
            Priority::new(2),
            None,
            parse_deadline("2023-12-01 10:00").unwrap(),
        )
    }

    #[test]
    fn test_added_reply_fields() {
        let reply = Reply::added("Essay", &sample("Chapter 3"), "alice");
        assert_eq!(reply.tone, Tone::Success);
        assert!(!reply.ephemeral);
        let names: Vec<_> = reply.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Due Date", "Details", "Priority"]);
        assert_eq!(reply.fields[0].value, "Sunday, December 31 2023 at 23:59");
        assert_eq!(reply.fields[2].value, "⭐⭐");
        assert_eq!(reply.footer.as_deref(), Some("Added by alice"));
    }

    #[test]
    fn test_added_reply_omits_empty_details() {
        let reply = Reply::added("Essay", &sample(""), "alice");
        assert!(reply.fields.iter().all(|f| f.name != "Details"));
    }

    #[test]
    fn test_listed_empty_states_are_ephemeral() {
        let now = parse_deadline("2024-01-01 00:00").unwrap();
        assert!(Reply::listed(&Listing::Empty, now).ephemeral);
        assert!(Reply::listed(&Listing::NothingUpcoming, now).ephemeral);
    }

    #[test]
    fn test_listed_entries() {
        let now = parse_deadline("2023-12-29 23:59").unwrap();
        let listing = Listing::Entries(vec![("Essay".to_string(), sample(""))]);
        let reply = Reply::listed(&listing, now);
        assert_eq!(reply.description, "Showing 1 assignments");
        assert_eq!(reply.fields[0].name, "Essay");
        assert!(reply.fields[0].value.contains("In 2 days"));
    }

    #[test]
    fn test_from_error_maps_kinds() {
        let reply = Reply::from_error(&AssignmentError::NotFound("x".to_string()));
        assert_eq!(reply.title, "❌ Assignment Not Found");
        assert!(reply.ephemeral);

        let reply = Reply::from_error(&AssignmentError::InvalidDeadline("soon".to_string()));
        assert_eq!(reply.title, "❌ Invalid Date Format");
    }

    #[test]
    fn test_plain_text_rendering() {
        let text = Reply::removed("Essay").to_plain_text();
        assert_eq!(text, "🗑️ Assignment Removed\n**Essay** has been successfully removed.");
    }
}
