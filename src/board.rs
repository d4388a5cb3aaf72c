use crate::commands::{AddRequest, AssignmentService, Author};
use crate::error::Result;
use crate::presenter::{self, partition_and_sort, Entry};
use crate::reply::Reply;

pub const COLUMNS: [&str; 2] = ["UPCOMING", "PAST"];

/// State behind the terminal board: assignments split into columns plus the
/// current selection and the reply to the last action.
pub struct AssignmentBoard {
    service: AssignmentService,
    author: Author,
    prefix: String,
    pub upcoming: Vec<Entry>,
    pub past: Vec<Entry>,
    pub selected_column: usize,
    pub selected_entry: usize,
    pub status: Option<Reply>,
}

impl AssignmentBoard {
    pub fn new(service: AssignmentService, author: Author, prefix: impl Into<String>) -> Self {
        Self {
            service,
            author,
            prefix: prefix.into(),
            upcoming: Vec::new(),
            past: Vec::new(),
            selected_column: 0,
            selected_entry: 0,
            status: None,
        }
    }

    /// Re-read the store. A corrupt file shows as an empty board.
    pub fn reload(&mut self) -> Result<()> {
        let assignments = self.service.store().load_or_default()?;
        let (upcoming, past) = partition_and_sort(&assignments, presenter::now());
        self.upcoming = upcoming;
        self.past = past;
        self.clamp_selection();
        Ok(())
    }

    pub fn entries(&self, column: usize) -> &[Entry] {
        match column {
            0 => &self.upcoming,
            _ => &self.past,
        }
    }

    pub fn selected(&self) -> Option<&Entry> {
        self.entries(self.selected_column).get(self.selected_entry)
    }

    fn clamp_selection(&mut self) {
        let len = self.entries(self.selected_column).len();
        self.selected_entry = self.selected_entry.min(len.saturating_sub(1));
    }

    pub fn move_column(&mut self, direction: isize) {
        self.selected_column = (self.selected_column as isize + direction)
            .clamp(0, COLUMNS.len() as isize - 1) as usize;
        self.clamp_selection();
    }

    pub fn move_selection(&mut self, direction: isize) {
        let len = self.entries(self.selected_column).len() as isize;
        if len == 0 {
            self.selected_entry = 0;
            return;
        }
        self.selected_entry = (self.selected_entry as isize + direction).clamp(0, len - 1) as usize;
    }

    pub fn add(&mut self, name: String, deadline: String, details: Option<String>, priority: Option<i64>) {
        let request = AddRequest {
            name: name.clone(),
            deadline,
            details,
            priority,
            added_by: Some(self.author.id.clone()),
        };
        self.status = Some(match self.service.add(request) {
            Ok(assignment) => Reply::added(&name, &assignment, &self.author.display_name),
            Err(e) => Reply::from_error(&e),
        });
        self.refresh();
    }

    pub fn remove_selected(&mut self) {
        let Some(name) = self.selected().map(|(name, _)| name.clone()) else {
            return;
        };
        self.status = Some(match self.service.remove(&name) {
            Ok(_) => Reply::removed(&name),
            Err(e) => Reply::from_error(&e),
        });
        self.refresh();
    }

    /// Treat `message` as if it had been typed into a chat channel.
    pub fn send_message(&mut self, message: &str) {
        if let Some(reply) = self.service.dispatch(message, &self.prefix, &self.author) {
            self.status = Some(reply);
        }
        self.refresh();
    }

    fn refresh(&mut self) {
        if let Err(e) = self.reload() {
            self.status = Some(Reply::from_error(&e));
        }
    }
}
