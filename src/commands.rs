//! Command service: the interface a chat integration calls with already-parsed
//! arguments. Each call is one load → mutate → save unit.

use chrono::NaiveDateTime;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

use crate::assignment::{AddedBy, Assignment};
use crate::error::{AssignmentError, Result};
use crate::prefix::{self, Command, PrefixError};
use crate::presenter::{self, partition_and_sort, render_list, Entry};
use crate::reply::Reply;
use crate::store::{self, AssignmentStore};

pub const MAX_ASSIGNMENTS_DISPLAY: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddRequest {
    pub name: String,
    pub deadline: String,
    pub details: Option<String>,
    pub priority: Option<i64>,
    pub added_by: Option<AddedBy>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListRequest {
    pub show_all: bool,
    pub limit: i64,
}

impl Default for ListRequest {
    fn default() -> Self {
        Self {
            show_all: false,
            limit: MAX_ASSIGNMENTS_DISPLAY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    /// Nothing has been added yet.
    Empty,
    /// Every entry is in the past and past entries were not requested.
    NothingUpcoming,
    Entries(Vec<Entry>),
}

/// Who issued a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: AddedBy,
    pub display_name: String,
}

impl Author {
    pub fn local(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: AddedBy::Name(name.clone()),
            display_name: name,
        }
    }
}

pub struct AssignmentService {
    store: AssignmentStore,
    write_lock: Mutex<()>,
    default_limit: i64,
}

impl AssignmentService {
    pub fn new(store: AssignmentStore) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
            default_limit: MAX_ASSIGNMENTS_DISPLAY,
        }
    }

    /// Cap used by list commands that do not name their own limit.
    pub fn with_default_limit(mut self, limit: i64) -> Self {
        self.default_limit = limit;
        self
    }

    pub fn default_limit(&self) -> i64 {
        self.default_limit
    }

    pub fn store(&self) -> &AssignmentStore {
        &self.store
    }

    // Held across load and save so writers in this process never interleave.
    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add(&self, request: AddRequest) -> Result<Assignment> {
        let _guard = self.lock();
        let mut assignments = self.store.load()?;
        let assignment = store::add(
            &mut assignments,
            &request.name,
            &request.deadline,
            request.details.as_deref(),
            request.priority,
            request.added_by,
        )?;
        self.store.save(&assignments)?;
        Ok(assignment)
    }

    pub fn list(&self, request: ListRequest) -> Result<Listing> {
        self.list_at(request, presenter::now())
    }

    pub fn list_at(&self, request: ListRequest, now: NaiveDateTime) -> Result<Listing> {
        let assignments = self.store.load()?;
        if assignments.is_empty() {
            return Ok(Listing::Empty);
        }

        let (upcoming, past) = partition_and_sort(&assignments, now);
        debug!("{} upcoming, {} past assignments", upcoming.len(), past.len());
        if upcoming.is_empty() && !request.show_all {
            return Ok(Listing::NothingUpcoming);
        }

        Ok(Listing::Entries(render_list(
            upcoming,
            past,
            request.show_all,
            request.limit,
        )))
    }

    pub fn get(&self, name: &str) -> Result<Option<Assignment>> {
        Ok(self.store.load()?.remove(name))
    }

    /// Remove `name` and return what was stored under it.
    pub fn remove(&self, name: &str) -> Result<Assignment> {
        let _guard = self.lock();
        let mut assignments = self.store.load()?;
        let removed = assignments
            .get(name)
            .cloned()
            .ok_or_else(|| AssignmentError::NotFound(name.to_string()))?;
        store::remove(&mut assignments, name);
        self.store.save(&assignments)?;
        Ok(removed)
    }

    /// Run a parsed command and build the reply for it.
    pub fn execute(&self, command: Command, author: &Author, prefix: &str) -> Reply {
        self.execute_at(command, author, prefix, presenter::now())
    }

    pub fn execute_at(
        &self,
        command: Command,
        author: &Author,
        prefix: &str,
        now: NaiveDateTime,
    ) -> Reply {
        match command {
            Command::Add {
                name,
                deadline,
                details,
                priority,
            } => {
                let request = AddRequest {
                    name: name.clone(),
                    deadline,
                    details,
                    priority,
                    added_by: Some(author.id.clone()),
                };
                match self.add(request) {
                    Ok(assignment) => Reply::added(&name, &assignment, &author.display_name),
                    Err(e) => Reply::from_error(&e),
                }
            }
            Command::List { show_all, limit } => {
                let limit = limit.unwrap_or(self.default_limit);
                match self.list_at(ListRequest { show_all, limit }, now) {
                    Ok(listing) => Reply::listed(&listing, now),
                    Err(e) => Reply::from_error(&e),
                }
            }
            Command::Remove { name } => match self.remove(&name) {
                Ok(_) => Reply::removed(&name),
                Err(e) => Reply::from_error(&e),
            },
            Command::Help => Reply::help(prefix),
        }
    }

    /// Handle one chat message. Returns `None` for messages that are not commands.
    pub fn dispatch(&self, message: &str, prefix: &str, author: &Author) -> Option<Reply> {
        match prefix::parse(message, prefix) {
            Ok(command) => Some(self.execute(command, author, prefix)),
            Err(PrefixError::NotACommand) => None,
            Err(e) => Some(Reply::usage(&e, prefix)),
        }
    }
}
