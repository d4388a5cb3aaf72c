//! Assignment tracker: a JSON-backed store of named deadlines, the display
//! helpers used to list them, and the command layer a chat integration or the
//! terminal board calls into.

pub mod assignment;
pub mod board;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod prefix;
pub mod presenter;
pub mod reply;
pub mod store;
pub mod ui;

pub use assignment::{AddedBy, Assignment, Priority};
pub use commands::{AddRequest, AssignmentService, Author, ListRequest, Listing};
pub use error::{AssignmentError, Result};
pub use store::{AssignmentStore, Assignments};
