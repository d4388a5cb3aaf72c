use clap::Args;
use std::path::PathBuf;

use crate::commands::{AssignmentService, Author, MAX_ASSIGNMENTS_DISPLAY};
use crate::prefix::DEFAULT_PREFIX;
use crate::store::{AssignmentStore, DEFAULT_ASSIGNMENTS_FILE};

/// Settings shared by every command. Each one can also come from the
/// environment (or a `.env` file in the working directory).
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path of the JSON file holding all assignments
    #[arg(long = "file", env = "ASSIGNMENTS_FILE", default_value = DEFAULT_ASSIGNMENTS_FILE, global = true)]
    pub data_file: PathBuf,

    /// Prefix that marks a chat message as a command
    #[arg(long, env = "ASSIGNMENTS_PREFIX", default_value = DEFAULT_PREFIX, global = true)]
    pub prefix: String,

    /// Default number of assignments shown by list commands
    #[arg(long, env = "ASSIGNMENTS_LIST_LIMIT", default_value_t = MAX_ASSIGNMENTS_DISPLAY, global = true)]
    pub list_limit: i64,

    /// Name recorded as the author of new assignments
    #[arg(long, env = "ASSIGNMENTS_USER", global = true)]
    pub user: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_ASSIGNMENTS_FILE),
            prefix: DEFAULT_PREFIX.to_string(),
            list_limit: MAX_ASSIGNMENTS_DISPLAY,
            user: None,
        }
    }
}

impl Config {
    pub fn store(&self) -> AssignmentStore {
        AssignmentStore::new(&self.data_file)
    }

    /// Service over the configured file, listing `list_limit` entries by default.
    pub fn service(&self) -> AssignmentService {
        AssignmentService::new(self.store()).with_default_limit(self.list_limit)
    }

    /// The configured user, else `$USER`, else `local`.
    pub fn author(&self) -> Author {
        let name = self
            .user
            .clone()
            .filter(|u| !u.trim().is_empty())
            .or_else(|| std::env::var("USER").ok().filter(|u| !u.is_empty()))
            .unwrap_or_else(|| "local".to_string());
        Author::local(name)
    }
}
