use clap::{Parser, Subcommand};
use todolist_core::USER_ID;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

#[derive(Parser, Debug)]
#[command(name = "todo", version, about, long_about = None)]
pub struct CommandLineArgs {
    /// Base URL of the todo API
    #[arg(long, env = "TODOLIST_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Owner whose list is shown
    #[arg(long, env = "TODOLIST_USER_ID", default_value_t = USER_ID)]
    pub user_id: u64,

    /// Per-request timeout in seconds
    #[arg(long, env = "TODOLIST_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the list
    List {
        /// all, active or completed; anything else shows all
        #[arg(short, long, default_value = "all")]
        filter: String,
    },
    /// Add a todo; the words are joined with spaces
    Add {
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },
    /// Delete todos by id
    Rm {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<u64>,
    },
    /// Delete every completed todo
    ClearCompleted,
    /// Read commands from stdin until EOF or `:q`
    Shell,
}

impl Default for Command {
    fn default() -> Self {
        Command::List {
            filter: "all".to_string(),
        }
    }
}
