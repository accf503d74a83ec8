//! Command-line definitions.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "taskpad")]
#[command(version)]
#[command(about = "Personal to-do list backed by a remote task service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Override the API base URL for this run
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the session token
    Login {
        /// Account name (defaults to the last one used)
        #[arg(short, long)]
        username: Option<String>,
    },
    /// Create an account and log in with it
    Signup {
        /// Account name to register
        #[arg(short, long)]
        username: Option<String>,
    },
    /// Forget the stored session token
    Logout,
    /// Show who is logged in
    Whoami,
    /// List all tasks
    List {
        /// Print raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Add a new task
    Add {
        /// Task title
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },
    /// Mark a task as completed
    Done { id: String },
    /// Mark a task as not completed
    Undone { id: String },
    /// Flip a task's completion state
    Toggle { id: String },
    /// Change a task's title
    Edit {
        id: String,
        /// New title
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },
    /// Delete a task
    #[command(alias = "delete")]
    Rm { id: String },
    /// Show the effective configuration
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_multi_word_title() {
        let cli = Cli::try_parse_from(["taskpad", "add", "buy", "oat", "milk"]).unwrap();
        match cli.command {
            Commands::Add { title } => assert_eq!(title.join(" "), "buy oat milk"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_api_url() {
        let cli = Cli::try_parse_from(["taskpad", "list", "--api-url", "http://x"]).unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://x"));
        assert!(matches!(cli.command, Commands::List { json: false }));
    }

    #[test]
    fn test_add_requires_title() {
        assert!(Cli::try_parse_from(["taskpad", "add"]).is_err());
    }
}
