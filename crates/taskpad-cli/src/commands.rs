//! Command handlers.

use std::io::{self, Write};

use anyhow::{Context, Result};
use taskpad_core::{ApiClient, ApiError, Config, FileStorage, SessionStore, Task};
use tracing::{debug, warn};

use crate::cli::Commands;
use crate::format;

/// Environment variable consulted before prompting for a password
const ENV_PASSWORD: &str = "TASKPAD_PASSWORD";

pub struct App {
    config: Config,
    session: SessionStore,
    api: ApiClient,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let data_dir = config.data_dir()?;
        debug!(?data_dir, "Data directory configured");

        let session = SessionStore::open(FileStorage::new(&data_dir));
        let api = ApiClient::new(&config, session.clone())?;

        Ok(Self {
            config,
            session,
            api,
        })
    }

    pub async fn run(&mut self, command: Commands) -> Result<()> {
        let authenticating = matches!(command, Commands::Login { .. } | Commands::Signup { .. });
        let result = self.dispatch(command).await;
        if authenticating {
            result
        } else {
            result.map_err(hint_login)
        }
    }

    async fn dispatch(&mut self, command: Commands) -> Result<()> {
        match command {
            Commands::Login { username } => self.login(username, false).await,
            Commands::Signup { username } => self.login(username, true).await,
            Commands::Logout => {
                self.session.logout();
                println!("Logged out");
                Ok(())
            }
            Commands::Whoami => {
                self.whoami();
                Ok(())
            }
            Commands::List { json } => self.list(json).await,
            Commands::Add { title } => {
                let task = self.api.create_task(&title.join(" ")).await?;
                println!("Added {}", format::task_line(&task, task.id.len()));
                Ok(())
            }
            Commands::Done { id } => self.set_completed(&id, Some(true)).await,
            Commands::Undone { id } => self.set_completed(&id, Some(false)).await,
            Commands::Toggle { id } => self.set_completed(&id, None).await,
            Commands::Edit { id, title } => {
                let task = self.api.rename_task(&id, &title.join(" ")).await?;
                println!("Updated {}", format::task_line(&task, task.id.len()));
                Ok(())
            }
            Commands::Rm { id } => {
                self.api.delete_task(&id).await?;
                println!("Deleted {}", id);
                Ok(())
            }
            Commands::Config => self.show_config(),
        }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    async fn login(&mut self, username: Option<String>, signup: bool) -> Result<()> {
        // A new account never reuses the remembered name
        let remembered = if signup {
            None
        } else {
            self.config.last_username.clone()
        };
        let username = match username.or(remembered) {
            Some(name) => name,
            None => prompt_username()?,
        };
        let password = match std::env::var(ENV_PASSWORD) {
            Ok(password) if !password.is_empty() => password,
            _ => prompt_password()?,
        };

        if signup {
            self.session.signup(&self.api, &username, &password).await?;
        } else {
            self.session.login(&self.api, &username, &password).await?;
        }

        let username = self.session.username().unwrap_or(username);
        if let Err(e) = self.config.remember_username(&username) {
            warn!(error = %e, "Failed to save config");
        }

        if signup {
            println!("Account created. Logged in as {}", username);
        } else {
            println!("Logged in as {}", username);
        }
        Ok(())
    }

    fn whoami(&self) {
        let data = self.session.snapshot();
        match (&data.token, &data.username) {
            (Some(_), Some(name)) => println!("Logged in as {} ({})", name, data.age_display()),
            (Some(_), None) => println!("Logged in ({})", data.age_display()),
            _ => println!("Not logged in"),
        }
    }

    // =========================================================================
    // Tasks
    // =========================================================================

    async fn list(&self, json: bool) -> Result<()> {
        let tasks = self.api.list_tasks().await?;
        if json {
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        } else {
            println!("{}", format::task_table(&tasks));
        }
        Ok(())
    }

    /// Set completion to `done`, or flip the current state when `None`.
    async fn set_completed(&self, id: &str, done: Option<bool>) -> Result<()> {
        let task = match done {
            Some(done) => self.api.set_completed(id, done).await?,
            None => {
                let current = self.find_task(id).await?;
                self.api.toggle_task(&current).await?
            }
        };
        println!("{}", format::task_line(&task, task.id.len()));
        Ok(())
    }

    async fn find_task(&self, id: &str) -> Result<Task> {
        let tasks = self.api.list_tasks().await?;
        tasks
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("task {}", id)).into())
    }

    fn show_config(&self) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(&self.config)?);
        println!("config file: {}", Config::config_path()?.display());
        println!("data dir:    {}", self.config.data_dir()?.display());
        Ok(())
    }
}

/// Suggest logging in when the server rejects an unauthenticated request.
fn hint_login(err: anyhow::Error) -> anyhow::Error {
    let rejected = err
        .downcast_ref::<ApiError>()
        .is_some_and(ApiError::is_auth_failure);
    if rejected {
        err.context("Not authorized. Run `taskpad login` first")
    } else {
        err
    }
}

fn prompt_username() -> Result<String> {
    print!("Username: ");
    io::stdout().flush()?;

    let mut username = String::new();
    io::stdin()
        .read_line(&mut username)
        .context("Failed to read username")?;
    Ok(username.trim().to_string())
}

fn prompt_password() -> Result<String> {
    rpassword::prompt_password("Password: ").context("Failed to read password")
}
