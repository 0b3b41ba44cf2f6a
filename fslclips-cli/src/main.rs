// SPDX-License-Identifier: GPL-2.0-or-later
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use fslclips::{
    config::{load_config, Config},
    dashboard::{AddClip, ClipList, EditClip, EditSettings, EditUser, UserList},
    screen::Outcome,
    App, Route,
};
use thiserror::Error as ThisError;
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::{
    display::{display_clips, display_settings, display_state, display_user, display_users},
    terminal::Terminal,
};

mod admin;
mod display;
mod terminal;
mod watch;

#[derive(ThisError, Debug)]
pub enum Error {
    #[error(transparent)]
    Client(#[from] fslclips::Error),
    #[error("Unable to write to the terminal: {0}")]
    Io(#[from] std::io::Error),
    #[error("Standard input was closed")]
    Eof,
    #[error("Unable to prompt for credentials (pass them as options instead): {0}")]
    Prompt(#[from] dialoguer::Error),
}

/// Command-line client for FSL Clips
///
/// Learn Filipino Sign Language one clip at a time, or manage the clips, users,
/// and quiz settings as an administrator.
///
/// # Logging
///
/// Log levels and filtering are controlled by tracing_subscriber's EnvFilter using
/// the RUST_LOG environment variable, e.g. RUST_LOG=fslclips=debug. Logs go to
/// stderr.
#[derive(Parser, Debug)]
#[command(name = "fslclips")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, value_parser = load_config, env = "FSLCLIPS_CONFIG")]
    config: Option<Config>,
    /// The backend URL; overrides the configuration file
    #[arg(long, env = "FSLCLIPS_URL")]
    url: Option<Url>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in; administrators go on to the dashboard, learners to the feed
    Login {
        #[arg(long, short, env = "FSLCLIPS_EMAIL")]
        email: Option<String>,
        #[arg(long, short, env = "FSLCLIPS_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Only sign in, don't open the dashboard or feed afterwards
        #[arg(long)]
        no_open: bool,
    },
    /// Create a learner account
    Register {
        #[arg(long, short)]
        username: Option<String>,
        #[arg(long, short)]
        email: Option<String>,
        #[arg(long, short, env = "FSLCLIPS_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Sign out and forget the session
    Logout,
    /// Watch clips and answer quizzes
    Watch,
    /// Open the interactive admin dashboard
    Dashboard,
    /// Manage your own account
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Manage clips (administrators)
    #[command(subcommand)]
    Clip(ClipCommand),
    /// Manage users (administrators)
    #[command(subcommand)]
    User(UserCommand),
    /// Show or change the quiz settings (administrators)
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Subcommand, Debug)]
enum ProfileCommand {
    /// Show your account
    Show,
    /// Change your username, email or password
    Update {
        #[arg(long, short)]
        username: Option<String>,
        #[arg(long, short)]
        email: Option<String>,
        /// A new password; the current one is kept if this is not given
        #[arg(long, short)]
        password: Option<String>,
    },
    /// Delete your account
    Delete,
}

#[derive(Subcommand, Debug)]
enum ClipCommand {
    /// List every clip
    List,
    /// Upload a new clip
    Add {
        /// The phrase the clip signs, in Filipino
        #[arg()]
        description_ph: String,
        /// The English translation
        #[arg()]
        description_en: String,
        /// The video file
        #[arg()]
        file: PathBuf,
    },
    /// Change the descriptions of a clip
    Edit {
        /// The clip ID (from "clip list")
        #[arg()]
        clip_id: String,
        #[arg(long)]
        description_ph: Option<String>,
        #[arg(long)]
        description_en: Option<String>,
    },
    /// Delete a clip
    Delete {
        /// The clip ID (from "clip list")
        #[arg()]
        clip_id: String,
    },
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// List every user
    List,
    /// Change a user's details or account type
    Edit {
        /// The user ID (from "user list")
        #[arg()]
        user_id: String,
        #[arg(long, short)]
        username: Option<String>,
        #[arg(long, short)]
        email: Option<String>,
        /// Make the user an administrator (true) or a learner (false)
        #[arg(long)]
        admin: Option<bool>,
    },
    /// Delete a user
    Delete {
        /// The user ID (from "user list")
        #[arg()]
        user_id: String,
    },
}

#[derive(Subcommand, Debug)]
enum SettingsCommand {
    /// Show the quiz settings
    Show,
    /// Change the quiz settings
    Update {
        #[arg(long)]
        quiz_enabled: Option<bool>,
        /// How many clips a learner watches before a quiz (2-20)
        #[arg(long)]
        clips_before_quiz: Option<u32>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let opts = Cli::parse();
    match process_command(opts).await {
        Ok(_) => {}
        Err(e) => eprintln!("Error: {}", e),
    };
}

async fn process_command(opts: Cli) -> Result<(), Error> {
    let mut config = opts.config.unwrap_or_default();
    if let Some(url) = opts.url {
        config.api_url = url;
    }
    let app = App::new(config)?;
    let modal = app.modal().clone();
    let mut terminal = Terminal::new();
    let api = app.api().clone();

    match opts.command {
        Command::Login {
            email,
            password,
            no_open,
        } => {
            let mut login = app.login();
            login.email = credential(&terminal, "Email", email)?;
            login.password = secret(&terminal, password, false)?;
            let Some(route) = terminal.drive(&modal, login.submit()).await? else {
                return Ok(());
            };
            println!("Signed in as {}", app.session().get().username.unwrap_or_default());
            if !no_open {
                open(&mut terminal, &app, route).await?;
            }
            Ok(())
        }
        Command::Register {
            username,
            email,
            password,
        } => {
            let mut registration = app.registration();
            registration.username = credential(&terminal, "Username", username)?;
            registration.email = credential(&terminal, "Email", email)?;
            registration.password = secret(&terminal, password, true)?;
            if let Some(route) = terminal.drive(&modal, registration.submit()).await? {
                open(&mut terminal, &app, route).await?;
            }
            Ok(())
        }
        Command::Logout => {
            let mut profile = app.profile();
            terminal.drive(&modal, profile.logout()).await?;
            Ok(())
        }
        Command::Watch => open(&mut terminal, &app, Route::Watch).await,
        Command::Dashboard => open(&mut terminal, &app, Route::Dashboard).await,
        Command::Profile(subcommand) => {
            app.require_session()?;
            let mut profile = app.profile();
            if let Some(route) = terminal.drive(&modal, profile.mount()).await? {
                display_state(profile.user(), display_user);
                println!("Sign in again with \"fslclips login\" ({route}).");
                return Ok(());
            }
            match subcommand {
                ProfileCommand::Show => display_state(profile.user(), display_user),
                ProfileCommand::Update {
                    username,
                    email,
                    password,
                } => {
                    if let Some(username) = username {
                        profile.username = username;
                    }
                    if let Some(email) = email {
                        profile.email = email;
                    }
                    profile.password = password.unwrap_or_default();
                    if terminal.drive(&modal, profile.submit()).await? == Outcome::Completed {
                        display_state(profile.user(), display_user);
                    }
                }
                ProfileCommand::Delete => {
                    let (_, route) = terminal.drive(&modal, profile.delete()).await?;
                    if route.is_some() {
                        println!("Your account has been deleted.");
                    }
                }
            }
            Ok(())
        }
        Command::Clip(subcommand) => {
            app.require_session()?;
            match subcommand {
                ClipCommand::List => {
                    let mut list = ClipList::new(api, modal.clone());
                    list.mount().await;
                    display_state(list.clips(), |clips| display_clips(clips));
                }
                ClipCommand::Add {
                    description_ph,
                    description_en,
                    file,
                } => {
                    let mut form = AddClip::new(api, modal.clone());
                    form.description_ph = description_ph;
                    form.description_en = description_en;
                    form.file = Some(file);
                    if let (_, Some(clip)) = terminal.drive(&modal, form.submit()).await? {
                        display_clips(std::slice::from_ref(&clip));
                    }
                }
                ClipCommand::Edit {
                    clip_id,
                    description_ph,
                    description_en,
                } => {
                    let mut form = EditClip::new(api, modal.clone(), clip_id);
                    form.mount().await;
                    if let Some(message) = form.clip().error() {
                        println!("{message}");
                        return Ok(());
                    }
                    if let Some(description_ph) = description_ph {
                        form.description_ph = description_ph;
                    }
                    if let Some(description_en) = description_en {
                        form.description_en = description_en;
                    }
                    terminal.drive(&modal, form.submit()).await?;
                }
                ClipCommand::Delete { clip_id } => {
                    let mut list = ClipList::new(api, modal.clone());
                    list.mount().await;
                    terminal.drive(&modal, list.delete(&clip_id)).await?;
                }
            }
            Ok(())
        }
        Command::User(subcommand) => {
            app.require_session()?;
            match subcommand {
                UserCommand::List => {
                    let mut list = UserList::new(api, modal.clone());
                    list.mount().await;
                    display_state(list.users(), |users| display_users(users));
                }
                UserCommand::Edit {
                    user_id,
                    username,
                    email,
                    admin,
                } => {
                    let mut form = EditUser::new(api, modal.clone(), user_id);
                    terminal.drive(&modal, form.mount()).await?;
                    if form.user().loaded().is_none() {
                        return Ok(());
                    }
                    if let Some(username) = username {
                        form.username = username;
                    }
                    if let Some(email) = email {
                        form.email = email;
                    }
                    if let Some(admin) = admin {
                        form.admin = admin;
                    }
                    if terminal.drive(&modal, form.submit()).await? == Outcome::Completed {
                        display_state(form.user(), display_user);
                    }
                }
                UserCommand::Delete { user_id } => {
                    let mut list = UserList::new(api, modal.clone());
                    list.mount().await;
                    terminal.drive(&modal, list.delete(&user_id)).await?;
                }
            }
            Ok(())
        }
        Command::Settings(subcommand) => {
            app.require_session()?;
            let mut form = EditSettings::new(api, modal.clone());
            form.mount().await;
            match subcommand {
                SettingsCommand::Show => display_state(form.settings(), display_settings),
                SettingsCommand::Update {
                    quiz_enabled,
                    clips_before_quiz,
                } => {
                    if let Some(message) = form.settings().error() {
                        println!("{message}");
                        return Ok(());
                    }
                    if let Some(quiz_enabled) = quiz_enabled {
                        form.quiz_enabled = quiz_enabled;
                    }
                    if let Some(clips_before_quiz) = clips_before_quiz {
                        form.clips_before_quiz = clips_before_quiz;
                    }
                    if terminal.drive(&modal, form.submit()).await? == Outcome::Completed {
                        display_state(form.settings(), display_settings);
                    }
                }
            }
            Ok(())
        }
    }
}

/// Show the screen for `route`, following the redirects the app asks for.
async fn open(terminal: &mut Terminal, app: &App, route: Route) -> Result<(), Error> {
    match app.resolve(route) {
        Route::Watch => watch::watch(terminal, app).await,
        Route::Dashboard => admin::run(terminal, app).await,
        Route::Profile => {
            let mut profile = app.profile();
            terminal.drive(app.modal(), profile.mount()).await?;
            display_state(profile.user(), display_user);
            Ok(())
        }
        Route::Login | Route::Root => {
            println!("Sign in first with \"fslclips login\".");
            Ok(())
        }
        Route::Register => {
            println!("Create an account with \"fslclips register\".");
            Ok(())
        }
    }
}

/// Ask for a credential that wasn't given as an option. These prompts read the
/// terminal directly, so they have to come before `terminal` reads anything.
fn credential(terminal: &Terminal, label: &str, given: Option<String>) -> Result<String, Error> {
    debug_assert!(!terminal.reading());
    match given {
        Some(value) => Ok(value),
        None => Ok(Input::<String>::new().with_prompt(label).interact_text()?),
    }
}

/// Like [`credential`], without echoing what's typed.
fn secret(terminal: &Terminal, given: Option<String>, confirm: bool) -> Result<String, Error> {
    debug_assert!(!terminal.reading());
    if let Some(value) = given {
        return Ok(value);
    }
    let mut prompt = Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Password (again)", "Passwords do not match");
    }
    Ok(prompt.interact()?)
}
