// SPDX-License-Identifier: GPL-2.0-or-later
//! The interactive admin dashboard.
use fslclips::{
    dashboard::{AddClip, Dashboard, EditClip, EditSettings, EditUser, Page, Screen, Tab},
    modal::Modal,
    screen::Outcome,
    App,
};

use crate::{
    display::{display_clip, display_clips, display_settings, display_state, display_user, display_users},
    terminal::Terminal,
    Error,
};

const HELP: &str = "\
Commands:
  clips | users | settings   switch tabs
  add                        upload a clip (clips tab)
  edit [ID]                  edit a clip or user, or the settings
  delete ID                  delete a clip or user
  logout                     sign out
  quit                       leave the dashboard";

pub async fn run(terminal: &mut Terminal, app: &App) -> Result<(), Error> {
    let modal = app.modal().clone();
    let mut dashboard = app.dashboard();
    terminal.drive(&modal, dashboard.mount()).await?;

    loop {
        render(&dashboard);
        let line = terminal.read_line("dashboard> ").await?;
        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or_default();
        let argument = words.next().map(str::to_string);

        match (command, argument) {
            ("clips", _) => open(terminal, &modal, &mut dashboard, Tab::Clips.landing()).await?,
            ("users", _) => open(terminal, &modal, &mut dashboard, Tab::Users.landing()).await?,
            ("settings", _) => {
                open(terminal, &modal, &mut dashboard, Tab::Settings.landing()).await?
            }
            ("add", _) if dashboard.tab() == Tab::Clips => {
                open(terminal, &modal, &mut dashboard, Page::AddClip).await?;
                if let Screen::AddClip(form) = dashboard.screen_mut() {
                    fill_new_clip(terminal, form).await?;
                    let (outcome, _) = terminal.drive(&modal, form.submit()).await?;
                    if outcome == Outcome::Completed {
                        open(terminal, &modal, &mut dashboard, Page::ManageClips).await?;
                    }
                }
            }
            ("edit", Some(id)) if dashboard.tab() == Tab::Clips => {
                open(terminal, &modal, &mut dashboard, Page::EditClip(id)).await?;
                if let Screen::EditClip(form) = dashboard.screen_mut() {
                    if form.clip().loaded().is_some() {
                        fill_clip(terminal, form).await?;
                        terminal.drive(&modal, form.submit()).await?;
                    }
                }
            }
            ("edit", Some(id)) if dashboard.tab() == Tab::Users => {
                open(terminal, &modal, &mut dashboard, Page::EditUser(id)).await?;
                if let Screen::EditUser(form) = dashboard.screen_mut() {
                    if form.user().loaded().is_some() {
                        fill_user(terminal, form).await?;
                        terminal.drive(&modal, form.submit()).await?;
                    }
                }
            }
            ("edit", _) if dashboard.tab() == Tab::Settings => {
                if let Screen::EditSettings(form) = dashboard.screen_mut() {
                    if form.settings().loaded().is_some() {
                        fill_settings(terminal, form).await?;
                        terminal.drive(&modal, form.submit()).await?;
                    }
                }
            }
            ("delete", Some(id)) => match dashboard.screen_mut() {
                Screen::ManageClips(list) => {
                    terminal.drive(&modal, list.delete(&id)).await?;
                }
                Screen::ManageUsers(list) => {
                    terminal.drive(&modal, list.delete(&id)).await?;
                }
                _ => println!("Open the clips or users tab to delete something."),
            },
            ("logout", _) => {
                if terminal.drive(&modal, dashboard.logout()).await?.is_some() {
                    println!("Signed out.");
                    return Ok(());
                }
            }
            ("quit" | "q" | "exit", _) => return Ok(()),
            ("", _) => {}
            _ => println!("{HELP}"),
        }
    }
}

async fn open(
    terminal: &mut Terminal,
    modal: &Modal,
    dashboard: &mut Dashboard,
    page: Page,
) -> Result<(), Error> {
    terminal.drive(modal, dashboard.navigate(page)).await?;
    Ok(())
}

fn render(dashboard: &Dashboard) {
    println!();
    let tabs: Vec<String> = Tab::ALL
        .iter()
        .map(|tab| {
            if *tab == dashboard.tab() {
                format!("[{tab}]")
            } else {
                format!(" {tab} ")
            }
        })
        .collect();
    println!("Admin Dashboard  {}", tabs.join(" "));
    match dashboard.screen() {
        Screen::ManageClips(list) => display_state(list.clips(), |clips| display_clips(clips)),
        Screen::AddClip(_) => println!("Add a Clip"),
        Screen::EditClip(form) => display_state(form.clip(), display_clip),
        Screen::ManageUsers(list) => display_state(list.users(), |users| display_users(users)),
        Screen::EditUser(form) => display_state(form.user(), display_user),
        Screen::EditSettings(form) => display_state(form.settings(), display_settings),
    }
}

async fn fill_new_clip(terminal: &mut Terminal, form: &mut AddClip) -> Result<(), Error> {
    let file = terminal.prompt("Video file", "").await?;
    form.file = (!file.is_empty()).then(|| file.into());
    form.description_ph = terminal.prompt("Filipino description", "").await?;
    form.description_en = terminal.prompt("English description", "").await?;
    Ok(())
}

async fn fill_clip(terminal: &mut Terminal, form: &mut EditClip) -> Result<(), Error> {
    form.description_ph = terminal
        .prompt("Filipino description", &form.description_ph)
        .await?;
    form.description_en = terminal
        .prompt("English description", &form.description_en)
        .await?;
    Ok(())
}

async fn fill_user(terminal: &mut Terminal, form: &mut EditUser) -> Result<(), Error> {
    form.username = terminal.prompt("Username", &form.username).await?;
    form.email = terminal.prompt("Email", &form.email).await?;
    form.admin = terminal.prompt_flag("Administrator", form.admin).await?;
    Ok(())
}

async fn fill_settings(terminal: &mut Terminal, form: &mut EditSettings) -> Result<(), Error> {
    form.quiz_enabled = terminal
        .prompt_flag("Enable quizzes", form.quiz_enabled)
        .await?;
    loop {
        let answer = terminal
            .prompt("Clips before a quiz", &form.clips_before_quiz.to_string())
            .await?;
        match answer.parse() {
            Ok(count) => {
                form.clips_before_quiz = count;
                return Ok(());
            }
            Err(_) => println!("Please enter a whole number."),
        }
    }
}
