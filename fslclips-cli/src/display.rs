// SPDX-License-Identifier: GPL-2.0-or-later
use chrono::{DateTime, SubsecRound, Utc};
use fslclips::screen::LoadState;
use fslclips_api_structs::{Clip, Settings, User};
use prettytable::{Attr, Cell, Row, Table};

const DESCRIPTION_WIDTH: usize = 48;

fn header(titles: &[&str]) -> Row {
    Row::new(
        titles
            .iter()
            .map(|title| Cell::new(title).with_style(Attr::Bold))
            .collect(),
    )
}

fn timestamp(when: &DateTime<Utc>) -> String {
    when.trunc_subsecs(0).naive_utc().to_string()
}

fn truncated(text: &str) -> String {
    text.chars().take(DESCRIPTION_WIDTH).collect()
}

/// Print what a screen has for its data, or why it has nothing.
pub fn display_state<T>(state: &LoadState<T>, show: impl FnOnce(&T)) {
    match state {
        LoadState::Idle | LoadState::Loading => println!("Loading..."),
        LoadState::Loaded(value) => show(value),
        LoadState::Failed(message) => println!("{message}"),
    }
}

pub fn display_clips(clips: &[Clip]) {
    let mut table = Table::new();
    table.add_row(header(&["ID", "Description", "Translation", "Added By", "Date Added"]));
    for clip in clips {
        table.add_row(Row::new(vec![
            Cell::new(&clip.clip_id),
            Cell::new(&truncated(&clip.description_ph)),
            Cell::new(&truncated(clip.translation().unwrap_or_default())),
            Cell::new(clip.added_by.as_deref().unwrap_or("")),
            Cell::new(&timestamp(&clip.date_added)),
        ]));
    }
    table.printstd();
}

pub fn display_clip(clip: &Clip) {
    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("ID").with_style(Attr::Bold),
        Cell::new(&clip.clip_id),
    ]));
    table.add_row(Row::new(vec![
        Cell::new("Filipino").with_style(Attr::Bold),
        Cell::new(&clip.description_ph),
    ]));
    table.add_row(Row::new(vec![
        Cell::new("English").with_style(Attr::Bold),
        Cell::new(&clip.description_en),
    ]));
    table.add_row(Row::new(vec![
        Cell::new("Video").with_style(Attr::Bold),
        Cell::new(&clip.video_url),
    ]));
    table.add_row(Row::new(vec![
        Cell::new("Date Added").with_style(Attr::Bold),
        Cell::new(&timestamp(&clip.date_added)),
    ]));
    table.printstd();
}

pub fn display_users(users: &[User]) {
    let mut table = Table::new();
    table.add_row(header(&["ID", "Username", "Email", "Type", "Date Added"]));
    for user in users {
        table.add_row(Row::new(vec![
            Cell::new(&user.user_id),
            Cell::new(&user.username),
            Cell::new(&user.email),
            Cell::new(user.account_type.as_str()),
            Cell::new(&user.date_added.as_ref().map(timestamp).unwrap_or_default()),
        ]));
    }
    table.printstd();
}

pub fn display_user(user: &User) {
    display_users(std::slice::from_ref(user));
}

pub fn display_settings(settings: &Settings) {
    let mut table = Table::new();
    table.add_row(header(&["Quizzes Enabled", "Clips Before Quiz"]));
    table.add_row(Row::new(vec![
        Cell::new(if settings.quiz_enabled { "yes" } else { "no" }),
        Cell::new(&settings.clips_before_quiz.to_string()),
    ]));
    table.printstd();
}
