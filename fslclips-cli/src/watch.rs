// SPDX-License-Identifier: GPL-2.0-or-later
//! The learner feed in a terminal: one entry at a time, keys instead of swipes.
use fslclips::{
    feed::{FeedView, Gesture, Step},
    App,
};
use fslclips_api_structs::{Clip, FeedEntry, QuizItem};
use tracing::debug;

use crate::{terminal::Terminal, Error};

const KEYS: &str = "[j] next  [k] previous  [p] play/pause  [q] quit > ";

pub async fn watch(terminal: &mut Terminal, app: &App) -> Result<(), Error> {
    let modal = app.modal().clone();
    let mut view = app.feed();
    println!("Loading...");
    terminal.drive(&modal, view.mount()).await?;

    loop {
        if let Some(error) = view.error() {
            println!("{error}");
            return Ok(());
        }
        let Some(index) = view.feed().index() else {
            println!("There are no clips to watch yet.");
            return Ok(());
        };
        show(&view, index);

        if let Some(options) = view.feed().current_quiz().map(|quiz| quiz.options.len()) {
            let line = read_key(
                terminal,
                &mut view,
                &format!("Pick 1-{options}, or [q] quit > "),
            )
            .await?;
            if line == "q" {
                return Ok(());
            }
            match line.parse::<usize>() {
                Ok(choice) if (1..=options).contains(&choice) => {
                    terminal.drive(&modal, view.choose(choice - 1)).await?;
                }
                _ => println!("Answer the quiz to keep going."),
            }
            continue;
        }

        let line = read_key(terminal, &mut view, KEYS).await?;
        let Some(key) = Key::parse(&line) else {
            println!("Unknown key '{line}'");
            continue;
        };
        let Some(gesture) = key.gesture() else {
            return Ok(());
        };
        let step = view.gesture(gesture);
        if key == Key::Next && step == Step::Stay && view.prefetching() {
            println!("Loading more clips...");
            view.prefetched().await;
            view.gesture(Gesture::SwipeUp);
        } else if let Some(text) = notice(key, step) {
            println!("{text}");
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Key {
    Next,
    Previous,
    PlayPause,
    Quit,
}

impl Key {
    fn parse(line: &str) -> Option<Key> {
        match line {
            "j" | "" => Some(Key::Next),
            "k" => Some(Key::Previous),
            "p" => Some(Key::PlayPause),
            "q" => Some(Key::Quit),
            _ => None,
        }
    }

    fn gesture(self) -> Option<Gesture> {
        match self {
            Key::Next => Some(Gesture::SwipeUp),
            Key::Previous => Some(Gesture::SwipeDown),
            Key::PlayPause => Some(Gesture::Tap),
            Key::Quit => None,
        }
    }
}

/// A line to print after `key` moved the feed, or failed to.
fn notice(key: Key, step: Step) -> Option<&'static str> {
    match (key, step) {
        (Key::Next, Step::Stay) => Some("That's the last clip for now."),
        _ => None,
    }
}

/// Read a line, adding any batch that arrives in the meantime to the feed.
async fn read_key(
    terminal: &mut Terminal,
    view: &mut FeedView,
    prompt: &str,
) -> Result<String, Error> {
    terminal.show_prompt(prompt)?;
    loop {
        tokio::select! {
            line = terminal.next_line() => return line,
            () = view.prefetched() => debug!("More clips arrived"),
        }
    }
}

fn show(view: &FeedView, index: usize) {
    let feed = view.feed();
    println!();
    match feed.current() {
        Some(FeedEntry::Clip(clip)) => show_clip(view, clip, feed.is_playing(), index, feed.len()),
        Some(FeedEntry::Quiz(quiz)) => show_quiz(view, quiz),
        None => {}
    }
}

fn link(view: &FeedView, path: &str) -> String {
    view.media_link(path)
        .map(|url| url.to_string())
        .unwrap_or_else(|_| path.to_string())
}

fn show_clip(view: &FeedView, clip: &Clip, playing: bool, index: usize, len: usize) {
    let state = if playing { "playing" } else { "paused" };
    println!("[{}/{len}] {} ({state})", index + 1, clip.description_ph);
    if let Some(translation) = clip.translation() {
        println!("    {translation}");
    }
    println!("    {}", link(view, &clip.video_url));
}

fn show_quiz(view: &FeedView, quiz: &QuizItem) {
    println!("Quiz! What does this sign mean?");
    if let Some(answer) = quiz.correct_option() {
        println!("    {}", link(view, &answer.clip.video_url));
    }
    for (number, option) in quiz.options.iter().enumerate() {
        println!("  {}. {}", number + 1, option.clip.description_ph);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys() {
        assert_eq!(Some(Key::Next), Key::parse(""));
        assert_eq!(Some(Key::Next), Key::parse("j"));
        assert_eq!(Some(Key::Previous), Key::parse("k"));
        assert_eq!(Some(Key::PlayPause), Key::parse("p"));
        assert_eq!(None, Key::Quit.gesture());
        assert_eq!(None, Key::parse("x"));
    }

    #[test]
    fn last_clip_notice_only_after_next() {
        assert_eq!(
            Some("That's the last clip for now."),
            notice(Key::Next, Step::Stay)
        );
        assert_eq!(None, notice(Key::PlayPause, Step::Stay));
        assert_eq!(None, notice(Key::Previous, Step::Stay));
        assert_eq!(None, notice(Key::Next, Step::Moved));
        assert_eq!(None, notice(Key::Next, Step::MovedNeedsMore));
    }
}
