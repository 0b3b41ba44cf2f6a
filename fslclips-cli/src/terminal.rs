// SPDX-License-Identifier: GPL-2.0-or-later
//! Line-oriented terminal front end: dialogs are printed to stdout and answered by
//! typing a line.
use std::{
    future::Future,
    io::{BufRead, Write},
};

use fslclips::modal::{Dialog, Input, Modal};
use tokio::sync::mpsc;
use tracing::debug;

use crate::Error;

#[derive(Default)]
pub struct Terminal {
    lines: Option<mpsc::UnboundedReceiver<String>>,
}

impl Terminal {
    /// Stdin is left alone until the first line is read. Anything else that reads
    /// the terminal, like a hidden password prompt, has to run before then.
    pub fn new() -> Self {
        Terminal::default()
    }

    pub fn reading(&self) -> bool {
        self.lines.is_some()
    }

    /// The next line typed, trimmed. Safe to cancel in a `select!`.
    pub async fn next_line(&mut self) -> Result<String, Error> {
        let lines = self.lines.get_or_insert_with(read_stdin);
        let line = lines.recv().await.ok_or(Error::Eof)?;
        Ok(line.trim().to_string())
    }

    pub fn show_prompt(&self, prompt: &str) -> Result<(), Error> {
        print!("{prompt}");
        std::io::stdout().flush()?;
        Ok(())
    }

    pub async fn read_line(&mut self, prompt: &str) -> Result<String, Error> {
        self.show_prompt(prompt)?;
        self.next_line().await
    }

    /// Ask for a value, keeping `current` when the answer is empty.
    pub async fn prompt(&mut self, label: &str, current: &str) -> Result<String, Error> {
        let answer = if current.is_empty() {
            self.read_line(&format!("{label}: ")).await?
        } else {
            self.read_line(&format!("{label} [{current}]: ")).await?
        };
        Ok(if answer.is_empty() {
            current.to_string()
        } else {
            answer
        })
    }

    pub async fn prompt_flag(&mut self, label: &str, current: bool) -> Result<bool, Error> {
        let shown = if current { "Y/n" } else { "y/N" };
        loop {
            let answer = self.read_line(&format!("{label} [{shown}]: ")).await?;
            match answer.to_lowercase().as_str() {
                "" => return Ok(current),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => println!("Please answer y or n."),
            }
        }
    }

    /// Run a screen operation, answering whatever dialogs it opens from stdin.
    pub async fn drive<F>(&mut self, modal: &Modal, operation: F) -> Result<F::Output, Error>
    where
        F: Future,
    {
        tokio::pin!(operation);
        loop {
            let dialog = tokio::select! {
                biased;
                output = &mut operation => return Ok(output),
                dialog = modal.opened() => dialog,
            };
            render(&dialog);
            loop {
                let line = tokio::select! {
                    biased;
                    output = &mut operation => return Ok(output),
                    line = self.next_line() => line?,
                };
                let Some(input) = answer(&dialog, &line) else {
                    println!("{}", hint(&dialog));
                    continue;
                };
                debug!(?input, "Answering dialog");
                if !modal.input(input) {
                    // Plain content can't be answered, only put away.
                    modal.close();
                }
                break;
            }
        }
    }
}

/// Reading stdin blocks, so it happens on its own thread and lines are handed
/// over through a channel.
fn read_stdin() -> mpsc::UnboundedReceiver<String> {
    let (tx, lines) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    lines
}

fn render(dialog: &Dialog) {
    println!();
    match dialog {
        Dialog::Content { body, .. } => println!("{body}"),
        Dialog::Confirm(confirm) => {
            if let Some(title) = &confirm.title {
                println!("== {title} ==");
            }
            println!("{}", confirm.message);
        }
        Dialog::Info(info) => {
            if let Some(title) = &info.title {
                println!("== {title} ==");
            }
            if let Some(message) = &info.message {
                println!("{message}");
            }
        }
    }
    print!("{}", hint(dialog));
    let _ = std::io::stdout().flush();
}

fn hint(dialog: &Dialog) -> String {
    match dialog {
        Dialog::Content { .. } => "[Enter] ".to_string(),
        Dialog::Confirm(confirm) => {
            let yes = if confirm.warning {
                confirm.yes.to_uppercase()
            } else {
                confirm.yes.clone()
            };
            format!("[y] {yes}  [n] {} > ", confirm.no)
        }
        Dialog::Info(info) => format!("[Enter] {} ", info.ok),
    }
}

/// Map a typed line to dialog input. An empty line on a dialog that may be
/// dismissed stands for clicking beside it.
fn answer(dialog: &Dialog, line: &str) -> Option<Input> {
    let line = line.to_lowercase();
    match dialog {
        Dialog::Confirm(confirm) => match line.as_str() {
            "y" | "yes" => Some(Input::Affirm),
            "n" | "no" => Some(Input::Deny),
            "" if confirm.close_on_overlay_click => Some(Input::OverlayClick),
            other if other == confirm.yes.to_lowercase() => Some(Input::Affirm),
            other if other == confirm.no.to_lowercase() => Some(Input::Deny),
            _ => None,
        },
        Dialog::Info(_) => Some(Input::Acknowledge),
        Dialog::Content { options, .. } if options.close_on_overlay_click => {
            Some(Input::OverlayClick)
        }
        Dialog::Content { .. } => Some(Input::BodyClick),
    }
}
