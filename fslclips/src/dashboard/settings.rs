// SPDX-License-Identifier: GPL-2.0-or-later
use fslclips_api_structs::Settings;
use tracing::{error, info, warn};

use crate::{
    api::Api,
    modal::{Info, Modal},
    screen::{LoadState, MountGuard, Outcome},
};

/// Shown in place of the form when the settings can't be fetched.
pub const UNAVAILABLE: &str =
    "Settings couldn't be retrieved at the moment. Please try again later.";

#[derive(Debug)]
pub struct EditSettings {
    api: Api,
    modal: Modal,
    mount: MountGuard,
    settings: LoadState<Settings>,
    pub quiz_enabled: bool,
    pub clips_before_quiz: u32,
}

impl EditSettings {
    pub fn new(api: Api, modal: Modal) -> Self {
        let defaults = Settings::default();
        EditSettings {
            api,
            modal,
            mount: MountGuard::default(),
            settings: LoadState::Idle,
            quiz_enabled: defaults.quiz_enabled,
            clips_before_quiz: defaults.clips_before_quiz,
        }
    }

    pub fn settings(&self) -> &LoadState<Settings> {
        &self.settings
    }

    pub async fn mount(&mut self) {
        if !self.mount.first() {
            return;
        }
        self.settings = LoadState::Loading;
        match self.api.settings().await {
            Ok(settings) => self.fill(settings),
            Err(err) => {
                error!(error = %err, "Error fetching settings");
                self.settings = LoadState::Failed(UNAVAILABLE.into());
            }
        }
    }

    fn fill(&mut self, settings: Settings) {
        self.quiz_enabled = settings.quiz_enabled;
        self.clips_before_quiz = settings.clips_before_quiz;
        self.settings = LoadState::Loaded(settings);
    }

    pub async fn submit(&mut self) -> Outcome {
        let Some(current) = self.settings.loaded() else {
            return Outcome::Invalid;
        };
        let wanted = Settings {
            quiz_enabled: self.quiz_enabled,
            clips_before_quiz: self.clips_before_quiz,
        };
        if *current == wanted {
            self.failed("No changes to update.".into()).await;
            return Outcome::NoChanges;
        }
        // The threshold only matters while quizzes are on.
        if wanted.quiz_enabled && !Settings::CLIPS_BEFORE_QUIZ.contains(&wanted.clips_before_quiz) {
            self.failed(format!(
                "Clips before a quiz must be between {} and {}.",
                Settings::CLIPS_BEFORE_QUIZ.start(),
                Settings::CLIPS_BEFORE_QUIZ.end()
            ))
            .await;
            return Outcome::Invalid;
        }

        match self.api.update_settings(&wanted).await {
            Ok(saved) => {
                info!(?saved, "Updated settings");
                self.fill(saved);
                self.modal
                    .info(Info::new().message("Settings was successfully updated!"))
                    .await;
                Outcome::Completed
            }
            Err(err) => {
                warn!(error = %err, "Updating settings failed");
                self.failed(err.user_message()).await;
                Outcome::Failed
            }
        }
    }

    async fn failed(&self, message: String) {
        self.modal
            .info(
                Info::new()
                    .title("Update settings failed")
                    .message(message),
            )
            .await;
    }
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server};

    use super::*;
    use crate::api::tests::signed_in;
    use crate::modal::{Dialog, Input};

    const SETTINGS: &str = r#"{"quiz_enabled": true, "clips_before_quiz": 5}"#;

    async fn acknowledge(modal: &Modal) -> Option<String> {
        let dialog = modal.opened().await;
        assert!(modal.input(Input::Acknowledge));
        match dialog {
            Dialog::Info(info) => info.message,
            other => panic!("expected an info dialog, got {other:?}"),
        }
    }

    async fn mounted(server: &mut Server) -> (EditSettings, Modal) {
        server
            .mock("GET", "/settings")
            .with_body(SETTINGS)
            .create_async()
            .await;
        let modal = Modal::new();
        let mut form = EditSettings::new(signed_in(server), modal.clone());
        form.mount().await;
        (form, modal)
    }

    #[tokio::test]
    async fn mount_fills_the_form() {
        let mut server = Server::new_async().await;
        let (form, _) = mounted(&mut server).await;
        assert!(form.quiz_enabled);
        assert_eq!(5, form.clips_before_quiz);
    }

    #[tokio::test]
    async fn unavailable_settings() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/settings")
            .with_status(503)
            .create_async()
            .await;
        let mut form = EditSettings::new(signed_in(&server), Modal::new());
        form.mount().await;
        assert_eq!(Some(UNAVAILABLE), form.settings().error());
    }

    #[tokio::test]
    async fn unchanged_settings_are_not_sent() {
        let mut server = Server::new_async().await;
        let (mut form, modal) = mounted(&mut server).await;
        let update_mock = server
            .mock("POST", "/settings")
            .expect(0)
            .create_async()
            .await;

        let (outcome, message) = tokio::join!(form.submit(), acknowledge(&modal));
        assert_eq!(Outcome::NoChanges, outcome);
        assert_eq!(Some("No changes to update.".to_string()), message);
        update_mock.assert_async().await;
    }

    #[tokio::test]
    async fn threshold_out_of_range() {
        let mut server = Server::new_async().await;
        let (mut form, modal) = mounted(&mut server).await;
        let update_mock = server
            .mock("POST", "/settings")
            .expect(0)
            .create_async()
            .await;

        form.clips_before_quiz = 21;
        let (outcome, _) = tokio::join!(form.submit(), acknowledge(&modal));
        assert_eq!(Outcome::Invalid, outcome);
        update_mock.assert_async().await;
    }

    #[tokio::test]
    async fn disabling_quizzes_ignores_threshold() {
        let mut server = Server::new_async().await;
        let (mut form, modal) = mounted(&mut server).await;
        let update_mock = server
            .mock("POST", "/settings")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="quiz_enabled"\r\n\r\nfalse"#.into()),
                Matcher::Regex(r#"name="clips_before_quiz"\r\n\r\n0"#.into()),
            ]))
            .with_body(r#"{"quiz_enabled": false, "clips_before_quiz": 0}"#)
            .expect(1)
            .create_async()
            .await;

        form.quiz_enabled = false;
        form.clips_before_quiz = 0;
        let (outcome, message) = tokio::join!(form.submit(), acknowledge(&modal));
        assert_eq!(Outcome::Completed, outcome);
        assert_eq!(Some("Settings was successfully updated!".to_string()), message);
        assert!(!form.quiz_enabled);
        update_mock.assert_async().await;
    }
}
