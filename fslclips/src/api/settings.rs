// SPDX-License-Identifier: GPL-2.0-or-later
use fslclips_api_structs::Settings;
use tracing::instrument;

use super::Api;
use crate::Error;

impl Api {
    #[instrument(skip(self))]
    pub async fn settings(&self) -> Result<Settings, Error> {
        self.get_json("/settings").await
    }

    #[instrument(skip(self))]
    pub async fn update_settings(&self, settings: &Settings) -> Result<Settings, Error> {
        let fields = [
            ("quiz_enabled", settings.quiz_enabled.to_string()),
            ("clips_before_quiz", settings.clips_before_quiz.to_string()),
        ];
        self.post_form("/settings", &fields).await
    }
}
