// SPDX-License-Identifier: GPL-2.0-or-later
use serde::{Deserialize, Serialize};

/// Application-wide settings; there is exactly one of these on the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Whether quizzes are mixed into the learner feed.
    pub quiz_enabled: bool,
    /// How many clips a learner sees before a quiz is served.
    pub clips_before_quiz: u32,
}

impl Settings {
    /// The range the dashboard accepts for `clips_before_quiz`.
    pub const CLIPS_BEFORE_QUIZ: std::ops::RangeInclusive<u32> = 2..=20;
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            quiz_enabled: false,
            clips_before_quiz: 2,
        }
    }
}
