// SPDX-License-Identifier: GPL-2.0-or-later
use serde::{Deserialize, Serialize};

use crate::Clip;

/// One answer of a quiz; it looks like a clip with a correctness flag attached.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuizOption {
    #[serde(flatten)]
    pub clip: Clip,
    pub correct: bool,
}

/// A synthetic feed entry asking the learner to pick the right clip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuizItem {
    /// Always `true`; the marker that tells a quiz apart from a clip.
    pub quiz: bool,
    pub options: Vec<QuizOption>,
}

impl QuizItem {
    pub fn correct_option(&self) -> Option<&QuizOption> {
        self.options.iter().find(|option| option.correct)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeedEntry {
    Quiz(QuizItem),
    Clip(Clip),
}

impl FeedEntry {
    /// The identifier remembered so the next batch can exclude it.
    ///
    /// Quizzes have no identity of their own.
    pub fn clip_id(&self) -> Option<&str> {
        match self {
            FeedEntry::Clip(clip) => Some(&clip.clip_id),
            FeedEntry::Quiz(_) => None,
        }
    }

    pub fn is_quiz(&self) -> bool {
        matches!(self, FeedEntry::Quiz(_))
    }
}

/// Response of `GET /randomClips`.
#[derive(Debug, Deserialize, Serialize)]
pub struct RandomClips {
    pub clips: Vec<FeedEntry>,
}

/// Body of `POST /quizAttempt`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuizAttempt {
    /// The clip the learner picked.
    pub clip_id: String,
    pub correct: bool,
}
