// SPDX-License-Identifier: GPL-2.0-or-later
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{id_deserializer, opt_id_deserializer};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// The unique identifier for the clip.
    #[serde(deserialize_with = "id_deserializer")]
    pub clip_id: String,
    /// The phrase being taught, in Filipino.
    pub description_ph: String,
    /// The English translation of `description_ph`; may be empty.
    #[serde(default)]
    pub description_en: String,
    /// Path to the video, relative to the media server.
    pub video_url: String,
    /// Path to the poster image, relative to the media server.
    #[serde(default)]
    pub thumbnail_url: String,
    /// The user who uploaded the clip.
    #[serde(default, deserialize_with = "opt_id_deserializer")]
    pub added_by: Option<String>,
    /// The time when the clip was uploaded.
    pub date_added: DateTime<Utc>,
}

impl Clip {
    /// The translation worth showing under the primary description, if any.
    ///
    /// Blank translations and translations identical to the Filipino text are hidden.
    pub fn translation(&self) -> Option<&str> {
        let en = self.description_en.trim();
        if en.is_empty() || self.description_en == self.description_ph {
            None
        } else {
            Some(&self.description_en)
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Clips {
    pub clips: Vec<Clip>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ClipEnvelope {
    pub clip: Clip,
}
