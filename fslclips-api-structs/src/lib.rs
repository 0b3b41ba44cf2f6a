// SPDX-License-Identifier: GPL-2.0-or-later
/// Defines public-facing structures used in the FSL Clips web API
use serde::{de, Deserialize, Deserializer, Serialize};

mod auth;
mod clip;
mod feed;
mod settings;
mod user;

pub use auth::{CreateUser, Credentials, LoginResponse, RefreshRequest, TokenPair};
pub use clip::{Clip, ClipEnvelope, Clips};
pub use feed::{FeedEntry, QuizAttempt, QuizItem, QuizOption, RandomClips};
pub use settings::Settings;
pub use user::{AccountType, SelfUpdate, User, UserEnvelope, UserUpdate, Users};

/// The body the backend sends alongside any non-success status.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ErrorBody {
    pub error: Option<String>,
}

/// Deserializer for record identifiers.
///
/// The backend is free to emit identifiers as JSON numbers or strings; both are
/// normalised to a string so they can be echoed back in paths and exclusion lists.
pub fn id_deserializer<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(u64),
    }

    match Id::deserialize(d) {
        Ok(Id::Text(id)) => Ok(id),
        Ok(Id::Number(id)) => Ok(id.to_string()),
        Err(_) => Err(de::Error::custom("expected a string or integer identifier")),
    }
}

/// Like [`id_deserializer`], for identifiers that may be `null` or absent.
pub fn opt_id_deserializer<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapped(#[serde(deserialize_with = "id_deserializer")] String);

    Ok(Option::<Wrapped>::deserialize(d)?.map(|Wrapped(id)| id))
}
