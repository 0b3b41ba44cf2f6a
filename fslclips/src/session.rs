// SPDX-License-Identifier: GPL-2.0-or-later
//! The persisted session: the credentials identifying the signed-in user to the
//! backend, plus the clips the feed showed last.
//!
//! Everything lives in one small JSON document keyed the same way the web client's
//! local storage is (`accessToken`, `refreshToken`, `user_id`, `username`,
//! `lastClips`). The [`SessionStore`] is handed to the HTTP layer explicitly; it is
//! read on every request and written by login, token refresh and logout.
use std::{
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
};

use fslclips_api_structs::{LoginResponse, TokenPair};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Error;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "accessToken", default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(rename = "refreshToken", default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Identifiers of the most recently fetched feed batch.
    #[serde(rename = "lastClips", default, skip_serializing_if = "Vec::is_empty")]
    pub last_clips: Vec<String>,
}

impl Session {
    pub fn is_logged_in(&self) -> bool {
        self.access_token.is_some()
    }
}

#[derive(Debug)]
pub struct SessionStore {
    path: Option<PathBuf>,
    session: Mutex<Session>,
}

impl SessionStore {
    /// A store that forgets everything when dropped.
    pub fn in_memory() -> Self {
        SessionStore {
            path: None,
            session: Mutex::new(Session::default()),
        }
    }

    /// Load the session kept at `path`; a missing file is an empty session.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        let session = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Session::default(),
            Err(err) => return Err(err.into()),
        };
        debug!(path = ?path, logged_in = session.is_logged_in(), "Loaded session");
        Ok(SessionStore {
            path: Some(path),
            session: Mutex::new(session),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self) -> Session {
        self.lock().clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.lock().access_token.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.lock().refresh_token.clone()
    }

    pub fn save(&self, session: Session) -> Result<(), Error> {
        let mut current = self.lock();
        *current = session;
        self.persist(&current)
    }

    /// Record a freshly issued session; the feed history survives signing in.
    pub fn sign_in(&self, response: &LoginResponse) -> Result<(), Error> {
        self.update(|session| {
            session.access_token = Some(response.access_token.clone());
            session.refresh_token = Some(response.refresh_token.clone());
            session.user_id = Some(response.user_id.clone());
            session.username = Some(response.username.clone());
        })
    }

    pub fn set_tokens(&self, tokens: &TokenPair) -> Result<(), Error> {
        self.update(|session| {
            session.access_token = Some(tokens.access_token.clone());
            session.refresh_token = Some(tokens.refresh_token.clone());
        })
    }

    pub fn set_username(&self, username: &str) -> Result<(), Error> {
        self.update(|session| session.username = Some(username.to_owned()))
    }

    pub fn set_last_clips(&self, ids: Vec<String>) -> Result<(), Error> {
        self.update(|session| session.last_clips = ids)
    }

    /// Forget everything, including the feed history.
    pub fn clear(&self) -> Result<(), Error> {
        *self.lock() = Session::default();
        if let Some(path) = &self.path {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
        }
        debug!("Cleared session");
        Ok(())
    }

    fn update(&self, change: impl FnOnce(&mut Session)) -> Result<(), Error> {
        let mut session = self.lock();
        change(&mut session);
        self.persist(&session)
    }

    fn persist(&self, session: &Session) -> Result<(), Error> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::DirBuilder::new().recursive(true).create(parent)?;
        }
        std::fs::write(path, serde_json::to_vec_pretty(session)?)?;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
