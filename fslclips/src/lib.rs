// SPDX-License-Identifier: GPL-2.0-or-later
use reqwest::StatusCode;
use thiserror::Error as ThisError;

/// What users see when the server didn't explain what went wrong.
pub const FALLBACK_MESSAGE: &str = "We're experiencing server issues. Try again later.";

/// The error text the backend uses for an access token past its expiry.
const TOKEN_EXPIRED: &str = "jwt expired";

/// An enumeration of errors FSL Clips client functions can encounter.
#[derive(ThisError, Debug)]
pub enum Error {
    #[error("An HTTP error occurred: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("Unable to parse the server URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("Unable to read from the filesystem: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unable to (de)serialize JSON: {0}")]
    Json(#[from] serde_json::error::Error),
    #[error("Configuration file could not be parsed: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("Configuration file contains invalid values: {0}")]
    ConfigValueError(String),
    #[error("The server responded with {status}: {}", message.as_deref().unwrap_or("no details given"))]
    Server {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("{0}")]
    Validation(String),
    #[error("Not signed in; run the login command first")]
    NotLoggedIn,
}

impl Error {
    /// The text to put in front of a user: the server's own explanation when it
    /// sent one, otherwise a generic apology.
    pub fn user_message(&self) -> String {
        match self {
            Error::Server {
                message: Some(message),
                ..
            } => message.clone(),
            Error::Validation(message) => message.clone(),
            _ => FALLBACK_MESSAGE.to_string(),
        }
    }

    /// Whether the server refused the request because the access token expired.
    pub fn is_token_expired(&self) -> bool {
        matches!(self, Error::Server { message: Some(message), .. } if message == TOKEN_EXPIRED)
    }
}

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod feed;
pub mod modal;
pub mod profile;
pub mod routes;
pub mod screen;
pub mod session;

pub use app::App;
pub use routes::Route;
