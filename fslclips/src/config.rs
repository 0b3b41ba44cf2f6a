// SPDX-License-Identifier: GPL-2.0-or-later
/// Defines the configuration file format for the FSL Clips client.
use std::{fmt::Display, path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::Error;

const DEFAULT_API_URL: &str = "http://localhost:1337/";
const SESSION_FILE: &str = "session.json";

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    /// The URL of the FSL Clips backend.
    pub api_url: Url,
    /// Where videos and thumbnails are served from; the backend itself when unset.
    pub media_url: Option<Url>,
    /// The file the session (tokens, user, recently shown clips) is kept in.
    pub session_file: PathBuf,
    /// How long to wait on the backend before giving up, in seconds.
    pub timeout_secs: u64,
}

impl Config {
    pub fn media_url(&self) -> &Url {
        self.media_url.as_ref().unwrap_or(&self.api_url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check the values serde can't.
    pub fn validate(&self) -> Result<(), Error> {
        for url in [&self.api_url, self.media_url()] {
            if !matches!(url.scheme(), "http" | "https") {
                return Err(Error::ConfigValueError(format!(
                    "'{url}' must be an http or https URL"
                )));
            }
        }
        if self.timeout_secs == 0 {
            return Err(Error::ConfigValueError(
                "'timeout_secs' must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fslclips");
        Config {
            api_url: Url::parse(DEFAULT_API_URL).expect("the default API URL is valid"),
            media_url: None,
            session_file: data_dir.join(SESSION_FILE),
            timeout_secs: 30,
        }
    }
}

impl Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            toml::ser::to_string_pretty(&self).unwrap_or_default()
        )
    }
}

/// Load a [`Config`] instance from the given path.
pub fn load_config(path: &str) -> Result<Config, Error> {
    let path = PathBuf::from(path);
    let config_string = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&config_string).map_err(|err| {
        eprintln!("Example config format:\n\n{}", Config::default());
        err
    })?;
    config.validate()?;
    Ok(config)
}
