// SPDX-License-Identifier: GPL-2.0-or-later
use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id_deserializer;

/// The kind of account; administrators land on the dashboard, learners on the feed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Admin,
    #[default]
    Learner,
}

impl AccountType {
    pub fn from_admin_flag(is_admin: bool) -> Self {
        if is_admin {
            AccountType::Admin
        } else {
            AccountType::Learner
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Admin => "admin",
            AccountType::Learner => "learner",
        }
    }
}

impl Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "id_deserializer", alias = "id")]
    pub user_id: String,
    pub username: String,
    pub email: String,
    #[serde(rename = "type", default)]
    pub account_type: AccountType,
    /// When the user registered.
    pub date_added: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Users {
    pub users: Vec<User>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UserEnvelope {
    pub user: User,
}

/// Form fields an administrator sends to `POST /user/:id`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct UserUpdate {
    pub username: String,
    pub email: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
}

/// Body of `POST /self/update`; the password is left out unless it changes.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SelfUpdate {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}
