// SPDX-License-Identifier: GPL-2.0-or-later
use serde::{Deserialize, Serialize};

use crate::{id_deserializer, AccountType};

/// Body of `POST /user/login`.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Body of `POST /user/create`.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// The session the backend hands out after logging in or registering.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Registration responses don't carry a type; new accounts are learners.
    #[serde(rename = "type", default)]
    pub account_type: AccountType,
    pub access_token: String,
    pub refresh_token: String,
    #[serde(rename = "user_id", deserialize_with = "id_deserializer")]
    pub user_id: String,
    pub username: String,
}

/// Body of `POST /token/refresh`.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Response of `POST /token/refresh`.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_keys() {
        let response: LoginResponse = serde_json::from_str(
            r#"{"type": "admin", "accessToken": "a", "refreshToken": "r", "user_id": 9, "username": "admin1"}"#,
        )
        .unwrap();
        assert_eq!(AccountType::Admin, response.account_type);
        assert_eq!("a", response.access_token);
        assert_eq!("r", response.refresh_token);
        assert_eq!("9", response.user_id);
    }

    #[test]
    fn refresh_request_is_camel_case() {
        let body = serde_json::to_string(&RefreshRequest {
            refresh_token: "r".into(),
        })
        .unwrap();
        assert_eq!(r#"{"refreshToken":"r"}"#, body);
    }
}
