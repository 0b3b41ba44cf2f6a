// SPDX-License-Identifier: GPL-2.0-or-later
use fslclips_api_structs::{User, UserEnvelope, UserUpdate, Users};
use tracing::instrument;

use super::Api;
use crate::Error;

impl Api {
    /// List every registered user.
    #[instrument(skip(self))]
    pub async fn users(&self) -> Result<Vec<User>, Error> {
        Ok(self.get_json::<Users>("/users").await?.users)
    }

    #[instrument(skip(self))]
    pub async fn user(&self, user_id: &str) -> Result<User, Error> {
        Ok(self
            .get_json::<UserEnvelope>(&format!("/user/{user_id}"))
            .await?
            .user)
    }

    #[instrument(skip(self))]
    pub async fn update_user(&self, user_id: &str, update: &UserUpdate) -> Result<User, Error> {
        let fields = [
            ("username", update.username.clone()),
            ("email", update.email.clone()),
            ("type", update.account_type.to_string()),
        ];
        Ok(self
            .post_form::<UserEnvelope>(&format!("/user/{user_id}"), &fields)
            .await?
            .user)
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, user_id: &str) -> Result<(), Error> {
        self.delete(&format!("/user/{user_id}")).await
    }
}
