// SPDX-License-Identifier: GPL-2.0-or-later
use fslclips_api_structs::{CreateUser, Credentials, LoginResponse, SelfUpdate, User, UserEnvelope};
use tracing::instrument;

use super::Api;
use crate::Error;

impl Api {
    /// Exchange an email and password for a session.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, Error> {
        self.post_anonymous("/user/login", credentials).await
    }

    /// Register a new learner account; the response is a session for it.
    #[instrument(skip(self, account), fields(username = %account.username))]
    pub async fn create_user(&self, account: &CreateUser) -> Result<LoginResponse, Error> {
        self.post_anonymous("/user/create", account).await
    }

    /// The account the session belongs to.
    #[instrument(skip(self))]
    pub async fn get_self(&self) -> Result<User, Error> {
        Ok(self.get_json::<UserEnvelope>("/self").await?.user)
    }

    #[instrument(skip(self, update), fields(username = %update.username))]
    pub async fn update_self(&self, update: &SelfUpdate) -> Result<(), Error> {
        self.post_json("/self/update", update).await
    }

    #[instrument(skip(self))]
    pub async fn delete_self(&self) -> Result<(), Error> {
        self.delete("/self/delete").await
    }
}
