// SPDX-License-Identifier: GPL-2.0-or-later
//! The signed-in user's own account: edit it, sign out, or delete it.
use fslclips_api_structs::{SelfUpdate, User};
use tracing::{error, info, warn};

use crate::{
    api::Api,
    modal::{Confirm, Info, Modal},
    screen::{LoadState, MountGuard, Outcome},
    Error, Route,
};

#[derive(Debug)]
pub struct Profile {
    api: Api,
    modal: Modal,
    mount: MountGuard,
    user: LoadState<User>,
    pub username: String,
    pub email: String,
    /// Left empty to keep the current password.
    pub password: String,
}

impl Profile {
    pub fn new(api: Api, modal: Modal) -> Self {
        Profile {
            api,
            modal,
            mount: MountGuard::default(),
            user: LoadState::Idle,
            username: String::new(),
            email: String::new(),
            password: String::new(),
        }
    }

    pub fn user(&self) -> &LoadState<User> {
        &self.user
    }

    /// Fetch the account and fill the form with it.
    ///
    /// A session the backend won't accept is thrown away; the returned route sends
    /// the user to sign in again.
    pub async fn mount(&mut self) -> Option<Route> {
        if !self.mount.first() {
            return None;
        }
        self.user = LoadState::Loading;
        match self.api.get_self().await {
            Ok(user) => {
                self.username = user.username.clone();
                self.email = user.email.clone();
                self.user = LoadState::Loaded(user);
                None
            }
            Err(err) => {
                error!(error = %err, "Error fetching self");
                self.user = LoadState::Failed("Error fetching self".into());
                if let Err(err) = self.api.session().clear() {
                    warn!(error = %err, "Unable to clear the session");
                }
                Some(Route::Login)
            }
        }
    }

    fn changes(&self) -> Result<Option<SelfUpdate>, Error> {
        let Some(user) = self.user.loaded() else {
            return Err(Error::Validation("The profile hasn't loaded yet.".into()));
        };
        if self.username.is_empty() || self.email.is_empty() {
            return Err(Error::Validation("Please fill in username and email.".into()));
        }
        if user.username == self.username && user.email == self.email && self.password.is_empty() {
            return Ok(None);
        }
        Ok(Some(SelfUpdate {
            username: self.username.clone(),
            email: self.email.clone(),
            password: (!self.password.is_empty()).then(|| self.password.clone()),
        }))
    }

    /// Save the form. The password field is cleared whether or not it worked.
    pub async fn submit(&mut self) -> Outcome {
        let update = match self.changes() {
            Ok(Some(update)) => update,
            Ok(None) => {
                self.notify("Update profile failed", "No changes to update.")
                    .await;
                return Outcome::NoChanges;
            }
            Err(err) => {
                self.notify("Update profile failed", &err.user_message())
                    .await;
                return Outcome::Invalid;
            }
        };

        let result = self.api.update_self(&update).await;
        self.password.clear();
        match result {
            Ok(_) => {
                if let Some(user) = self.user.loaded_mut() {
                    user.username = update.username.clone();
                    user.email = update.email.clone();
                }
                if let Err(err) = self.api.session().set_username(&update.username) {
                    warn!(error = %err, "Unable to store the new username");
                }
                info!(username = %update.username, "Updated profile");
                self.notify("Profile", "Updated profile successfully!").await;
                Outcome::Completed
            }
            Err(err) => {
                warn!(error = %err, "Profile update failed");
                self.notify("Update profile failed", &err.user_message())
                    .await;
                Outcome::Failed
            }
        }
    }

    pub async fn logout(&mut self) -> Route {
        self.notify("Signed out", "You have been logged out").await;
        if let Err(err) = self.api.session().clear() {
            warn!(error = %err, "Unable to clear the session");
        }
        Route::Login
    }

    /// Back to the feed without saving.
    pub fn back(&self) -> Route {
        Route::Watch
    }

    /// Delete the account after asking twice. Returns the route to go to once the
    /// account is gone.
    pub async fn delete(&mut self) -> (Outcome, Option<Route>) {
        let first = Confirm::new("Do you want to delete your own account?")
            .title("Delete account")
            .yes("Delete")
            .warning();
        if self.modal.confirm(first).await != Some(true) {
            return (Outcome::Cancelled, None);
        }
        let second = Confirm::new(
            "This action will log you out and you won't be able to use your account anymore. Are you sure?",
        )
        .title("Delete account")
        .yes("Delete")
        .warning();
        if self.modal.confirm(second).await != Some(true) {
            return (Outcome::Cancelled, None);
        }

        match self.api.delete_self().await {
            Ok(()) => {
                info!("Account has been deleted");
                if let Err(err) = self.api.session().clear() {
                    warn!(error = %err, "Unable to clear the session");
                }
                (Outcome::Completed, Some(Route::Login))
            }
            Err(err) => {
                error!(error = %err, "Error deleting profile");
                self.notify("Delete account failed", &err.user_message())
                    .await;
                (Outcome::Failed, None)
            }
        }
    }

    async fn notify(&self, title: &str, message: &str) {
        self.modal
            .info(Info::new().title(title).message(message))
            .await;
    }
}
