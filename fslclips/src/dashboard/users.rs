// SPDX-License-Identifier: GPL-2.0-or-later
use fslclips_api_structs::{AccountType, User, UserUpdate};
use tracing::{error, info, warn};

use crate::{
    api::Api,
    modal::{Confirm, Info, Modal},
    screen::{LoadState, MountGuard, Outcome},
};

/// Every account, with the option to delete each.
#[derive(Debug)]
pub struct UserList {
    api: Api,
    modal: Modal,
    mount: MountGuard,
    users: LoadState<Vec<User>>,
}

impl UserList {
    pub fn new(api: Api, modal: Modal) -> Self {
        UserList {
            api,
            modal,
            mount: MountGuard::default(),
            users: LoadState::Idle,
        }
    }

    pub fn users(&self) -> &LoadState<Vec<User>> {
        &self.users
    }

    pub async fn mount(&mut self) {
        if !self.mount.first() {
            return;
        }
        self.users = LoadState::Loading;
        self.users = match self.api.users().await {
            Ok(users) => LoadState::Loaded(users),
            Err(err) => {
                error!(error = %err, "Error fetching users");
                LoadState::Failed("Error fetching users".into())
            }
        };
    }

    pub async fn delete(&mut self, user_id: &str) -> Outcome {
        let username = self
            .users
            .loaded()
            .and_then(|users| users.iter().find(|user| user.user_id == user_id))
            .map(|user| user.username.clone())
            .unwrap_or_else(|| format!("user {user_id}"));
        let question = Confirm::new(format!(
            "Do you want to delete the account of {username}? This can't be undone."
        ))
        .title("Delete user")
        .yes("Delete")
        .warning();
        if self.modal.confirm(question).await != Some(true) {
            return Outcome::Cancelled;
        }

        match self.api.delete_user(user_id).await {
            Ok(()) => {
                info!(user_id, "Deleted user");
                if let Some(users) = self.users.loaded_mut() {
                    users.retain(|user| user.user_id != user_id);
                }
                Outcome::Completed
            }
            Err(err) => {
                warn!(user_id, error = %err, "Delete user failed");
                self.modal
                    .info(
                        Info::new()
                            .title("Delete user failed")
                            .message(err.user_message()),
                    )
                    .await;
                Outcome::Failed
            }
        }
    }
}

/// An administrator editing someone's account.
#[derive(Debug)]
pub struct EditUser {
    api: Api,
    modal: Modal,
    mount: MountGuard,
    user_id: String,
    user: LoadState<User>,
    pub username: String,
    pub email: String,
    pub admin: bool,
}

impl EditUser {
    pub fn new(api: Api, modal: Modal, user_id: impl Into<String>) -> Self {
        EditUser {
            api,
            modal,
            mount: MountGuard::default(),
            user_id: user_id.into(),
            user: LoadState::Idle,
            username: String::new(),
            email: String::new(),
            admin: false,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn user(&self) -> &LoadState<User> {
        &self.user
    }

    pub async fn mount(&mut self) {
        if !self.mount.first() {
            return;
        }
        self.user = LoadState::Loading;
        match self.api.user(&self.user_id).await {
            Ok(user) => self.fill(user),
            Err(err) => {
                error!(user_id = %self.user_id, error = %err, "Error fetching user");
                self.user = LoadState::Failed(format!("Error fetching user {}", self.user_id));
                self.modal
                    .info(Info::new().title("Edit user").message(
                        "User cannot be retrieved at the moment. Please try editing again later.",
                    ))
                    .await;
            }
        }
    }

    fn fill(&mut self, user: User) {
        self.username = user.username.clone();
        self.email = user.email.clone();
        self.admin = user.account_type == AccountType::Admin;
        self.user = LoadState::Loaded(user);
    }

    pub async fn submit(&mut self) -> Outcome {
        let Some(user) = self.user.loaded() else {
            return Outcome::Invalid;
        };
        let update = UserUpdate {
            username: self.username.clone(),
            email: self.email.clone(),
            account_type: AccountType::from_admin_flag(self.admin),
        };
        if user.username == update.username
            && user.email == update.email
            && user.account_type == update.account_type
        {
            self.modal
                .info(
                    Info::new()
                        .title("Update profile failed")
                        .message("No changes to update."),
                )
                .await;
            return Outcome::NoChanges;
        }

        match self.api.update_user(&self.user_id, &update).await {
            Ok(updated) => {
                info!(user_id = %self.user_id, "Updated user");
                self.fill(updated);
                self.modal
                    .info(Info::new().message("Updated user successfully!"))
                    .await;
                Outcome::Completed
            }
            Err(err) => {
                warn!(user_id = %self.user_id, error = %err, "Update user failed");
                self.modal
                    .info(
                        Info::new()
                            .title("Update user failed")
                            .message(err.user_message()),
                    )
                    .await;
                Outcome::Failed
            }
        }
    }
}
