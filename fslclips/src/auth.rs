// SPDX-License-Identifier: GPL-2.0-or-later
//! The login and registration screens.
use fslclips_api_structs::{AccountType, CreateUser, Credentials};
use tracing::{info, warn};

use crate::{
    api::Api,
    modal::{Info, Modal},
    Error, Route,
};

/// The login form.
#[derive(Debug)]
pub struct Login {
    api: Api,
    modal: Modal,
    pub email: String,
    pub password: String,
}

impl Login {
    pub fn new(api: Api, modal: Modal) -> Self {
        Login {
            api,
            modal,
            email: String::new(),
            password: String::new(),
        }
    }

    /// Sign in and return where the account belongs, or explain the failure in a
    /// dialog and return `None`. Nothing is persisted on failure.
    pub async fn submit(&mut self) -> Option<Route> {
        match self.sign_in().await {
            Ok(account_type) => Some(Route::home(account_type)),
            Err(err) => {
                warn!(error = %err, "Sign in failed");
                self.modal
                    .info(Info::new().title("Sign in failed").message(err.user_message()))
                    .await;
                None
            }
        }
    }

    async fn sign_in(&self) -> Result<AccountType, Error> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err(Error::Validation(
                "Please fill in both email and password.".into(),
            ));
        }
        let response = self
            .api
            .login(&Credentials {
                email: self.email.clone(),
                password: self.password.clone(),
            })
            .await?;
        self.api.session().sign_in(&response)?;
        info!(username = %response.username, account_type = %response.account_type, "Signed in");
        Ok(response.account_type)
    }
}

/// The account creation form.
#[derive(Debug)]
pub struct Registration {
    api: Api,
    modal: Modal,
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Registration {
    pub fn new(api: Api, modal: Modal) -> Self {
        Registration {
            api,
            modal,
            username: String::new(),
            email: String::new(),
            password: String::new(),
        }
    }

    /// Create the account and sign in as it. New accounts always land on the feed.
    pub async fn submit(&mut self) -> Option<Route> {
        match self.register().await {
            Ok(()) => {
                self.modal
                    .info(
                        Info::new()
                            .title("Success!")
                            .message("Your account has been created."),
                    )
                    .await;
                Some(Route::Watch)
            }
            Err(err) => {
                warn!(error = %err, "Account creation failed");
                self.modal
                    .info(
                        Info::new()
                            .title("Failed to create an account")
                            .message(err.user_message()),
                    )
                    .await;
                None
            }
        }
    }

    async fn register(&self) -> Result<(), Error> {
        if self.username.is_empty() || self.email.is_empty() || self.password.is_empty() {
            return Err(Error::Validation(
                "Please fill in username, email and password.".into(),
            ));
        }
        let response = self
            .api
            .create_user(&CreateUser {
                username: self.username.clone(),
                email: self.email.clone(),
                password: self.password.clone(),
            })
            .await?;
        self.api.session().sign_in(&response)?;
        info!(username = %response.username, "Created account");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server};

    use super::*;
    use crate::api::tests::anonymous;
    use crate::modal::{Dialog, Input};

    const ADMIN_LOGIN: &str = r#"{
        "type": "admin",
        "accessToken": "access-1",
        "refreshToken": "refresh-1",
        "user_id": 1,
        "username": "admin1"
    }"#;

    /// Acknowledge the next dialog and hand it back.
    async fn acknowledge(modal: &Modal) -> Dialog {
        let dialog = modal.opened().await;
        assert!(modal.input(Input::Acknowledge));
        dialog
    }

    fn message(dialog: &Dialog) -> (Option<&str>, Option<&str>) {
        match dialog {
            Dialog::Info(info) => (info.title.as_deref(), info.message.as_deref()),
            other => panic!("expected an info dialog, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn admin_login_goes_to_dashboard() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/user/login")
            .match_body(Matcher::Json(serde_json::json!({
                "email": "admin@example.com",
                "password": "hunter2",
            })))
            .with_body(ADMIN_LOGIN)
            .expect(1)
            .create_async()
            .await;

        let api = anonymous(&server);
        let mut login = Login::new(api.clone(), Modal::new());
        login.email = "admin@example.com".into();
        login.password = "hunter2".into();

        assert_eq!(Some(Route::Dashboard), login.submit().await);
        let session = api.session().get();
        assert_eq!(Some("access-1"), session.access_token.as_deref());
        assert_eq!(Some("refresh-1"), session.refresh_token.as_deref());
        assert_eq!(Some("1"), session.user_id.as_deref());
        assert_eq!(Some("admin1"), session.username.as_deref());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn learner_login_goes_to_feed() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/user/login")
            .with_body(ADMIN_LOGIN.replace("admin\"", "learner\""))
            .create_async()
            .await;

        let mut login = Login::new(anonymous(&server), Modal::new());
        login.email = "learner@example.com".into();
        login.password = "hunter2".into();
        assert_eq!(Some(Route::Watch), login.submit().await);
    }

    #[tokio::test]
    async fn invalid_login_persists_nothing() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/user/login")
            .with_status(401)
            .with_body(r#"{"error": "Invalid email or password"}"#)
            .expect(1)
            .create_async()
            .await;

        let api = anonymous(&server);
        let modal = Modal::new();
        let mut login = Login::new(api.clone(), modal.clone());
        login.email = "admin@example.com".into();
        login.password = "wrong".into();

        let (route, dialog) = tokio::join!(login.submit(), acknowledge(&modal));
        assert_eq!(None, route);
        assert_eq!(
            (Some("Sign in failed"), Some("Invalid email or password")),
            message(&dialog)
        );
        assert!(!api.session().get().is_logged_in());
    }

    #[tokio::test]
    async fn missing_fields_never_reach_the_server() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/user/login")
            .expect(0)
            .create_async()
            .await;

        let modal = Modal::new();
        let mut login = Login::new(anonymous(&server), modal.clone());
        login.email = "admin@example.com".into();

        let (route, dialog) = tokio::join!(login.submit(), acknowledge(&modal));
        assert_eq!(None, route);
        assert_eq!(
            Some("Please fill in both email and password."),
            message(&dialog).1
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unreachable_server_gets_fallback_message() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/user/login")
            .with_status(502)
            .with_body("<html>Bad Gateway</html>")
            .create_async()
            .await;

        let modal = Modal::new();
        let mut login = Login::new(anonymous(&server), modal.clone());
        login.email = "admin@example.com".into();
        login.password = "hunter2".into();

        let (_, dialog) = tokio::join!(login.submit(), acknowledge(&modal));
        assert_eq!(Some(crate::FALLBACK_MESSAGE), message(&dialog).1);
    }

    #[tokio::test]
    async fn registration_signs_in_and_goes_to_feed() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/user/create")
            .match_body(Matcher::Json(serde_json::json!({
                "username": "learner1",
                "email": "learner@example.com",
                "password": "hunter2",
            })))
            .with_body(
                r#"{"type": "learner", "accessToken": "a", "refreshToken": "r",
                    "user_id": 7, "username": "learner1"}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let api = anonymous(&server);
        let modal = Modal::new();
        let mut registration = Registration::new(api.clone(), modal.clone());
        registration.username = "learner1".into();
        registration.email = "learner@example.com".into();
        registration.password = "hunter2".into();

        let (route, dialog) = tokio::join!(registration.submit(), acknowledge(&modal));
        assert_eq!(Some(Route::Watch), route);
        assert_eq!(
            (Some("Success!"), Some("Your account has been created.")),
            message(&dialog)
        );
        assert_eq!(Some("7"), api.session().get().user_id.as_deref());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn registration_failure_shows_server_text() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/user/create")
            .with_status(409)
            .with_body(r#"{"error": "Email is already in use"}"#)
            .create_async()
            .await;

        let api = anonymous(&server);
        let modal = Modal::new();
        let mut registration = Registration::new(api.clone(), modal.clone());
        registration.username = "learner1".into();
        registration.email = "learner@example.com".into();
        registration.password = "hunter2".into();

        let (route, dialog) = tokio::join!(registration.submit(), acknowledge(&modal));
        assert_eq!(None, route);
        assert_eq!(
            (Some("Failed to create an account"), Some("Email is already in use")),
            message(&dialog)
        );
        assert!(!api.session().get().is_logged_in());
    }
}
