// SPDX-License-Identifier: GPL-2.0-or-later
//! Everything a front end needs to show the FSL Clips screens.
use std::sync::Arc;

use tracing::debug;
use url::Url;

use crate::{
    api::Api,
    auth::{Login, Registration},
    config::Config,
    dashboard::Dashboard,
    feed::FeedView,
    modal::Modal,
    profile::Profile,
    session::SessionStore,
    Error, Route,
};

/// The shared state behind every screen: one session, one HTTP client and one
/// dialog. Screens are built from it on demand.
#[derive(Clone, Debug)]
pub struct App {
    config: Config,
    session: Arc<SessionStore>,
    api: Api,
    modal: Modal,
}

impl App {
    /// Load the session named in `config` and connect to its backend.
    pub fn new(config: Config) -> Result<Self, Error> {
        let session = Arc::new(SessionStore::load(&config.session_file)?);
        Self::with_session(config, session)
    }

    pub fn with_session(config: Config, session: Arc<SessionStore>) -> Result<Self, Error> {
        config.validate()?;
        let api = Api::new(&config, session.clone())?;
        Ok(App {
            config,
            session,
            api,
            modal: Modal::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn api(&self) -> &Api {
        &self.api
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    /// Where a request for `route` actually ends up: pages behind the login send
    /// anonymous users to it.
    pub fn resolve(&self, route: Route) -> Route {
        let route = route.resolve();
        if route.requires_session() && !self.session.get().is_logged_in() {
            debug!(%route, "No session; redirecting to login");
            return Route::Login;
        }
        route
    }

    /// Fail early for commands that only make sense when signed in.
    pub fn require_session(&self) -> Result<(), Error> {
        if self.session.get().is_logged_in() {
            Ok(())
        } else {
            Err(Error::NotLoggedIn)
        }
    }

    pub fn login(&self) -> Login {
        Login::new(self.api.clone(), self.modal.clone())
    }

    pub fn registration(&self) -> Registration {
        Registration::new(self.api.clone(), self.modal.clone())
    }

    pub fn feed(&self) -> FeedView {
        FeedView::new(self.api.clone(), self.modal.clone(), self.media_base())
    }

    pub fn profile(&self) -> Profile {
        Profile::new(self.api.clone(), self.modal.clone())
    }

    pub fn dashboard(&self) -> Dashboard {
        Dashboard::new(self.api.clone(), self.modal.clone())
    }

    /// Media paths are relative, so the base has to end in a slash.
    fn media_base(&self) -> Url {
        let mut media = self.config.media_url().clone();
        if !media.path().ends_with('/') {
            let path = format!("{}/", media.path());
            media.set_path(&path);
        }
        media
    }
}
