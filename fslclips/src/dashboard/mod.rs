// SPDX-License-Identifier: GPL-2.0-or-later
//! The admin dashboard: a sidebar of tabs and whichever page is open.
use std::fmt::Display;

use tracing::{info, warn};

use crate::{
    api::Api,
    modal::{Confirm, Modal},
    Route,
};

mod clips;
mod settings;
mod users;

pub use clips::{AddClip, ClipList, EditClip};
pub use settings::{EditSettings, UNAVAILABLE as SETTINGS_UNAVAILABLE};
pub use users::{EditUser, UserList};

/// The pages of the dashboard; the editing pages carry the record they edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Page {
    ManageClips,
    AddClip,
    EditClip(String),
    ManageUsers,
    EditUser(String),
    EditSettings,
}

impl Page {
    /// The sidebar entry highlighted while the page is open.
    pub fn tab(&self) -> Tab {
        match self {
            Page::ManageClips | Page::AddClip | Page::EditClip(_) => Tab::Clips,
            Page::ManageUsers | Page::EditUser(_) => Tab::Users,
            Page::EditSettings => Tab::Settings,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    Clips,
    Users,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Clips, Tab::Users, Tab::Settings];

    /// The page a tab opens.
    pub fn landing(&self) -> Page {
        match self {
            Tab::Clips => Page::ManageClips,
            Tab::Users => Page::ManageUsers,
            Tab::Settings => Page::EditSettings,
        }
    }
}

impl Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tab::Clips => write!(f, "Manage Clips"),
            Tab::Users => write!(f, "Manage Users"),
            Tab::Settings => write!(f, "Settings"),
        }
    }
}

/// The screen built for a [`Page`].
#[derive(Debug)]
pub enum Screen {
    ManageClips(ClipList),
    AddClip(AddClip),
    EditClip(EditClip),
    ManageUsers(UserList),
    EditUser(EditUser),
    EditSettings(EditSettings),
}

impl Screen {
    pub fn build(page: &Page, api: &Api, modal: &Modal) -> Self {
        let (api, modal) = (api.clone(), modal.clone());
        match page {
            Page::ManageClips => Screen::ManageClips(ClipList::new(api, modal)),
            Page::AddClip => Screen::AddClip(AddClip::new(api, modal)),
            Page::EditClip(id) => Screen::EditClip(EditClip::new(api, modal, id.clone())),
            Page::ManageUsers => Screen::ManageUsers(UserList::new(api, modal)),
            Page::EditUser(id) => Screen::EditUser(EditUser::new(api, modal, id.clone())),
            Page::EditSettings => Screen::EditSettings(EditSettings::new(api, modal)),
        }
    }

    /// Run the screen's one-time fetch.
    pub async fn mount(&mut self) {
        match self {
            Screen::ManageClips(screen) => screen.mount().await,
            Screen::AddClip(_) => {}
            Screen::EditClip(screen) => screen.mount().await,
            Screen::ManageUsers(screen) => screen.mount().await,
            Screen::EditUser(screen) => screen.mount().await,
            Screen::EditSettings(screen) => screen.mount().await,
        }
    }
}

#[derive(Debug)]
pub struct Dashboard {
    api: Api,
    modal: Modal,
    page: Page,
    screen: Screen,
}

impl Dashboard {
    /// The dashboard opens on the clip list; nothing is fetched until
    /// [`Dashboard::navigate`] or [`Dashboard::mount`].
    pub fn new(api: Api, modal: Modal) -> Self {
        let page = Page::ManageClips;
        let screen = Screen::build(&page, &api, &modal);
        Dashboard {
            api,
            modal,
            page,
            screen,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn tab(&self) -> Tab {
        self.page.tab()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    pub async fn mount(&mut self) {
        self.screen.mount().await;
    }

    /// Switch to `page` and mount its screen.
    pub async fn navigate(&mut self, page: Page) -> &mut Screen {
        info!(?page, "Opening dashboard page");
        self.screen = Screen::build(&page, &self.api, &self.modal);
        self.page = page;
        self.screen.mount().await;
        &mut self.screen
    }

    /// Sign out after confirmation.
    pub async fn logout(&mut self) -> Option<Route> {
        let question = Confirm::new("Are you sure you want to sign out?")
            .title("Sign out")
            .yes("Yes")
            .no("No");
        if self.modal.confirm(question).await != Some(true) {
            return None;
        }
        if let Err(err) = self.api.session().clear() {
            warn!(error = %err, "Unable to clear the session");
        }
        Some(Route::Login)
    }
}
