// SPDX-License-Identifier: GPL-2.0-or-later
use std::{fmt::Display, str::FromStr};

use fslclips_api_structs::AccountType;

use crate::Error;

/// Client-side routes. Screens hand one of these back instead of navigating
/// themselves; the front end decides what to show for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Root,
    Login,
    Register,
    Watch,
    Dashboard,
    Profile,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Root => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Watch => "/watch",
            Route::Dashboard => "/dashboard",
            Route::Profile => "/profile",
        }
    }

    /// Where a freshly signed-in account lands.
    pub fn home(account_type: AccountType) -> Self {
        match account_type {
            AccountType::Admin => Route::Dashboard,
            AccountType::Learner => Route::Watch,
        }
    }

    /// The root shows the login screen.
    pub fn resolve(self) -> Self {
        match self {
            Route::Root => Route::Login,
            route => route,
        }
    }

    pub fn requires_session(&self) -> bool {
        matches!(self, Route::Watch | Route::Dashboard | Route::Profile)
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Route {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "/" | "" => Ok(Route::Root),
            "/login" => Ok(Route::Login),
            "/register" => Ok(Route::Register),
            "/watch" => Ok(Route::Watch),
            "/dashboard" => Ok(Route::Dashboard),
            "/profile" => Ok(Route::Profile),
            other => Err(Error::Validation(format!("No such page: {other}"))),
        }
    }
}
