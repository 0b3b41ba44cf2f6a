// SPDX-License-Identifier: GPL-2.0-or-later
//! HTTP client for the FSL Clips backend.
//!
//! Every request goes through [`Api::send`], which attaches the session's bearer
//! token and, when the backend reports the token expired, trades the refresh token
//! for a new pair and replays the request. The replay happens at most once per
//! call to `send`.
use std::sync::Arc;

use fslclips_api_structs::{ErrorBody, RefreshRequest, TokenPair};
use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, instrument, warn};
use url::Url;

use crate::{config::Config, session::SessionStore, Error};

mod account;
mod clips;
mod feed;
mod settings;
mod users;

pub use clips::ClipUpload;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, Debug)]
pub struct Api {
    client: Client,
    base: Url,
    session: Arc<SessionStore>,
}

impl Api {
    pub fn new(config: &Config, session: Arc<SessionStore>) -> Result<Self, Error> {
        let client = reqwest::ClientBuilder::new()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()?;
        Ok(Self::with_client(client, config.api_url.clone(), session))
    }

    pub fn with_client(client: Client, mut base: Url, session: Arc<SessionStore>) -> Self {
        // Paths are joined relative to the base, so it has to look like a directory.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self {
            client,
            base,
            session,
        }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }

    /// Send an authenticated request.
    ///
    /// `build` is called once per attempt so the request, multipart bodies
    /// included, can be rebuilt after a token refresh.
    pub async fn send<F>(&self, build: F) -> Result<Response, Error>
    where
        F: Fn(&Client) -> Result<RequestBuilder, Error>,
    {
        let mut refreshed = false;
        loop {
            let mut request = build(&self.client)?;
            if let Some(token) = self.session.access_token() {
                request = request.bearer_auth(token);
            }
            match check(request.send().await?).await {
                Ok(response) => return Ok(response),
                Err(err) if err.is_token_expired() && !refreshed => {
                    refreshed = true;
                    debug!("Access token expired; refreshing it");
                    if let Err(refresh_err) = self.refresh().await {
                        warn!(error = %refresh_err, "Refresh token failed");
                        return Err(err);
                    }
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Trade the stored refresh token for a new token pair and store it.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<(), Error> {
        let refresh_token = self.session.refresh_token().ok_or(Error::NotLoggedIn)?;
        let response = self
            .client
            .post(self.url("/token/refresh")?)
            .json(&RefreshRequest { refresh_token })
            .send()
            .await?;
        let tokens = check(response).await?.json::<TokenPair>().await?;
        self.session.set_tokens(&tokens)?;
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        let response = self.send(|client| Ok(client.get(url.clone()))).await?;
        Ok(response.json::<T>().await?)
    }

    /// Post a JSON body where only the status matters; whatever comes back is ignored.
    async fn post_json<B>(&self, path: &str, body: &B) -> Result<(), Error>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path)?;
        self.send(|client| Ok(client.post(url.clone()).json(body))).await?;
        Ok(())
    }

    /// Post text fields as `multipart/form-data`, the way the dashboard forms do.
    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        fields: &[(&'static str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        let response = self
            .send(|client| {
                let form = fields
                    .iter()
                    .fold(reqwest::multipart::Form::new(), |form, (name, value)| {
                        form.text(*name, value.clone())
                    });
                Ok(client.post(url.clone()).multipart(form))
            })
            .await?;
        Ok(response.json::<T>().await?)
    }

    async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        self.send(|client| Ok(client.delete(url.clone()))).await?;
        Ok(())
    }

    /// Post to an endpoint that hands out a session; no bearer token is attached.
    async fn post_anonymous<B, T>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.client.post(self.url(path)?).json(body).send().await?;
        Ok(check(response).await?.json::<T>().await?)
    }
}

/// Turn a non-success response into [`Error::Server`], keeping the backend's
/// `error` text when the body carries one.
async fn check(response: Response) -> Result<Response, Error> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|body| body.error);
    debug!(%status, ?message, "Request failed");
    Err(Error::Server { status, message })
}
