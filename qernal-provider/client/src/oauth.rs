// Copyright (c) 2024 The Qernal Provider Authors
//
// SPDX-License-Identifier: Apache-2.0
//

//! OAuth2 client credentials grant against the Qernal auth server.
//!
//! A Qernal token is the pair `<client_id>@<client_secret>`. It is exchanged
//! for a short lived access token which is then sent as a bearer token on
//! every API request.

use std::fmt;

use log::{debug, error};
use serde::Deserialize;
use url::Url;
use zeroize::Zeroizing;

use crate::{Error, Result};

const TOKEN_PATH: [&str; 2] = ["oauth2", "token"];

pub struct ClientCredentials {
    client_id: String,
    client_secret: Zeroizing<String>,
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,

    #[serde(default)]
    token_type: Option<String>,
}

impl ClientCredentials {
    /// Split a Qernal token. It must contain exactly one `@`, with something
    /// on each side.
    pub fn from_token(token: &str) -> Result<Self> {
        let (client_id, client_secret) = token
            .split_once('@')
            .ok_or(Error::InvalidToken("missing `@` separator"))?;

        if client_secret.contains('@') {
            return Err(Error::InvalidToken("more than one `@` separator"));
        }

        if client_id.is_empty() || client_secret.is_empty() {
            return Err(Error::InvalidToken("empty client id or client secret"));
        }

        Ok(Self {
            client_id: client_id.to_string(),
            client_secret: Zeroizing::new(client_secret.to_string()),
        })
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// Exchange the credentials for an access token at
    /// `<auth_host>/oauth2/token`.
    pub async fn fetch_access_token(
        &self,
        http_client: &reqwest::Client,
        auth_host: &str,
    ) -> Result<Zeroizing<String>> {
        let token_url = token_url(auth_host)?;
        debug!("request access token for client {} from {token_url}", self.client_id);

        let response = http_client
            .post(token_url)
            .basic_auth(&self.client_id, Some(&*self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| Error::OAuth(format!("token request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            error!("oauth: token request of client {} failed", self.client_id);
            let body = response.text().await.unwrap_or_default();
            return Err(Error::OAuth(format!("status code: {status}, body: {body}")));
        }

        let token = response
            .json::<TokenResponse>()
            .await
            .map_err(|e| Error::OAuth(format!("deserialize token response failed: {e}")))?;

        if let Some(token_type) = &token.token_type {
            if !token_type.eq_ignore_ascii_case("bearer") {
                return Err(Error::OAuth(format!("unsupported token type {token_type}")));
            }
        }

        Ok(Zeroizing::new(token.access_token))
    }
}

pub(crate) fn token_url(auth_host: &str) -> Result<Url> {
    let mut url = Url::parse(auth_host)
        .map_err(|e| Error::InvalidEndpoint(format!("auth host `{auth_host}`: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| Error::InvalidEndpoint(format!("auth host `{auth_host}` cannot be a base")))?
        .pop_if_empty()
        .extend(TOKEN_PATH);
    Ok(url)
}
