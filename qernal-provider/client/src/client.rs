// Copyright (c) 2024 The Qernal Provider Authors
//
// SPDX-License-Identifier: Apache-2.0
//

use async_trait::async_trait;
use const_format::concatcp;
use log::{debug, error};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    ClientBuilder, Response,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::oauth::ClientCredentials;
use crate::{
    Dek, DekProvider, Error, Result, SecretBody, SecretBodyPatch, SecretMetaResponse, SecretsApi,
    DEK_SECRET_NAME,
};

const API_VERSION: &str = "v1";

const USER_AGENT: &str = concatcp!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Client of the secrets endpoints of the Qernal API.
pub struct QernalClient {
    http_client: reqwest::Client,
    base_url: Url,
}

impl QernalClient {
    /// Exchange the Qernal `token` for an access token at `auth_host`, then
    /// build a client which talks to the API at `host`.
    pub async fn connect(host: &str, auth_host: &str, token: &str) -> Result<Self> {
        let credentials = ClientCredentials::from_token(token)?;
        let http_client = ClientBuilder::new()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Http(format!("build http client failed: {e}")))?;
        let access_token = credentials
            .fetch_access_token(&http_client, auth_host)
            .await?;

        Self::with_access_token(host, &access_token)
    }

    /// Build a client from an already obtained access token.
    pub fn with_access_token(host: &str, access_token: &str) -> Result<Self> {
        let base_url = api_base_url(host)?;

        let mut authorization = HeaderValue::from_str(&format!("Bearer {access_token}"))
            .map_err(|_| Error::OAuth("access token is not a legal header value".into()))?;
        authorization.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);

        let http_client = ClientBuilder::new()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Http(format!("build http client failed: {e}")))?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `<host>/v1/projects/{project_id}/secrets[/{name}]`, with each segment
    /// percent-encoded.
    pub fn secrets_url(&self, project_id: &str, name: Option<&str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                Error::InvalidEndpoint(format!("`{}` cannot be a base", self.base_url))
            })?;
            segments.extend(["projects", project_id, "secrets"]);
            if let Some(name) = name {
                segments.push(name);
            }
        }

        Ok(url)
    }
}

fn api_base_url(host: &str) -> Result<Url> {
    let mut url =
        Url::parse(host).map_err(|e| Error::InvalidEndpoint(format!("host `{host}`: {e}")))?;
    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(Error::InvalidEndpoint(format!(
            "host `{host}` must be an http(s) url"
        )));
    }

    url.path_segments_mut()
        .map_err(|_| Error::InvalidEndpoint(format!("host `{host}` cannot be a base")))?
        .pop_if_empty()
        .push(API_VERSION);
    Ok(url)
}

/// Turn a non-2xx response into [`Error::Api`]. The detail is the JSON body
/// the server returned, or the raw text if it is not JSON.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    error!("qernal api: {} {} failed", status, response.url().path());
    let body = response.text().await.unwrap_or_default();
    let detail = match serde_json::from_str::<Value>(&body) {
        Ok(value) => value.to_string(),
        Err(_) => body,
    };

    Err(Error::Api {
        status: status.as_u16(),
        detail,
    })
}

async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    check_status(response)
        .await?
        .json::<T>()
        .await
        .map_err(|e| Error::ResponseDeserialization(e.to_string()))
}

#[async_trait]
impl DekProvider for QernalClient {
    async fn fetch_dek(&self, project_id: &str) -> Result<Dek> {
        let url = self.secrets_url(project_id, Some(DEK_SECRET_NAME))?;
        debug!("qernal api: fetch DEK of project {project_id}");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Http(format!("fetch DEK failed: {e}")))?;
        let response: SecretMetaResponse = parse_response(response).await?;
        let dek = Dek::from_response(project_id, response)?;

        debug!(
            "qernal api: got DEK revision {} of project {project_id}",
            dek.revision
        );
        Ok(dek)
    }
}

#[async_trait]
impl SecretsApi for QernalClient {
    async fn create_secret(
        &self,
        project_id: &str,
        body: &SecretBody,
    ) -> Result<SecretMetaResponse> {
        let url = self.secrets_url(project_id, None)?;
        debug!(
            "qernal api: create {} secret {} in project {project_id}",
            body.r#type, body.name
        );

        let response = self
            .http_client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Http(format!("create secret failed: {e}")))?;
        parse_response(response).await
    }

    async fn update_secret(
        &self,
        project_id: &str,
        name: &str,
        body: &SecretBodyPatch,
    ) -> Result<()> {
        let url = self.secrets_url(project_id, Some(name))?;
        debug!("qernal api: update {} secret {name} in project {project_id}", body.r#type);

        let response = self
            .http_client
            .patch(url)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Http(format!("update secret failed: {e}")))?;
        check_status(response).await?;
        Ok(())
    }

    async fn get_secret(&self, project_id: &str, name: &str) -> Result<SecretMetaResponse> {
        let url = self.secrets_url(project_id, Some(name))?;
        debug!("qernal api: get secret {name} of project {project_id}");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Http(format!("get secret failed: {e}")))?;
        parse_response(response).await
    }

    async fn delete_secret(&self, project_id: &str, name: &str) -> Result<()> {
        let url = self.secrets_url(project_id, Some(name))?;
        debug!("qernal api: delete secret {name} of project {project_id}");

        let response = self
            .http_client
            .delete(url)
            .send()
            .await
            .map_err(|e| Error::Http(format!("delete secret failed: {e}")))?;
        check_status(response).await?;
        Ok(())
    }
}
