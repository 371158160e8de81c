// Copyright (c) 2024 The Qernal Provider Authors
//
// SPDX-License-Identifier: Apache-2.0
//

use log::{debug, info};
use qernal_client::{
    Dek, QernalClient, SecretBody, SecretBodyPatch, SecretMetaResponse, SecretType, SecretsApi,
};
use serde::Serialize;

use crate::{
    secret::{secret_reference, SecretSealer, SecretSpec},
    Error, ProviderConfig, Result,
};

/// What is known about a stored secret after an operation. Never holds the
/// plaintext or the ciphertext.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SecretState {
    pub project_id: String,

    pub name: String,

    pub r#type: SecretType,

    pub revision: u64,

    /// `projects:<project_id>/<name>@<revision>`
    pub reference: String,

    /// DEK reference the value was sealed with. Only known right after a
    /// create or an update, the API does not return it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encryption: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry: Option<String>,

    pub created_at: String,

    pub updated_at: String,
}

impl SecretState {
    fn from_response(
        project_id: &str,
        response: SecretMetaResponse,
        encryption: Option<String>,
    ) -> Self {
        Self {
            project_id: project_id.to_string(),
            reference: secret_reference(project_id, &response.name, response.revision),
            name: response.name,
            r#type: response.r#type,
            revision: response.revision,
            encryption,
            certificate: response.payload.certificate,
            registry: response.payload.registry,
            created_at: response.date.created_at,
            updated_at: response.date.updated_at,
        }
    }
}

/// Entry of every secret operation. Values are sealed locally before
/// anything is written, and a request is only sent once sealing succeeded.
pub struct Hub {
    api: Box<dyn SecretsApi>,
}

impl Hub {
    pub fn new(api: Box<dyn SecretsApi>) -> Self {
        Self { api }
    }

    pub async fn from_config(config: &ProviderConfig) -> Result<Self> {
        info!("connect to Qernal API at {}", config.host);
        let client = QernalClient::connect(&config.host, &config.auth_host, &config.token)
            .await
            .map_err(|source| Error::Api {
                context: format!("connect to Qernal API at {} failed", config.host),
                source,
            })?;

        Ok(Self::new(Box::new(client)))
    }

    pub async fn fetch_dek(&self, project_id: &str) -> Result<Dek> {
        self.api
            .fetch_dek(project_id)
            .await
            .map_err(|source| Error::FetchDek {
                project_id: project_id.to_string(),
                source,
            })
    }

    pub async fn create_secret(&self, project_id: &str, spec: &SecretSpec) -> Result<SecretState> {
        spec.validate()?;
        let sealed = SecretSealer::new(self.api.as_ref())
            .seal(project_id, spec.value())
            .await?;

        let body = SecretBody {
            name: spec.name().to_string(),
            r#type: spec.secret_type(),
            payload: spec.payload(sealed.ciphertext),
            encryption: sealed.encryption.clone(),
        };
        let response = self
            .api
            .create_secret(project_id, &body)
            .await
            .map_err(|source| Error::Api {
                context: format!("create secret {} failed", spec.name()),
                source,
            })?;

        info!(
            "created {} secret {} in project {project_id}",
            body.r#type, body.name
        );
        Ok(SecretState::from_response(
            project_id,
            response,
            Some(sealed.encryption),
        ))
    }

    /// Replace the value of an existing secret. The value is sealed again
    /// against the DEK current at this moment, which may differ from the
    /// one of the previous revision.
    pub async fn update_secret(&self, project_id: &str, spec: &SecretSpec) -> Result<SecretState> {
        spec.validate()?;
        let sealed = SecretSealer::new(self.api.as_ref())
            .seal(project_id, spec.value())
            .await?;

        let name = spec.name();
        let patch = SecretBodyPatch {
            r#type: spec.secret_type(),
            payload: spec.payload(sealed.ciphertext),
            encryption: sealed.encryption.clone(),
        };
        self.api
            .update_secret(project_id, name, &patch)
            .await
            .map_err(|source| Error::Api {
                context: format!("update secret {name} failed"),
                source,
            })?;

        // the update answers without the new revision
        debug!("read back secret {name} of project {project_id}");
        let response = self
            .api
            .get_secret(project_id, name)
            .await
            .map_err(|source| Error::Api {
                context: format!("secret {name} was updated but reading it back failed"),
                source,
            })?;

        info!("updated secret {name} in project {project_id}");
        Ok(SecretState::from_response(
            project_id,
            response,
            Some(sealed.encryption),
        ))
    }

    pub async fn read_secret(&self, project_id: &str, name: &str) -> Result<SecretState> {
        let response = self
            .api
            .get_secret(project_id, name)
            .await
            .map_err(|source| Error::Api {
                context: format!("read secret {name} failed"),
                source,
            })?;

        Ok(SecretState::from_response(project_id, response, None))
    }

    pub async fn delete_secret(&self, project_id: &str, name: &str) -> Result<()> {
        self.api
            .delete_secret(project_id, name)
            .await
            .map_err(|source| Error::Api {
                context: format!("delete secret {name} failed"),
                source,
            })?;

        info!("deleted secret {name} of project {project_id}");
        Ok(())
    }
}
