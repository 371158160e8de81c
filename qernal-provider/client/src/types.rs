// Copyright (c) 2024 The Qernal Provider Authors
//
// SPDX-License-Identifier: Apache-2.0
//

//! Wire types of the secrets endpoints.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{Error, Result};

/// Name under which the API serves the DEK of a project.
pub const DEK_SECRET_NAME: &str = "dek";

#[derive(
    Serialize, Deserialize, EnumString, AsRefStr, Display, PartialEq, Eq, Debug, Clone, Copy,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SecretType {
    Registry,
    Certificate,
    Environment,
    Dek,
}

/// Payload of a secret when it is created or updated. The `*_value` fields
/// carry base64 encoded sealed boxes, never plaintext.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
#[serde(untagged)]
pub enum SecretPayload {
    Registry {
        registry: String,
        registry_value: String,
    },
    Certificate {
        certificate: String,
        certificate_value: String,
    },
    Environment {
        environment_value: String,
    },
}

impl SecretPayload {
    pub fn secret_type(&self) -> SecretType {
        match self {
            SecretPayload::Registry { .. } => SecretType::Registry,
            SecretPayload::Certificate { .. } => SecretType::Certificate,
            SecretPayload::Environment { .. } => SecretType::Environment,
        }
    }
}

/// Body of `POST /projects/{project_id}/secrets`.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct SecretBody {
    pub name: String,

    pub r#type: SecretType,

    pub payload: SecretPayload,

    /// `keys/dek/<revision>` of the DEK which sealed the payload
    pub encryption: String,
}

/// Body of `PATCH /projects/{project_id}/secrets/{name}`.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct SecretBodyPatch {
    pub r#type: SecretType,

    pub payload: SecretPayload,

    pub encryption: String,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct DekPayload {
    /// base64 encoded curve25519 public key
    pub public: String,
}

/// The non-confidential part of a stored secret's payload. Which field is
/// set depends on the type of the secret.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Default)]
pub struct SecretMetaPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dek: Option<DekPayload>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate: Option<String>,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Default)]
pub struct SecretDate {
    #[serde(default)]
    pub created_at: String,

    #[serde(default)]
    pub updated_at: String,
}

/// Metadata of a stored secret, as returned by the API.
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct SecretMetaResponse {
    pub name: String,

    pub r#type: SecretType,

    #[serde(default)]
    pub payload: SecretMetaPayload,

    pub revision: u64,

    #[serde(default)]
    pub date: SecretDate,
}

/// Descriptor of a project's data encryption key. The public key and the
/// revision always come from the same response.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Dek {
    /// base64 encoded curve25519 public key
    pub public_key: String,

    pub revision: u64,
}

impl Dek {
    pub fn from_response(project_id: &str, response: SecretMetaResponse) -> Result<Self> {
        let public_key = response
            .payload
            .dek
            .map(|dek| dek.public)
            .filter(|public| !public.is_empty())
            .ok_or_else(|| Error::MissingDek(project_id.to_string()))?;

        Ok(Self {
            public_key,
            revision: response.revision,
        })
    }
}
