// Copyright (c) 2024 The Qernal Provider Authors
//
// SPDX-License-Identifier: Apache-2.0
//

use qernal_client::SecretPayload;

use crate::{
    secret::{check_not_empty, SecretValue},
    Result,
};

/// Credentials of a private container registry.
#[derive(Debug)]
pub struct RegistrySecret {
    pub name: String,

    /// e.g. `ghcr.io`
    pub registry_url: String,

    /// the access token of the registry
    pub value: SecretValue,
}

impl RegistrySecret {
    pub(crate) fn validate(&self) -> Result<()> {
        check_not_empty("name", &self.name)?;
        check_not_empty("registry_url", &self.registry_url)
    }

    pub(crate) fn payload(&self, ciphertext: String) -> SecretPayload {
        SecretPayload::Registry {
            registry: self.registry_url.clone(),
            registry_value: ciphertext,
        }
    }
}
