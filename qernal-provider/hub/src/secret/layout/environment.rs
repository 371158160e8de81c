// Copyright (c) 2024 The Qernal Provider Authors
//
// SPDX-License-Identifier: Apache-2.0
//

use qernal_client::SecretPayload;

use crate::{
    secret::{check_not_empty, SecretValue},
    Result,
};

/// A secret exposed to workloads as an environment variable named `name`.
#[derive(Debug)]
pub struct EnvironmentSecret {
    pub name: String,

    pub value: SecretValue,
}

impl EnvironmentSecret {
    pub(crate) fn validate(&self) -> Result<()> {
        check_not_empty("name", &self.name)
    }

    pub(crate) fn payload(&self, ciphertext: String) -> SecretPayload {
        SecretPayload::Environment {
            environment_value: ciphertext,
        }
    }
}
