// Copyright (c) 2024 The Qernal Provider Authors
//
// SPDX-License-Identifier: Apache-2.0
//

//! # Api definitions for the secrets endpoints of the Qernal API
//!
//! - `DekProvider`: reads the current public data encryption key (DEK) of
//! a project.
//! - `SecretsApi`: stores, reads and deletes the secrets of a project.
//!
//! The two are split because sealing a secret only ever needs the first.
//! Implementations must not cache the DEK between calls: the backend may
//! rotate it at any time, and a ciphertext sealed with one revision but
//! submitted with another cannot be decrypted.

use async_trait::async_trait;

use crate::{Dek, Result, SecretBody, SecretBodyPatch, SecretMetaResponse};

#[async_trait]
pub trait DekProvider: Send + Sync {
    /// Fetch the current DEK of the project `project_id`.
    async fn fetch_dek(&self, project_id: &str) -> Result<Dek>;
}

#[async_trait]
pub trait SecretsApi: DekProvider {
    /// Create a secret inside the project. The payload inside `body` must
    /// already be sealed.
    async fn create_secret(&self, project_id: &str, body: &SecretBody)
        -> Result<SecretMetaResponse>;

    /// Replace the payload of the secret `name`.
    async fn update_secret(
        &self,
        project_id: &str,
        name: &str,
        body: &SecretBodyPatch,
    ) -> Result<()>;

    /// Get the metadata of the secret `name`. The sealed value is never
    /// returned by the API.
    async fn get_secret(&self, project_id: &str, name: &str) -> Result<SecretMetaResponse>;

    async fn delete_secret(&self, project_id: &str, name: &str) -> Result<()>;
}
