// Copyright (c) 2024 The Qernal Provider Authors
//
// SPDX-License-Identifier: Apache-2.0
//

use crypto::build_encryption_reference;
use log::debug;
use qernal_client::{Dek, DekProvider};
use serde::Serialize;

use crate::{secret::SecretValue, Error, Result};

/// A secret value ready to be submitted. `encryption` always names the DEK
/// revision that produced `ciphertext`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SealedSecret {
    /// base64 encoded sealed box
    pub ciphertext: String,

    /// `keys/dek/<revision>`
    pub encryption: String,
}

impl SealedSecret {
    /// Seal `plaintext` against `dek`. Both the key and the revision of the
    /// reference are taken from the same descriptor.
    pub fn seal(dek: &Dek, plaintext: &[u8]) -> crypto::Result<Self> {
        let ciphertext = crypto::seal(&dek.public_key, plaintext)?;
        Ok(Self {
            ciphertext,
            encryption: build_encryption_reference(dek.revision),
        })
    }
}

/// Pairs a DEK fetch with the seal that uses it. The DEK is fetched again
/// on every call, as the backend may rotate it between two operations.
pub struct SecretSealer<'a, P: DekProvider + ?Sized> {
    provider: &'a P,
}

impl<'a, P: DekProvider + ?Sized> SecretSealer<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self { provider }
    }

    pub async fn seal(&self, project_id: &str, value: &SecretValue) -> Result<SealedSecret> {
        match value {
            SecretValue::Plaintext(plaintext) => {
                let dek = self.provider.fetch_dek(project_id).await.map_err(|source| {
                    Error::FetchDek {
                        project_id: project_id.to_string(),
                        source,
                    }
                })?;

                debug!(
                    "seal secret of project {project_id} with DEK revision {}",
                    dek.revision
                );
                SealedSecret::seal(&dek, plaintext.as_bytes())
                    .map_err(|source| Error::Seal { source })
            }
            SecretValue::Encrypted {
                ciphertext,
                revision,
            } => {
                debug!("secret of project {project_id} is already sealed with DEK revision {revision}");
                Ok(SealedSecret {
                    ciphertext: ciphertext.clone(),
                    encryption: build_encryption_reference(*revision),
                })
            }
        }
    }
}
