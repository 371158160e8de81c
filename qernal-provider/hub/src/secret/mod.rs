// Copyright (c) 2024 The Qernal Provider Authors
//
// SPDX-License-Identifier: Apache-2.0
//

pub mod layout;

mod sealer;
pub use sealer::{SealedSecret, SecretSealer};

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine};
use crypto::{parse_encryption_reference, SEALED_BOX_OVERHEAD};
use qernal_client::{SecretPayload, SecretType};
use zeroize::Zeroizing;

use self::layout::{
    certificate::CertificateSecret, environment::EnvironmentSecret, registry::RegistrySecret,
};

use crate::{Error, Result};

const BOTH_SET: &str =
    "Both plain text value and encrypted value (or revision) cannot be set simultaneously.";
const NONE_SET: &str =
    "Either plain text value or both encrypted value and encrypted revision must be provided.";
const ENCRYPTED_PAIR: &str =
    "Both encrypted value and encrypted revision must be provided together.";

/// The confidential half of a secret, as the user supplied it.
pub enum SecretValue {
    /// Sealed locally against the current DEK of the project.
    Plaintext(Zeroizing<String>),

    /// Already sealed elsewhere against the DEK with `revision`. Submitted
    /// as is.
    Encrypted { ciphertext: String, revision: u64 },
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretValue::Plaintext(_) => f.write_str("Plaintext(<redacted>)"),
            SecretValue::Encrypted { revision, .. } => f
                .debug_struct("Encrypted")
                .field("revision", revision)
                .finish_non_exhaustive(),
        }
    }
}

impl SecretValue {
    pub fn plaintext(value: impl Into<String>) -> Self {
        SecretValue::Plaintext(Zeroizing::new(value.into()))
    }

    /// Build a value from the three optional inputs a secret accepts. A
    /// plaintext excludes both encrypted inputs, and the encrypted inputs
    /// only come as a pair.
    ///
    /// The encrypted revision is either the bare revision number or a full
    /// `keys/dek/<revision>` reference. The encrypted value must be a base64
    /// encoded sealed box.
    pub fn from_inputs(
        plaintext: Option<String>,
        encrypted_value: Option<String>,
        encrypted_revision: Option<String>,
    ) -> Result<Self> {
        let plaintext = plaintext.map(Zeroizing::new);

        match (plaintext, encrypted_value, encrypted_revision) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => {
                Err(Error::InvalidInput(BOTH_SET.into()))
            }
            (Some(plaintext), None, None) => Ok(SecretValue::Plaintext(plaintext)),
            (None, Some(ciphertext), Some(revision)) => {
                let revision = parse_revision(&revision)?;
                check_ciphertext(&ciphertext)?;
                Ok(SecretValue::Encrypted {
                    ciphertext,
                    revision,
                })
            }
            (None, None, None) => Err(Error::InvalidInput(NONE_SET.into())),
            (None, _, _) => Err(Error::InvalidInput(format!("{NONE_SET} {ENCRYPTED_PAIR}"))),
        }
    }

    pub fn is_plaintext(&self) -> bool {
        matches!(self, SecretValue::Plaintext(_))
    }
}

fn parse_revision(revision: &str) -> Result<u64> {
    let revision = revision.trim();
    if !revision.is_empty() && revision.bytes().all(|b| b.is_ascii_digit()) {
        return revision.parse::<u64>().map_err(|_| {
            Error::InvalidInput(format!("encrypted revision `{revision}` is out of range"))
        });
    }

    parse_encryption_reference(revision).map_err(|_| {
        Error::InvalidInput(format!(
            "encrypted revision `{revision}` must be a non-negative integer"
        ))
    })
}

fn check_ciphertext(ciphertext: &str) -> Result<()> {
    let sealed = STANDARD
        .decode(ciphertext)
        .map_err(|e| Error::InvalidInput(format!("encrypted value is not base64: {e}")))?;
    if sealed.len() < SEALED_BOX_OVERHEAD {
        return Err(Error::InvalidInput(format!(
            "encrypted value is too short for a sealed box: {} bytes",
            sealed.len()
        )));
    }

    Ok(())
}

/// The string other platform objects use to refer to a stored secret, i.e.
/// `projects:<project_id>/<name>@<revision>`.
pub fn secret_reference(project_id: &str, name: &str, revision: u64) -> String {
    format!("projects:{project_id}/{name}@{revision}")
}

#[derive(Debug)]
pub enum SecretSpec {
    Environment(EnvironmentSecret),
    Certificate(CertificateSecret),
    Registry(RegistrySecret),
}

impl SecretSpec {
    pub fn name(&self) -> &str {
        match self {
            SecretSpec::Environment(s) => &s.name,
            SecretSpec::Certificate(s) => &s.name,
            SecretSpec::Registry(s) => &s.name,
        }
    }

    pub fn value(&self) -> &SecretValue {
        match self {
            SecretSpec::Environment(s) => &s.value,
            SecretSpec::Certificate(s) => &s.value,
            SecretSpec::Registry(s) => &s.value,
        }
    }

    pub fn secret_type(&self) -> SecretType {
        match self {
            SecretSpec::Environment(_) => SecretType::Environment,
            SecretSpec::Certificate(_) => SecretType::Certificate,
            SecretSpec::Registry(_) => SecretType::Registry,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            SecretSpec::Environment(s) => s.validate(),
            SecretSpec::Certificate(s) => s.validate(),
            SecretSpec::Registry(s) => s.validate(),
        }
    }

    /// Wire payload carrying `ciphertext` in the confidential field.
    pub fn payload(&self, ciphertext: String) -> SecretPayload {
        match self {
            SecretSpec::Environment(s) => s.payload(ciphertext),
            SecretSpec::Certificate(s) => s.payload(ciphertext),
            SecretSpec::Registry(s) => s.payload(ciphertext),
        }
    }
}

pub(crate) fn check_not_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidInput(format!("`{field}` must not be empty")));
    }

    Ok(())
}
