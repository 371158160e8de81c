// Copyright (c) 2024 The Qernal Provider Authors
//
// SPDX-License-Identifier: Apache-2.0
//

use qernal_client::SecretPayload;

use crate::{
    secret::{check_not_empty, SecretValue},
    Result,
};

/// A TLS certificate. The PEM certificate itself is public and stored as
/// is, only its private key is sealed.
#[derive(Debug)]
pub struct CertificateSecret {
    pub name: String,

    /// PEM encoded public certificate
    pub certificate: String,

    /// the private key of `certificate`
    pub value: SecretValue,
}

impl CertificateSecret {
    pub(crate) fn validate(&self) -> Result<()> {
        check_not_empty("name", &self.name)?;
        check_not_empty("certificate", &self.certificate)
    }

    pub(crate) fn payload(&self, ciphertext: String) -> SecretPayload {
        SecretPayload::Certificate {
            certificate: self.certificate.clone(),
            certificate_value: ciphertext,
        }
    }
}
