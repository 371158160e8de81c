// Copyright (c) 2024 The Qernal Provider Authors
//
// SPDX-License-Identifier: Apache-2.0
//

use crate::{Error, Result};

/// Prefix of every encryption reference accepted by the backend.
pub const ENCRYPTION_REFERENCE_PREFIX: &str = "keys/dek/";

/// Build the reference which names the DEK revision used to seal a secret,
/// e.g. `keys/dek/7`.
pub fn build_encryption_reference(dek_revision: u64) -> String {
    format!("{ENCRYPTION_REFERENCE_PREFIX}{dek_revision}")
}

/// Get the DEK revision back out of an encryption reference.
pub fn parse_encryption_reference(reference: &str) -> Result<u64> {
    let revision = reference
        .strip_prefix(ENCRYPTION_REFERENCE_PREFIX)
        .ok_or_else(|| Error::InvalidReference(format!("missing prefix in `{reference}`")))?;

    if revision.is_empty() || !revision.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidReference(format!(
            "revision of `{reference}` is not a non-negative integer"
        )));
    }

    revision
        .parse()
        .map_err(|e| Error::InvalidReference(format!("revision of `{reference}`: {e}")))
}
