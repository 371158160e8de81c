// Copyright (c) 2024 The Qernal Provider Authors
//
// SPDX-License-Identifier: Apache-2.0
//

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("decode DEK public key failed: {0}")]
    Decode(String),

    #[error("sealed box encryption failed: {0}")]
    Encryption(String),

    #[error("open sealed box failed: {0}")]
    Open(String),

    #[error("illegal encryption reference: {0}")]
    InvalidReference(String),
}
