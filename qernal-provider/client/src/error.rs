// Copyright (c) 2024 The Qernal Provider Authors
//
// SPDX-License-Identifier: Apache-2.0
//

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("the qernal token is invalid: {0}")]
    InvalidToken(&'static str),

    #[error("get access token failed: {0}")]
    OAuth(String),

    #[error("http request failed: {0}")]
    Http(String),

    #[error("qernal API returned status {status}, detail: {detail}")]
    Api { status: u16, detail: String },

    #[error("deserialize response failed: {0}")]
    ResponseDeserialization(String),

    #[error("DEK of project {0} carries no public key")]
    MissingDek(String),

    #[error("illegal endpoint: {0}")]
    InvalidEndpoint(String),
}

impl Error {
    /// Whether the API answered 404 for the requested object.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Api { status: 404, .. })
    }
}
