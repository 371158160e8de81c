// Copyright (c) 2024 The Qernal Provider Authors
//
// SPDX-License-Identifier: Apache-2.0
//

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid secret configuration: {0}")]
    InvalidInput(String),

    #[error("could not obtain encryption key of project {project_id}")]
    FetchDek {
        project_id: String,
        #[source]
        source: qernal_client::Error,
    },

    #[error("unable to encrypt local secret")]
    Seal {
        #[source]
        source: crypto::Error,
    },

    #[error("{context}")]
    Api {
        context: String,
        #[source]
        source: qernal_client::Error,
    },

    #[error("invalid provider configuration: {0}")]
    Config(String),
}
