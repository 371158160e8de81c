// Copyright (c) 2024 The Qernal Provider Authors
//
// SPDX-License-Identifier: Apache-2.0
//

pub mod api;
pub use api::*;

pub mod client;
pub use client::QernalClient;

pub mod error;
pub use error::*;

pub mod oauth;

pub mod types;
pub use types::*;

#[cfg(test)]
mod test_server;
