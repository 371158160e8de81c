// Copyright (c) 2024 The Qernal Provider Authors
//
// SPDX-License-Identifier: Apache-2.0
//

//! Seal secrets locally against a project's data encryption key and store
//! them through the Qernal API.

pub mod error;
pub use error::*;

pub mod config;
pub use config::*;

pub mod hub;
pub use hub::{Hub, SecretState};

pub mod secret;

#[cfg(test)]
mod mock;
