// Copyright (c) 2024 The Qernal Provider Authors
//
// SPDX-License-Identifier: Apache-2.0
//

//! # Crypto
//!
//! This crate seals secrets on the client side before they are sent to the
//! platform API. Only the public half of a project's data encryption key
//! (DEK) is ever needed here.
//!
//! ## Components
//!
//! This crate include the following public submodules:
//! - `sealed_box`: anonymous curve25519 sealed box encryption against a DEK
//!   public key
//! - `reference`: the `keys/dek/<revision>` string which tells the backend
//!   which DEK revision sealed a ciphertext

pub mod error;
pub use error::*;

mod reference;
pub use reference::*;

mod sealed_box;
pub use sealed_box::*;
