// Copyright (c) 2024 The Qernal Provider Authors
//
// SPDX-License-Identifier: Apache-2.0
//

pub mod certificate;
pub mod environment;
pub mod registry;
