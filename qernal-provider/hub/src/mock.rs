// Copyright (c) 2024 The Qernal Provider Authors
//
// SPDX-License-Identifier: Apache-2.0
//

//! In-memory stand-in of the secrets endpoints. It holds the DEK key pairs
//! itself, so tests can open whatever was submitted.

use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use crypto::RecipientKeyPair;
use qernal_client::{
    Dek, DekPayload, DekProvider, Error, Result, SecretBody, SecretBodyPatch, SecretDate,
    SecretMetaPayload, SecretMetaResponse, SecretPayload, SecretType, SecretsApi,
};

pub(crate) const CREATED_AT: &str = "2024-05-01T10:00:00Z";
pub(crate) const UPDATED_AT: &str = "2024-05-02T11:30:00Z";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StoredSecret {
    pub r#type: SecretType,
    pub payload: SecretPayload,
    pub encryption: String,
    pub revision: u64,
    pub updated: bool,
}

#[derive(Default)]
struct State {
    keys: HashMap<u64, RecipientKeyPair>,
    current: u64,
    rotate_on_fetch: bool,
    fail_fetch: bool,
    malformed_key: bool,
    fail_get: bool,
    fetches: usize,
    writes: usize,
    secrets: HashMap<String, StoredSecret>,
}

pub(crate) struct MockApi {
    state: Mutex<State>,
}

fn status(status: u16, detail: &str) -> Error {
    Error::Api {
        status,
        detail: format!(r#"{{"message":"{detail}"}}"#),
    }
}

impl MockApi {
    pub fn new(revision: u64) -> Self {
        let mut state = State {
            current: revision,
            ..Default::default()
        };
        state.keys.insert(revision, RecipientKeyPair::generate());
        Self {
            state: Mutex::new(state),
        }
    }

    /// Replace the DEK by a new one with the next revision.
    pub fn rotate(&self) {
        let mut state = self.state.lock().unwrap();
        state.current += 1;
        let current = state.current;
        state.keys.insert(current, RecipientKeyPair::generate());
    }

    /// Rotate right after every DEK response.
    pub fn rotate_on_fetch(&self) {
        self.state.lock().unwrap().rotate_on_fetch = true;
    }

    pub fn fail_fetch(&self) {
        self.state.lock().unwrap().fail_fetch = true;
    }

    /// Serve a 16 byte public key.
    pub fn serve_malformed_key(&self) {
        self.state.lock().unwrap().malformed_key = true;
    }

    pub fn fail_get(&self) {
        self.state.lock().unwrap().fail_get = true;
    }

    pub fn key(&self, revision: u64) -> RecipientKeyPair {
        self.state.lock().unwrap().keys[&revision].clone()
    }

    pub fn fetches(&self) -> usize {
        self.state.lock().unwrap().fetches
    }

    pub fn writes(&self) -> usize {
        self.state.lock().unwrap().writes
    }

    pub fn stored(&self, name: &str) -> Option<StoredSecret> {
        self.state.lock().unwrap().secrets.get(name).cloned()
    }

    /// Store a secret directly, as if someone else had created it.
    pub fn insert(&self, name: &str, secret: StoredSecret) {
        self.state
            .lock()
            .unwrap()
            .secrets
            .insert(name.to_string(), secret);
    }
}

fn meta(name: &str, secret: &StoredSecret) -> SecretMetaResponse {
    let mut payload = SecretMetaPayload::default();
    match &secret.payload {
        SecretPayload::Registry { registry, .. } => payload.registry = Some(registry.clone()),
        SecretPayload::Certificate { certificate, .. } => {
            payload.certificate = Some(certificate.clone())
        }
        SecretPayload::Environment { .. } => {}
    }

    SecretMetaResponse {
        name: name.to_string(),
        r#type: secret.r#type,
        payload,
        revision: secret.revision,
        date: SecretDate {
            created_at: CREATED_AT.into(),
            updated_at: if secret.updated {
                UPDATED_AT.into()
            } else {
                CREATED_AT.into()
            },
        },
    }
}

#[async_trait]
impl DekProvider for MockApi {
    async fn fetch_dek(&self, _project_id: &str) -> Result<Dek> {
        let mut state = self.state.lock().unwrap();
        state.fetches += 1;
        if state.fail_fetch {
            return Err(status(503, "service unavailable"));
        }

        let revision = state.current;
        let public_key = if state.malformed_key {
            STANDARD.encode([1u8; 16])
        } else {
            state.keys[&revision].public_key().to_base64()
        };

        if state.rotate_on_fetch {
            state.current += 1;
            let current = state.current;
            state.keys.insert(current, RecipientKeyPair::generate());
        }

        let response = SecretMetaResponse {
            name: "dek".into(),
            r#type: SecretType::Dek,
            payload: SecretMetaPayload {
                dek: Some(DekPayload { public: public_key }),
                ..Default::default()
            },
            revision,
            date: SecretDate::default(),
        };
        Dek::from_response("proj", response)
    }
}

#[async_trait]
impl SecretsApi for MockApi {
    async fn create_secret(
        &self,
        _project_id: &str,
        body: &SecretBody,
    ) -> Result<SecretMetaResponse> {
        let mut state = self.state.lock().unwrap();
        state.writes += 1;
        if state.secrets.contains_key(&body.name) {
            return Err(status(409, "secret already exists"));
        }

        let secret = StoredSecret {
            r#type: body.r#type,
            payload: body.payload.clone(),
            encryption: body.encryption.clone(),
            revision: 1,
            updated: false,
        };
        let response = meta(&body.name, &secret);
        state.secrets.insert(body.name.clone(), secret);
        Ok(response)
    }

    async fn update_secret(
        &self,
        _project_id: &str,
        name: &str,
        body: &SecretBodyPatch,
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.writes += 1;
        let secret = state
            .secrets
            .get_mut(name)
            .ok_or_else(|| status(404, "secret not found"))?;

        secret.r#type = body.r#type;
        secret.payload = body.payload.clone();
        secret.encryption = body.encryption.clone();
        secret.revision += 1;
        secret.updated = true;
        Ok(())
    }

    async fn get_secret(&self, _project_id: &str, name: &str) -> Result<SecretMetaResponse> {
        let state = self.state.lock().unwrap();
        if state.fail_get {
            return Err(status(503, "service unavailable"));
        }

        state
            .secrets
            .get(name)
            .map(|secret| meta(name, secret))
            .ok_or_else(|| status(404, "secret not found"))
    }

    async fn delete_secret(&self, _project_id: &str, name: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.writes += 1;
        state
            .secrets
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| status(404, "secret not found"))
    }
}
