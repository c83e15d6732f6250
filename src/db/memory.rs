// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process document store with Firestore-like merge semantics.
//!
//! Documents are kept as JSON objects keyed by their full path
//! (`users/{uid}/problems/{id}`). Reads inject the document ID under
//! `_firestore_id`, the same field the Firestore client fills in.

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::AppError;

const ID_FIELD: &str = "_firestore_id";

#[derive(Default)]
pub struct MemoryStore {
    docs: DashMap<String, Map<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, AppError> {
        let Some(fields) = self.docs.get(path).map(|d| d.value().clone()) else {
            return Ok(None);
        };
        decode(path, fields).map(Some)
    }

    /// All documents directly under `collection_path`, ordered by ID.
    pub fn list<T: DeserializeOwned>(&self, collection_path: &str) -> Result<Vec<T>, AppError> {
        let prefix = format!("{}/", collection_path);
        let mut entries: Vec<(String, Map<String, Value>)> = self
            .docs
            .iter()
            .filter(|e| {
                e.key()
                    .strip_prefix(&prefix)
                    .is_some_and(|rest| !rest.contains('/'))
            })
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        entries
            .into_iter()
            .map(|(path, fields)| decode(&path, fields))
            .collect()
    }

    /// Replace the whole document.
    pub fn set<T: Serialize>(&self, path: &str, value: &T) -> Result<(), AppError> {
        let fields = encode(value)?;
        self.docs.insert(path.to_string(), fields);
        Ok(())
    }

    /// Overwrite only the fields present in `value`, creating the document if needed.
    pub fn merge<T: Serialize>(&self, path: &str, value: &T) -> Result<(), AppError> {
        let fields = encode(value)?;
        let mut entry = self.docs.entry(path.to_string()).or_default();
        for (key, v) in fields {
            entry.insert(key, v);
        }
        Ok(())
    }

    pub fn delete(&self, path: &str) {
        self.docs.remove(path);
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Map<String, Value>, AppError> {
    match serde_json::to_value(value).map_err(|e| AppError::Database(e.to_string()))? {
        Value::Object(map) => Ok(map),
        other => Err(AppError::Database(format!(
            "Document must be an object, got {}",
            other
        ))),
    }
}

fn decode<T: DeserializeOwned>(path: &str, mut fields: Map<String, Value>) -> Result<T, AppError> {
    let id = path.rsplit('/').next().unwrap_or_default();
    fields.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
    serde_json::from_value(Value::Object(fields))
        .map_err(|e| AppError::Database(format!("Corrupt document {}: {}", path, e)))
}
