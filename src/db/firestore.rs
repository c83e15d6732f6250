// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Problems (`users/{uid}/problems/{id}`)
//! - Daily task lists (`users/{uid}/daily/{day_key}`)
//!
//! Every operation is scoped to a single user. Partial updates are
//! Firestore field-mask writes, so fields outside the mask are untouched.

use crate::db::collections;
use crate::db::memory::MemoryStore;
use crate::error::AppError;
use crate::models::problem::ProblemPatchDocument;
use crate::models::{DailyTask, DayKey, Problem};
use std::sync::Arc;

#[derive(Clone)]
enum Backend {
    Firestore(firestore::FirestoreDb),
    Memory(Arc<MemoryStore>),
    Offline,
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    backend: Backend,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            backend: Backend::Firestore(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            backend: Backend::Firestore(client),
        })
    }

    /// Create an in-memory document store (tests and local runs without GCP).
    pub fn new_in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(MemoryStore::new())),
        }
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self {
            backend: Backend::Offline,
        }
    }

    /// Number of documents held by the in-memory backend (tests only).
    pub fn memory_document_count(&self) -> Option<usize> {
        match &self.backend {
            Backend::Memory(store) => Some(store.len()),
            _ => None,
        }
    }

    /// Write a raw document into the in-memory store, bypassing `Problem`.
    #[cfg(test)]
    pub(crate) fn seed_raw(&self, path: &str, value: serde_json::Value) {
        if let Backend::Memory(store) = &self.backend {
            store.set(path, &value).unwrap();
        }
    }

    fn offline() -> AppError {
        AppError::Database("Database not connected (offline mode)".to_string())
    }

    fn parent_path(
        client: &firestore::FirestoreDb,
        uid: &str,
    ) -> Result<firestore::ParentPathBuilder, AppError> {
        client
            .parent_path(collections::USERS, uid)
            .map_err(|e| AppError::Database(e.to_string()))
    }

    fn memory_path(uid: &str, collection: &str) -> String {
        format!("{}/{}/{}", collections::USERS, uid, collection)
    }

    // ─── Problem Operations ──────────────────────────────────────

    /// Store a new problem under a generated ID and return it with the ID set.
    pub async fn create_problem(&self, uid: &str, problem: &Problem) -> Result<Problem, AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let parent = Self::parent_path(client, uid)?;
                client
                    .fluent()
                    .insert()
                    .into(collections::PROBLEMS)
                    .generate_document_id()
                    .parent(&parent)
                    .object(problem)
                    .execute::<Problem>()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))
            }
            Backend::Memory(store) => {
                let id = uuid::Uuid::new_v4().simple().to_string();
                let path = format!("{}/{}", Self::memory_path(uid, collections::PROBLEMS), id);
                store.set(&path, problem)?;
                let mut created = problem.clone();
                created.id = id;
                Ok(created)
            }
            Backend::Offline => Err(Self::offline()),
        }
    }

    /// Get a problem by ID.
    pub async fn get_problem(&self, uid: &str, id: &str) -> Result<Option<Problem>, AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let parent = Self::parent_path(client, uid)?;
                client
                    .fluent()
                    .select()
                    .by_id_in(collections::PROBLEMS)
                    .parent(&parent)
                    .obj()
                    .one(id)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))
            }
            Backend::Memory(store) => store.get(&format!(
                "{}/{}",
                Self::memory_path(uid, collections::PROBLEMS),
                id
            )),
            Backend::Offline => Err(Self::offline()),
        }
    }

    /// Get all problems of a user.
    pub async fn list_problems(&self, uid: &str) -> Result<Vec<Problem>, AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let parent = Self::parent_path(client, uid)?;
                client
                    .fluent()
                    .select()
                    .from(collections::PROBLEMS)
                    .parent(&parent)
                    .obj()
                    .query()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))
            }
            Backend::Memory(store) => store.list(&Self::memory_path(uid, collections::PROBLEMS)),
            Backend::Offline => Err(Self::offline()),
        }
    }

    /// Equality query on title.
    pub async fn find_problems_by_title(
        &self,
        uid: &str,
        title: &str,
    ) -> Result<Vec<Problem>, AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let parent = Self::parent_path(client, uid)?;
                client
                    .fluent()
                    .select()
                    .from(collections::PROBLEMS)
                    .parent(&parent)
                    .filter(|q| q.for_all([q.field("title").eq(title)]))
                    .obj()
                    .query()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))
            }
            Backend::Memory(_) => Ok(self
                .list_problems(uid)
                .await?
                .into_iter()
                .filter(|p| p.title == title)
                .collect()),
            Backend::Offline => Err(Self::offline()),
        }
    }

    /// Merge-write only the fields present in `patch`.
    pub async fn merge_problem(
        &self,
        uid: &str,
        id: &str,
        patch: &ProblemPatchDocument,
        fields: &[&str],
    ) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let parent = Self::parent_path(client, uid)?;
                let _: () = client
                    .fluent()
                    .update()
                    .fields(fields.iter().copied())
                    .in_col(collections::PROBLEMS)
                    .document_id(id)
                    .parent(&parent)
                    .object(patch)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(())
            }
            Backend::Memory(store) => store.merge(
                &format!("{}/{}", Self::memory_path(uid, collections::PROBLEMS), id),
                patch,
            ),
            Backend::Offline => Err(Self::offline()),
        }
    }

    /// Delete a problem.
    pub async fn delete_problem(&self, uid: &str, id: &str) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let parent = Self::parent_path(client, uid)?;
                client
                    .fluent()
                    .delete()
                    .from(collections::PROBLEMS)
                    .document_id(id)
                    .parent(&parent)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(())
            }
            Backend::Memory(store) => {
                store.delete(&format!(
                    "{}/{}",
                    Self::memory_path(uid, collections::PROBLEMS),
                    id
                ));
                Ok(())
            }
            Backend::Offline => Err(Self::offline()),
        }
    }

    // ─── Daily Task Operations ───────────────────────────────────

    /// Get the task list for one day.
    pub async fn get_daily_task(
        &self,
        uid: &str,
        day: &DayKey,
    ) -> Result<Option<DailyTask>, AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let parent = Self::parent_path(client, uid)?;
                client
                    .fluent()
                    .select()
                    .by_id_in(collections::DAILY)
                    .parent(&parent)
                    .obj()
                    .one(day.as_str())
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))
            }
            Backend::Memory(store) => store.get(&format!(
                "{}/{}",
                Self::memory_path(uid, collections::DAILY),
                day
            )),
            Backend::Offline => Err(Self::offline()),
        }
    }

    /// Merge-write the day's problem list, creating the document on first use.
    pub async fn merge_daily_task(
        &self,
        uid: &str,
        day: &DayKey,
        task: &DailyTask,
    ) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firestore(client) => {
                let parent = Self::parent_path(client, uid)?;
                let _: () = client
                    .fluent()
                    .update()
                    .fields(["problems"])
                    .in_col(collections::DAILY)
                    .document_id(day.as_str())
                    .parent(&parent)
                    .object(task)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(())
            }
            Backend::Memory(store) => store.merge(
                &format!("{}/{}", Self::memory_path(uid, collections::DAILY), day),
                task,
            ),
            Backend::Offline => Err(Self::offline()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, Status};

    fn problem(title: &str) -> Problem {
        Problem {
            id: String::new(),
            title: title.to_string(),
            difficulty: Difficulty::Easy.to_string(),
            status: Status::Unsolved.to_string(),
            tags: vec!["Array".to_string()],
            links: vec![],
            code: String::new(),
            notes: String::new(),
            description: "desc".to_string(),
        }
    }

    #[tokio::test]
    async fn memory_problems_are_user_scoped() {
        let db = FirestoreDb::new_in_memory();
        let created = db.create_problem("alice", &problem("Two Sum")).await.unwrap();
        assert!(!created.id.is_empty());

        assert!(db.get_problem("bob", &created.id).await.unwrap().is_none());
        let fetched = db.get_problem("alice", &created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);

        assert_eq!(
            db.find_problems_by_title("alice", "Two Sum").await.unwrap().len(),
            1
        );
        assert!(db
            .find_problems_by_title("bob", "Two Sum")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn memory_daily_task_created_on_first_merge() {
        let db = FirestoreDb::new_in_memory();
        let day = DayKey::for_date(chrono::NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());

        assert!(db.get_daily_task("alice", &day).await.unwrap().is_none());

        let task = DailyTask {
            problems: vec!["Two Sum".to_string()],
        };
        db.merge_daily_task("alice", &day, &task).await.unwrap();
        assert_eq!(db.get_daily_task("alice", &day).await.unwrap(), Some(task));
    }

    #[tokio::test]
    async fn stored_problems_with_unknown_labels_still_load() {
        let db = FirestoreDb::new_in_memory();
        db.create_problem("alice", &problem("Two Sum")).await.unwrap();
        db.seed_raw(
            "users/alice/problems/p2",
            serde_json::json!({ "title": "Old", "difficulty": "", "status": "" }),
        );

        let listed = db.list_problems("alice").await.unwrap();
        assert_eq!(listed.len(), 2);

        let old = db.get_problem("alice", "p2").await.unwrap().unwrap();
        assert_eq!(old.id, "p2");
        assert_eq!(old.status, "");
        assert_eq!(old.difficulty, "");
        assert!(old.tags.is_empty());
    }

    #[tokio::test]
    async fn offline_backend_errors() {
        let db = FirestoreDb::new_mock();
        let err = db.list_problems("alice").await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }
}
