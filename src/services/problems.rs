// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Problem records: creation, inline field edits and deletion.
//!
//! Every edit is a merge write of a single field followed by a fresh read of
//! the whole record, so callers always see what the store holds.
//!
//! The duplicate-title check on creation is a plain read before the write.
//! Two near-simultaneous submissions of the same title can both pass it.

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::markdown::strip_markdown_comments;
use crate::models::{NewProblem, Problem, ProblemPatch, TAG_VOCABULARY};

pub const MSG_ADDED: &str = "Problem added successfully";
pub const MSG_DELETED: &str = "Problem deleted successfully";
pub const MSG_DUPLICATE_TITLE: &str = "Problem with same title already exists";
pub const MSG_NEED_DESCRIPTION_OR_LINKS: &str = "Please provide either description or links";
pub const MSG_NOT_FOUND: &str = "Problem not found";

#[derive(Clone)]
pub struct ProblemService {
    db: FirestoreDb,
}

impl ProblemService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Validate and store a new problem.
    pub async fn create(&self, uid: &str, input: NewProblem) -> Result<Problem> {
        let problem = prepare(input)?;

        let existing = self.db.find_problems_by_title(uid, &problem.title).await?;
        if !existing.is_empty() {
            tracing::debug!(uid, title = %problem.title, "Duplicate problem title");
            return Err(AppError::Conflict(MSG_DUPLICATE_TITLE.to_string()));
        }

        let created = self.db.create_problem(uid, &problem).await?;
        tracing::info!(uid, problem_id = %created.id, title = %created.title, "Problem created");
        Ok(created)
    }

    pub async fn get(&self, uid: &str, id: &str) -> Result<Problem> {
        self.db
            .get_problem(uid, id)
            .await?
            .ok_or_else(|| AppError::NotFound(MSG_NOT_FOUND.to_string()))
    }

    pub async fn list(&self, uid: &str) -> Result<Vec<Problem>> {
        self.db.list_problems(uid).await
    }

    /// Merge-write one field, then return the record as re-read from the store.
    pub async fn patch_field(&self, uid: &str, id: &str, patch: ProblemPatch) -> Result<Problem> {
        // Merge writes would otherwise create a partial document.
        self.get(uid, id).await?;

        let field = patch.field_name();
        self.db
            .merge_problem(uid, id, &patch.to_document(), &[field])
            .await?;
        tracing::info!(uid, problem_id = id, field, "Problem field updated");

        self.get(uid, id).await
    }

    /// Append one link to the stored list.
    pub async fn append_link(&self, uid: &str, id: &str, link: &str) -> Result<Problem> {
        let link = link.trim();
        if link.is_empty() {
            return Err(AppError::BadRequest("Please enter a link".to_string()));
        }

        let mut links = self.get(uid, id).await?.links;
        links.push(link.to_string());
        self.patch_field(uid, id, ProblemPatch::Links(links)).await
    }

    pub async fn delete(&self, uid: &str, id: &str) -> Result<()> {
        self.db.delete_problem(uid, id).await?;
        tracing::info!(uid, problem_id = id, "Problem deleted");
        Ok(())
    }
}

/// Validate creation input and build the record to store.
///
/// Comments are stripped from description and notes before the
/// description-or-links rule is checked.
fn prepare(input: NewProblem) -> Result<Problem> {
    let title = input.title.trim().to_string();
    if title.is_empty() {
        return Err(AppError::BadRequest("Please provide a title".to_string()));
    }

    let difficulty = input
        .difficulty
        .ok_or_else(|| AppError::BadRequest("Please select a difficulty".to_string()))?;
    let status = input
        .status
        .ok_or_else(|| AppError::BadRequest("Please select a status".to_string()))?;

    if let Some(tag) = input
        .tags
        .iter()
        .find(|t| !TAG_VOCABULARY.contains(&t.as_str()))
    {
        return Err(AppError::BadRequest(format!("Unknown tag: {}", tag)));
    }

    let links: Vec<String> = input
        .links
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();

    let description = strip_markdown_comments(&input.description);
    let notes = strip_markdown_comments(&input.notes);

    if description.is_empty() && links.is_empty() {
        return Err(AppError::BadRequest(
            MSG_NEED_DESCRIPTION_OR_LINKS.to_string(),
        ));
    }

    Ok(Problem {
        id: String::new(),
        title,
        difficulty: difficulty.as_str().to_string(),
        status: status.as_str().to_string(),
        tags: input.tags,
        links,
        code: input.code,
        notes,
        description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, Status};

    fn two_sum() -> NewProblem {
        NewProblem {
            title: "Two Sum".to_string(),
            difficulty: Some(Difficulty::Easy),
            status: Some(Status::Unsolved),
            description: "desc".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn rejects_missing_description_and_links_without_writing() {
        let db = FirestoreDb::new_in_memory();
        let service = ProblemService::new(db.clone());

        let input = NewProblem {
            description: "<!-- only a hint -->".to_string(),
            links: vec![" ".to_string()],
            ..two_sum()
        };
        let err = service.create("alice", input).await.unwrap_err();

        assert!(matches!(err, AppError::BadRequest(ref m) if m == MSG_NEED_DESCRIPTION_OR_LINKS));
        assert_eq!(db.memory_document_count(), Some(0));
    }

    #[tokio::test]
    async fn links_alone_are_enough() {
        let service = ProblemService::new(FirestoreDb::new_in_memory());
        let input = NewProblem {
            description: String::new(),
            links: vec!["https://leetcode.com/problems/two-sum/".to_string()],
            ..two_sum()
        };
        let created = service.create("alice", input).await.unwrap();
        assert_eq!(created.links.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_title_is_rejected() {
        let db = FirestoreDb::new_in_memory();
        let service = ProblemService::new(db.clone());

        service.create("alice", two_sum()).await.unwrap();
        let err = service.create("alice", two_sum()).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref m) if m == MSG_DUPLICATE_TITLE));
        assert_eq!(db.memory_document_count(), Some(1));

        // Titles are unique per user only
        service.create("bob", two_sum()).await.unwrap();
    }

    #[tokio::test]
    async fn comments_are_stripped_before_storing() {
        let service = ProblemService::new(FirestoreDb::new_in_memory());
        let input = NewProblem {
            description: "Find <!-- inline --> pairs\n<!--\nmulti\nline\n-->done".to_string(),
            notes: "<!-- todo -->hash map".to_string(),
            ..two_sum()
        };
        let created = service.create("alice", input).await.unwrap();
        let stored = service.get("alice", &created.id).await.unwrap();
        assert_eq!(stored.description, "Find  pairs\ndone");
        assert_eq!(stored.notes, "hash map");
    }

    #[tokio::test]
    async fn unknown_tags_and_missing_fields_are_rejected() {
        let service = ProblemService::new(FirestoreDb::new_in_memory());

        let input = NewProblem {
            tags: vec!["Array".to_string(), "Vibes".to_string()],
            ..two_sum()
        };
        assert!(matches!(
            service.create("alice", input).await.unwrap_err(),
            AppError::BadRequest(ref m) if m == "Unknown tag: Vibes"
        ));

        let input = NewProblem {
            status: None,
            ..two_sum()
        };
        assert!(service.create("alice", input).await.is_err());

        let input = NewProblem {
            title: "   ".to_string(),
            ..two_sum()
        };
        assert!(service.create("alice", input).await.is_err());
    }

    #[tokio::test]
    async fn patch_changes_only_one_field() {
        let service = ProblemService::new(FirestoreDb::new_in_memory());
        let created = service.create("alice", two_sum()).await.unwrap();

        let updated = service
            .patch_field("alice", &created.id, ProblemPatch::Status(Status::Solved))
            .await
            .unwrap();

        assert_eq!(
            updated,
            Problem {
                status: "Solved".to_string(),
                ..created
            }
        );
    }

    #[tokio::test]
    async fn patch_of_missing_problem_creates_nothing() {
        let db = FirestoreDb::new_in_memory();
        let service = ProblemService::new(db.clone());

        let err = service
            .patch_field("alice", "nope", ProblemPatch::Notes("x".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(db.memory_document_count(), Some(0));
    }

    #[tokio::test]
    async fn append_link_keeps_existing_links() {
        let service = ProblemService::new(FirestoreDb::new_in_memory());
        let input = NewProblem {
            links: vec!["https://a.example".to_string()],
            ..two_sum()
        };
        let created = service.create("alice", input).await.unwrap();

        let updated = service
            .append_link("alice", &created.id, " https://b.example ")
            .await
            .unwrap();
        assert_eq!(updated.links, vec!["https://a.example", "https://b.example"]);

        assert!(service.append_link("alice", &created.id, "").await.is_err());
    }

    #[tokio::test]
    async fn deleted_problem_is_absent() {
        let service = ProblemService::new(FirestoreDb::new_in_memory());
        let created = service.create("alice", two_sum()).await.unwrap();

        service.delete("alice", &created.id).await.unwrap();
        assert!(matches!(
            service.get("alice", &created.id).await.unwrap_err(),
            AppError::NotFound(_)
        ));
        assert!(service.list("alice").await.unwrap().is_empty());
    }
}
