// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Coding problem model for storage and API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Tags a problem may carry.
pub const TAG_VOCABULARY: &[&str] = &[
    "Array",
    "String",
    "Hash Table",
    "Math",
    "Dynamic Programming",
    "Sorting",
    "Greedy",
    "Depth-First Search",
    "Breadth-First Search",
    "Binary Search",
    "Tree",
    "Binary Tree",
    "Matrix",
    "Two Pointers",
    "Bit Manipulation",
    "Stack",
    "Queue",
    "Heap (Priority Queue)",
    "Graph",
    "Linked List",
    "Sliding Window",
    "Backtracking",
    "Recursion",
    "Trie",
    "Union Find",
    "Prefix Sum",
    "Geometry",
    "Design",
];

/// Problem difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

/// Solving status of a problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Status {
    Solved,
    Attempted,
    Unsolved,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Solved, Status::Attempted, Status::Unsolved];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Solved => "Solved",
            Status::Attempted => "Attempted",
            Status::Unsolved => "Unsolved",
        }
    }
}

macro_rules! impl_label {
    ($ty:ident, $what:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $ty::ALL
                    .into_iter()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| format!("Unknown {}: {}", $what, s))
            }
        }
    };
}

impl_label!(Difficulty, "difficulty");
impl_label!(Status, "status");

/// Visual treatment picked for a status or difficulty chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Treatment {
    Success,
    Warning,
    Error,
}

impl Treatment {
    /// "Solved" is a success, "Attempted" a warning, anything else an error.
    pub fn for_status(label: &str) -> Self {
        match label {
            "Solved" => Treatment::Success,
            "Attempted" => Treatment::Warning,
            _ => Treatment::Error,
        }
    }

    /// "Easy" is a success, "Medium" a warning, anything else an error.
    pub fn for_difficulty(label: &str) -> Self {
        match label {
            "Easy" => Treatment::Success,
            "Medium" => Treatment::Warning,
            _ => Treatment::Error,
        }
    }

    /// Daily list chips only distinguish solved from everything else.
    pub fn for_daily_entry(label: &str) -> Self {
        if label == "Solved" {
            Treatment::Success
        } else {
            Treatment::Error
        }
    }
}

/// Site a problem link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum LinkSource {
    Leetcode,
    CodingNinjas,
    InterviewBit,
    GeeksForGeeks,
    Other,
}

impl LinkSource {
    pub fn classify(link: &str) -> Self {
        if link.contains("leetcode") {
            LinkSource::Leetcode
        } else if link.contains("codingninjas") {
            LinkSource::CodingNinjas
        } else if link.contains("interviewbit") {
            LinkSource::InterviewBit
        } else if link.contains("geeksforgeeks") {
            LinkSource::GeeksForGeeks
        } else {
            LinkSource::Other
        }
    }
}

/// Problem record stored in Firestore at `users/{uid}/problems/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    /// Document ID (not stored as a field)
    #[serde(alias = "_firestore_id", default, skip_serializing)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Stored label. Older records may hold values outside `Difficulty`, even "".
    #[serde(default)]
    pub difficulty: String,
    /// Stored label. Anything but "Solved"/"Attempted" gets the error treatment.
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub description: String,
}

/// Input for creating a problem, before validation.
#[derive(Debug, Clone, Default)]
pub struct NewProblem {
    pub title: String,
    pub difficulty: Option<Difficulty>,
    pub status: Option<Status>,
    pub tags: Vec<String>,
    pub links: Vec<String>,
    pub code: String,
    pub notes: String,
    pub description: String,
}

/// A field that can be edited on its own from the problem detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemField {
    Title,
    Status,
    Difficulty,
    Description,
    Code,
    Notes,
}

impl ProblemField {
    /// Stored field name.
    pub fn name(&self) -> &'static str {
        match self {
            ProblemField::Title => "title",
            ProblemField::Status => "status",
            ProblemField::Difficulty => "difficulty",
            ProblemField::Description => "description",
            ProblemField::Code => "code",
            ProblemField::Notes => "notes",
        }
    }
}

impl FromStr for ProblemField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(ProblemField::Title),
            "status" => Ok(ProblemField::Status),
            "difficulty" => Ok(ProblemField::Difficulty),
            "description" => Ok(ProblemField::Description),
            "code" => Ok(ProblemField::Code),
            "notes" => Ok(ProblemField::Notes),
            other => Err(format!("Unknown problem field: {}", other)),
        }
    }
}

/// A single-field change to a stored problem.
#[derive(Debug, Clone, PartialEq)]
pub enum ProblemPatch {
    Title(String),
    Status(Status),
    Difficulty(Difficulty),
    Description(String),
    Code(String),
    Notes(String),
    Links(Vec<String>),
}

impl ProblemPatch {
    /// Build a patch for `field` from a raw JSON value.
    pub fn from_value(field: ProblemField, value: serde_json::Value) -> Result<Self, String> {
        let text = match value {
            serde_json::Value::String(s) => s,
            serde_json::Value::Null => String::new(),
            other => return Err(format!("Expected a string for {}, got {}", field.name(), other)),
        };

        match field {
            ProblemField::Title => {
                let title = text.trim();
                if title.is_empty() {
                    return Err("Title must not be empty".to_string());
                }
                Ok(ProblemPatch::Title(title.to_string()))
            }
            ProblemField::Status => text.parse().map(ProblemPatch::Status),
            ProblemField::Difficulty => text.parse().map(ProblemPatch::Difficulty),
            ProblemField::Description => Ok(ProblemPatch::Description(text)),
            ProblemField::Code => Ok(ProblemPatch::Code(text)),
            ProblemField::Notes => Ok(ProblemPatch::Notes(text)),
        }
    }

    /// Stored field name written by this patch.
    pub fn field_name(&self) -> &'static str {
        match self {
            ProblemPatch::Title(_) => "title",
            ProblemPatch::Status(_) => "status",
            ProblemPatch::Difficulty(_) => "difficulty",
            ProblemPatch::Description(_) => "description",
            ProblemPatch::Code(_) => "code",
            ProblemPatch::Notes(_) => "notes",
            ProblemPatch::Links(_) => "links",
        }
    }

    /// Human label used in "<label> updated successfully".
    pub fn label(&self) -> &'static str {
        match self {
            ProblemPatch::Title(_) => "Title",
            ProblemPatch::Status(_) => "Status",
            ProblemPatch::Difficulty(_) => "Difficulty",
            ProblemPatch::Description(_) => "Description",
            ProblemPatch::Code(_) => "Code",
            ProblemPatch::Notes(_) => "Notes",
            ProblemPatch::Links(_) => "Links",
        }
    }

    /// Document carrying only the patched field.
    pub fn to_document(&self) -> ProblemPatchDocument {
        let mut doc = ProblemPatchDocument::default();
        match self {
            ProblemPatch::Title(v) => doc.title = Some(v.clone()),
            ProblemPatch::Status(v) => doc.status = Some(*v),
            ProblemPatch::Difficulty(v) => doc.difficulty = Some(*v),
            ProblemPatch::Description(v) => doc.description = Some(v.clone()),
            ProblemPatch::Code(v) => doc.code = Some(v.clone()),
            ProblemPatch::Notes(v) => doc.notes = Some(v.clone()),
            ProblemPatch::Links(v) => doc.links = Some(v.clone()),
        }
        doc
    }
}

/// Partial problem document used for merge writes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProblemPatchDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
