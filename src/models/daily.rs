// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Daily task list model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::problem::{Problem, Treatment};

/// Day-keyed task list stored at `users/{uid}/daily/{day_key}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyTask {
    /// Problem titles, in the order they were added
    #[serde(default)]
    pub problems: Vec<String>,
}

impl DailyTask {
    pub fn contains(&self, title: &str) -> bool {
        self.problems.iter().any(|p| p == title)
    }
}

/// Document ID of a day's task list, e.g. `Mon Oct 19 2026`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DayKey(String);

impl DayKey {
    pub fn for_date(date: NaiveDate) -> Self {
        Self(date.format("%a %b %d %Y").to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of today's list, joined with its problem record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DailyEntry {
    pub id: String,
    pub title: String,
    /// Stored status label
    pub status: String,
    pub treatment: Treatment,
}

impl DailyEntry {
    pub fn from_problem(problem: &Problem) -> Self {
        Self {
            id: problem.id.clone(),
            title: problem.title.clone(),
            status: problem.status.clone(),
            treatment: Treatment::for_daily_entry(&problem.status),
        }
    }
}
