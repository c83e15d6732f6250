// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Day-keyed task lists.
//!
//! "Today" is the calendar date at the configured UTC offset. The presence
//! check in [`DailyService::add_to_today`] is a read before the write, so two
//! concurrent adds of the same title can both land.

use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::{DailyEntry, DailyTask, DayKey, Problem};

pub const MSG_ADDED: &str = "Successfully added to today's task";
pub const MSG_ALREADY_PRESENT: &str = "Already present in today's task";

/// Today's list joined with the user's problems.
#[derive(Debug, Clone)]
pub struct TodayView {
    pub day: DayKey,
    /// Titles of all the user's problems (search options)
    pub options: Vec<String>,
    /// Titles stored in today's list, in insertion order
    pub titles: Vec<String>,
    /// Today's titles that match a problem record
    pub entries: Vec<DailyEntry>,
}

#[derive(Clone)]
pub struct DailyService {
    db: FirestoreDb,
    offset: FixedOffset,
}

impl DailyService {
    pub fn new(db: FirestoreDb, day_offset_minutes: i32) -> Self {
        let offset = FixedOffset::east_opt(day_offset_minutes * 60).unwrap_or_else(|| {
            tracing::warn!(day_offset_minutes, "Invalid day offset, using UTC");
            Utc.fix()
        });
        Self { db, offset }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn day_key(&self, now: DateTime<Utc>) -> DayKey {
        DayKey::for_date(now.with_timezone(&self.offset).date_naive())
    }

    pub async fn today(&self, uid: &str, now: DateTime<Utc>) -> Result<TodayView> {
        let day = self.day_key(now);
        let problems = self.db.list_problems(uid).await?;
        let task = self.db.get_daily_task(uid, &day).await?.unwrap_or_default();

        Ok(join(day, &problems, task))
    }

    /// Append `title` to today's list, creating the list on first use.
    pub async fn add_to_today(
        &self,
        uid: &str,
        title: &str,
        now: DateTime<Utc>,
    ) -> Result<DailyTask> {
        if title.is_empty() {
            return Err(AppError::BadRequest("Please select a problem".to_string()));
        }

        let day = self.day_key(now);
        let mut task = self.db.get_daily_task(uid, &day).await?.unwrap_or_default();

        if task.contains(title) {
            tracing::debug!(uid, day = %day, title, "Daily entry already present");
            return Err(AppError::Conflict(MSG_ALREADY_PRESENT.to_string()));
        }

        task.problems.push(title.to_string());
        self.db.merge_daily_task(uid, &day, &task).await?;
        tracing::info!(uid, day = %day, title, "Added to daily task");

        Ok(task)
    }
}

fn join(day: DayKey, problems: &[Problem], task: DailyTask) -> TodayView {
    let entries = task
        .problems
        .iter()
        .filter_map(|title| problems.iter().find(|p| &p.title == title))
        .map(DailyEntry::from_problem)
        .collect();

    TodayView {
        day,
        options: problems.iter().map(|p| p.title.clone()).collect(),
        titles: task.problems,
        entries,
    }
}
