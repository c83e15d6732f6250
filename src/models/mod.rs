// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod daily;
pub mod problem;
pub mod user;

pub use daily::{DailyEntry, DailyTask, DayKey};
pub use problem::{
    Difficulty, LinkSource, NewProblem, Problem, ProblemField, ProblemPatch, Status, Treatment,
    TAG_VOCABULARY,
};
pub use user::UserProfile;
