// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod countdown;
pub mod daily;
pub mod executor;
pub mod firebase_token;
pub mod identity;
pub mod problems;
pub mod profile;
pub mod storage;

pub use daily::{DailyService, TodayView};
pub use executor::{Buffer, CompilerPanel, ExecutorClient, Language};
pub use firebase_token::{FirebaseTokenVerifier, TokenError, VerifiedFirebaseUser};
pub use identity::IdentityService;
pub use problems::ProblemService;
pub use profile::{ProfileImage, ProfileService, ProfileUpdate};
pub use storage::{StorageService, UploadProgress};
