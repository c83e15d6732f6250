// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile edits: display name and profile image.

use crate::error::{AppError, Result};
use crate::models::UserProfile;
use crate::services::identity::IdentityService;
use crate::services::storage::{StorageService, UploadProgress};
use dashmap::DashMap;
use std::sync::Arc;

pub const MSG_UPDATED: &str = "Profile updated successfully";
pub const MSG_NOTHING_TO_UPDATE: &str = "Please enter a name or upload an image";

/// Uploaded image bytes and their MIME type.
#[derive(Debug, Clone)]
pub struct ProfileImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Requested change. Empty names count as absent.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub image: Option<ProfileImage>,
}

/// Storage path of a user's profile image. Each upload overwrites it.
pub fn profile_image_path(uid: &str) -> String {
    format!("users/{}/profile.jpg", uid)
}

#[derive(Clone)]
pub struct ProfileService {
    identity: IdentityService,
    storage: StorageService,
    progress: Arc<DashMap<String, UploadProgress>>,
}

impl ProfileService {
    pub fn new(identity: IdentityService, storage: StorageService) -> Self {
        Self {
            identity,
            storage,
            progress: Arc::new(DashMap::new()),
        }
    }

    /// Latest upload progress for `uid`, if an upload was started.
    pub fn upload_progress(&self, uid: &str) -> Option<UploadProgress> {
        self.progress.get(uid).map(|p| *p)
    }

    pub async fn update(
        &self,
        uid: &str,
        id_token: &str,
        update: ProfileUpdate,
    ) -> Result<UserProfile> {
        let name = update.name.filter(|n| !n.is_empty());
        if name.is_none() && update.image.is_none() {
            return Err(AppError::BadRequest(MSG_NOTHING_TO_UPDATE.to_string()));
        }

        let current = self.identity.lookup(uid, id_token).await?;

        let profile = match update.image {
            Some(image) => {
                let progress = self.progress.clone();
                let key = uid.to_string();
                let url = self
                    .storage
                    .upload_resumable(
                        id_token,
                        &profile_image_path(uid),
                        &image.bytes,
                        &image.content_type,
                        move |p| {
                            progress.insert(key.clone(), p);
                        },
                    )
                    .await?;

                let display_name = name.or(current.display_name);
                self.identity
                    .update_profile(uid, id_token, display_name.as_deref(), Some(&url))
                    .await?
            }
            None => {
                self.identity
                    .update_profile(uid, id_token, name.as_deref(), current.photo_url.as_deref())
                    .await?
            }
        };

        tracing::info!(uid, "Profile updated");
        Ok(profile)
    }
}
