//! Database layer (Firestore).

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Per-user problems (`users/{uid}/problems/{id}`)
    pub const PROBLEMS: &str = "problems";
    /// Per-user day-keyed task lists (`users/{uid}/daily/{day_key}`)
    pub const DAILY: &str = "daily";
}
