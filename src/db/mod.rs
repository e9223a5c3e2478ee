//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Email uniqueness index (keyed by encoded email)
    pub const USER_EMAILS: &str = "user_emails";
    pub const WORKOUTS: &str = "workouts";
    pub const MEALS: &str = "meals";
}
