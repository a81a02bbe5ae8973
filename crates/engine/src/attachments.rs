//! Collaborator seams for opaque binary content.
//!
//! The engine never touches a filesystem or an object store directly: receipt
//! images and seed-category icons travel through these traits, and only the
//! stored reference string is persisted. Implementations live with the
//! caller (API layer, admin CLI, tests).

use std::io;

/// Destination for user-uploaded blobs (receipt images, seeded icons).
pub trait BlobStore {
    /// Persists `bytes` under `reference`, overwriting any previous content.
    fn put(&self, reference: &str, bytes: &[u8]) -> io::Result<()>;
}

/// Source of the bundled seed assets referenced by [`DEFAULT_CATEGORIES`].
pub trait AssetStore {
    /// Loads the raw bytes behind a seed asset reference.
    fn load(&self, reference: &str) -> io::Result<Vec<u8>>;
}

/// Static seed list consumed by the one-time per-user category setup: the
/// category name and the bundled icon asset backing it.
pub const DEFAULT_CATEGORIES: &[(&str, &str)] = &[
    ("Groceries", "icons/groceries.png"),
    ("Shopping", "icons/shopping.png"),
    ("Restaurants", "icons/restaurants.png"),
    ("Transport", "icons/transport.png"),
    ("Utilities", "icons/utilities.png"),
    ("Health", "icons/health.png"),
    ("Entertainment", "icons/entertainment.png"),
    ("Other", "icons/other.png"),
];

/// Stored reference for a user-scoped blob: `{user_id}/{filename}`.
pub(crate) fn stored_path(user_id: i32, filename: &str) -> String {
    format!("{user_id}/{filename}")
}
