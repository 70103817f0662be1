//! Request extractors.

pub mod user;
pub use user::ValidatedUser;
