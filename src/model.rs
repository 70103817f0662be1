//! User entity and the payload types that flow from validation to storage.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned user identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Social profile links. Persisted as a single JSON blob; absent fields are omitted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Social {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl Social {
    /// Field names accepted inside the `social` object.
    pub const FIELDS: [&'static str; 4] = ["facebook", "twitter", "github", "website"];

    pub fn is_empty(&self) -> bool {
        self.facebook.is_none() && self.twitter.is_none() && self.github.is_none() && self.website.is_none()
    }

    pub(crate) fn slot_mut(&mut self, field: &str) -> Option<&mut Option<String>> {
        match field {
            "facebook" => Some(&mut self.facebook),
            "twitter" => Some(&mut self.twitter),
            "github" => Some(&mut self.github),
            "website" => Some(&mut self.website),
            _ => None,
        }
    }
}

/// Validated user-creation payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewUser {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub social: Social,
}

/// Persisted user row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub social: Social,
}

impl User {
    pub fn from_new(id: UserId, new: NewUser) -> Self {
        User {
            id,
            firstname: new.firstname,
            lastname: new.lastname,
            email: new.email,
            social: new.social,
        }
    }
}

/// Body of a successful creation response: the new id and nothing else.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct CreatedUser {
    pub id: UserId,
}
