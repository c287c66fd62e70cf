use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// The opaque profile the external identity provider returns on sign-in.
/// Only `email` matters to the core; the rest is display material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthProfile {
    pub display_name: String,
    pub email: String,
    pub photo_url: String,
}

/// Role a signed-in user holds for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Member,
}

/// The allow-list of admin emails. Consulted exactly once, at login; the
/// resulting [`Session`] carries the role from then on.
#[derive(Debug, Clone, Default)]
pub struct AdminDirectory {
    emails: BTreeSet<String>,
}

impl AdminDirectory {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AdminDirectory {
            emails: emails.into_iter().map(Into::into).collect(),
        }
    }

    pub fn role_for(&self, email: &str) -> Role {
        if self.emails.contains(email) {
            Role::Admin
        } else {
            Role::Member
        }
    }
}

/// Immutable session context, threaded through every engine operation.
/// The role is resolved once from the directory and never re-derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub email: String,
    pub role: Role,
}

impl Session {
    pub fn establish(profile: &AuthProfile, directory: &AdminDirectory) -> Session {
        Session {
            email: profile.email.clone(),
            role: directory.role_for(&profile.email),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
