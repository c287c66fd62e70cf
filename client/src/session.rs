use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use forecourt_common::identity::{AdminDirectory, AuthProfile, Session};

/// Sign-in failed at the provider.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("sign-in failed: {0}")]
    SignIn(String),
}

/// The external identity provider at its interface: an opaque profile on
/// successful sign-in. How the provider authenticates is not this crate's
/// business.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self) -> Result<AuthProfile, AuthError>;
}

/// Sign in and establish the immutable session context. The admin directory
/// is consulted here and nowhere else; the session carries the role from
/// then on.
pub async fn login(
    provider: &dyn IdentityProvider,
    directory: &AdminDirectory,
) -> Result<Session, AuthError> {
    let profile = provider.sign_in().await?;
    let session = Session::establish(&profile, directory);
    info!(email = %session.email, role = ?session.role, "signed in");
    Ok(session)
}

/// Fixed-profile provider for tests and local development.
pub struct StaticIdentity {
    profile: AuthProfile,
}

impl StaticIdentity {
    pub fn new(display_name: impl Into<String>, email: impl Into<String>) -> Self {
        StaticIdentity {
            profile: AuthProfile {
                display_name: display_name.into(),
                email: email.into(),
                photo_url: String::new(),
            },
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn sign_in(&self) -> Result<AuthProfile, AuthError> {
        Ok(self.profile.clone())
    }
}
