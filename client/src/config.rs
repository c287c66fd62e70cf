use serde::Deserialize;

use forecourt_common::identity::AdminDirectory;
use forecourt_common::overview::PLACEHOLDER_IMAGE;

/// Client configuration, deserialized from JSON.
///
/// The admin allow-list lives here rather than in code; it feeds the
/// [`AdminDirectory`] consulted once at login.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    pub admin_emails: Vec<String>,
    pub placeholder_image: Option<String>,
}

impl ClientConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn admin_directory(&self) -> AdminDirectory {
        AdminDirectory::new(self.admin_emails.iter().cloned())
    }

    pub fn placeholder_image(&self) -> &str {
        self.placeholder_image.as_deref().unwrap_or(PLACEHOLDER_IMAGE)
    }
}
