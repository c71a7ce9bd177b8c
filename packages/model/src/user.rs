use serde::{Deserialize, Serialize};

/// Id used where the server reports no user
pub const NOBODY_ID: &str = "@@@nobody@@@";

/// Robots are hosted under this domain
const ROBOT_DOMAIN: &str = "@appspot.com";

/// A participant in a wave, human or robot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,

    /// Display name. Empty means "use the id".
    #[serde(default)]
    name: String,

    #[serde(default)]
    pub profile_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            profile_url: String::new(),
            image_url: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_profile_url(mut self, url: impl Into<String>) -> Self {
        self.profile_url = url.into();
        self
    }

    pub fn name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    pub fn is_robot(&self) -> bool {
        self.id.ends_with(ROBOT_DOMAIN)
    }
}
