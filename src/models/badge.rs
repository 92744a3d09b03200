//! Badge model

use serde::{Deserialize, Serialize};

/// A profile badge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Badge {
    /// Unique slug
    pub slug: String,
    /// Display name
    pub name: String,
    /// Short description
    #[serde(default)]
    pub caption: String,
    /// Icon URL
    #[serde(default)]
    pub image_url: Option<String>,
}
