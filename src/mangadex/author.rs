use serde::Deserialize;
use uuid::Uuid;

use super::locale::LocalizedText;

#[derive(Debug, Clone, Deserialize)]
pub struct Author {
    pub id: Uuid,
    pub attributes: AuthorAttributes,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthorAttributes {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub biography: LocalizedText,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScanlationGroup {
    pub id: Uuid,
    pub attributes: GroupAttributes,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupAttributes {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Cover {
    pub id: Uuid,
    pub attributes: CoverAttributes,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverAttributes {
    pub file_name: String,
    #[serde(default)]
    pub volume: Option<String>,
}
