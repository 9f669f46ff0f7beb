use serde::{Deserialize, Serialize};

/// One recommended actor, in the order the model returned them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorMatch {
    pub name: String,
    pub reasoning: String,
    #[serde(default)]
    pub notable_roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_url: Option<String>,
}

impl ActorMatch {
    pub fn new(name: impl Into<String>, reasoning: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reasoning: reasoning.into(),
            notable_roles: Vec::new(),
            photo_url: None,
            imdb_url: None,
        }
    }
}
