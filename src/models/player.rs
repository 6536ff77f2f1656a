//! Player identity model.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::{PlayerId, ValidationError};

/// Playing role. Free text outside the known set is kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PlayerRole {
    Batsman,
    Bowler,
    #[default]
    AllRounder,
    WicketKeeper,
    Other(String),
}

impl PlayerRole {
    pub fn as_str(&self) -> &str {
        match self {
            PlayerRole::Batsman => "Batsman",
            PlayerRole::Bowler => "Bowler",
            PlayerRole::AllRounder => "All-rounder",
            PlayerRole::WicketKeeper => "Wicket-keeper",
            PlayerRole::Other(s) => s,
        }
    }
}

impl From<String> for PlayerRole {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "batsman" => PlayerRole::Batsman,
            "bowler" => PlayerRole::Bowler,
            "all-rounder" | "allrounder" | "all rounder" => PlayerRole::AllRounder,
            "wicket-keeper" | "wicketkeeper" | "wicket keeper" => PlayerRole::WicketKeeper,
            "" => PlayerRole::AllRounder,
            _ => PlayerRole::Other(s),
        }
    }
}

impl From<&str> for PlayerRole {
    fn from(s: &str) -> Self {
        PlayerRole::from(s.to_string())
    }
}

impl From<PlayerRole> for String {
    fn from(role: PlayerRole) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for PlayerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A roster member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,

    /// Display name (non-empty)
    pub name: String,

    #[serde(default)]
    pub role: PlayerRole,

    #[serde(default)]
    pub image_url: Option<String>,
}

/// Input for creating a player.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlayer {
    pub name: String,

    #[serde(default)]
    pub role: PlayerRole,

    #[serde(default)]
    pub image_url: Option<String>,
}

impl NewPlayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_role(mut self, role: PlayerRole) -> Self {
        self.role = role;
        self
    }

    /// Trim the name and reject it if nothing is left.
    pub fn validate(mut self) -> Result<Self, ValidationError> {
        self.name = validate_name(&self.name)?;
        Ok(self)
    }

    pub(crate) fn into_player(self, id: PlayerId) -> Player {
        Player {
            id,
            name: self.name,
            role: self.role,
            image_url: self.image_url,
        }
    }
}

/// Partial update for a player. Absent fields are left untouched;
/// `imageUrl: null` clears the image.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerUpdate {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub role: Option<PlayerRole>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub image_url: Option<Option<String>>,
}

impl PlayerUpdate {
    pub fn validate(mut self) -> Result<Self, ValidationError> {
        if let Some(name) = self.name.take() {
            self.name = Some(validate_name(&name)?);
        }
        Ok(self)
    }

    pub(crate) fn apply(self, player: &mut Player) {
        if let Some(name) = self.name {
            player.name = name;
        }
        if let Some(role) = self.role {
            player.role = role;
        }
        if let Some(image_url) = self.image_url {
            player.image_url = image_url;
        }
    }
}

fn validate_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(name.to_string())
}

/// Distinguishes an explicit `null` from an absent field.
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
