use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alignment {
    Good,
    Evil,
}

/// Hidden role of a player. Alignment and the special night capability are
/// independent bits; only the alignment drives targeting and the win check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Villager,
    #[serde(rename = "wolf")]
    Werewolf,
    Seer,
}

impl Role {
    pub const fn alignment(self) -> Alignment {
        match self {
            Role::Villager | Role::Seer => Alignment::Good,
            Role::Werewolf => Alignment::Evil,
        }
    }

    pub const fn is_special(self) -> bool {
        matches!(self, Role::Seer)
    }

    pub const fn is_good(self) -> bool {
        matches!(self.alignment(), Alignment::Good)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Villager => write!(f, "villager"),
            Role::Werewolf => write!(f, "wolf"),
            Role::Seer => write!(f, "seer"),
        }
    }
}

impl FromStr for Role {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "villager" => Ok(Role::Villager),
            "wolf" | "werewolf" => Ok(Role::Werewolf),
            "seer" => Ok(Role::Seer),
            other => Err(GameError::Configuration(format!("unknown role: {other:?}"))),
        }
    }
}

/// Parses a comma separated list such as `villager,wolf,seer`.
pub fn parse_roster(text: &str) -> Result<Vec<Role>, GameError> {
    let roles = text
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(str::parse)
        .collect::<Result<Vec<Role>, _>>()?;
    if roles.is_empty() {
        return Err(GameError::Configuration("roster is empty".into()));
    }
    Ok(roles)
}
