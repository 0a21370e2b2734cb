use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Team position as reported by match-v5 `teamPosition`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Top,
    Middle,
    Jungle,
    Bottom,
    Utility,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Top,
        Role::Middle,
        Role::Jungle,
        Role::Bottom,
        Role::Utility,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Top => "TOP",
            Role::Middle => "MIDDLE",
            Role::Jungle => "JUNGLE",
            Role::Bottom => "BOTTOM",
            Role::Utility => "UTILITY",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TOP" => Ok(Role::Top),
            "MIDDLE" => Ok(Role::Middle),
            "JUNGLE" => Ok(Role::Jungle),
            "BOTTOM" => Ok(Role::Bottom),
            "UTILITY" => Ok(Role::Utility),
            _ => Err(()),
        }
    }
}
