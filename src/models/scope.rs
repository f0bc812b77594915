//! Roles and percentage scopes.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Group role a specialization fills in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Tank,
    Healer,
    Dps,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Tank => write!(f, "tank"),
            Role::Healer => write!(f, "healer"),
            Role::Dps => write!(f, "dps"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tank" => Ok(Role::Tank),
            "healer" | "heal" => Ok(Role::Healer),
            "dps" | "damage" => Ok(Role::Dps),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// The subset of records a percentage denominator is summed over.
///
/// Every view names its scope explicitly and echoes it in the output, so a
/// per-dungeon share can never be confused with a global one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scope {
    /// Every record handed to the view.
    Global,
    /// All records for one equipment slot.
    Slot { slot: String },
    /// All records for one dungeon.
    Dungeon { dungeon: String },
    /// All records for one role.
    Role { role: Role },
    /// All records for one role inside one dungeon.
    DungeonRole { dungeon: String, role: Role },
    /// All records for one class specialization.
    Spec {
        class_name: String,
        spec_name: String,
    },
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::Global => write!(f, "global"),
            Scope::Slot { slot } => write!(f, "slot:{}", slot),
            Scope::Dungeon { dungeon } => write!(f, "dungeon:{}", dungeon),
            Scope::Role { role } => write!(f, "role:{}", role),
            Scope::DungeonRole { dungeon, role } => write!(f, "dungeon:{}/role:{}", dungeon, role),
            Scope::Spec {
                class_name,
                spec_name,
            } => write!(f, "spec:{}/{}", class_name, spec_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_str() {
        assert_eq!("tank".parse::<Role>(), Ok(Role::Tank));
        assert_eq!("Healer".parse::<Role>(), Ok(Role::Healer));
        assert_eq!(" DPS ".parse::<Role>(), Ok(Role::Dps));
        assert!("support".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&Role::Healer).unwrap();
        assert_eq!(json, "\"healer\"");

        let role: Role = serde_json::from_str("\"dps\"").unwrap();
        assert_eq!(role, Role::Dps);
    }

    #[test]
    fn test_scope_serialization() {
        let scope = Scope::Dungeon {
            dungeon: "The Stonevault".to_string(),
        };
        let json = serde_json::to_value(&scope).unwrap();
        assert_eq!(json["kind"], "dungeon");
        assert_eq!(json["dungeon"], "The Stonevault");

        let global = serde_json::to_value(&Scope::Global).unwrap();
        assert_eq!(global["kind"], "global");
    }

    #[test]
    fn test_scope_display() {
        assert_eq!(Scope::Global.to_string(), "global");
        assert_eq!(
            Scope::DungeonRole {
                dungeon: "Ara-Kara".to_string(),
                role: Role::Tank
            }
            .to_string(),
            "dungeon:Ara-Kara/role:tank"
        );
    }
}
