//! Crew assigned to a sector

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils::json::{decode, required};
use crate::Result;

/// A crew member assigned to a flight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewMember {
    /// Airline crew code (also the backend user id)
    pub crew_code: String,
    /// Role code on this sector, e.g. `CDB`, `OPL`, `CC`, `HST`
    pub role: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl CrewMember {
    pub fn from_raw(raw: &Value) -> Result<Self> {
        let dto: CrewMemberDto = decode("CrewMember", raw)?;
        Ok(Self {
            crew_code: required(dto.crew_code, "CrewMember", "crewCode")?,
            role: required(dto.role, "CrewMember", "role")?,
            first_name: dto.first_name,
            last_name: dto.last_name,
        })
    }

    /// "First Last" when both parts are known.
    #[must_use]
    pub fn full_name(&self) -> Option<String> {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(name), None) | (None, Some(name)) => Some(name.clone()),
            (None, None) => None,
        }
    }
}

/// Crew roster keyed by role code
///
/// Members keep the order in which the backend listed them within a role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    members: BTreeMap<String, Vec<CrewMember>>,
}

impl Roster {
    /// Build from the `crewMembers` array of a sector.
    pub fn from_raw(raw: &[Value]) -> Result<Self> {
        raw.iter().map(CrewMember::from_raw).collect::<Result<Vec<_>>>().map(Self::from_members)
    }

    #[must_use]
    pub fn from_members(members: impl IntoIterator<Item = CrewMember>) -> Self {
        let mut roster = Self::default();
        for member in members {
            roster.members.entry(member.role.clone()).or_default().push(member);
        }
        roster
    }

    /// True when nobody holds `role` on this sector.
    #[must_use]
    pub fn is_missing(&self, role: &str) -> bool {
        self.members.get(role).map_or(true, Vec::is_empty)
    }

    #[must_use]
    pub fn members(&self, role: &str) -> &[CrewMember] {
        self.members.get(role).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    /// Total number of assigned crew members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CrewMemberDto {
    crew_code: Option<String>,
    role: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> Vec<Value> {
        vec![
            json!({"crewCode": "ABC", "role": "CDB", "firstName": "Anne", "lastName": "Roux"}),
            json!({"crewCode": "DEF", "role": "CC"}),
            json!({"crewCode": "GHI", "role": "CC"}),
        ]
    }

    #[test]
    fn roster_groups_by_role() {
        let roster = Roster::from_raw(&sample()).unwrap();

        assert_eq!(roster.len(), 3);
        assert_eq!(roster.members("CC").len(), 2);
        assert_eq!(roster.members("CC")[0].crew_code, "DEF");
        assert_eq!(roster.roles().collect::<Vec<_>>(), vec!["CC", "CDB"]);
        assert_eq!(roster.members("CDB")[0].full_name().as_deref(), Some("Anne Roux"));
    }

    #[test]
    fn missing_role_is_reported() {
        let roster = Roster::from_raw(&sample()).unwrap();

        assert!(roster.is_missing("OPL"));
        assert!(!roster.is_missing("CDB"));
        assert!(Roster::default().is_missing("CDB"));
    }

    #[test]
    fn crew_member_without_role_is_a_schema_error() {
        let err = Roster::from_raw(&[json!({"crewCode": "ABC"})]).unwrap_err();
        assert!(err.to_string().contains("`role`"));
    }
}
