//! Validated pool table consumed by the draw.
//!
//! The table is an injected, read-only input: one row per qualified team with its
//! confederation, seeding pool and host flag, plus the fixed groups of the hosts.
//! Validation happens once, before any placement.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::errors::PoolDataError;
use crate::group::{GroupId, GROUP_COUNT, POOL_COUNT};
use crate::team::Team;

/// Fixed group of a host team. Hosts always take slot 1 of their group.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HostPlacement {
    pub team: String,
    pub group: GroupId,
}

/// Host placements of the 2026 tournament: MEX in A, CAN in B, USA in D.
pub fn default_hosts() -> Vec<HostPlacement> {
    [("MEX", 'A'), ("CAN", 'B'), ("USA", 'D')]
        .into_iter()
        .filter_map(|(team, letter)| {
            GroupId::from_letter(letter).map(|group| HostPlacement {
                team: team.to_string(),
                group,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolTable {
    teams: Vec<Team>,
    hosts: Vec<HostPlacement>,
}

/// On-disk shape of a pool table. `hosts` falls back to [`default_hosts`].
#[derive(Debug, Serialize, Deserialize)]
pub struct PoolFile {
    pub teams: Vec<Team>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosts: Option<Vec<HostPlacement>>,
}

impl PoolTable {
    pub fn new(teams: Vec<Team>, hosts: Vec<HostPlacement>) -> Result<Self, PoolDataError> {
        validate(&teams, &hosts)?;
        Ok(Self { teams, hosts })
    }

    pub fn with_default_hosts(teams: Vec<Team>) -> Result<Self, PoolDataError> {
        Self::new(teams, default_hosts())
    }

    pub fn from_json(s: &str) -> Result<Self, PoolDataError> {
        let file: PoolFile =
            serde_json::from_str(s).map_err(|e| PoolDataError::Parse(e.to_string()))?;
        Self::new(file.teams, file.hosts.unwrap_or_else(default_hosts))
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&PoolFile {
            teams: self.teams.clone(),
            hosts: Some(self.hosts.clone()),
        })
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn hosts(&self) -> &[HostPlacement] {
        &self.hosts
    }

    pub fn team(&self, code: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.code == code)
    }

    /// Teams of pool `n` in table order.
    pub fn pool(&self, n: u8) -> Vec<&Team> {
        self.teams.iter().filter(|t| t.pool == n).collect()
    }

    pub fn host_group(&self, code: &str) -> Option<GroupId> {
        self.hosts.iter().find(|h| h.team == code).map(|h| h.group)
    }

    pub fn is_host_group(&self, group: GroupId) -> bool {
        self.hosts.iter().any(|h| h.group == group)
    }
}

fn validate(teams: &[Team], hosts: &[HostPlacement]) -> Result<(), PoolDataError> {
    let mut codes = HashSet::new();
    for t in teams {
        if t.code.trim().is_empty() {
            return Err(PoolDataError::EmptyCode);
        }
        if !(1..=POOL_COUNT).contains(&t.pool) {
            return Err(PoolDataError::PoolOutOfRange {
                team: t.code.clone(),
                pool: t.pool,
            });
        }
        if !codes.insert(t.code.as_str()) {
            return Err(PoolDataError::DuplicateTeam {
                team: t.code.clone(),
            });
        }
    }

    for pool in 1..=POOL_COUNT {
        let actual = teams.iter().filter(|t| t.pool == pool).count();
        if actual != GROUP_COUNT {
            return Err(PoolDataError::PoolSize {
                pool,
                expected: GROUP_COUNT,
                actual,
            });
        }
    }

    let mut host_groups = HashSet::new();
    for h in hosts {
        let team = teams
            .iter()
            .find(|t| t.code == h.team)
            .ok_or_else(|| PoolDataError::MissingHost {
                team: h.team.clone(),
            })?;
        if !team.host {
            return Err(PoolDataError::HostNotFlagged {
                team: team.code.clone(),
            });
        }
        if team.pool != 1 {
            return Err(PoolDataError::HostOutsidePoolOne {
                team: team.code.clone(),
            });
        }
        if !host_groups.insert(h.group) {
            return Err(PoolDataError::DuplicateHostGroup { group: h.group });
        }
    }

    if let Some(t) = teams
        .iter()
        .find(|t| t.host && !hosts.iter().any(|h| h.team == t.code))
    {
        return Err(PoolDataError::UnexpectedHost {
            team: t.code.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::team::Confederation as C;

    fn synthetic_teams() -> Vec<Team> {
        let mut teams = vec![
            Team::host("MEX", C::Concacaf),
            Team::host("CAN", C::Concacaf),
            Team::host("USA", C::Concacaf),
        ];
        for i in 0..9 {
            teams.push(Team::new(&format!("P1{}", i), C::Uefa, 1));
        }
        for pool in 2..=4u8 {
            for i in 0..12 {
                teams.push(Team::new(&format!("P{}{:02}", pool, i), C::Afc, pool));
            }
        }
        teams
    }

    #[test]
    fn accepts_well_formed_table() {
        let table = PoolTable::with_default_hosts(synthetic_teams()).unwrap();
        assert_eq!(table.pool(1).len(), 12);
        assert_eq!(table.host_group("USA").map(|g| g.letter()), Some('D'));
        assert!(table.is_host_group(GroupId::from_letter('B').unwrap()));
        assert!(!table.is_host_group(GroupId::from_letter('C').unwrap()));
    }

    #[test]
    fn rejects_short_pool() {
        let mut teams = synthetic_teams();
        teams.pop();
        let err = PoolTable::with_default_hosts(teams).unwrap_err();
        assert_eq!(
            err,
            PoolDataError::PoolSize {
                pool: 4,
                expected: 12,
                actual: 11
            }
        );
    }

    #[test]
    fn rejects_duplicate_codes() {
        let mut teams = synthetic_teams();
        teams[5].code = "P10".to_string();
        assert!(matches!(
            PoolTable::with_default_hosts(teams),
            Err(PoolDataError::DuplicateTeam { .. })
        ));
    }

    #[test]
    fn rejects_missing_host() {
        let mut teams = synthetic_teams();
        teams[0] = Team::new("ZZZ", C::Uefa, 1);
        assert_eq!(
            PoolTable::with_default_hosts(teams).unwrap_err(),
            PoolDataError::MissingHost {
                team: "MEX".to_string()
            }
        );
    }

    #[test]
    fn rejects_host_outside_pool_one() {
        let mut teams = synthetic_teams();
        teams[2].pool = 2;
        // swap a pool-2 team into pool 1 to keep sizes intact
        teams[12].pool = 1;
        assert_eq!(
            PoolTable::with_default_hosts(teams).unwrap_err(),
            PoolDataError::HostOutsidePoolOne {
                team: "USA".to_string()
            }
        );
    }

    #[test]
    fn rejects_unplaced_host_flag() {
        let mut teams = synthetic_teams();
        teams[3].host = true;
        assert!(matches!(
            PoolTable::with_default_hosts(teams),
            Err(PoolDataError::UnexpectedHost { .. })
        ));
    }

    #[test]
    fn json_round_trip_keeps_hosts() {
        let table = PoolTable::with_default_hosts(synthetic_teams()).unwrap();
        let json = table.to_json_pretty().unwrap();
        let back = PoolTable::from_json(&json).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(
            PoolTable::from_json("{\"teams\": 3}"),
            Err(PoolDataError::Parse(_))
        ));
    }
}
