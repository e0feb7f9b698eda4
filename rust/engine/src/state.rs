use serde::{Deserialize, Serialize};

use crate::errors::DrawError;
use crate::group::{all_groups, group_slots, GroupId, Slot, GROUP_COUNT};
use crate::team::{Confederation, Team};

/// A team bound to a slot. Never changes once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    pub team: String,
    pub confederation: Confederation,
    pub pool: u8,
    pub slot: Slot,
}

impl Assignment {
    pub fn new(team: &Team, slot: Slot) -> Self {
        Self {
            team: team.code.clone(),
            confederation: team.confederation,
            pool: team.pool,
            slot,
        }
    }

    pub fn group(&self) -> GroupId {
        self.slot.group
    }
}

/// Group roster, free slots and assignments of one draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawState {
    /// Teams per group in placement order
    groups: Vec<Vec<Assignment>>,
    /// Free slots per group in position order
    free: Vec<Vec<Slot>>,
    /// Every assignment in placement order
    order: Vec<Assignment>,
}

impl Default for DrawState {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawState {
    pub fn new() -> Self {
        Self {
            groups: vec![Vec::new(); GROUP_COUNT],
            free: all_groups().map(group_slots).collect(),
            order: Vec::new(),
        }
    }

    pub fn group(&self, group: GroupId) -> &[Assignment] {
        &self.groups[group.index()]
    }

    pub fn count(&self, group: GroupId) -> usize {
        self.groups[group.index()].len()
    }

    pub fn free_slots(&self, group: GroupId) -> &[Slot] {
        &self.free[group.index()]
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.order
    }

    pub fn assignment(&self, team: &str) -> Option<&Assignment> {
        self.order.iter().find(|a| a.team == team)
    }

    pub fn is_assigned(&self, team: &str) -> bool {
        self.assignment(team).is_some()
    }

    /// Confederations present in each group, indexed by group.
    pub fn confederation_table(&self) -> Vec<Vec<Confederation>> {
        self.groups
            .iter()
            .map(|g| g.iter().map(|a| a.confederation).collect())
            .collect()
    }

    /// Every group holds exactly `n` teams.
    pub fn is_level(&self, n: usize) -> bool {
        self.groups.iter().all(|g| g.len() == n)
    }

    /// Records `team` in `slot`, consuming the slot.
    pub fn place(&mut self, team: &Team, slot: Slot) -> Result<Assignment, DrawError> {
        if self.is_assigned(&team.code) {
            return Err(DrawError::AlreadyAssigned {
                team: team.code.clone(),
            });
        }
        let free = &mut self.free[slot.group.index()];
        let idx = free
            .iter()
            .position(|s| *s == slot)
            .ok_or(DrawError::SlotTaken { slot })?;
        free.remove(idx);

        let assignment = Assignment::new(team, slot);
        self.groups[slot.group.index()].push(assignment.clone());
        self.order.push(assignment.clone());
        Ok(assignment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::team::Confederation as C;

    fn gid(c: char) -> GroupId {
        GroupId::from_letter(c).unwrap()
    }

    #[test]
    fn fresh_state_has_all_slots_free() {
        let s = DrawState::new();
        for g in all_groups() {
            assert_eq!(s.free_slots(g).len(), 4);
            assert_eq!(s.count(g), 0);
        }
        assert!(s.is_level(0));
        assert!(s.assignments().is_empty());
    }

    #[test]
    fn place_consumes_slot_and_records_team() {
        let mut s = DrawState::new();
        let team = Team::new("JPN", C::Afc, 2);
        let slot = Slot::new(gid('F'), 3);
        let a = s.place(&team, slot).unwrap();
        assert_eq!(a.slot, slot);
        assert_eq!(s.free_slots(gid('F')).len(), 3);
        assert!(!s.free_slots(gid('F')).contains(&slot));
        assert_eq!(s.assignment("JPN"), Some(&a));
        assert_eq!(s.confederation_table()[gid('F').index()], vec![C::Afc]);
    }

    #[test]
    fn slot_cannot_be_used_twice() {
        let mut s = DrawState::new();
        let slot = Slot::new(gid('A'), 2);
        s.place(&Team::new("JPN", C::Afc, 2), slot).unwrap();
        assert_eq!(
            s.place(&Team::new("KOR", C::Afc, 2), slot),
            Err(DrawError::SlotTaken { slot })
        );
    }

    #[test]
    fn team_cannot_be_placed_twice() {
        let mut s = DrawState::new();
        let team = Team::new("JPN", C::Afc, 2);
        s.place(&team, Slot::new(gid('A'), 2)).unwrap();
        assert!(matches!(
            s.place(&team, Slot::new(gid('B'), 2)),
            Err(DrawError::AlreadyAssigned { .. })
        ));
    }
}
