//! Placement of drawn teams into groups.
//!
//! The engine holds no draw state of its own: it reads and mutates the
//! [`DrawState`] and pending lists owned by the session, draws from the injected
//! random source, and appends to the session's event log.

use rand::Rng;
use tracing::{debug, info, warn};

use crate::errors::DrawError;
use crate::events::{DrawEvent, RejectReason};
use crate::group::{all_groups, GroupId, Slot};
use crate::lookahead::{Lookahead, LookaheadMode};
use crate::pool::HostPlacement;
use crate::rules::ConfederationRule;
use crate::state::{Assignment, DrawState};
use crate::team::{Confederation, Team};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolAssignmentEngine {
    pub lookahead: Lookahead,
}

impl PoolAssignmentEngine {
    pub fn new(lookahead: Lookahead) -> Self {
        Self { lookahead }
    }

    pub fn with_mode(mode: LookaheadMode) -> Self {
        Self::new(Lookahead::new(mode, ConfederationRule::default()))
    }

    pub fn rule(&self) -> &ConfederationRule {
        &self.lookahead.rule
    }

    /// Places a host into slot 1 of its fixed group. No rule check applies.
    pub fn place_host(
        &self,
        state: &mut DrawState,
        team: &Team,
        host: &HostPlacement,
        events: &mut Vec<DrawEvent>,
    ) -> Result<Assignment, DrawError> {
        let assignment = state.place(team, Slot::seed(host.group))?;
        info!(team = %team.code, slot = %assignment.slot, "host placed");
        events.push(DrawEvent::HostPlaced {
            team: team.code.clone(),
            slot: assignment.slot,
        });
        Ok(assignment)
    }

    /// Draws a pool-1 team at random from `pending` and seeds it into `group`.
    pub fn place_seed<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        state: &mut DrawState,
        pending: &mut Vec<Team>,
        group: GroupId,
        events: &mut Vec<DrawEvent>,
    ) -> Result<Assignment, DrawError> {
        if pending.is_empty() {
            return Err(DrawError::PoolExhausted { pool: 1 });
        }
        let team = pending.remove(rng.random_range(0..pending.len()));
        events.push(DrawEvent::TeamDrawn {
            team: team.code.clone(),
            pool: 1,
        });
        self.seed_into(state, &team, group, events)
    }

    /// Seeds a specific pool-1 team into slot 1 of `group`.
    pub fn seed_into(
        &self,
        state: &mut DrawState,
        team: &Team,
        group: GroupId,
        events: &mut Vec<DrawEvent>,
    ) -> Result<Assignment, DrawError> {
        let assignment = state.place(team, Slot::seed(group))?;
        info!(team = %team.code, slot = %assignment.slot, "seed placed");
        events.push(DrawEvent::TeamPlaced {
            team: team.code.clone(),
            slot: assignment.slot,
        });
        Ok(assignment)
    }

    /// Draws a team of pool `pool` at random from `pending` and places it.
    pub fn place_drawn<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        state: &mut DrawState,
        pending: &mut Vec<Team>,
        pool: u8,
        events: &mut Vec<DrawEvent>,
    ) -> Result<Assignment, DrawError> {
        if pending.is_empty() {
            return Err(DrawError::PoolExhausted { pool });
        }
        let team = pending.remove(rng.random_range(0..pending.len()));
        events.push(DrawEvent::TeamDrawn {
            team: team.code.clone(),
            pool,
        });
        self.place_team(rng, state, &team, pending, pool, events)
    }

    /// Places `team` given the teams still waiting in its pool.
    ///
    /// The group is the first, in alphabetical order, that has room for pool
    /// `pool`, accepts the team's confederation and passes the lookahead. The
    /// slot is drawn at random among that group's free slots.
    pub fn place_team<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        state: &mut DrawState,
        team: &Team,
        remaining: &[Team],
        pool: u8,
        events: &mut Vec<DrawEvent>,
    ) -> Result<Assignment, DrawError> {
        let remaining: Vec<Confederation> = remaining.iter().map(|t| t.confederation).collect();
        let group = match self.choose_group(state, team, &remaining, pool, events) {
            Ok(group) => group,
            Err(e) => {
                warn!(team = %team.code, pool, "no valid group");
                events.push(DrawEvent::DrawFailed {
                    team: team.code.clone(),
                });
                return Err(e);
            }
        };

        let free = state.free_slots(group);
        if free.is_empty() {
            return Err(DrawError::NoFreeSlot { group });
        }
        let slot = free[rng.random_range(0..free.len())];
        let assignment = state.place(team, slot)?;
        info!(team = %team.code, slot = %slot, "team placed");
        events.push(DrawEvent::TeamPlaced {
            team: team.code.clone(),
            slot,
        });
        Ok(assignment)
    }

    /// First group accepting `team` among all twelve, scanned alphabetically.
    pub fn choose_group(
        &self,
        state: &DrawState,
        team: &Team,
        remaining: &[Confederation],
        pool: u8,
        events: &mut Vec<DrawEvent>,
    ) -> Result<GroupId, DrawError> {
        self.choose_group_in(all_groups(), state, team, remaining, pool, events)
    }

    /// Same scan as [`choose_group`](Self::choose_group), restricted to
    /// `candidates` in the order given.
    pub fn choose_group_in(
        &self,
        candidates: impl IntoIterator<Item = GroupId>,
        state: &DrawState,
        team: &Team,
        remaining: &[Confederation],
        pool: u8,
        events: &mut Vec<DrawEvent>,
    ) -> Result<GroupId, DrawError> {
        let capacity = usize::from(pool);
        let groups = state.confederation_table();

        for group in candidates {
            events.push(DrawEvent::GroupConsidered {
                team: team.code.clone(),
                group,
            });
            let reason = if state.count(group) >= capacity {
                Some(RejectReason::Full { capacity })
            } else if let Some(v) = self.rule().violation(&groups[group.index()], team.confederation) {
                Some(RejectReason::Confederation(v))
            } else if !self
                .lookahead
                .feasible(group, team.confederation, remaining, &groups, capacity)
            {
                Some(RejectReason::DeadEnd)
            } else {
                None
            };

            match reason {
                Some(reason) => {
                    debug!(team = %team.code, %group, ?reason, "group rejected");
                    events.push(DrawEvent::GroupRejected {
                        team: team.code.clone(),
                        group,
                        reason,
                    });
                }
                None => {
                    debug!(team = %team.code, %group, "group accepted");
                    events.push(DrawEvent::GroupAccepted {
                        team: team.code.clone(),
                        group,
                    });
                    return Ok(group);
                }
            }
        }

        Err(DrawError::NoValidGroup {
            team: team.code.clone(),
        })
    }
}
