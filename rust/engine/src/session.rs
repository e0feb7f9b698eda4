//! One complete draw run.
//!
//! A [`DrawSession`] owns the group roster, the teams still waiting in the
//! current pool and the event log. It advances one placement at a time
//! ([`DrawSession::step`]), one pool at a time, or straight to the end, and
//! refuses operations requested out of order.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use crate::assignment::PoolAssignmentEngine;
use crate::errors::DrawError;
use crate::events::DrawEvent;
use crate::group::{all_groups, GroupId, Slot, GROUP_COUNT, POOL_COUNT};
use crate::pool::{HostPlacement, PoolTable};
use crate::state::{Assignment, DrawState};
use crate::team::Team;

/// Where the session stands in the pool sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    /// Pool 1, hosts not yet in their groups
    Hosts,
    /// Pool 1, remaining seeds being drawn
    Seeds,
    /// Pools 2 to 4
    Pool { pool: u8 },
    Finished,
    /// Stopped on a team with no valid group
    Failed { team: String },
}

impl Phase {
    pub fn pool(&self) -> Option<u8> {
        match self {
            Phase::Hosts | Phase::Seeds => Some(1),
            Phase::Pool { pool } => Some(*pool),
            Phase::Finished | Phase::Failed { .. } => None,
        }
    }
}

/// Serializable view of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub group: GroupId,
    pub teams: Vec<Assignment>,
    pub free_slots: Vec<Slot>,
}

/// Serializable view of a session at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawSnapshot {
    #[serde(flatten)]
    pub phase: Phase,
    pub current_pool: u8,
    pub finished: bool,
    pub groups: Vec<GroupSnapshot>,
    /// team code -> slot
    pub assignments: BTreeMap<String, Slot>,
    /// Teams of the current pool not yet drawn
    pub pending: Vec<String>,
}

pub struct DrawSession<R = ChaCha20Rng> {
    table: PoolTable,
    engine: PoolAssignmentEngine,
    rng: R,
    state: DrawState,
    phase: Phase,
    /// Hosts not yet placed, in table order
    pending_hosts: Vec<HostPlacement>,
    /// Teams of the current pool not yet drawn, in table order
    pending: Vec<Team>,
    /// Placements made in the current pool
    placed_in_pool: usize,
    pool_started: bool,
    /// Last pool fully placed, 0 before any
    completed_pool: u8,
    events: Vec<DrawEvent>,
}

impl DrawSession<ChaCha20Rng> {
    /// Session drawing from a ChaCha20 stream seeded with `seed`.
    pub fn new_with_seed(table: PoolTable, engine: PoolAssignmentEngine, seed: u64) -> Self {
        Self::new(table, engine, ChaCha20Rng::seed_from_u64(seed))
    }

    /// Session over a pool table given as JSON. A table that fails
    /// validation is refused before any placement.
    pub fn from_json_with_seed(
        json: &str,
        engine: PoolAssignmentEngine,
        seed: u64,
    ) -> Result<Self, DrawError> {
        let table = PoolTable::from_json(json)?;
        Ok(Self::new_with_seed(table, engine, seed))
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha20Rng::seed_from_u64(seed);
    }
}

impl<R: Rng> DrawSession<R> {
    pub fn new(table: PoolTable, engine: PoolAssignmentEngine, rng: R) -> Self {
        let mut session = Self {
            table,
            engine,
            rng,
            state: DrawState::new(),
            phase: Phase::Hosts,
            pending_hosts: Vec::new(),
            pending: Vec::new(),
            placed_in_pool: 0,
            pool_started: false,
            completed_pool: 0,
            events: Vec::new(),
        };
        session.reset();
        session
    }

    /// Back to twelve empty groups at pool 1. The random source keeps its position.
    pub fn reset(&mut self) {
        self.state = DrawState::new();
        self.phase = Phase::Hosts;
        self.pending_hosts = self.table.hosts().to_vec();
        self.pending = self
            .table
            .pool(1)
            .into_iter()
            .filter(|t| !t.host)
            .cloned()
            .collect();
        self.placed_in_pool = 0;
        self.pool_started = false;
        self.completed_pool = 0;
        self.events.clear();
        self.advance_phase();
    }

    pub fn table(&self) -> &PoolTable {
        &self.table
    }

    pub fn engine(&self) -> &PoolAssignmentEngine {
        &self.engine
    }

    pub fn state(&self) -> &DrawState {
        &self.state
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Pool being drawn, or 4 once the draw is over.
    pub fn current_pool(&self) -> u8 {
        self.phase.pool().unwrap_or(POOL_COUNT)
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.phase, Phase::Failed { .. })
    }

    pub fn group(&self, group: GroupId) -> &[Assignment] {
        self.state.group(group)
    }

    pub fn free_slots(&self, group: GroupId) -> &[Slot] {
        self.state.free_slots(group)
    }

    pub fn assignments(&self) -> &[Assignment] {
        self.state.assignments()
    }

    /// team code -> slot
    pub fn assignment_map(&self) -> BTreeMap<String, Slot> {
        self.state
            .assignments()
            .iter()
            .map(|a| (a.team.clone(), a.slot))
            .collect()
    }

    pub fn pending(&self) -> &[Team] {
        &self.pending
    }

    pub fn events(&self) -> &[DrawEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<DrawEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> DrawSnapshot {
        let mut pending: Vec<String> = self.pending_hosts.iter().map(|h| h.team.clone()).collect();
        pending.extend(self.pending.iter().map(|t| t.code.clone()));
        DrawSnapshot {
            phase: self.phase.clone(),
            current_pool: self.current_pool(),
            finished: self.is_finished(),
            groups: all_groups()
                .map(|g| GroupSnapshot {
                    group: g,
                    teams: self.state.group(g).to_vec(),
                    free_slots: self.state.free_slots(g).to_vec(),
                })
                .collect(),
            assignments: self.assignment_map(),
            pending,
        }
    }

    /// Advances by one placement. `Ok(None)` once the draw has finished.
    pub fn step(&mut self) -> Result<Option<Assignment>, DrawError> {
        self.ensure_running()?;
        self.start_pool();

        let placed = match self.phase.clone() {
            Phase::Hosts => self.place_next_host()?,
            Phase::Seeds => self.place_next_seed()?,
            Phase::Pool { pool } => self.place_next_in_pool(pool)?,
            Phase::Finished | Phase::Failed { .. } => return Ok(None),
        };
        self.advance_phase();
        Ok(placed)
    }

    /// Places the three hosts into slot 1 of their fixed groups.
    pub fn assign_hosts(&mut self) -> Result<Vec<Assignment>, DrawError> {
        self.check_pool(1)?;
        if self.phase != Phase::Hosts {
            return Err(DrawError::HostsAlreadyPlaced);
        }
        self.run_while(|phase| *phase == Phase::Hosts)
    }

    /// Draws a seed for every group without a host.
    pub fn assign_pool1_seeds(&mut self) -> Result<Vec<Assignment>, DrawError> {
        self.check_pool(1)?;
        if self.phase == Phase::Hosts {
            return Err(DrawError::HostsPending);
        }
        self.run_while(|phase| *phase == Phase::Seeds)
    }

    /// Runs pool `n` to its end. Pool 1 includes the hosts.
    pub fn assign_pool_n(&mut self, n: u8) -> Result<Vec<Assignment>, DrawError> {
        self.check_pool(n)?;
        self.run_while(|phase| phase.pool() == Some(n))
    }

    /// Runs whatever pool is current to its end.
    pub fn run_pool(&mut self) -> Result<Vec<Assignment>, DrawError> {
        let n = self.current_pool();
        self.assign_pool_n(n)
    }

    pub fn run_to_completion(&mut self) -> Result<(), DrawError> {
        while self.step()?.is_some() {}
        Ok(())
    }

    /// Places a chosen team of the current pool instead of drawing one.
    ///
    /// Hosts go to their fixed group, other pool-1 teams to the first group
    /// still without a seed. Teams of pools 2 to 4 go through the usual group
    /// scan.
    pub fn try_place(&mut self, code: &str, pool: u8) -> Result<Assignment, DrawError> {
        let team = self
            .table
            .team(code)
            .cloned()
            .ok_or_else(|| DrawError::UnknownTeam {
                team: code.to_string(),
            })?;
        if self.state.is_assigned(code) {
            return Err(DrawError::AlreadyAssigned {
                team: code.to_string(),
            });
        }
        if team.pool != pool {
            return Err(DrawError::TeamNotInPool {
                team: code.to_string(),
                pool,
            });
        }
        self.check_pool(pool)?;
        self.start_pool();

        // The team leaves its pending list only once it holds a slot.
        let assignment = match self.phase.clone() {
            Phase::Hosts => {
                let idx = self
                    .pending_hosts
                    .iter()
                    .position(|h| h.team == code)
                    .ok_or(DrawError::HostsPending)?;
                let host = self.pending_hosts[idx].clone();
                let a = self
                    .engine
                    .place_host(&mut self.state, &team, &host, &mut self.events)?;
                self.pending_hosts.remove(idx);
                a
            }
            Phase::Seeds => {
                let group = self.next_seed_group().ok_or_else(|| DrawError::TeamNotInPool {
                    team: code.to_string(),
                    pool,
                })?;
                let idx = self.pending_index(code, pool)?;
                let a = self
                    .engine
                    .seed_into(&mut self.state, &team, group, &mut self.events)?;
                self.pending.remove(idx);
                a
            }
            Phase::Pool { pool } => {
                let idx = self.pending_index(code, pool)?;
                let others: Vec<Team> = self
                    .pending
                    .iter()
                    .filter(|t| t.code != code)
                    .cloned()
                    .collect();
                let result = self.engine.place_team(
                    &mut self.rng,
                    &mut self.state,
                    &team,
                    &others,
                    pool,
                    &mut self.events,
                );
                let a = self.record_failure(result)?;
                self.pending.remove(idx);
                a
            }
            Phase::Finished | Phase::Failed { .. } => return Err(DrawError::AlreadyFinished),
        };
        self.placed_in_pool += 1;
        self.advance_phase();
        Ok(assignment)
    }

    fn run_while(&mut self, mut keep: impl FnMut(&Phase) -> bool) -> Result<Vec<Assignment>, DrawError> {
        let mut placed = Vec::new();
        while keep(&self.phase) {
            match self.step()? {
                Some(a) => placed.push(a),
                None => break,
            }
        }
        Ok(placed)
    }

    fn ensure_running(&self) -> Result<(), DrawError> {
        match &self.phase {
            Phase::Failed { team } => Err(DrawError::NoValidGroup { team: team.clone() }),
            _ => Ok(()),
        }
    }

    fn check_pool(&self, requested: u8) -> Result<(), DrawError> {
        self.ensure_running()?;
        if self.is_finished() {
            return Err(DrawError::AlreadyFinished);
        }
        let expected = self.current_pool();
        if expected != requested {
            return Err(DrawError::OutOfOrder {
                expected,
                requested,
            });
        }
        Ok(())
    }

    fn start_pool(&mut self) {
        if self.pool_started {
            return;
        }
        if let Some(pool) = self.phase.pool() {
            info!(pool, "pool started");
            self.events.push(DrawEvent::PoolStarted { pool });
            self.pool_started = true;
        }
    }

    fn pending_index(&self, code: &str, pool: u8) -> Result<usize, DrawError> {
        self.pending
            .iter()
            .position(|t| t.code == code)
            .ok_or_else(|| DrawError::TeamNotInPool {
                team: code.to_string(),
                pool,
            })
    }

    fn next_seed_group(&self) -> Option<GroupId> {
        all_groups().find(|g| self.state.count(*g) == 0)
    }

    fn place_next_host(&mut self) -> Result<Option<Assignment>, DrawError> {
        if self.pending_hosts.is_empty() {
            return Ok(None);
        }
        let host = self.pending_hosts.remove(0);
        let team = self
            .table
            .team(&host.team)
            .cloned()
            .ok_or_else(|| DrawError::UnknownTeam {
                team: host.team.clone(),
            })?;
        let a = self
            .engine
            .place_host(&mut self.state, &team, &host, &mut self.events)?;
        self.placed_in_pool += 1;
        Ok(Some(a))
    }

    fn place_next_seed(&mut self) -> Result<Option<Assignment>, DrawError> {
        let Some(group) = self.next_seed_group() else {
            return Ok(None);
        };
        let a = self.engine.place_seed(
            &mut self.rng,
            &mut self.state,
            &mut self.pending,
            group,
            &mut self.events,
        )?;
        self.placed_in_pool += 1;
        Ok(Some(a))
    }

    fn place_next_in_pool(&mut self, pool: u8) -> Result<Option<Assignment>, DrawError> {
        if self.pending.is_empty() {
            return Ok(None);
        }
        let result = self.engine.place_drawn(
            &mut self.rng,
            &mut self.state,
            &mut self.pending,
            pool,
            &mut self.events,
        );
        let a = self.record_failure(result)?;
        self.placed_in_pool += 1;
        Ok(Some(a))
    }

    fn record_failure(&mut self, result: Result<Assignment, DrawError>) -> Result<Assignment, DrawError> {
        if let Err(DrawError::NoValidGroup { team }) = &result {
            self.phase = Phase::Failed { team: team.clone() };
        }
        result
    }

    /// Moves to the next phase once the current one has nothing left to place.
    fn advance_phase(&mut self) {
        loop {
            let done = match &self.phase {
                Phase::Hosts => self.pending_hosts.is_empty(),
                Phase::Seeds => self.next_seed_group().is_none() || self.pending.is_empty(),
                Phase::Pool { .. } => self.pending.is_empty() || self.placed_in_pool >= GROUP_COUNT,
                Phase::Finished | Phase::Failed { .. } => return,
            };
            if !done {
                return;
            }
            match self.phase.clone() {
                Phase::Hosts => self.phase = Phase::Seeds,
                Phase::Seeds => self.complete_pool(1),
                Phase::Pool { pool } => self.complete_pool(pool),
                Phase::Finished | Phase::Failed { .. } => return,
            }
        }
    }

    fn complete_pool(&mut self, pool: u8) {
        info!(pool, "pool completed");
        self.events.push(DrawEvent::PoolCompleted { pool });
        self.completed_pool = pool;
        self.placed_in_pool = 0;
        self.pool_started = false;
        if pool >= POOL_COUNT {
            info!("draw finished");
            self.phase = Phase::Finished;
            self.pending.clear();
            self.events.push(DrawEvent::DrawFinished);
        } else {
            let next = pool + 1;
            self.pending = self.table.pool(next).into_iter().cloned().collect();
            self.phase = Phase::Pool { pool: next };
        }
    }

    /// Last pool fully placed, 0 before pool 1 is complete.
    pub fn completed_pool(&self) -> u8 {
        self.completed_pool
    }
}
