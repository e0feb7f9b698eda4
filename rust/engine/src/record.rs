use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::group::{all_groups, GroupId, Slot, GROUP_COUNT, POOL_COUNT, SLOTS_PER_GROUP};
use crate::lookahead::LookaheadMode;
use crate::pool::{default_hosts, HostPlacement};
use crate::rules::ConfederationRule;
use crate::session::DrawSession;
use crate::state::Assignment;
use crate::team::all_confederations;

/// Final content of one group, ordered by slot position.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub group: GroupId,
    pub teams: Vec<Assignment>,
}

/// Complete record of a finished draw.
/// Serialized to JSONL format, one draw per line.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct DrawRecord {
    /// Unique identifier for this draw (format: YYYYMMDD-NNNNNN)
    pub draw_id: String,
    /// RNG seed of the successful attempt
    pub seed: Option<u64>,
    pub lookahead: LookaheadMode,
    /// Sessions started before this one completed, including it
    #[serde(default = "default_attempts")]
    pub attempts: u32,
    /// Fixed host groups of the pool table the draw ran on
    #[serde(default = "default_hosts")]
    pub hosts: Vec<HostPlacement>,
    pub groups: Vec<GroupRecord>,
    /// team code -> slot
    pub assignments: BTreeMap<String, Slot>,
    /// Timestamp when the draw was made (RFC3339 format)
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
}

fn default_attempts() -> u32 {
    1
}

pub fn format_draw_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

impl DrawRecord {
    pub fn from_session<R>(
        draw_id: String,
        seed: Option<u64>,
        attempts: u32,
        session: &DrawSession<R>,
    ) -> Self
    where
        R: rand::Rng,
    {
        let groups = all_groups()
            .map(|g| {
                let mut teams = session.group(g).to_vec();
                teams.sort_by_key(|a| a.slot.position);
                GroupRecord { group: g, teams }
            })
            .collect();
        Self {
            draw_id,
            seed,
            lookahead: session.engine().lookahead.mode,
            attempts,
            hosts: session.table().hosts().to_vec(),
            groups,
            assignments: session.assignment_map(),
            ts: None,
            meta: None,
        }
    }

    /// Every broken draw invariant, as readable messages. Empty when the record is valid.
    ///
    /// Hosts are checked against the placements stored in the record.
    pub fn violations(&self, rule: &ConfederationRule) -> Vec<String> {
        let mut out = Vec::new();

        if self.groups.len() != GROUP_COUNT {
            out.push(format!(
                "expected {} groups, found {}",
                GROUP_COUNT,
                self.groups.len()
            ));
        }

        let mut seen_groups = HashSet::new();
        let mut seen_teams = HashSet::new();
        let mut seen_slots = HashSet::new();
        for g in &self.groups {
            if !seen_groups.insert(g.group) {
                out.push(format!("group {} listed twice", g.group));
            }
            if g.teams.len() != usize::from(SLOTS_PER_GROUP) {
                out.push(format!("group {} has {} teams", g.group, g.teams.len()));
            }
            for a in &g.teams {
                if a.slot.group != g.group {
                    out.push(format!("{} in group {} holds slot {}", a.team, g.group, a.slot));
                }
                if !seen_teams.insert(a.team.as_str()) {
                    out.push(format!("{} assigned more than once", a.team));
                }
                if !seen_slots.insert(a.slot) {
                    out.push(format!("slot {} used more than once", a.slot));
                }
                if self.assignments.get(&a.team) != Some(&a.slot) {
                    out.push(format!("assignment map disagrees on {}", a.team));
                }
            }
            for pool in 1..=POOL_COUNT {
                let n = g.teams.iter().filter(|a| a.pool == pool).count();
                if n != 1 {
                    out.push(format!("group {} has {} teams from pool {}", g.group, n, pool));
                }
            }
            if let Some(seed) = g.teams.iter().find(|a| a.pool == 1) {
                if seed.slot.position != 1 {
                    out.push(format!("seed {} not in slot 1 of group {}", seed.team, g.group));
                }
            }
            for c in all_confederations() {
                let n = g.teams.iter().filter(|a| a.confederation == c).count();
                let limit = rule.limit_for(c);
                if n > limit {
                    out.push(format!("group {} has {} {} teams (max {})", g.group, n, c, limit));
                }
            }
        }
        if self.assignments.len() != seen_teams.len() {
            out.push(format!(
                "assignment map lists {} teams, groups hold {}",
                self.assignments.len(),
                seen_teams.len()
            ));
        }

        for h in &self.hosts {
            let expected = Slot::seed(h.group);
            match self.assignments.get(&h.team) {
                Some(slot) if *slot == expected => {}
                Some(slot) => out.push(format!("host {} in {}, expected {}", h.team, slot, expected)),
                None => out.push(format!("host {} missing", h.team)),
            }
        }
        out
    }
}

/// Appends draw records to a JSONL file.
pub struct DrawLogger {
    writer: Option<BufWriter<File>>,
    date: String,
    seq: u32,
}

impl DrawLogger {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = File::create(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
            date: Utc::now().format("%Y%m%d").to_string(),
            seq: 0,
        })
    }

    /// Logger that numbers draws but writes nothing.
    pub fn with_seq_for_test(date: &str) -> Self {
        Self {
            writer: None,
            date: date.to_string(),
            seq: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_draw_id(&self.date, self.seq)
    }

    pub fn write(&mut self, record: &DrawRecord) -> std::io::Result<()> {
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }
}
