use serde::{Deserialize, Serialize};
use std::fmt;

use crate::group::{GroupId, Slot};
use crate::rules::Violation;

/// Why a group was passed over for a drawn team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectReason {
    /// The group already holds as many teams as the pool number
    Full { capacity: usize },
    /// The confederation rule forbids the placement
    Confederation(Violation),
    /// Placing the team here would strand a remaining team of the pool
    DeadEnd,
}

/// Audit trail of a draw, in the order things happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DrawEvent {
    PoolStarted {
        pool: u8,
    },
    HostPlaced {
        team: String,
        slot: Slot,
    },
    TeamDrawn {
        team: String,
        pool: u8,
    },
    GroupConsidered {
        team: String,
        group: GroupId,
    },
    GroupRejected {
        team: String,
        group: GroupId,
        reason: RejectReason,
    },
    GroupAccepted {
        team: String,
        group: GroupId,
    },
    TeamPlaced {
        team: String,
        slot: Slot,
    },
    PoolCompleted {
        pool: u8,
    },
    DrawFailed {
        team: String,
    },
    DrawFinished,
}

impl fmt::Display for DrawEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawEvent::PoolStarted { pool } => write!(f, "--- pool {} ---", pool),
            DrawEvent::HostPlaced { team, slot } => write!(f, "HOST: {} -> {}", team, slot),
            DrawEvent::TeamDrawn { team, pool } => write!(f, "drawn from pool {}: {}", pool, team),
            DrawEvent::GroupConsidered { team, group } => {
                write!(f, "considering group {} for {}", group, team)
            }
            DrawEvent::GroupRejected {
                team,
                group,
                reason,
            } => match reason {
                RejectReason::Full { capacity } => {
                    write!(f, "group {} rejected for {}: full at {}", group, team, capacity)
                }
                RejectReason::Confederation(v) => write!(
                    f,
                    "group {} rejected for {}: {} {}/{}",
                    group, team, v.confederation, v.present, v.limit
                ),
                RejectReason::DeadEnd => {
                    write!(f, "group {} rejected for {}: dead end", group, team)
                }
            },
            DrawEvent::GroupAccepted { team, group } => {
                write!(f, "group {} accepted for {}", group, team)
            }
            DrawEvent::TeamPlaced { team, slot } => write!(f, "{} -> {}", team, slot),
            DrawEvent::PoolCompleted { pool } => write!(f, "pool {} complete", pool),
            DrawEvent::DrawFailed { team } => write!(f, "no valid group for {}", team),
            DrawEvent::DrawFinished => write!(f, "--- draw finished ---"),
        }
    }
}
