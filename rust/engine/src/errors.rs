use thiserror::Error;

use crate::group::{GroupId, Slot};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DrawError {
    #[error("No valid group for {team}")]
    NoValidGroup { team: String },
    #[error("Invalid pool data: {0}")]
    InvalidPoolData(#[from] PoolDataError),
    #[error("Pool {requested} requested while pool {expected} is due")]
    OutOfOrder { expected: u8, requested: u8 },
    #[error("Unknown team: {team}")]
    UnknownTeam { team: String },
    #[error("Team {team} is not waiting in pool {pool}")]
    TeamNotInPool { team: String, pool: u8 },
    #[error("Group {group} has no free slot")]
    NoFreeSlot { group: GroupId },
    #[error("Slot {slot} is already taken")]
    SlotTaken { slot: Slot },
    #[error("Team {team} is already assigned")]
    AlreadyAssigned { team: String },
    #[error("Host teams must be placed first")]
    HostsPending,
    #[error("Host teams are already placed")]
    HostsAlreadyPlaced,
    #[error("No team left to draw in pool {pool}")]
    PoolExhausted { pool: u8 },
    #[error("Draw already finished")]
    AlreadyFinished,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PoolDataError {
    #[error("Pool {pool} has {actual} teams, expected {expected}")]
    PoolSize {
        pool: u8,
        expected: usize,
        actual: usize,
    },
    #[error("Team {team} has pool {pool}, expected 1-4")]
    PoolOutOfRange { team: String, pool: u8 },
    #[error("Duplicate team code: {team}")]
    DuplicateTeam { team: String },
    #[error("Team code must not be empty")]
    EmptyCode,
    #[error("Host {team} must be in pool 1")]
    HostOutsidePoolOne { team: String },
    #[error("Host {team} is missing from the pool table")]
    MissingHost { team: String },
    #[error("Team {team} is flagged as host but has no fixed group")]
    UnexpectedHost { team: String },
    #[error("Team {team} has a fixed group but is not flagged as host")]
    HostNotFlagged { team: String },
    #[error("Host group {group} is assigned twice")]
    DuplicateHostGroup { group: GroupId },
    #[error("Playoff bracket {bracket} has no candidates")]
    EmptyBracket { bracket: String },
    #[error("Playoff winner {team} is not a candidate of any bracket")]
    UnknownPlayoffWinner { team: String },
    #[error("Malformed pool data: {0}")]
    Parse(String),
}
