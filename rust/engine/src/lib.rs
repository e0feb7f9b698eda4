//! # groupdraw-engine: Tournament Group Draw Core
//!
//! Simulates the group-stage draw of a 48-team tournament: 12 groups of 4,
//! teams drawn from 4 seeding pools, hosts in fixed groups, and a confederation
//! rule that keeps teams of the same confederation apart (UEFA may place two per
//! group). A lookahead keeps every draw from running into a team with no legal
//! group left in its pool.
//!
//! ## Core Modules
//!
//! - [`team`] - Teams and confederations
//! - [`group`] - Group letters, slots and tournament shape
//! - [`pool`] - Validated pool table, host placements
//! - [`rules`] - Confederation distribution rule
//! - [`lookahead`] - Dead-end prevention (exact backtracking or greedy)
//! - [`assignment`] - Group selection and placement of drawn teams
//! - [`state`] - Group rosters, free slots and assignments
//! - [`session`] - One draw run with step, pool and full-run APIs
//! - [`controller`] - Playback state machine for animated front-ends
//! - [`events`] - Audit trail of every draw decision
//! - [`seeding`] - Pool table construction from ranking data
//! - [`record`] - Draw records and the JSONL draw logger
//! - [`errors`] - Error types for the draw and pool data
//!
//! ## Quick Start
//!
//! ```rust
//! use groupdraw_engine::assignment::PoolAssignmentEngine;
//! use groupdraw_engine::seeding::bundled_pool_table;
//! use groupdraw_engine::session::DrawSession;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let table = bundled_pool_table(&mut ChaCha20Rng::seed_from_u64(7)).unwrap();
//! let mut session = DrawSession::new_with_seed(table, PoolAssignmentEngine::default(), 7);
//!
//! // Pool 1 never fails: hosts are fixed and seeds take one group each
//! session.assign_pool_n(1).unwrap();
//! assert_eq!(session.assignment_map()["MEX"].to_string(), "A1");
//! assert!(session.state().is_level(1));
//! ```
//!
//! ## Deterministic Draws
//!
//! The same seed reproduces the same draw, including a failure:
//!
//! ```rust
//! use groupdraw_engine::assignment::PoolAssignmentEngine;
//! use groupdraw_engine::seeding::bundled_pool_table;
//! use groupdraw_engine::session::DrawSession;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let run = |seed| {
//!     let table = bundled_pool_table(&mut ChaCha20Rng::seed_from_u64(seed)).unwrap();
//!     let mut s = DrawSession::new_with_seed(table, PoolAssignmentEngine::default(), seed);
//!     let outcome = s.run_to_completion();
//!     (outcome, s.assignment_map())
//! };
//! assert_eq!(run(42), run(42));
//! ```

pub mod assignment;
pub mod controller;
pub mod errors;
pub mod events;
pub mod group;
pub mod lookahead;
pub mod pool;
pub mod record;
pub mod rules;
pub mod seeding;
pub mod session;
pub mod state;
pub mod team;
