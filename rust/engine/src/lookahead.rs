//! Dead-end prevention for the pool draw.
//!
//! Before a drawn team is committed to a group, the lookahead simulates that
//! placement and asks whether the teams still waiting in the same pool can all be
//! seated afterwards. Two strategies are available:
//!
//! - [`LookaheadMode::Backtracking`] searches for a complete placement of every
//!   remaining team. This is exact and the default.
//! - [`LookaheadMode::Greedy`] only checks that each remaining team, on its own,
//!   still has some legal group. It is fast but approximate: it accepts
//!   placements after which two teams compete for the same last group, so a draw
//!   using it can still end with [`crate::errors::DrawError::NoValidGroup`]. Its
//!   check is a necessary condition of the exact one, so it never rejects a
//!   placement the exhaustive search would accept.
//!
//! Both operate on a copy of the confederation table; real state is never touched.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::group::GroupId;
use crate::rules::ConfederationRule;
use crate::team::{all_confederations, Confederation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookaheadMode {
    /// Exhaustive search over the remaining teams of the pool
    #[default]
    Backtracking,
    /// One-ply feasibility per remaining team; fast, approximate
    Greedy,
}

impl LookaheadMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookaheadMode::Backtracking => "backtracking",
            LookaheadMode::Greedy => "greedy",
        }
    }
}

impl fmt::Display for LookaheadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LookaheadMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "backtracking" | "full" | "exact" => Ok(LookaheadMode::Backtracking),
            "greedy" | "fast" => Ok(LookaheadMode::Greedy),
            other => Err(format!("unknown lookahead mode: {}", other)),
        }
    }
}

/// Size and confederation make-up of a group. Two groups with the same shape are
/// interchangeable for every remaining placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GroupShape {
    len: usize,
    counts: [u8; 6],
}

impl GroupShape {
    fn of(group: &[Confederation]) -> Self {
        let mut counts = [0u8; 6];
        for c in group {
            counts[c.index()] += 1;
        }
        Self {
            len: group.len(),
            counts,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lookahead {
    pub mode: LookaheadMode,
    pub rule: ConfederationRule,
}

impl Lookahead {
    pub fn new(mode: LookaheadMode, rule: ConfederationRule) -> Self {
        Self { mode, rule }
    }

    /// Whether placing `candidate` into `target` still lets every team in
    /// `remaining` find a group that holds fewer than `capacity` teams and
    /// satisfies the confederation rule.
    ///
    /// # Examples
    ///
    /// ```
    /// use groupdraw_engine::group::GroupId;
    /// use groupdraw_engine::lookahead::{Lookahead, LookaheadMode};
    /// use groupdraw_engine::rules::ConfederationRule;
    /// use groupdraw_engine::team::Confederation::{Afc, Caf, Uefa};
    ///
    /// // Three groups at pool 2: two already hold an African team.
    /// let groups = vec![vec![Caf], vec![Caf], vec![Uefa]];
    /// let remaining = [Caf, Caf];
    /// let a = GroupId::from_letter('A').unwrap();
    ///
    /// let exact = Lookahead::new(LookaheadMode::Backtracking, ConfederationRule::default());
    /// let greedy = Lookahead::new(LookaheadMode::Greedy, ConfederationRule::default());
    ///
    /// // Both remaining CAF teams need group C: only the exact search notices.
    /// assert!(!exact.feasible(a, Afc, &remaining, &groups, 2));
    /// assert!(greedy.feasible(a, Afc, &remaining, &groups, 2));
    /// ```
    pub fn feasible(
        &self,
        target: GroupId,
        candidate: Confederation,
        remaining: &[Confederation],
        groups: &[Vec<Confederation>],
        capacity: usize,
    ) -> bool {
        let mut sim: Vec<Vec<Confederation>> = groups.to_vec();
        match sim.get_mut(target.index()) {
            Some(g) => g.push(candidate),
            None => return false,
        }
        match self.mode {
            LookaheadMode::Greedy => self.each_has_option(remaining, &sim, capacity),
            LookaheadMode::Backtracking => self.place_all(remaining, &mut sim, capacity),
        }
    }

    fn eligible(&self, group: &[Confederation], c: Confederation, capacity: usize) -> bool {
        group.len() < capacity && self.rule.allows(group, c)
    }

    fn each_has_option(
        &self,
        remaining: &[Confederation],
        groups: &[Vec<Confederation>],
        capacity: usize,
    ) -> bool {
        remaining
            .iter()
            .all(|&c| groups.iter().any(|g| self.eligible(g, c, capacity)))
    }

    /// Counting bounds every complete placement must satisfy: enough free seats
    /// overall, and per confederation enough seats that still admit it.
    fn bounds_hold(
        &self,
        remaining: &[Confederation],
        groups: &[Vec<Confederation>],
        capacity: usize,
    ) -> bool {
        let free: usize = groups
            .iter()
            .map(|g| capacity.saturating_sub(g.len()))
            .sum();
        if remaining.len() > free {
            return false;
        }
        let mut needed = [0usize; 6];
        for c in remaining {
            needed[c.index()] += 1;
        }
        all_confederations().into_iter().all(|c| {
            let n = needed[c.index()];
            if n == 0 {
                return true;
            }
            let limit = self.rule.limit_for(c);
            let room: usize = groups
                .iter()
                .map(|g| {
                    let present = g.iter().filter(|&&x| x == c).count();
                    capacity
                        .saturating_sub(g.len())
                        .min(limit.saturating_sub(present))
                })
                .sum();
            n <= room
        })
    }

    fn place_all(
        &self,
        remaining: &[Confederation],
        groups: &mut [Vec<Confederation>],
        capacity: usize,
    ) -> bool {
        let Some((&first, rest)) = remaining.split_first() else {
            return true;
        };
        if !self.bounds_hold(remaining, groups, capacity) {
            return false;
        }
        let mut tried: Vec<GroupShape> = Vec::new();
        for i in 0..groups.len() {
            if !self.eligible(&groups[i], first, capacity) {
                continue;
            }
            let shape = GroupShape::of(&groups[i]);
            if tried.contains(&shape) {
                continue;
            }
            tried.push(shape);

            groups[i].push(first);
            let ok = self.place_all(rest, groups, capacity);
            groups[i].pop();
            if ok {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::team::Confederation::{self as C, *};

    fn lk(mode: LookaheadMode) -> Lookahead {
        Lookahead::new(mode, ConfederationRule::default())
    }

    fn gid(letter: char) -> GroupId {
        GroupId::from_letter(letter).unwrap()
    }

    /// Naive exhaustive search without pruning, used as an oracle.
    fn oracle(
        rule: &ConfederationRule,
        remaining: &[C],
        groups: &mut Vec<Vec<C>>,
        capacity: usize,
    ) -> bool {
        let Some((&first, rest)) = remaining.split_first() else {
            return true;
        };
        for i in 0..groups.len() {
            if groups[i].len() >= capacity || !rule.allows(&groups[i], first) {
                continue;
            }
            groups[i].push(first);
            let ok = oracle(rule, rest, groups, capacity);
            groups[i].pop();
            if ok {
                return true;
            }
        }
        false
    }

    /// Small deterministic generator so the test does not depend on rand's stream.
    struct Lcg(u64);

    impl Lcg {
        fn next(&mut self, bound: usize) -> usize {
            self.0 = self
                .0
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((self.0 >> 33) as usize) % bound
        }
    }

    #[test]
    fn mode_parses_aliases() {
        assert_eq!("full".parse(), Ok(LookaheadMode::Backtracking));
        assert_eq!("Greedy".parse(), Ok(LookaheadMode::Greedy));
        assert!("random".parse::<LookaheadMode>().is_err());
        assert_eq!(LookaheadMode::default(), LookaheadMode::Backtracking);
    }

    #[test]
    fn does_not_mutate_input_groups() {
        let groups = vec![vec![Uefa], vec![Caf], vec![]];
        let before = groups.clone();
        let _ = lk(LookaheadMode::Backtracking).feasible(gid('A'), Afc, &[Caf, Uefa], &groups, 2);
        let _ = lk(LookaheadMode::Greedy).feasible(gid('A'), Afc, &[Caf, Uefa], &groups, 2);
        assert_eq!(groups, before);
    }

    #[test]
    fn empty_remaining_is_always_feasible() {
        let groups = vec![vec![Uefa]];
        assert!(lk(LookaheadMode::Backtracking).feasible(gid('A'), Caf, &[], &groups, 2));
        assert!(lk(LookaheadMode::Greedy).feasible(gid('A'), Caf, &[], &groups, 2));
    }

    #[test]
    fn capacity_excludes_full_groups() {
        // Group A becomes full at capacity 2, B is full already: nowhere for the last team.
        let groups = vec![vec![Uefa], vec![Caf, Afc]];
        for mode in [LookaheadMode::Backtracking, LookaheadMode::Greedy] {
            assert!(!lk(mode).feasible(gid('A'), Conmebol, &[Ofc], &groups, 2));
        }
        // With a larger capacity B can take it.
        assert!(lk(LookaheadMode::Backtracking).feasible(gid('A'), Conmebol, &[Ofc], &groups, 3));
    }

    #[test]
    fn candidate_counts_against_the_target_group() {
        // After CAF lands in A, the remaining CAF team can only use B.
        let groups = vec![vec![Uefa], vec![Uefa]];
        assert!(lk(LookaheadMode::Backtracking).feasible(gid('A'), Caf, &[Caf], &groups, 2));
        let groups = vec![vec![Uefa], vec![Caf]];
        assert!(!lk(LookaheadMode::Backtracking).feasible(gid('A'), Caf, &[Caf], &groups, 2));
    }

    #[test]
    fn greedy_misses_competition_for_a_scarce_group() {
        let groups = vec![vec![Caf], vec![Caf], vec![Uefa]];
        assert!(lk(LookaheadMode::Greedy).feasible(gid('A'), Afc, &[Caf, Caf], &groups, 2));
        assert!(!lk(LookaheadMode::Backtracking).feasible(gid('A'), Afc, &[Caf, Caf], &groups, 2));
    }

    #[test]
    fn backtracking_recovers_from_a_bad_first_choice() {
        // In input order the first remaining UEFA team would take B first; the
        // CONMEBOL team then needs B too, so the search must retry UEFA in C.
        let groups = vec![vec![Uefa], vec![Caf], vec![Conmebol]];
        assert!(lk(LookaheadMode::Backtracking).feasible(
            gid('A'),
            Afc,
            &[Uefa, Conmebol],
            &groups,
            2
        ));
    }

    #[test]
    fn out_of_range_target_is_infeasible() {
        let groups = vec![vec![]];
        assert!(!lk(LookaheadMode::Backtracking).feasible(gid('L'), Uefa, &[], &groups, 2));
    }

    #[test]
    fn backtracking_agrees_with_brute_force_oracle() {
        let all = crate::team::all_confederations();
        let rule = ConfederationRule::default();
        let exact = lk(LookaheadMode::Backtracking);
        let greedy = lk(LookaheadMode::Greedy);
        let mut rng = Lcg(0x5eed);
        let mut disagreements = 0;

        for _ in 0..400 {
            let n_groups = 3 + rng.next(4);
            let capacity = 2 + rng.next(2);
            // fill every group up to capacity - 1 with legal placements
            let mut groups: Vec<Vec<C>> = vec![Vec::new(); n_groups];
            for g in groups.iter_mut() {
                while g.len() < capacity - 1 {
                    let c = all[rng.next(3)];
                    if rule.allows(g, c) {
                        g.push(c);
                    } else {
                        g.push(Ofc);
                    }
                }
            }
            let pool: Vec<C> = (0..n_groups).map(|_| all[rng.next(all.len())]).collect();
            let (&candidate, remaining) = pool.split_first().unwrap();

            for t in 0..n_groups {
                if groups[t].len() >= capacity || !rule.allows(&groups[t], candidate) {
                    continue;
                }
                let target = GroupId::from_index(t).unwrap();
                let mut sim = groups.clone();
                sim[t].push(candidate);
                let expected = oracle(&rule, remaining, &mut sim, capacity);

                assert_eq!(
                    exact.feasible(target, candidate, remaining, &groups, capacity),
                    expected,
                    "groups={:?} candidate={:?} remaining={:?} target={}",
                    groups,
                    candidate,
                    remaining,
                    target
                );

                let fast = greedy.feasible(target, candidate, remaining, &groups, capacity);
                // greedy is a relaxation: it may accept more, never less
                if expected {
                    assert!(fast);
                } else if fast {
                    disagreements += 1;
                }
            }
        }
        assert!(disagreements > 0, "expected greedy to over-accept at least once");
    }
}
