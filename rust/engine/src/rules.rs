use serde::{Deserialize, Serialize};

use crate::group::GroupId;
use crate::team::{Confederation, Team};

/// Why a confederation rule rejects a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Confederation of the team being placed
    pub confederation: Confederation,
    /// Teams of that confederation already in the group
    pub present: usize,
    /// Maximum allowed per group for that confederation
    pub limit: usize,
}

/// Confederation distribution rule for a single group.
///
/// Every confederation may appear at most once per group, except the
/// distinguished one which may appear up to `distinguished_limit` times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfederationRule {
    pub distinguished: Confederation,
    pub distinguished_limit: usize,
}

impl Default for ConfederationRule {
    fn default() -> Self {
        Self {
            distinguished: Confederation::Uefa,
            distinguished_limit: 2,
        }
    }
}

impl ConfederationRule {
    pub fn limit_for(&self, confederation: Confederation) -> usize {
        if confederation == self.distinguished {
            self.distinguished_limit
        } else {
            1
        }
    }

    /// Checks a team of `confederation` against the confederations already in a group.
    ///
    /// # Examples
    ///
    /// ```
    /// use groupdraw_engine::rules::ConfederationRule;
    /// use groupdraw_engine::team::Confederation;
    ///
    /// let rule = ConfederationRule::default();
    /// let group = [Confederation::Uefa, Confederation::Caf];
    ///
    /// // A second UEFA team is fine, a second CAF team is not
    /// assert!(rule.violation(&group, Confederation::Uefa).is_none());
    /// let v = rule.violation(&group, Confederation::Caf).unwrap();
    /// assert_eq!((v.present, v.limit), (1, 1));
    /// ```
    pub fn violation(
        &self,
        present: &[Confederation],
        confederation: Confederation,
    ) -> Option<Violation> {
        let count = present.iter().filter(|&&c| c == confederation).count();
        let limit = self.limit_for(confederation);
        (count >= limit).then_some(Violation {
            confederation,
            present: count,
            limit,
        })
    }

    pub fn allows(&self, present: &[Confederation], confederation: Confederation) -> bool {
        self.violation(present, confederation).is_none()
    }

    /// Is placing `team` into `group` legal given the confederations per group.
    pub fn is_legal(&self, group: GroupId, team: &Team, groups: &[Vec<Confederation>]) -> bool {
        groups
            .get(group.index())
            .is_some_and(|present| self.allows(present, team.confederation))
    }
}
