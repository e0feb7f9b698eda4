//! Pool table construction from ranking data.
//!
//! Qualified teams are ordered by ranking points. Pool 1 takes the hosts plus the
//! best non-hosts up to twelve, pools 2 and 3 the next twelve each, and pool 4
//! the rest together with one winner per playoff bracket.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::PoolDataError;
use crate::group::GROUP_COUNT;
use crate::pool::{default_hosts, HostPlacement, PoolTable};
use crate::team::{Confederation, Team};

const BUNDLED_2026: &str = include_str!("../data/wc2026.json");

/// A team with its ranking points, before pools are assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTeam {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub confederation: Confederation,
    pub points: f64,
    #[serde(default)]
    pub host: bool,
}

impl RankedTeam {
    fn into_team(self, pool: u8) -> Team {
        Team {
            code: self.code,
            name: self.name,
            confederation: self.confederation,
            pool,
            host: self.host,
        }
    }
}

/// Candidates of one playoff path. Exactly one of them qualifies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayoffBracket {
    pub id: String,
    pub candidates: Vec<RankedTeam>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingData {
    /// Date of the ranking snapshot, informational
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranking_date: Option<String>,
    pub qualified: Vec<RankedTeam>,
    #[serde(default)]
    pub playoffs: Vec<PlayoffBracket>,
}

impl RankingData {
    pub fn from_json(s: &str) -> Result<Self, PoolDataError> {
        serde_json::from_str(s).map_err(|e| PoolDataError::Parse(e.to_string()))
    }

    /// 2026 qualifiers and playoff brackets shipped with the crate.
    pub fn bundled() -> Result<Self, PoolDataError> {
        Self::from_json(BUNDLED_2026)
    }
}

#[derive(Debug, Clone)]
pub struct PoolBuilder {
    hosts: Vec<HostPlacement>,
}

impl Default for PoolBuilder {
    fn default() -> Self {
        Self::new(default_hosts())
    }
}

impl PoolBuilder {
    pub fn new(hosts: Vec<HostPlacement>) -> Self {
        Self { hosts }
    }

    /// Draws one winner per bracket, uniformly, in bracket order.
    pub fn resolve_playoffs<R: Rng + ?Sized>(
        &self,
        data: &RankingData,
        rng: &mut R,
    ) -> Result<Vec<RankedTeam>, PoolDataError> {
        data.playoffs
            .iter()
            .map(|b| {
                if b.candidates.is_empty() {
                    return Err(PoolDataError::EmptyBracket {
                        bracket: b.id.clone(),
                    });
                }
                let winner = b.candidates[rng.random_range(0..b.candidates.len())].clone();
                debug!(bracket = %b.id, team = %winner.code, "playoff resolved");
                Ok(winner)
            })
            .collect()
    }

    /// Looks up known winners by code among all bracket candidates.
    pub fn winners_from_codes(
        &self,
        data: &RankingData,
        codes: &[&str],
    ) -> Result<Vec<RankedTeam>, PoolDataError> {
        codes
            .iter()
            .map(|code| {
                data.playoffs
                    .iter()
                    .flat_map(|b| b.candidates.iter())
                    .find(|c| c.code.eq_ignore_ascii_case(code))
                    .cloned()
                    .ok_or_else(|| PoolDataError::UnknownPlayoffWinner {
                        team: code.to_string(),
                    })
            })
            .collect()
    }

    /// Splits qualified teams into pools by ranking and appends `winners` to pool 4.
    pub fn build(
        &self,
        data: &RankingData,
        winners: Vec<RankedTeam>,
    ) -> Result<PoolTable, PoolDataError> {
        let is_host = |t: &RankedTeam| t.host || self.hosts.iter().any(|h| h.team == t.code);

        let mut ranked: Vec<RankedTeam> = data.qualified.clone();
        ranked.sort_by(|a, b| b.points.total_cmp(&a.points));
        let (hosts, others): (Vec<RankedTeam>, Vec<RankedTeam>) =
            ranked.into_iter().partition(|t| is_host(t));

        let pot1_open = GROUP_COUNT.saturating_sub(hosts.len());
        let mut teams: Vec<Team> = hosts
            .into_iter()
            .map(|t| RankedTeam { host: true, ..t }.into_team(1))
            .collect();
        for (i, t) in others.into_iter().enumerate() {
            let pool = match i {
                i if i < pot1_open => 1,
                i if i < pot1_open + GROUP_COUNT => 2,
                i if i < pot1_open + 2 * GROUP_COUNT => 3,
                _ => 4,
            };
            teams.push(t.into_team(pool));
        }
        teams.extend(winners.into_iter().map(|t| RankedTeam { host: false, ..t }.into_team(4)));

        PoolTable::new(teams, self.hosts.clone())
    }
}

/// Pool table of the bundled 2026 data with playoff winners drawn from `rng`.
pub fn bundled_pool_table<R: Rng + ?Sized>(rng: &mut R) -> Result<PoolTable, PoolDataError> {
    let data = RankingData::bundled()?;
    let builder = PoolBuilder::default();
    let winners = builder.resolve_playoffs(&data, rng)?;
    builder.build(&data, winners)
}
