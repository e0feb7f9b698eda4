//! Plain-text rendering of groups and pools for terminal output.
//!
//! ## Example
//!
//! ```rust
//! use groupdraw_engine::pool::PoolTable;
//! use groupdraw_engine::team::{Confederation, Team};
//! use groupdraw_cli::formatters::format_pool_line;
//!
//! let teams = vec![Team::host("MEX", Confederation::Concacaf), Team::new("ESP", Confederation::Uefa, 1)];
//! let refs: Vec<&Team> = teams.iter().collect();
//! assert_eq!(format_pool_line(1, &refs), "Pool 1: MEX*, ESP");
//! ```

use groupdraw_engine::pool::PoolTable;
use groupdraw_engine::record::{DrawRecord, GroupRecord};
use groupdraw_engine::state::Assignment;
use groupdraw_engine::team::Team;

/// One team in a group listing: `A1  MEX  CONCACAF   pool 1`
pub fn format_assignment(a: &Assignment) -> String {
    format!(
        "{:<4}{:<5}{:<10}pool {}",
        a.slot.to_string(),
        a.team,
        a.confederation.as_str(),
        a.pool
    )
}

pub fn format_group(group: &GroupRecord) -> String {
    let mut lines = vec![format!("Group {}", group.group)];
    lines.extend(group.teams.iter().map(|a| format!("  {}", format_assignment(a))));
    lines.join("\n")
}

/// Every group followed by a one-line summary.
pub fn format_draw(record: &DrawRecord) -> String {
    let mut blocks: Vec<String> = record.groups.iter().map(format_group).collect();
    let seed = record
        .seed
        .map(|s| s.to_string())
        .unwrap_or_else(|| "-".to_string());
    blocks.push(format!(
        "Draw {} (seed={}, lookahead={}, attempts={})",
        record.draw_id, seed, record.lookahead, record.attempts
    ));
    blocks.join("\n\n")
}

/// Hosts are marked with `*`.
pub fn format_pool_line(pool: u8, teams: &[&Team]) -> String {
    let codes: Vec<String> = teams
        .iter()
        .map(|t| {
            if t.host {
                format!("{}*", t.code)
            } else {
                t.code.clone()
            }
        })
        .collect();
    format!("Pool {}: {}", pool, codes.join(", "))
}

pub fn format_pool_table(table: &PoolTable) -> String {
    (1..=4u8)
        .map(|n| format_pool_line(n, &table.pool(n)))
        .collect::<Vec<_>>()
        .join("\n")
}
