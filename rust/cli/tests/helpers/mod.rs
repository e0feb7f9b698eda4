//! Shared fixtures for the CLI integration tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// Output of one `groupdraw_cli::run` call.
pub struct RunResult {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

pub fn run_cli(args: &[&str]) -> RunResult {
    let mut argv = vec!["groupdraw"];
    argv.extend_from_slice(args);
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = groupdraw_cli::run(argv, &mut out, &mut err);
    RunResult {
        code,
        stdout: String::from_utf8_lossy(&out).into_owned(),
        stderr: String::from_utf8_lossy(&err).into_owned(),
    }
}

/// A pool table on which the exact lookahead always completes: hosts, nine
/// seeds from three confederations, an all-CAF pool 2, an AFC pool 3 with one
/// UEFA side for Japan's group, and an all-OFC pool 4.
pub fn feasible_pools_json() -> String {
    let mut teams = vec![
        team("MEX", "CONCACAF", 1, true),
        team("CAN", "CONCACAF", 1, true),
        team("USA", "CONCACAF", 1, true),
    ];
    for (code, conf) in [
        ("ESP", "UEFA"),
        ("ARG", "CONMEBOL"),
        ("FRA", "UEFA"),
        ("ENG", "UEFA"),
        ("BRA", "CONMEBOL"),
        ("POR", "UEFA"),
        ("NED", "UEFA"),
        ("BEL", "UEFA"),
        ("JPN", "AFC"),
    ] {
        teams.push(team(code, conf, 1, false));
    }
    for (pool, conf) in [(2u8, "CAF"), (3, "AFC"), (4, "OFC")] {
        for i in 0..12 {
            let conf = if pool == 3 && i == 0 { "UEFA" } else { conf };
            teams.push(team(&format!("T{}{:02}", pool, i), conf, pool, false));
        }
    }
    serde_json::json!({ "teams": teams }).to_string()
}

fn team(code: &str, conf: &str, pool: u8, host: bool) -> serde_json::Value {
    serde_json::json!({
        "code": code,
        "confederation": conf,
        "pool": pool,
        "host": host,
    })
}

pub fn write_pools(dir: &Path) -> PathBuf {
    let path = dir.join("pools.json");
    std::fs::write(&path, feasible_pools_json()).expect("write pools");
    path
}
