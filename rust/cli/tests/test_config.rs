mod helpers;

use groupdraw_cli::config::{self, ValueSource};
use groupdraw_engine::lookahead::LookaheadMode;
use helpers::{run_cli, write_pools};
use serial_test::serial;

const VARS: [&str; 5] = [
    config::ENV_CONFIG,
    config::ENV_SEED,
    config::ENV_LOOKAHEAD,
    config::ENV_MAX_ATTEMPTS,
    config::ENV_POOLS,
];

/// Restores every `GROUPDRAW_*` variable on drop.
struct EnvGuard {
    saved: Vec<(&'static str, Option<String>)>,
}

impl EnvGuard {
    fn clean() -> Self {
        let saved = VARS.iter().map(|k| (*k, std::env::var(k).ok())).collect();
        for k in VARS {
            unsafe { std::env::remove_var(k) };
        }
        Self { saved }
    }

    fn set(&self, key: &str, value: &str) {
        unsafe { std::env::set_var(key, value) };
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (k, v) in &self.saved {
            match v {
                Some(v) => unsafe { std::env::set_var(k, v) },
                None => unsafe { std::env::remove_var(k) },
            }
        }
    }
}

#[test]
#[serial]
fn defaults_without_env() {
    let _env = EnvGuard::clean();
    let resolved = config::load_with_sources().unwrap();
    assert_eq!(resolved.config, config::Config::default());
    assert_eq!(resolved.sources.lookahead, ValueSource::Default);

    let res = run_cli(&["cfg"]);
    assert_eq!(res.code, 0);
    let json: serde_json::Value = serde_json::from_str(&res.stdout).unwrap();
    assert_eq!(json["lookahead"]["value"], "backtracking");
    assert_eq!(json["max_attempts"]["value"], 10);
    assert!(json["seed"]["value"].is_null());
    assert_eq!(json["pools"]["source"], "default");
}

#[test]
#[serial]
fn env_overrides_file() {
    let env = EnvGuard::clean();
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("groupdraw.toml");
    std::fs::write(
        &file,
        "seed = 456\nlookahead = \"greedy\"\nmax_attempts = 4\npools = \"pools.json\"\n",
    )
    .unwrap();
    env.set(config::ENV_CONFIG, file.to_str().unwrap());
    env.set(config::ENV_SEED, "123");
    env.set(config::ENV_MAX_ATTEMPTS, "7");

    let res = run_cli(&["cfg"]);
    assert_eq!(res.code, 0, "stderr: {}", res.stderr);
    let json: serde_json::Value = serde_json::from_str(&res.stdout).unwrap();

    assert_eq!(json["seed"]["value"].as_u64(), Some(123));
    assert_eq!(json["seed"]["source"], "env");
    assert_eq!(json["lookahead"]["value"], "greedy");
    assert_eq!(json["lookahead"]["source"], "file");
    assert_eq!(json["max_attempts"]["value"].as_u64(), Some(7));
    assert_eq!(json["max_attempts"]["source"], "env");
    assert_eq!(json["pools"]["value"], "pools.json");
    assert_eq!(json["pools"]["source"], "file");
}

#[test]
#[serial]
fn invalid_values_are_reported() {
    let env = EnvGuard::clean();
    env.set(config::ENV_MAX_ATTEMPTS, "0");
    let res = run_cli(&["cfg"]);
    assert_eq!(res.code, 2);
    assert!(res.stderr.contains("Invalid configuration"));

    env.set(config::ENV_MAX_ATTEMPTS, "3");
    env.set(config::ENV_LOOKAHEAD, "sideways");
    let e = config::load().unwrap_err();
    assert!(e.to_string().contains("unknown lookahead mode: sideways"));

    env.set(config::ENV_LOOKAHEAD, "greedy");
    env.set(config::ENV_SEED, "abc");
    assert!(config::load().is_err());
}

#[test]
#[serial]
fn draw_takes_settings_from_env_and_flags_win() {
    let env = EnvGuard::clean();
    let dir = tempfile::tempdir().unwrap();
    let pools = write_pools(dir.path());
    env.set(config::ENV_POOLS, pools.to_str().unwrap());
    env.set(config::ENV_SEED, "21");
    env.set(config::ENV_LOOKAHEAD, "greedy");

    let res = run_cli(&["draw", "--format", "json", "--lookahead", "backtracking"]);
    assert_eq!(res.code, 0, "stderr: {}", res.stderr);
    let rec: groupdraw_engine::record::DrawRecord = serde_json::from_str(&res.stdout).unwrap();
    assert_eq!(rec.seed, Some(21));
    assert_eq!(rec.lookahead, LookaheadMode::Backtracking);
    // Synthetic table, not the bundled one
    assert!(rec.assignments.contains_key("T200"));
}
