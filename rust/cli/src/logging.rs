//! Log setup for the binary and a capture layer for tests.
//!
//! The engine reports scans and placements through `tracing`. The binary
//! installs a `fmt` subscriber on stderr so draw output on stdout stays clean.

use std::marker::PhantomData;
use std::sync::{Arc, Mutex};
use tracing::Level;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber. Verbosity follows `RUST_LOG`, e.g.
/// `RUST_LOG=groupdraw_engine=debug` to trace every group scan.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    // A second init (e.g. embedding the CLI) keeps the first subscriber
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Structured log entry captured by [`TestLogSubscriber`]
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: Level,
    pub target: String,
    pub message: String,
    pub fields: Vec<(String, String)>,
}

/// Subscriber that records log entries for verification
#[derive(Debug, Clone, Default)]
pub struct TestLogSubscriber {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .map(|e| e.clone())
            .unwrap_or_default()
    }

    pub fn into_layer<S>(self) -> TestLayer<S>
    where
        S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    {
        TestLayer {
            subscriber: self,
            _phantom: PhantomData,
        }
    }
}

pub struct TestLayer<S> {
    subscriber: TestLogSubscriber,
    _phantom: PhantomData<S>,
}

impl<S> Layer<S> for TestLayer<S>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let entry = LogEntry {
            level: *metadata.level(),
            target: metadata.target().to_string(),
            message: visitor.message.unwrap_or_default(),
            fields: visitor.fields,
        };

        if let Ok(mut entries) = self.subscriber.entries.lock() {
            entries.push(entry);
        }
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: Vec<(String, String)>,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        let value_str = format!("{:?}", value);
        if field.name() == "message" {
            self.message = Some(value_str);
        } else {
            self.fields.push((field.name().to_string(), value_str));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use groupdraw_engine::assignment::PoolAssignmentEngine;
    use groupdraw_engine::seeding::bundled_pool_table;
    use groupdraw_engine::session::DrawSession;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use tracing_subscriber::Registry;
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn test_engine_placements_are_logged() {
        let subscriber = TestLogSubscriber::new();
        let registry = Registry::default().with(subscriber.clone().into_layer::<Registry>());

        tracing::subscriber::with_default(registry, || {
            let table = bundled_pool_table(&mut ChaCha20Rng::seed_from_u64(3)).unwrap();
            let mut s = DrawSession::new_with_seed(table, PoolAssignmentEngine::default(), 3);
            s.assign_pool_n(1).unwrap();
        });

        let entries = subscriber.entries();
        let hosts: Vec<_> = entries
            .iter()
            .filter(|e| e.message.contains("host placed"))
            .collect();
        assert_eq!(hosts.len(), 3);
        assert_eq!(hosts[0].level, Level::INFO);
        assert!(hosts[0]
            .fields
            .iter()
            .any(|(k, v)| k == "team" && v.contains("MEX")));
        assert!(entries
            .iter()
            .any(|e| e.message.contains("pool completed") && e.target.starts_with("groupdraw_engine")));
    }

    #[test]
    fn test_group_scans_are_debug() {
        let subscriber = TestLogSubscriber::new();
        let registry = Registry::default().with(subscriber.clone().into_layer::<Registry>());

        tracing::subscriber::with_default(registry, || {
            let table = bundled_pool_table(&mut ChaCha20Rng::seed_from_u64(8)).unwrap();
            let mut s = DrawSession::new_with_seed(table, PoolAssignmentEngine::default(), 8);
            s.assign_pool_n(1).unwrap();
            s.step().unwrap();
        });

        let accepted: Vec<_> = subscriber
            .entries()
            .into_iter()
            .filter(|e| e.message.contains("group accepted"))
            .collect();
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].level, Level::DEBUG);
    }
}
