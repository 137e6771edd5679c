//! `tracing` setup for binaries, and an in-memory capture layer for tests.

use std::sync::{Arc, Mutex, PoisonError};
use tracing::dispatcher::SetGlobalDefaultError;
use tracing::Level;
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

/// A tracing event captured by [`TestLogSubscriber`]
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub target: String,
    pub message: String,
    pub fields: Vec<(String, String)>,
}

impl CapturedEvent {
    /// Debug-formatted value of a structured field, e.g. `error` or `match_id`.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Records every event it sees. Clones share one buffer, so a test keeps a
/// handle and installs another as a layer:
///
/// ```
/// use lastturn_session::TestLogSubscriber;
/// use tracing_subscriber::layer::SubscriberExt;
///
/// let logs = TestLogSubscriber::new();
/// let subscriber = tracing_subscriber::registry().with(logs.clone());
/// tracing::subscriber::with_default(subscriber, || tracing::warn!("intent rejected"));
/// assert_eq!(logs.find("intent rejected").len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TestLogSubscriber {
    entries: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl TestLogSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<CapturedEvent> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Captured events whose message contains `needle`
    pub fn find(&self, needle: &str) -> Vec<CapturedEvent> {
        self.entries()
            .into_iter()
            .filter(|e| e.message.contains(needle))
            .collect()
    }

    pub fn at_level(&self, level: Level) -> Vec<CapturedEvent> {
        self.entries()
            .into_iter()
            .filter(|e| e.level == level)
            .collect()
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl<S: tracing::Subscriber> Layer<S> for TestLogSubscriber {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(CapturedEvent {
                level: *metadata.level(),
                target: metadata.target().to_string(),
                message: visitor.message.unwrap_or_default(),
                fields: visitor.fields,
            });
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: Vec<(String, String)>,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        let value = format!("{:?}", value);
        match field.name() {
            "message" => self.message = Some(value),
            name => self.fields.push((name.to_string(), value)),
        }
    }
}

/// Default filter when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "info,lastturn_session=debug";

/// Initialize logging for the application with [`DEFAULT_FILTER`]
pub fn init_logging() -> Result<(), SetGlobalDefaultError> {
    init_logging_with(DEFAULT_FILTER)
}

/// Initialize stderr logging; `RUST_LOG` overrides `default_filter`.
/// Fails if a global subscriber is already installed.
pub fn init_logging_with(default_filter: &str) -> Result<(), SetGlobalDefaultError> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
}
