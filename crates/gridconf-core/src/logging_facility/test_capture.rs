//! In-memory event capture for logging assertions
//!
//! Installs a process-wide subscriber once; every test in the binary shares
//! it. Tests that assert on counts should therefore filter by something
//! unique to them (an operation name, a plan id, an entity name).

use gridconf_core_types::schema::{
    FIELD_COMPONENT, FIELD_ENTITY_NAME, FIELD_EVENT, FIELD_OP, FIELD_PLAN_ID,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::field::{Field, Visit};
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// One captured event; every field value is kept in its display form
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub component: Option<String>,
    pub op: Option<String>,
    pub event: Option<String>,
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    fn from_fields(level: Level, fields: HashMap<String, String>) -> Self {
        Self {
            level,
            component: fields.get(FIELD_COMPONENT).cloned(),
            op: fields.get(FIELD_OP).cloned(),
            event: fields.get(FIELD_EVENT).cloned(),
            fields,
        }
    }
}

#[derive(Default)]
struct Fields(HashMap<String, String>);

// integer and bool values fall back to record_debug, which prints them plainly
impl Visit for Fields {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }
}

struct CaptureLayer {
    sink: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = Fields::default();
        event.record(&mut fields);
        let captured = CapturedEvent::from_fields(*event.metadata().level(), fields.0);
        if let Ok(mut sink) = self.sink.lock() {
            sink.push(captured);
        }
    }
}

/// Shared handle on everything captured so far
#[derive(Clone)]
pub struct TestCapture {
    sink: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl TestCapture {
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.sink.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Lifecycle and detail events of one operation, in emission order
    pub fn events_for_op(&self, op: &str) -> Vec<CapturedEvent> {
        self.filtered(|e| e.op.as_deref() == Some(op))
    }

    /// Everything logged while building or executing one plan
    pub fn events_for_plan(&self, plan_id: &str) -> Vec<CapturedEvent> {
        self.filtered(|e| e.field(FIELD_PLAN_ID) == Some(plan_id))
    }

    /// Warnings naming `entity_name`
    pub fn warnings_for_entity(&self, entity_name: &str) -> Vec<CapturedEvent> {
        self.filtered(|e| e.level == Level::WARN && e.field(FIELD_ENTITY_NAME) == Some(entity_name))
    }

    pub fn count_events<F>(&self, predicate: F) -> usize
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.filtered(predicate).len()
    }

    /// # Panics
    ///
    /// Panics when no event has this `op` and `event`.
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        let seen = self.events_for_op(op);
        assert!(
            seen.iter().any(|e| e.event.as_deref() == Some(event)),
            "no {} event for op {} among {:?}",
            event,
            op,
            seen.iter().map(|e| e.event.clone()).collect::<Vec<_>>()
        );
    }

    pub fn clear(&self) {
        if let Ok(mut sink) = self.sink.lock() {
            sink.clear();
        }
    }

    fn filtered<F>(&self, predicate: F) -> Vec<CapturedEvent>
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.events().into_iter().filter(|e| predicate(e)).collect()
    }
}

static CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the capture subscriber (first call only) and return its handle
///
/// ```
/// use gridconf_core::logging_facility::test_capture::init_test_capture;
/// use gridconf_core::log_op_start;
///
/// let capture = init_test_capture();
/// log_op_start!("compare");
/// capture.assert_event_exists("compare", "start");
/// ```
pub fn init_test_capture() -> TestCapture {
    CAPTURE
        .get_or_init(|| {
            let sink = Arc::new(Mutex::new(Vec::new()));
            let layer = CaptureLayer { sink: sink.clone() };
            // another subscriber may already be installed in this process
            let _ = tracing_subscriber::registry().with(layer).try_init();
            TestCapture { sink }
        })
        .clone()
}
