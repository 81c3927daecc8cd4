use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Write;
use std::io::stdout;
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Instant;

use thread_local::ThreadLocal;
use tracing::field::{Field, Visit};
use tracing::span::Id;
use tracing::{span, Event, Level, Metadata, Subscriber};
use tracing_core::Interest;

struct SpanState {
    /// number of live handles; the span is removed from the map when this reaches zero
    reference_counter: AtomicUsize,
    description: String,
    metadata: &'static Metadata<'static>,
    entered_at: AtomicU64,
    depth: usize
}

///
/// A [`Subscriber`] that prints the tree of running algorithms (i.e. spans created by
/// `#[instrument]`), together with their running time, up to a configurable depth.
/// Algorithm-selection events (events with the fields `op` and `strategy`) are
/// printed as `op -> strategy`.
///
/// # Example
/// ```
/// # use genring::tracing::LogAlgorithmSubscriber;
/// LogAlgorithmSubscriber::init_test();
/// ```
///
pub struct LogAlgorithmSubscriber {
    span_ids: AtomicU64,
    span_map: RwLock<HashMap<Id, SpanState>>,
    current_span: ThreadLocal<RefCell<Vec<Id>>>,
    start: Instant,
    interested_level: RangeInclusive<Level>,
    max_depth: usize
}

impl LogAlgorithmSubscriber {

    fn new(levels: RangeInclusive<Level>, max_depth: usize) -> Self {
        LogAlgorithmSubscriber {
            span_ids: AtomicU64::new(1),
            span_map: RwLock::new(HashMap::new()),
            current_span: ThreadLocal::new(),
            start: Instant::now(),
            interested_level: levels,
            max_depth
        }
    }

    ///
    /// Installs the subscriber as global default.
    ///
    /// # Panics
    ///
    /// Panics if a global default subscriber has already been set.
    ///
    pub fn init(levels: RangeInclusive<Level>, max_depth: usize) {
        tracing::subscriber::set_global_default(Self::new(levels, max_depth)).unwrap()
    }

    ///
    /// Installs the subscriber as global default with settings useful for tests,
    /// unless another subscriber is already installed.
    ///
    pub fn init_test() {
        _ = tracing::subscriber::set_global_default(Self::new(Level::INFO..=Level::DEBUG, 2))
    }

    fn now_micros(&self) -> u64 {
        Instant::now().duration_since(self.start).as_micros() as u64
    }

    fn with_stack<T, F: FnOnce(&mut Vec<Id>) -> T>(&self, f: F) -> T {
        f(&mut self.current_span.get_or(|| RefCell::new(Vec::new())).borrow_mut())
    }

    fn current_depth(&self) -> usize {
        self.with_stack(|stack| stack.len())
    }

    fn print_line(&self, depth: usize, line: &str) {
        let mut out = String::new();
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push_str(line);
        println!("{}", out);
        _ = std::io::Write::flush(&mut stdout());
    }
}

///
/// Collects the fields of a span or an event.
///
#[derive(Default)]
struct FieldRecorder {
    message: Option<String>,
    op: Option<String>,
    strategy: Option<String>,
    fields: Option<String>
}

impl FieldRecorder {

    fn describe(self, name: &str) -> String {
        if let (Some(op), Some(strategy)) = (&self.op, &self.strategy) {
            return format!("{} -> {}", op, strategy);
        }
        let mut result = self.message.unwrap_or_else(|| name.to_owned());
        if let Some(fields) = self.fields {
            _ = write!(&mut result, "({})", fields);
        }
        return result;
    }
}

impl Visit for FieldRecorder {

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "op" => self.op = Some(value.to_owned()),
            "strategy" => self.strategy = Some(value.to_owned()),
            _ => self.record_debug(field, &value)
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        match field.name() {
            "message" => self.message = Some(format!("{:?}", value)),
            "op" => self.op = Some(format!("{:?}", value)),
            "strategy" => self.strategy = Some(format!("{:?}", value)),
            name => if let Some(fields) = &mut self.fields {
                _ = write!(fields, ", {}={:?}", name, value);
            } else {
                self.fields = Some(format!("{}={:?}", name, value));
            }
        }
    }
}

impl Subscriber for LogAlgorithmSubscriber {

    fn register_callsite(&self, metadata: &'static Metadata<'static>) -> Interest {
        if self.interested_level.contains(metadata.level()) {
            Interest::always()
        } else {
            Interest::never()
        }
    }

    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.interested_level.contains(metadata.level())
    }

    fn new_span(&self, span: &span::Attributes<'_>) -> Id {
        let id = Id::from_u64(self.span_ids.fetch_add(1, Ordering::Relaxed));
        let parent = span.parent().cloned().or_else(|| self.with_stack(|stack| stack.last().cloned()));
        let mut spans = self.span_map.write().unwrap();
        let depth = parent.as_ref().and_then(|p| spans.get(p)).map(|p| p.depth + 1).unwrap_or(0);

        let mut description = FieldRecorder::default();
        span.record(&mut description);
        let description = description.describe(span.metadata().name());

        spans.insert(id.clone(), SpanState {
            reference_counter: AtomicUsize::new(1),
            description,
            metadata: span.metadata(),
            entered_at: AtomicU64::new(0),
            depth
        });
        return id;
    }

    fn record(&self, _span: &Id, _values: &span::Record<'_>) {}

    fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

    fn event(&self, event: &Event<'_>) {
        let depth = self.current_depth();
        if depth <= self.max_depth {
            let mut description = FieldRecorder::default();
            event.record(&mut description);
            self.print_line(depth, &description.describe(event.metadata().name()));
        }
    }

    fn enter(&self, span: &Id) {
        self.with_stack(|stack| stack.push(span.clone()));
        let spans = self.span_map.read().unwrap();
        if let Some(state) = spans.get(span) {
            state.entered_at.store(self.now_micros(), Ordering::SeqCst);
            if state.depth < self.max_depth {
                self.print_line(state.depth, &state.description);
            }
        }
    }

    fn exit(&self, span: &Id) {
        self.with_stack(|stack| if stack.last() == Some(span) {
            stack.pop();
        });
        let spans = self.span_map.read().unwrap();
        if let Some(state) = spans.get(span) {
            let time = self.now_micros() - state.entered_at.load(Ordering::SeqCst);
            if state.depth < self.max_depth {
                self.print_line(state.depth, &format!("done {}({}us)", state.metadata.name(), time));
            }
        }
    }

    fn clone_span(&self, id: &Id) -> Id {
        if let Some(state) = self.span_map.read().unwrap().get(id) {
            state.reference_counter.fetch_add(1, Ordering::Relaxed);
        }
        return id.clone();
    }

    fn try_close(&self, id: Id) -> bool {
        let remaining = match self.span_map.read().unwrap().get(&id) {
            Some(state) => state.reference_counter.fetch_sub(1, Ordering::Relaxed) - 1,
            None => return false
        };
        if remaining == 0 {
            self.span_map.write().unwrap().remove(&id);
            true
        } else {
            false
        }
    }
}

///
/// A [`Subscriber`] that records all algorithm-selection decisions, i.e. the values
/// of the fields `op` and `strategy` of all events.
///
/// Use it with [`tracing::subscriber::with_default()`] to check which algorithms a
/// computation uses.
///
/// # Example
/// ```
/// # use genring::ring::*;
/// # use genring::rings::rational::QQ;
/// # use genring::rings::poly::GrPoly;
/// # use genring::algorithms::series::inv_series;
/// # use genring::tracing::SelectionRecorder;
/// let recorder = SelectionRecorder::new();
/// let f = GrPoly::from_ints(&QQ, &[1, -1]);
/// let mut g = GrPoly::new();
/// tracing::subscriber::with_default(recorder.clone(), || inv_series(&QQ, &mut g, &f, 5)).must_succeed();
/// assert_eq!(Some("basecase".to_owned()), recorder.strategy_for("inv_series"));
/// ```
///
#[derive(Clone, Default)]
pub struct SelectionRecorder {
    span_ids: Arc<AtomicU64>,
    decisions: Arc<Mutex<Vec<(String, String)>>>
}

impl SelectionRecorder {

    pub fn new() -> Self {
        Self::default()
    }

    ///
    /// Returns all recorded `(op, strategy)` pairs, in the order they were made.
    ///
    pub fn decisions(&self) -> Vec<(String, String)> {
        self.decisions.lock().unwrap().clone()
    }

    ///
    /// Returns the strategy chosen by the first recorded decision for `op`.
    ///
    pub fn strategy_for(&self, op: &str) -> Option<String> {
        self.decisions.lock().unwrap().iter().find(|(o, _)| o == op).map(|(_, s)| s.clone())
    }

    pub fn clear(&self) {
        self.decisions.lock().unwrap().clear();
    }
}

impl Subscriber for SelectionRecorder {

    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.is_event()
    }

    fn new_span(&self, _span: &span::Attributes<'_>) -> Id {
        Id::from_u64(self.span_ids.fetch_add(1, Ordering::Relaxed) + 1)
    }

    fn record(&self, _span: &Id, _values: &span::Record<'_>) {}

    fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

    fn event(&self, event: &Event<'_>) {
        let mut fields = FieldRecorder::default();
        event.record(&mut fields);
        if let (Some(op), Some(strategy)) = (fields.op, fields.strategy) {
            self.decisions.lock().unwrap().push((op, strategy));
        }
    }

    fn enter(&self, _span: &Id) {}

    fn exit(&self, _span: &Id) {}
}

#[test]
fn test_recorder_collects_selection_events() {
    let recorder = SelectionRecorder::new();
    tracing::subscriber::with_default(recorder.clone(), || {
        tracing::debug!(op = "mul", strategy = "karatsuba", len = 40);
        tracing::debug!("unrelated");
        tracing::debug!(op = "divrem", strategy = "basecase");
    });
    assert_eq!(vec![
        ("mul".to_owned(), "karatsuba".to_owned()),
        ("divrem".to_owned(), "basecase".to_owned())
    ], recorder.decisions());
    assert_eq!(Some("basecase".to_owned()), recorder.strategy_for("divrem"));
    assert_eq!(None, recorder.strategy_for("gcd"));
}

#[test]
fn test_field_recorder_describe() {
    let recorder = FieldRecorder { message: None, op: Some("gcd".to_owned()), strategy: Some("euclidean".to_owned()), fields: None };
    assert_eq!("gcd -> euclidean", recorder.describe("event"));
    let recorder = FieldRecorder { message: None, op: None, strategy: None, fields: Some("n=3".to_owned()) };
    assert_eq!("poly_mullow(n=3)", recorder.describe("poly_mullow"));
}
