#![cfg(feature = "tracing")]
#![forbid(unsafe_code)]

//! Span and event coverage for the dock layout pass and drop commits.
//!
//! Run:
//!   cargo test -p panekit-dock --features tracing --test tracing_spans

use std::sync::{Arc, Mutex};

use panekit_core::{CompassDirection, Point, Rect, Size};
use panekit_dock::{DockablePaneModel, PaneGeometry};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

#[derive(Debug, Clone)]
struct CapturedEvent {
    message: String,
    parent_span_name: Option<String>,
}

#[derive(Default, Clone)]
struct Capture {
    spans: Arc<Mutex<Vec<String>>>,
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct MessageVisitor(String);

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S> tracing_subscriber::Layer<S> for Capture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        self.spans
            .lock()
            .unwrap()
            .push(attrs.metadata().name().to_string());
    }

    fn on_event(&self, event: &tracing::Event<'_>, ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        let parent_span_name = ctx
            .current_span()
            .id()
            .and_then(|id| ctx.span(id))
            .map(|span_ref| span_ref.name().to_string());
        self.events.lock().unwrap().push(CapturedEvent {
            message: visitor.0,
            parent_span_name,
        });
    }
}

fn with_capture<F: FnOnce()>(f: F) -> Capture {
    let capture = Capture::default();
    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::filter::LevelFilter::TRACE)
        .with(capture.clone());
    tracing::subscriber::with_default(subscriber, f);
    capture
}

#[test]
fn layout_pass_runs_inside_its_span() {
    let capture = with_capture(|| {
        let mut model = DockablePaneModel::default();
        model
            .add_frame("files", CompassDirection::West, Size::new(200, 0))
            .unwrap();
        model
            .layout_container(&PaneGeometry::new(Rect::from_size(640, 480)))
            .unwrap();
    });

    assert!(capture.spans.lock().unwrap().iter().any(|name| name == "dock_layout"));
    let events = capture.events.lock().unwrap();
    let computed = events
        .iter()
        .find(|event| event.message == "dock layout computed")
        .expect("layout event");
    assert_eq!(computed.parent_span_name.as_deref(), Some("dock_layout"));
    assert!(events.iter().any(|event| event.message == "frame added"));
}

#[test]
fn drop_commit_is_traced() {
    let capture = with_capture(|| {
        let mut model = DockablePaneModel::default();
        model
            .add_frame("files", CompassDirection::West, Size::new(200, 0))
            .unwrap();
        model
            .layout_container(&PaneGeometry::new(Rect::from_size(640, 480)))
            .unwrap();
        let payload = model.create_drag_payload("files").unwrap();
        assert!(model.drop(&payload, Point::new(320, 4)).unwrap());
    });

    let events = capture.events.lock().unwrap();
    let dropped = events
        .iter()
        .find(|event| event.message == "frame dropped")
        .expect("drop event");
    assert_eq!(dropped.parent_span_name.as_deref(), Some("dock_drop"));
}
