//! The indicator actor owns the whole recomputation pipeline: snapshot query,
//! model build, numbering, formatting, and hand-off to the presentation sink.
//! Every recomputation runs to completion on this actor before the marker
//! watch re-arms, so at most one is ever in flight and deletions arriving
//! mid-run coalesce into the next one.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, trace, warn};

use crate::actor::Receiver;
use crate::actor::space_watcher::SpaceWatcher;
use crate::model::label::{Label, format_label};
use crate::model::numbering::resolve;
use crate::model::snapshot::{RawSnapshot, build_model};

#[derive(Debug)]
pub enum Event {
    /// Recompute the label. Sent at startup, on space-change and theme
    /// notifications, on application idle, and from the status menu.
    Refresh,
    /// The space marker file was deleted: disarm, recompute, re-arm.
    MarkerDeleted,
    /// Presentation-only state from the status menu delegate.
    MenuOpened(bool),
}

/// The window-server query, at its seam. Returns `None` when the server has
/// no usable data; that recomputation is skipped and the previous label kept.
pub trait SnapshotProvider {
    fn snapshot(&self) -> Option<RawSnapshot>;
}

/// Receives the formatted label. Delivery is fire-and-forget; the sink is
/// responsible for getting onto whatever thread owns the presentation layer.
pub trait LabelSink {
    fn publish(&self, label: Label, menu_open: bool);
}

pub struct Indicator<P, S> {
    provider: P,
    sink: S,
    rx: Receiver<Event>,
    watcher: Option<SpaceWatcher>,
    dark_mode: Arc<AtomicBool>,
    separator: String,
    menu_open: bool,
    last_label: Option<Label>,
}

impl<P: SnapshotProvider, S: LabelSink> Indicator<P, S> {
    pub fn new(
        provider: P,
        sink: S,
        rx: Receiver<Event>,
        watcher: Option<SpaceWatcher>,
        dark_mode: Arc<AtomicBool>,
        separator: String,
    ) -> Self {
        Self {
            provider,
            sink,
            rx,
            watcher,
            dark_mode,
            separator,
            menu_open: false,
            last_label: None,
        }
    }

    pub async fn run(mut self) {
        self.refresh();
        while let Some((span, event)) = self.rx.recv().await {
            let _enter = span.enter();
            self.handle_event(event);
        }
        debug!("indicator channel closed; exiting");
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Refresh => self.refresh(),
            Event::MarkerDeleted => self.handle_marker_deleted(),
            Event::MenuOpened(open) => self.handle_menu_opened(open),
        }
    }

    fn handle_marker_deleted(&mut self) {
        if let Some(watcher) = self.watcher.as_mut() {
            watcher.disarm();
        }
        self.refresh();
        if let Some(watcher) = self.watcher.as_mut() {
            if let Err(err) = watcher.rearm() {
                // Fatal for automatic change detection only; notification
                // driven refreshes remain the update path.
                warn!(%err, "failed to re-open space marker watch; stopping change detection");
                self.watcher = None;
            }
        }
    }

    fn handle_menu_opened(&mut self, open: bool) {
        if self.menu_open == open {
            return;
        }
        self.menu_open = open;
        if let Some(label) = self.last_label.clone() {
            self.sink.publish(label, open);
        }
    }

    fn refresh(&mut self) {
        let Some(raw) = self.provider.snapshot() else {
            debug!("window server snapshot unavailable; keeping previous label");
            return;
        };
        if raw.displays.is_empty() {
            debug!("snapshot lists no displays; keeping previous label");
            return;
        }

        let model = build_model(&raw);
        let resolved = resolve(&model);
        let label = format_label(
            &resolved,
            self.dark_mode.load(Ordering::Relaxed),
            &self.separator,
        );

        if self.last_label.as_ref() == Some(&label) {
            trace!("label unchanged; skipping publish");
            return;
        }
        self.last_label = Some(label.clone());
        self.sink.publish(label, self.menu_open);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::actor;
    use crate::model::label::{RunStyle, StyledRun};

    struct FixedProvider(Option<RawSnapshot>);

    impl SnapshotProvider for FixedProvider {
        fn snapshot(&self) -> Option<RawSnapshot> {
            self.0.clone()
        }
    }

    #[derive(Clone, Default)]
    struct RecordingSink(Arc<Mutex<Vec<(Label, bool)>>>);

    impl LabelSink for RecordingSink {
        fn publish(&self, label: Label, menu_open: bool) {
            self.0.lock().unwrap().push((label, menu_open));
        }
    }

    fn three_space_snapshot() -> RawSnapshot {
        serde_json::from_value(json!({
            "displays": [{
                "identifier": "Main",
                "current_space": { "uuid": "b", "managed_id": 12 },
                "spaces": [
                    { "uuid": "a", "managed_id": 11 },
                    { "uuid": "b", "managed_id": 12 },
                    { "uuid": "c", "managed_id": 13 },
                ],
            }],
            "focused_display": "Main",
        }))
        .unwrap()
    }

    fn indicator(
        provider: FixedProvider,
        sink: RecordingSink,
    ) -> (Indicator<FixedProvider, RecordingSink>, actor::Sender<Event>) {
        let (tx, rx) = actor::channel();
        let indicator = Indicator::new(
            provider,
            sink,
            rx,
            None,
            Arc::new(AtomicBool::new(false)),
            " | ".to_string(),
        );
        (indicator, tx)
    }

    #[test_log::test]
    fn pipeline_publishes_the_expected_runs() {
        let sink = RecordingSink::default();
        let (mut indicator, _tx) = indicator(FixedProvider(Some(three_space_snapshot())), sink.clone());

        indicator.refresh();

        let published = sink.0.lock().unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(
            published[0].0.runs,
            vec![
                StyledRun {
                    text: "1".to_string(),
                    style: RunStyle::Plain,
                },
                StyledRun {
                    text: " 2 ".to_string(),
                    style: RunStyle::Current { active: true },
                },
                StyledRun {
                    text: "3".to_string(),
                    style: RunStyle::Plain,
                },
            ]
        );
    }

    #[test_log::test]
    fn identical_snapshots_publish_once() {
        let sink = RecordingSink::default();
        let (mut indicator, _tx) = indicator(FixedProvider(Some(three_space_snapshot())), sink.clone());

        indicator.refresh();
        indicator.refresh();

        assert_eq!(sink.0.lock().unwrap().len(), 1);
    }

    #[test_log::test]
    fn unavailable_snapshot_keeps_the_previous_label() {
        let sink = RecordingSink::default();
        let (mut indicator, _tx) = indicator(FixedProvider(None), sink.clone());

        indicator.refresh();

        assert!(sink.0.lock().unwrap().is_empty());
        assert!(indicator.last_label.is_none());
    }

    #[test_log::test]
    fn menu_toggle_republishes_the_last_label() {
        let sink = RecordingSink::default();
        let (mut indicator, _tx) = indicator(FixedProvider(Some(three_space_snapshot())), sink.clone());

        indicator.refresh();
        indicator.handle_event(Event::MenuOpened(true));

        let published = sink.0.lock().unwrap();
        assert_eq!(published.len(), 2);
        assert_eq!(published[0].0, published[1].0);
        assert!(!published[0].1);
        assert!(published[1].1);
    }

    #[tokio::test]
    async fn run_performs_a_startup_refresh() {
        let sink = RecordingSink::default();
        let (indicator, tx) = indicator(FixedProvider(Some(three_space_snapshot())), sink.clone());

        let handle = tokio::spawn(indicator.run());
        drop(tx);
        handle.await.unwrap();

        assert_eq!(sink.0.lock().unwrap().len(), 1);
    }
}
