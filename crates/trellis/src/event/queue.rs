//! The root window's event queue.

use std::collections::VecDeque;

use trellis_core::logging::targets;

use super::{Event, EventType};
use crate::widget::WidgetId;

#[derive(Debug)]
struct Queued {
    seq: u64,
    event: Event,
}

/// FIFO of pending events with tail merging.
///
/// Events enqueued while a dispatch pass runs land behind the pass and are
/// never merged into events of that pass, so handlers never observe state
/// produced by later events.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<Queued>,
    next_seq: u64,
    // Events with a lower sequence number belong to the running pass.
    pass_floor: Option<u64>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue `event`, merging it into a pending event when allowed.
    ///
    /// `mergeable` is the target widget's merge mask. The scan walks back
    /// from the tail over other widgets' events and stops at the first event
    /// for the same widget: it merges when that event has the same type and
    /// the pair is compatible, and stops without merging otherwise.
    ///
    /// Returns `true` when the event was merged.
    pub fn add(&mut self, event: Event, mergeable: EventType) -> bool {
        let kind = event.event_type();
        let widget = event.widget();

        let event = if kind.is_mergeable() && mergeable.contains(kind) {
            match self.merge_candidate(widget, kind) {
                Some(candidate) => match candidate.merge(event) {
                    Ok(()) => {
                        tracing::trace!(target: targets::QUEUE, ?widget, ?kind, "merged event");
                        return true;
                    }
                    Err(event) => event,
                },
                None => event,
            }
        } else {
            event
        };

        let seq = self.next_seq;
        self.next_seq += 1;
        tracing::trace!(target: targets::QUEUE, ?widget, ?kind, seq, "queued event");
        self.events.push_back(Queued { seq, event });
        false
    }

    fn merge_candidate(&mut self, widget: WidgetId, kind: EventType) -> Option<&mut Event> {
        let floor = self.pass_floor;
        for queued in self.events.iter_mut().rev() {
            if floor.is_some_and(|f| queued.seq < f) {
                return None;
            }
            if queued.event.widget() != widget {
                continue;
            }
            return (queued.event.event_type() == kind).then_some(&mut queued.event);
        }
        None
    }

    /// Mark the start of a dispatch pass. Only events queued before this
    /// call are handed out by [`pop_pass`](Self::pop_pass) until
    /// [`end_pass`](Self::end_pass).
    pub(crate) fn begin_pass(&mut self) {
        self.pass_floor = Some(self.next_seq);
    }

    pub(crate) fn end_pass(&mut self) {
        self.pass_floor = None;
    }

    /// Pop the next event of the running pass.
    pub(crate) fn pop_pass(&mut self) -> Option<Event> {
        let floor = self.pass_floor.unwrap_or(u64::MAX);
        if self.events.front().is_some_and(|q| q.seq < floor) {
            self.events.pop_front().map(|q| q.event)
        } else {
            None
        }
    }

    /// Pop the oldest event regardless of passes.
    pub fn pop_front(&mut self) -> Option<Event> {
        self.events.pop_front().map(|q| q.event)
    }

    /// Drop every event targeting `widget` or naming it as request widget.
    ///
    /// Returns the number of dropped events.
    pub fn purge(&mut self, widget: WidgetId) -> usize {
        self.purge_where(|e| e.involves(widget))
    }

    pub fn purge_where(&mut self, mut pred: impl FnMut(&Event) -> bool) -> usize {
        let before = self.events.len();
        self.events.retain(|q| !pred(&q.event));
        let purged = before - self.events.len();
        if purged > 0 {
            tracing::trace!(target: targets::QUEUE, purged, "purged events");
        }
        purged
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().map(|q| &q.event)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::MouseButton;
    use slotmap::SlotMap;
    use trellis_core::{Area, Point};

    fn widgets(n: usize) -> Vec<WidgetId> {
        let mut map = SlotMap::<WidgetId, ()>::with_key();
        (0..n).map(|_| map.insert(())).collect()
    }

    fn motion(w: WidgetId, x: f64) -> Event {
        Event::pointer(
            w,
            EventType::POINTER_MOTION,
            Point::new(x, 0.0),
            Point::new(x, 0.0),
            Point::new(1.0, 0.0),
            MouseButton::NoButton,
        )
    }

    #[test]
    fn test_three_exposes_merge() {
        let w = widgets(1)[0];
        let mut q = EventQueue::new();
        for area in [
            Area::new(0.0, 0.0, 10.0, 10.0),
            Area::new(5.0, 5.0, 10.0, 10.0),
            Area::new(20.0, 0.0, 5.0, 5.0),
        ] {
            q.add(Event::expose_request(w, w, area), EventType::MERGEABLE);
        }
        assert_eq!(q.len(), 1);
        match q.iter().next() {
            Some(Event::Expose(e)) => assert_eq!(e.area, Area::new(0.0, 0.0, 25.0, 15.0)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_merge_skips_other_widgets() {
        let ws = widgets(2);
        let mut q = EventQueue::new();
        q.add(motion(ws[0], 1.0), EventType::MERGEABLE);
        q.add(motion(ws[1], 1.0), EventType::MERGEABLE);
        assert!(q.add(motion(ws[0], 5.0), EventType::MERGEABLE));
        assert_eq!(q.len(), 2);
        match q.iter().next() {
            Some(Event::Pointer(p)) => {
                assert_eq!(p.position, Point::new(5.0, 0.0));
                assert_eq!(p.delta, Point::new(2.0, 0.0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_other_type_is_a_barrier() {
        let w = widgets(1)[0];
        let mut q = EventQueue::new();
        q.add(motion(w, 1.0), EventType::MERGEABLE);
        q.add(Event::wheel(w, Point::ZERO, Point::new(0.0, 1.0)), EventType::MERGEABLE);
        assert!(!q.add(motion(w, 2.0), EventType::MERGEABLE));
        assert_eq!(q.len(), 3);
    }

    #[test]
    fn test_mask_disables_merge() {
        let w = widgets(1)[0];
        let mut q = EventQueue::new();
        q.add(motion(w, 1.0), EventType::empty());
        q.add(motion(w, 2.0), EventType::empty());
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn test_no_merge_into_running_pass() {
        let w = widgets(1)[0];
        let mut q = EventQueue::new();
        q.add(Event::value_changed(w, 1.0_f64), EventType::MERGEABLE);
        q.add(Event::value_changed(w, 2.0_f64), EventType::MERGEABLE);
        assert_eq!(q.len(), 1);

        q.begin_pass();
        q.add(Event::value_changed(w, 3.0_f64), EventType::MERGEABLE);
        assert_eq!(q.len(), 2);
        assert!(q.pop_pass().is_some());
        assert!(q.pop_pass().is_none());
        q.end_pass();
        assert_eq!(q.pop_front().map(|e| e.event_type()), Some(EventType::VALUE_CHANGED));
    }

    #[test]
    fn test_purge_request_widget() {
        let ws = widgets(2);
        let mut q = EventQueue::new();
        q.add(Event::expose_request(ws[0], ws[1], Area::new(0.0, 0.0, 1.0, 1.0)), EventType::MERGEABLE);
        q.add(Event::close_request(ws[0], ws[0]), EventType::MERGEABLE);
        assert_eq!(q.purge(ws[1]), 1);
        assert_eq!(q.len(), 1);
    }
}
