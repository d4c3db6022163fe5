use super::InputEvent;

/// Hard cap on queued events between two frames.
///
/// Gestures arrive at device rates (a few hundred Hz at worst); hitting the
/// cap means frames have stopped draining entirely.
const QUEUE_CAP: usize = 1024;

/// Bounded input queue, drained exactly once per frame before rendering.
///
/// Events are applied in arrival order and never coalesced: anchor-preserving
/// zoom does not commute with pan, so merging events would change the anchor
/// math. Single writer (the window callback), single reader (the frame).
#[derive(Debug, Default)]
pub struct InputQueue {
    events: Vec<InputEvent>,
    overflowed: bool,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues an event. At capacity the newest event is dropped — older
    /// gestures already in order take precedence over a late arrival.
    pub fn push(&mut self, event: InputEvent) {
        if self.events.len() >= QUEUE_CAP {
            if !self.overflowed {
                log::warn!("input queue full ({QUEUE_CAP} events); dropping");
                self.overflowed = true;
            }
            return;
        }
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Removes and yields all queued events in arrival order.
    pub fn drain(&mut self) -> impl Iterator<Item = InputEvent> + '_ {
        self.overflowed = false;
        self.events.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{PanZoomEvent, ResizeEvent};

    fn pan(dx: f64) -> InputEvent {
        InputEvent::PanZoom(PanZoomEvent {
            dx,
            ..Default::default()
        })
    }

    #[test]
    fn drain_preserves_arrival_order() {
        let mut q = InputQueue::new();
        q.push(pan(1.0));
        q.push(InputEvent::Resize(ResizeEvent {
            width: 640,
            height: 480,
        }));
        q.push(pan(3.0));

        let drained: Vec<_> = q.drain().collect();
        assert_eq!(drained.len(), 3);
        assert_eq!(drained[0], pan(1.0));
        assert!(matches!(drained[1], InputEvent::Resize(_)));
        assert_eq!(drained[2], pan(3.0));
    }

    #[test]
    fn drain_empties_the_queue() {
        let mut q = InputQueue::new();
        q.push(pan(1.0));
        let _ = q.drain().count();

        assert!(q.is_empty());
        assert_eq!(q.drain().count(), 0);
    }

    #[test]
    fn overflow_drops_newest_and_keeps_older_events() {
        let mut q = InputQueue::new();
        for i in 0..QUEUE_CAP + 10 {
            q.push(pan(i as f64));
        }

        let drained: Vec<_> = q.drain().collect();
        assert_eq!(drained.len(), QUEUE_CAP);
        assert_eq!(drained[0], pan(0.0));
        assert_eq!(drained[QUEUE_CAP - 1], pan((QUEUE_CAP - 1) as f64));
    }
}
