//! # Fading strokes
//!
//! Strokes that remove themselves after a timeout, like a laser pointer. They live on the page's
//! [`TemporaryLayer`] and never go through the command log.
//!
//! Each stroke carries its own deadline. The host's timer service asks for
//! [`TemporaryLayer::next_deadline`] (or [`Document::next_fading_deadline`](super::Document::next_fading_deadline))
//! to know when to wake up, then calls [`Document::expire_fading`](super::Document::expire_fading).
//! Since the countdowns are owned by the layer, dropping the layer (closing the document, deleting the
//! page) cancels them - there is nothing left to fire into a dead page.

use crate::{observer::DocumentObserver, stroke::Stroke};
use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
struct FadingStroke {
    stroke: Stroke,
    deadline: Instant,
}

#[derive(Clone, Debug, Default)]
pub struct TemporaryLayer {
    strokes: Vec<FadingStroke>,
}
impl TemporaryLayer {
    /// Currently visible strokes, oldest first.
    pub fn strokes(&self) -> impl Iterator<Item = &Stroke> + '_ {
        self.strokes.iter().map(|fading| &fading.stroke)
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.strokes.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }
    /// The earliest moment any stroke here expires.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.strokes.iter().map(|fading| fading.deadline).min()
    }
    pub(crate) fn add(
        &mut self,
        page: usize,
        stroke: Stroke,
        now: Instant,
        timeout: Duration,
        observer: &mut dyn DocumentObserver,
    ) {
        self.strokes.push(FadingStroke {
            stroke,
            deadline: now + timeout,
        });
        if let Some(added) = self.strokes.last() {
            observer.fading_added(page, &added.stroke);
        }
    }
    /// Drop every stroke whose deadline is at or before `now`. Returns how many were dropped.
    pub(crate) fn expire(
        &mut self,
        page: usize,
        now: Instant,
        observer: &mut dyn DocumentObserver,
    ) -> usize {
        let before = self.strokes.len();
        self.strokes.retain(|fading| fading.deadline > now);
        let expired = before - self.strokes.len();
        if expired != 0 {
            log::trace!("{expired} fading strokes expired on page {page}");
            observer.fading_expired(page, self);
        }
        expired
    }
}
impl Drop for TemporaryLayer {
    fn drop(&mut self) {
        if !self.strokes.is_empty() {
            log::trace!("Cancelling {} fading countdowns", self.strokes.len());
        }
    }
}

#[cfg(test)]
mod test {
    use super::TemporaryLayer;
    use crate::{color::Color, geom::Point, observer::Recorder, observer::Change, stroke::Stroke};
    use std::time::{Duration, Instant};

    fn dot() -> Stroke {
        Stroke::pen(4, Color::BLACK).with_points([Point::new(1, 1)])
    }
    #[test]
    fn expires_after_timeout() {
        let start = Instant::now();
        let timeout = Duration::from_millis(500);
        let epsilon = Duration::from_millis(1);
        let mut layer = TemporaryLayer::default();
        let mut recorder = Recorder::default();

        layer.add(0, dot(), start, timeout, &mut recorder);
        assert_eq!(layer.next_deadline(), Some(start + timeout));

        assert_eq!(layer.expire(0, start + timeout - epsilon, &mut recorder), 0);
        assert_eq!(layer.len(), 1);
        assert_eq!(layer.expire(0, start + timeout + epsilon, &mut recorder), 1);
        assert!(layer.is_empty());
        assert_eq!(layer.next_deadline(), None);
        assert_eq!(
            recorder.changes,
            [
                Change::FadingAdded { page: 0 },
                Change::FadingExpired { page: 0, remaining: 0 }
            ]
        );
    }
    #[test]
    fn independent_countdowns() {
        let start = Instant::now();
        let mut layer = TemporaryLayer::default();
        layer.add(2, dot(), start, Duration::from_millis(100), &mut ());
        layer.add(2, dot(), start, Duration::from_millis(300), &mut ());
        assert_eq!(layer.next_deadline(), Some(start + Duration::from_millis(100)));

        assert_eq!(layer.expire(2, start + Duration::from_millis(200), &mut ()), 1);
        assert_eq!(layer.len(), 1);
        assert_eq!(layer.next_deadline(), Some(start + Duration::from_millis(300)));
    }
}
