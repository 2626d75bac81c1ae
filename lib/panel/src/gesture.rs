use std::collections::HashMap;
use std::time::{Duration, Instant};

use log::trace;

use crate::{Clock, ControlId, Error, MonotonicClock, Result};

/// Presses held at least this long are holds.
pub const HOLD_THRESHOLD: Duration = Duration::from_millis(300);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Gesture {
    Tap,
    Hold,
}

impl Gesture {
    pub fn classify(elapsed: Duration) -> Gesture {
        if elapsed < HOLD_THRESHOLD {
            Gesture::Tap
        } else {
            Gesture::Hold
        }
    }
}

/// Tracks one outstanding press per control and turns press/release pairs
/// into taps and holds.
pub struct GestureClassifier<C = MonotonicClock> {
    clock: C,
    presses: HashMap<ControlId, Instant>,
}

impl GestureClassifier<MonotonicClock> {
    pub fn new() -> Self {
        Self::with_clock(MonotonicClock)
    }
}

impl Default for GestureClassifier<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> GestureClassifier<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            presses: HashMap::new(),
        }
    }

    pub fn press(&mut self, control: ControlId) {
        let now = self.clock.now();
        self.register_press(control, now);
    }

    pub fn release(&mut self, control: ControlId) -> Result<Gesture> {
        let now = self.clock.now();
        self.resolve_release(control, now)
    }

    /// Records a press; a newer press on the same control replaces the old one.
    pub fn register_press(&mut self, control: ControlId, at: Instant) {
        if self.presses.insert(control, at).is_some() {
            trace!("press on {control} replaced an unresolved press");
        }
    }

    pub fn resolve_release(&mut self, control: ControlId, at: Instant) -> Result<Gesture> {
        let pressed_at = self
            .presses
            .remove(&control)
            .ok_or(Error::MissingPressState(control))?;

        let elapsed = at.saturating_duration_since(pressed_at);
        let gesture = Gesture::classify(elapsed);

        trace!("{control} released after {elapsed:?}: {gesture:?}");

        Ok(gesture)
    }

    pub fn is_pressed(&self, control: ControlId) -> bool {
        self.presses.contains_key(&control)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ManualClock;
    use transport::Room;

    const KITCHEN: ControlId = ControlId::HotZone(Room::Kitchen);

    #[test]
    fn test_short_press_is_tap() {
        let mut classifier = GestureClassifier::new();
        let t0 = Instant::now();

        classifier.register_press(KITCHEN, t0);
        let gesture = classifier.resolve_release(KITCHEN, t0 + Duration::from_millis(290));

        assert_eq!(gesture, Ok(Gesture::Tap));
    }

    #[test]
    fn test_threshold_is_hold() {
        let mut classifier = GestureClassifier::new();
        let t0 = Instant::now();

        classifier.register_press(KITCHEN, t0);
        assert_eq!(
            classifier.resolve_release(KITCHEN, t0 + Duration::from_millis(300)),
            Ok(Gesture::Hold)
        );

        classifier.register_press(KITCHEN, t0);
        assert_eq!(
            classifier.resolve_release(KITCHEN, t0 + Duration::from_secs(2)),
            Ok(Gesture::Hold)
        );
    }

    #[test]
    fn test_release_without_press() {
        let mut classifier = GestureClassifier::new();

        assert_eq!(
            classifier.resolve_release(KITCHEN, Instant::now()),
            Err(Error::MissingPressState(KITCHEN))
        );
        assert!(!classifier.is_pressed(KITCHEN));

        assert_eq!(
            classifier.resolve_release(KITCHEN, Instant::now()),
            Err(Error::MissingPressState(KITCHEN))
        );
    }

    #[test]
    fn test_release_clears_press() {
        let mut classifier = GestureClassifier::new();
        let t0 = Instant::now();

        classifier.register_press(KITCHEN, t0);
        assert!(classifier.is_pressed(KITCHEN));

        classifier.resolve_release(KITCHEN, t0).unwrap();
        assert!(!classifier.is_pressed(KITCHEN));
        assert!(classifier.resolve_release(KITCHEN, t0).is_err());
    }

    #[test]
    fn test_last_press_wins() {
        let mut classifier = GestureClassifier::new();
        let t0 = Instant::now();

        classifier.register_press(KITCHEN, t0);
        classifier.register_press(KITCHEN, t0 + Duration::from_millis(500));

        assert_eq!(
            classifier.resolve_release(KITCHEN, t0 + Duration::from_millis(600)),
            Ok(Gesture::Tap)
        );
    }

    #[test]
    fn test_controls_are_independent() {
        let mut classifier = GestureClassifier::new();
        let bedroom = ControlId::HotZone(Room::Bedroom);
        let t0 = Instant::now();

        classifier.register_press(KITCHEN, t0);
        classifier.register_press(bedroom, t0 + Duration::from_millis(250));

        assert_eq!(
            classifier.resolve_release(bedroom, t0 + Duration::from_millis(400)),
            Ok(Gesture::Tap)
        );
        assert_eq!(
            classifier.resolve_release(KITCHEN, t0 + Duration::from_millis(400)),
            Ok(Gesture::Hold)
        );
    }

    #[test]
    fn test_release_before_press_is_tap() {
        let mut classifier = GestureClassifier::new();
        let t0 = Instant::now() + Duration::from_secs(1);

        classifier.register_press(KITCHEN, t0);

        assert_eq!(
            classifier.resolve_release(KITCHEN, t0 - Duration::from_millis(500)),
            Ok(Gesture::Tap)
        );
    }

    #[test]
    fn test_uses_injected_clock() {
        let clock = ManualClock::new();
        let mut classifier = GestureClassifier::with_clock(clock.clone());

        classifier.press(ControlId::MasterLight);
        clock.advance(Duration::from_millis(299));
        assert_eq!(classifier.release(ControlId::MasterLight), Ok(Gesture::Tap));

        classifier.press(ControlId::MasterLight);
        clock.advance(Duration::from_millis(300));
        assert_eq!(classifier.release(ControlId::MasterLight), Ok(Gesture::Hold));
    }
}
