use pose_tracker_lib::{MOVING_DETECTOR, STILL_DETECTOR};
use thiserror::Error;

use crate::window::VelocityWindow;

/// Behavioural state a detector recognises
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorKind {
    Still,
    Moving,
}

/// A named threshold test over a full velocity window.
///
/// What gets published when the test passes is decided by `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detector {
    pub name: &'static str,
    pub kind: DetectorKind,
}

impl Detector {
    pub const STILL: Detector = Detector {
        name: STILL_DETECTOR,
        kind: DetectorKind::Still,
    };

    pub const MOVING: Detector = Detector {
        name: MOVING_DETECTOR,
        kind: DetectorKind::Moving,
    };

    /// Both comparisons are strict: a velocity equal to the threshold
    /// is neither still nor moving.
    pub fn matches(&self, threshold: f64, window: &VelocityWindow) -> bool {
        match self.kind {
            DetectorKind::Still => window.all_velocities(|v| v < threshold),
            DetectorKind::Moving => window.all_velocities(|v| v > threshold),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("detector '{0}' not found")]
pub struct DetectorNotFound(pub String);

/// Detectors in rotation order
static DETECTORS: [Detector; 2] = [Detector::STILL, Detector::MOVING];

/// Round-robin over the detectors with a single cursor.
pub struct DetectorCycle {
    cursor: usize,
}

impl DetectorCycle {
    pub fn new() -> Self {
        Self { cursor: 0 }
    }

    pub fn current(&self) -> Detector {
        DETECTORS[self.cursor]
    }

    /// Move to the next detector, wrapping after the last, and return it.
    pub fn advance(&mut self) -> Detector {
        self.cursor = (self.cursor + 1) % DETECTORS.len();
        self.current()
    }

    /// Advance until the named detector is current.
    ///
    /// Unknown names leave the cursor where it was.
    pub fn set_current(&mut self, name: &str) -> Result<(), DetectorNotFound> {
        if !Self::is_known(name) {
            return Err(DetectorNotFound(name.to_string()));
        }
        while self.current().name != name {
            self.advance();
        }
        Ok(())
    }

    pub fn is_known(name: &str) -> bool {
        DETECTORS.iter().any(|d| d.name == name)
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        DETECTORS.iter().map(|d| d.name)
    }
}

impl Default for DetectorCycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pose_tracker_lib::VelocitySample;

    fn window_of(length: usize, rows: &[&[f64]]) -> VelocityWindow {
        let mut window = VelocityWindow::new(length);
        for row in rows {
            let joints = (0..row.len()).map(|i| format!("j{}", i)).collect();
            window.append(VelocitySample::new(joints, row.to_vec()).unwrap());
        }
        window
    }

    #[test]
    fn test_still_requires_all_below() {
        let window = window_of(2, &[&[0.01, 0.02], &[0.05, 0.09]]);
        assert!(Detector::STILL.matches(0.1, &window));
        assert!(!Detector::MOVING.matches(0.1, &window));

        let window = window_of(2, &[&[0.01, 0.02], &[0.05, 0.2]]);
        assert!(!Detector::STILL.matches(0.1, &window));
    }

    #[test]
    fn test_moving_requires_all_above() {
        let window = window_of(2, &[&[0.5, 0.6], &[0.4, 0.7]]);
        assert!(Detector::MOVING.matches(0.1, &window));
        assert!(!Detector::STILL.matches(0.1, &window));

        let window = window_of(2, &[&[0.5, 0.6], &[0.05, 0.7]]);
        assert!(!Detector::MOVING.matches(0.1, &window));
    }

    #[test]
    fn test_threshold_boundary_matches_neither() {
        let window = window_of(3, &[&[0.1, 0.1], &[0.1, 0.1], &[0.1, 0.1]]);
        assert!(!Detector::STILL.matches(0.1, &window));
        assert!(!Detector::MOVING.matches(0.1, &window));
    }

    #[test]
    fn test_cycle_starts_still_and_wraps() {
        let mut cycle = DetectorCycle::new();
        assert_eq!(cycle.current(), Detector::STILL);

        assert_eq!(cycle.advance(), Detector::MOVING);
        assert_eq!(cycle.advance(), Detector::STILL);

        let names: Vec<&str> = (0..5).map(|_| cycle.advance().name).collect();
        assert_eq!(
            names,
            vec![
                MOVING_DETECTOR,
                STILL_DETECTOR,
                MOVING_DETECTOR,
                STILL_DETECTOR,
                MOVING_DETECTOR
            ]
        );
    }

    #[test]
    fn test_current_does_not_advance() {
        let cycle = DetectorCycle::new();
        assert_eq!(cycle.current(), cycle.current());
    }

    #[test]
    fn test_set_current() {
        let mut cycle = DetectorCycle::new();

        cycle.set_current(MOVING_DETECTOR).unwrap();
        assert_eq!(cycle.current(), Detector::MOVING);

        // Already current: no rotation
        cycle.set_current(MOVING_DETECTOR).unwrap();
        assert_eq!(cycle.current(), Detector::MOVING);

        cycle.set_current(STILL_DETECTOR).unwrap();
        assert_eq!(cycle.current(), Detector::STILL);
    }

    #[test]
    fn test_set_current_unknown_keeps_cursor() {
        let mut cycle = DetectorCycle::new();
        cycle.advance();

        let err = cycle.set_current("is_nonexistent_detector").unwrap_err();
        assert_eq!(err, DetectorNotFound("is_nonexistent_detector".to_string()));
        assert_eq!(cycle.current(), Detector::MOVING);
    }

    #[test]
    fn test_known_names() {
        let names: Vec<&str> = DetectorCycle::names().collect();
        assert_eq!(names, vec![STILL_DETECTOR, MOVING_DETECTOR]);
        assert!(DetectorCycle::is_known(STILL_DETECTOR));
        assert!(!DetectorCycle::is_known("still"));
    }
}
