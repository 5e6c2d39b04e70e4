use pose_tracker_lib::{
    DetectorCommand, DetectorConfig, DetectorResponse, JointVelocities, PoseInstance,
    VelocitySample,
};
use tracing::{debug, info};

use crate::detector::{Detector, DetectorCycle, DetectorKind, DetectorNotFound};
use crate::window::VelocityWindow;

/// Publication produced by a confirmed detector transition
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// User became still: carries the cached pose
    UserPose(PoseInstance),
    /// User started moving: carries the latest velocity sample
    UserMoving(JointVelocities),
}

impl Transition {
    /// Value published on the "is user moving" output alongside this transition
    pub fn is_moving(&self) -> bool {
        matches!(self, Transition::UserMoving(_))
    }
}

/// Decides whether the user is still or moving and reports each change once.
///
/// Every handler runs to completion and performs no I/O; the caller owns
/// the instance and feeds it one event at a time.
///
/// Example:
///   1. User is moving
///   2. User stops                 -> `Transition::UserPose`
///   3. User stays stopped         -> nothing
///   4. User starts moving         -> `Transition::UserMoving`
///   5. User stops again           -> `Transition::UserPose`
pub struct PoseDetector {
    threshold: f64,
    window: VelocityWindow,
    pose: PoseInstance,
    cycle: DetectorCycle,
}

impl PoseDetector {
    pub fn new(config: &DetectorConfig) -> Result<Self, DetectorNotFound> {
        let mut cycle = DetectorCycle::new();
        cycle.set_current(&config.initial_detector)?;

        Ok(Self {
            threshold: config.movement_threshold,
            window: VelocityWindow::new(config.window_length),
            pose: PoseInstance::default(),
            cycle,
        })
    }

    /// Store the latest pose
    pub fn on_pose_event(&mut self, pose: PoseInstance) {
        self.pose = pose;
    }

    /// Add a velocity sample and check the current detector once the
    /// window is full. Returns what to publish if the detector fired.
    pub fn on_velocity_event(&mut self, sample: VelocitySample) -> Option<Transition> {
        self.window.append(sample);

        if !self.window.is_full() {
            debug!(
                "Window pending: {}/{} samples",
                self.window.len(),
                self.window.capacity()
            );
            return None;
        }

        let detector = self.cycle.current();
        if !detector.matches(self.threshold, &self.window) {
            return None;
        }

        let transition = self.publication(detector);
        self.change_detector();
        Some(transition)
    }

    pub fn current_detector_name(&self) -> &'static str {
        self.cycle.current().name
    }

    /// Switch to the named detector and start a fresh window.
    pub fn set_detector(&mut self, name: &str) -> Result<(), DetectorNotFound> {
        self.cycle.set_current(name)?;
        self.window.reset();
        info!("Changing detector to: {}", self.current_detector_name());
        Ok(())
    }

    pub fn handle_command(&mut self, command: DetectorCommand) -> DetectorResponse {
        match command {
            DetectorCommand::GetCurrentDetector => DetectorResponse::CurrentDetector {
                detector_name: self.current_detector_name().to_string(),
            },
            DetectorCommand::SetDetector { detector_name } => DetectorResponse::SetDetector {
                success: self.set_detector(&detector_name).is_ok(),
            },
        }
    }

    #[cfg(test)]
    pub fn window(&self) -> &VelocityWindow {
        &self.window
    }

    fn publication(&self, detector: Detector) -> Transition {
        match detector.kind {
            DetectorKind::Still => Transition::UserPose(self.pose.clone()),
            DetectorKind::Moving => {
                Transition::UserMoving(JointVelocities::from(&self.window.latest()))
            }
        }
    }

    fn change_detector(&mut self) {
        let next = self.cycle.advance();
        self.window.reset();
        info!("Changing detector to: {}", next.name);
    }
}
