use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Full user pose as produced by the pose estimator.
///
/// Joint positions, orientations and confidences are flattened into
/// parallel `columns`/`values` lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseInstance {
    pub columns: Vec<String>,
    pub values: Vec<f64>,
}

impl PoseInstance {
    pub fn new(columns: Vec<String>, values: Vec<f64>) -> Self {
        Self { columns, values }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Per-joint velocity magnitudes as they travel on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JointVelocities {
    pub columns: Vec<String>,
    pub velocities: Vec<f64>,
}

impl JointVelocities {
    pub fn new(columns: Vec<String>, velocities: Vec<f64>) -> Self {
        Self { columns, velocities }
    }
}

/// Reasons a `JointVelocities` message cannot become a `VelocitySample`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SampleError {
    #[error("joint name count ({columns}) doesn't match velocity count ({velocities})")]
    LengthMismatch { columns: usize, velocities: usize },

    #[error("sample has no joints")]
    Empty,

    #[error("joint '{0}' appears more than once")]
    DuplicateJoint(String),
}

/// A validated joint velocity sample: joint name to velocity magnitude,
/// keeping the joint order of the message it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct VelocitySample {
    joints: Vec<String>,
    velocities: Vec<f64>,
}

impl VelocitySample {
    pub fn new(joints: Vec<String>, velocities: Vec<f64>) -> Result<Self, SampleError> {
        if joints.len() != velocities.len() {
            return Err(SampleError::LengthMismatch {
                columns: joints.len(),
                velocities: velocities.len(),
            });
        }

        if joints.is_empty() {
            return Err(SampleError::Empty);
        }

        let mut seen = HashSet::with_capacity(joints.len());
        for joint in &joints {
            if !seen.insert(joint.as_str()) {
                return Err(SampleError::DuplicateJoint(joint.clone()));
            }
        }

        Ok(Self { joints, velocities })
    }

    /// Sample with every given joint at zero velocity.
    pub fn zeroed(joints: &[String]) -> Self {
        Self {
            joints: joints.to_vec(),
            velocities: vec![0.0; joints.len()],
        }
    }

    pub fn joints(&self) -> &[String] {
        &self.joints
    }

    pub fn velocities(&self) -> &[f64] {
        &self.velocities
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn get(&self, joint: &str) -> Option<f64> {
        self.joints
            .iter()
            .position(|j| j == joint)
            .map(|idx| self.velocities[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.joints
            .iter()
            .map(String::as_str)
            .zip(self.velocities.iter().copied())
    }

    /// True if both samples cover exactly the same joints, in any order.
    pub fn same_joints(&self, other: &VelocitySample) -> bool {
        self.len() == other.len() && self.joints.iter().all(|j| other.get(j).is_some())
    }
}

impl TryFrom<JointVelocities> for VelocitySample {
    type Error = SampleError;

    fn try_from(msg: JointVelocities) -> Result<Self, Self::Error> {
        VelocitySample::new(msg.columns, msg.velocities)
    }
}

impl From<&VelocitySample> for JointVelocities {
    fn from(sample: &VelocitySample) -> Self {
        JointVelocities::new(sample.joints.clone(), sample.velocities.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(joints: &[&str]) -> Vec<String> {
        joints.iter().map(|j| j.to_string()).collect()
    }

    #[test]
    fn test_sample_from_message() {
        let msg = JointVelocities::new(names(&["head", "neck"]), vec![0.1, 0.2]);
        let sample = VelocitySample::try_from(msg).unwrap();

        assert_eq!(sample.len(), 2);
        assert_eq!(sample.get("neck"), Some(0.2));
        assert_eq!(sample.get("torso"), None);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let msg = JointVelocities::new(names(&["head", "neck"]), vec![0.1]);
        let err = VelocitySample::try_from(msg).unwrap_err();

        assert_eq!(
            err,
            SampleError::LengthMismatch {
                columns: 2,
                velocities: 1
            }
        );
    }

    #[test]
    fn test_duplicate_joint_rejected() {
        let err = VelocitySample::new(names(&["head", "head"]), vec![0.1, 0.2]).unwrap_err();
        assert_eq!(err, SampleError::DuplicateJoint("head".to_string()));
    }

    #[test]
    fn test_empty_sample_rejected() {
        let err = VelocitySample::try_from(JointVelocities::default()).unwrap_err();
        assert_eq!(err, SampleError::Empty);
    }

    #[test]
    fn test_zeroed_sample() {
        let sample = VelocitySample::zeroed(&names(&["a", "b", "c"]));
        assert_eq!(sample.velocities(), &[0.0, 0.0, 0.0]);
        assert_eq!(sample.joints(), names(&["a", "b", "c"]).as_slice());
    }

    #[test]
    fn test_same_joints_ignores_order() {
        let ab = VelocitySample::new(names(&["a", "b"]), vec![1.0, 2.0]).unwrap();
        let ba = VelocitySample::new(names(&["b", "a"]), vec![2.0, 1.0]).unwrap();
        let ac = VelocitySample::new(names(&["a", "c"]), vec![1.0, 2.0]).unwrap();

        assert!(ab.same_joints(&ba));
        assert!(!ab.same_joints(&ac));
    }

    #[test]
    fn test_message_round_trip_keeps_order() {
        let sample = VelocitySample::new(names(&["b", "a"]), vec![0.9, 0.3]).unwrap();
        let msg = JointVelocities::from(&sample);

        assert_eq!(msg.columns, names(&["b", "a"]));
        assert_eq!(msg.velocities, vec![0.9, 0.3]);
    }
}
