use pose_tracker_lib::VelocitySample;
use std::collections::VecDeque;

/// Fixed-length window of joint velocity samples, evaluated as a batch.
///
/// Once full, further appends slide the window: the oldest sample is
/// dropped so the length never exceeds the configured length.
pub struct VelocityWindow {
    samples: VecDeque<VelocitySample>,
    length: usize,
    // Joints of the most recently appended sample, kept across resets
    known_joints: Vec<String>,
}

impl VelocityWindow {
    pub fn new(length: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(length),
            length,
            known_joints: Vec::new(),
        }
    }

    pub fn append(&mut self, sample: VelocitySample) {
        if self.is_full() {
            self.samples.pop_front();
        }
        if self.known_joints.as_slice() != sample.joints() {
            self.known_joints = sample.joints().to_vec();
        }
        self.samples.push_back(sample);
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() == self.length
    }

    pub fn reset(&mut self) {
        self.samples.clear();
    }

    /// Most recent sample, or an all-zero sample over the known joints
    /// when the window is empty.
    pub fn latest(&self) -> VelocitySample {
        match self.samples.back() {
            Some(sample) => sample.clone(),
            None => VelocitySample::zeroed(&self.known_joints),
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.length
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &VelocitySample> {
        self.samples.iter()
    }

    /// True if every sample covers the same joints as the first one.
    pub fn has_uniform_joints(&self) -> bool {
        match self.samples.front() {
            Some(first) => self.samples.iter().all(|s| s.same_joints(first)),
            None => true,
        }
    }

    /// True if the window holds at least one velocity and every velocity
    /// satisfies `pred`. Windows mixing joint sets never match, since a
    /// missing joint has no value to compare.
    pub fn all_velocities(&self, pred: impl Fn(f64) -> bool) -> bool {
        let mut velocities = self
            .samples
            .iter()
            .flat_map(|s| s.velocities().iter().copied())
            .peekable();

        velocities.peek().is_some() && self.has_uniform_joints() && velocities.all(pred)
    }
}
