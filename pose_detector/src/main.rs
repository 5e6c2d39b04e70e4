use dora_node_api::arrow::array::{Array, BinaryArray};
use dora_node_api::{dora_core::config::DataId, DoraNode, Event};
use eyre::{Context, Result};
use pose_tracker_lib::{
    init_tracing, DetectorCommand, DetectorConfig, DetectorResponse, JointVelocities,
    PoseInstance, VelocitySample,
};
use serde::{de::DeserializeOwned, Serialize};
use std::any::Any;
use tracing::{debug, info, warn};

mod detector;
mod state_machine;
mod window;

use detector::DetectorCycle;
use state_machine::{PoseDetector, Transition};

/// Dataflow output ids
struct Outputs {
    user_pose: DataId,
    user_moving: DataId,
    is_user_moving: DataId,
    detector_response: DataId,
}

impl Outputs {
    fn new() -> Self {
        Self {
            user_pose: DataId::from("user_pose".to_owned()),
            user_moving: DataId::from("user_moving".to_owned()),
            is_user_moving: DataId::from("is_user_moving".to_owned()),
            detector_response: DataId::from("detector_response".to_owned()),
        }
    }
}

/// First element of a single-row binary input
fn binary_payload(data: &dyn Any) -> Option<&[u8]> {
    let array = data.downcast_ref::<BinaryArray>()?;
    if array.is_empty() {
        return None;
    }
    Some(array.value(0))
}

fn decode<T: DeserializeOwned>(input: &str, data: &dyn Any) -> Option<T> {
    let Some(bytes) = binary_payload(data) else {
        warn!("Failed to cast {} to BinaryArray", input);
        return None;
    };
    decode_json(input, bytes)
}

fn decode_json<T: DeserializeOwned>(input: &str, bytes: &[u8]) -> Option<T> {
    match serde_json::from_slice(bytes) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Failed to deserialize {}: {}", input, e);
            None
        }
    }
}

/// Decode a `joint_velocities` payload and feed it to the detector.
///
/// Payloads that fail to decode or validate are dropped before they reach
/// the window.
fn handle_velocity_input(detector: &mut PoseDetector, bytes: &[u8]) -> Option<Transition> {
    let msg = decode_json::<JointVelocities>("joint_velocities", bytes)?;
    debug!("Joint velocities received: {:?}", msg);

    let sample = match VelocitySample::try_from(msg) {
        Ok(sample) => sample,
        Err(e) => {
            warn!("Rejected joint velocities: {}", e);
            return None;
        }
    };

    detector.on_velocity_event(sample)
}

fn send_json<T: Serialize>(node: &mut DoraNode, output: &DataId, value: &T) -> Result<()> {
    let serialized = serde_json::to_vec(value)?;
    let arrow_data = BinaryArray::from_vec(vec![serialized.as_slice()]);
    node.send_output(output.clone(), Default::default(), arrow_data)?;
    Ok(())
}

fn publish_transition(
    node: &mut DoraNode,
    outputs: &Outputs,
    transition: &Transition,
) -> Result<()> {
    match transition {
        Transition::UserPose(pose) => {
            send_json(node, &outputs.user_pose, pose)?;
            debug!("Published user pose: {:?}", pose);
        }
        Transition::UserMoving(velocities) => {
            send_json(node, &outputs.user_moving, velocities)?;
            debug!("Published user moving: {:?}", velocities);
        }
    }

    let is_moving = transition.is_moving();
    send_json(node, &outputs.is_user_moving, &is_moving)?;
    debug!("Publishing Is User Moving: {}", is_moving);
    Ok(())
}

fn main() -> Result<()> {
    let _guard = init_tracing();

    info!("Initializing pose_detector node...");

    let config = DetectorConfig::load().wrap_err("Couldn't load parameters")?;

    info!("Configuration:");
    info!("  Window length: {} samples", config.window_length);
    info!("  Movement threshold: {}", config.movement_threshold);
    info!("  Initial detector: {}", config.initial_detector);
    info!(
        "  Known detectors: {}",
        DetectorCycle::names().collect::<Vec<_>>().join(", ")
    );

    let mut detector = PoseDetector::new(&config)?;
    let outputs = Outputs::new();

    let (mut node, mut events) = DoraNode::init_from_env()?;
    info!("Dora node initialized");

    // Events are handled one at a time, so the detector never sees
    // interleaved updates.
    while let Some(event) = events.recv() {
        match event {
            Event::Input { id, data, .. } => match id.as_str() {
                "pose_instance" => {
                    let Some(pose) = decode::<PoseInstance>("pose_instance", data.as_any()) else {
                        continue;
                    };
                    debug!("Instance received: {:?}", pose);
                    detector.on_pose_event(pose);
                }
                "joint_velocities" => {
                    let Some(bytes) = binary_payload(data.as_any()) else {
                        warn!("Failed to cast joint_velocities to BinaryArray");
                        continue;
                    };
                    if let Some(transition) = handle_velocity_input(&mut detector, bytes) {
                        publish_transition(&mut node, &outputs, &transition)?;
                    }
                }
                "detector_command" => {
                    let Some(command) =
                        decode::<DetectorCommand>("detector_command", data.as_any())
                    else {
                        continue;
                    };
                    debug!("Received detector command: {:?}", command);

                    let response = detector.handle_command(command);
                    if let DetectorResponse::SetDetector { success: false } = response {
                        warn!("Detector not changed: unknown detector name");
                    }
                    send_json(&mut node, &outputs.detector_response, &response)?;
                }
                other => {
                    warn!("Received unexpected input: {}", other);
                }
            },
            Event::InputClosed { id } => {
                info!("Input {} closed", id);
            }
            Event::Stop(_) => {
                info!("Received stop signal");
                break;
            }
            other => {
                debug!("Received other event: {:?}", other);
            }
        }
    }

    info!("Shutting down pose_detector node.");
    Ok(())
}
