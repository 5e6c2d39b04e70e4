use serde::{Deserialize, Serialize};

/// Name of the detector that fires when the user is still.
pub const STILL_DETECTOR: &str = "is_still_detector";
/// Name of the detector that fires when the user is moving.
pub const MOVING_DETECTOR: &str = "is_moving_detector";

/// Requests accepted by the pose detector on its command input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DetectorCommand {
    /// Ask which detector is currently active
    GetCurrentDetector,
    /// Switch to the named detector
    SetDetector { detector_name: String },
}

impl DetectorCommand {
    pub fn set_detector(name: impl Into<String>) -> Self {
        Self::SetDetector {
            detector_name: name.into(),
        }
    }
}

/// Replies sent on the detector response output, one per command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DetectorResponse {
    CurrentDetector { detector_name: String },
    /// `success` is false iff the requested name is not a known detector
    SetDetector { success: bool },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_wire_format() {
        let cmd: DetectorCommand =
            serde_json::from_str(r#"{"type":"SetDetector","detector_name":"is_moving_detector"}"#)
                .unwrap();
        assert_eq!(cmd, DetectorCommand::set_detector(MOVING_DETECTOR));

        let cmd: DetectorCommand =
            serde_json::from_str(r#"{"type":"GetCurrentDetector"}"#).unwrap();
        assert_eq!(cmd, DetectorCommand::GetCurrentDetector);
    }

    #[test]
    fn test_response_wire_format() {
        let json =
            serde_json::to_string(&DetectorResponse::SetDetector { success: false }).unwrap();
        assert_eq!(json, r#"{"type":"SetDetector","success":false}"#);

        let json = serde_json::to_string(&DetectorResponse::CurrentDetector {
            detector_name: STILL_DETECTOR.to_string(),
        })
        .unwrap();
        assert_eq!(
            json,
            r#"{"type":"CurrentDetector","detector_name":"is_still_detector"}"#
        );
    }
}
