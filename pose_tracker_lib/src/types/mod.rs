pub mod config;
pub mod detector_types;
pub mod pose_types;

pub use config::*;
pub use detector_types::*;
pub use pose_types::*;
