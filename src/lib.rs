mod error;
mod instance;
mod system_info;
#[cfg(feature = "enable_tracing")]
mod tracing;

pub use error::*;
pub use instance::{DebugUserData, Instance, InstanceBuilder, WindowTraits};
pub use system_info::{DEBUG_UTILS_EXT_NAME, SystemInfo, VALIDATION_LAYER_NAME};
