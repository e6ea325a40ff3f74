use thiserror::Error;
use vulkanalia::vk;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Instance error: {0}")]
    Instance(#[from] InstanceError),
    #[error("Vulkan library loading error: {0}")]
    Loading(#[from] libloading::Error),
    #[error("Vulkan error: {0}")]
    Vulkan(#[from] vk::ErrorCode),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum InstanceError {
    #[error("Vulkan unavailable: {0}")]
    VulkanUnavailable(String),
    #[error("Vulkan version {0} unavailable")]
    VulkanVersionUnavailable(String),
    #[error("Vulkan 1.1 unavailable")]
    VulkanVersion11Unavailable,
    #[error("Vulkan 1.2 unavailable")]
    VulkanVersion12Unavailable,
    #[error("Vulkan 1.3 unavailable")]
    VulkanVersion13Unavailable,
    #[error("Vulkan 1.4 unavailable")]
    VulkanVersion14Unavailable,
    #[error("Failed to create instance")]
    FailedCreateInstance,
    #[error("Failed to create debug messenger")]
    FailedCreateDebugMessenger,
    #[error("Application or engine name contains a NUL byte: {0}")]
    NameContainsNul(#[from] std::ffi::NulError),
    #[error("Failed to find requested layers: {0:#?}")]
    RequestedLayersNotPresent(Vec<vk::ExtensionName>),
    #[error("Failed to find requested extensions: {0:#?}")]
    RequestedExtensionsNotPresent(Vec<vk::ExtensionName>),
    #[error("Failed to find windowing extensions: {0:#?}")]
    WindowingExtensionsNotPresent(Vec<vk::ExtensionName>),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_layer_error_names_the_layer() {
        let err = InstanceError::RequestedLayersNotPresent(vec![vk::ExtensionName::from_bytes(
            b"VK_LAYER_KHRONOS_validation",
        )]);
        let rendered = err.to_string();
        assert!(rendered.contains("requested layers"));
        assert!(rendered.contains("VK_LAYER_KHRONOS_validation"));
    }

    #[test]
    fn instance_error_converts_into_top_level_error() {
        let err = Error::from(InstanceError::FailedCreateInstance);
        assert_eq!(err.to_string(), "Instance error: Failed to create instance");
    }
}
