use std::fmt::{Debug, Formatter};
use vulkanalia::loader::{LIBRARY, LibloadingLoader};
use vulkanalia::vk::{EntryV1_0, EntryV1_1};
use vulkanalia::{Entry, vk};

use crate::InstanceError;

pub const VALIDATION_LAYER_NAME: vk::ExtensionName =
    vk::ExtensionName::from_bytes(b"VK_LAYER_KHRONOS_validation");
pub const DEBUG_UTILS_EXT_NAME: vk::ExtensionName = vk::EXT_DEBUG_UTILS_EXTENSION.name;

pub struct SystemInfo {
    pub available_layers: Vec<vk::LayerProperties>,
    pub available_extensions: Vec<vk::ExtensionProperties>,
    pub validation_layers_available: bool,
    pub debug_utils_available: bool,
    pub instance_api_version: u32,
    pub(crate) entry: Entry,
}

impl Debug for SystemInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemInfo")
            .field("available_layers", &self.available_layers)
            .field("available_extensions", &self.available_extensions)
            .field(
                "validation_layers_available",
                &self.validation_layers_available,
            )
            .field("debug_utils_available", &self.debug_utils_available)
            .field("instance_api_version", &self.instance_api_version)
            .finish()
    }
}

fn extension_listed(available: &[vk::ExtensionProperties], name: &vk::ExtensionName) -> bool {
    available.iter().any(|ext| ext.extension_name == *name)
}

fn layer_listed(available: &[vk::LayerProperties], name: &vk::ExtensionName) -> bool {
    available.iter().any(|layer| layer.layer_name == *name)
}

impl SystemInfo {
    #[cfg_attr(feature = "enable_tracing", tracing::instrument)]
    pub fn get_system_info() -> crate::Result<Self> {
        #[cfg(feature = "enable_tracing")]
        tracing::trace!("Loading entry...");
        let loader = unsafe { LibloadingLoader::new(LIBRARY) }?;
        let entry = unsafe { Entry::new(loader) }
            .map_err(|e| InstanceError::VulkanUnavailable(e.to_string()))?;
        #[cfg(feature = "enable_tracing")]
        tracing::trace!("Entry loaded.");

        let available_layers = unsafe { entry.enumerate_instance_layer_properties() }?;
        let validation_layers_available = layer_listed(&available_layers, &VALIDATION_LAYER_NAME);

        let mut available_extensions =
            unsafe { entry.enumerate_instance_extension_properties(None) }?;

        // Extensions implemented by a layer (debug utils may come from the
        // validation layer) count as available too.
        for layer in &available_layers {
            let layer_extensions = unsafe {
                entry.enumerate_instance_extension_properties(Some(layer.layer_name.as_bytes()))
            }?;

            available_extensions.extend_from_slice(&layer_extensions);
        }

        let debug_utils_available = extension_listed(&available_extensions, &DEBUG_UTILS_EXT_NAME);

        #[cfg(feature = "enable_tracing")]
        tracing::trace!(validation_layers_available, debug_utils_available);

        // A 1.0 loader predates vkEnumerateInstanceVersion; treat a failed
        // query as 1.0 instead of failing outright.
        let instance_api_version = unsafe { entry.enumerate_instance_version() }
            .unwrap_or(vulkanalia::Version::V1_0_0.into());

        Ok(Self {
            available_layers,
            available_extensions,
            validation_layers_available,
            debug_utils_available,
            instance_api_version,
            entry,
        })
    }

    pub fn is_extension_available(&self, extension: &vk::ExtensionName) -> crate::Result<bool> {
        Ok(extension_listed(&self.available_extensions, extension))
    }

    pub fn are_extensions_available(
        &self,
        extensions: &[vk::ExtensionName],
    ) -> crate::Result<bool> {
        let mut all_found = true;
        for ext in extensions {
            if !extension_listed(&self.available_extensions, ext) {
                all_found = false;
            }
        }

        Ok(all_found)
    }

    pub fn is_layer_available(&self, layer: vk::ExtensionName) -> crate::Result<bool> {
        Ok(layer_listed(&self.available_layers, &layer))
    }

    pub fn are_layers_available<I: IntoIterator<Item = vk::ExtensionName>>(
        &self,
        layers: I,
    ) -> crate::Result<bool> {
        let mut all_found = true;
        for layer in layers {
            if !layer_listed(&self.available_layers, &layer) {
                all_found = false;
            }
        }

        Ok(all_found)
    }
}
