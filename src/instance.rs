use crate::system_info::{DEBUG_UTILS_EXT_NAME, SystemInfo, VALIDATION_LAYER_NAME};
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use std::ffi::{self, CString, c_void};
use std::fmt::Debug;
use std::sync::Arc;
use vulkanalia::vk::{self, ExtDebugUtilsExtension, HasBuilder, InstanceV1_0, KhrSurfaceExtension};
use vulkanalia::vk::{AllocationCallbacks, DebugUtilsMessengerEXT};
use vulkanalia::{Version, window as vk_window};

pub trait WindowTraits: HasDisplayHandle + HasWindowHandle + Debug {}
impl<T> WindowTraits for T where T: HasDisplayHandle + HasWindowHandle + Debug {}

/// Owned copy of the strings behind a callback data struct. The raw struct
/// only holds borrowed C pointers, which must not outlive the callback.
pub(crate) struct CallbackPayload {
    pub(crate) message_id_name: String,
    pub(crate) message_id_number: i32,
    pub(crate) message: String,
}

/// Caller must ensure `p_callback_data` points to a valid callback data
/// struct whose string pointers are either null or NUL-terminated.
pub(crate) unsafe fn read_callback_data(
    p_callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT,
) -> CallbackPayload {
    unsafe {
        let callback_data = *p_callback_data;

        let message_id_name = if callback_data.message_id_name.is_null() {
            String::new()
        } else {
            ffi::CStr::from_ptr(callback_data.message_id_name)
                .to_string_lossy()
                .into_owned()
        };

        let message = if callback_data.message.is_null() {
            String::new()
        } else {
            ffi::CStr::from_ptr(callback_data.message)
                .to_string_lossy()
                .into_owned()
        };

        CallbackPayload {
            message_id_name,
            message_id_number: callback_data.message_id_number,
            message,
        }
    }
}

unsafe extern "system" fn vulkan_debug_callback(
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    p_callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT,
    _user_data: *mut std::os::raw::c_void,
) -> vk::Bool32 {
    let data = unsafe { read_callback_data(p_callback_data) };

    println!(
        "{message_severity:?}:\n{message_type:?} [{} ({})] : {}\n",
        data.message_id_name, data.message_id_number, data.message,
    );

    vk::FALSE
}

#[derive(Debug)]
pub struct DebugUserData(*mut c_void);

impl Default for DebugUserData {
    fn default() -> Self {
        Self(std::ptr::null_mut())
    }
}

impl DebugUserData {
    /// Caller must ensure that the data pointer stays valid for as long as
    /// the debug messenger may invoke its callback.
    pub unsafe fn new(data: *mut c_void) -> Self {
        Self(data)
    }

    pub fn into_inner(self) -> *mut c_void {
        self.0
    }
}

/// Assembles the messenger create info that is chained into the instance
/// create info and later used to create the messenger itself.
fn messenger_create_info(
    severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    callback: vk::PFN_vkDebugUtilsMessengerCallbackEXT,
    user_data: *mut c_void,
) -> vk::DebugUtilsMessengerCreateInfoEXTBuilder<'static> {
    let mut info = vk::DebugUtilsMessengerCreateInfoEXT::builder()
        .message_severity(severity)
        .message_type(message_type)
        .user_callback(callback);

    // The generated `user_data` setter takes `&mut T` and stores its
    // address. The payload here is already a raw pointer, so it goes into
    // the field as-is.
    info.user_data = user_data;

    info
}

/// Settles the instance and API versions against what the loader reports.
/// A required version the loader cannot provide fails with the error
/// naming that version; a minimum version only fails when the loader sits
/// below it.
fn negotiate_versions(
    loader_version: Version,
    minimum: Version,
    required: Version,
) -> Result<(Version, Version), crate::InstanceError> {
    let instance_version = if minimum > Version::V1_0_0 || required > Version::V1_0_0 {
        if loader_version < minimum || (minimum == Version::V1_0_0 && loader_version < required) {
            return Err(match required.max(minimum).minor {
                4 => crate::InstanceError::VulkanVersion14Unavailable,
                3 => crate::InstanceError::VulkanVersion13Unavailable,
                2 => crate::InstanceError::VulkanVersion12Unavailable,
                1 => crate::InstanceError::VulkanVersion11Unavailable,
                minor => crate::InstanceError::VulkanVersionUnavailable(format!("1.{minor}")),
            });
        }

        loader_version
    } else {
        Version::V1_0_0
    };

    let api_version = if instance_version < Version::V1_1_0 || required < minimum {
        instance_version
    } else {
        required.max(minimum)
    };

    Ok((instance_version, api_version))
}

#[derive(Debug)]
pub struct InstanceBuilder {
    // VkApplicationInfo
    app_name: String,
    engine_name: String,
    application_version: Version,
    engine_version: Version,
    minimum_instance_version: Version,
    required_instance_version: Version,

    // VkInstanceCreateInfo
    layers: Vec<vk::ExtensionName>,
    extensions: Vec<vk::ExtensionName>,
    flags: vk::InstanceCreateFlags,

    // debug callback
    debug_callback: vk::PFN_vkDebugUtilsMessengerCallbackEXT,
    debug_message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    debug_message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    debug_user_data: DebugUserData,

    // validation checks
    disabled_validation_checks: Vec<vk::ValidationCheckEXT>,
    enabled_validation_features: Vec<vk::ValidationFeatureEnableEXT>,
    disabled_validation_features: Vec<vk::ValidationFeatureDisableEXT>,

    allocation_callbacks: Option<vk::AllocationCallbacks>,

    request_validation_layers: bool,
    enable_validation_layers: bool,
    use_debug_messenger: bool,
    headless_context: bool,

    window: Option<Arc<dyn WindowTraits>>,
}

impl InstanceBuilder {
    pub fn new(window: Option<Arc<dyn WindowTraits>>) -> Self {
        Self {
            app_name: "".to_string(),
            engine_name: "".to_string(),
            application_version: Version::new(0, 0, 0),
            engine_version: Version::new(0, 0, 0),
            minimum_instance_version: Version::V1_0_0,
            required_instance_version: Version::V1_0_0,
            layers: vec![],
            extensions: vec![],
            flags: Default::default(),
            debug_callback: None,
            debug_message_severity: vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
            debug_message_type: vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
            debug_user_data: Default::default(),
            disabled_validation_checks: vec![],
            enabled_validation_features: vec![],
            disabled_validation_features: vec![],
            allocation_callbacks: None,
            request_validation_layers: false,
            enable_validation_layers: false,
            use_debug_messenger: false,
            headless_context: false,
            window,
        }
    }

    pub fn app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }

    pub fn engine_name(mut self, engine_name: impl Into<String>) -> Self {
        self.engine_name = engine_name.into();
        self
    }

    pub fn app_version(mut self, version: Version) -> Self {
        self.application_version = version;
        self
    }

    pub fn engine_version(mut self, version: Version) -> Self {
        self.engine_version = version;
        self
    }

    /// Fails instance creation when the loader cannot provide `version`.
    pub fn require_api_version(mut self, version: Version) -> Self {
        self.required_instance_version = version;
        self
    }

    /// Prefers `version`, but falls back to what the loader offers.
    pub fn minimum_instance_version(mut self, version: Version) -> Self {
        self.minimum_instance_version = version;
        self
    }

    pub fn enable_layer(mut self, layer: vk::ExtensionName) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn enable_extension(mut self, extension: vk::ExtensionName) -> Self {
        self.extensions.push(extension);
        self
    }

    /// Enables the validation layer unconditionally. Instance creation fails
    /// when the layer is not present.
    pub fn enable_validation_layers(mut self, enable: bool) -> Self {
        self.enable_validation_layers = enable;
        self
    }

    /// Enables the validation layer when it is present, and skips it
    /// otherwise.
    pub fn request_validation_layers(mut self, request: bool) -> Self {
        self.request_validation_layers = request;
        self
    }

    pub fn use_default_debug_messenger(mut self) -> Self {
        self.use_debug_messenger = true;
        self.debug_callback = Some(vulkan_debug_callback);
        self
    }

    #[cfg(feature = "enable_tracing")]
    pub fn use_default_tracing_messenger(mut self) -> Self {
        self.use_debug_messenger = true;
        self.debug_callback = Some(crate::tracing::vulkan_tracing_callback);
        self
    }

    pub fn set_debug_messenger(
        mut self,
        callback: vk::PFN_vkDebugUtilsMessengerCallbackEXT,
    ) -> Self {
        self.use_debug_messenger = callback.is_some();
        self.debug_callback = callback;
        self
    }

    pub fn debug_user_data(mut self, debug_user_data: DebugUserData) -> Self {
        self.debug_user_data = debug_user_data;
        self
    }

    /// Skips surface creation, for contexts without a window.
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless_context = headless;
        self
    }

    pub fn debug_messenger_severity(
        mut self,
        severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    ) -> Self {
        self.debug_message_severity = severity;
        self
    }

    pub fn add_debug_messenger_severity(
        mut self,
        severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    ) -> Self {
        self.debug_message_severity |= severity;
        self
    }

    pub fn debug_messenger_type(mut self, message_type: vk::DebugUtilsMessageTypeFlagsEXT) -> Self {
        self.debug_message_type = message_type;
        self
    }

    pub fn add_debug_messenger_type(
        mut self,
        message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    ) -> Self {
        self.debug_message_type |= message_type;
        self
    }

    pub fn enable_validation_feature(mut self, feature: vk::ValidationFeatureEnableEXT) -> Self {
        self.enabled_validation_features.push(feature);
        self
    }

    pub fn disable_validation_feature(mut self, feature: vk::ValidationFeatureDisableEXT) -> Self {
        self.disabled_validation_features.push(feature);
        self
    }

    pub fn disable_validation_check(mut self, check: vk::ValidationCheckEXT) -> Self {
        self.disabled_validation_checks.push(check);
        self
    }

    pub fn allocation_callbacks(mut self, callbacks: vk::AllocationCallbacks) -> Self {
        self.allocation_callbacks = Some(callbacks);
        self
    }

    #[cfg_attr(feature = "enable_tracing", tracing::instrument(skip(self)))]
    pub fn build(self) -> crate::Result<Arc<Instance>> {
        let system_info = SystemInfo::get_system_info()?;

        let (instance_version, api_version) = negotiate_versions(
            Version::from(system_info.instance_api_version),
            self.minimum_instance_version,
            self.required_instance_version,
        )?;

        #[cfg(feature = "enable_tracing")]
        {
            tracing::info!(
                "Instance version: {}.{}.{}",
                instance_version.major,
                instance_version.minor,
                instance_version.patch
            );
            tracing::info!("api_version: {}", api_version);
        }

        let app_name = CString::new(self.app_name).map_err(crate::InstanceError::from)?;
        let engine_name = CString::new(self.engine_name).map_err(crate::InstanceError::from)?;

        let app_info = vk::ApplicationInfo::builder()
            .application_name(app_name.as_bytes_with_nul())
            .application_version(self.application_version.into())
            .engine_name(engine_name.as_bytes_with_nul())
            .engine_version(self.engine_version.into())
            .api_version(api_version.into());

        #[cfg(feature = "enable_tracing")]
        {
            tracing::info!("Creating vkInstance with application info...");
            tracing::debug!(
                r#"
Application info: {{
    name: {:?},
    version: {}.{}.{},
    engine_name: {:?},
    engine_version: {}.{}.{},
    api_version: {}.{}.{},
}}
            "#,
                app_name,
                self.application_version.major,
                self.application_version.minor,
                self.application_version.patch,
                engine_name,
                self.engine_version.major,
                self.engine_version.minor,
                self.engine_version.patch,
                api_version.major,
                api_version.minor,
                api_version.patch,
            )
        }

        let mut enabled_extensions: Vec<vk::ExtensionName> = vec![];
        let mut enabled_layers: Vec<vk::ExtensionName> = vec![];

        enabled_extensions.extend_from_slice(self.extensions.as_slice());

        // The messenger degrades to "not installed" when the debug utils
        // extension is missing, so a loader without the SDK still yields an
        // instance.
        let use_debug_messenger = self.use_debug_messenger
            && self.debug_callback.is_some()
            && system_info.debug_utils_available;

        #[cfg(feature = "enable_tracing")]
        if self.use_debug_messenger && !system_info.debug_utils_available {
            tracing::warn!(
                "Debug messenger requested, but {} is not available",
                DEBUG_UTILS_EXT_NAME
            );
        }

        if use_debug_messenger && !enabled_extensions.contains(&DEBUG_UTILS_EXT_NAME) {
            enabled_extensions.push(DEBUG_UTILS_EXT_NAME);
        }

        let properties2_ext_enabled = api_version < Version::V1_1_0
            && system_info
                .is_extension_available(&vk::KHR_GET_PHYSICAL_DEVICE_PROPERTIES2_EXTENSION.name)?;

        if properties2_ext_enabled {
            enabled_extensions.push(vk::KHR_GET_PHYSICAL_DEVICE_PROPERTIES2_EXTENSION.name);
        }

        #[cfg(feature = "portability")]
        let portability_enumeration_support =
            system_info.is_extension_available(&vk::KHR_PORTABILITY_ENUMERATION_EXTENSION.name)?;
        #[cfg(feature = "portability")]
        if portability_enumeration_support {
            enabled_extensions.push(vk::KHR_PORTABILITY_ENUMERATION_EXTENSION.name);
        }

        if !self.headless_context {
            if let Some(window) = self.window.clone() {
                let surface_extensions: Vec<vk::ExtensionName> =
                    vk_window::get_required_instance_extensions(&window)
                        .into_iter()
                        .map(|ext| **ext)
                        .collect();

                if !system_info.are_extensions_available(&surface_extensions)? {
                    return Err(crate::InstanceError::WindowingExtensionsNotPresent(
                        surface_extensions,
                    )
                    .into());
                };

                for extension in surface_extensions {
                    if !enabled_extensions.contains(&extension) {
                        enabled_extensions.push(extension);
                    }
                }
            }
        }

        #[cfg(feature = "enable_tracing")]
        tracing::trace!(?enabled_extensions);

        let all_extensions_supported = system_info.are_extensions_available(&enabled_extensions)?;
        if !all_extensions_supported {
            return Err(
                crate::InstanceError::RequestedExtensionsNotPresent(enabled_extensions).into(),
            );
        };

        enabled_layers.extend_from_slice(&self.layers);

        if self.enable_validation_layers
            || (self.request_validation_layers && system_info.validation_layers_available)
        {
            if !enabled_layers.contains(&VALIDATION_LAYER_NAME) {
                enabled_layers.push(VALIDATION_LAYER_NAME);
            }
        };

        // Check the full list, not just the user-supplied layers, so a
        // missing validation layer surfaces here as well.
        let all_layers_supported =
            system_info.are_layers_available(enabled_layers.iter().copied())?;

        if !all_layers_supported {
            return Err(crate::InstanceError::RequestedLayersNotPresent(enabled_layers).into());
        };

        #[cfg(feature = "enable_tracing")]
        tracing::trace!(?enabled_layers);

        let instance_create_flags = if cfg!(feature = "portability") {
            self.flags | vk::InstanceCreateFlags::ENUMERATE_PORTABILITY_KHR
        } else {
            self.flags
        };

        let enabled_extension_ptr = enabled_extensions
            .iter()
            .map(|e| e.as_ptr())
            .collect::<Vec<_>>();

        let enabled_layers_ptr = enabled_layers
            .iter()
            .map(|e| e.as_ptr())
            .collect::<Vec<_>>();

        let mut instance_create_info = vk::InstanceCreateInfo::builder()
            .flags(instance_create_flags)
            .application_info(&app_info)
            .enabled_extension_names(&enabled_extension_ptr)
            .enabled_layer_names(&enabled_layers_ptr);

        let mut features = vk::ValidationFeaturesEXT::builder()
            .disabled_validation_features(&self.disabled_validation_features)
            .enabled_validation_features(&self.enabled_validation_features);

        if !self.enabled_validation_features.is_empty()
            || !self.disabled_validation_features.is_empty()
        {
            instance_create_info = instance_create_info.push_next(&mut features);
        };

        let mut checks = vk::ValidationFlagsEXT::builder();
        if !self.disabled_validation_checks.is_empty() {
            checks = checks.disabled_validation_checks(&self.disabled_validation_checks);

            instance_create_info = instance_create_info.push_next(&mut checks);
        };

        // Chaining the messenger info into the instance create info covers
        // vkCreateInstance and vkDestroyInstance themselves, which the
        // messenger proper never sees.
        let mut messenger_info = messenger_create_info(
            self.debug_message_severity,
            self.debug_message_type,
            self.debug_callback,
            self.debug_user_data.into_inner(),
        );

        if use_debug_messenger {
            instance_create_info = instance_create_info.push_next(&mut messenger_info);
        };

        let instance = unsafe {
            system_info
                .entry
                .create_instance(&instance_create_info, self.allocation_callbacks.as_ref())
        }
        .map_err(|_| crate::InstanceError::FailedCreateInstance)?;

        #[cfg(feature = "enable_tracing")]
        tracing::info!("Created vkInstance");

        let mut debug_messenger = None;

        if use_debug_messenger {
            #[cfg(feature = "enable_tracing")]
            tracing::trace!(?self.debug_callback, "Using debug messenger");

            let messenger = unsafe {
                instance.create_debug_utils_messenger_ext(
                    &messenger_info,
                    self.allocation_callbacks.as_ref(),
                )
            };

            match messenger {
                Ok(messenger) => {
                    debug_messenger.replace(messenger);

                    #[cfg(feature = "enable_tracing")]
                    tracing::info!("Created debug messenger");
                }
                Err(_) => {
                    unsafe { instance.destroy_instance(self.allocation_callbacks.as_ref()) };
                    return Err(crate::InstanceError::FailedCreateDebugMessenger.into());
                }
            }
        };

        let mut surface = None;
        if !self.headless_context {
            if let Some(window) = self.window.clone() {
                match unsafe { vk_window::create_surface(&instance, &window, &window) } {
                    Ok(created) => {
                        surface.replace(created);

                        #[cfg(feature = "enable_tracing")]
                        tracing::info!("Created vkSurfaceKhr")
                    }
                    Err(error) => {
                        unsafe {
                            if let Some(messenger) = debug_messenger {
                                instance.destroy_debug_utils_messenger_ext(
                                    messenger,
                                    self.allocation_callbacks.as_ref(),
                                );
                            }
                            instance.destroy_instance(self.allocation_callbacks.as_ref());
                        }
                        return Err(error.into());
                    }
                }
            }
        };

        Ok(Arc::new(Instance {
            instance,
            surface,
            allocation_callbacks: self.allocation_callbacks,
            instance_version,
            api_version,
            properties2_ext_enabled,
            debug_messenger,
            _system_info: system_info,
        }))
    }
}

pub struct Instance {
    pub(crate) instance: vulkanalia::Instance,
    pub(crate) allocation_callbacks: Option<AllocationCallbacks>,
    pub(crate) surface: Option<vk::SurfaceKHR>,
    pub(crate) instance_version: Version,
    pub api_version: Version,
    pub(crate) properties2_ext_enabled: bool,
    pub(crate) debug_messenger: Option<DebugUtilsMessengerEXT>,
    _system_info: SystemInfo,
}

impl Instance {
    /// The instance version the loader reported during creation.
    pub fn instance_version(&self) -> Version {
        self.instance_version
    }

    pub fn surface(&self) -> Option<vk::SurfaceKHR> {
        self.surface
    }

    pub fn debug_messenger(&self) -> Option<DebugUtilsMessengerEXT> {
        self.debug_messenger
    }

    pub fn properties2_ext_enabled(&self) -> bool {
        self.properties2_ext_enabled
    }

    pub fn allocation_callbacks(&self) -> Option<&AllocationCallbacks> {
        self.allocation_callbacks.as_ref()
    }

    /// Destroys the debug messenger, the surface and the instance, in the
    /// reverse of their creation order.
    pub fn destroy(&self) {
        unsafe {
            if let Some(debug_messenger) = self.debug_messenger {
                self.instance.destroy_debug_utils_messenger_ext(
                    debug_messenger,
                    self.allocation_callbacks.as_ref(),
                );

                #[cfg(feature = "enable_tracing")]
                tracing::debug!("Destroyed debug messenger");
            }
            if let Some(surface) = self.surface {
                self.instance
                    .destroy_surface_khr(surface, self.allocation_callbacks.as_ref());

                #[cfg(feature = "enable_tracing")]
                tracing::debug!("Destroyed vkSurfaceKhr");
            }
            self.instance
                .destroy_instance(self.allocation_callbacks.as_ref());

            #[cfg(feature = "enable_tracing")]
            tracing::info!("Destroyed vkInstance");
        }
    }
}

impl AsRef<vulkanalia::Instance> for Instance {
    fn as_ref(&self) -> &vulkanalia::Instance {
        &self.instance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InstanceError;

    #[test]
    fn builder_defaults_match_documented_behavior() {
        let builder = InstanceBuilder::new(None);

        assert_eq!(
            builder.debug_message_severity,
            vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR
        );
        assert_eq!(
            builder.debug_message_type,
            vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE
        );
        assert_eq!(builder.minimum_instance_version, Version::V1_0_0);
        assert_eq!(builder.required_instance_version, Version::V1_0_0);
        assert!(builder.layers.is_empty());
        assert!(builder.extensions.is_empty());
        assert!(builder.debug_callback.is_none());
        assert!(!builder.use_debug_messenger);
        assert!(!builder.enable_validation_layers);
        assert!(!builder.request_validation_layers);
        assert!(!builder.headless_context);
    }

    #[test]
    fn severity_and_type_setters_accumulate() {
        let builder = InstanceBuilder::new(None)
            .add_debug_messenger_severity(vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE)
            .add_debug_messenger_type(vk::DebugUtilsMessageTypeFlagsEXT::DEVICE_ADDRESS_BINDING);

        assert_eq!(
            builder.debug_message_severity,
            vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE
                | vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR
        );
        assert!(
            builder
                .debug_message_type
                .contains(vk::DebugUtilsMessageTypeFlagsEXT::DEVICE_ADDRESS_BINDING)
        );
    }

    #[test]
    fn severity_setter_replaces() {
        let builder = InstanceBuilder::new(None)
            .debug_messenger_severity(vk::DebugUtilsMessageSeverityFlagsEXT::INFO);

        assert_eq!(
            builder.debug_message_severity,
            vk::DebugUtilsMessageSeverityFlagsEXT::INFO
        );
    }

    #[test]
    fn default_messenger_installs_callback() {
        let builder = InstanceBuilder::new(None).use_default_debug_messenger();

        assert!(builder.use_debug_messenger);
        assert!(builder.debug_callback.is_some());
    }

    #[test]
    fn clearing_the_messenger_disables_it() {
        let builder = InstanceBuilder::new(None)
            .use_default_debug_messenger()
            .set_debug_messenger(None);

        assert!(!builder.use_debug_messenger);
        assert!(builder.debug_callback.is_none());
    }

    #[test]
    fn layers_and_extensions_accumulate() {
        let builder = InstanceBuilder::new(None)
            .enable_layer(vk::ExtensionName::from_bytes(b"VK_LAYER_LUNARG_api_dump"))
            .enable_extension(DEBUG_UTILS_EXT_NAME)
            .headless(true);

        assert_eq!(builder.layers.len(), 1);
        assert_eq!(builder.extensions.len(), 1);
        assert!(builder.headless_context);
    }

    #[test]
    fn negotiation_names_the_minor_version_the_loader_lacks() {
        for (required, expected) in [
            (Version::V1_1_0, InstanceError::VulkanVersion11Unavailable),
            (Version::new(1, 2, 0), InstanceError::VulkanVersion12Unavailable),
            (Version::new(1, 3, 0), InstanceError::VulkanVersion13Unavailable),
            (Version::new(1, 4, 0), InstanceError::VulkanVersion14Unavailable),
        ] {
            let result = negotiate_versions(Version::V1_0_0, Version::V1_0_0, required);

            assert_eq!(result.unwrap_err(), expected);
        }
    }

    #[test]
    fn negotiation_reports_unknown_minors_generically() {
        let result = negotiate_versions(Version::V1_0_0, Version::V1_0_0, Version::new(1, 5, 0));

        assert_eq!(
            result.unwrap_err(),
            InstanceError::VulkanVersionUnavailable("1.5".to_string())
        );
    }

    #[test]
    fn negotiation_honors_the_minimum_version() {
        let result = negotiate_versions(Version::V1_0_0, Version::new(1, 2, 0), Version::V1_0_0);

        assert_eq!(result.unwrap_err(), InstanceError::VulkanVersion12Unavailable);
    }

    #[test]
    fn negotiation_settles_on_the_highest_requested_version() {
        let (instance_version, api_version) =
            negotiate_versions(Version::new(1, 3, 250), Version::V1_1_0, Version::new(1, 2, 0))
                .unwrap();

        assert_eq!(instance_version, Version::new(1, 3, 250));
        assert_eq!(api_version, Version::new(1, 2, 0));
    }

    #[test]
    fn minimum_version_tracks_the_loader_when_it_is_newer() {
        let (instance_version, api_version) =
            negotiate_versions(Version::new(1, 2, 131), Version::V1_1_0, Version::V1_0_0)
                .unwrap();

        assert_eq!(instance_version, Version::new(1, 2, 131));
        assert_eq!(api_version, Version::new(1, 2, 131));
    }

    #[test]
    fn negotiation_without_version_requests_stays_at_vulkan_1_0() {
        let (instance_version, api_version) =
            negotiate_versions(Version::new(1, 3, 0), Version::V1_0_0, Version::V1_0_0).unwrap();

        assert_eq!(instance_version, Version::V1_0_0);
        assert_eq!(api_version, Version::V1_0_0);
    }

    #[test]
    fn messenger_info_carries_the_user_pointer_by_value() {
        let mut token = 0u64;
        let pointer = &mut token as *mut u64 as *mut c_void;

        let info = messenger_create_info(
            vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
            vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION,
            Some(vulkan_debug_callback),
            pointer,
        );

        assert_eq!(info.user_data, pointer);
        assert!(info.user_callback.is_some());
        assert_eq!(
            info.message_severity,
            vk::DebugUtilsMessageSeverityFlagsEXT::ERROR
        );
    }

    #[test]
    fn callback_payload_copies_the_messages() {
        let message_id_name = CString::new("VUID-vkCreateInstance-ppEnabledLayerNames").unwrap();
        let message = CString::new("layer not found").unwrap();

        let callback_data = vk::DebugUtilsMessengerCallbackDataEXT {
            message_id_name: message_id_name.as_ptr(),
            message_id_number: 7,
            message: message.as_ptr(),
            ..Default::default()
        };

        let payload = unsafe { read_callback_data(&callback_data) };

        assert_eq!(
            payload.message_id_name,
            "VUID-vkCreateInstance-ppEnabledLayerNames"
        );
        assert_eq!(payload.message_id_number, 7);
        assert_eq!(payload.message, "layer not found");
    }

    #[test]
    fn callback_payload_tolerates_null_strings() {
        let callback_data = vk::DebugUtilsMessengerCallbackDataEXT::default();

        let payload = unsafe { read_callback_data(&callback_data) };

        assert!(payload.message_id_name.is_empty());
        assert!(payload.message.is_empty());
    }

    #[test]
    fn default_callback_never_requests_an_abort() {
        let callback_data = vk::DebugUtilsMessengerCallbackDataEXT::default();

        let result = unsafe {
            vulkan_debug_callback(
                vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
                vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION,
                &callback_data,
                std::ptr::null_mut(),
            )
        };

        assert_eq!(result, vk::FALSE);
    }
}
