use vulkanalia::vk;
use vulkanalia::vk::DebugUtilsMessageSeverityFlagsEXT;

use crate::instance::read_callback_data;

pub unsafe extern "system" fn vulkan_tracing_callback(
    message_severity: DebugUtilsMessageSeverityFlagsEXT,
    _message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    p_callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT,
    _user_data: *mut std::os::raw::c_void,
) -> vk::Bool32 {
    let data = unsafe { read_callback_data(p_callback_data) };
    let message_id_name = data.message_id_name;
    let message_id_number = data.message_id_number;
    let message = data.message;

    if message_severity >= DebugUtilsMessageSeverityFlagsEXT::ERROR {
        tracing::error!("[{message_id_name} ({message_id_number})]: {message}");
    } else if message_severity >= DebugUtilsMessageSeverityFlagsEXT::WARNING {
        tracing::warn!("[{message_id_name} ({message_id_number})]: {message}");
    } else if message_severity >= DebugUtilsMessageSeverityFlagsEXT::INFO {
        tracing::info!("[{message_id_name} ({message_id_number})]: {message}");
    } else {
        tracing::trace!("[{message_id_name} ({message_id_number})]: {message}");
    }

    vk::FALSE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracing_callback_never_requests_an_abort() {
        let callback_data = vk::DebugUtilsMessengerCallbackDataEXT::default();

        let result = unsafe {
            vulkan_tracing_callback(
                DebugUtilsMessageSeverityFlagsEXT::WARNING,
                vk::DebugUtilsMessageTypeFlagsEXT::GENERAL,
                &callback_data,
                std::ptr::null_mut(),
            )
        };

        assert_eq!(result, vk::FALSE);
    }

    #[test]
    fn severity_flags_order_from_verbose_to_error() {
        use vulkanalia::vk::DebugUtilsMessageSeverityFlagsEXT as Severity;

        // The callback's threshold chain relies on this ordering.
        assert!(Severity::ERROR > Severity::WARNING);
        assert!(Severity::WARNING > Severity::INFO);
        assert!(Severity::INFO > Severity::VERBOSE);
    }
}
