use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};
use vulkanalia::vk::{self, ExtDebugUtilsExtension, HasBuilder};
use vulkanalia_kickstart::InstanceBuilder;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let instance = InstanceBuilder::new(None)
        .app_name("Headless")
        .engine_name("kickstart")
        .request_validation_layers(true)
        .use_default_tracing_messenger()
        .add_debug_messenger_severity(
            vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE
                | vk::DebugUtilsMessageSeverityFlagsEXT::INFO,
        )
        .headless(true)
        .build()?;

    tracing::info!(
        "negotiated instance version {}, api version {}",
        instance.instance_version(),
        instance.api_version
    );

    if instance.debug_messenger().is_some() {
        let callback_data = vk::DebugUtilsMessengerCallbackDataEXT::builder()
            .message_id_name(b"HeadlessSelfTest\0")
            .message_id_number(0)
            .message(b"debug messenger round trip\0");

        let handle: &vulkanalia::Instance = (*instance).as_ref();
        unsafe {
            handle.submit_debug_utils_message_ext(
                vk::DebugUtilsMessageSeverityFlagsEXT::INFO,
                vk::DebugUtilsMessageTypeFlagsEXT::GENERAL,
                &callback_data,
            )
        };
    }

    instance.destroy();

    Ok(())
}
