use std::fs::File;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};
use vulkanalia::vk;
use vulkanalia_kickstart::{Instance, InstanceBuilder};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

#[derive(Default)]
struct App {
    window: Option<Arc<Window>>,
    instance: Option<Arc<Instance>>,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let init = || -> anyhow::Result<(Arc<Window>, Arc<Instance>)> {
            let attributes = WindowAttributes::default()
                .with_title("Vulkan window")
                .with_inner_size(LogicalSize::new(800, 600));
            let window = Arc::new(event_loop.create_window(attributes)?);

            let instance = InstanceBuilder::new(Some(window.clone()))
                .app_name("Vulkan window")
                .engine_name("kickstart")
                .request_validation_layers(true)
                .use_default_tracing_messenger()
                .add_debug_messenger_severity(vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE)
                .build()?;

            Ok((window, instance))
        };

        match init() {
            Ok((window, instance)) => {
                self.window.replace(window);
                self.instance.replace(instance);
            }
            Err(error) => {
                tracing::error!("initialization failed: {error:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                if let Some(instance) = self.instance.take() {
                    instance.destroy();
                }
                self.window.take();

                event_loop.exit();
            }
            _ => (),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let log_file = File::create("out.log")?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(Arc::new(log_file)))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::default();
    event_loop.run_app(&mut app)?;

    Ok(())
}
