use anyhow::Result;
use winit::dpi::LogicalSize;

use linefield_engine::device::GpuInit;
use linefield_engine::logging::{init_logging, LoggingConfig};
use linefield_engine::window::{Runtime, RuntimeConfig};

mod viewer;

use viewer::{Viewer, ViewerConfig};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = ViewerConfig::default();
    log::info!(
        "scene: {} circles x {} segments = {} line vertices per frame",
        config.scene.centers(),
        config.scene.circle_resolution,
        config.scene.vertex_demand()
    );
    log::info!("keys: E toggles quad expansion, C cycles expansion color, Esc quits");

    Runtime::run(
        RuntimeConfig {
            title: "linefield".to_string(),
            initial_size: LogicalSize::new(1024.0, 1024.0),
        },
        GpuInit::default(),
        Viewer::new(config),
    )
}
