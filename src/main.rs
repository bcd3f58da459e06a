//! Headless demo: measures from the top of a 20 mm cube to the build plate
//! and logs the result.
//!
//! Usage: `measure-pick [options.toml] [--gpu]`

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use glam::Vec3;
use measure_pick::gpu::WgpuBackend;
use measure_pick::input::{InputEvent, MouseButton};
use measure_pick::measure::{
    MeasureTool, MeasurementSnapshot, ToolHost, ToolId,
};
use measure_pick::options::Options;
use measure_pick::renderer::software::SoftwareBackend;
use measure_pick::renderer::RenderBackend;
use measure_pick::scene::{MeshData, Scene, SceneNode};

const VIEWPORT: (u32, u32) = (800, 600);
const SELECT_TOOL: ToolId = ToolId(0);

struct DemoHost;

impl ToolHost for DemoHost {
    fn tools_enabled(&self) -> bool {
        true
    }

    fn activate_tool(&mut self, tool: ToolId) {
        log::info!("host switched to tool {}", tool.0);
    }
}

fn build_scene(options: &Options) -> Scene {
    let mut scene = Scene::new();
    let _ = scene.add_node(SceneNode::new(
        "cube",
        Arc::new(MeshData::cuboid(
            Vec3::new(-10.0, 0.0, -10.0),
            Vec3::new(10.0, 20.0, 10.0),
        )),
    ));
    scene.set_active_camera(Some(options.camera.top_down(VIEWPORT)));
    scene
}

fn click(x: f32, y: f32, shift: bool) -> [InputEvent; 4] {
    [
        InputEvent::ModifiersChanged { shift },
        InputEvent::CursorMoved { x, y },
        InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        },
        InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: false,
        },
    ]
}

fn run_measurement<B: RenderBackend>(
    backend: B,
    options: &Options,
    scene: &Scene,
) {
    let mut tool = MeasureTool::new(backend, options, SELECT_TOOL);
    let _ = tool.subscribe(Box::new(|snapshot: &MeasurementSnapshot| {
        log::debug!(
            "measurement changed: A = {}, B = {}",
            snapshot.point_a,
            snapshot.point_b
        );
    }));
    tool.activate();

    let mut host = DemoHost;
    // A on the cube top, then shift-click B on the plate to the right.
    for event in click(0.0, 0.0, false).into_iter().chain(click(0.3, 0.0, true))
    {
        let _ = tool.handle_input(event, scene, &host);
    }

    if let Some(err) = tool.last_error() {
        log::warn!("last pick failed: {err}");
    }
    log::info!("A = {:.3}", tool.point_a());
    log::info!("B = {:.3}", tool.point_b());
    log::info!(
        "distance = {:.3} ({:.3} mm)",
        tool.distance(),
        tool.distance_length()
    );
    tool.exit(&mut host);
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let mut use_gpu = false;
    let mut options_path = None;
    for arg in std::env::args().skip(1) {
        if arg == "--gpu" {
            use_gpu = true;
        } else {
            options_path = Some(arg);
        }
    }

    let options = match options_path {
        Some(path) => match Options::load(Path::new(&path)) {
            Ok(options) => options,
            Err(e) => {
                log::error!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => Options::default(),
    };
    let scene = build_scene(&options);

    if use_gpu {
        match WgpuBackend::headless() {
            Ok(backend) => {
                run_measurement(backend, &options, &scene);
                return ExitCode::SUCCESS;
            }
            Err(e) => {
                log::warn!("GPU unavailable ({e}), using the CPU rasterizer");
            }
        }
    }
    run_measurement(SoftwareBackend::new(), &options, &scene);
    ExitCode::SUCCESS
}
