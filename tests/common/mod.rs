//! Fixtures shared by the integration tests.

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use glam::{DVec3, Vec3};
use measure_pick::camera::Camera;
use measure_pick::codec::{self, Axis};
use measure_pick::error::PassError;
use measure_pick::measure::{MeasureTool, MeasurementSnapshot, ToolHost, ToolId};
use measure_pick::options::Options;
use measure_pick::renderer::{DrawCall, RenderBackend};
use measure_pick::scene::{MeshData, Scene, SceneNode};

/// Viewport used by every fixture camera.
pub const VIEWPORT: (u32, u32) = (800, 600);

/// Fallback tool handed to tools under test.
pub const FALLBACK: ToolId = ToolId(7);

/// Target of [`ScriptedBackend`]: remembers which axis was drawn into it.
#[derive(Debug)]
pub struct ScriptedTarget {
    width: u32,
    height: u32,
    axis: Option<Axis>,
}

/// Backend whose "rendered" pixels are scripted per axis, counting calls.
#[derive(Debug)]
pub struct ScriptedBackend {
    /// Packed `0xAARRGGBB` word every in-bounds pixel of each axis reads as.
    pub values: [u32; 3],
    /// Number of draws served.
    pub draws: usize,
    /// Number of program compilations attempted.
    pub compiles: usize,
    /// Number of targets created.
    pub targets_created: usize,
    /// Size of the most recently created target.
    pub last_target_size: Option<(u32, u32)>,
    /// Compilations left to fail with a shader error.
    pub failing_compiles: usize,
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedBackend {
    /// Every axis reads as background.
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: [codec::SENTINEL_HIGH; 3],
            draws: 0,
            compiles: 0,
            targets_created: 0,
            last_target_size: None,
            failing_compiles: 0,
        }
    }

    /// Make every pixel decode to `point`.
    pub fn set_point(&mut self, point: DVec3) {
        for axis in Axis::ALL {
            self.set_mm(axis, axis.component(point));
        }
    }

    /// Make one axis decode to `value_mm`.
    pub fn set_mm(&mut self, axis: Axis, value_mm: f64) {
        let encoded = codec::encode_mm(value_mm);
        self.set_raw(axis, codec::from_rgba8(codec::to_rgba8(encoded, 255)));
    }

    /// Set one axis to a raw packed word.
    pub fn set_raw(&mut self, axis: Axis, word: u32) {
        self.values[axis.index() as usize] = word;
    }

    /// Make every axis read as background.
    pub fn clear(&mut self) {
        self.values = [codec::SENTINEL_HIGH; 3];
    }
}

impl RenderBackend for ScriptedBackend {
    type Program = ();
    type Target = ScriptedTarget;

    fn compile_coordinate_program(&mut self) -> Result<(), PassError> {
        self.compiles += 1;
        if self.failing_compiles > 0 {
            self.failing_compiles -= 1;
            return Err(PassError::Shader("scripted failure".into()));
        }
        Ok(())
    }

    fn create_target(
        &mut self,
        width: u32,
        height: u32,
    ) -> Result<ScriptedTarget, PassError> {
        self.targets_created += 1;
        self.last_target_size = Some((width, height));
        Ok(ScriptedTarget {
            width,
            height,
            axis: None,
        })
    }

    fn draw(
        &mut self,
        target: &mut ScriptedTarget,
        _program: &(),
        call: &DrawCall<'_>,
    ) -> Result<(), PassError> {
        self.draws += 1;
        target.axis = Some(call.uniforms.axis);
        Ok(())
    }

    fn read_pixel(&self, target: &ScriptedTarget, x: u32, y: u32) -> Option<u32> {
        if x >= target.width || y >= target.height {
            return None;
        }
        let axis = target.axis?;
        Some(self.values[axis.index() as usize])
    }
}

/// Host whose tools-enabled flag can be flipped, recording tool switches.
#[derive(Debug)]
pub struct TestHost {
    /// Reported by [`ToolHost::tools_enabled`].
    pub enabled: bool,
    /// Every tool activated through the host.
    pub activated: Vec<ToolId>,
}

impl TestHost {
    /// Host with tools enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            enabled: true,
            activated: Vec::new(),
        }
    }
}

impl ToolHost for TestHost {
    fn tools_enabled(&self) -> bool {
        self.enabled
    }

    fn activate_tool(&mut self, tool: ToolId) {
        self.activated.push(tool);
    }
}

/// Orthographic camera 500 mm above the origin looking down -Y, +Z toward
/// the bottom of the screen, 200 mm visible vertically.
#[must_use]
pub fn top_down_camera() -> Camera {
    Camera::orthographic(
        Vec3::new(0.0, 500.0, 0.0),
        Vec3::ZERO,
        Vec3::NEG_Z,
        100.0,
        VIEWPORT,
    )
}

/// Scene with one 400 x 400 mm plane at Y = 0 seen by `camera`.
#[must_use]
pub fn plane_scene(camera: Camera) -> Scene {
    let mut scene = Scene::new();
    let _ = scene.add_node(SceneNode::new(
        "plane",
        Arc::new(MeshData::plane(400.0, 400.0)),
    ));
    scene.set_active_camera(Some(camera));
    scene
}

/// An active tool over a scripted backend.
#[must_use]
pub fn scripted_tool(options: &Options) -> MeasureTool<ScriptedBackend> {
    let mut tool = MeasureTool::new(ScriptedBackend::new(), options, FALLBACK);
    tool.activate();
    tool
}

/// Subscribe a counter to `tool`'s change notifications.
pub fn count_notifications<B: RenderBackend>(
    tool: &mut MeasureTool<B>,
) -> Rc<Cell<usize>> {
    let count = Rc::new(Cell::new(0));
    let counter = Rc::clone(&count);
    let _ = tool.subscribe(Box::new(move |_: &MeasurementSnapshot| {
        counter.set(counter.get() + 1);
    }));
    count
}
