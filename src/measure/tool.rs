use glam::{DVec3, Vec2};

use super::observer::{ChangeCallback, Observers, SubscriptionId};
use super::projection;
use super::state::{ActivePoint, Measurement, MeasurementSnapshot};
use crate::error::PassError;
use crate::input::{InputEvent, PointerAction, PointerState};
use crate::options::Options;
use crate::renderer::coordinate::{PassGroup, PassSettings};
use crate::renderer::RenderBackend;
use crate::scene::{ChangeOrigin, Scene};

/// Identifier of a host tool, handed to [`ToolHost::activate_tool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToolId(pub u32);

/// The host's active-tool manager, as seen by the measure tool.
pub trait ToolHost {
    /// Whether tools may currently react to input (e.g. not while a modal
    /// operation runs).
    fn tools_enabled(&self) -> bool;

    /// Make `tool` the active tool.
    fn activate_tool(&mut self, tool: ToolId);
}

/// Where the tool is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolState {
    /// Not the active tool; input is ignored.
    Inactive,
    /// Active, no coordinate passes built yet (or discarded by a resize or a
    /// failed build).
    ActiveNoPasses,
    /// Active with passes that match the scene; picks decode directly.
    ActiveReady,
    /// Active with stale passes; the next pick re-renders first.
    ActiveDirty,
}

/// Two-point measurement tool driven by coordinate-pass picks.
///
/// Each pick renders (when stale) the X, Y and Z passes through `backend`,
/// decodes the pixel under the cursor on all three and writes the resulting
/// point into the active measurement slot. Observers are called
/// synchronously after every change.
pub struct MeasureTool<B: RenderBackend> {
    backend: B,
    options: Options,
    settings: PassSettings,
    fallback: ToolId,
    active: bool,
    passes: Option<PassGroup<B>>,
    dirty: bool,
    measurement: Measurement,
    pointer: PointerState,
    observers: Observers,
    last_error: Option<PassError>,
}

impl<B: RenderBackend> MeasureTool<B> {
    /// Create an inactive tool. `fallback` is the tool the host switches to
    /// on [`MeasureTool::exit`].
    pub fn new(backend: B, options: &Options, fallback: ToolId) -> Self {
        Self {
            backend,
            options: options.clone(),
            settings: PassSettings::from_options(
                &options.picking,
                &options.build_plate,
            ),
            fallback,
            active: false,
            passes: None,
            dirty: true,
            measurement: Measurement::new(),
            pointer: PointerState::new(),
            observers: Observers::new(),
            last_error: None,
        }
    }

    // ── Lifecycle ──

    /// Make the tool react to input. Passes are built lazily on the first
    /// pick.
    pub fn activate(&mut self) {
        self.active = true;
        log::debug!("measure tool activated ({:?})", self.state());
    }

    /// Stop reacting to input. The measurement is kept.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.pointer.reset();
    }

    /// Deactivate and hand control to the fallback tool.
    pub fn exit(&mut self, host: &mut dyn ToolHost) {
        self.deactivate();
        host.activate_tool(self.fallback);
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ToolState {
        if !self.active {
            ToolState::Inactive
        } else if self.passes.is_none() {
            ToolState::ActiveNoPasses
        } else if self.dirty {
            ToolState::ActiveDirty
        } else {
            ToolState::ActiveReady
        }
    }

    /// The fallback tool given at construction.
    #[must_use]
    pub fn fallback_tool(&self) -> ToolId {
        self.fallback
    }

    /// Options the tool was built with.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    // ── Invalidation ──

    /// The viewport changed size: discard the passes so the next pick
    /// rebuilds them at the new size.
    pub fn on_viewport_resized(&mut self) {
        if self.passes.take().is_some() {
            log::debug!("viewport resized, discarding coordinate passes");
        }
        self.dirty = true;
    }

    /// Scene content changed. Changes made by the tool's own handle do not
    /// affect what the passes see and are ignored.
    pub fn on_scene_changed(&mut self, origin: ChangeOrigin) {
        if origin == ChangeOrigin::Content {
            self.dirty = true;
        }
    }

    // ── Input ──

    /// Feed one input event. Returns `true` if the measurement changed.
    ///
    /// Left press picks (shift toggles the active point first, otherwise the
    /// point projected nearest the cursor becomes active), dragging re-picks
    /// into the same point and release ends the drag. Presses are ignored
    /// while `host` reports tools disabled.
    pub fn handle_input(
        &mut self,
        event: InputEvent,
        scene: &Scene,
        host: &dyn ToolHost,
    ) -> bool {
        let action = self.pointer.handle(event);
        if !self.active {
            self.pointer.reset();
            return false;
        }
        match action {
            PointerAction::None => false,
            PointerAction::Press { position, shift } => {
                if !host.tools_enabled() {
                    self.pointer.reset();
                    return false;
                }
                self.press(scene, position, shift)
            }
            PointerAction::Drag { position } => self.drag_to(scene, position),
            PointerAction::Release => {
                self.release();
                false
            }
        }
    }

    /// A left press at `screen`. Returns `true` if the measurement changed.
    ///
    /// Does nothing while the tool is inactive.
    pub fn press(&mut self, scene: &Scene, screen: Vec2, shift: bool) -> bool {
        if !self.active {
            return false;
        }
        let selection = if shift {
            Some(self.measurement.active().toggle())
        } else {
            scene.active_camera().and_then(|camera| {
                projection::nearest_point(
                    camera,
                    self.measurement.points(),
                    screen,
                )
            })
        };
        let selected = selection
            .is_some_and(|active| self.measurement.set_active(active));
        let picked = self.pick_into_active(scene, screen);
        if selected && !picked {
            self.notify();
        }
        selected || picked
    }

    /// Cursor moved to `screen` with the button held: re-pick into the same
    /// point. Returns `true` if the measurement changed; always `false` while
    /// inactive.
    pub fn drag_to(&mut self, scene: &Scene, screen: Vec2) -> bool {
        self.pick_into_active(scene, screen)
    }

    /// End the current drag.
    pub fn release(&mut self) {
        self.pointer.reset();
    }

    /// Decode the world point under `screen` and, if all three axes hit,
    /// overwrite the active point with it.
    ///
    /// `None` leaves the measurement untouched: tool inactive, no camera, no
    /// passes, or background on any axis.
    pub fn pick(&mut self, scene: &Scene, screen: Vec2) -> Option<DVec3> {
        if !self.active {
            return None;
        }
        let point = self.decode(scene, screen)?;
        if self.measurement.write_active(point) {
            self.notify();
        }
        Some(point)
    }

    fn pick_into_active(&mut self, scene: &Scene, screen: Vec2) -> bool {
        let before = self.measurement;
        let _ = self.pick(scene, screen);
        self.measurement != before
    }

    /// Make sure passes exist and are current, then decode all three axes.
    fn decode(&mut self, scene: &Scene, screen: Vec2) -> Option<DVec3> {
        let Some(camera) = scene.active_camera() else {
            log::debug!("pick skipped: no active camera");
            self.last_error = Some(PassError::CameraUnavailable);
            return None;
        };

        let size = self.options.picking.pass_size(camera.viewport);
        if self.passes.as_ref().is_some_and(|g| g.size() != size) {
            log::debug!("pass size changed to {}x{}, rebuilding", size.0, size.1);
            self.passes = None;
        }
        if self.passes.is_none() {
            match PassGroup::build(&mut self.backend, size.0, size.1) {
                Ok(group) => {
                    self.passes = Some(group);
                    self.dirty = true;
                }
                Err(e) => {
                    log::warn!("coordinate pass construction failed: {e}");
                    self.last_error = Some(e);
                    return None;
                }
            }
        }
        let group = self.passes.as_mut()?;

        let stale_view = match group.rendered_view() {
            None => true,
            Some(view) => {
                self.options.picking.rerender_on_camera_change
                    && !view.matches(camera)
            }
        };
        if self.dirty || stale_view {
            if let Err(e) =
                group.render_all(&mut self.backend, scene, &self.settings)
            {
                log::warn!("coordinate pass render failed: {e}");
                self.last_error = Some(e);
                return None;
            }
            self.dirty = false;
        }
        self.last_error = None;
        group.decode_point(&self.backend, screen)
    }

    fn notify(&mut self) {
        let snapshot = self.measurement.snapshot();
        self.observers.notify(&snapshot);
    }

    // ── Queries ──

    /// First measurement point (mm).
    #[must_use]
    pub fn point_a(&self) -> DVec3 {
        self.measurement.point_a()
    }

    /// Second measurement point (mm).
    #[must_use]
    pub fn point_b(&self) -> DVec3 {
        self.measurement.point_b()
    }

    /// The vector from A to B.
    #[must_use]
    pub fn distance(&self) -> DVec3 {
        self.measurement.distance()
    }

    /// Euclidean length of [`MeasureTool::distance`].
    #[must_use]
    pub fn distance_length(&self) -> f64 {
        self.measurement.distance().length()
    }

    /// `0` when the next pick writes A, `1` for B.
    #[must_use]
    pub fn active_point_index(&self) -> usize {
        self.measurement.active().index()
    }

    /// The active point selector.
    #[must_use]
    pub fn active_point(&self) -> ActivePoint {
        self.measurement.active()
    }

    /// All outputs at once.
    #[must_use]
    pub fn snapshot(&self) -> MeasurementSnapshot {
        self.measurement.snapshot()
    }

    /// The failure of the most recent pick attempt, cleared by the next
    /// successful render or decode.
    #[must_use]
    pub fn last_error(&self) -> Option<&PassError> {
        self.last_error.as_ref()
    }

    // ── Observers & misc ──

    /// Call `callback` after every change of the measurement.
    pub fn subscribe(&mut self, callback: ChangeCallback) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    /// Stop calling a subscribed callback. Returns `false` if unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Both points back to the origin with A active.
    pub fn reset(&mut self) {
        if self.measurement.reset() {
            self.notify();
        }
    }

    /// The render backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the render backend.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}
