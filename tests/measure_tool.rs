//! Pick orchestration: atomicity, active-point selection, invalidation and
//! failure handling, driven through a scripted backend.

mod common;

use common::{
    count_notifications, plane_scene, scripted_tool, top_down_camera,
    TestHost, FALLBACK, VIEWPORT,
};
use glam::{DVec3, Vec2, Vec3};
use measure_pick::camera::Camera;
use measure_pick::codec::{self, Axis};
use measure_pick::error::PassError;
use measure_pick::input::{InputEvent, MouseButton};
use measure_pick::measure::{ActivePoint, ToolState};
use measure_pick::options::Options;
use measure_pick::scene::{ChangeOrigin, Scene};

fn press_event() -> InputEvent {
    InputEvent::MouseButton {
        button: MouseButton::Left,
        pressed: true,
    }
}

fn release_event() -> InputEvent {
    InputEvent::MouseButton {
        button: MouseButton::Left,
        pressed: false,
    }
}

/// Put A at (-50, 0, 0) and B at (50, 0, 0), leaving B active.
fn place_points(
    tool: &mut measure_pick::measure::MeasureTool<common::ScriptedBackend>,
    scene: &Scene,
) {
    tool.backend_mut().set_point(DVec3::new(-50.0, 0.0, 0.0));
    assert!(tool.press(scene, Vec2::ZERO, false));
    tool.backend_mut().set_point(DVec3::new(50.0, 0.0, 0.0));
    assert!(tool.press(scene, Vec2::ZERO, true));
    assert_eq!(tool.point_a(), DVec3::new(-50.0, 0.0, 0.0));
    assert_eq!(tool.point_b(), DVec3::new(50.0, 0.0, 0.0));
    assert_eq!(tool.active_point_index(), 1);
}

#[test]
fn pick_with_one_background_axis_changes_nothing() {
    let scene = plane_scene(top_down_camera());
    let mut tool = scripted_tool(&Options::default());
    let notified = count_notifications(&mut tool);

    tool.backend_mut().set_mm(Axis::X, 12.5);
    tool.backend_mut().set_raw(Axis::Y, codec::SENTINEL_HIGH);
    tool.backend_mut().set_mm(Axis::Z, -3.0);

    assert!(!tool.press(&scene, Vec2::new(0.1, 0.1), false));
    assert_eq!(tool.pick(&scene, Vec2::new(0.1, 0.1)), None);
    assert_eq!(tool.point_a(), DVec3::ZERO);
    assert_eq!(tool.point_b(), DVec3::ZERO);
    assert_eq!(tool.active_point_index(), 0);
    assert_eq!(notified.get(), 0);

    // Alpha is ignored: an opaque all-zero sentinel is still background.
    tool.backend_mut().set_raw(Axis::Y, 0xFF00_0000);
    assert_eq!(tool.pick(&scene, Vec2::new(0.1, 0.1)), None);

    tool.backend_mut().set_mm(Axis::Y, 4.0);
    let point = tool.pick(&scene, Vec2::new(0.1, 0.1)).unwrap();
    assert_eq!(point, DVec3::new(12.5, 4.0, -3.0));
    assert_eq!(tool.point_a(), point);
    assert_eq!(notified.get(), 1);
}

#[test]
fn shift_press_toggles_exactly_once_per_press() {
    let scene = plane_scene(top_down_camera());
    let mut tool = scripted_tool(&Options::default());
    let notified = count_notifications(&mut tool);

    tool.backend_mut().set_point(DVec3::new(10.0, 0.0, 0.0));
    assert!(tool.press(&scene, Vec2::new(-0.9, 0.9), true));
    assert_eq!(tool.active_point_index(), 1);
    assert_eq!(tool.point_a(), DVec3::ZERO);
    assert_eq!(tool.point_b(), DVec3::new(10.0, 0.0, 0.0));
    assert_eq!(notified.get(), 1);

    // The toggle happens even when the pick itself lands on background.
    tool.backend_mut().clear();
    assert!(tool.press(&scene, Vec2::new(0.9, -0.9), true));
    assert_eq!(tool.active_point_index(), 0);
    assert!(tool.press(&scene, Vec2::ZERO, true));
    assert_eq!(tool.active_point_index(), 1);
    assert_eq!(tool.point_b(), DVec3::new(10.0, 0.0, 0.0));
    assert_eq!(notified.get(), 3);
}

#[test]
fn plain_press_edits_the_nearer_point_orthographic() {
    let scene = plane_scene(top_down_camera());
    let mut tool = scripted_tool(&Options::default());
    place_points(&mut tool, &scene);

    // A projects to x = -0.375, B to x = 0.375.
    tool.backend_mut().set_point(DVec3::new(-40.0, 0.0, 5.0));
    assert!(tool.press(&scene, Vec2::new(-0.3, 0.05), false));
    assert_eq!(tool.active_point(), ActivePoint::A);
    assert_eq!(tool.point_a(), DVec3::new(-40.0, 0.0, 5.0));
    assert_eq!(tool.point_b(), DVec3::new(50.0, 0.0, 0.0));

    tool.backend_mut().set_point(DVec3::new(45.0, 0.0, 0.0));
    assert!(tool.press(&scene, Vec2::new(0.35, -0.05), false));
    assert_eq!(tool.active_point(), ActivePoint::B);
    assert_eq!(tool.point_b(), DVec3::new(45.0, 0.0, 0.0));
    assert_eq!(tool.point_a(), DVec3::new(-40.0, 0.0, 5.0));
}

#[test]
fn plain_press_edits_the_nearer_point_perspective() {
    let camera = Camera::perspective(
        Vec3::new(0.0, 0.0, 300.0),
        Vec3::ZERO,
        Vec3::Y,
        45.0,
        VIEWPORT,
    );
    let scene = plane_scene(camera);
    let mut tool = scripted_tool(&Options::default());
    place_points(&mut tool, &scene);

    tool.backend_mut().set_point(DVec3::new(30.0, 1.0, 0.0));
    assert!(tool.press(&scene, Vec2::new(0.2, 0.0), false));
    assert_eq!(tool.active_point_index(), 1);
    assert_eq!(tool.point_b(), DVec3::new(30.0, 1.0, 0.0));

    tool.backend_mut().set_point(DVec3::new(-30.0, 1.0, 0.0));
    assert!(tool.press(&scene, Vec2::new(-0.2, 0.0), false));
    assert_eq!(tool.active_point_index(), 0);
    assert_eq!(tool.point_a(), DVec3::new(-30.0, 1.0, 0.0));
}

#[test]
fn dirty_scene_renders_all_passes_once() {
    let scene = plane_scene(top_down_camera());
    let mut tool = scripted_tool(&Options::default());
    tool.backend_mut().set_point(DVec3::ONE);
    assert_eq!(tool.state(), ToolState::ActiveNoPasses);

    let _ = tool.pick(&scene, Vec2::ZERO).unwrap();
    assert_eq!(tool.backend().draws, 3);
    assert_eq!(tool.state(), ToolState::ActiveReady);

    let _ = tool.pick(&scene, Vec2::ZERO).unwrap();
    assert_eq!(tool.backend().draws, 3);

    tool.on_scene_changed(ChangeOrigin::ToolHandle);
    assert_eq!(tool.state(), ToolState::ActiveReady);
    let _ = tool.pick(&scene, Vec2::ZERO).unwrap();
    assert_eq!(tool.backend().draws, 3);

    tool.on_scene_changed(ChangeOrigin::Content);
    assert_eq!(tool.state(), ToolState::ActiveDirty);
    let _ = tool.pick(&scene, Vec2::ZERO).unwrap();
    assert_eq!(tool.backend().draws, 6);
    let _ = tool.pick(&scene, Vec2::new(0.5, 0.5)).unwrap();
    assert_eq!(tool.backend().draws, 6);
}

#[test]
fn camera_motion_rerenders_unless_disabled() {
    let mut scene = plane_scene(top_down_camera());
    let mut tool = scripted_tool(&Options::default());
    tool.backend_mut().set_point(DVec3::ONE);
    let _ = tool.pick(&scene, Vec2::ZERO).unwrap();
    assert_eq!(tool.backend().draws, 3);

    if let Some(camera) = scene.active_camera_mut() {
        camera.eye.x += 10.0;
        camera.target.x += 10.0;
    }
    let _ = tool.pick(&scene, Vec2::ZERO).unwrap();
    assert_eq!(tool.backend().draws, 6);

    let mut options = Options::default();
    options.picking.rerender_on_camera_change = false;
    let mut scene = plane_scene(top_down_camera());
    let mut tool = scripted_tool(&options);
    tool.backend_mut().set_point(DVec3::ONE);
    let _ = tool.pick(&scene, Vec2::ZERO).unwrap();
    if let Some(camera) = scene.active_camera_mut() {
        camera.eye.x += 10.0;
        camera.target.x += 10.0;
    }
    let _ = tool.pick(&scene, Vec2::ZERO).unwrap();
    assert_eq!(tool.backend().draws, 3);
}

#[test]
fn resize_rebuilds_the_passes_at_the_new_size() {
    let mut scene = plane_scene(top_down_camera());
    let mut tool = scripted_tool(&Options::default());
    tool.backend_mut().set_point(DVec3::ONE);
    let _ = tool.pick(&scene, Vec2::ZERO).unwrap();
    assert_eq!(tool.backend().targets_created, 3);
    assert_eq!(tool.backend().last_target_size, Some(VIEWPORT));

    if let Some(camera) = scene.active_camera_mut() {
        camera.viewport = (1024, 768);
        camera.window = (1024, 768);
    }
    tool.on_viewport_resized();
    assert_eq!(tool.state(), ToolState::ActiveNoPasses);
    let _ = tool.pick(&scene, Vec2::ZERO).unwrap();
    assert_eq!(tool.backend().targets_created, 6);
    assert_eq!(tool.backend().draws, 6);
    assert_eq!(tool.backend().last_target_size, Some((1024, 768)));

    // A size change the host forgot to report is caught as well.
    if let Some(camera) = scene.active_camera_mut() {
        camera.viewport = (640, 480);
        camera.window = (640, 480);
    }
    let _ = tool.pick(&scene, Vec2::ZERO).unwrap();
    assert_eq!(tool.backend().targets_created, 9);
    assert_eq!(tool.backend().draws, 9);
}

#[test]
fn render_scale_multiplies_the_pass_size() {
    let mut options = Options::default();
    options.picking.render_scale = 2;
    let scene = plane_scene(top_down_camera());
    let mut tool = scripted_tool(&options);
    tool.backend_mut().set_point(DVec3::ONE);
    assert!(tool.pick(&scene, Vec2::new(0.99, 0.99)).is_some());
    assert_eq!(tool.backend().last_target_size, Some((1600, 1200)));
}

#[test]
fn failed_construction_is_a_no_op_and_retried() {
    let scene = plane_scene(top_down_camera());
    let mut tool = scripted_tool(&Options::default());
    let notified = count_notifications(&mut tool);
    tool.backend_mut().set_point(DVec3::ONE);
    tool.backend_mut().failing_compiles = 1;

    assert!(!tool.press(&scene, Vec2::ZERO, false));
    assert_eq!(tool.state(), ToolState::ActiveNoPasses);
    assert!(matches!(tool.last_error(), Some(PassError::Shader(_))));
    assert_eq!(tool.backend().draws, 0);
    assert_eq!(tool.point_a(), DVec3::ZERO);
    assert_eq!(notified.get(), 0);

    assert!(tool.press(&scene, Vec2::ZERO, false));
    assert_eq!(tool.point_a(), DVec3::ONE);
    assert_eq!(tool.state(), ToolState::ActiveReady);
    assert!(tool.last_error().is_none());
}

#[test]
fn missing_camera_aborts_cleanly() {
    let mut scene = plane_scene(top_down_camera());
    scene.set_active_camera(None);
    let mut tool = scripted_tool(&Options::default());
    tool.backend_mut().set_point(DVec3::ONE);

    assert!(!tool.press(&scene, Vec2::ZERO, false));
    assert_eq!(tool.last_error(), Some(&PassError::CameraUnavailable));
    assert!(tool.last_error().is_some_and(PassError::is_retryable));
    assert_eq!(tool.backend().targets_created, 0);
    assert_eq!(tool.point_a(), DVec3::ZERO);

    scene.set_active_camera(Some(top_down_camera()));
    assert!(tool.press(&scene, Vec2::ZERO, false));
}

#[test]
fn input_events_press_drag_and_release() {
    let scene = plane_scene(top_down_camera());
    let mut tool = scripted_tool(&Options::default());
    let host = TestHost::new();
    tool.backend_mut().set_point(DVec3::new(1.0, 0.0, 1.0));

    assert!(!tool.handle_input(
        InputEvent::CursorMoved { x: 0.1, y: 0.1 },
        &scene,
        &host
    ));
    assert!(tool.handle_input(press_event(), &scene, &host));
    assert_eq!(tool.point_a(), DVec3::new(1.0, 0.0, 1.0));

    tool.backend_mut().set_point(DVec3::new(2.0, 0.0, 1.0));
    assert!(tool.handle_input(
        InputEvent::CursorMoved { x: 0.2, y: 0.1 },
        &scene,
        &host
    ));
    assert_eq!(tool.point_a(), DVec3::new(2.0, 0.0, 1.0));
    assert_eq!(tool.point_b(), DVec3::ZERO);

    assert!(!tool.handle_input(release_event(), &scene, &host));
    tool.backend_mut().set_point(DVec3::new(3.0, 0.0, 1.0));
    assert!(!tool.handle_input(
        InputEvent::CursorMoved { x: 0.3, y: 0.1 },
        &scene,
        &host
    ));
    assert_eq!(tool.point_a(), DVec3::new(2.0, 0.0, 1.0));

    // Shift comes from the modifier state at press time.
    assert!(!tool.handle_input(
        InputEvent::ModifiersChanged { shift: true },
        &scene,
        &host
    ));
    assert!(tool.handle_input(press_event(), &scene, &host));
    assert_eq!(tool.active_point_index(), 1);
    assert_eq!(tool.point_b(), DVec3::new(3.0, 0.0, 1.0));
}

#[test]
fn disabled_tools_ignore_presses_and_drags() {
    let scene = plane_scene(top_down_camera());
    let mut tool = scripted_tool(&Options::default());
    let mut host = TestHost::new();
    host.enabled = false;
    tool.backend_mut().set_point(DVec3::ONE);

    assert!(!tool.handle_input(press_event(), &scene, &host));
    assert!(!tool.handle_input(
        InputEvent::CursorMoved { x: 0.5, y: 0.5 },
        &scene,
        &host
    ));
    assert_eq!(tool.backend().draws, 0);
    assert_eq!(tool.point_a(), DVec3::ZERO);
}

#[test]
fn lifecycle_keeps_the_measurement_and_exits_to_the_fallback() {
    let scene = plane_scene(top_down_camera());
    let mut tool = scripted_tool(&Options::default());
    let mut host = TestHost::new();
    tool.backend_mut().set_point(DVec3::new(5.0, 6.0, 7.0));
    assert!(tool.press(&scene, Vec2::ZERO, false));

    tool.deactivate();
    assert_eq!(tool.state(), ToolState::Inactive);
    assert!(!tool.handle_input(press_event(), &scene, &host));
    assert_eq!(tool.point_a(), DVec3::new(5.0, 6.0, 7.0));

    tool.activate();
    assert_eq!(tool.state(), ToolState::ActiveReady);
    tool.exit(&mut host);
    assert_eq!(tool.state(), ToolState::Inactive);
    assert_eq!(host.activated, vec![FALLBACK]);
    assert_eq!(tool.fallback_tool(), FALLBACK);
}

#[test]
fn direct_picks_are_ignored_while_inactive() {
    let scene = plane_scene(top_down_camera());
    let mut tool = scripted_tool(&Options::default());
    let notified = count_notifications(&mut tool);
    tool.deactivate();
    tool.backend_mut().set_point(DVec3::new(5.0, 6.0, 7.0));

    assert!(!tool.press(&scene, Vec2::ZERO, false));
    assert!(!tool.press(&scene, Vec2::ZERO, true));
    assert!(!tool.drag_to(&scene, Vec2::new(0.5, 0.5)));
    assert_eq!(tool.pick(&scene, Vec2::ZERO), None);

    assert_eq!(tool.point_a(), DVec3::ZERO);
    assert_eq!(tool.active_point(), ActivePoint::A);
    assert_eq!(tool.backend().draws, 0);
    assert_eq!(notified.get(), 0);

    tool.activate();
    assert_eq!(tool.pick(&scene, Vec2::ZERO), Some(DVec3::new(5.0, 6.0, 7.0)));
}

#[test]
fn snapshot_reset_and_unsubscribe() {
    let scene = plane_scene(top_down_camera());
    let mut tool = scripted_tool(&Options::default());
    let notified = count_notifications(&mut tool);

    tool.backend_mut().set_point(DVec3::new(0.0, 0.0, 0.0));
    let _ = tool.press(&scene, Vec2::ZERO, false);
    tool.backend_mut().set_point(DVec3::new(3.0, 4.0, 0.0));
    assert!(tool.press(&scene, Vec2::ZERO, true));

    let snapshot = tool.snapshot();
    assert_eq!(snapshot.distance, DVec3::new(3.0, 4.0, 0.0));
    assert_eq!(tool.distance(), snapshot.distance);
    assert!((tool.distance_length() - 5.0).abs() < 1e-9);
    assert_eq!(snapshot.active_point, ActivePoint::B);
    assert_eq!(notified.get(), 1);

    tool.reset();
    assert_eq!(notified.get(), 2);
    assert_eq!(tool.point_b(), DVec3::ZERO);
    assert_eq!(tool.active_point_index(), 0);
    tool.reset();
    assert_eq!(notified.get(), 2);

    let id = tool.subscribe(Box::new(|_: &measure_pick::measure::MeasurementSnapshot| {}));
    assert!(tool.unsubscribe(id));
    assert!(!tool.unsubscribe(id));
}
