//! clothpaint demo host
//!
//! Opens a window with a swaying cloth sheet and drives a `ToolSession`:
//! - Left click / drag: select (Select tool) or paint (Paint tool)
//! - Shift: add / toggle, Alt (mid-drag): subtract
//! - Right drag: orbit, wheel: zoom
//! - Tab: switch tool, 1-4: channel, [ ]: brush value, Up/Down: nudge selection
//! - A / I / C: select all / invert / clear, X: x-ray, Space: pause animation

use std::path::Path;

use macroquad::prelude::*;

use clothpaint::coefficients::{CoefficientBuffer, CoefficientChannel, CoefficientRecord, CoefficientStore};
use clothpaint::geometry::{Camera, Vec3, Viewport};
use clothpaint::input::{ModifierKeys, PointerEvent};
use clothpaint::vertex_cache::{BonePose, SkinnedMeshSource};
use clothpaint::{EngineConfig, ToolMode, ToolSession, VERSION};

const CONFIG_PATH: &str = "clothpaint.ron";
const SHEET_COLS: usize = 24;
const SHEET_ROWS: usize = 16;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("clothpaint v{}", VERSION),
        window_width: 1280,
        window_height: 720,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

/// Sample skinned mesh: a curved sheet hanging from one root bone
struct ClothSheet {
    rest_positions: Vec<Vec3>,
    rest_normals: Vec<Vec3>,
    pose: BonePose,
}

impl ClothSheet {
    fn new(cols: usize, rows: usize, size: f32) -> Self {
        let mut rest_positions = Vec::with_capacity(cols * rows);
        let mut rest_normals = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                let u = col as f32 / (cols - 1).max(1) as f32 - 0.5;
                let v = row as f32 / (rows - 1).max(1) as f32 - 0.5;
                let x = u * size;
                // z = 0.3 sin(x), normal faces the default camera (-Z)
                rest_positions.push(Vec3::new(x, v * size * 0.7, 0.3 * x.sin()));
                rest_normals.push(Vec3::new(0.3 * x.cos(), 0.0, -1.0).normalize());
            }
        }
        Self { rest_positions, rest_normals, pose: BonePose::IDENTITY }
    }

    fn animate(&mut self, time: f32) {
        self.pose.rotation.y = (time * 0.7).sin() * 25.0;
        self.pose.position.y = (time * 1.3).sin() * 0.1;
    }
}

impl SkinnedMeshSource for ClothSheet {
    fn rest_positions(&self) -> &[Vec3] {
        &self.rest_positions
    }

    fn rest_normals(&self) -> &[Vec3] {
        &self.rest_normals
    }

    fn root_pose(&self) -> BonePose {
        self.pose
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Orbit {
    distance: f32,
    azimuth: f32,
    elevation: f32,
}

fn load_config() -> EngineConfig {
    let path = Path::new(CONFIG_PATH);
    if !path.exists() {
        return EngineConfig::default();
    }
    match EngineConfig::load(path) {
        Ok(config) => {
            log::info!("loaded {}", CONFIG_PATH);
            config
        }
        Err(e) => {
            log::warn!("{}: {}; using defaults", CONFIG_PATH, e);
            EngineConfig::default()
        }
    }
}

fn read_modifiers() -> ModifierKeys {
    ModifierKeys {
        shift: is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift),
        ctrl: is_key_down(KeyCode::LeftControl) || is_key_down(KeyCode::RightControl),
        alt: is_key_down(KeyCode::LeftAlt) || is_key_down(KeyCode::RightAlt),
        command: is_key_down(KeyCode::LeftSuper) || is_key_down(KeyCode::RightSuper),
    }
}

/// Enable only `channel` on the brush, keeping its last value
fn select_brush_channel(session: &mut ToolSession, channel: CoefficientChannel) {
    let paint = session.paint_state_mut();
    for c in CoefficientChannel::ALL {
        paint.disable(c);
    }
    let value = paint.channel(channel).value;
    paint.enable(channel, value);
}

/// Marker triangles projected to the screen, far to near
fn project_markers(session: &ToolSession, camera: &Camera, width: f32, height: f32) -> Vec<(f32, [Vec2; 3], Color)> {
    let mesh = session.marker_mesh();
    let mut triangles = Vec::with_capacity(mesh.indices.len() / 3);
    for tri in mesh.indices.chunks_exact(3) {
        let project = |i: u16| camera.world_to_screen(mesh.positions[i as usize], width, height);
        if let (Some(a), Some(b), Some(c)) = (project(tri[0]), project(tri[1]), project(tri[2])) {
            let color = mesh.colors[tri[0] as usize];
            triangles.push((
                a.2 + b.2 + c.2,
                [vec2(a.0, a.1), vec2(b.0, b.1), vec2(c.0, c.1)],
                Color::from_rgba(color.r, color.g, color.b, 255),
            ));
        }
    }
    triangles.sort_by(|a, b| b.0.total_cmp(&a.0));
    triangles
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config();
    let mut sheet = ClothSheet::new(SHEET_COLS, SHEET_ROWS, 3.0);

    // Seed max distance so the ramp has something to show: pinned top, loose bottom
    let mut store = CoefficientBuffer::new(sheet.rest_positions.len());
    for idx in 0..store.len() {
        let row = idx / SHEET_COLS;
        let record = CoefficientRecord {
            max_distance: row as f32 / (SHEET_ROWS - 1) as f32 * 0.5,
            collision_sphere_radius: 0.05,
            ..Default::default()
        };
        store.set(idx, record);
    }

    let mut session = ToolSession::new(&config);
    let channel = session.visualized_channel();
    select_brush_channel(&mut session, channel);

    let mut camera = Camera::new();
    let mut orbit = Orbit { distance: 5.0, azimuth: 0.0, elevation: 0.2 };
    let mut last_orbit = None;
    let mut last_size = (0.0, 0.0);
    let mut xray = false;
    let mut animate = true;
    let mut last_mouse = mouse_position();
    let mut last_modifiers = ModifierKeys::NONE;
    let mut triangles = Vec::new();

    loop {
        let (width, height) = (screen_width(), screen_height());
        let mouse = mouse_position();
        let modifiers = read_modifiers();

        // Camera navigation
        if is_mouse_button_down(MouseButton::Right) {
            orbit.azimuth -= (mouse.0 - last_mouse.0) * 0.01;
            orbit.elevation = (orbit.elevation + (mouse.1 - last_mouse.1) * 0.01).clamp(-1.5, 1.5);
        }
        let wheel = mouse_wheel().1;
        if wheel != 0.0 {
            orbit.distance = (orbit.distance * if wheel > 0.0 { 0.9 } else { 1.1 }).clamp(1.0, 50.0);
        }
        camera.set_orbit(Vec3::ZERO, orbit.distance, orbit.azimuth, orbit.elevation);
        let mut viewport = Viewport::new(camera.clone(), width, height);
        viewport.xray_mode = xray;

        // Pointer
        if is_mouse_button_pressed(MouseButton::Left) {
            session.handle_event(&PointerEvent::down(mouse, modifiers), &viewport, &mut store);
        } else if mouse != last_mouse {
            session.handle_event(&PointerEvent::moved(mouse, modifiers), &viewport, &mut store);
        }
        if is_mouse_button_released(MouseButton::Left) {
            session.handle_event(&PointerEvent::up(mouse, modifiers), &viewport, &mut store);
        }
        if modifiers != last_modifiers {
            session.modifiers_changed(modifiers);
        }

        // Keyboard
        if is_key_pressed(KeyCode::Tab) {
            let next = match session.mode() {
                ToolMode::Select => ToolMode::Paint,
                ToolMode::Paint => ToolMode::Select,
            };
            session.set_mode(next);
        }
        if is_key_pressed(KeyCode::Escape) {
            session.cancel();
        }
        let channel_keys = [KeyCode::Key1, KeyCode::Key2, KeyCode::Key3, KeyCode::Key4];
        for (key, channel) in channel_keys.iter().zip(CoefficientChannel::ALL) {
            if is_key_pressed(*key) {
                session.set_visualized_channel(channel);
                select_brush_channel(&mut session, channel);
            }
        }
        let channel = session.visualized_channel();
        if is_key_pressed(KeyCode::LeftBracket) || is_key_pressed(KeyCode::RightBracket) {
            let step = if is_key_pressed(KeyCode::RightBracket) { 0.05 } else { -0.05 };
            let brush = session.paint_state_mut().channel_mut(channel);
            brush.value = channel.clamp(brush.value + step);
        }
        if is_key_pressed(KeyCode::Up) || is_key_pressed(KeyCode::Down) {
            let step = if is_key_pressed(KeyCode::Up) { 0.05 } else { -0.05 };
            if let Some(avg) = session.average(&store, channel) {
                session.set_all(&mut store, channel, avg + step);
            }
        }
        if is_key_pressed(KeyCode::A) {
            session.select_all();
        }
        if is_key_pressed(KeyCode::I) {
            session.invert_selection();
        }
        if is_key_pressed(KeyCode::C) {
            session.clear_selection();
        }
        if is_key_pressed(KeyCode::X) {
            xray = !xray;
        }
        if is_key_pressed(KeyCode::Space) {
            animate = !animate;
        }

        // Host-side commit point for edited coefficients
        if store.take_dirty() {
            log::debug!("coefficients changed");
        }

        if animate {
            sheet.animate(get_time() as f32);
        }
        session.refresh(&sheet, &store);

        if session.take_visualization_dirty() || last_orbit != Some(orbit) || last_size != (width, height) {
            triangles = project_markers(&session, &camera, width, height);
            last_orbit = Some(orbit);
            last_size = (width, height);
        }

        // Draw
        clear_background(Color::from_rgba(24, 24, 32, 255));
        for (_, [a, b, c], color) in &triangles {
            draw_triangle(*a, *b, *c, *color);
        }

        if let Some(rect) = session.selection().lasso_rect() {
            let ((x0, y0), (x1, y1)) = rect.bounds();
            draw_rectangle(x0, y0, x1 - x0, y1 - y0, Color::from_rgba(255, 255, 255, 30));
            draw_rectangle_lines(x0, y0, x1 - x0, y1 - y0, 1.0, WHITE);
        }

        let average = session
            .average(&store, channel)
            .map(|v| format!("{:.3}", v))
            .unwrap_or_else(|| "-".to_string());
        let brush = session.paint_state().channel(channel);
        let lines = [
            format!("Tool: {} ({})", session.mode().label(), session.selection().mode().label()),
            format!("Channel: {}", channel.label()),
            format!(
                "Selected: {} / {}   average: {}",
                session.selection().selected_count(),
                session.vertex_cache().len(),
                average
            ),
            format!("Brush: {:.2}{}", brush.value, if brush.enabled { "" } else { " (off)" }),
            format!("X-ray: {}   animation: {}", xray, animate),
        ];
        for (i, line) in lines.iter().enumerate() {
            draw_text(line, 10.0, 24.0 + i as f32 * 20.0, 20.0, WHITE);
        }
        if session.marker_mesh().truncated {
            draw_text("marker budget exceeded: some vertices hidden", 10.0, height - 12.0, 20.0, ORANGE);
        }

        last_mouse = mouse;
        last_modifiers = modifiers;
        next_frame().await;
    }
}
