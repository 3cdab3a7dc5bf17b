#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Castaway.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! Without a sprite manifest every sprite is drawn as a flat colored shape,
//! which keeps the adapter usable before any art exists.

mod sprites;

use anyhow::{Context, Result};
use castaway_core::{SpriteKey, TerrainKind};
use castaway_rendering::{
    Canvas, Color, FrameInput, Presentation, RenderingBackend, Scene, ViewportMetrics,
    ViewportRenderer,
};
use glam::Vec2;
use macroquad::input::{is_key_down, is_key_pressed, KeyCode};
use std::{
    collections::VecDeque,
    f32::consts::FRAC_PI_2,
    path::PathBuf,
    sync::mpsc,
    time::{Duration, Instant},
};
use tracing::{info, warn};

use self::sprites::{DrawParams, SpriteAtlas};

/// Snapshot of the keyboard observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardInput {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
    left: bool,
    right: bool,
    up: bool,
    down: bool,
}

impl KeyboardInput {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            left: is_key_down(KeyCode::Left) || is_key_down(KeyCode::A),
            right: is_key_down(KeyCode::Right) || is_key_down(KeyCode::D),
            up: is_key_down(KeyCode::Up) || is_key_down(KeyCode::W),
            down: is_key_down(KeyCode::Down) || is_key_down(KeyCode::S),
        }
    }

    fn frame_input(self) -> FrameInput {
        let axis = |negative: bool, positive: bool| match (negative, positive) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        };
        FrameInput {
            movement: Vec2::new(axis(self.left, self.right), axis(self.up, self.down)),
            quit_requested: self.quit_requested,
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    window_size: (i32, i32),
    sprite_manifest: Option<PathBuf>,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            window_size: (1024, 768),
            sprite_manifest: None,
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Sets the initial window size in pixels.
    #[must_use]
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (
            i32::try_from(width).unwrap_or(i32::MAX),
            i32::try_from(height).unwrap_or(i32::MAX),
        );
        self
    }

    /// Loads sprites from the provided manifest instead of drawing flat colors.
    #[must_use]
    pub fn with_sprite_manifest(mut self, manifest: Option<PathBuf>) -> Self {
        self.sprite_manifest = manifest;
        self
    }
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, frame: Duration, render: Duration) -> Option<FpsMetrics> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);
        self.render_accum += render;

        self.frame_times.push_back(frame);
        self.window_duration += frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            if let Some(removed) = self.frame_times.pop_front() {
                self.window_duration = self.window_duration.saturating_sub(removed);
            } else {
                break;
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let per_second = self.frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let avg_render = self.render_accum / self.frames.max(1);

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.render_accum = Duration::ZERO;
        Some(FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_render,
        })
    }
}

/// Remembers the last screen size so resizes are handled once.
#[derive(Clone, Copy, Debug, Default)]
struct ScreenSizeTracker {
    last: Option<(f32, f32)>,
}

impl ScreenSizeTracker {
    /// Returns the new size when it differs from the previous observation.
    fn observe(&mut self, width: f32, height: f32) -> Option<(f32, f32)> {
        if self.last == Some((width, height)) {
            return None;
        }
        self.last = Some((width, height));
        Some((width, height))
    }
}

/// [`Canvas`] that draws through macroquad, preferring sprites when loaded.
struct MacroquadCanvas<'a> {
    atlas: Option<&'a SpriteAtlas>,
}

impl Canvas for MacroquadCanvas<'_> {
    fn fill_rect(&mut self, position: Vec2, size: Vec2, color: Color) {
        macroquad::shapes::draw_rectangle(
            position.x,
            position.y,
            size.x,
            size.y,
            to_macroquad_color(color),
        );
    }

    fn draw_sprite(&mut self, sprite: SpriteKey, position: Vec2, size: Vec2, rotation: f32) {
        if let Some(atlas) = self.atlas {
            let params = DrawParams {
                position,
                size,
                rotation_radians: rotation,
            };
            if atlas.draw(sprite, params).is_ok() {
                return;
            }
        }

        let (position, size) = fallback_shape(sprite, position, size, rotation);
        self.fill_rect(position, size, fallback_color(sprite));
    }
}

fn is_transition(sprite: SpriteKey) -> bool {
    TerrainKind::ALL
        .into_iter()
        .any(|kind| kind.profile().transition_sprite == Some(sprite))
}

/// Rectangle standing in for a sprite when no texture is available.
///
/// Transition sprites become a quarter-tile strip on the side their rotation
/// faces: unrotated strips sit along the bottom edge and turn clockwise.
fn fallback_shape(sprite: SpriteKey, position: Vec2, size: Vec2, rotation: f32) -> (Vec2, Vec2) {
    if is_transition(sprite) {
        let strip = size * 0.25;
        let quarter_turns = ((rotation / FRAC_PI_2).round() as i32).rem_euclid(4);
        return match quarter_turns {
            0 => (
                Vec2::new(position.x, position.y + size.y - strip.y),
                Vec2::new(size.x, strip.y),
            ),
            1 => (position, Vec2::new(strip.x, size.y)),
            2 => (position, Vec2::new(size.x, strip.y)),
            _ => (
                Vec2::new(position.x + size.x - strip.x, position.y),
                Vec2::new(strip.x, size.y),
            ),
        };
    }

    let scale = match sprite {
        SpriteKey::Food | SpriteKey::Axe | SpriteKey::TreasureMap => 0.4,
        SpriteKey::Player => 0.6,
        _ => 1.0,
    };
    let scaled = size * scale;
    (position + (size - scaled) * 0.5, scaled)
}

fn fallback_color(sprite: SpriteKey) -> Color {
    for kind in TerrainKind::ALL {
        let profile = kind.profile();
        let [red, green, blue] = profile.map_color;
        if profile.sprite == sprite {
            return Color::from_rgb_u8(red, green, blue);
        }
        if profile.transition_sprite == Some(sprite) {
            return Color::from_rgb_u8(red, green, blue).with_alpha(0.6);
        }
    }

    match sprite {
        SpriteKey::Food => Color::from_rgb_u8(0xC0, 0x39, 0x2B),
        SpriteKey::Axe => Color::from_rgb_u8(0x7F, 0x8C, 0x8D),
        SpriteKey::TreasureMap => Color::from_rgb_u8(0xF5, 0xE6, 0xC8),
        SpriteKey::Player => Color::from_rgb_u8(0x29, 0x80, 0xB9),
        _ => Color::from_rgb_u8(0xFF, 0x00, 0xFF),
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            window_size,
            sprite_manifest,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            tile_size,
            scene,
        } = presentation;

        let initial_metrics =
            ViewportMetrics::new(tile_size, window_size.0 as f32, window_size.1 as f32)
                .context("invalid initial viewport")?;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: window_size.0,
            window_height: window_size.1,
            window_resizable: true,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        let (atlas_init_sender, atlas_init_receiver) = mpsc::channel::<Result<()>>();

        macroquad::Window::from_config(config, async move {
            let mut init_sender = Some(atlas_init_sender);
            let mut scene = scene;

            let sprite_atlas = match sprite_manifest {
                Some(path) => match SpriteAtlas::from_manifest_path(&path).with_context(|| {
                    format!("failed to initialise sprite atlas from {}", path.display())
                }) {
                    Ok(atlas) => {
                        info!(sprites = atlas.len(), "loaded sprite atlas");
                        Some(atlas)
                    }
                    Err(error) => {
                        if let Some(sender) = init_sender.take() {
                            let _ = sender.send(Err(error));
                        }
                        return;
                    }
                },
                None => None,
            };

            if let Some(sender) = init_sender.take() {
                let _ = sender.send(Ok(()));
            }

            let background = to_macroquad_color(clear_color);
            let mut renderer = ViewportRenderer::new(initial_metrics, clear_color);
            let mut screen = ScreenSizeTracker::default();
            let mut fps_counter = FpsCounter::default();

            loop {
                let keyboard = KeyboardInput::poll();
                if keyboard.quit_requested {
                    break;
                }

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                update_scene(frame_dt, keyboard.frame_input(), &mut scene);

                let width = macroquad::window::screen_width();
                let height = macroquad::window::screen_height();
                if let Some((width, height)) = screen.observe(width, height) {
                    match renderer.resize(width, height) {
                        Ok(()) => info!(
                            width,
                            height,
                            visible_x = renderer.metrics().visible_x(),
                            visible_y = renderer.metrics().visible_y(),
                            "viewport resized"
                        ),
                        Err(error) => warn!(%error, "ignoring viewport resize"),
                    }
                }

                macroquad::window::clear_background(background);

                let render_start = Instant::now();
                let mut canvas = MacroquadCanvas {
                    atlas: sprite_atlas.as_ref(),
                };
                renderer.render(&scene.context(), &mut canvas);
                let render_duration = render_start.elapsed();

                if let Some(FpsMetrics {
                    per_second,
                    trailing_ten_seconds,
                    avg_render,
                }) = fps_counter.record_frame(frame_dt, render_duration)
                {
                    if show_fps {
                        info!(
                            fps = per_second,
                            fps_10s = trailing_ten_seconds,
                            render_ms = avg_render.as_secs_f64() * 1_000.0,
                            "frame statistics"
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        atlas_init_receiver.recv().unwrap_or_else(|_| Ok(()))?;

        Ok(())
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
