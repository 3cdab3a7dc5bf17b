#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Castaway adapters.
//!
//! The renderer never talks to a graphics API directly. It emits draw calls
//! through the [`Canvas`] seam, so backends only translate sprites and
//! rectangles while tests record them as [`DrawCommand`] values.

mod camera;
mod minimap;
mod viewport;

use anyhow::Result as AnyResult;
use castaway_core::{PlayerPosition, SpriteKey, TilePosition};
use castaway_world::TileGrid;
use glam::Vec2;
use std::{error::Error, fmt, time::Duration};

pub use camera::{Camera, ViewportMetrics, MAX_VISIBLE_TILES, NEIGHBOUR_RING, WINDOW_PADDING};
pub use minimap::{treasure_map, TreasureMapImage};
pub use viewport::{EdgeSide, RenderContext, RenderWindow, ViewportRenderer, PLAYER_LIFT};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with its alpha replaced, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }
}

/// Drawing surface the viewport renderer paints onto.
///
/// Positions are top-left corners in screen pixels.
pub trait Canvas {
    /// Fills an axis-aligned rectangle with a solid color.
    fn fill_rect(&mut self, position: Vec2, size: Vec2, color: Color);

    /// Draws a preloaded sprite, rotated clockwise by `rotation` radians around its centre.
    fn draw_sprite(&mut self, sprite: SpriteKey, position: Vec2, size: Vec2, rotation: f32);
}

/// One draw call captured by a [`RecordingCanvas`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCommand {
    /// Solid rectangle.
    FillRect {
        /// Top-left corner in pixels.
        position: Vec2,
        /// Width and height in pixels.
        size: Vec2,
        /// Fill color.
        color: Color,
    },
    /// Sprite blit.
    Sprite {
        /// Sprite handle.
        sprite: SpriteKey,
        /// Top-left corner in pixels.
        position: Vec2,
        /// Width and height in pixels.
        size: Vec2,
        /// Clockwise rotation in radians.
        rotation: f32,
    },
}

/// Canvas that stores draw calls instead of executing them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    /// Creates an empty recording.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw calls in issue order.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Returns the recorded calls and leaves the canvas empty.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, position: Vec2, size: Vec2, color: Color) {
        self.commands.push(DrawCommand::FillRect {
            position,
            size,
            color,
        });
    }

    fn draw_sprite(&mut self, sprite: SpriteKey, position: Vec2, size: Vec2, rotation: f32) {
        self.commands.push(DrawCommand::Sprite {
            sprite,
            position,
            size,
            rotation,
        });
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Requested movement direction; each axis lies in `-1.0..=1.0`.
    pub movement: Vec2,
    /// Whether the adapter detected a quit request on this frame.
    pub quit_requested: bool,
}

/// World state shown by the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Tile grid including dropped items.
    pub grid: TileGrid,
    /// Continuous player position in tile units.
    pub player: PlayerPosition,
    /// Discrete tile the window is centred on.
    pub camera_tile: TilePosition,
}

impl Scene {
    /// Creates a scene whose camera follows the player's starting position.
    #[must_use]
    pub fn new(grid: TileGrid, player: PlayerPosition) -> Self {
        let mut scene = Self {
            grid,
            player,
            camera_tile: TilePosition::new(0, 0),
        };
        scene.follow_player();
        scene
    }

    /// Re-centres the camera on the tile the player occupies.
    ///
    /// Positions that do not map onto a tile leave the camera where it is.
    pub fn follow_player(&mut self) {
        if let Some(tile) = self.player.occupied_tile() {
            self.camera_tile = tile;
        }
    }

    /// Borrowed view handed to [`ViewportRenderer::render`].
    #[must_use]
    pub fn context(&self) -> RenderContext<'_> {
        RenderContext::new(&self.grid, self.camera_tile, self.player)
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame and to fill cells past the grid edge.
    pub clear_color: Color,
    /// Edge length of one tile in pixels.
    pub tile_size: f32,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, tile_size: f32, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            tile_size,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Castaway scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// per-frame input captured by the adapter, and may mutate the scene
    /// before it is rendered. Mutations finish before the frame is drawn.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RenderingError {
    /// Tiles must have a positive, finite pixel size.
    InvalidTileSize {
        /// Provided tile size that failed validation.
        tile_size: f32,
    },
    /// Viewport dimensions must be finite and non-negative.
    InvalidViewport {
        /// Provided width in pixels.
        width: f32,
        /// Provided height in pixels.
        height: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTileSize { tile_size } => {
                write!(f, "tile size must be positive (received {tile_size})")
            }
            Self::InvalidViewport { width, height } => {
                write!(f, "viewport {width}x{height} is not a valid pixel size")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;
    use castaway_core::TerrainKind;

    #[test]
    fn with_alpha_clamps() {
        assert_eq!(Color::WHITE.with_alpha(1.5).alpha, 1.0);
        assert_eq!(Color::WHITE.with_alpha(-0.2).alpha, 0.0);
        assert_eq!(Color::BLACK.with_alpha(0.25).red, 0.0);
    }

    #[test]
    fn recording_canvas_keeps_issue_order() {
        let mut canvas = RecordingCanvas::new();
        canvas.fill_rect(Vec2::ZERO, Vec2::ONE, Color::BLACK);
        canvas.draw_sprite(SpriteKey::Player, Vec2::new(2.0, 3.0), Vec2::ONE, 0.0);

        let commands = canvas.take();
        assert_eq!(commands.len(), 2);
        assert!(matches!(commands[0], DrawCommand::FillRect { .. }));
        assert!(matches!(
            commands[1],
            DrawCommand::Sprite {
                sprite: SpriteKey::Player,
                ..
            }
        ));
        assert!(canvas.commands().is_empty());
    }

    #[test]
    fn scene_camera_follows_rounded_player_tile() {
        let grid = TileGrid::filled(8, TerrainKind::Land).expect("valid grid");
        let mut scene = Scene::new(grid, PlayerPosition::new(2.4, 5.6));
        assert_eq!(scene.camera_tile, TilePosition::new(2, 6));

        scene.player = PlayerPosition::new(-3.0, 1.0);
        scene.follow_player();
        assert_eq!(scene.camera_tile, TilePosition::new(2, 6));
    }

    #[test]
    fn rendering_error_messages_name_the_value() {
        let error = RenderingError::InvalidTileSize { tile_size: 0.0 };
        assert_eq!(error.to_string(), "tile size must be positive (received 0)");
    }
}
