//! Pure coordinate transforms between window cells and screen pixels.

use castaway_core::{PlayerPosition, TilePosition};
use glam::Vec2;

use crate::RenderingError;

/// Extra drawn window cells beyond the visible count along each axis: one
/// leading and one trailing.
pub const WINDOW_PADDING: u32 = 2;

/// Undrawn cells kept on every side of the drawn window for edge lookups.
pub const NEIGHBOUR_RING: u32 = 1;

/// Largest visible tile count accepted along either axis.
pub const MAX_VISIBLE_TILES: u32 = 4096;

/// Visible tile counts derived from a viewport size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportMetrics {
    tile_size: f32,
    width: f32,
    height: f32,
    visible_x: u32,
    visible_y: u32,
}

impl ViewportMetrics {
    /// Derives metrics for a `width`×`height` pixel viewport.
    ///
    /// Each visible count is `ceil(extent / tile_size)` rounded up to even.
    /// Viewports needing more than [`MAX_VISIBLE_TILES`] along an axis are
    /// rejected.
    pub fn new(tile_size: f32, width: f32, height: f32) -> Result<Self, RenderingError> {
        if !tile_size.is_finite() || tile_size <= 0.0 {
            return Err(RenderingError::InvalidTileSize { tile_size });
        }
        let invalid = RenderingError::InvalidViewport { width, height };
        if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
            return Err(invalid);
        }
        let (Some(visible_x), Some(visible_y)) = (
            visible_count(width, tile_size),
            visible_count(height, tile_size),
        ) else {
            return Err(invalid);
        };

        Ok(Self {
            tile_size,
            width,
            height,
            visible_x,
            visible_y,
        })
    }

    /// Edge length of one tile in pixels.
    #[must_use]
    pub const fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Viewport width in pixels.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Viewport height in pixels.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Even number of tile columns needed to cover the viewport.
    #[must_use]
    pub const fn visible_x(&self) -> u32 {
        self.visible_x
    }

    /// Even number of tile rows needed to cover the viewport.
    #[must_use]
    pub const fn visible_y(&self) -> u32 {
        self.visible_y
    }

    /// Columns in the render window, padding included.
    #[must_use]
    pub const fn window_columns(&self) -> u32 {
        self.visible_x.saturating_add(WINDOW_PADDING)
    }

    /// Rows in the render window, padding included.
    #[must_use]
    pub const fn window_rows(&self) -> u32 {
        self.visible_y.saturating_add(WINDOW_PADDING)
    }

    /// Top-left pixel of the screen slot the player is drawn in.
    #[must_use]
    pub fn centre_slot(&self) -> Vec2 {
        Vec2::new(
            (self.visible_x / 2) as f32 * self.tile_size,
            (self.visible_y / 2) as f32 * self.tile_size,
        )
    }
}

fn visible_count(extent: f32, tile_size: f32) -> Option<u32> {
    let count = (extent / tile_size).ceil();
    if !count.is_finite() || count > MAX_VISIBLE_TILES as f32 {
        return None;
    }
    let count = count as u32;
    Some(count + count % 2)
}

/// Maps window cells to screen pixels for one frame.
///
/// `tile` is the discrete camera tile and `player` the continuous position.
/// Their difference, plus the one leading padding cell, is subtracted from
/// every cell so the window scrolls smoothly between tile centres and does
/// not jump when the camera tile changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    tile: TilePosition,
    player: PlayerPosition,
    tile_size: f32,
}

impl Camera {
    /// Creates a camera for the provided frame state.
    #[must_use]
    pub const fn new(tile: TilePosition, player: PlayerPosition, tile_size: f32) -> Self {
        Self {
            tile,
            player,
            tile_size,
        }
    }

    /// Discrete tile the camera is centred on.
    #[must_use]
    pub const fn tile(&self) -> TilePosition {
        self.tile
    }

    /// Top-left pixel of window cell `(column, row)`.
    #[must_use]
    pub fn window_to_screen(&self, column: u32, row: u32) -> Vec2 {
        let size = self.tile_size;
        let scroll_x = (self.player.x - self.tile.x() as f32) * size + size;
        let scroll_y = (self.player.y - self.tile.y() as f32) * size + size;
        Vec2::new(
            (column as f32 * size).ceil() - scroll_x,
            (row as f32 * size).ceil() - scroll_y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_round_up_to_even() {
        let metrics = ViewportMetrics::new(64.0, 800.0, 600.0).expect("valid");
        assert_eq!(metrics.visible_x(), 14);
        assert_eq!(metrics.visible_y(), 10);
        assert_eq!(metrics.window_columns(), 16);
        assert_eq!(metrics.window_rows(), 12);

        let exact = ViewportMetrics::new(64.0, 640.0, 64.0).expect("valid");
        assert_eq!(exact.visible_x(), 10);
        assert_eq!(exact.visible_y(), 2);
    }

    #[test]
    fn empty_viewport_has_only_padding() {
        let metrics = ViewportMetrics::new(32.0, 0.0, 0.0).expect("valid");
        assert_eq!(metrics.visible_x(), 0);
        assert_eq!(metrics.window_columns(), WINDOW_PADDING);
    }

    #[test]
    fn invalid_sizes_are_rejected() {
        assert_eq!(
            ViewportMetrics::new(0.0, 100.0, 100.0),
            Err(RenderingError::InvalidTileSize { tile_size: 0.0 })
        );
        assert!(matches!(
            ViewportMetrics::new(16.0, -1.0, 100.0),
            Err(RenderingError::InvalidViewport { .. })
        ));
        assert!(ViewportMetrics::new(f32::NAN, 100.0, 100.0).is_err());
    }

    #[test]
    fn oversized_viewports_are_rejected() {
        assert!(matches!(
            ViewportMetrics::new(1.0, f32::MAX, 100.0),
            Err(RenderingError::InvalidViewport { .. })
        ));
        assert!(ViewportMetrics::new(1e-30, 100.0, 100.0).is_err());

        let largest = ViewportMetrics::new(1.0, MAX_VISIBLE_TILES as f32, 1.0).expect("valid");
        assert_eq!(largest.visible_x(), MAX_VISIBLE_TILES);
        assert_eq!(largest.window_columns(), MAX_VISIBLE_TILES + WINDOW_PADDING);
    }

    #[test]
    fn aligned_player_shifts_by_one_tile() {
        let camera = Camera::new(TilePosition::new(5, 5), PlayerPosition::new(5.0, 5.0), 64.0);
        assert_eq!(camera.window_to_screen(0, 0), Vec2::new(-64.0, -64.0));
        assert_eq!(camera.window_to_screen(3, 2), Vec2::new(128.0, 64.0));
    }

    #[test]
    fn fractional_player_scrolls_the_window() {
        let camera = Camera::new(TilePosition::new(5, 5), PlayerPosition::new(5.25, 4.75), 64.0);
        assert_eq!(camera.window_to_screen(1, 1), Vec2::new(-16.0, 16.0));
    }

    #[test]
    fn crossing_a_tile_boundary_keeps_the_world_in_place() {
        // Grid column 6 sits one window column further left once the camera advances.
        let before = Camera::new(TilePosition::new(5, 5), PlayerPosition::new(5.5, 5.0), 64.0);
        let after = Camera::new(TilePosition::new(6, 5), PlayerPosition::new(5.5, 5.0), 64.0);
        assert_eq!(before.window_to_screen(4, 0), after.window_to_screen(3, 0));
    }
}
