//! Camera-centred sliding window over the tile grid and the per-frame draw pass.

use castaway_core::{PlayerPosition, SpriteKey, TilePosition};
use castaway_world::{Tile, TileGrid};
use glam::Vec2;

use crate::{Camera, Canvas, Color, RenderingError, ViewportMetrics, NEIGHBOUR_RING};

/// Upward shift of the player sprite, in tile units (38px on a 64px tile).
pub const PLAYER_LIFT: f32 = 38.0 / 64.0;

/// Frame state handed to [`ViewportRenderer::render`].
#[derive(Clone, Copy, Debug)]
pub struct RenderContext<'a> {
    grid: &'a TileGrid,
    camera_tile: TilePosition,
    player: PlayerPosition,
}

impl<'a> RenderContext<'a> {
    /// Bundles the grid with the camera tile and continuous player position.
    #[must_use]
    pub const fn new(grid: &'a TileGrid, camera_tile: TilePosition, player: PlayerPosition) -> Self {
        Self {
            grid,
            camera_tile,
            player,
        }
    }

    /// Grid being rendered.
    #[must_use]
    pub const fn grid(&self) -> &'a TileGrid {
        self.grid
    }

    /// Discrete tile the window is centred on.
    #[must_use]
    pub const fn camera_tile(&self) -> TilePosition {
        self.camera_tile
    }

    /// Continuous player position in tile units.
    #[must_use]
    pub const fn player(&self) -> PlayerPosition {
        self.player
    }
}

/// Cardinal side of a cell that a neighbour occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeSide {
    /// Neighbour at `x + 1`.
    Right,
    /// Neighbour at `y + 1`.
    Below,
    /// Neighbour at `x - 1`.
    Left,
    /// Neighbour at `y - 1`.
    Above,
}

impl EdgeSide {
    /// Sides in the order edges are drawn.
    pub const ALL: [EdgeSide; 4] = [EdgeSide::Right, EdgeSide::Below, EdgeSide::Left, EdgeSide::Above];

    /// Window offset of the neighbour on this side.
    #[must_use]
    pub const fn offset(self) -> (i64, i64) {
        match self {
            Self::Right => (1, 0),
            Self::Below => (0, 1),
            Self::Left => (-1, 0),
            Self::Above => (0, -1),
        }
    }

    /// Clockwise rotation applied to a transition sprite blending in from this side.
    #[must_use]
    pub const fn rotation_degrees(self) -> f32 {
        match self {
            Self::Right => 270.0,
            Self::Below => 0.0,
            Self::Left => 90.0,
            Self::Above => 180.0,
        }
    }
}

/// Reusable buffer of grid positions covering the viewport plus padding.
///
/// Cells past the grid edge hold `None` and render as background. An extra
/// ring of [`NEIGHBOUR_RING`] cells around the drawn area is filled too, so
/// edge cells still see their outer neighbours.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderWindow {
    columns: u32,
    rows: u32,
    origin_offset: (i64, i64),
    cells: Vec<Option<TilePosition>>,
}

impl RenderWindow {
    /// Allocates an empty window sized for the provided metrics.
    #[must_use]
    pub fn new(metrics: &ViewportMetrics) -> Self {
        let columns = metrics.window_columns();
        let rows = metrics.window_rows();
        let stored = |drawn: u32| drawn as usize + 2 * NEIGHBOUR_RING as usize;
        Self {
            columns,
            rows,
            // Window cell (1 + visible / 2) holds the camera tile.
            origin_offset: (
                1 + i64::from(metrics.visible_x() / 2),
                1 + i64::from(metrics.visible_y() / 2),
            ),
            cells: vec![None; stored(columns) * stored(rows)],
        }
    }

    /// Number of drawn columns, padding included.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of drawn rows, padding included.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Grid position shown in drawn window cell `(column, row)`, if any.
    #[must_use]
    pub fn cell(&self, column: u32, row: u32) -> Option<TilePosition> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.stored(i64::from(column), i64::from(row))
    }

    /// Re-centres the window, neighbour ring included, on `camera` in place.
    pub fn refill(&mut self, camera: TilePosition, grid_size: u32) {
        let (offset_x, offset_y) = self.origin_offset;
        let ring = i64::from(NEIGHBOUR_RING);
        let stride = self.stride();
        for (index, cell) in self.cells.iter_mut().enumerate() {
            let column = (index % stride) as i64 - ring;
            let row = (index / stride) as i64 - ring;
            *cell = camera
                .checked_offset(column - offset_x, row - offset_y)
                .filter(|position| position.x() < grid_size && position.y() < grid_size);
        }
    }

    fn neighbour(&self, column: u32, row: u32, side: EdgeSide) -> Option<TilePosition> {
        let (dx, dy) = side.offset();
        self.stored(i64::from(column) + dx, i64::from(row) + dy)
    }

    fn stride(&self) -> usize {
        self.columns as usize + 2 * NEIGHBOUR_RING as usize
    }

    /// Lookup in drawn coordinates that also reaches into the neighbour ring.
    fn stored(&self, column: i64, row: i64) -> Option<TilePosition> {
        let ring = i64::from(NEIGHBOUR_RING);
        let column = usize::try_from(column + ring).ok()?;
        let row = usize::try_from(row + ring).ok()?;
        let stride = self.stride();
        if column >= stride {
            return None;
        }
        self.cells.get(row * stride + column).copied().flatten()
    }
}

/// Draws the visible part of the grid around the camera every frame.
#[derive(Clone, Debug)]
pub struct ViewportRenderer {
    metrics: ViewportMetrics,
    window: RenderWindow,
    background: Color,
    last_view: Option<(TilePosition, PlayerPosition, u32)>,
}

impl ViewportRenderer {
    /// Creates a renderer with a window sized for `metrics`.
    #[must_use]
    pub fn new(metrics: ViewportMetrics, background: Color) -> Self {
        Self {
            window: RenderWindow::new(&metrics),
            metrics,
            background,
            last_view: None,
        }
    }

    /// Current viewport metrics.
    #[must_use]
    pub const fn metrics(&self) -> &ViewportMetrics {
        &self.metrics
    }

    /// Window as filled by the most recent frame.
    #[must_use]
    pub const fn window(&self) -> &RenderWindow {
        &self.window
    }

    /// Camera tile and player position of the most recent frame.
    #[must_use]
    pub fn last_view(&self) -> Option<(TilePosition, PlayerPosition)> {
        self.last_view.map(|(camera, player, _)| (camera, player))
    }

    /// Draws one frame.
    ///
    /// Cells are visited row by row; each draws its base sprite, damage
    /// overlay, items and edge transitions before the next cell. The player
    /// is drawn last at the centre slot.
    pub fn render<C>(&mut self, context: &RenderContext<'_>, canvas: &mut C)
    where
        C: Canvas + ?Sized,
    {
        let grid = context.grid();
        self.window.refill(context.camera_tile(), grid.size());
        self.last_view = Some((context.camera_tile(), context.player(), grid.size()));

        let tile_size = self.metrics.tile_size();
        let extent = Vec2::splat(tile_size);
        let camera = Camera::new(context.camera_tile(), context.player(), tile_size);

        for row in 0..self.window.rows() {
            for column in 0..self.window.columns() {
                let origin = camera.window_to_screen(column, row);
                let Some(tile) = self.window.cell(column, row).and_then(|at| grid.get(at)) else {
                    canvas.fill_rect(origin, extent, self.background);
                    continue;
                };

                draw_tile(canvas, grid, tile, origin, extent);
                self.draw_edges(canvas, grid, tile, column, row, origin, extent);
            }
        }

        let player = self.metrics.centre_slot() - Vec2::new(0.0, PLAYER_LIFT * tile_size);
        canvas.draw_sprite(SpriteKey::Player, player, extent, 0.0);
    }

    /// Reconfigures the window for a new viewport size.
    ///
    /// The window is reallocated and refilled around the last rendered camera
    /// tile, which is kept along with the player position.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), RenderingError> {
        let metrics = ViewportMetrics::new(self.metrics.tile_size(), width, height)?;
        self.metrics = metrics;
        self.window = RenderWindow::new(&metrics);
        if let Some((camera, _, grid_size)) = self.last_view {
            self.window.refill(camera, grid_size);
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_edges<C>(
        &self,
        canvas: &mut C,
        grid: &TileGrid,
        tile: &Tile,
        column: u32,
        row: u32,
        origin: Vec2,
        extent: Vec2,
    ) where
        C: Canvas + ?Sized,
    {
        let own_priority = tile.kind().profile().transition_priority;
        for side in EdgeSide::ALL {
            let Some(neighbour) = self
                .window
                .neighbour(column, row, side)
                .and_then(|at| grid.get(at))
            else {
                continue;
            };
            let profile = neighbour.kind().profile();
            if profile.transition_priority <= own_priority {
                continue;
            }
            if let Some(sprite) = profile.transition_sprite {
                canvas.draw_sprite(sprite, origin, extent, side.rotation_degrees().to_radians());
            }
        }
    }
}

fn draw_tile<C>(canvas: &mut C, grid: &TileGrid, tile: &Tile, origin: Vec2, extent: Vec2)
where
    C: Canvas + ?Sized,
{
    let profile = tile.kind().profile();
    let lifted = origin - Vec2::new(0.0, profile.draw_offset * extent.y);
    canvas.draw_sprite(profile.sprite, lifted, extent, 0.0);

    let depletion = tile.depletion();
    if depletion > 0.0 {
        canvas.fill_rect(origin, extent, Color::WHITE.with_alpha(depletion));
    }

    for item in grid.items_at(tile.position()) {
        canvas.draw_sprite(item.item().sprite(), origin, extent, 0.0);
    }
}
