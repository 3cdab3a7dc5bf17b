//! Treasure map: the whole grid painted one pixel per tile.

use castaway_world::TileGrid;

/// RGBA8 image of the grid, row-major, four bytes per pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreasureMapImage {
    size: u32,
    pixels: Vec<u8>,
}

impl TreasureMapImage {
    /// Width in pixels; equals the grid size.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.size
    }

    /// Height in pixels; equals the grid size.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.size
    }

    /// Raw RGBA bytes.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Consumes the image and yields its RGBA bytes.
    #[must_use]
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Color of pixel `(x, y)`, if inside the image.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.size || y >= self.size {
            return None;
        }
        let start = (y as usize * self.size as usize + x as usize) * 4;
        let bytes = self.pixels.get(start..start + 4)?;
        Some([bytes[0], bytes[1], bytes[2], bytes[3]])
    }
}

/// Paints every tile with its terrain's map color, rotated by 180°.
///
/// Pixel `(px, py)` shows tile `(size - 1 - px, size - 1 - py)`.
#[must_use]
pub fn treasure_map(grid: &TileGrid) -> TreasureMapImage {
    let size = grid.size();
    let mut pixels = vec![0; size as usize * size as usize * 4];
    let last = size as usize - 1;

    for tile in grid.tiles() {
        let px = last - tile.position().x() as usize;
        let py = last - tile.position().y() as usize;
        let start = (py * size as usize + px) * 4;
        let [red, green, blue] = tile.kind().profile().map_color;
        pixels[start..start + 4].copy_from_slice(&[red, green, blue, u8::MAX]);
    }

    TreasureMapImage { size, pixels }
}
