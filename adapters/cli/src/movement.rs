//! Minimal player movement used by the frame driver.

use castaway_rendering::{FrameInput, Scene};
use glam::Vec2;
use std::time::Duration;

/// Moves the player by the frame's input and re-centres the camera.
///
/// Each axis is resolved separately so the player slides along blocked
/// tiles. A step is rejected when the tile it lands on is outside the grid
/// or not walkable. Returns whether the player moved.
pub(crate) fn advance_player(
    scene: &mut Scene,
    input: FrameInput,
    frame: Duration,
    tiles_per_second: f32,
) -> bool {
    let step: Vec2 = input.movement * tiles_per_second * frame.as_secs_f32();
    let mut moved = false;

    for delta in [Vec2::new(step.x, 0.0), Vec2::new(0.0, step.y)] {
        if delta == Vec2::ZERO {
            continue;
        }
        let candidate = scene.player.translated(delta.x, delta.y);
        let walkable = candidate
            .occupied_tile()
            .and_then(|tile| scene.grid.get(tile))
            .is_some_and(|tile| tile.kind().walkable());
        if walkable {
            scene.player = candidate;
            moved = true;
        }
    }

    scene.follow_player();
    moved
}
