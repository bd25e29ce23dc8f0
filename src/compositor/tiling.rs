//! Tile origin calculation.

use crate::core::config::Placement;

/// Top-left corners of a grid covering `image` with `tile`-sized cells.
///
/// Origins start at (0, 0) and step by the tile size while they stay inside
/// the image, in row-major order. Cells on the right and bottom edges may be
/// clipped. A zero-sized tile yields no origins.
pub fn tile_origins(image: (u32, u32), tile: (u32, u32)) -> Vec<(u32, u32)> {
    let (width, height) = image;
    let (tile_w, tile_h) = tile;

    if tile_w == 0 || tile_h == 0 {
        return Vec::new();
    }

    (0..height)
        .step_by(tile_h as usize)
        .flat_map(|y| (0..width).step_by(tile_w as usize).map(move |x| (x, y)))
        .collect()
}

/// Origins at which the watermark is applied for `placement`.
pub fn placement_origins(
    placement: Placement,
    image: (u32, u32),
    tile: (u32, u32),
) -> Vec<(u32, u32)> {
    match placement {
        Placement::Single { x, y } => vec![(x, y)],
        Placement::Grid => tile_origins(image, tile),
    }
}
