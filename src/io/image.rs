//! PNG import of planar layouts and PNG export of generated grids

use image::{ImageBuffer, Rgba, RgbaImage};
use std::collections::HashMap;
use std::path::Path;

use crate::io::configuration::{LAYER_GAP_PIXELS, UNDETERMINED_TILE};
use crate::io::error::{AlgorithmError, Result};
use crate::spatial::{Dimensions, Grid, Position, TileLayout, Topology};

/// A planar layout decoded from an image, with the color of every tile
#[derive(Debug, Clone)]
pub struct ImageSample {
    /// Decoded tiles
    pub layout: TileLayout,
    /// RGBA color of each tile id
    pub color_mapping: Vec<[u8; 4]>,
}

/// Decode a planar sample from an RGBA image
///
/// Fully transparent pixels are undetermined. The most frequent opaque color
/// becomes tile 0 (air); the other colors follow in ascending RGBA order so
/// tile assignment is reproducible. The top image row is the highest Y.
///
/// # Errors
///
/// Returns `InvalidSourceData` if the image has no opaque pixel
pub fn sample_from_image(image: &RgbaImage) -> Result<ImageSample> {
    let mut counts: HashMap<[u8; 4], usize> = HashMap::new();
    for pixel in image.pixels() {
        let [_, _, _, alpha] = pixel.0;
        if alpha > 0 {
            *counts.entry(pixel.0).or_insert(0) += 1;
        }
    }

    let air = counts
        .iter()
        .max_by(|(color_a, count_a), (color_b, count_b)| {
            count_a.cmp(count_b).then_with(|| color_b.cmp(color_a))
        })
        .map(|(&color, _)| color)
        .ok_or_else(|| AlgorithmError::InvalidSourceData {
            reason: "sample image contains no opaque pixels".to_string(),
        })?;

    let mut others: Vec<[u8; 4]> = counts.keys().copied().filter(|&c| c != air).collect();
    others.sort_unstable();

    let mut color_mapping = Vec::with_capacity(others.len() + 1);
    color_mapping.push(air);
    color_mapping.extend(others);

    let layout = layout_from_image(image, &color_mapping)?;
    Ok(ImageSample {
        layout,
        color_mapping,
    })
}

/// Decode a planar layout against a known palette
///
/// Pixels whose color is in `color_mapping` become that tile, every other
/// pixel is undetermined.
///
/// # Errors
///
/// Returns an error if the image is too large for a grid
pub fn layout_from_image(image: &RgbaImage, color_mapping: &[[u8; 4]]) -> Result<TileLayout> {
    let color_to_tile: HashMap<[u8; 4], i32> = color_mapping
        .iter()
        .enumerate()
        .filter_map(|(tile, &color)| i32::try_from(tile).ok().map(|tile| (color, tile)))
        .collect();

    let (width, height) = (image.width() as usize, image.height() as usize);
    let mut layout = TileLayout::undetermined(Dimensions::planar(width, height), Topology::Planar)?;

    for (x, row, pixel) in image.enumerate_pixels() {
        let value = color_to_tile
            .get(&pixel.0)
            .copied()
            .unwrap_or(UNDETERMINED_TILE);
        let y = height - 1 - row as usize;
        layout.set([x as usize, y, 0], value)?;
    }

    Ok(layout)
}

/// Load a planar sample from a PNG file
///
/// # Errors
///
/// Returns an error if the file cannot be decoded or holds no opaque pixels
pub fn load_sample_png(path: &Path) -> Result<ImageSample> {
    sample_from_image(&open_rgba(path)?)
}

/// Load planar preset cells from a PNG file using a sample's palette
///
/// # Errors
///
/// Returns an error if the file cannot be decoded
pub fn load_prefill_png(path: &Path, color_mapping: &[[u8; 4]]) -> Result<TileLayout> {
    layout_from_image(&open_rgba(path)?, color_mapping)
}

fn open_rgba(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).map_err(|e| AlgorithmError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(img.to_rgba8())
}

/// Image size used to draw a grid
///
/// Planar grids map X to columns and Y to rows. Volumetric grids draw every
/// Y layer as an X-by-Z block, bottom layer first, left to right, separated
/// by a transparent gap.
pub const fn canvas_size(dimensions: Dimensions, topology: Topology) -> (u32, u32) {
    match topology {
        Topology::Planar => (dimensions.width as u32, dimensions.height as u32),
        Topology::Volumetric => {
            let layers = dimensions.height as u32;
            let gaps = layers.saturating_sub(1) * LAYER_GAP_PIXELS;
            (
                layers * dimensions.width as u32 + gaps,
                dimensions.depth as u32,
            )
        }
    }
}

/// Pixel that draws the cell at `position`
pub const fn pixel_position(
    dimensions: Dimensions,
    topology: Topology,
    position: Position,
) -> (u32, u32) {
    let [x, y, z] = position;
    match topology {
        Topology::Planar => (x as u32, (dimensions.height - 1 - y) as u32),
        Topology::Volumetric => {
            let block = dimensions.width as u32 + LAYER_GAP_PIXELS;
            (y as u32 * block + x as u32, z as u32)
        }
    }
}

/// Draw every resolved cell of a grid; unresolved cells stay transparent
///
/// # Errors
///
/// Returns `InvalidTileIndex` if a resolved tile has no color
pub fn render_grid(grid: &Grid, color_mapping: &[[u8; 4]]) -> Result<RgbaImage> {
    let dimensions = grid.dimensions();
    let topology = grid.topology();
    let (width, height) = canvas_size(dimensions, topology);
    let mut img: RgbaImage = ImageBuffer::new(width, height);

    for cell in grid.cells() {
        let Some(tile) = cell.tile() else {
            continue;
        };
        let color = color_mapping
            .get(tile)
            .copied()
            .ok_or(AlgorithmError::InvalidTileIndex {
                index: tile,
                max_tiles: color_mapping.len(),
            })?;
        let (px, py) = pixel_position(dimensions, topology, cell.position());
        img.put_pixel(px, py, Rgba(color));
    }

    Ok(img)
}

/// Export a grid as a PNG image
///
/// # Errors
///
/// Returns an error if:
/// - The grid has no resolved cells
/// - A resolved tile is out of bounds for the color mapping
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_grid_as_png(grid: &Grid, color_mapping: &[[u8; 4]], output_path: &Path) -> Result<()> {
    if grid.resolved_count() == 0 {
        return Err(AlgorithmError::InvalidSourceData {
            reason: "No tiles have been resolved in the grid".to_string(),
        });
    }

    let img = render_grid(grid, color_mapping)?;

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| AlgorithmError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    img.save(output_path)
        .map_err(|e| AlgorithmError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    Ok(())
}
