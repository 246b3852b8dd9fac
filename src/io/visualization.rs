//! Resolution capture and GIF generation for the collapse order

use image::{Delay, Frame, Rgba, RgbaImage};
use std::path::Path;

use crate::algorithm::selection::ResolutionObserver;
use crate::io::configuration::VIEWER_MIN_FRAME_DELAY_MS;
use crate::io::error::{AlgorithmError, Result};
use crate::io::image::{canvas_size, pixel_position};
use crate::spatial::{Dimensions, Position, TileId, Topology};

/// A single tile resolution event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileResolution {
    /// Resolved cell
    pub position: Position,
    /// Tile it was resolved to
    pub tile: TileId,
}

/// Records resolved tiles so the reveal order can be replayed as a GIF
pub struct ResolutionCapture {
    pub(crate) resolutions: Vec<TileResolution>,
    dimensions: Dimensions,
    topology: Topology,
    color_mapping: Vec<[u8; 4]>,
    empty_color: [u8; 4],
}

impl ResolutionCapture {
    /// The average of all tile colors is used for unresolved cells
    pub fn new(dimensions: Dimensions, topology: Topology, color_mapping: Vec<[u8; 4]>) -> Self {
        let empty_color = if color_mapping.is_empty() {
            [128, 128, 128, 255]
        } else {
            let mut sums = [0u32; 4];
            for color in &color_mapping {
                for (sum, &channel) in sums.iter_mut().zip(color) {
                    *sum += u32::from(channel);
                }
            }
            let count = color_mapping.len() as u32;
            sums.map(|sum| (sum / count) as u8)
        };

        Self {
            resolutions: Vec::with_capacity(dimensions.volume()),
            dimensions,
            topology,
            color_mapping,
            empty_color,
        }
    }

    /// Returns all recorded resolution events
    pub fn resolutions(&self) -> &[TileResolution] {
        &self.resolutions
    }

    /// Returns the total number of recorded events
    pub const fn resolution_count(&self) -> usize {
        self.resolutions.len()
    }

    /// Export the captured events as a GIF with automatic frame skipping
    ///
    /// Requested delays below what viewers support are raised to the viewer
    /// minimum, and frames are skipped so the apparent speed is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No resolutions were captured
    /// - A resolved tile has no color
    /// - File system operations fail
    /// - GIF encoding fails
    pub fn export_gif(&self, output_path: &Path, frame_delay_ms: u32) -> Result<()> {
        if self.resolutions.is_empty() {
            return Err(AlgorithmError::InvalidSourceData {
                reason: "No tile resolutions captured for visualization".to_string(),
            });
        }

        let effective_delay_ms = frame_delay_ms.max(VIEWER_MIN_FRAME_DELAY_MS);
        let skip_factor = if frame_delay_ms < VIEWER_MIN_FRAME_DELAY_MS {
            VIEWER_MIN_FRAME_DELAY_MS.div_ceil(frame_delay_ms.max(1))
        } else {
            1
        };

        let frames = self.generate_frames(effective_delay_ms, skip_factor as usize)?;

        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AlgorithmError::FileSystem {
                path: parent.to_path_buf(),
                operation: "create directory",
                source: e,
            })?;
        }

        let file = std::fs::File::create(output_path).map_err(|e| AlgorithmError::FileSystem {
            path: output_path.to_path_buf(),
            operation: "create file",
            source: e,
        })?;

        let mut encoder = image::codecs::gif::GifEncoder::new(file);
        encoder
            .encode_frames(frames)
            .map_err(|e| AlgorithmError::ImageExport {
                path: output_path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    fn generate_frames(&self, delay_ms: u32, skip_factor: usize) -> Result<Vec<Frame>> {
        let (width, height) = canvas_size(self.dimensions, self.topology);
        let mut canvas = RgbaImage::new(width, height);
        for position in self.dimensions.positions() {
            let (px, py) = pixel_position(self.dimensions, self.topology, position);
            canvas.put_pixel(px, py, Rgba(self.empty_color));
        }

        let delay = Delay::from_numer_denom_ms(delay_ms, 1);
        let mut frames = vec![Frame::from_parts(canvas.clone(), 0, 0, delay)];

        for (index, resolution) in self.resolutions.iter().enumerate() {
            let color = self
                .color_mapping
                .get(resolution.tile)
                .copied()
                .ok_or(AlgorithmError::InvalidTileIndex {
                    index: resolution.tile,
                    max_tiles: self.color_mapping.len(),
                })?;
            let (px, py) = pixel_position(self.dimensions, self.topology, resolution.position);
            canvas.put_pixel(px, py, Rgba(color));

            let is_last = index + 1 == self.resolutions.len();
            if (index + 1) % skip_factor == 0 || is_last {
                frames.push(Frame::from_parts(canvas.clone(), 0, 0, delay));
            }
        }

        // Final frame displays longer for better visibility
        frames.push(Frame::from_parts(
            canvas,
            0,
            0,
            Delay::from_numer_denom_ms(delay_ms * 25, 1),
        ));

        Ok(frames)
    }
}

impl ResolutionObserver for ResolutionCapture {
    fn tile_resolved(&mut self, position: Position, tile: TileId) {
        self.resolutions.push(TileResolution { position, tile });
    }
}
