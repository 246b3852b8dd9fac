//! Tests for configuration constants consistency

#[cfg(test)]
mod tests {
    use tilesynth::io::configuration::{
        AIR_TILE, DEFAULT_CATALOG_SIZE, DEFAULT_MAX_ATTEMPTS, DEFAULT_PALETTE,
        DEFAULT_SAMPLE_DIMENSIONS, DEFAULT_SAMPLE_TILES, GIF_FRAME_DELAY_MS, UNDETERMINED_TILE,
        VIEWER_MIN_FRAME_DELAY_MS,
    };

    // Tests the built-in sample tiles fit the sample and the catalog
    #[test]
    fn test_builtin_sample_consistency() {
        let [width, height, depth] = DEFAULT_SAMPLE_DIMENSIONS;
        for ([x, y, z], tile) in DEFAULT_SAMPLE_TILES {
            assert!(x < width && y < height && z < depth);
            assert!(tile > 0);
            assert!((tile as usize) < DEFAULT_CATALOG_SIZE);
        }
    }

    // Tests every built-in tile has a color and air is invisible
    #[test]
    fn test_palette_covers_catalog() {
        assert_eq!(DEFAULT_PALETTE.len(), DEFAULT_CATALOG_SIZE);
        let [_, _, _, alpha] = DEFAULT_PALETTE.get(AIR_TILE).copied().unwrap_or_default();
        assert_eq!(alpha, 0);
    }

    // Tests sentinel and retry defaults
    #[test]
    fn test_defaults() {
        assert!(UNDETERMINED_TILE < 0);
        assert!(DEFAULT_MAX_ATTEMPTS >= 1);
        assert!(GIF_FRAME_DELAY_MS > 0);
        assert!(VIEWER_MIN_FRAME_DELAY_MS >= GIF_FRAME_DELAY_MS);
    }
}
