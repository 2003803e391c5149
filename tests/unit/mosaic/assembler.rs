//! Tests for parallel assembly and alpha composition

#[cfg(test)]
mod tests {
    use crate::fixtures::{BASE_COLOR, SPOT_COLOR, blobs, solid, test_assets};
    use image::{Rgba, RgbaImage};
    use spotmosaic::MosaicError;
    use spotmosaic::mosaic::MosaicAssembler;
    use spotmosaic::mosaic::assembler::{default_workers, paste_with_alpha};
    use spotmosaic::pattern::codec::{ALL_DARK_ID, ALL_LIGHT_ID};
    use std::sync::atomic::{AtomicUsize, Ordering};

    // Tests light cells take the light layout while padded edge cells are searched
    // Verified by padding samples with white
    #[test]
    fn test_light_image() {
        let assets = test_assets();
        let assembler = MosaicAssembler::new(&assets, Some(2)).expect("Failed to build assembler");

        let mosaic = assembler
            .assemble(&solid(60, 47, 220))
            .expect("Failed to assemble");

        assert_eq!(mosaic.image.dimensions(), (89, 104));
        assert_eq!(mosaic.ids.shape(), (2, 3));
        assert_eq!(mosaic.ids.get(0, 0), Some(ALL_LIGHT_ID));
        assert_eq!(mosaic.ids.get(1, 0), Some(ALL_LIGHT_ID));
        assert_eq!(mosaic.fast_path_tiles, 2);
    }

    // Tests a black image takes the dark layout in every cell
    // Verified by composing with the light layout
    #[test]
    fn test_dark_image() {
        let assets = test_assets();
        let assembler = MosaicAssembler::new(&assets, Some(2)).expect("Failed to build assembler");

        let mosaic = assembler
            .assemble(&solid(60, 47, 0))
            .expect("Failed to assemble");

        assert!(mosaic.ids.as_array().iter().all(|&id| id == ALL_DARK_ID));
        assert_eq!(mosaic.fast_path_tiles, 6);
    }

    // Tests transparent sprite pixels leave the canvas untouched
    // Verified by pasting without the alpha weight
    #[test]
    fn test_composition_keeps_transparency() {
        let assets = test_assets();
        let assembler = MosaicAssembler::new(&assets, Some(1)).expect("Failed to build assembler");

        let mosaic = assembler
            .assemble(&solid(15, 7, 0))
            .expect("Failed to assemble");

        assert_eq!(mosaic.ids.get(0, 0), Some(ALL_DARK_ID));
        assert_eq!(*mosaic.image.get_pixel(0, 0), Rgba([0, 0, 0, 0]));
        assert_eq!(*mosaic.image.get_pixel(5, 30), BASE_COLOR);
        assert_eq!(*mosaic.image.get_pixel(10, 10), SPOT_COLOR);
    }

    // Tests worker count does not change the output
    // Verified by composing in completion order
    #[test]
    fn test_deterministic_across_workers() {
        let assets = test_assets();
        let source = blobs(60, 47);

        let single = MosaicAssembler::new(&assets, Some(1))
            .expect("Failed to build assembler")
            .assemble(&source)
            .expect("Failed to assemble");
        let several = MosaicAssembler::new(&assets, Some(3))
            .expect("Failed to build assembler")
            .assemble(&source)
            .expect("Failed to assemble");

        assert_eq!(single.ids, several.ids);
        assert_eq!(single.image, several.image);
        assert_eq!(single.fast_path_tiles, several.fast_path_tiles);
    }

    // Tests the progress callback fires once per cell
    // Verified by calling it only for searched tiles
    #[test]
    fn test_progress_callback() {
        let assets = test_assets();
        let assembler = MosaicAssembler::new(&assets, Some(2)).expect("Failed to build assembler");
        let finished = AtomicUsize::new(0);

        assembler
            .assemble_with_progress(&solid(60, 47, 0), || {
                finished.fetch_add(1, Ordering::Relaxed);
            })
            .expect("Failed to assemble");

        assert_eq!(finished.load(Ordering::Relaxed), 6);
    }

    // Tests images too small for one tile are rejected
    // Verified by allowing empty grids
    #[test]
    fn test_image_too_small() {
        let assets = test_assets();
        let assembler = MosaicAssembler::new(&assets, Some(1)).expect("Failed to build assembler");

        let result = assembler.assemble(&solid(14, 40, 0));
        assert!(matches!(result, Err(MosaicError::InvalidSourceData { .. })));
    }

    // Tests worker counts
    // Verified by ignoring the requested count
    #[test]
    fn test_worker_count() {
        let assets = test_assets();
        let assembler = MosaicAssembler::new(&assets, Some(3)).expect("Failed to build assembler");
        assert_eq!(assembler.workers(), 3);
        assert!(default_workers() >= 1);

        let result = MosaicAssembler::new(&assets, Some(0));
        assert!(matches!(
            result,
            Err(MosaicError::InvalidParameter {
                parameter: "threads",
                ..
            })
        ));
    }

    // Tests opaque, transparent and half-transparent pastes
    // Verified by truncating instead of rounding the blend
    #[test]
    fn test_paste_with_alpha() {
        let mut canvas = RgbaImage::from_pixel(3, 1, Rgba([10, 20, 30, 255]));
        let tile = RgbaImage::from_fn(3, 1, |x, _| match x {
            0 => Rgba([200, 100, 50, 255]),
            1 => Rgba([200, 100, 50, 0]),
            _ => Rgba([255, 255, 255, 128]),
        });

        paste_with_alpha(&mut canvas, &tile, 0, 0);

        assert_eq!(*canvas.get_pixel(0, 0), Rgba([200, 100, 50, 255]));
        assert_eq!(*canvas.get_pixel(1, 0), Rgba([10, 20, 30, 255]));
        // Channels become (src * 128 + dst * 127) / 255, rounded
        assert_eq!(*canvas.get_pixel(2, 0), Rgba([133, 138, 143, 191]));
    }

    // Tests pixels falling off the canvas are dropped
    // Verified by indexing without bounds checks
    #[test]
    fn test_paste_clips_to_canvas() {
        let mut canvas = RgbaImage::new(4, 4);
        let tile = RgbaImage::from_pixel(3, 3, Rgba([9, 9, 9, 255]));

        paste_with_alpha(&mut canvas, &tile, 2, 2);

        assert_eq!(*canvas.get_pixel(3, 3), Rgba([9, 9, 9, 255]));
        assert_eq!(*canvas.get_pixel(1, 1), Rgba([0, 0, 0, 0]));
    }
}
