//! Tests for frame selection, output naming and batch runs

#[cfg(test)]
mod tests {
    use crate::fixtures::{solid, test_assets};
    use spotmosaic::io::batch::{
        BatchJob, BatchRunner, BatchSummary, FrameFilter, SkipReason, discover_frames,
        frame_ids_path, frame_image_path, frame_output_exists,
    };
    use spotmosaic::mosaic::MosaicAssembler;
    use spotmosaic::mosaic::matrix::MatrixFormat;
    use std::path::Path;

    fn write_frames(dir: &Path, names: &[&str]) {
        for name in names {
            solid(60, 47, 0)
                .save(dir.join(name))
                .expect("Failed to save frame");
        }
    }

    fn job(input: &Path, output: &Path, filter: FrameFilter) -> BatchJob {
        BatchJob {
            input_dir: input.to_path_buf(),
            output_dir: output.to_path_buf(),
            filter,
            invert: false,
            format: MatrixFormat::Json,
        }
    }

    // Tests the skipped prefix takes precedence over parity
    // Verified by checking parity first
    #[test]
    fn test_skip_reason_order() {
        let filter = FrameFilter {
            skip: 3,
            skip_even: true,
            skip_odd: false,
        };

        assert_eq!(filter.skip_reason(0), Some(SkipReason::Prefix));
        assert_eq!(filter.skip_reason(2), Some(SkipReason::Prefix));
        assert_eq!(filter.skip_reason(3), None);
        assert_eq!(filter.skip_reason(4), Some(SkipReason::Even));
    }

    // Tests odd frames are skipped on request
    // Verified by swapping the parity test
    #[test]
    fn test_skip_odd() {
        let filter = FrameFilter {
            skip_odd: true,
            ..FrameFilter::default()
        };

        assert_eq!(filter.skip_reason(0), None);
        assert_eq!(filter.skip_reason(1), Some(SkipReason::Odd));
        assert_eq!(FrameFilter::default().skip_reason(1), None);
    }

    // Tests frames are discovered in sorted order and directories ignored
    // Verified by removing the sort
    #[test]
    fn test_discover_sorted() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        write_frames(dir.path(), &["c.png", "a.png", "b.png"]);
        std::fs::create_dir(dir.path().join("nested")).expect("Failed to create dir");

        let frames = discover_frames(dir.path()).expect("Failed to discover frames");
        let names: Vec<_> = frames
            .iter()
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().to_string())
            .collect();
        assert_eq!(names, ["a.png", "b.png", "c.png"]);
    }

    // Tests output names are zero padded to four digits
    // Verified by dropping the padding
    #[test]
    fn test_output_paths() {
        let out = Path::new("out");
        assert_eq!(frame_image_path(out, 7), Path::new("out/frame0007.png"));
        assert_eq!(
            frame_ids_path(out, 12, MatrixFormat::Text),
            Path::new("out/ids/frame0012.txt")
        );
    }

    // Tests existing outputs are detected by their stem
    // Verified by requiring an exact file name
    #[test]
    fn test_output_exists() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        assert!(!frame_output_exists(&dir.path().join("missing"), 0).expect("Failed to check"));

        std::fs::write(dir.path().join("frame0003.png.partial"), b"").expect("Failed to write");
        assert!(frame_output_exists(dir.path(), 3).expect("Failed to check"));
        assert!(!frame_output_exists(dir.path(), 4).expect("Failed to check"));
    }

    // Tests a batch writes every frame and resumes without redoing work
    // Verified by ignoring existing outputs
    #[test]
    fn test_run_and_resume() {
        let input = tempfile::tempdir().expect("Failed to create temp dir");
        let output = tempfile::tempdir().expect("Failed to create temp dir");
        write_frames(input.path(), &["a.png", "b.png"]);

        let assets = test_assets();
        let assembler = MosaicAssembler::new(&assets, Some(2)).expect("Failed to build assembler");
        let runner = BatchRunner::new(&assembler, None);
        let job = job(input.path(), output.path(), FrameFilter::default());

        let first = runner.run(&job).expect("Failed to run batch");
        assert_eq!(
            first,
            BatchSummary {
                processed: 2,
                skipped: 0
            }
        );
        assert!(frame_image_path(output.path(), 1).is_file());
        let ids = std::fs::read_to_string(frame_ids_path(output.path(), 0, MatrixFormat::Json))
            .expect("Failed to read identifiers");
        assert!(ids.starts_with("[[4280287232,"));

        let second = runner.run(&job).expect("Failed to rerun batch");
        assert_eq!(
            second,
            BatchSummary {
                processed: 0,
                skipped: 2
            }
        );
    }

    // Tests index filters leave frames unprocessed
    // Verified by applying the filter after processing
    #[test]
    fn test_run_with_filter() {
        let input = tempfile::tempdir().expect("Failed to create temp dir");
        let output = tempfile::tempdir().expect("Failed to create temp dir");
        write_frames(input.path(), &["0.png", "1.png", "2.png"]);

        let assets = test_assets();
        let assembler = MosaicAssembler::new(&assets, Some(1)).expect("Failed to build assembler");
        let filter = FrameFilter {
            skip: 1,
            skip_even: true,
            skip_odd: false,
        };

        let summary = BatchRunner::new(&assembler, None)
            .run(&job(input.path(), output.path(), filter))
            .expect("Failed to run batch");

        assert_eq!(summary.processed, 1);
        assert_eq!(summary.skipped, 2);
        assert!(frame_image_path(output.path(), 1).is_file());
        assert!(!frame_image_path(output.path(), 2).exists());
    }

    // Tests a missing input directory is reported
    // Verified by treating it as empty
    #[test]
    fn test_missing_input_directory() {
        let output = tempfile::tempdir().expect("Failed to create temp dir");
        let assets = test_assets();
        let assembler = MosaicAssembler::new(&assets, Some(1)).expect("Failed to build assembler");

        let result = BatchRunner::new(&assembler, None).run(&job(
            &output.path().join("absent"),
            output.path(),
            FrameFilter::default(),
        ));
        assert!(result.is_err());
    }

    // Tests skip reasons render readable messages
    // Verified by swapping two messages
    #[test]
    fn test_skip_reason_display() {
        assert_eq!(SkipReason::Existing.to_string(), "output already exists");
        assert_eq!(SkipReason::Prefix.to_string(), "inside skipped prefix");
    }
}
