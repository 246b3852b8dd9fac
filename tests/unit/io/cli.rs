//! Tests for command-line parsing and the generation runner

#[cfg(test)]
mod tests {
    use ::image::{Rgba, RgbaImage};
    use clap::Parser;
    use tilesynth::AlgorithmError;
    use tilesynth::algorithm::propagation::PropagationMode;
    use tilesynth::algorithm::rules::RuleTable;
    use tilesynth::io::cli::{Cli, GenerationRunner};
    use tilesynth::spatial::{Dimensions, TileLayout, Topology};

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("tilesynth").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    // Tests default argument values
    #[test]
    fn test_defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.seed, 42);
        assert_eq!(cli.attempts, 2000);
        assert!(cli.sample.is_none());
        assert!(cli.should_show_progress());
        assert_eq!(cli.propagation_mode(), PropagationMode::VisitedOnce);
    }

    // Tests flags map onto settings
    #[test]
    fn test_flags() {
        let cli = parse(&[
            "--seed", "7", "-w", "3", "-H", "4", "-d", "5", "--fixpoint", "--quiet", "-a", "2",
        ]);
        assert_eq!(cli.seed, 7);
        assert_eq!((cli.width, cli.height, cli.depth), (Some(3), Some(4), Some(5)));
        assert_eq!(cli.attempts, 2);
        assert!(!cli.should_show_progress());
        assert_eq!(cli.propagation_mode(), PropagationMode::Fixpoint);
    }

    // Tests zero attempts are rejected
    #[test]
    fn test_zero_attempts() {
        let mut runner = GenerationRunner::new(parse(&["--quiet", "--attempts", "0"]));
        assert!(matches!(
            runner.process(),
            Err(AlgorithmError::InvalidParameter {
                parameter: "attempts",
                ..
            })
        ));
    }

    // Tests a catalog smaller than the sample is rejected
    #[test]
    fn test_catalog_too_small() {
        let mut runner = GenerationRunner::new(parse(&["--quiet", "--catalog", "3"]));
        assert!(matches!(
            runner.process(),
            Err(AlgorithmError::InvalidParameter {
                parameter: "catalog",
                ..
            })
        ));
    }

    // Tests preset images require an image sample
    #[test]
    fn test_prefill_needs_planar_sample() {
        let mut runner = GenerationRunner::new(parse(&["--quiet", "--prefill", "pre.png"]));
        assert!(matches!(
            runner.process(),
            Err(AlgorithmError::InvalidParameter {
                parameter: "prefill",
                ..
            })
        ));
    }

    // Tests the default invocation produces a grid that honors every rule
    #[test]
    fn test_default_invocation_generates() {
        let mut runner = GenerationRunner::new(parse(&["--quiet"]));
        let grid = runner.process().expect("default run completes");

        assert_eq!(grid.dimensions(), Dimensions::new(6, 6, 6));
        assert!(grid.is_fully_resolved());

        let sample = TileLayout::builtin_sample().expect("built-in sample");
        let rules = RuleTable::from_sample(&sample, 4).expect("rules");
        for position in grid.positions() {
            let tile = grid.cell(position).expect("in bounds").tile().expect("resolved");
            for &direction in Topology::Volumetric.directions() {
                let Some(neighbor) = grid.neighbor(position, direction) else {
                    continue;
                };
                let neighbor_tile = grid.cell(neighbor).expect("in bounds").tile();
                assert!(
                    neighbor_tile.is_some_and(|neighbor_tile| rules
                        .permitted(tile, direction)
                        .is_some_and(|set| set.contains(neighbor_tile)))
                );
            }
        }
    }

    // Tests an image sample run writes both outputs
    #[test]
    fn test_image_sample_generation() {
        let dir = tempfile::tempdir().expect("temp dir");
        let sample_path = dir.path().join("checker.png");
        let output = dir.path().join("grid.png");
        let gif = dir.path().join("grid.gif");

        let sample = RgbaImage::from_fn(4, 4, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        });
        sample.save(&sample_path).expect("write sample");

        for mode in [None, Some("--fixpoint")] {
            let mut args = vec![
                "--quiet",
                "--attempts",
                "1",
                "--sample",
                sample_path.to_str().expect("utf-8 path"),
                "-w",
                "5",
                "-H",
                "4",
                "--output",
                output.to_str().expect("utf-8 path"),
                "--visualize",
                gif.to_str().expect("utf-8 path"),
            ];
            args.extend(mode);
            let mut runner = GenerationRunner::new(parse(&args));
            let grid = runner.process().expect("checkerboard rules never contradict");

            assert_eq!(grid.dimensions(), Dimensions::planar(5, 4));
            assert!(grid.is_fully_resolved());
            for position in grid.positions() {
                let tile = grid.cell(position).expect("in bounds").tile();
                for &direction in Topology::Planar.directions() {
                    if let Some(neighbor) = grid.neighbor(position, direction) {
                        assert_ne!(grid.cell(neighbor).expect("in bounds").tile(), tile);
                    }
                }
            }
            assert!(output.exists());
            assert!(gif.exists());
        }
    }
}
