//! Command-line interface for sample-driven grid generation with retries

use crate::algorithm::executor::{CollapseExecutor, ExecutorConfig, StepOutcome};
use crate::algorithm::propagation::PropagationMode;
use crate::algorithm::rules::RuleTable;
use crate::io::configuration::{
    DEFAULT_CATALOG_SIZE, DEFAULT_MAX_ATTEMPTS, DEFAULT_PALETTE, DEFAULT_SEED,
    DEFAULT_TARGET_DIMENSIONS, GIF_FRAME_DELAY_MS,
};
use crate::io::error::{AlgorithmError, Result, invalid_parameter};
use crate::io::image::{export_grid_as_png, load_prefill_png, load_sample_png};
use crate::io::progress::ProgressManager;
use crate::spatial::{Dimensions, Grid, Position, TileLayout, Topology};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tilesynth")]
#[command(
    author,
    version,
    about = "Generate tile grids from the adjacencies of a sample"
)]
/// Command-line arguments for the generation tool
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Random seed for reproducible generation
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Target width (X extent)
    #[arg(short = 'w', long)]
    pub width: Option<usize>,

    /// Target height (Y extent, the up axis)
    #[arg(short = 'H', long)]
    pub height: Option<usize>,

    /// Target depth (Z extent, must be 1 for image samples)
    #[arg(short = 'd', long)]
    pub depth: Option<usize>,

    /// Planar sample PNG; the built-in volumetric column is used otherwise
    #[arg(long, value_name = "PNG")]
    pub sample: Option<PathBuf>,

    /// Planar PNG of preset cells, colored with the sample's palette
    #[arg(short, long, value_name = "PNG")]
    pub prefill: Option<PathBuf>,

    /// Catalog size, at least the number of tiles the sample uses
    #[arg(short, long, value_name = "N")]
    pub catalog: Option<usize>,

    /// Attempts with consecutive seeds before giving up on contradictions
    #[arg(short, long, value_name = "N", default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub attempts: usize,

    /// Propagate until no domain changes instead of visiting each cell once
    #[arg(short, long)]
    pub fixpoint: bool,

    /// Print the derived adjacency rules
    #[arg(short = 'r', long)]
    pub print_rules: bool,

    /// Write the generated grid as a PNG
    #[arg(short, long, value_name = "PNG")]
    pub output: Option<PathBuf>,

    /// Write the resolution order as an animated GIF
    #[arg(short, long, value_name = "GIF")]
    pub visualize: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Propagation mode selected by the flags
    pub const fn propagation_mode(&self) -> PropagationMode {
        if self.fixpoint {
            PropagationMode::Fixpoint
        } else {
            PropagationMode::VisitedOnce
        }
    }
}

/// Inputs shared by every attempt
struct Prepared {
    rules: RuleTable,
    target: TileLayout,
    palette: Vec<[u8; 4]>,
}

/// Orchestrates rule derivation, generation attempts and output files
pub struct GenerationRunner {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl GenerationRunner {
    /// Create a new runner with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Generate a grid according to CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An input file cannot be read or holds invalid data
    /// - A parameter is invalid
    /// - Every attempt ends in a contradiction
    /// - An output file cannot be written
    // Allow print for the rule dump and the generated grid
    #[allow(clippy::print_stdout)]
    pub fn process(&mut self) -> Result<Grid> {
        if self.cli.attempts == 0 {
            return Err(invalid_parameter(
                "attempts",
                &self.cli.attempts,
                &"at least one attempt is required",
            ));
        }

        let prepared = self.prepare()?;

        if self.cli.print_rules {
            print!("{}", prepared.rules);
        }

        let executor = self.generate(&prepared)?;

        if !self.cli.quiet {
            print!("{}", executor.grid());
        }

        self.write_outputs(&executor, &prepared.palette)?;
        Ok(executor.into_grid())
    }

    fn prepare(&self) -> Result<Prepared> {
        let (sample, mut palette, derived_catalog) = match &self.cli.sample {
            Some(path) => {
                let image_sample = load_sample_png(path)?;
                let derived = image_sample.color_mapping.len();
                (image_sample.layout, image_sample.color_mapping, derived)
            }
            None => (
                TileLayout::builtin_sample()?,
                DEFAULT_PALETTE.to_vec(),
                DEFAULT_CATALOG_SIZE,
            ),
        };

        let catalog_size = self.cli.catalog.unwrap_or(derived_catalog);
        if catalog_size < derived_catalog {
            return Err(invalid_parameter(
                "catalog",
                &catalog_size,
                &format!("the sample uses {derived_catalog} tiles"),
            ));
        }
        palette.extend((palette.len()..catalog_size).map(filler_color));

        let rules = RuleTable::from_sample(&sample, catalog_size)?;
        let target = self.target_layout(sample.topology(), &palette)?;

        Ok(Prepared {
            rules,
            target,
            palette,
        })
    }

    fn target_layout(&self, topology: Topology, palette: &[[u8; 4]]) -> Result<TileLayout> {
        if let Some(path) = &self.cli.prefill {
            if topology != Topology::Planar {
                return Err(invalid_parameter(
                    "prefill",
                    &path.display(),
                    &"preset images need a planar image sample",
                ));
            }
            let layout = load_prefill_png(path, palette)?;
            let dimensions = layout.dimensions();
            let requested = [self.cli.width, self.cli.height, self.cli.depth];
            let actual = [dimensions.width, dimensions.height, dimensions.depth];
            if requested
                .iter()
                .zip(actual)
                .any(|(wanted, size)| wanted.is_some_and(|wanted| wanted != size))
            {
                return Err(invalid_parameter(
                    "prefill",
                    &path.display(),
                    &format!("image is {dimensions}, which differs from the requested extents"),
                ));
            }
            return Ok(layout);
        }

        let [default_width, default_height, default_depth] = DEFAULT_TARGET_DIMENSIONS;
        let default_depth = match topology {
            Topology::Volumetric => default_depth,
            Topology::Planar => 1,
        };
        let dimensions = Dimensions::new(
            self.cli.width.unwrap_or(default_width),
            self.cli.height.unwrap_or(default_height),
            self.cli.depth.unwrap_or(default_depth),
        );
        TileLayout::undetermined(dimensions, topology)
    }

    // Allow print for user feedback on failed attempts
    #[allow(clippy::print_stderr)]
    fn generate(&mut self, prepared: &Prepared) -> Result<CollapseExecutor> {
        let attempts = self.cli.attempts;
        let total_cells = prepared.target.dimensions().volume();
        let mut last_contradiction: Position = [0, 0, 0];

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(attempts);
        }

        for attempt in 0..attempts {
            let seed = self.cli.seed.wrapping_add(attempt as u64);
            let config = ExecutorConfig {
                seed,
                propagation: self.cli.propagation_mode(),
            };
            let grid = Grid::from_layout(&prepared.target, prepared.rules.catalog_size())?;
            let mut executor = CollapseExecutor::new(prepared.rules.clone(), grid, config)?;
            if self.cli.visualize.is_some() {
                executor.enable_visualization(prepared.palette.clone());
            }

            if let Some(ref mut pm) = self.progress_manager {
                pm.start_attempt(attempt, seed, total_cells);
            }

            match self.drive(&mut executor, attempt) {
                Ok(()) => {
                    if let Some(ref mut pm) = self.progress_manager {
                        pm.complete_attempt(attempt);
                        pm.finish();
                    }
                    return Ok(executor);
                }
                Err(AlgorithmError::Contradiction { position }) => {
                    last_contradiction = position;
                    if let Some(ref mut pm) = self.progress_manager {
                        pm.fail_attempt(attempt);
                    }
                    if !self.cli.quiet {
                        let [x, y, z] = position;
                        eprintln!(
                            "Attempt {} with seed {seed} hit a contradiction at ({x}, {y}, {z})",
                            attempt + 1
                        );
                    }
                }
                Err(error) => return Err(error),
            }
        }

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }

        Err(AlgorithmError::AttemptsExhausted {
            attempts,
            position: last_contradiction,
        })
    }

    fn drive(&mut self, executor: &mut CollapseExecutor, attempt: usize) -> Result<()> {
        loop {
            match executor.step()? {
                StepOutcome::Collapsed { .. } => {
                    if let Some(ref mut pm) = self.progress_manager {
                        pm.update(attempt, executor.grid().resolved_count());
                    }
                }
                StepOutcome::Complete => return Ok(()),
            }
        }
    }

    // Allow print for user feedback on written files
    #[allow(clippy::print_stderr)]
    fn write_outputs(&self, executor: &CollapseExecutor, palette: &[[u8; 4]]) -> Result<()> {
        if let Some(path) = &self.cli.output {
            export_grid_as_png(executor.grid(), palette, path)?;
            if !self.cli.quiet {
                eprintln!("Wrote {}", path.display());
            }
        }

        if let (Some(path), Some(capture)) = (&self.cli.visualize, &executor.visualization) {
            capture.export_gif(path, GIF_FRAME_DELAY_MS)?;
            if !self.cli.quiet {
                eprintln!("Wrote {}", path.display());
            }
        }

        Ok(())
    }
}

/// Distinct opaque color for catalog tiles the sample never shows
fn filler_color(tile: usize) -> [u8; 4] {
    let seed = (tile as u32).wrapping_mul(2_654_435_761);
    let [r, g, b, _] = seed.to_le_bytes();
    [r, g, b, 255]
}
