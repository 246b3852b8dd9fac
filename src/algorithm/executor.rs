use crate::{
    algorithm::propagation::{PropagationMode, PropagationReport, Propagator, check_compatible},
    algorithm::rules::RuleTable,
    algorithm::selection::{RandomSelector, ResolutionObserver, collapse},
    io::configuration::DEFAULT_SEED,
    io::error::{AlgorithmError, Result},
    io::visualization::ResolutionCapture,
    spatial::{Grid, Position, TileId, TileLayout},
};

/// Parameters of one generation run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Seed of the random source used by unforced collapses
    pub seed: u64,
    /// Traversal used after every collapse
    pub propagation: PropagationMode,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            propagation: PropagationMode::default(),
        }
    }
}

/// Result of a single driver step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// One cell was collapsed and its restriction propagated
    Collapsed {
        /// Collapsed position
        position: Position,
        /// Tile chosen for it
        tile: TileId,
        /// What the following propagation did
        report: PropagationReport,
    },
    /// Every cell is resolved
    Complete,
}

/// Totals accumulated over a run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerationSummary {
    /// Collapses performed by the driver
    pub collapses: usize,
    /// Preset cells propagated from before scanning
    pub presets: usize,
    /// Narrowing steps that removed candidates
    pub cells_narrowed: usize,
    /// Candidates removed over the whole run
    pub tiles_removed: usize,
}

impl GenerationSummary {
    const fn absorb(&mut self, report: &PropagationReport) {
        self.cells_narrowed += report.cells_narrowed;
        self.tiles_removed += report.tiles_removed;
    }
}

/// Collapse/propagate driver for one grid
///
/// Owns the grid, the rules it is generated against, the propagation
/// scratch buffers and the random source. Cells are visited in scan order
/// (X outermost, then Y, then Z); every unresolved cell is collapsed and
/// its restriction propagated. A contradiction ends the run, there is no
/// backtracking.
///
/// Propagation never marks a cell resolved on its own. A cell narrowed to a
/// single candidate stays unresolved until the scan reaches it; collapsing
/// it then picks that candidate without drawing from the random source.
pub struct CollapseExecutor {
    rules: RuleTable,
    grid: Grid,
    propagator: Propagator,
    random_selector: RandomSelector,
    scan_order: Vec<Position>,
    cursor: usize,
    presets: Vec<(Position, TileId)>,
    presets_applied: bool,
    contradiction: Option<Position>,
    summary: GenerationSummary,
    /// Optional recording of every resolved tile
    pub visualization: Option<ResolutionCapture>,
}

impl CollapseExecutor {
    /// Create an executor for a prepared grid
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the rules don't match the grid's
    /// topology or catalog size
    pub fn new(rules: RuleTable, grid: Grid, config: ExecutorConfig) -> Result<Self> {
        check_compatible(&grid, &rules)?;

        let propagator = Propagator::new(grid.dimensions(), config.propagation);
        let scan_order = grid.positions().collect();
        let presets = grid
            .cells()
            .filter_map(|cell| cell.tile().map(|tile| (cell.position(), tile)))
            .collect();

        Ok(Self {
            rules,
            grid,
            propagator,
            random_selector: RandomSelector::new(config.seed),
            scan_order,
            cursor: 0,
            presets,
            presets_applied: false,
            contradiction: None,
            summary: GenerationSummary::default(),
            visualization: None,
        })
    }

    /// Learn rules from `sample` and prepare a grid from `target`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Either layout holds tiles outside the catalog
    /// - The layouts use different topologies
    pub fn from_layouts(
        sample: &TileLayout,
        target: &TileLayout,
        catalog_size: usize,
        config: ExecutorConfig,
    ) -> Result<Self> {
        let rules = RuleTable::from_sample(sample, catalog_size)?;
        let grid = Grid::from_layout(target, catalog_size)?;
        Self::new(rules, grid, config)
    }

    /// Start recording resolved tiles
    pub fn enable_visualization(&mut self, color_mapping: Vec<[u8; 4]>) {
        self.visualization = Some(ResolutionCapture::new(
            self.grid.dimensions(),
            self.grid.topology(),
            color_mapping,
        ));
    }

    /// Access the grid
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Access the rules
    pub const fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Totals so far
    pub const fn summary(&self) -> GenerationSummary {
        self.summary
    }

    /// Position of the contradiction that ended the run, if any
    pub const fn contradiction(&self) -> Option<Position> {
        self.contradiction
    }

    /// Give up the executor, keeping the grid
    pub fn into_grid(self) -> Grid {
        self.grid
    }

    /// Collapse one cell without propagating
    ///
    /// # Errors
    ///
    /// See [`collapse`]
    pub fn collapse(&mut self, position: Position, forced: Option<TileId>) -> Result<TileId> {
        collapse(
            &mut self.grid,
            position,
            forced,
            &mut self.random_selector,
            &mut self.visualization,
        )
        .map_err(|error| self.record_failure(error))
    }

    /// Propagate restrictions outward from `origin`
    ///
    /// # Errors
    ///
    /// Returns `Contradiction` when a domain would become empty, or
    /// `OutOfBounds` for an origin outside the grid
    pub fn propagate(&mut self, origin: Position) -> Result<PropagationReport> {
        let report = self
            .propagator
            .propagate(&mut self.grid, &self.rules, origin)
            .map_err(|error| self.record_failure(error))?;
        self.summary.absorb(&report);
        Ok(report)
    }

    /// Collapse one cell and propagate from it
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Self::collapse`] and [`Self::propagate`]
    pub fn collapse_and_propagate(
        &mut self,
        position: Position,
        forced: Option<TileId>,
    ) -> Result<(TileId, PropagationReport)> {
        let tile = self.collapse(position, forced)?;
        let report = self.propagate(position)?;
        Ok((tile, report))
    }

    /// Propagate from every preset cell, in scan order
    ///
    /// Presets are the cells already resolved when the executor was created.
    /// Runs at most once; the driver calls it before its first collapse.
    ///
    /// # Errors
    ///
    /// Returns `Contradiction` if the presets are inconsistent with the rules
    pub fn apply_presets(&mut self) -> Result<usize> {
        if self.presets_applied {
            return Ok(self.summary.presets);
        }
        self.presets_applied = true;

        let presets = std::mem::take(&mut self.presets);
        for (position, tile) in presets {
            self.visualization.tile_resolved(position, tile);
            self.propagate(position)?;
            self.summary.presets += 1;
        }

        Ok(self.summary.presets)
    }

    /// Advance to the next unresolved cell, collapse it and propagate
    ///
    /// # Errors
    ///
    /// Returns `Contradiction` once a propagation empties a domain; every
    /// later call returns the same contradiction
    pub fn step(&mut self) -> Result<StepOutcome> {
        if let Some(position) = self.contradiction {
            return Err(AlgorithmError::Contradiction { position });
        }
        self.apply_presets()?;

        while let Some(&position) = self.scan_order.get(self.cursor) {
            self.cursor += 1;
            if self.grid.cell(position)?.is_resolved() {
                continue;
            }

            let (tile, report) = self.collapse_and_propagate(position, None)?;
            self.summary.collapses += 1;
            return Ok(StepOutcome::Collapsed {
                position,
                tile,
                report,
            });
        }

        Ok(StepOutcome::Complete)
    }

    /// Step until every cell is resolved
    ///
    /// # Errors
    ///
    /// Returns the first `Contradiction` raised
    pub fn run(&mut self) -> Result<GenerationSummary> {
        while let StepOutcome::Collapsed { .. } = self.step()? {}
        Ok(self.summary)
    }

    /// True once every cell is resolved
    pub fn is_complete(&self) -> bool {
        self.grid.is_fully_resolved()
    }

    fn record_failure(&mut self, error: AlgorithmError) -> AlgorithmError {
        if let AlgorithmError::Contradiction { position } = &error {
            self.contradiction = Some(*position);
        }
        error
    }
}
