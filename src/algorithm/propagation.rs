//! Constraint propagation from a collapsed cell
//!
//! Two traversal modes are available. `VisitedOnce` walks the grid depth
//! first and narrows each reachable cell at most once per call, in the fixed
//! direction order of the topology. A cell that was already visited is not
//! narrowed again even if a later sibling would restrict it further, so one
//! call may leave a domain that a later call still tightens. `Fixpoint`
//! keeps re-queueing every cell whose domain changed until nothing changes.
//!
//! Both use explicit work stacks, never call-stack recursion.

use ndarray::Array3;
use std::collections::VecDeque;

use crate::algorithm::rules::RuleTable;
use crate::io::error::{AlgorithmError, Result, invalid_parameter};
use crate::spatial::{Dimensions, Grid, Position};

/// How far one propagate call pushes restrictions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropagationMode {
    /// Depth-first walk, every reachable cell narrowed at most once per call
    #[default]
    VisitedOnce,
    /// Worklist that re-enqueues changed cells until no domain changes
    Fixpoint,
}

/// Counters describing what one propagate call did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropagationReport {
    /// Cells expanded by the traversal, the origin included
    pub cells_visited: usize,
    /// Narrowing steps that removed at least one candidate
    pub cells_narrowed: usize,
    /// Total candidates removed
    pub tiles_removed: usize,
}

impl PropagationReport {
    const fn record(&mut self, removed: usize) {
        if removed > 0 {
            self.cells_narrowed += 1;
            self.tiles_removed += removed;
        }
    }
}

/// Pending direction scan of one cell in the depth-first walk
#[derive(Debug, Clone, Copy)]
struct Frame {
    position: Position,
    next_direction: usize,
}

/// Restricts neighboring domains after a collapse
///
/// Holds the scratch buffers reused across calls: the per-call visited
/// markers and the traversal stack or queue.
#[derive(Debug, Clone)]
pub struct Propagator {
    mode: PropagationMode,
    marks: Array3<bool>,
    stack: Vec<Frame>,
    queue: VecDeque<Position>,
}

impl Propagator {
    /// Create a propagator with scratch space for a grid of `dimensions`
    pub fn new(dimensions: Dimensions, mode: PropagationMode) -> Self {
        Self {
            mode,
            marks: Array3::from_elem(dimensions.shape(), false),
            stack: Vec::new(),
            queue: VecDeque::new(),
        }
    }

    /// Traversal mode in use
    pub const fn mode(&self) -> PropagationMode {
        self.mode
    }

    /// Restrict every cell reachable from `origin`
    ///
    /// Each neighbor's domain is intersected with the union of the rules of
    /// every tile still possible at the cell it was reached from.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `origin` lies outside the grid (`OutOfBounds`)
    /// - the rules were built for another topology or catalog
    /// - a neighbor's domain would become empty (`Contradiction` at that
    ///   neighbor); its domain keeps its previous candidates, narrowings
    ///   already applied in this call remain
    pub fn propagate(
        &mut self,
        grid: &mut Grid,
        rules: &RuleTable,
        origin: Position,
    ) -> Result<PropagationReport> {
        check_compatible(grid, rules)?;
        grid.cell(origin)?;

        if self.marks.dim() != grid.dimensions().shape() {
            self.marks = Array3::from_elem(grid.dimensions().shape(), false);
        }
        self.marks.fill(false);

        match self.mode {
            PropagationMode::VisitedOnce => self.walk_depth_first(grid, rules, origin),
            PropagationMode::Fixpoint => self.run_worklist(grid, rules, origin),
        }
    }

    fn walk_depth_first(
        &mut self,
        grid: &mut Grid,
        rules: &RuleTable,
        origin: Position,
    ) -> Result<PropagationReport> {
        let directions = grid.topology().directions();
        let mut report = PropagationReport::default();

        self.stack.clear();
        self.mark(origin);
        self.stack.push(Frame {
            position: origin,
            next_direction: 0,
        });
        report.cells_visited += 1;

        while let Some(frame) = self.stack.last_mut() {
            let position = frame.position;
            let direction_index = frame.next_direction;
            frame.next_direction += 1;

            let Some(&direction) = directions.get(direction_index) else {
                self.stack.pop();
                continue;
            };
            let Some(neighbor) = grid.neighbor(position, direction) else {
                continue;
            };
            if self.is_marked(neighbor) {
                continue;
            }

            let permitted = rules.permitted_for(grid.cell(position)?.domain(), direction);
            let removed = grid
                .cell_mut(neighbor)?
                .restrict(&permitted)
                .ok_or(AlgorithmError::Contradiction { position: neighbor })?;
            report.record(removed);

            self.mark(neighbor);
            self.stack.push(Frame {
                position: neighbor,
                next_direction: 0,
            });
            report.cells_visited += 1;
        }

        Ok(report)
    }

    fn run_worklist(
        &mut self,
        grid: &mut Grid,
        rules: &RuleTable,
        origin: Position,
    ) -> Result<PropagationReport> {
        let directions = grid.topology().directions();
        let mut report = PropagationReport::default();

        // Marks flag cells currently waiting in the queue
        self.queue.clear();
        self.mark(origin);
        self.queue.push_back(origin);

        while let Some(position) = self.queue.pop_front() {
            self.unmark(position);
            report.cells_visited += 1;

            let domain = grid.cell(position)?.domain().clone();
            for &direction in directions {
                let Some(neighbor) = grid.neighbor(position, direction) else {
                    continue;
                };

                let permitted = rules.permitted_for(&domain, direction);
                let removed = grid
                    .cell_mut(neighbor)?
                    .restrict(&permitted)
                    .ok_or(AlgorithmError::Contradiction { position: neighbor })?;
                report.record(removed);

                if removed > 0 && !self.is_marked(neighbor) {
                    self.mark(neighbor);
                    self.queue.push_back(neighbor);
                }
            }
        }

        Ok(report)
    }

    fn is_marked(&self, position: Position) -> bool {
        self.marks.get(position).copied().unwrap_or(true)
    }

    fn mark(&mut self, position: Position) {
        if let Some(flag) = self.marks.get_mut(position) {
            *flag = true;
        }
    }

    fn unmark(&mut self, position: Position) {
        if let Some(flag) = self.marks.get_mut(position) {
            *flag = false;
        }
    }
}

/// Reject rules that were built for a different grid shape
///
/// # Errors
///
/// Returns `InvalidParameter` on a topology or catalog size mismatch
pub fn check_compatible(grid: &Grid, rules: &RuleTable) -> Result<()> {
    if grid.topology() != rules.topology() {
        return Err(invalid_parameter(
            "topology",
            &format!("{:?}", grid.topology()),
            &format!("rules were built for {:?}", rules.topology()),
        ));
    }
    if grid.catalog_size() != rules.catalog_size() {
        return Err(invalid_parameter(
            "catalog_size",
            &grid.catalog_size(),
            &format!("rules cover {} tiles", rules.catalog_size()),
        ));
    }
    Ok(())
}
