//! Fix convergence loop.

use std::collections::BTreeSet;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::LinterError;

/// Maximum number of lint-and-fix iterations.
pub const MAX_FIX_ITERATIONS: usize = 10;

/// How a fix session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixStatus {
    /// An iteration modified no file.
    Converged,
    /// Every iteration modified files and the iteration cap was hit.
    CapReached,
}

/// Outcome of a fix session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixSession {
    /// Every file modified by any iteration.
    pub changed: BTreeSet<PathBuf>,
    /// Number of iterations run.
    pub iterations: usize,
    /// How the session ended.
    pub status: FixStatus,
}

impl FixSession {
    /// Returns true if the session reached a fixed point.
    pub fn converged(&self) -> bool {
        self.status == FixStatus::Converged
    }
}

/// Runs `iterate` until it modifies no file, at most [`MAX_FIX_ITERATIONS`]
/// times.
///
/// `iterate` receives the 1-based iteration number and returns the files it
/// modified. Errors are propagated as they are.
pub fn run_fix_loop<F>(mut iterate: F) -> Result<FixSession, LinterError>
where
    F: FnMut(usize) -> Result<Vec<PathBuf>, LinterError>,
{
    let mut changed = BTreeSet::new();

    for iteration in 1..=MAX_FIX_ITERATIONS {
        let modified = iterate(iteration)?;
        if modified.is_empty() {
            info!(
                "Fixes converged after {} iterations, {} files changed",
                iteration,
                changed.len()
            );
            return Ok(FixSession {
                changed,
                iterations: iteration,
                status: FixStatus::Converged,
            });
        }

        debug!("Iteration {} modified {} files", iteration, modified.len());
        changed.extend(modified);
    }

    warn!(
        "Fixes did not converge after {} iterations, {} files changed",
        MAX_FIX_ITERATIONS,
        changed.len()
    );
    Ok(FixSession {
        changed,
        iterations: MAX_FIX_ITERATIONS,
        status: FixStatus::CapReached,
    })
}
