//! Multi-pass refinement
//!
//! Provides [`Refinement`] ("replace these diffs with those"), the
//! [`RefinementStrategy`] extension point, and [`Plan`], which folds an
//! ordered list of strategies over an initial [`Diffs`].

use crate::diff::Diff;
use crate::differ::Differ;
use crate::diffs::Diffs;
use crate::element::Element;
use crate::emitter::Emitter;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Replacement of prior diffs with finer ones
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Refinement {
    superseded: BTreeSet<Diff>,
    diffs: Diffs,
}

impl Refinement {
    /// The no-op refinement
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Supersede `superseded` with `diffs`
    #[must_use]
    pub fn new<I>(superseded: I, diffs: Diffs) -> Self
    where
        I: IntoIterator<Item = Diff>,
    {
        Self {
            superseded: superseded.into_iter().collect(),
            diffs,
        }
    }

    /// Diffs removed by this refinement
    #[inline]
    #[must_use]
    pub fn superseded(&self) -> &BTreeSet<Diff> {
        &self.superseded
    }

    /// Diffs added by this refinement
    #[inline]
    #[must_use]
    pub fn diffs(&self) -> &Diffs {
        &self.diffs
    }

    /// Check if applying this refinement changes nothing
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.superseded.is_empty() && self.diffs.is_empty()
    }
}

/// A specialised comparison pass
///
/// Receives the diffs found so far and the paired subject. A strategy that
/// has nothing to refine returns [`Refinement::empty`].
pub trait RefinementStrategy<S, C>: Send + Sync + fmt::Debug {
    /// Compute the refinement for this pass
    fn refine(&self, context: &C, diffs: &Diffs, subject: &Element<S>) -> Refinement;

    /// Strategy name (for logging and audit)
    fn name(&self) -> &'static str;
}

/// One strategy's contribution to a plan run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedRefinement {
    /// Strategy name
    pub strategy: &'static str,

    /// What it replaced
    pub refinement: Refinement,
}

/// Result of a plan run, kept for audit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanOutcome {
    /// Diffs before any refinement
    pub initial: Diffs,

    /// Refinements in the order they were applied
    pub refinements: Vec<AppliedRefinement>,

    /// Diffs after the last refinement
    pub result: Diffs,
}

impl PlanOutcome {
    /// Refinements that changed something
    pub fn effective_refinements(&self) -> impl Iterator<Item = &AppliedRefinement> {
        self.refinements.iter().filter(|r| !r.refinement.is_empty())
    }
}

/// Ordered sequence of refinement passes
///
/// Strategies run strictly in the order they were added; each one sees the
/// result of the previous.
pub struct Plan<S, C> {
    strategies: Vec<Box<dyn RefinementStrategy<S, C>>>,
}

impl<S, C> Default for Plan<S, C> {
    fn default() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }
}

impl<S, C> fmt::Debug for Plan<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plan")
            .field(
                "strategies",
                &self.strategies.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<S: 'static, C> Plan<S, C> {
    /// Create empty plan
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a strategy
    #[must_use]
    pub fn then<R>(mut self, strategy: R) -> Self
    where
        R: RefinementStrategy<S, C> + 'static,
    {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Append a boxed strategy
    pub fn push(&mut self, strategy: Box<dyn RefinementStrategy<S, C>>) {
        self.strategies.push(strategy);
    }

    /// Strategy names in run order
    #[must_use]
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Number of strategies
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Check if the plan has no strategies
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Fold every strategy over `initial`
    #[must_use]
    pub fn execute(&self, context: &C, initial: Diffs, subject: &Element<S>) -> PlanOutcome {
        let mut current = initial.clone();
        let mut refinements = Vec::with_capacity(self.strategies.len());

        for strategy in &self.strategies {
            let refinement = strategy.refine(context, &current, subject);
            tracing::debug!(
                "Strategy {} supersedes {} diffs with {}",
                strategy.name(),
                refinement.superseded().len(),
                refinement.diffs().len()
            );
            current = current.refined_by(&refinement);
            refinements.push(AppliedRefinement {
                strategy: strategy.name(),
                refinement,
            });
        }

        tracing::info!(
            "Plan finished: {} initial diffs, {} after {} strategies",
            initial.len(),
            current.len(),
            refinements.len()
        );

        PlanOutcome {
            initial,
            refinements,
            result: current,
        }
    }

    /// Run the primary differ over `subject`, then every strategy
    #[must_use]
    pub fn run(
        &self,
        context: &C,
        differ: &Differ<S>,
        emitter: &Emitter,
        subject: &Element<S>,
    ) -> PlanOutcome {
        let initial: Diffs = differ.diff(emitter, subject).into_iter().collect();
        self.execute(context, initial, subject)
    }
}
