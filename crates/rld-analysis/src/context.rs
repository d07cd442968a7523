//! State shared by the figures of one generation pass
//!
//! Figures of the same dimension (all functions, each testbed, each function
//! group) are easier to compare when they share their right axis limit. With
//! `store_x_max` set, the first figure of a pass fixes the limit and the
//! following ones reuse it until [`FigureContext::reset`] starts a new pass.

use crate::{reference::ReferenceOverlay, settings::EcdfSettings};

/// Alignment memos and shared resources for figure generation.
///
/// # Examples
///
/// ```
/// use rld_analysis::{context::FigureContext, reference::ReferenceOverlay, settings::EcdfSettings};
///
/// let reference = ReferenceOverlay::unavailable();
/// let mut context = FigureContext::new(&EcdfSettings::default(), &reference);
///
/// assert_eq!(context.align_evals_max(1e4), 1e4);
/// assert_eq!(context.align_evals_max(1e2), 1e4);
///
/// context.reset();
/// assert_eq!(context.align_evals_max(1e2), 1e2);
/// ```
#[derive(Debug)]
pub struct FigureContext<'a> {
    store_x_max: bool,
    nb_per_decade: u32,
    evals_max: Option<f64>,
    fvalue_max: Option<f64>,
    reference: &'a ReferenceOverlay,
}

impl<'a> FigureContext<'a> {
    #[must_use]
    pub fn new(settings: &EcdfSettings, reference: &'a ReferenceOverlay) -> Self {
        Self {
            store_x_max: settings.store_x_max,
            nb_per_decade: settings.nb_per_decade,
            evals_max: None,
            fvalue_max: None,
            reference,
        }
    }

    /// Returns the budget (evaluations per dimension) to use as right limit of
    /// run-length figures.
    ///
    /// Without memoization `candidate` is returned as is; with it, the first
    /// candidate since the last reset wins.
    pub fn align_evals_max(&mut self, candidate: f64) -> f64 {
        Self::align(self.store_x_max, &mut self.evals_max, candidate)
    }

    /// Returns the right limit of function-value figures, memoized like
    /// [`FigureContext::align_evals_max`].
    pub fn align_fvalue_max(&mut self, candidate: f64) -> f64 {
        Self::align(self.store_x_max, &mut self.fvalue_max, candidate)
    }

    fn align(store: bool, memo: &mut Option<f64>, candidate: f64) -> f64 {
        if store {
            *memo.get_or_insert(candidate)
        } else {
            candidate
        }
    }

    /// Forgets the memoized limits.
    pub fn reset(&mut self) {
        tracing::debug!(
            evals_max = ?self.evals_max,
            fvalue_max = ?self.fvalue_max,
            "figure context reset"
        );
        self.evals_max = None;
        self.fvalue_max = None;
    }

    #[must_use]
    pub fn nb_per_decade(&self) -> u32 {
        self.nb_per_decade
    }

    #[must_use]
    pub fn reference(&self) -> &'a ReferenceOverlay {
        self.reference
    }
}
