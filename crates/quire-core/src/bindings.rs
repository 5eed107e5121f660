//! Tracking of names bound by user scripts.

use rustc_hash::FxHashSet;

use crate::context::ExecutionContext;
use crate::notebook::Variables;

/// Separates user-defined bindings from those the context started with.
///
/// The baseline is every name visible when the tracker is created, plus the
/// configured noisy names. [`user_defined`](Self::user_defined) reports
/// everything else, recomputed from scratch on each call.
#[derive(Debug, Clone, Default)]
pub struct BindingTracker {
    baseline: FxHashSet<String>,
}

impl BindingTracker {
    /// Capture the current bindings of `context` as the baseline.
    pub fn capture<I, S>(context: &dyn ExecutionContext, ignored: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut baseline: FxHashSet<String> = context.bindings().into_keys().collect();
        baseline.extend(ignored.into_iter().map(Into::into));
        tracing::debug!("Binding baseline holds {} names", baseline.len());
        Self { baseline }
    }

    /// Whether `name` belongs to the baseline.
    pub fn is_baseline(&self, name: &str) -> bool {
        self.baseline.contains(name)
    }

    /// Every binding visible in `context` that is not part of the baseline.
    pub fn user_defined(&self, context: &dyn ExecutionContext) -> Variables {
        context
            .bindings()
            .into_iter()
            .filter(|(name, _)| !self.baseline.contains(name))
            .collect()
    }
}
