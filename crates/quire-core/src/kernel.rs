//! The notebook kernel: current state plus everything needed to evaluate it.

use std::sync::Arc;

use crate::bindings::BindingTracker;
use crate::clock::{Clock, SystemClock};
use crate::config::NotebookConfig;
use crate::context::{ExecutionContext, RhaiContext};
use crate::error::Result;
use crate::evaluate::{self, Collaborators};
use crate::loader::{DependencyLoader, FileLoader};
use crate::notebook::{Action, Effect, Notebook, Outcome, Transition, apply};
use crate::render::{CmarkRenderer, MarkdownRenderer};

impl Collaborators {
    /// Default collaborators for a configuration: a Rhai context with the
    /// prelude installed, CommonMark rendering, files under the dependency
    /// root, and the system clock.
    pub fn from_config(config: &NotebookConfig) -> Result<Self> {
        Ok(Self {
            context: Box::new(RhaiContext::with_prelude(&config.prelude)?),
            renderer: Box::new(CmarkRenderer::new()),
            loader: Box::new(FileLoader::new(config.dependency_root())),
            clock: Box::new(SystemClock),
        })
    }

    pub fn with_context(mut self, context: impl ExecutionContext + 'static) -> Self {
        self.context = Box::new(context);
        self
    }

    pub fn with_renderer(mut self, renderer: impl MarkdownRenderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn with_loader(mut self, loader: impl DependencyLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }
}

/// Report of one dispatched action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub outcome: Outcome,
    pub effects: Vec<Effect>,
}

/// Owns a notebook and dispatches actions against it.
///
/// Actions are handled one at a time, each to completion; the new state
/// replaces the old one only once the whole transition is built.
pub struct Kernel {
    notebook: Notebook,
    collaborators: Collaborators,
    tracker: BindingTracker,
    comment_marker: String,
}

impl Kernel {
    /// Create a kernel with the default collaborators.
    pub fn new(config: NotebookConfig) -> Result<Self> {
        let collaborators = Collaborators::from_config(&config)?;
        Ok(Self::with_collaborators(config, collaborators))
    }

    /// Create a kernel around the given collaborators.
    ///
    /// Whatever the context has bound at this point becomes the baseline the
    /// binding tracker ignores.
    pub fn with_collaborators(config: NotebookConfig, collaborators: Collaborators) -> Self {
        let tracker = BindingTracker::capture(
            collaborators.context.as_ref(),
            config.ignored_bindings.iter().cloned(),
        );
        let notebook = Notebook::with_initial_cell(Arc::new(config.languages()));

        Self {
            notebook,
            collaborators,
            tracker,
            comment_marker: config.comment_marker,
        }
    }

    /// Current notebook state.
    pub fn notebook(&self) -> &Notebook {
        &self.notebook
    }

    pub fn tracker(&self) -> &BindingTracker {
        &self.tracker
    }

    /// Apply one action.
    pub fn dispatch(&mut self, action: &Action) -> Dispatch {
        let transition = self.transition(action);
        tracing::debug!("{} -> {:?}", action.name(), transition.outcome);

        let Transition {
            notebook,
            outcome,
            effects,
        } = transition;
        self.notebook = notebook;
        Dispatch { outcome, effects }
    }

    /// Apply a sequence of actions in order.
    pub fn dispatch_all<'a>(&mut self, actions: impl IntoIterator<Item = &'a Action>) -> Vec<Dispatch> {
        actions
            .into_iter()
            .map(|action| self.dispatch(action))
            .collect()
    }

    fn transition(&mut self, action: &Action) -> Transition {
        match action {
            Action::EvaluateCell { cell_id } => evaluate::evaluate(
                &self.notebook,
                *cell_id,
                &mut self.collaborators,
                &self.tracker,
                &self.comment_marker,
            ),
            _ => apply(&self.notebook, action),
        }
    }
}
