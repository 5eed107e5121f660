//! Execution context backed by a Rhai engine.

use rhai::{AST, Dynamic, Engine, EvalAltResult, FnPtr, ParseError, Scope};
use rustc_hash::FxHashSet;

use crate::error::{Error, Result};

use super::{Bindings, EvaluationError, ExecutionContext, ScriptValue};

/// One Rhai engine and one long-lived scope shared by every script cell.
///
/// Top-level `let` and `const` bindings land in the scope and persist; running
/// the same `let` again replaces the earlier binding. Script
/// functions from every successfully compiled cell are kept and merged into
/// each later evaluation, so a function defined in one cell can be called
/// from any other.
pub struct RhaiContext {
    engine: Engine,
    scope: Scope<'static>,
    /// Functions accumulated from earlier cells (no statements).
    functions: AST,
}

impl RhaiContext {
    /// Create a context with an empty scope.
    pub fn new() -> Self {
        let mut engine = Engine::new();
        engine.on_print(|text| tracing::info!(target: "quire::script", "{}", text));
        engine.on_debug(|text, source, pos| {
            tracing::debug!(
                target: "quire::script",
                "{} {} @ {:?}",
                source.unwrap_or("<cell>"),
                text,
                pos
            )
        });

        Self {
            engine,
            scope: Scope::new(),
            functions: AST::empty(),
        }
    }

    /// Create a context with the given constants already bound.
    pub fn with_prelude<'a>(
        prelude: impl IntoIterator<Item = (&'a String, &'a serde_json::Value)>,
    ) -> Result<Self> {
        let mut context = Self::new();
        for (name, value) in prelude {
            let value = rhai::serde::to_dynamic(value).map_err(|e| Error::Prelude {
                name: name.clone(),
                message: e.to_string(),
            })?;
            context.scope.push_constant_dynamic(name.clone(), value);
        }
        Ok(context)
    }

    /// Keep only the newest scope entry per name.
    ///
    /// Every `let` pushes a new entry, so re-running a cell would otherwise
    /// grow the scope by one shadowed copy each time.
    fn drop_shadowed(&mut self) {
        let distinct: FxHashSet<&str> = self.scope.iter_raw().map(|(name, _, _)| name).collect();
        if distinct.len() == self.scope.len() {
            return;
        }

        let entries: Vec<(String, bool, Dynamic)> = self
            .scope
            .iter()
            .map(|(name, constant, value)| (name.to_string(), constant, value))
            .collect();
        let mut seen = FxHashSet::default();
        let mut kept: Vec<_> = entries
            .into_iter()
            .rev()
            .filter(|(name, _, _)| seen.insert(name.clone()))
            .collect();
        kept.reverse();

        let mut scope = Scope::new();
        for (name, constant, value) in kept {
            if constant {
                scope.push_constant_dynamic(name, value);
            } else {
                scope.push_dynamic(name, value);
            }
        }
        self.scope = scope;
    }

    /// Number of script functions defined so far.
    pub fn function_count(&self) -> usize {
        self.functions.iter_functions().count()
    }
}

impl Default for RhaiContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionContext for RhaiContext {
    fn execute(&mut self, source: &str) -> std::result::Result<ScriptValue, EvaluationError> {
        let ast = self.engine.compile_with_scope(&self.scope, source)?;
        let ast = self.functions.merge(&ast);
        self.functions = ast.clone_functions_only();

        let result = self
            .engine
            .eval_ast_with_scope::<Dynamic>(&mut self.scope, &ast)
            .map_err(EvaluationError::from);
        self.drop_shadowed();
        result
    }

    fn bindings(&self) -> Bindings {
        // Variables win over functions of the same name.
        let mut bindings: Bindings = self
            .functions
            .iter_functions()
            .filter_map(|f| {
                let ptr = FnPtr::new(f.name).ok()?;
                Some((f.name.to_string(), Dynamic::from(ptr)))
            })
            .collect();
        bindings.extend(
            self.scope
                .iter()
                .map(|(name, _, value)| (name.to_string(), value)),
        );
        bindings
    }
}

impl From<ParseError> for EvaluationError {
    fn from(err: ParseError) -> Self {
        let pos = err.position();
        EvaluationError::syntax(err.err_type().to_string()).at(pos.line(), pos.position())
    }
}

impl From<Box<EvalAltResult>> for EvaluationError {
    fn from(err: Box<EvalAltResult>) -> Self {
        let mut err = *err;
        let thrown = thrown_value(&err);
        let pos = err.take_position();

        let base = match &err {
            EvalAltResult::ErrorParsing(kind, _) => EvaluationError::syntax(kind.to_string()),
            EvalAltResult::ErrorRuntime(value, _) => EvaluationError::runtime(value.to_string()),
            other => EvaluationError::runtime(other.to_string()),
        };
        let base = base.at(pos.line(), pos.position());

        match thrown {
            Some(value) => base.with_thrown(value),
            None => base,
        }
    }
}

/// Value passed to `throw`, looking through function call frames.
fn thrown_value(err: &EvalAltResult) -> Option<Dynamic> {
    match err {
        EvalAltResult::ErrorRuntime(value, _) => Some(value.clone()),
        EvalAltResult::ErrorInFunctionCall(_, _, inner, _) => thrown_value(inner),
        EvalAltResult::ErrorInModule(_, inner, _) => thrown_value(inner),
        _ => None,
    }
}
