//! Step definition registry.
//!
//! Definitions pair a compiled pattern with a type-erased callback. A step
//! line is resolved by matching its text against every pattern; when several
//! match, the definition with the highest [`Specificity`] wins and ties go to
//! the one registered first.

mod dispatch;

pub use dispatch::{ContextStepHandler, DispatchError, FromCapture, IntoStepOutcome, StepHandler};

use std::any::type_name;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use pepino_patterns::{
    PatternError, Specificity, StepKeyword, compile_step_pattern, extract_captured_values,
};
use regex::Regex;

use crate::context::Contexts;
use crate::error::StepError;
use crate::panic::panic_message;

type ErasedStep = Box<dyn Fn(&mut Contexts, &[String]) -> Result<(), DispatchError>>;

/// A registered step: pattern, score and callback.
pub struct StepDefinition {
    keyword: StepKeyword,
    source: String,
    pattern: Regex,
    specificity: Specificity,
    arity: usize,
    context: Option<&'static str>,
    invoke: ErasedStep,
}

impl StepDefinition {
    /// Keyword the definition was registered under.
    #[must_use]
    pub fn keyword(&self) -> StepKeyword {
        self.keyword
    }

    /// Pattern source as registered.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Tie-break score of the pattern.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        self.specificity
    }

    /// Number of captured arguments the callback expects.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Name of the context type the callback borrows, if any.
    #[must_use]
    pub fn context_type(&self) -> Option<&'static str> {
        self.context
    }

    /// Captured arguments when `text` matches the whole pattern.
    #[must_use]
    pub fn captures(&self, text: &str) -> Option<Vec<String>> {
        extract_captured_values(&self.pattern, text)
    }
}

impl fmt::Debug for StepDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepDefinition")
            .field("keyword", &self.keyword)
            .field("source", &self.source)
            .field("specificity", &self.specificity)
            .field("arity", &self.arity)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

/// Ordered collection of step definitions.
///
/// # Examples
///
/// ```
/// use pepino::{Contexts, StepKeyword, StepRegistry};
///
/// #[derive(Default)]
/// struct Calculator(Vec<i64>);
///
/// let mut steps = StepRegistry::new();
/// steps
///     .register_with_context(StepKeyword::Given, r"^I enter (-?\d+)$", |calc: &mut Calculator, n: i64| {
///         calc.0.push(n);
///     })
///     .expect("valid pattern");
///
/// let mut contexts = Contexts::new();
/// steps.execute("I enter 4", &mut contexts).expect("step runs");
/// assert_eq!(contexts.get::<Calculator>().map(|c| c.0.clone()), Some(vec![4]));
/// ```
#[derive(Default)]
pub struct StepRegistry {
    definitions: Vec<StepDefinition>,
}

impl StepRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback taking only captured arguments.
    ///
    /// The keyword is informational: resolution matches step text against
    /// every pattern regardless of the keyword used in the feature.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if `pattern` is not a valid regular
    /// expression.
    pub fn register<Args, F>(
        &mut self,
        keyword: StepKeyword,
        pattern: &str,
        handler: F,
    ) -> Result<(), PatternError>
    where
        Args: 'static,
        F: StepHandler<Args>,
    {
        let invoke: ErasedStep = Box::new(move |_: &mut Contexts, captures: &[String]| {
            StepHandler::<Args>::call(&handler, captures)
        });
        self.insert(keyword, pattern, F::ARITY, None, invoke)
    }

    /// Register a callback whose first parameter borrows the shared
    /// instance of `C` from the [`Contexts`] store.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if `pattern` is not a valid regular
    /// expression.
    pub fn register_with_context<C, Args, F>(
        &mut self,
        keyword: StepKeyword,
        pattern: &str,
        handler: F,
    ) -> Result<(), PatternError>
    where
        C: Default + 'static,
        Args: 'static,
        F: ContextStepHandler<C, Args>,
    {
        let invoke: ErasedStep = Box::new(move |contexts: &mut Contexts, captures: &[String]| {
            ContextStepHandler::<C, Args>::call(&handler, contexts.get_or_create::<C>(), captures)
        });
        self.insert(keyword, pattern, F::ARITY, Some(type_name::<C>()), invoke)
    }

    /// Shorthand for [`register`](Self::register) with `Given`.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    pub fn given<Args: 'static, F: StepHandler<Args>>(
        &mut self,
        pattern: &str,
        handler: F,
    ) -> Result<(), PatternError> {
        self.register(StepKeyword::Given, pattern, handler)
    }

    /// Shorthand for [`register`](Self::register) with `When`.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    pub fn when<Args: 'static, F: StepHandler<Args>>(
        &mut self,
        pattern: &str,
        handler: F,
    ) -> Result<(), PatternError> {
        self.register(StepKeyword::When, pattern, handler)
    }

    /// Shorthand for [`register`](Self::register) with `Then`.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    pub fn then<Args: 'static, F: StepHandler<Args>>(
        &mut self,
        pattern: &str,
        handler: F,
    ) -> Result<(), PatternError> {
        self.register(StepKeyword::Then, pattern, handler)
    }

    fn insert(
        &mut self,
        keyword: StepKeyword,
        source: &str,
        arity: usize,
        context: Option<&'static str>,
        invoke: ErasedStep,
    ) -> Result<(), PatternError> {
        let pattern = compile_step_pattern(source)?;
        let specificity = Specificity::calculate(source);
        log::debug!("registered {keyword} step `{source}` (specificity {specificity})");
        self.definitions.push(StepDefinition {
            keyword,
            source: source.to_string(),
            pattern,
            specificity,
            arity,
            context,
            invoke,
        });
        Ok(())
    }

    /// Find the definition that handles `text`.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::NoMatch`] when no pattern matches the whole text.
    pub fn resolve(&self, text: &str) -> Result<&StepDefinition, StepError> {
        self.best_match(text)
            .map(|(definition, _)| definition)
            .ok_or_else(|| StepError::NoMatch {
                text: text.to_string(),
            })
    }

    fn best_match(&self, text: &str) -> Option<(&StepDefinition, Vec<String>)> {
        let mut best: Option<(&StepDefinition, Vec<String>)> = None;
        for definition in &self.definitions {
            let Some(captures) = definition.captures(text) else {
                continue;
            };
            if best
                .as_ref()
                .is_none_or(|(current, _)| definition.specificity > current.specificity)
            {
                best = Some((definition, captures));
            }
        }
        best
    }

    /// Resolve `text` and run its callback.
    ///
    /// Panics raised by the callback are caught and reported as
    /// [`StepError::Failed`].
    ///
    /// # Errors
    ///
    /// Returns [`StepError`] when resolution, argument conversion or the
    /// callback fails.
    pub fn execute(&self, text: &str, contexts: &mut Contexts) -> Result<(), StepError> {
        let Some((definition, captures)) = self.best_match(text) else {
            return Err(StepError::NoMatch {
                text: text.to_string(),
            });
        };
        log::debug!("step `{text}` resolved to `{}`", definition.source);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            (definition.invoke)(contexts, &captures)
        }));
        match outcome {
            Ok(result) => result.map_err(|err| err.into_step_error(text, &definition.source)),
            Err(payload) => Err(StepError::Failed {
                text: text.to_string(),
                message: panic_message(&*payload),
            }),
        }
    }

    /// Registered definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &StepDefinition> {
        self.definitions.iter()
    }

    /// Number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Remove every definition.
    pub fn clear(&mut self) {
        self.definitions.clear();
    }
}

impl fmt::Debug for StepRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.definitions).finish()
    }
}
