//! Single-slot lifecycle hooks.
//!
//! Each of the six lifecycle points holds at most one callback. Filling an
//! occupied slot is a configuration error rather than a silent overwrite;
//! executing an empty slot does nothing. A hook may return `()` or a
//! `Result`; an `Err` or a panic is reported as [`HookError::Failed`].

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;

use crate::panic::panic_message;
use crate::registry::IntoStepOutcome;
use crate::types::{FeatureInfo, ScenarioInfo, StepInfo};

/// A lifecycle point that accepts a hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPoint {
    /// Before a feature runs.
    BeforeAll,
    /// After a feature ran successfully.
    AfterAll,
    /// Before each scenario or outline.
    Before,
    /// After each scenario or outline.
    After,
    /// Before each step.
    BeforeStep,
    /// After each step.
    AfterStep,
}

impl HookPoint {
    /// Every hook point in execution-nesting order.
    pub const ALL: [Self; 6] = [
        Self::BeforeAll,
        Self::AfterAll,
        Self::Before,
        Self::After,
        Self::BeforeStep,
        Self::AfterStep,
    ];

    /// Name used in diagnostics.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BeforeAll => "BeforeAll",
            Self::AfterAll => "AfterAll",
            Self::Before => "Before",
            Self::After => "After",
            Self::BeforeStep => "BeforeStep",
            Self::AfterStep => "AfterStep",
        }
    }

    /// Log line announcing an invocation for `subject`, the feature,
    /// scenario or step the hook wraps.
    fn announcement(self, subject: &str) -> String {
        match self {
            Self::BeforeAll => "Before all.".to_string(),
            Self::AfterAll => "After all.".to_string(),
            Self::Before => format!("Before scenario: {subject}"),
            Self::After => format!("After scenario: {subject}"),
            Self::BeforeStep => format!("Before step: {subject}"),
            Self::AfterStep => format!("After step: {subject}"),
        }
    }
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while registering or running hooks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HookError {
    /// The slot already holds a callback.
    #[error("{0} hook already registered")]
    AlreadyRegistered(HookPoint),
    /// The callback returned an error or panicked.
    #[error("{point} hook failed: {message}")]
    Failed {
        /// Slot whose callback failed.
        point: HookPoint,
        /// Error or panic message.
        message: String,
    },
}

type HookFn<I> = Box<dyn FnMut(&I) -> Result<(), String>>;

fn erase<I: 'static, R: IntoStepOutcome + 'static>(mut callback: impl FnMut(&I) -> R + 'static) -> HookFn<I> {
    Box::new(move |info| callback(info).into_outcome())
}

struct HookSlot<I> {
    point: HookPoint,
    callback: Option<HookFn<I>>,
}

impl<I> HookSlot<I> {
    const fn new(point: HookPoint) -> Self {
        Self {
            point,
            callback: None,
        }
    }

    fn fill(&mut self, callback: HookFn<I>) -> Result<(), HookError> {
        if self.callback.is_some() {
            return Err(HookError::AlreadyRegistered(self.point));
        }
        log::debug!("registered {} hook", self.point);
        self.callback = Some(callback);
        Ok(())
    }

    fn run(&mut self, info: &I, subject: &str) -> Result<(), HookError> {
        let point = self.point;
        log::info!("{}", point.announcement(subject));
        let Some(callback) = self.callback.as_mut() else {
            return Ok(());
        };
        panic::catch_unwind(AssertUnwindSafe(|| callback(info)))
            .unwrap_or_else(|payload| Err(panic_message(&*payload)))
            .map_err(|message| HookError::Failed { point, message })
    }

    fn is_set(&self) -> bool {
        self.callback.is_some()
    }

    fn clear(&mut self) {
        self.callback = None;
    }
}

/// The six hook slots of an engine.
///
/// # Examples
///
/// ```
/// use pepino::{HookError, HookPoint, HookRegistry};
///
/// let mut hooks = HookRegistry::new();
/// hooks.register_before_all(|feature| assert!(!feature.name.is_empty())).expect("empty slot");
/// assert_eq!(
///     hooks.register_before_all(|_| {}),
///     Err(HookError::AlreadyRegistered(HookPoint::BeforeAll))
/// );
///
/// hooks.clear_hooks();
/// assert!(!hooks.is_registered(HookPoint::BeforeAll));
/// ```
pub struct HookRegistry {
    before_all: HookSlot<FeatureInfo>,
    after_all: HookSlot<FeatureInfo>,
    before: HookSlot<ScenarioInfo>,
    after: HookSlot<ScenarioInfo>,
    before_step: HookSlot<StepInfo>,
    after_step: HookSlot<StepInfo>,
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl HookRegistry {
    /// Create a registry with every slot empty.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            before_all: HookSlot::new(HookPoint::BeforeAll),
            after_all: HookSlot::new(HookPoint::AfterAll),
            before: HookSlot::new(HookPoint::Before),
            after: HookSlot::new(HookPoint::After),
            before_step: HookSlot::new(HookPoint::BeforeStep),
            after_step: HookSlot::new(HookPoint::AfterStep),
        }
    }

    /// Install the `BeforeAll` hook.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::AlreadyRegistered`] if the slot is occupied.
    pub fn register_before_all<R: IntoStepOutcome + 'static>(
        &mut self,
        callback: impl FnMut(&FeatureInfo) -> R + 'static,
    ) -> Result<(), HookError> {
        self.before_all.fill(erase(callback))
    }

    /// Install the `AfterAll` hook.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::AlreadyRegistered`] if the slot is occupied.
    pub fn register_after_all<R: IntoStepOutcome + 'static>(
        &mut self,
        callback: impl FnMut(&FeatureInfo) -> R + 'static,
    ) -> Result<(), HookError> {
        self.after_all.fill(erase(callback))
    }

    /// Install the `Before` scenario hook.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::AlreadyRegistered`] if the slot is occupied.
    pub fn register_before<R: IntoStepOutcome + 'static>(
        &mut self,
        callback: impl FnMut(&ScenarioInfo) -> R + 'static,
    ) -> Result<(), HookError> {
        self.before.fill(erase(callback))
    }

    /// Install the `After` scenario hook.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::AlreadyRegistered`] if the slot is occupied.
    pub fn register_after<R: IntoStepOutcome + 'static>(
        &mut self,
        callback: impl FnMut(&ScenarioInfo) -> R + 'static,
    ) -> Result<(), HookError> {
        self.after.fill(erase(callback))
    }

    /// Install the `BeforeStep` hook.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::AlreadyRegistered`] if the slot is occupied.
    pub fn register_before_step<R: IntoStepOutcome + 'static>(
        &mut self,
        callback: impl FnMut(&StepInfo) -> R + 'static,
    ) -> Result<(), HookError> {
        self.before_step.fill(erase(callback))
    }

    /// Install the `AfterStep` hook.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::AlreadyRegistered`] if the slot is occupied.
    pub fn register_after_step<R: IntoStepOutcome + 'static>(
        &mut self,
        callback: impl FnMut(&StepInfo) -> R + 'static,
    ) -> Result<(), HookError> {
        self.after_step.fill(erase(callback))
    }

    /// Run the `BeforeAll` hook, if any.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::Failed`] when the callback fails or panics.
    pub fn execute_before_all(&mut self, feature: &FeatureInfo) -> Result<(), HookError> {
        self.before_all.run(feature, &feature.name)
    }

    /// Run the `AfterAll` hook, if any.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::Failed`] when the callback fails or panics.
    pub fn execute_after_all(&mut self, feature: &FeatureInfo) -> Result<(), HookError> {
        self.after_all.run(feature, &feature.name)
    }

    /// Run the `Before` hook, if any.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::Failed`] when the callback fails or panics.
    pub fn execute_before(&mut self, scenario: &ScenarioInfo) -> Result<(), HookError> {
        self.before.run(scenario, &scenario.name)
    }

    /// Run the `After` hook, if any.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::Failed`] when the callback fails or panics.
    pub fn execute_after(&mut self, scenario: &ScenarioInfo) -> Result<(), HookError> {
        self.after.run(scenario, &scenario.name)
    }

    /// Run the `BeforeStep` hook, if any.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::Failed`] when the callback fails or panics.
    pub fn execute_before_step(&mut self, step: &StepInfo) -> Result<(), HookError> {
        self.before_step.run(step, &step.to_string())
    }

    /// Run the `AfterStep` hook, if any.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::Failed`] when the callback fails or panics.
    pub fn execute_after_step(&mut self, step: &StepInfo) -> Result<(), HookError> {
        self.after_step.run(step, &step.to_string())
    }

    /// Whether the slot for `point` holds a callback.
    #[must_use]
    pub fn is_registered(&self, point: HookPoint) -> bool {
        match point {
            HookPoint::BeforeAll => self.before_all.is_set(),
            HookPoint::AfterAll => self.after_all.is_set(),
            HookPoint::Before => self.before.is_set(),
            HookPoint::After => self.after.is_set(),
            HookPoint::BeforeStep => self.before_step.is_set(),
            HookPoint::AfterStep => self.after_step.is_set(),
        }
    }

    /// Empty every slot. Calling it on an empty registry is a no-op.
    pub fn clear_hooks(&mut self) {
        self.before_all.clear();
        self.after_all.clear();
        self.before.clear();
        self.after.clear();
        self.before_step.clear();
        self.after_step.clear();
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registered: Vec<HookPoint> = HookPoint::ALL
            .into_iter()
            .filter(|point| self.is_registered(*point))
            .collect();
        f.debug_struct("HookRegistry")
            .field("registered", &registered)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pepino_patterns::StepKeyword;
    use rstest::rstest;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn feature() -> FeatureInfo {
        FeatureInfo {
            name: "Calculator".into(),
            tags: Vec::new(),
        }
    }

    fn step() -> StepInfo {
        StepInfo {
            keyword: StepKeyword::Given,
            text: "x".into(),
        }
    }

    fn reject_step(step: &StepInfo) {
        assert_ne!(step.text, "x", "step `x` is not allowed");
    }

    #[rstest]
    fn empty_slots_are_no_ops() {
        let mut hooks = HookRegistry::new();
        assert_eq!(hooks.execute_before_all(&feature()), Ok(()));
        assert_eq!(hooks.execute_after_step(&step()), Ok(()));
        assert!(HookPoint::ALL.iter().all(|p| !hooks.is_registered(*p)));
    }

    #[rstest]
    fn second_registration_is_rejected_and_keeps_first() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut hooks = HookRegistry::new();
        let first = Rc::clone(&calls);
        assert_eq!(
            hooks.register_before_all(move |f| first.borrow_mut().push(format!("first {}", f.name))),
            Ok(())
        );
        let second = Rc::clone(&calls);
        assert_eq!(
            hooks.register_before_all(move |_| second.borrow_mut().push("second".into())),
            Err(HookError::AlreadyRegistered(HookPoint::BeforeAll))
        );
        assert_eq!(hooks.execute_before_all(&feature()), Ok(()));
        assert_eq!(*calls.borrow(), ["first Calculator"]);
    }

    #[rstest]
    fn slots_are_independent() {
        let mut hooks = HookRegistry::new();
        assert!(hooks.register_before(|_| {}).is_ok());
        assert!(hooks.register_after(|_| {}).is_ok());
        assert!(hooks.register_before_step(|_| {}).is_ok());
        assert!(hooks.is_registered(HookPoint::Before));
        assert!(hooks.is_registered(HookPoint::After));
        assert!(hooks.is_registered(HookPoint::BeforeStep));
        assert!(!hooks.is_registered(HookPoint::AfterStep));
    }

    #[rstest]
    fn clear_hooks_is_idempotent() {
        let mut hooks = HookRegistry::new();
        assert!(hooks.register_after_all(|_| {}).is_ok());
        hooks.clear_hooks();
        hooks.clear_hooks();
        assert!(!hooks.is_registered(HookPoint::AfterAll));
        assert!(hooks.register_after_all(|_| {}).is_ok());
    }

    #[rstest]
    fn returned_error_is_a_failure() {
        let mut hooks = HookRegistry::new();
        assert!(
            hooks
                .register_after_all(|f: &FeatureInfo| Err::<(), _>(format!("{} left dirty state", f.name)))
                .is_ok()
        );
        assert_eq!(
            hooks.execute_after_all(&feature()),
            Err(HookError::Failed {
                point: HookPoint::AfterAll,
                message: "Calculator left dirty state".into(),
            })
        );
    }

    #[rstest]
    fn panic_is_caught_as_a_failure() {
        let mut hooks = HookRegistry::new();
        assert!(hooks.register_before_step(reject_step).is_ok());
        let Err(err) = hooks.execute_before_step(&step()) else {
            panic!("the hook rejects step `x`");
        };
        assert!(matches!(
            &err,
            HookError::Failed { point: HookPoint::BeforeStep, message }
                if message.contains("step `x` is not allowed")
        ));
        assert!(err.to_string().starts_with("BeforeStep hook failed: "));
    }

    #[rstest]
    #[case(HookPoint::BeforeAll, "Calculator", "Before all.")]
    #[case(HookPoint::AfterAll, "Calculator", "After all.")]
    #[case(HookPoint::Before, "Adding", "Before scenario: Adding")]
    #[case(HookPoint::After, "Adding", "After scenario: Adding")]
    #[case(HookPoint::BeforeStep, "Given x", "Before step: Given x")]
    #[case(HookPoint::AfterStep, "Given x", "After step: Given x")]
    fn invocations_are_announced(
        #[case] point: HookPoint,
        #[case] subject: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(point.announcement(subject), expected);
    }

    #[rstest]
    #[case(HookPoint::BeforeAll, "BeforeAll hook already registered")]
    #[case(HookPoint::AfterStep, "AfterStep hook already registered")]
    fn error_names_the_slot(#[case] point: HookPoint, #[case] expected: &str) {
        assert_eq!(HookError::AlreadyRegistered(point).to_string(), expected);
    }
}
