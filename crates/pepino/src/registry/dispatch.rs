//! Typed argument conversion and callback adapters.
//!
//! Step callbacks are ordinary closures or functions whose parameters
//! implement [`FromCapture`]. The blanket implementations of [`StepHandler`]
//! and [`ContextStepHandler`] record the callback arity and convert the
//! captured substrings positionally before calling it, so the registry can
//! store every definition behind one uniform signature.

use std::any::type_name;
use std::fmt;

use crate::error::StepError;

/// Conversion from a captured substring into a callback parameter.
///
/// Implemented for the primitive numeric types, `bool`, `char` and `String`,
/// plus `Option<T>` which maps an empty (non-participating) group to `None`.
/// Implement it for domain types to accept them as step parameters.
///
/// # Examples
///
/// ```
/// use pepino::FromCapture;
///
/// struct Celsius(f64);
///
/// impl FromCapture for Celsius {
///     fn from_capture(raw: &str) -> Result<Self, String> {
///         raw.trim_end_matches("°C").parse().map(Celsius).map_err(|e| format!("{e}"))
///     }
/// }
///
/// assert!(Celsius::from_capture("21.5°C").is_ok());
/// ```
pub trait FromCapture: Sized {
    /// Parse one captured substring, describing the problem on failure.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when `raw` is not a valid value.
    fn from_capture(raw: &str) -> Result<Self, String>;
}

macro_rules! from_capture_via_parse {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromCapture for $ty {
                fn from_capture(raw: &str) -> Result<Self, String> {
                    raw.parse::<Self>().map_err(|err| err.to_string())
                }
            }
        )*
    };
}

from_capture_via_parse!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char,
);

impl FromCapture for String {
    fn from_capture(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }
}

impl<T: FromCapture> FromCapture for Option<T> {
    fn from_capture(raw: &str) -> Result<Self, String> {
        if raw.is_empty() {
            Ok(None)
        } else {
            T::from_capture(raw).map(Some)
        }
    }
}

/// Normalise a callback's return value.
pub trait IntoStepOutcome {
    /// `Err` carries the failure message.
    ///
    /// # Errors
    ///
    /// Returns the rendered error when the callback reported a failure.
    fn into_outcome(self) -> Result<(), String>;
}

impl IntoStepOutcome for () {
    fn into_outcome(self) -> Result<(), String> {
        Ok(())
    }
}

impl<E: fmt::Display> IntoStepOutcome for Result<(), E> {
    fn into_outcome(self) -> Result<(), String> {
        self.map_err(|err| err.to_string())
    }
}

/// Failure raised while feeding captures to a callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Capture count differs from the callback arity.
    ArgumentCount {
        /// Declared non-context parameters.
        expected: usize,
        /// Captured groups.
        actual: usize,
    },
    /// A capture could not be converted.
    Conversion {
        /// Zero-based argument position.
        index: usize,
        /// Captured substring.
        value: String,
        /// Declared parameter type.
        target: &'static str,
        /// Conversion message.
        reason: String,
    },
    /// The callback returned an error.
    Failed(String),
}

impl DispatchError {
    pub(crate) fn into_step_error(self, text: &str, pattern: &str) -> StepError {
        let text = text.to_string();
        let pattern = pattern.to_string();
        match self {
            Self::ArgumentCount { expected, actual } => StepError::ArgumentCountMismatch {
                text,
                pattern,
                expected,
                actual,
            },
            Self::Conversion {
                index,
                value,
                target,
                reason,
            } => StepError::Conversion {
                text,
                pattern,
                index,
                value,
                target,
                reason,
            },
            Self::Failed(message) => StepError::Failed { text, message },
        }
    }
}

fn convert<T: FromCapture>(index: usize, raw: &str) -> Result<T, DispatchError> {
    T::from_capture(raw).map_err(|reason| DispatchError::Conversion {
        index,
        value: raw.to_string(),
        target: type_name::<T>(),
        reason,
    })
}

/// A step callback taking only captured arguments.
///
/// `Args` is the tuple of parameter types; it is inferred from the callback
/// signature and never named by callers.
pub trait StepHandler<Args>: 'static {
    /// Number of parameters.
    const ARITY: usize;

    /// Convert `captures` and invoke the callback.
    ///
    /// # Errors
    ///
    /// See [`DispatchError`].
    fn call(&self, captures: &[String]) -> Result<(), DispatchError>;
}

/// A step callback whose first parameter is `&mut Ctx`, followed by
/// captured arguments.
pub trait ContextStepHandler<Ctx, Args>: 'static {
    /// Number of parameters after the context.
    const ARITY: usize;

    /// Convert `captures` and invoke the callback with `context`.
    ///
    /// # Errors
    ///
    /// See [`DispatchError`].
    fn call(&self, context: &mut Ctx, captures: &[String]) -> Result<(), DispatchError>;
}

macro_rules! count {
    () => { 0 };
    ($head:ident $($tail:ident)*) => { 1 + count!($($tail)*) };
}

macro_rules! impl_handlers {
    ($($arg:ident $var:ident $index:tt),*) => {
        impl<Func, Out, $($arg,)*> StepHandler<($($arg,)*)> for Func
        where
            Func: Fn($($arg),*) -> Out + 'static,
            Out: IntoStepOutcome,
            $($arg: FromCapture,)*
        {
            const ARITY: usize = count!($($arg)*);

            fn call(&self, captures: &[String]) -> Result<(), DispatchError> {
                let [$($var),*] = captures else {
                    return Err(DispatchError::ArgumentCount {
                        expected: Self::ARITY,
                        actual: captures.len(),
                    });
                };
                self($(convert::<$arg>($index, $var)?),*)
                    .into_outcome()
                    .map_err(DispatchError::Failed)
            }
        }

        impl<Func, Out, Ctx, $($arg,)*> ContextStepHandler<Ctx, ($($arg,)*)> for Func
        where
            Func: Fn(&mut Ctx, $($arg),*) -> Out + 'static,
            Out: IntoStepOutcome,
            $($arg: FromCapture,)*
        {
            const ARITY: usize = count!($($arg)*);

            fn call(&self, context: &mut Ctx, captures: &[String]) -> Result<(), DispatchError> {
                let [$($var),*] = captures else {
                    return Err(DispatchError::ArgumentCount {
                        expected: Self::ARITY,
                        actual: captures.len(),
                    });
                };
                self(context, $(convert::<$arg>($index, $var)?),*)
                    .into_outcome()
                    .map_err(DispatchError::Failed)
            }
        }
    };
}

impl_handlers!();
impl_handlers!(A0 a0 0);
impl_handlers!(A0 a0 0, A1 a1 1);
impl_handlers!(A0 a0 0, A1 a1 1, A2 a2 2);
impl_handlers!(A0 a0 0, A1 a1 1, A2 a2 2, A3 a3 3);
impl_handlers!(A0 a0 0, A1 a1 1, A2 a2 2, A3 a3 3, A4 a4 4);
impl_handlers!(A0 a0 0, A1 a1 1, A2 a2 2, A3 a3 3, A4 a4 4, A5 a5 5);
impl_handlers!(A0 a0 0, A1 a1 1, A2 a2 2, A3 a3 3, A4 a4 4, A5 a5 5, A6 a6 6);
impl_handlers!(A0 a0 0, A1 a1 1, A2 a2 2, A3 a3 3, A4 a4 4, A5 a5 5, A6 a6 6, A7 a7 7);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    fn call_plain<Args, F: StepHandler<Args>>(
        handler: &F,
        values: &[&str],
    ) -> Result<(), DispatchError> {
        StepHandler::<Args>::call(handler, &strings(values))
    }

    fn call_with<Ctx, Args, F: ContextStepHandler<Ctx, Args>>(
        handler: &F,
        context: &mut Ctx,
        values: &[&str],
    ) -> Result<(), DispatchError> {
        ContextStepHandler::<Ctx, Args>::call(handler, context, &strings(values))
    }

    #[test]
    fn converts_and_forwards_arguments() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let handler = move |a: i32, b: f64, c: String| sink.borrow_mut().push(format!("{a}|{b}|{c}"));
        assert_eq!(call_plain(&handler, &["-3", "2.5", "x y"]), Ok(()));
        assert_eq!(*seen.borrow(), ["-3|2.5|x y"]);
    }

    #[test]
    fn arity_is_recorded() {
        fn two(_: u8, _: u8) {}
        fn none() {}
        assert_eq!(<fn(u8, u8) as StepHandler<(u8, u8)>>::ARITY, 2);
        assert_eq!(call_plain(&two, &["1", "2"]), Ok(()));
        assert_eq!(call_plain(&none, &[]), Ok(()));
    }

    #[test]
    fn wrong_capture_count_is_reported() {
        let handler = |_: i32| {};
        assert_eq!(
            call_plain(&handler, &["1", "2"]),
            Err(DispatchError::ArgumentCount {
                expected: 1,
                actual: 2
            })
        );
    }

    #[rstest]
    #[case("abc", "i32")]
    #[case("", "i32")]
    #[case("99999999999", "i32")]
    fn failed_conversion_names_the_target(#[case] raw: &str, #[case] target: &str) {
        let handler = |_: i32| {};
        let Err(DispatchError::Conversion {
            index,
            value,
            target: actual_target,
            ..
        }) = call_plain(&handler, &[raw])
        else {
            panic!("{raw:?} should fail to convert");
        };
        assert_eq!(index, 0);
        assert_eq!(value, raw);
        assert_eq!(actual_target, target);
    }

    #[test]
    fn result_errors_become_failures() {
        let handler = |n: u32| -> Result<(), String> {
            if n == 3 { Ok(()) } else { Err(format!("expected 3, got {n}")) }
        };
        assert_eq!(call_plain(&handler, &["3"]), Ok(()));
        assert_eq!(
            call_plain(&handler, &["4"]),
            Err(DispatchError::Failed("expected 3, got 4".into()))
        );
    }

    #[test]
    fn context_is_passed_first() {
        #[derive(Default)]
        struct Total(i64);
        let handler = |total: &mut Total, n: i64| total.0 += n;
        let mut total = Total::default();
        assert_eq!(call_with(&handler, &mut total, &["5"]), Ok(()));
        assert_eq!(call_with(&handler, &mut total, &["-2"]), Ok(()));
        assert_eq!(total.0, 3);
    }

    #[rstest]
    #[case("", None)]
    #[case("7", Some(7))]
    fn optional_parameters_accept_empty_groups(#[case] raw: &str, #[case] expected: Option<u8>) {
        assert_eq!(Option::<u8>::from_capture(raw), Ok(expected));
    }

    #[test]
    fn into_step_error_keeps_context() {
        let err = DispatchError::ArgumentCount {
            expected: 1,
            actual: 0,
        }
        .into_step_error("a step", "^a step$");
        assert_eq!(
            err,
            StepError::ArgumentCountMismatch {
                text: "a step".into(),
                pattern: "^a step$".into(),
                expected: 1,
                actual: 0,
            }
        );
    }
}
