//! Panic payload formatting.

use std::any::Any;

/// Render a panic payload as text.
///
/// String payloads are returned as is; common scalar payloads (as produced by
/// `std::panic::panic_any(42)`) are formatted with `Display`.
///
/// # Examples
///
/// ```
/// use pepino::panic_message;
/// use std::any::Any;
///
/// let payload: Box<dyn Any + Send> = Box::new("boom");
/// assert_eq!(panic_message(&*payload), "boom");
/// ```
#[must_use]
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    macro_rules! try_display {
        ($($ty:ty),* $(,)?) => {
            $(
                if let Some(value) = payload.downcast_ref::<$ty>() {
                    return value.to_string();
                }
            )*
        };
    }

    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_string();
    }
    try_display!(String, i32, i64, u32, u64, usize, isize, f64, bool, char);
    "<non-string panic payload>".to_string()
}
