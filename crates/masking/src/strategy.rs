use core::fmt;

/// Debug formatting specialized for secret values.
pub trait Strategy<T> {
    /// Format information about the secret without revealing it.
    fn fmt(value: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

/// Mask the value, printing its type name.
pub struct WithType;

impl<T> Strategy<T> for WithType {
    fn fmt(_: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("*** ")?;
        f.write_str(std::any::type_name::<T>())?;
        f.write_str(" ***")
    }
}

/// Mask the value without printing its type.
pub struct WithoutType;

impl<T> Strategy<T> for WithoutType {
    fn fmt(_: &T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("*** ***")
    }
}
