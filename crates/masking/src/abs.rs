//! Access traits for secret wrappers.

use crate::{Secret, Strategy};

/// Expose a reference to the inner secret.
pub trait PeekInterface<S> {
    /// Only method providing read access to the secret value.
    fn peek(&self) -> &S;
}

/// Consume the wrapper and return the inner secret.
pub trait ExposeInterface<S> {
    /// Consume the secret and return the inner value.
    fn expose(self) -> S;
}

/// Expose the inner value of an optional secret by cloning.
pub trait ExposeOptionInterface<S> {
    /// Clone out the inner value, if any.
    fn expose_option(&self) -> S;
}

impl<S, I> ExposeInterface<S> for Secret<S, I>
where
    I: Strategy<S>,
{
    fn expose(self) -> S {
        self.inner_secret
    }
}

impl<S, I> ExposeOptionInterface<Option<S>> for Option<Secret<S, I>>
where
    S: Clone,
    I: Strategy<S>,
{
    fn expose_option(&self) -> Option<S> {
        self.as_ref().map(|secret| secret.peek().clone())
    }
}
