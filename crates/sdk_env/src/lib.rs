#![forbid(unsafe_code)]
#![warn(missing_debug_implementations)]

//! Environment of the payments SDK: logger, log tags, build metadata.

pub mod logger;

#[doc(inline)]
pub use logger::*;
pub use tracing;
pub use tracing_appender;

/// Version of the crate the macro is expanded in.
#[macro_export]
macro_rules! version {
    () => {
        env!("CARGO_PKG_VERSION")
    };
}
