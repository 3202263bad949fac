//! Logging subsystem.
//!
//! Library crates pull the macros from here (`logger::info!`, `logger::debug!`)
//! and stay agnostic of the subscriber; a host calls [`setup`] once to install
//! one.

use serde::Deserialize;
use strum::{Display, EnumString};
pub use tracing::{debug, error, event, info, instrument, warn, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Category tag attached to structured log events.
#[derive(Clone, Debug, Default, Deserialize, Display, EnumString)]
pub enum Tag {
    /// General.
    #[default]
    General,

    /// API: outgoing request.
    ApiOutgoingRequest,
    /// API: response received.
    ApiIncomingResponse,

    /// A provider authorization flow event.
    ProviderFlow,
    /// A 3DS state transition.
    ThreeDs,
}

/// Install a formatting subscriber writing to non-blocking stdout.
///
/// The returned guard flushes buffered events on drop; hold it for the
/// program's lifetime. `RUST_LOG` overrides `default_level` when set.
pub fn setup(default_level: Level) -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.to_string()));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_target(true))
        .init();

    guard
}
