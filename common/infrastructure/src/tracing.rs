use std::{fmt, sync::Once};
use tracing_subscriber::{
    EnvFilter, field::MakeExt, fmt::format::FmtSpan, layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Report the timing of instrumented spans
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tracing {
    #[default]
    #[clap(name = "disabled")]
    Disabled,
    #[clap(name = "enabled")]
    Enabled,
}

impl fmt::Display for Tracing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tracing::Disabled => write!(f, "disabled"),
            Tracing::Enabled => write!(f, "enabled"),
        }
    }
}

static INIT: Once = Once::new();

/// Initialize the global logging and tracing subscriber.
///
/// Only the first call has an effect, `log` records are forwarded to the subscriber.
pub fn init_tracing(name: &str, tracing: Tracing) {
    INIT.call_once(|| init(name, tracing));
}

fn init(name: &str, tracing: Tracing) {
    const RUST_LOG: &str = "info,sqlx=warn";

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        eprintln!("RUST_LOG is unset, using default: '{RUST_LOG}'");
        EnvFilter::new(RUST_LOG)
    });

    let spans = match tracing {
        Tracing::Disabled => FmtSpan::NONE,
        Tracing::Enabled => FmtSpan::CLOSE,
    };

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .map_fmt_fields(|f| f.debug_alt())
                .with_span_events(spans)
                .with_ansi(true)
                .with_level(true)
                .compact(),
        )
        .try_init();

    match result {
        Ok(()) => log::debug!("Initialized logging for {name} (tracing: {tracing})"),
        Err(err) => eprintln!("Error initializing logging: {:?}", err),
    }
}
