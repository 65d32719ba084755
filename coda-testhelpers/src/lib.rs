#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

use std::sync::LazyLock;
use std::time::Instant;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static START_TIME: LazyLock<Instant> = LazyLock::new(Instant::now);

struct Uptime;

impl FormatTime for Uptime {
    fn format_time(&self, w: &mut Writer<'_>) -> core::fmt::Result {
        let elapsed = START_TIME.elapsed();
        write!(w, "{:4}.{:03}s", elapsed.as_secs(), elapsed.subsec_millis())
    }
}

static SUBSCRIBER_INIT: LazyLock<()> = LazyLock::new(|| {
    let _ = *START_TIME;

    let filter = std::env::var("CODA_LOG")
        .ok()
        .and_then(|spec| spec.parse::<Targets>().ok())
        .unwrap_or_else(|| Targets::new().with_default(tracing::Level::TRACE));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(true)
                .with_timer(Uptime)
                .with_target(false)
                .with_level(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .with(filter)
        .try_init()
        .ok();
});

/// Set up a tracing subscriber for tests.
///
/// Initialized exactly once per process via [`LazyLock`], so every test can
/// call it unconditionally. Verbosity is controlled with `CODA_LOG`, parsed
/// as a `tracing_subscriber` targets filter (e.g. `CODA_LOG=coda=debug`).
pub fn setup() {
    let _ = *SUBSCRIBER_INIT;
}

/// Deterministic source of test values.
///
/// Successive calls walk a fixed progression, so two generators produce the
/// same stream and expected values in assertions can be generated rather
/// than spelled out.
#[derive(Debug, Default)]
pub struct StubValues {
    bools: u32,
    ints: i64,
    doubles: u32,
}

impl StubValues {
    /// A fresh generator at the start of the progression.
    pub fn new() -> Self {
        StubValues::default()
    }

    /// Alternates `true`, `false`, `true`, ...
    pub fn next_bool(&mut self) -> bool {
        let value = self.bools % 2 == 0;
        self.bools += 1;
        value
    }

    /// Counts up from 1.
    pub fn next_int(&mut self) -> i64 {
        self.ints += 1;
        self.ints
    }

    /// Steps 0.1, 0.2, 0.3, ... (derived from a counter, so no float
    /// accumulation drift).
    pub fn next_double(&mut self) -> f64 {
        self.doubles += 1;
        self.doubles as f64 / 10.0
    }

    /// Strings derived from the integer progression: `value 1`, `value 2`, ...
    pub fn next_string(&mut self) -> String {
        format!("value {}", self.next_int())
    }
}
