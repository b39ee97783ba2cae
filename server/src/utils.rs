use log::info;
use shared::{Sim, SimClock, SimSettings};
use spacetimedb::{log_stopwatch::LogStopwatch as SpacetimeLogStopwatch, ReducerContext};
use std::sync::{Mutex, PoisonError};

use crate::schema::sim_settings;
use crate::store::DbStore;

/// Row id of the single `sim_settings` row.
pub const SIM_SETTINGS_ID: u32 = 1;

/// Rate-limit gates for the opportunistic ticks.
///
/// Lives for the lifetime of the module instance. Losing it (module reload) only means the
/// next command is allowed to tick immediately.
static SIM_CLOCK: Mutex<SimClock> = Mutex::new(SimClock::new());

/// Transaction time in milliseconds since the Unix epoch.
pub fn now_ms(ctx: &ReducerContext) -> i64 {
    ctx.timestamp.to_micros_since_unix_epoch() / 1_000
}

/// Tunables from the `sim_settings` row, or the built-in defaults before `init` ran.
pub fn load_settings(ctx: &ReducerContext) -> SimSettings {
    ctx.db
        .sim_settings()
        .id()
        .find(SIM_SETTINGS_ID)
        .map(|row| row.to_settings())
        .unwrap_or_default()
}

/// Runs one command against the module's tables.
pub fn with_sim<T>(
    ctx: &ReducerContext,
    f: impl for<'s> FnOnce(&mut Sim<'s, DbStore<'s>>) -> T,
) -> T {
    let settings = load_settings(ctx);
    let mut store = DbStore::new(ctx);
    let mut clock = SIM_CLOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let mut sim = Sim::new(&mut store, &mut clock, &settings, now_ms(ctx));
    f(&mut sim)
}

/// Hex form of the caller's connection id, used as the `session` key.
///
/// Falls back to the identity when the host did not attach a connection (scheduled or
/// init reducers).
pub fn connection_key(ctx: &ReducerContext) -> String {
    match ctx.connection_id {
        Some(connection_id) => connection_id.to_hex().to_string(),
        None => ctx.sender.to_hex().to_string(),
    }
}

/// LogStopwatch-style sampled span logging (WASM-safe).
///
/// - logs a begin/end wrapper for the event
/// - logs total event time via SpacetimeDB's `log_stopwatch`
/// - supports sequential spans (`span()` ends the previous span)
pub struct LogStopwatch {
    event_sw: Option<SpacetimeLogStopwatch>,
    span_sw: Option<SpacetimeLogStopwatch>,
    name: String,
    should_sample: bool,
}

impl LogStopwatch {
    /// Logs with probability `sample_rate` in [0, 1], or always when `force_debug` is set.
    ///
    /// Sampling uses `ctx.random::<f32>()` so the module remains deterministic.
    pub fn new(
        ctx: &ReducerContext,
        name: impl Into<String>,
        force_debug: bool,
        sample_rate: f32,
    ) -> Self {
        let name = name.into();
        let should_sample =
            force_debug || (sample_rate > 0.0 && ctx.random::<f32>() <= sample_rate);

        if should_sample {
            info!("--------- {name} begin ---------");
        }

        Self {
            event_sw: should_sample.then(|| SpacetimeLogStopwatch::new("event_time")),
            span_sw: None,
            name,
            should_sample,
        }
    }

    /// Starts a new span within the event, ending any previous span.
    pub fn span(&mut self, section_name: &str) {
        if !self.should_sample {
            return;
        }

        if let Some(sw) = self.span_sw.take() {
            sw.end();
        }

        self.span_sw = Some(SpacetimeLogStopwatch::new(section_name));
    }

    pub fn should_sample(&self) -> bool {
        self.should_sample
    }
}

impl Drop for LogStopwatch {
    fn drop(&mut self) {
        if !self.should_sample {
            return;
        }

        if let Some(sw) = self.span_sw.take() {
            sw.end();
        }
        if let Some(sw) = self.event_sw.take() {
            sw.end();
        }

        info!("---------- {} end ----------", self.name);
    }
}
