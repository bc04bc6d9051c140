//! Application initialization.
//!
//! Logger setup lives here; per-run HTTP clients are built in `fetch` since
//! their configuration (proxy, UA, timeouts) is per-batch, not per-process.

mod logger;

pub use logger::init_logger_with;
