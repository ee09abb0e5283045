use env_logger::Builder;
use log::LevelFilter;

fn builder(level: LevelFilter) -> Builder {
    let mut builder = Builder::new();
    builder
        .format_timestamp_secs()
        .filter_level(level)
        .parse_default_env();
    builder
}

/// Info level by default, overridable via `RUST_LOG`
pub fn init_logging() { builder(LevelFilter::Info).format_target(false).init() }

/// Debug level, captured by the test harness. Repeated calls are ignored.
pub fn init_test_logging() { let _ = builder(LevelFilter::Debug).is_test(true).try_init(); }

#[cfg(test)]
#[ctor::ctor]
fn init() { init_test_logging() }
