use std::sync::Once;

use log::LevelFilter;

static INIT: Once = Once::new();

// Quiet by default; override with RUST_LOG (e.g. RUST_LOG=chain_table=trace).
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = env_logger::Builder::new()
            .filter_level(LevelFilter::Warn)
            .format_timestamp_millis()
            .is_test(true)
            .parse_default_env()
            .try_init();
    });
}
