//! Log output.
//!
//! `MATHGRADE_LOG` holds `EnvFilter` directives, such as `debug` or
//! `warn,mathgrade::equivalence=debug`. `MATHGRADE_LOG_FORMAT` selects `pretty` (the default)
//! or `json` output. Logs go to stderr so that results written to stdout stay machine-readable.

use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("MATHGRADE_LOG")
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    match std::env::var("MATHGRADE_LOG_FORMAT").as_deref() {
        Ok("json") => builder.json().init(),
        _ => builder.init(),
    }
}
