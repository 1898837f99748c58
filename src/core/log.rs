use tracing_subscriber::{
    EnvFilter, fmt, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt,
};

/// Filter used when `RUST_LOG` is unset. Verbose mode only opens up this
/// crate; reqwest and fjall internals stay quiet.
fn default_directives(verbose: bool) -> &'static str {
    if verbose { "off,xconv=debug" } else { "off" }
}

fn build_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

/// Logs go to stderr so they never interleave with the widget panel on stdout.
pub fn init_logging(verbose: bool) {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .pretty()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(build_filter(verbose))
        .init();
}
