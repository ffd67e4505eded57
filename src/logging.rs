use tracing_subscriber::EnvFilter;

pub fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "iplayer_dl=debug"
    } else {
        "iplayer_dl=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
