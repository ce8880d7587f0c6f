use tracing_subscriber::fmt::format::FmtSpan;

// Records go to stdout, so all of the logging has to go to stderr or the two streams get
// interleaved and downstream ingestion chokes on the log lines.
pub fn setup(env_filter: &str) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::NEW)
        .with_target(false)
        .with_env_filter(env_filter)
        .compact()
        .init();
}
