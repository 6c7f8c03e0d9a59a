use tracing_subscriber::EnvFilter;

/// `RUST_LOG`가 없으면 `info` 수준으로 stderr 로깅을 켠다. 두 번째 호출은 무시된다.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
