/// Configuration for tracing initialization, assembled in `main` from the
/// application settings.
pub struct TracingConfig {
    pub environment: String,
    pub json_format: bool,
}
