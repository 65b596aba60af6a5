/// Circulation service configuration loaded from environment variables.
#[derive(Debug)]
pub struct CirculationConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3117). Env var: `CIRCULATION_PORT`.
    pub circulation_port: u16,
}

impl CirculationConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            circulation_port: std::env::var("CIRCULATION_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3117),
        }
    }
}
