use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::env;

pub struct Config {
    inner: RwLock<InnerConfig>,
}

struct InnerConfig {
    database_url: String,
    bind_addr: String,
    anomaly_api_url: String,
    simulation_interval_secs: u64,
    scorer_timeout_ms: u64,
    otel_stdout: bool,
}

impl Config {
    pub fn database_url(&self) -> String {
        let inner = self.inner.read();
        inner.database_url.clone()
    }

    pub fn bind_addr(&self) -> String {
        let inner = self.inner.read();
        inner.bind_addr.clone()
    }

    pub fn anomaly_api_url(&self) -> String {
        let inner = self.inner.read();
        inner.anomaly_api_url.clone()
    }

    pub fn simulation_interval_secs(&self) -> u64 {
        self.inner.read().simulation_interval_secs
    }

    pub fn scorer_timeout_ms(&self) -> u64 {
        self.inner.read().scorer_timeout_ms
    }

    pub fn otel_stdout(&self) -> bool {
        self.inner.read().otel_stdout
    }
}

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv::dotenv().ok();

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let bind_addr = env::var("BIND_ADDR").expect("BIND_ADDR must be set");
    let anomaly_api_url =
        env::var("ANOMALY_API_URL").unwrap_or_else(|_| "http://localhost:8000/predict".to_owned());
    let simulation_interval_secs = env::var("SIMULATION_INTERVAL_SECS")
        .map(|v| v.parse().expect("Invalid SIMULATION_INTERVAL_SECS"))
        .unwrap_or(30);
    let scorer_timeout_ms = env::var("SCORER_TIMEOUT_MS")
        .map(|v| v.parse().expect("Invalid SCORER_TIMEOUT_MS"))
        .unwrap_or(5_000);
    let otel_stdout = env::var("OTEL_STDOUT")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    Config {
        inner: RwLock::new(InnerConfig {
            database_url,
            bind_addr,
            anomaly_api_url,
            simulation_interval_secs,
            scorer_timeout_ms,
            otel_stdout,
        }),
    }
});
