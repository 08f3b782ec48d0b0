use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_GENERATION_TIMEOUT_MS: u64 = 60_000;
const DEFAULT_TASK_TTL_SECS: u64 = 3600;
const DEFAULT_BOARD: &str = "SSC Maharashtra";
const DEFAULT_CLASS: &str = "10";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let host = std::env::var("HOST")
            .ok()
            .and_then(|value| value.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self {
            host,
            port,
            log_level,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct QuizConfig {
    pub generation_timeout: Duration,
    pub rng_seed: Option<u64>,
    pub task_ttl: Duration,
    pub board: String,
    pub class_name: String,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            generation_timeout: Duration::from_millis(DEFAULT_GENERATION_TIMEOUT_MS),
            rng_seed: None,
            task_ttl: Duration::from_secs(DEFAULT_TASK_TTL_SECS),
            board: DEFAULT_BOARD.to_string(),
            class_name: DEFAULT_CLASS.to_string(),
        }
    }
}

impl QuizConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            generation_timeout: env_parse::<u64>("QUIZ_GENERATION_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.generation_timeout),
            rng_seed: env_parse("QUIZ_RNG_SEED"),
            task_ttl: env_parse::<u64>("QUIZ_TASK_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.task_ttl),
            board: env_string("QUIZ_BOARD").unwrap_or(defaults.board),
            class_name: env_string("QUIZ_CLASS").unwrap_or(defaults.class_name),
        }
    }
}

pub fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_lowercase())
        .and_then(|v| match v.as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        })
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env_string(key)?.trim().parse().ok()
}
