pub mod domain;
pub mod forecast;
pub mod model;
pub mod request;

pub mod config {
    use anyhow::Context;
    use std::path::PathBuf;

    pub const DEFAULT_MODEL_PATH: &str = "modelo_estado_fecha.json";
    pub const DEFAULT_LABEL_ENCODER_PATH: &str = "label_encoder_estado.json";
    pub const DEFAULT_PORT: u16 = 5000;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub model_path: PathBuf,
        pub label_encoder_path: PathBuf,
        pub sentry_dsn: Option<String>,
        pub bind_addr: String,
        pub port: u16,
    }

    impl Default for Settings {
        fn default() -> Self {
            Self {
                model_path: PathBuf::from(DEFAULT_MODEL_PATH),
                label_encoder_path: PathBuf::from(DEFAULT_LABEL_ENCODER_PATH),
                sentry_dsn: None,
                bind_addr: "0.0.0.0".to_string(),
                port: DEFAULT_PORT,
            }
        }
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let defaults = Self::default();

            let port = match std::env::var("PORT") {
                Ok(v) => v
                    .trim()
                    .parse::<u16>()
                    .with_context(|| format!("PORT must be a valid port number (got {v:?})"))?,
                Err(_) => defaults.port,
            };

            Ok(Self {
                model_path: non_empty_var("MODEL_PATH")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.model_path),
                label_encoder_path: non_empty_var("LABEL_ENCODER_PATH")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.label_encoder_path),
                sentry_dsn: non_empty_var("SENTRY_DSN"),
                bind_addr: non_empty_var("BIND_ADDR").unwrap_or(defaults.bind_addr),
                port,
            })
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}
