use config::{Config, ConfigError, Environment};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub db_path: String,
    pub host: String,
    pub port: u16,
    pub quiz: QuizSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuizSettings {
    /// Drop already served questions from the pool before drawing the next one.
    pub exclude_previous: bool,
}

impl Settings {
    /// Reads `.env` and `TRIVIA_*` variables on top of the built-in defaults,
    /// e.g. `TRIVIA_PORT=3000` or `TRIVIA_QUIZ__EXCLUDE_PREVIOUS=true`.
    pub fn load() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Ok(Self::from_source(environment())?)
    }

    fn from_source(env: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("db_path", "trivia.db")?
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080)?
            .set_default("quiz.exclude_previous", false)?
            .add_source(env)
            .build()?
            .try_deserialize()
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn environment() -> Environment {
    Environment::with_prefix("TRIVIA")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
