use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::{env, net::IpAddr, sync::RwLock};

static CONFIG_FILE: &str = "config/config.toml";

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
  pub database: Database,
  pub hostname: String,
  pub bind: IpAddr,
  pub port: u16,
  pub jwt_secret: String,
  pub site_name: String,
  pub posts_per_page: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Database {
  pub user: String,
  pub password: String,
  pub host: String,
  pub port: i32,
  pub database: String,
  pub pool_size: u32,
}

lazy_static! {
  static ref SETTINGS: RwLock<Settings> = RwLock::new(match Settings::init() {
    Ok(c) => c,
    Err(e) => panic!("{}", e),
  });
}

impl Settings {
  /// Defaults are set in code, then overwritten from the config file
  /// (optional), then from the environment (prefix MINIPRESS, double
  /// underscore separator, eg `MINIPRESS_DATABASE__HOST`).
  fn init() -> Result<Self, ConfigError> {
    let s = Config::builder()
      .set_default("database.user", "minipress")?
      .set_default("database.password", "password")?
      .set_default("database.host", "localhost")?
      .set_default("database.port", 5432)?
      .set_default("database.database", "minipress")?
      .set_default("database.pool_size", 5)?
      .set_default("hostname", "localhost:8080")?
      .set_default("bind", "0.0.0.0")?
      .set_default("port", 8080)?
      .set_default("jwt_secret", "changeme")?
      .set_default("site_name", "Minipress")?
      .set_default("posts_per_page", 10)?
      .add_source(File::with_name(&Self::get_config_location()).required(false))
      .add_source(Environment::with_prefix("MINIPRESS").separator("__"))
      .build()?;

    s.try_deserialize()
  }

  pub fn get() -> Self {
    SETTINGS.read().unwrap().to_owned()
  }

  pub fn get_database_url(&self) -> String {
    match env::var("MINIPRESS_DATABASE_URL") {
      Ok(url) => url,
      Err(_) => format!(
        "postgres://{}:{}@{}:{}/{}",
        self.database.user,
        self.database.password,
        self.database.host,
        self.database.port,
        self.database.database
      ),
    }
  }

  pub fn get_config_location() -> String {
    env::var("MINIPRESS_CONFIG_LOCATION").unwrap_or_else(|_| CONFIG_FILE.to_string())
  }
}
