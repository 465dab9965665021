use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_BIND_ADDR: &str = "127.0.0.1";
const DEFAULT_TABLE: &str = "todos";
const DEFAULT_REGION: &str = "ap-northeast-1";

/// 設定読み込みエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// 永続化バックエンドの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Memory,
    DynamoDb,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "dynamodb" => Ok(StoreBackend::DynamoDb),
            _ => Err(ConfigError::InvalidValue {
                name: "TODO_STORE",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub store_backend: StoreBackend,
    pub dynamodb_table: String,
    pub dynamodb_endpoint: Option<String>,
    pub aws_region: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: IpAddr::from([127, 0, 0, 1]),
            port: DEFAULT_PORT,
            store_backend: StoreBackend::default(),
            dynamodb_table: DEFAULT_TABLE.to_string(),
            dynamodb_endpoint: None,
            aws_region: DEFAULT_REGION.to_string(),
        }
    }
}

impl Config {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の参照関数から設定を読み込む（テスト用に環境変数を差し替え可能）
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(v) => v.parse().map_err(|_| ConfigError::InvalidValue {
                name: "PORT",
                value: v.clone(),
            })?,
            None => DEFAULT_PORT,
        };

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr.parse().map_err(|_| ConfigError::InvalidValue {
            name: "BIND_ADDR",
            value: bind_addr.clone(),
        })?;

        let store_backend = match lookup("TODO_STORE") {
            Some(v) => v.parse()?,
            None => StoreBackend::default(),
        };

        Ok(Config {
            bind_addr,
            port,
            store_backend,
            dynamodb_table: lookup("DYNAMODB_TABLE").unwrap_or_else(|| DEFAULT_TABLE.to_string()),
            dynamodb_endpoint: lookup("DYNAMODB_ENDPOINT").filter(|v| !v.is_empty()),
            aws_region: lookup("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn reads_all_variables() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("BIND_ADDR", "0.0.0.0"),
            ("TODO_STORE", "DynamoDB"),
            ("DYNAMODB_TABLE", "todos-test"),
            ("DYNAMODB_ENDPOINT", "http://localhost:8000"),
            ("AWS_REGION", "us-east-1"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.store_backend, StoreBackend::DynamoDb);
        assert_eq!(config.dynamodb_table, "todos-test");
        assert_eq!(config.dynamodb_endpoint.as_deref(), Some("http://localhost:8000"));
        assert_eq!(config.aws_region, "us-east-1");
    }

    #[test]
    fn empty_endpoint_is_ignored() {
        let config = Config::from_lookup(lookup_from(&[("DYNAMODB_ENDPOINT", "")])).unwrap();
        assert_eq!(config.dynamodb_endpoint, None);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert_eq!(
            Config::from_lookup(lookup_from(&[("PORT", "http")])).unwrap_err(),
            ConfigError::InvalidValue { name: "PORT", value: "http".to_string() }
        );
        assert_eq!(
            Config::from_lookup(lookup_from(&[("TODO_STORE", "mongo")])).unwrap_err(),
            ConfigError::InvalidValue { name: "TODO_STORE", value: "mongo".to_string() }
        );
        assert!(Config::from_lookup(lookup_from(&[("BIND_ADDR", "localhost")])).is_err());
    }
}
