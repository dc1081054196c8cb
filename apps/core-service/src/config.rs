//! # Core Service 設定
//!
//! 環境変数から Core Service サーバーの設定を読み込む。

use std::{env, time::Duration};

use thiserror::Error;

/// ViaCEP のデフォルト URL
const DEFAULT_VIA_CEP_API: &str = "https://viacep.com.br/ws";

/// ViaCEP リクエストのデフォルトタイムアウト（秒）
const DEFAULT_VIA_CEP_TIMEOUT_SECS: u64 = 5;

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
   #[error("{0} が設定されていません（.env を確認してください）")]
   Missing(&'static str),

   #[error("{name} の値が不正です: {value}")]
   Invalid { name: &'static str, value: String },
}

/// Core Service サーバーの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
   /// バインドアドレス
   pub host:         String,
   /// ポート番号
   pub port:         u16,
   /// データベース接続 URL
   pub database_url: String,
   /// CEP 検索の設定
   pub via_cep:      ViaCepConfig,
}

/// ViaCEP クライアントの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViaCepConfig {
   /// ベース URL（`VIA_CEP_API`）
   pub base_url: String,
   /// 1 リクエストあたりのタイムアウト
   pub timeout:  Duration,
}

impl CoreConfig {
   /// 環境変数から設定を読み込む
   pub fn from_env() -> Result<Self, ConfigError> {
      Self::from_lookup(|name| env::var(name).ok())
   }

   /// 任意の値取得関数から設定を組み立てる
   fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
      let required = |name: &'static str| lookup(name).ok_or(ConfigError::Missing(name));

      let port_raw = required("CORE_PORT")?;
      let port = port_raw.parse().map_err(|_| ConfigError::Invalid {
         name:  "CORE_PORT",
         value: port_raw.clone(),
      })?;

      let timeout_secs = match lookup("VIA_CEP_TIMEOUT_SECS") {
         Some(raw) => raw.parse::<u64>().map_err(|_| ConfigError::Invalid {
            name:  "VIA_CEP_TIMEOUT_SECS",
            value: raw.clone(),
         })?,
         None => DEFAULT_VIA_CEP_TIMEOUT_SECS,
      };

      Ok(Self {
         host: lookup("CORE_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
         port,
         database_url: required("DATABASE_URL")?,
         via_cep: ViaCepConfig {
            base_url: lookup("VIA_CEP_API").unwrap_or_else(|| DEFAULT_VIA_CEP_API.to_string()),
            timeout:  Duration::from_secs(timeout_secs),
         },
      })
   }
}
