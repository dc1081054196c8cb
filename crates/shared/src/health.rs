//! # ヘルスチェック共通型

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Liveness レスポンス
///
/// `status` は稼働状態、`version` は Cargo.toml のバージョン。
///
/// ```
/// use drivent_shared::HealthResponse;
///
/// let response = HealthResponse::healthy("0.1.0");
/// assert_eq!(response.status, "healthy");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
   pub status:  String,
   pub version: String,
}

impl HealthResponse {
   pub fn healthy(version: impl Into<String>) -> Self {
      Self {
         status:  "healthy".to_string(),
         version: version.into(),
      }
   }
}

/// 個別チェックの結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
   Ok,
   Error,
}

/// Readiness 全体のステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessStatus {
   /// 全依存先が利用可能
   Ready,
   /// 一部の依存先が利用不可
   NotReady,
}

/// Readiness レスポンス
///
/// `checks` のキーはチェック名（`"database"` など）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
   pub status: ReadinessStatus,
   pub checks: HashMap<String, CheckStatus>,
}

impl ReadinessResponse {
   /// 個別チェック結果から全体ステータスを決める
   ///
   /// 1 つでも `Error` があれば `NotReady`。
   pub fn from_checks(checks: HashMap<String, CheckStatus>) -> Self {
      let status = if checks.values().all(|s| *s == CheckStatus::Ok) {
         ReadinessStatus::Ready
      } else {
         ReadinessStatus::NotReady
      };
      Self { status, checks }
   }
}
