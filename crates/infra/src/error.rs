//! # インフラ層エラー定義
//!
//! データベースや外部サービス（ViaCEP）との通信で発生するエラーを表現する。
//!
//! `std::io::Error` と同じ struct + enum 構成:
//! - [`InfraError`]: 種別（[`InfraErrorKind`]）と [`SpanTrace`] を保持するラッパー
//! - [`InfraErrorKind`]: エラーの具体的な種別
//!
//! `From` 実装と convenience constructor はどちらも生成時点の SpanTrace を捕捉する。

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// インフラ層で発生するエラー
///
/// 種別に応じた処理には [`kind()`](InfraError::kind) を使う:
///
/// ```ignore
/// match error.kind() {
///     InfraErrorKind::Http(e) if e.is_timeout() => { /* タイムアウト */ }
///     _ => { /* その他 */ }
/// }
/// ```
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
   kind:       InfraErrorKind,
   span_trace: SpanTrace,
}

/// インフラ層エラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
   /// SQL の実行失敗、接続エラー、制約違反など
   #[error("データベースエラー: {0}")]
   Database(#[source] sqlx::Error),

   /// 外部 HTTP 呼び出しの失敗（接続不可、タイムアウト、ボディ読み取り失敗）
   #[error("HTTP エラー: {0}")]
   Http(#[source] reqwest::Error),

   #[error("シリアライズエラー: {0}")]
   Serialization(#[source] serde_json::Error),

   /// クライアント入力に起因するエラー
   ///
   /// 外部サービスが入力を拒否した場合など、インフラ層で検出されるが原因は入力側にある。
   #[error("入力エラー: {0}")]
   InvalidInput(String),

   /// 上記に分類できないエラー（DB の不正データなど）
   #[error("予期しないエラー: {0}")]
   Unexpected(String),
}

impl InfraError {
   pub fn kind(&self) -> &InfraErrorKind {
      &self.kind
   }

   pub fn span_trace(&self) -> &SpanTrace {
      &self.span_trace
   }

   /// クライアント入力起因のエラーかどうか
   pub fn is_invalid_input(&self) -> bool {
      matches!(self.kind, InfraErrorKind::InvalidInput(_))
   }

   pub fn into_parts(self) -> (InfraErrorKind, SpanTrace) {
      (self.kind, self.span_trace)
   }

   pub fn invalid_input(msg: impl Into<String>) -> Self {
      Self {
         kind:       InfraErrorKind::InvalidInput(msg.into()),
         span_trace: SpanTrace::capture(),
      }
   }

   pub fn unexpected(msg: impl Into<String>) -> Self {
      Self {
         kind:       InfraErrorKind::Unexpected(msg.into()),
         span_trace: SpanTrace::capture(),
      }
   }
}

impl fmt::Debug for InfraError {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("InfraError")
         .field("kind", &self.kind)
         .field("span_trace", &self.span_trace)
         .finish()
   }
}

impl std::error::Error for InfraError {
   fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
      std::error::Error::source(&self.kind)
   }
}

// ===== From 実装（SpanTrace 自動キャプチャ） =====

impl From<sqlx::Error> for InfraError {
   fn from(source: sqlx::Error) -> Self {
      Self {
         kind:       InfraErrorKind::Database(source),
         span_trace: SpanTrace::capture(),
      }
   }
}

impl From<reqwest::Error> for InfraError {
   fn from(source: reqwest::Error) -> Self {
      Self {
         kind:       InfraErrorKind::Http(source),
         span_trace: SpanTrace::capture(),
      }
   }
}

impl From<serde_json::Error> for InfraError {
   fn from(source: serde_json::Error) -> Self {
      Self {
         kind:       InfraErrorKind::Serialization(source),
         span_trace: SpanTrace::capture(),
      }
   }
}
