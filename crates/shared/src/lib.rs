//! # Drivent 共有ユーティリティ
//!
//! ドメイン・インフラ・サービスの各クレートから使われる共通型を提供する。
//!
//! - [`ApiResponse`]: `{ "data": T }` エンベロープ
//! - [`ErrorResponse`]: RFC 9457 Problem Details
//! - [`HealthResponse`] / [`ReadinessResponse`]: ヘルスチェック
//! - [`observability`]: トレーシング初期化と Request ID（`observability` feature）
//!
//! ビジネスロジックは置かない。axum にも依存しない。

pub mod api_response;
#[cfg(feature = "observability")]
pub mod canonical_log;
pub mod error_response;
pub mod health;
pub mod observability;

pub use api_response::ApiResponse;
pub use error_response::ErrorResponse;
pub use health::{CheckStatus, HealthResponse, ReadinessResponse, ReadinessStatus};
