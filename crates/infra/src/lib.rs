//! # Drivent インフラ層
//!
//! PostgreSQL と ViaCEP との接続・通信を担当する。
//!
//! ドメイン層は外部システムを知らない。このクレートがリポジトリトレイトと
//! CEP クライアントトレイトを定義し、その具体実装を提供する。
//!
//! ## モジュール構成
//!
//! - [`db`] - 接続プール、マイグレーション、トランザクション
//! - [`repository`] - チケット・エンロールメント・住所のリポジトリ
//! - [`cep_client`] - ViaCEP クライアント
//! - [`error`] - インフラ層エラー
//! - `mock` - インメモリ実装（`test-utils` feature）
//!
//! ## 依存関係
//!
//! ```text
//! core-service → infra → domain
//!                  ↓
//!                shared
//! ```

pub mod cep_client;
pub mod db;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod repository;

pub use cep_client::{CepClient, ViaCepClient};
pub use error::{InfraError, InfraErrorKind};
