//! # PostgreSQL データベース接続管理
//!
//! 接続プールの作成、マイグレーション、トランザクション境界を提供する。
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use drivent_infra::db;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = db::create_pool("postgres://localhost/drivent").await?;
//!     db::run_migrations(&pool).await?;
//!
//!     let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM ticket_types")
//!         .fetch_one(&pool)
//!         .await?;
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Postgres, Transaction, postgres::PgPoolOptions};

use crate::error::InfraError;

/// データベースマイグレーションを実行する
///
/// 適用済みのマイグレーションはスキップされる。sqlx は advisory lock を取るため、
/// 複数プロセスから同時に呼んでも安全。
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
   sqlx::migrate!("../../migrations").run(pool).await
}

/// PostgreSQL 接続プールを作成する
///
/// 起動時に一度だけ呼び、アプリケーション全体で共有する。
///
/// - `max_connections(10)`: 最大接続数
/// - `acquire_timeout(5秒)`: 接続取得のタイムアウト
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
   PgPoolOptions::new()
      .max_connections(10)
      .acquire_timeout(Duration::from_secs(5))
      .connect(database_url)
      .await
}

/// DB 疎通確認（`SELECT 1`）
///
/// Readiness Check で使用する。
pub async fn ping(pool: &PgPool) -> Result<(), InfraError> {
   sqlx::query("SELECT 1").execute(pool).await?;
   Ok(())
}

// =============================================================================
// TxContext
// =============================================================================

/// トランザクションコンテキスト
///
/// 書き込みリポジトリメソッドの必須引数。トランザクションなしの書き込みは
/// コンパイルエラーになる。
///
/// 1. `TransactionManager::begin()` で作成
/// 2. 書き込みメソッドに `&mut TxContext` として渡す
/// 3. `commit()` でコミット、またはドロップでロールバック
pub struct TxContext(TxContextInner);

enum TxContextInner {
   Pg(Transaction<'static, Postgres>),
   #[cfg(any(test, feature = "test-utils"))]
   Mock,
}

impl TxContext {
   pub(crate) async fn begin_pg(pool: &PgPool) -> Result<Self, InfraError> {
      Ok(Self(TxContextInner::Pg(pool.begin().await?)))
   }

   /// テスト用のモック TxContext
   ///
   /// インメモリのモックリポジトリは `conn()` を呼ばない。
   #[cfg(any(test, feature = "test-utils"))]
   pub fn mock() -> Self {
      Self(TxContextInner::Mock)
   }

   /// トランザクションをコミットする
   ///
   /// 呼ばずにドロップすると sqlx がロールバックする。
   pub async fn commit(self) -> Result<(), InfraError> {
      match self.0 {
         TxContextInner::Pg(tx) => {
            tx.commit().await?;
            Ok(())
         }
         #[cfg(any(test, feature = "test-utils"))]
         TxContextInner::Mock => Ok(()),
      }
   }

   /// トランザクション内の DB コネクション
   pub(crate) fn conn(&mut self) -> Result<&mut PgConnection, InfraError> {
      match &mut self.0 {
         TxContextInner::Pg(tx) => Ok(&mut **tx),
         #[cfg(any(test, feature = "test-utils"))]
         TxContextInner::Mock => Err(InfraError::unexpected(
            "モック TxContext から DB コネクションは取得できません",
         )),
      }
   }
}

// =============================================================================
// TransactionManager
// =============================================================================

/// トランザクション管理トレイト
///
/// ユースケース層は PgPool に直接依存せず、このトレイト経由でトランザクションを開始する。
#[async_trait]
pub trait TransactionManager: Send + Sync {
   async fn begin(&self) -> Result<TxContext, InfraError>;
}

/// PostgreSQL 用 TransactionManager
pub struct PgTransactionManager {
   pool: PgPool,
}

impl PgTransactionManager {
   pub fn new(pool: PgPool) -> Self {
      Self { pool }
   }
}

#[async_trait]
impl TransactionManager for PgTransactionManager {
   async fn begin(&self) -> Result<TxContext, InfraError> {
      TxContext::begin_pg(&self.pool).await
   }
}
