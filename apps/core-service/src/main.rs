//! # Core Service サーバー
//!
//! イベント参加受付（チケット予約・エンロールメント登録）を担当する内部 API サーバー。
//!
//! ## アクセス制御
//!
//! 内部ネットワークからのみアクセス可能とする。ユーザー認証はゲートウェイが行い、
//! 認証済みユーザーの ID を `user_id` クエリで受け取る。
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │   Gateway    │────▶│ Core Service │────▶│  PostgreSQL  │
//! └──────────────┘     └──────┬───────┘     └──────────────┘
//!                             │
//!                             ▼
//!                      ┌──────────────┐
//!                      │    ViaCEP    │
//!                      └──────────────┘
//! ```
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `CORE_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `CORE_PORT` | **Yes** | ポート番号 |
//! | `DATABASE_URL` | **Yes** | PostgreSQL 接続 URL |
//! | `VIA_CEP_API` | No | ViaCEP のベース URL（デフォルト: `https://viacep.com.br/ws`） |
//! | `VIA_CEP_TIMEOUT_SECS` | No | ViaCEP のタイムアウト秒（デフォルト: `5`） |
//! | `LOG_FORMAT` | No | `pretty`（デフォルト）または `json` |
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境
//! cargo run -p drivent-core-service
//!
//! # 本番環境
//! CORE_PORT=13001 DATABASE_URL=postgres://... LOG_FORMAT=json \
//!   cargo run -p drivent-core-service --release
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use drivent_core_service::{
   app_builder::{api_routes, build_app, readiness_routes},
   config::CoreConfig,
   handler::{EnrollmentState, ReadinessState, TicketState},
   usecase::{EnrollmentUseCaseImpl, TicketUseCaseImpl},
};
use drivent_domain::clock::{Clock, SystemClock};
use drivent_infra::{
   ViaCepClient,
   db::{self, PgTransactionManager, TransactionManager},
   repository::{PostgresAddressRepository, PostgresEnrollmentRepository, PostgresTicketRepository},
};
use drivent_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;

/// Core Service サーバーのエントリーポイント
#[tokio::main]
async fn main() -> anyhow::Result<()> {
   // .env ファイルを読み込む（存在する場合）
   dotenvy::dotenv().ok();

   // トレーシング初期化
   let tracing_config = TracingConfig::from_env("core-service");
   init_tracing(&tracing_config);
   let _tracing_guard = tracing::info_span!("app", service = "core-service").entered();

   // 設定読み込み
   let config = CoreConfig::from_env().context("設定の読み込みに失敗しました")?;

   tracing::info!(
      "Core Service サーバーを起動します: {}:{}",
      config.host,
      config.port
   );

   // データベース接続プールを作成
   let pool = db::create_pool(&config.database_url)
      .await
      .context("データベース接続に失敗しました")?;
   tracing::info!("データベースに接続しました");

   db::run_migrations(&pool)
      .await
      .context("マイグレーションの実行に失敗しました")?;
   tracing::info!("マイグレーションを適用しました");

   // 依存コンポーネントを初期化
   let ticket_repo = Arc::new(PostgresTicketRepository::new(pool.clone()));
   let enrollment_repo = Arc::new(PostgresEnrollmentRepository::new(pool.clone()));
   let address_repo = Arc::new(PostgresAddressRepository::new(pool.clone()));
   let tx_manager: Arc<dyn TransactionManager> = Arc::new(PgTransactionManager::new(pool.clone()));
   let clock: Arc<dyn Clock> = Arc::new(SystemClock);
   let cep_client = Arc::new(
      ViaCepClient::new(&config.via_cep.base_url, config.via_cep.timeout)
         .context("ViaCEP クライアントの初期化に失敗しました")?,
   );

   let ticket_state = Arc::new(TicketState {
      usecase: TicketUseCaseImpl::new(
         ticket_repo,
         enrollment_repo.clone(),
         tx_manager.clone(),
         clock.clone(),
      ),
   });
   let enrollment_state = Arc::new(EnrollmentState {
      usecase: EnrollmentUseCaseImpl::new(
         enrollment_repo,
         address_repo,
         cep_client,
         tx_manager,
         clock,
      ),
   });
   let readiness_state = Arc::new(ReadinessState { pool });

   let app = build_app(
      api_routes(ticket_state, enrollment_state).merge(readiness_routes(readiness_state)),
   );

   // サーバー起動
   let addr: SocketAddr = format!("{}:{}", config.host, config.port)
      .parse()
      .context("アドレスのパースに失敗しました")?;

   let listener = TcpListener::bind(addr).await?;
   tracing::info!("Core Service サーバーが起動しました: {}", addr);

   axum::serve(listener, app).await?;

   Ok(())
}
