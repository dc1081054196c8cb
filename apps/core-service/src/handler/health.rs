//! # ヘルスチェックハンドラ
//!
//! - `/health`: Liveness Check（常に `"healthy"` を返す）
//! - `/health/ready`: Readiness Check（PostgreSQL に `SELECT 1` を発行）
//!
//! レスポンス型は [`drivent_shared::HealthResponse`] / [`drivent_shared::ReadinessResponse`] を参照。

use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use drivent_infra::db;
use drivent_shared::{CheckStatus, HealthResponse, ReadinessResponse, ReadinessStatus};
use sqlx::PgPool;

/// DB チェックのタイムアウト
const DATABASE_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Core Service のヘルスチェックエンドポイント
pub async fn health_check() -> Json<HealthResponse> {
   Json(HealthResponse::healthy(env!("CARGO_PKG_VERSION")))
}

/// Readiness Check 用の State
pub struct ReadinessState {
   pub pool: PgPool,
}

/// Core Service の Readiness Check エンドポイント
///
/// DB に到達できれば 200、できなければ 503。
#[tracing::instrument(skip_all)]
pub async fn readiness_check(State(state): State<Arc<ReadinessState>>) -> impl IntoResponse {
   let database = check_database(&state.pool).await;
   readiness_response(database)
}

async fn check_database(pool: &PgPool) -> CheckStatus {
   match tokio::time::timeout(DATABASE_CHECK_TIMEOUT, db::ping(pool)).await {
      Ok(Ok(())) => CheckStatus::Ok,
      Ok(Err(e)) => {
         tracing::warn!(error = %e, "readiness check: database ping failed");
         CheckStatus::Error
      }
      Err(_) => {
         tracing::warn!("readiness check: database check timed out");
         CheckStatus::Error
      }
   }
}

fn readiness_response(database: CheckStatus) -> (StatusCode, Json<ReadinessResponse>) {
   let mut checks = HashMap::new();
   checks.insert("database".to_string(), database);

   let response = ReadinessResponse::from_checks(checks);
   let status = match response.status {
      ReadinessStatus::Ready => StatusCode::OK,
      ReadinessStatus::NotReady => StatusCode::SERVICE_UNAVAILABLE,
   };

   (status, Json(response))
}
