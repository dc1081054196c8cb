//! # Core Service アプリケーション構築
//!
//! ルーター構築とミドルウェアの積み方を担当する。
//! `main.rs` はインフラ初期化とサーバー起動に集中する。

use std::sync::Arc;

use axum::{
   Router,
   middleware::from_fn,
   routing::get,
};
use drivent_shared::{
   canonical_log::CanonicalLogLineLayer,
   observability::{MakeRequestUuidV7, make_request_span},
};
use tower_http::{
   request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
   trace::TraceLayer,
};

use crate::{
   handler::{
      EnrollmentState,
      ReadinessState,
      TicketState,
      create_ticket,
      get_address_from_cep,
      get_enrollment,
      get_ticket,
      health_check,
      list_ticket_types,
      readiness_check,
      upsert_enrollment,
   },
   middleware::store_request_id,
};

/// 内部 API のルート（`/health` を含む）
pub fn api_routes(ticket_state: Arc<TicketState>, enrollment_state: Arc<EnrollmentState>) -> Router {
   Router::new()
      .route("/health", get(health_check))
      .merge(
         Router::new()
            .route("/internal/tickets/types", get(list_ticket_types))
            .route("/internal/tickets", get(get_ticket).post(create_ticket))
            .with_state(ticket_state),
      )
      .merge(
         Router::new()
            .route(
               "/internal/enrollments",
               get(get_enrollment).post(upsert_enrollment),
            )
            .route("/internal/enrollments/cep", get(get_address_from_cep))
            .with_state(enrollment_state),
      )
}

/// Readiness Check のルート
pub fn readiness_routes(readiness_state: Arc<ReadinessState>) -> Router {
   Router::new()
      .route("/health/ready", get(readiness_check))
      .with_state(readiness_state)
}

/// ルートに共通ミドルウェアを積む
///
/// 下に書いたレイヤーほど外側:
/// 1. SetRequestIdLayer（最外）: UUID v7 を生成（クライアント指定があればそれを使う）
/// 2. TraceLayer: request_id を含むスパンを張る
/// 3. CanonicalLogLineLayer: リクエスト完了時に 1 行サマリログを出す
/// 4. PropagateRequestIdLayer: レスポンスに X-Request-Id をコピー
/// 5. store_request_id: ViaCEP 呼び出しへの伝播用に task-local へ保存
pub fn build_app(routes: Router) -> Router {
   routes
      .layer(from_fn(store_request_id))
      .layer(PropagateRequestIdLayer::x_request_id())
      .layer(CanonicalLogLineLayer)
      .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
      .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
