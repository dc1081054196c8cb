//! # Request ID ミドルウェア
//!
//! `SetRequestIdLayer` が付与した Request ID をハンドラの実行中だけ task-local に置く。
//! ViaCEP クライアントはここから Request ID を読み、外部リクエストのヘッダーに付ける。

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use drivent_shared::observability::scope_request_id;
use tower_http::request_id::RequestId;

/// Request ID を task-local に保存するミドルウェア
///
/// extensions に `RequestId` がない場合は `"-"` を保存する。
pub async fn store_request_id(request: Request<Body>, next: Next) -> Response {
   let request_id = request
      .extensions()
      .get::<RequestId>()
      .and_then(|id| id.header_value().to_str().ok())
      .unwrap_or("-")
      .to_string();

   scope_request_id(request_id, next.run(request)).await
}

#[cfg(test)]
mod tests {
   use axum::{Router, middleware::from_fn, routing::get};
   use drivent_shared::observability::{REQUEST_ID_HEADER, current_request_id};
   use tower::ServiceExt;
   use tower_http::request_id::{MakeRequestUuid, SetRequestIdLayer};

   use super::*;

   async fn echo_request_id() -> String {
      current_request_id().unwrap_or_default()
   }

   fn app() -> Router {
      Router::new()
         .route("/echo", get(echo_request_id))
         .layer(from_fn(store_request_id))
         .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
   }

   async fn body_string(response: Response) -> String {
      let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
         .await
         .unwrap();
      String::from_utf8(bytes.to_vec()).unwrap()
   }

   #[tokio::test]
   async fn test_クライアント指定のrequest_idをハンドラから参照できる() {
      let request = Request::builder()
         .uri("/echo")
         .header(REQUEST_ID_HEADER, "req-from-gateway")
         .body(Body::empty())
         .unwrap();

      let response = app().oneshot(request).await.unwrap();

      assert_eq!(body_string(response).await, "req-from-gateway");
   }

   #[tokio::test]
   async fn test_request_idがなければ生成された値を参照できる() {
      let request = Request::builder().uri("/echo").body(Body::empty()).unwrap();

      let response = app().oneshot(request).await.unwrap();

      let id = body_string(response).await;
      assert!(uuid::Uuid::parse_str(&id).is_ok(), "UUID であること: {id}");
   }

   #[tokio::test]
   async fn test_request_id_layerがなければハイフン() {
      let app = Router::new()
         .route("/echo", get(echo_request_id))
         .layer(from_fn(store_request_id));
      let request = Request::builder().uri("/echo").body(Body::empty()).unwrap();

      let response = app.oneshot(request).await.unwrap();

      assert_eq!(body_string(response).await, "-");
   }
}
