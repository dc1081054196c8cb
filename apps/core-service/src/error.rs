//! # Core Service エラー定義
//!
//! Core Service 固有のエラーと、HTTP レスポンスへの変換を定義する。
//!
//! | バリアント | HTTP ステータス |
//! |---|---|
//! | `NotFound` | 404 |
//! | `BadRequest` | 400 |
//! | `Database` / `Internal` | 500（詳細はログのみ） |

use axum::{
   Json,
   extract::rejection::{JsonRejection, QueryRejection},
   http::StatusCode,
   response::{IntoResponse, Response},
};
use drivent_domain::DomainError;
use drivent_infra::InfraError;
use drivent_shared::ErrorResponse;
use thiserror::Error;

/// Core Service で発生するエラー
#[derive(Debug, Error)]
pub enum CoreError {
   /// リソースが見つからない
   #[error("リソースが見つかりません: {0}")]
   NotFound(String),

   /// 不正なリクエスト
   #[error("不正なリクエスト: {0}")]
   BadRequest(String),

   /// データベースエラー
   #[error("データベースエラー: {0}")]
   Database(#[from] InfraError),

   /// 内部エラー
   #[error("内部エラー: {0}")]
   Internal(String),
}

impl From<DomainError> for CoreError {
   fn from(err: DomainError) -> Self {
      match err {
         DomainError::Validation(msg) => CoreError::BadRequest(msg),
         not_found @ DomainError::NotFound { .. } => CoreError::NotFound(not_found.to_string()),
      }
   }
}

/// JSON ボディの形式不正は 400 として扱う
impl From<JsonRejection> for CoreError {
   fn from(rejection: JsonRejection) -> Self {
      CoreError::BadRequest(format!(
         "リクエストボディが不正です: {}",
         rejection.body_text()
      ))
   }
}

impl From<QueryRejection> for CoreError {
   fn from(rejection: QueryRejection) -> Self {
      CoreError::BadRequest(format!(
         "クエリパラメータが不正です: {}",
         rejection.body_text()
      ))
   }
}

impl IntoResponse for CoreError {
   fn into_response(self) -> Response {
      let body = match &self {
         CoreError::NotFound(msg) => ErrorResponse::not_found(msg.clone()),
         CoreError::BadRequest(msg) => ErrorResponse::bad_request(msg.clone()),
         CoreError::Database(e) => {
            tracing::error!(
               error.category = "infrastructure",
               error.kind = "database",
               "データベースエラー: {}",
               e
            );
            ErrorResponse::internal_error()
         }
         CoreError::Internal(msg) => {
            tracing::error!(
               error.category = "infrastructure",
               error.kind = "internal",
               "内部エラー: {}",
               msg
            );
            ErrorResponse::internal_error()
         }
      };

      let status =
         StatusCode::from_u16(body.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
      (status, Json(body)).into_response()
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;

   use super::*;

   async fn response_parts(err: CoreError) -> (StatusCode, ErrorResponse) {
      let response = err.into_response();
      let status = response.status();
      let body = axum::body::to_bytes(response.into_body(), usize::MAX)
         .await
         .unwrap();
      (status, serde_json::from_slice(&body).unwrap())
   }

   #[tokio::test]
   async fn test_not_foundは404のproblem_details() {
      let (status, body) =
         response_parts(CoreError::NotFound("チケットが見つかりません".to_string())).await;

      assert_eq!(status, StatusCode::NOT_FOUND);
      assert_eq!(body, ErrorResponse::not_found("チケットが見つかりません"));
   }

   #[tokio::test]
   async fn test_bad_requestは400() {
      let (status, body) = response_parts(CoreError::BadRequest("不正な CEP".to_string())).await;

      assert_eq!(status, StatusCode::BAD_REQUEST);
      assert_eq!(body.detail, "不正な CEP");
   }

   #[tokio::test]
   async fn test_データベースエラーは詳細を隠して500() {
      let (status, body) =
         response_parts(CoreError::Database(InfraError::unexpected("接続が切れました"))).await;

      assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
      assert_eq!(body, ErrorResponse::internal_error());
   }

   #[test]
   fn test_バリデーションエラーはbad_requestに変換される() {
      let err: CoreError = DomainError::Validation("CPF が不正です".to_string()).into();

      assert!(matches!(err, CoreError::BadRequest(msg) if msg == "CPF が不正です"));
   }

   #[test]
   fn test_ドメインのnot_foundはnot_foundに変換される() {
      let err: CoreError = DomainError::NotFound {
         entity_type: "TicketType",
         id:          "abc".to_string(),
      }
      .into();

      assert!(matches!(err, CoreError::NotFound(msg) if msg == "TicketType が見つかりません: abc"));
   }
}
