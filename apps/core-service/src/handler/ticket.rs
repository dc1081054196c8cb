//! # チケットハンドラ
//!
//! ## エンドポイント
//!
//! - `GET /internal/tickets/types` - チケット種別一覧
//! - `GET /internal/tickets?user_id=` - ユーザーのチケット（種別付き）
//! - `POST /internal/tickets?user_id=` - チケット予約

use std::sync::Arc;

use axum::{
   Json,
   extract::{Query, State},
   http::StatusCode,
   response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use drivent_domain::{
   ticket::{TicketType, TicketTypeId, TicketWithType},
   user::UserId,
};
use drivent_shared::ApiResponse;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserQuery;
use crate::{
   error::CoreError,
   usecase::{CreateTicketInput, TicketUseCaseImpl},
};

/// チケット API の共有状態
pub struct TicketState {
   pub usecase: TicketUseCaseImpl,
}

// --- リクエスト/レスポンス型 ---

/// チケット予約リクエスト
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
   pub ticket_type_id: Uuid,
}

/// チケット種別 DTO
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketTypeDto {
   pub id:             Uuid,
   pub name:           String,
   pub price:          i32,
   pub is_remote:      bool,
   pub includes_hotel: bool,
   pub created_at:     String,
   pub updated_at:     String,
}

impl From<TicketType> for TicketTypeDto {
   fn from(ticket_type: TicketType) -> Self {
      Self {
         id:             *ticket_type.id.as_uuid(),
         name:           ticket_type.name,
         price:          ticket_type.price,
         is_remote:      ticket_type.is_remote,
         includes_hotel: ticket_type.includes_hotel,
         created_at:     ticket_type.created_at.to_rfc3339(),
         updated_at:     ticket_type.updated_at.to_rfc3339(),
      }
   }
}

/// チケット DTO
///
/// 種別は `TicketType` キーで埋め込む。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketDto {
   pub id:             Uuid,
   pub status:         String,
   pub ticket_type_id: Uuid,
   pub enrollment_id:  Uuid,
   pub created_at:     String,
   pub updated_at:     String,
   #[serde(rename = "TicketType")]
   pub ticket_type:    TicketTypeDto,
}

impl From<TicketWithType> for TicketDto {
   fn from(value: TicketWithType) -> Self {
      let TicketWithType {
         ticket,
         ticket_type,
      } = value;
      Self {
         id:             *ticket.id().as_uuid(),
         status:         ticket.status().as_str().to_string(),
         ticket_type_id: *ticket.ticket_type_id().as_uuid(),
         enrollment_id:  *ticket.enrollment_id().as_uuid(),
         created_at:     ticket.created_at().to_rfc3339(),
         updated_at:     ticket.updated_at().to_rfc3339(),
         ticket_type:    ticket_type.into(),
      }
   }
}

// --- ハンドラ ---

/// GET /internal/tickets/types
pub async fn list_ticket_types(
   State(state): State<Arc<TicketState>>,
) -> Result<impl IntoResponse, CoreError> {
   let types = state.usecase.get_ticket_types().await?;

   let items: Vec<TicketTypeDto> = types.into_iter().map(TicketTypeDto::from).collect();
   Ok((StatusCode::OK, Json(ApiResponse::new(items))))
}

/// GET /internal/tickets?user_id=
///
/// ## レスポンス
///
/// - `200 OK`: チケット（種別付き）
/// - `404 Not Found`: チケット未購入
pub async fn get_ticket(
   State(state): State<Arc<TicketState>>,
   WithRejection(Query(query), _): WithRejection<Query<UserQuery>, CoreError>,
) -> Result<impl IntoResponse, CoreError> {
   let user_id = UserId::from_uuid(query.user_id);

   let ticket = state.usecase.get_ticket(&user_id).await?;

   Ok((StatusCode::OK, Json(ApiResponse::new(TicketDto::from(ticket)))))
}

/// POST /internal/tickets?user_id=
///
/// ## レスポンス
///
/// - `201 Created`: 予約したチケット（種別付き）
/// - `404 Not Found`: エンロールメント未登録、またはチケット種別が存在しない
pub async fn create_ticket(
   State(state): State<Arc<TicketState>>,
   WithRejection(Query(query), _): WithRejection<Query<UserQuery>, CoreError>,
   WithRejection(Json(req), _): WithRejection<Json<CreateTicketRequest>, CoreError>,
) -> Result<impl IntoResponse, CoreError> {
   let input = CreateTicketInput {
      user_id:        UserId::from_uuid(query.user_id),
      ticket_type_id: TicketTypeId::from_uuid(req.ticket_type_id),
   };

   let ticket = state.usecase.create_ticket(input).await?;

   Ok((StatusCode::CREATED, Json(ApiResponse::new(TicketDto::from(ticket)))))
}
