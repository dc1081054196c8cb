//! # エンロールメントハンドラ
//!
//! ## エンドポイント
//!
//! - `GET /internal/enrollments?user_id=` - エンロールメント（住所付き）
//! - `POST /internal/enrollments?user_id=` - エンロールメントと住所の登録・更新
//! - `GET /internal/enrollments/cep?cep=` - CEP による住所検索
//!
//! レスポンスにはユーザー ID・エンロールメント ID（住所側）・タイムスタンプを含めない。

use std::sync::Arc;

use axum::{
   Json,
   extract::{Query, State},
   http::StatusCode,
   response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use drivent_domain::{
   address::{Address, CepAddress},
   enrollment::EnrollmentWithAddress,
   user::UserId,
};
use drivent_shared::ApiResponse;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserQuery;
use crate::{
   error::CoreError,
   usecase::{AddressInput, EnrollmentUseCaseImpl, UpsertEnrollmentInput},
};

/// エンロールメント API の共有状態
pub struct EnrollmentState {
   pub usecase: EnrollmentUseCaseImpl,
}

// --- リクエスト/レスポンス型 ---

/// CEP クエリパラメータ
#[derive(Debug, Deserialize)]
pub struct CepQuery {
   pub cep: String,
}

/// 住所リクエスト
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRequest {
   pub cep:            String,
   pub street:         String,
   pub city:           String,
   pub number:         String,
   pub state:          String,
   pub neighborhood:   String,
   #[serde(default)]
   pub address_detail: Option<String>,
}

/// エンロールメント登録・更新リクエスト
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertEnrollmentRequest {
   pub name:     String,
   pub cpf:      String,
   pub birthday: String,
   pub phone:    String,
   pub address:  AddressRequest,
}

/// 住所 DTO
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressDto {
   pub id:             Uuid,
   pub cep:            String,
   pub street:         String,
   pub city:           String,
   pub state:          String,
   pub number:         String,
   pub neighborhood:   String,
   pub address_detail: Option<String>,
}

impl From<Address> for AddressDto {
   fn from(address: Address) -> Self {
      Self {
         id:             *address.id().as_uuid(),
         cep:            address.cep().to_string(),
         street:         address.street().to_string(),
         city:           address.city().to_string(),
         state:          address.state().as_str().to_string(),
         number:         address.number().to_string(),
         neighborhood:   address.neighborhood().to_string(),
         address_detail: address.address_detail().map(str::to_string),
      }
   }
}

/// エンロールメント DTO
///
/// 住所が未登録の場合は `address` キー自体を出力しない。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentDto {
   pub id:       Uuid,
   pub name:     String,
   pub cpf:      String,
   /// `YYYY-MM-DD`
   pub birthday: String,
   pub phone:    String,
   #[serde(skip_serializing_if = "Option::is_none")]
   pub address:  Option<AddressDto>,
}

impl From<EnrollmentWithAddress> for EnrollmentDto {
   fn from(value: EnrollmentWithAddress) -> Self {
      let enrollment = value.enrollment;
      Self {
         id:       *enrollment.id().as_uuid(),
         name:     enrollment.name().to_string(),
         cpf:      enrollment.cpf().as_str().to_string(),
         birthday: enrollment.birthday().as_date().to_string(),
         phone:    enrollment.phone().as_str().to_string(),
         address:  value.address.map(AddressDto::from),
      }
   }
}

/// CEP 検索結果 DTO（ViaCEP 互換のキー名）
#[derive(Debug, Serialize)]
pub struct CepAddressDto {
   pub logradouro:  String,
   pub complemento: String,
   pub bairro:      String,
   pub cidade:      String,
   pub uf:          String,
}

impl From<CepAddress> for CepAddressDto {
   fn from(address: CepAddress) -> Self {
      Self {
         logradouro:  address.street,
         complemento: address.complement,
         bairro:      address.neighborhood,
         cidade:      address.city,
         uf:          address.uf,
      }
   }
}

// --- ハンドラ ---

/// GET /internal/enrollments?user_id=
///
/// ## レスポンス
///
/// - `200 OK`: エンロールメント（住所付き）
/// - `400 Bad Request`: エンロールメント未登録
pub async fn get_enrollment(
   State(state): State<Arc<EnrollmentState>>,
   WithRejection(Query(query), _): WithRejection<Query<UserQuery>, CoreError>,
) -> Result<impl IntoResponse, CoreError> {
   let user_id = UserId::from_uuid(query.user_id);

   let enrollment = state
      .usecase
      .get_one_with_address_by_user_id(&user_id)
      .await?;

   Ok((
      StatusCode::OK,
      Json(ApiResponse::new(EnrollmentDto::from(enrollment))),
   ))
}

/// POST /internal/enrollments?user_id=
///
/// 同じユーザーで再度呼ぶと既存の登録を更新する。
///
/// ## レスポンス
///
/// - `200 OK`: 保存後のエンロールメント（住所付き）
/// - `400 Bad Request`: 入力不正、または存在しない CEP
pub async fn upsert_enrollment(
   State(state): State<Arc<EnrollmentState>>,
   WithRejection(Query(query), _): WithRejection<Query<UserQuery>, CoreError>,
   WithRejection(Json(req), _): WithRejection<Json<UpsertEnrollmentRequest>, CoreError>,
) -> Result<impl IntoResponse, CoreError> {
   let input = UpsertEnrollmentInput {
      user_id:  UserId::from_uuid(query.user_id),
      name:     req.name,
      cpf:      req.cpf,
      birthday: req.birthday,
      phone:    req.phone,
      address:  AddressInput {
         cep:            req.address.cep,
         street:         req.address.street,
         city:           req.address.city,
         number:         req.address.number,
         state:          req.address.state,
         neighborhood:   req.address.neighborhood,
         address_detail: req.address.address_detail,
      },
   };

   let saved = state
      .usecase
      .create_or_update_enrollment_with_address(input)
      .await?;

   Ok((StatusCode::OK, Json(ApiResponse::new(EnrollmentDto::from(saved)))))
}

/// GET /internal/enrollments/cep?cep=
///
/// ## レスポンス
///
/// - `200 OK`: 住所
/// - `400 Bad Request`: CEP の形式不正、または存在しない CEP
pub async fn get_address_from_cep(
   State(state): State<Arc<EnrollmentState>>,
   WithRejection(Query(query), _): WithRejection<Query<CepQuery>, CoreError>,
) -> Result<impl IntoResponse, CoreError> {
   let address = state.usecase.get_address_from_cep(&query.cep).await?;

   Ok((
      StatusCode::OK,
      Json(ApiResponse::new(CepAddressDto::from(address))),
   ))
}
