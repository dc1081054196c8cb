//! テスト共通フィクスチャ
//!
//! DB を使う統合テストで共通利用するエンティティ生成ヘルパーとシード投入。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使わない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, Utc};
use drivent_domain::{
   address::{
      Address,
      AddressFields,
      AddressId,
      AddressNumber,
      Cep,
      City,
      Neighborhood,
      Street,
      Uf,
   },
   enrollment::{Birthday, Cpf, Enrollment, EnrollmentFields, EnrollmentId, EnrollmentName, Phone},
   ticket::{TicketType, TicketTypeId},
   user::UserId,
};
use sqlx::PgPool;

/// テスト用の固定日時
pub fn test_now() -> DateTime<Utc> {
   DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

/// test_now より後の日時
pub fn test_later() -> DateTime<Utc> {
   DateTime::from_timestamp(1_700_003_600, 0).unwrap()
}

pub fn enrollment_fields(name: &str) -> EnrollmentFields {
   EnrollmentFields {
      name:     EnrollmentName::new(name).unwrap(),
      cpf:      Cpf::new("52998224725").unwrap(),
      birthday: Birthday::new(
         NaiveDate::from_ymd_opt(1990, 5, 20).unwrap(),
         test_now().date_naive(),
      )
      .unwrap(),
      phone:    Phone::new("(21) 98999-9999").unwrap(),
   }
}

/// 新規エンロールメントを作成（未保存）
pub fn create_test_enrollment(user_id: &UserId, name: &str) -> Enrollment {
   Enrollment::new(
      EnrollmentId::new(),
      user_id.clone(),
      enrollment_fields(name),
      test_now(),
   )
}

pub fn address_fields(street: &str) -> AddressFields {
   AddressFields {
      cep:            Cep::new("01001000").unwrap(),
      street:         Street::new(street).unwrap(),
      city:           City::new("São Paulo").unwrap(),
      state:          Uf::Sp,
      number:         AddressNumber::new("100").unwrap(),
      neighborhood:   Neighborhood::new("Sé").unwrap(),
      address_detail: Some("apto 12".to_string()),
   }
}

/// 新規住所を作成（未保存）
pub fn create_test_address(enrollment_id: &EnrollmentId, street: &str) -> Address {
   Address::new(
      AddressId::new(),
      enrollment_id.clone(),
      address_fields(street),
      test_now(),
   )
}

/// チケット種別を投入する
///
/// チケット種別は管理データのためリポジトリに書き込みメソッドがない。SQL で直接入れる。
pub async fn seed_ticket_type(pool: &PgPool, name: &str, price: i32) -> TicketType {
   let ticket_type = TicketType {
      id: TicketTypeId::new(),
      name: name.to_string(),
      price,
      is_remote: false,
      includes_hotel: true,
      created_at: test_now(),
      updated_at: test_now(),
   };

   sqlx::query(
      r#"
         INSERT INTO ticket_types (
             id, name, price, is_remote, includes_hotel, created_at, updated_at
         )
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         "#,
   )
   .bind(ticket_type.id.as_uuid())
   .bind(&ticket_type.name)
   .bind(ticket_type.price)
   .bind(ticket_type.is_remote)
   .bind(ticket_type.includes_hotel)
   .bind(ticket_type.created_at)
   .bind(ticket_type.updated_at)
   .execute(pool)
   .await
   .unwrap();

   ticket_type
}

pub async fn count_rows(pool: &PgPool, table: &str) -> i64 {
   let sql = format!("SELECT COUNT(*) FROM {table}");
   let row: (i64,) = sqlx::query_as(&sql).fetch_one(pool).await.unwrap();
   row.0
}
