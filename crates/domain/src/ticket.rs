//! # チケット
//!
//! チケット種別と、エンロールメントに紐づく購入チケットを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`TicketType`] | チケット種別 | 価格・オンライン参加可否・ホテル込みかを持つ |
//! | [`Ticket`] | チケット | エンロールメントとチケット種別を結ぶ購入記録 |
//! | [`TicketStatus`] | チケットステータス | `RESERVED`（予約）→ `PAID`（支払済み） |
//!
//! チケットは常にチケット種別と一緒に返す（[`TicketWithType`]）。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DomainError, enrollment::EnrollmentId};

define_uuid_id! {
   /// チケット種別 ID
   pub struct TicketTypeId;
}

define_uuid_id! {
   /// チケット ID
   pub struct TicketId;
}

/// チケットステータス
#[derive(
   Debug,
   Clone,
   Copy,
   PartialEq,
   Eq,
   Default,
   Serialize,
   Deserialize,
   strum::Display,
   strum::EnumString,
   strum::IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
   /// 予約済み（作成直後）
   #[default]
   Reserved,
   /// 支払済み
   Paid,
}

impl TicketStatus {
   pub fn as_str(&self) -> &'static str {
      self.into()
   }

   /// DB の文字列表現からステータスを復元する
   pub fn parse(value: &str) -> Result<Self, DomainError> {
      value
         .parse()
         .map_err(|_| DomainError::Validation(format!("不正なチケットステータス: {value}")))
   }
}

/// チケット種別
///
/// 管理者が事前に登録する参照データ。このサービスからは作成しない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketType {
   pub id:             TicketTypeId,
   pub name:           String,
   /// 価格（セント単位）
   pub price:          i32,
   pub is_remote:      bool,
   pub includes_hotel: bool,
   pub created_at:     DateTime<Utc>,
   pub updated_at:     DateTime<Utc>,
}

/// チケット DB 復元パラメータ
pub struct TicketRecord {
   pub id:             TicketId,
   pub ticket_type_id: TicketTypeId,
   pub enrollment_id:  EnrollmentId,
   pub status:         TicketStatus,
   pub created_at:     DateTime<Utc>,
   pub updated_at:     DateTime<Utc>,
}

/// チケットエンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
   id:             TicketId,
   ticket_type_id: TicketTypeId,
   enrollment_id:  EnrollmentId,
   status:         TicketStatus,
   created_at:     DateTime<Utc>,
   updated_at:     DateTime<Utc>,
}

impl Ticket {
   /// 予約状態のチケットを作成する
   pub fn reserve(
      id: TicketId,
      ticket_type_id: TicketTypeId,
      enrollment_id: EnrollmentId,
      now: DateTime<Utc>,
   ) -> Self {
      Self {
         id,
         ticket_type_id,
         enrollment_id,
         status: TicketStatus::Reserved,
         created_at: now,
         updated_at: now,
      }
   }

   pub fn from_db(record: TicketRecord) -> Self {
      Self {
         id:             record.id,
         ticket_type_id: record.ticket_type_id,
         enrollment_id:  record.enrollment_id,
         status:         record.status,
         created_at:     record.created_at,
         updated_at:     record.updated_at,
      }
   }

   pub fn id(&self) -> &TicketId {
      &self.id
   }

   pub fn ticket_type_id(&self) -> &TicketTypeId {
      &self.ticket_type_id
   }

   pub fn enrollment_id(&self) -> &EnrollmentId {
      &self.enrollment_id
   }

   pub fn status(&self) -> TicketStatus {
      self.status
   }

   pub fn created_at(&self) -> DateTime<Utc> {
      self.created_at
   }

   pub fn updated_at(&self) -> DateTime<Utc> {
      self.updated_at
   }
}

/// チケット種別付きチケット
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketWithType {
   pub ticket:      Ticket,
   pub ticket_type: TicketType,
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use rstest::rstest;

   use super::*;

   #[test]
   fn test_reserveは予約状態で作成する() {
      let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();

      let ticket = Ticket::reserve(TicketId::new(), TicketTypeId::new(), EnrollmentId::new(), now);

      assert_eq!(ticket.status(), TicketStatus::Reserved);
      assert_eq!(ticket.created_at(), now);
      assert_eq!(ticket.updated_at(), now);
   }

   #[test]
   fn test_ステータスのデフォルトは予約() {
      assert_eq!(TicketStatus::default(), TicketStatus::Reserved);
   }

   #[rstest]
   #[case(TicketStatus::Reserved, "RESERVED")]
   #[case(TicketStatus::Paid, "PAID")]
   fn test_ステータスの文字列表現(#[case] status: TicketStatus, #[case] expected: &str) {
      assert_eq!(status.as_str(), expected);
      assert_eq!(status.to_string(), expected);
      assert_eq!(serde_json::to_value(status).unwrap(), serde_json::json!(expected));
      assert_eq!(TicketStatus::parse(expected).unwrap(), status);
   }

   #[test]
   fn test_不正なステータスはバリデーションエラー() {
      assert!(matches!(
         TicketStatus::parse("CANCELLED"),
         Err(DomainError::Validation(_))
      ));
   }
}
