//! # エンロールメント（参加登録）
//!
//! ユーザーのイベント参加登録を表現する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`Enrollment`] | エンロールメント | ユーザー 1 人につき 1 件の参加登録 |
//! | [`Cpf`] | CPF | ブラジルの個人納税者番号（11 桁、末尾 2 桁はチェックディジット） |
//! | [`Phone`] | 電話番号 | `(99) 99999-9999` または `(99) 9999-9999` |
//! | [`Birthday`] | 誕生日 | 未来日は不可 |
//!
//! ## 設計方針
//!
//! - **1 ユーザー 1 件**: `enrollments.user_id` の UNIQUE 制約で保証し、
//!   保存は user_id をキーにした upsert で行う
//! - **検証済み入力**: [`EnrollmentFields`] は全項目が値オブジェクトで、
//!   組み立てられた時点で検証が終わっている

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{DomainError, address::Address, user::UserId};

define_uuid_id! {
   /// エンロールメント ID
   pub struct EnrollmentId;
}

define_validated_string! {
   /// 参加者の氏名
   pub struct EnrollmentName {
      label: "氏名",
      min_length: 3,
      max_length: 255,
   }
}

// =========================================================================
// Cpf
// =========================================================================

/// CPF（個人納税者番号）
///
/// # 不変条件
///
/// - 数字 11 桁で保持する（区切り文字 `.` `-` は除去）
/// - 全桁同一の番号（`111.111.111-11` など）は無効
/// - 2 つのチェックディジットが一致する
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cpf(String);

impl Cpf {
   pub fn new(value: impl AsRef<str>) -> Result<Self, DomainError> {
      let raw = value.as_ref().trim();
      let digits: String = raw.chars().filter(|c| !matches!(c, '.' | '-')).collect();

      if digits.len() != 11 || !digits.chars().all(|c| c.is_ascii_digit()) {
         return Err(DomainError::Validation(
            "CPF は 11 桁の数字である必要があります".to_string(),
         ));
      }

      let numbers: Vec<u32> = digits.chars().filter_map(|c| c.to_digit(10)).collect();

      if numbers.iter().all(|n| *n == numbers[0]) {
         return Err(DomainError::Validation("CPF が不正です".to_string()));
      }

      if check_digit(&numbers[..9]) != numbers[9] || check_digit(&numbers[..10]) != numbers[10]
      {
         return Err(DomainError::Validation("CPF が不正です".to_string()));
      }

      Ok(Self(digits))
   }

   /// 11 桁の数字（区切りなし）
   pub fn as_str(&self) -> &str {
      &self.0
   }
}

/// 先頭 n 桁からチェックディジットを計算する（重みは n+1 から 2 まで降順）
fn check_digit(numbers: &[u32]) -> u32 {
   let weight_start = numbers.len() as u32 + 1;
   let sum: u32 = numbers
      .iter()
      .enumerate()
      .map(|(i, n)| n * (weight_start - i as u32))
      .sum();
   (sum * 10) % 11 % 10
}

// =========================================================================
// Phone
// =========================================================================

static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
   #[allow(clippy::unwrap_used)]
   Regex::new(r"^\(\d{2}\) \d{4,5}-\d{4}$").unwrap()
});

/// 電話番号
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
   pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
      let value = value.into().trim().to_string();
      if !PHONE_PATTERN.is_match(&value) {
         return Err(DomainError::Validation(format!(
            "電話番号の形式が不正です（例: (21) 98999-9999）: {value}"
         )));
      }
      Ok(Self(value))
   }

   pub fn as_str(&self) -> &str {
      &self.0
   }
}

// =========================================================================
// Birthday
// =========================================================================

/// 誕生日
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Birthday(NaiveDate);

impl Birthday {
   /// 日付から誕生日を作成する
   ///
   /// `today` より後の日付は拒否する。
   pub fn new(date: NaiveDate, today: NaiveDate) -> Result<Self, DomainError> {
      if date > today {
         return Err(DomainError::Validation(
            "誕生日に未来の日付は指定できません".to_string(),
         ));
      }
      Ok(Self(date))
   }

   /// 文字列から誕生日をパースする
   ///
   /// `YYYY-MM-DD` と RFC 3339 タイムスタンプ（日付部分を使用）を受け付ける。
   pub fn parse(value: &str, today: NaiveDate) -> Result<Self, DomainError> {
      let value = value.trim();
      let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
         .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive()))
         .map_err(|_| {
            DomainError::Validation(format!("誕生日の形式が不正です: {value}"))
         })?;
      Self::new(date, today)
   }

   /// DB から復元する（検証なし）
   pub fn from_db(date: NaiveDate) -> Self {
      Self(date)
   }

   pub fn as_date(&self) -> NaiveDate {
      self.0
   }
}

// =========================================================================
// Enrollment（エンロールメントエンティティ）
// =========================================================================

/// エンロールメントの入力値（検証済み）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentFields {
   pub name:     EnrollmentName,
   pub cpf:      Cpf,
   pub birthday: Birthday,
   pub phone:    Phone,
}

/// エンロールメントの DB 復元パラメータ
pub struct EnrollmentRecord {
   pub id:         EnrollmentId,
   pub user_id:    UserId,
   pub name:       EnrollmentName,
   pub cpf:        Cpf,
   pub birthday:   Birthday,
   pub phone:      Phone,
   pub created_at: DateTime<Utc>,
   pub updated_at: DateTime<Utc>,
}

/// エンロールメントエンティティ
///
/// # 不変条件
///
/// - ユーザー 1 人につき 1 件（`user_id` は UNIQUE）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrollment {
   id:         EnrollmentId,
   user_id:    UserId,
   name:       EnrollmentName,
   cpf:        Cpf,
   birthday:   Birthday,
   phone:      Phone,
   created_at: DateTime<Utc>,
   updated_at: DateTime<Utc>,
}

impl Enrollment {
   /// 新しいエンロールメントを作成する
   pub fn new(
      id: EnrollmentId,
      user_id: UserId,
      fields: EnrollmentFields,
      now: DateTime<Utc>,
   ) -> Self {
      Self {
         id,
         user_id,
         name: fields.name,
         cpf: fields.cpf,
         birthday: fields.birthday,
         phone: fields.phone,
         created_at: now,
         updated_at: now,
      }
   }

   /// DB からエンロールメントを復元する
   pub fn from_db(record: EnrollmentRecord) -> Self {
      Self {
         id:         record.id,
         user_id:    record.user_id,
         name:       record.name,
         cpf:        record.cpf,
         birthday:   record.birthday,
         phone:      record.phone,
         created_at: record.created_at,
         updated_at: record.updated_at,
      }
   }

   /// 入力値で更新したエンロールメントを返す（ID・ユーザー・作成日時は維持）
   pub fn updated(self, fields: EnrollmentFields, now: DateTime<Utc>) -> Self {
      Self {
         name: fields.name,
         cpf: fields.cpf,
         birthday: fields.birthday,
         phone: fields.phone,
         updated_at: now,
         ..self
      }
   }

   pub fn id(&self) -> &EnrollmentId {
      &self.id
   }

   pub fn user_id(&self) -> &UserId {
      &self.user_id
   }

   pub fn name(&self) -> &EnrollmentName {
      &self.name
   }

   pub fn cpf(&self) -> &Cpf {
      &self.cpf
   }

   pub fn birthday(&self) -> Birthday {
      self.birthday
   }

   pub fn phone(&self) -> &Phone {
      &self.phone
   }

   pub fn created_at(&self) -> DateTime<Utc> {
      self.created_at
   }

   pub fn updated_at(&self) -> DateTime<Utc> {
      self.updated_at
   }
}

/// 住所付きエンロールメント
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentWithAddress {
   pub enrollment: Enrollment,
   pub address:    Option<Address>,
}
