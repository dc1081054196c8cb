//! # 住所
//!
//! エンロールメントに紐づく住所と、その入力に使う値オブジェクトを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`Cep`] | CEP | ブラジルの郵便番号（8 桁）。ViaCEP で住所を引ける |
//! | [`Uf`] | UF | ブラジルの連邦構成単位（州）の 2 文字コード |
//! | [`Address`] | 住所 | エンロールメント 1 件につき最大 1 件 |
//! | [`CepAddress`] | CEP 検索結果 | 外部サービスが返す住所の文字列表現 |
//!
//! ## 使用例
//!
//! ```rust
//! use drivent_domain::address::{Cep, Uf};
//!
//! let cep = Cep::new("01001-000").unwrap();
//! assert_eq!(cep.to_string(), "01001-000");
//!
//! let uf: Uf = "SP".parse().unwrap();
//! assert_eq!(uf, Uf::Sp);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

use crate::{DomainError, enrollment::EnrollmentId};

define_uuid_id! {
   /// 住所 ID
   pub struct AddressId;
}

// =========================================================================
// Cep（郵便番号）
// =========================================================================

/// CEP（ブラジルの郵便番号）
///
/// # 不変条件
///
/// - 数字 8 桁で保持する（`01001000`）
///
/// 入力は `01001000` と `01001-000` の両方を受け付ける。
/// 表示（`Display`）は `01001-000` 形式。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cep(String);

impl Cep {
   /// CEP の桁数
   pub const LENGTH: usize = 8;

   pub fn new(value: impl AsRef<str>) -> Result<Self, DomainError> {
      let raw = value.as_ref().trim();

      let digits: String = match raw.split_once('-') {
         Some((head, tail)) if head.len() == 5 && tail.len() == 3 => format!("{head}{tail}"),
         Some(_) => {
            return Err(DomainError::Validation(format!(
               "CEP の形式が不正です: {raw}"
            )));
         }
         None => raw.to_string(),
      };

      if digits.len() != Self::LENGTH || !digits.chars().all(|c| c.is_ascii_digit()) {
         return Err(DomainError::Validation(format!(
            "CEP は 8 桁の数字である必要があります: {raw}"
         )));
      }

      Ok(Self(digits))
   }

   /// 8 桁の数字（ハイフンなし）
   pub fn as_str(&self) -> &str {
      &self.0
   }
}

impl std::fmt::Display for Cep {
   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      write!(f, "{}-{}", &self.0[..5], &self.0[5..])
   }
}

// =========================================================================
// Uf（州コード）
// =========================================================================

/// 連邦構成単位（州）コード
#[derive(
   Debug,
   Clone,
   Copy,
   PartialEq,
   Eq,
   Hash,
   Serialize,
   Deserialize,
   IntoStaticStr,
   strum::Display,
   strum::EnumString,
   strum::EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Uf {
   Ac,
   Al,
   Ap,
   Am,
   Ba,
   Ce,
   Df,
   Es,
   Go,
   Ma,
   Mt,
   Ms,
   Mg,
   Pa,
   Pb,
   Pr,
   Pe,
   Pi,
   Rj,
   Rn,
   Rs,
   Ro,
   Rr,
   Sc,
   Sp,
   Se,
   To,
}

impl Uf {
   /// 文字列から UF をパースする（前後の空白と大文字小文字は無視）
   pub fn parse(value: &str) -> Result<Self, DomainError> {
      value
         .trim()
         .to_ascii_uppercase()
         .parse()
         .map_err(|_| DomainError::Validation(format!("不正な州コードです: {value}")))
   }

   pub fn as_str(&self) -> &'static str {
      self.into()
   }
}

// =========================================================================
// 住所の各項目
// =========================================================================

define_validated_string! {
   /// 通り名（logradouro）
   pub struct Street {
      label: "通り名",
      min_length: 1,
      max_length: 255,
   }
}

define_validated_string! {
   /// 市（cidade）
   pub struct City {
      label: "市",
      min_length: 1,
      max_length: 255,
   }
}

define_validated_string! {
   /// 番地
   pub struct AddressNumber {
      label: "番地",
      min_length: 1,
      max_length: 32,
   }
}

define_validated_string! {
   /// 地区（bairro）
   pub struct Neighborhood {
      label: "地区",
      min_length: 1,
      max_length: 255,
   }
}

/// 補足情報（complemento）を正規化する
///
/// 空白のみの値は未入力として扱う。
pub fn normalize_address_detail(value: Option<String>) -> Result<Option<String>, DomainError> {
   let Some(value) = value else {
      return Ok(None);
   };
   let value = value.trim().to_string();
   if value.is_empty() {
      return Ok(None);
   }
   if value.chars().count() > 255 {
      return Err(DomainError::Validation(
         "補足情報は 255 文字以内である必要があります".to_string(),
      ));
   }
   Ok(Some(value))
}

// =========================================================================
// Address（住所エンティティ）
// =========================================================================

/// 住所エンティティ
///
/// # 不変条件
///
/// - エンロールメント 1 件につき最大 1 件（`addresses.enrollment_id` は UNIQUE）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
   id:             AddressId,
   enrollment_id:  EnrollmentId,
   cep:            Cep,
   street:         Street,
   city:           City,
   state:          Uf,
   number:         AddressNumber,
   neighborhood:   Neighborhood,
   address_detail: Option<String>,
   created_at:     DateTime<Utc>,
   updated_at:     DateTime<Utc>,
}

/// 住所の入力値（検証済み）
///
/// エンロールメント ID が確定する前に組み立てるため、エンティティとは分けて持つ。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressFields {
   pub cep:            Cep,
   pub street:         Street,
   pub city:           City,
   pub state:          Uf,
   pub number:         AddressNumber,
   pub neighborhood:   Neighborhood,
   pub address_detail: Option<String>,
}

/// 住所の DB 復元パラメータ
pub struct AddressRecord {
   pub id:             AddressId,
   pub enrollment_id:  EnrollmentId,
   pub cep:            Cep,
   pub street:         Street,
   pub city:           City,
   pub state:          Uf,
   pub number:         AddressNumber,
   pub neighborhood:   Neighborhood,
   pub address_detail: Option<String>,
   pub created_at:     DateTime<Utc>,
   pub updated_at:     DateTime<Utc>,
}

impl Address {
   /// 新しい住所を作成する
   pub fn new(
      id: AddressId,
      enrollment_id: EnrollmentId,
      fields: AddressFields,
      now: DateTime<Utc>,
   ) -> Self {
      Self {
         id,
         enrollment_id,
         cep: fields.cep,
         street: fields.street,
         city: fields.city,
         state: fields.state,
         number: fields.number,
         neighborhood: fields.neighborhood,
         address_detail: fields.address_detail,
         created_at: now,
         updated_at: now,
      }
   }

   /// DB から住所を復元する
   pub fn from_db(record: AddressRecord) -> Self {
      Self {
         id:             record.id,
         enrollment_id:  record.enrollment_id,
         cep:            record.cep,
         street:         record.street,
         city:           record.city,
         state:          record.state,
         number:         record.number,
         neighborhood:   record.neighborhood,
         address_detail: record.address_detail,
         created_at:     record.created_at,
         updated_at:     record.updated_at,
      }
   }

   /// 入力値で更新した住所を返す（ID と作成日時は維持）
   pub fn updated(self, fields: AddressFields, now: DateTime<Utc>) -> Self {
      Self {
         cep: fields.cep,
         street: fields.street,
         city: fields.city,
         state: fields.state,
         number: fields.number,
         neighborhood: fields.neighborhood,
         address_detail: fields.address_detail,
         updated_at: now,
         ..self
      }
   }

   pub fn id(&self) -> &AddressId {
      &self.id
   }

   pub fn enrollment_id(&self) -> &EnrollmentId {
      &self.enrollment_id
   }

   pub fn cep(&self) -> &Cep {
      &self.cep
   }

   pub fn street(&self) -> &Street {
      &self.street
   }

   pub fn city(&self) -> &City {
      &self.city
   }

   pub fn state(&self) -> Uf {
      self.state
   }

   pub fn number(&self) -> &AddressNumber {
      &self.number
   }

   pub fn neighborhood(&self) -> &Neighborhood {
      &self.neighborhood
   }

   pub fn address_detail(&self) -> Option<&str> {
      self.address_detail.as_deref()
   }

   pub fn created_at(&self) -> DateTime<Utc> {
      self.created_at
   }

   pub fn updated_at(&self) -> DateTime<Utc> {
      self.updated_at
   }
}

// =========================================================================
// CepAddress（CEP 検索結果）
// =========================================================================

/// CEP 検索で得られる住所
///
/// 外部サービスの値をそのまま保持する（空文字列もあり得る）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CepAddress {
   /// 通り名（logradouro）
   pub street:       String,
   /// 補足（complemento）
   pub complement:   String,
   /// 地区（bairro）
   pub neighborhood: String,
   /// 市（localidade）
   pub city:         String,
   /// 州コード（uf）
   pub uf:           String,
}
