//! # AddressRepository
//!
//! エンロールメントに紐づく住所の永続化を担当するリポジトリ。
//! `addresses.enrollment_id` の UNIQUE 制約により 1 エンロールメント 1 住所。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use drivent_domain::{
   address::{
      Address,
      AddressId,
      AddressNumber,
      AddressRecord,
      Cep,
      City,
      Neighborhood,
      Street,
      Uf,
   },
   enrollment::EnrollmentId,
};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::{db::TxContext, error::InfraError};

/// 住所リポジトリトレイト
#[async_trait]
pub trait AddressRepository: Send + Sync {
   async fn find_by_enrollment_id(
      &self,
      enrollment_id: &EnrollmentId,
   ) -> Result<Option<Address>, InfraError>;

   /// エンロールメント ID をキーに住所を作成または更新する
   ///
   /// 既存行がある場合は ID と作成日時を維持し、保存後の行を返す。
   async fn upsert(&self, tx: &mut TxContext, address: &Address) -> Result<Address, InfraError>;
}

#[derive(sqlx::FromRow)]
pub(crate) struct AddressRow {
   id:             Uuid,
   enrollment_id:  Uuid,
   cep:            String,
   street:         String,
   city:           String,
   state:          String,
   number:         String,
   neighborhood:   String,
   address_detail: Option<String>,
   created_at:     DateTime<Utc>,
   updated_at:     DateTime<Utc>,
}

impl TryFrom<AddressRow> for Address {
   type Error = InfraError;

   fn try_from(row: AddressRow) -> Result<Self, Self::Error> {
      let invalid = |e: drivent_domain::DomainError| InfraError::unexpected(e.to_string());

      Ok(Address::from_db(AddressRecord {
         id:             AddressId::from_uuid(row.id),
         enrollment_id:  EnrollmentId::from_uuid(row.enrollment_id),
         cep:            Cep::new(&row.cep).map_err(invalid)?,
         street:         Street::new(row.street).map_err(invalid)?,
         city:           City::new(row.city).map_err(invalid)?,
         state:          Uf::parse(&row.state).map_err(invalid)?,
         number:         AddressNumber::new(row.number).map_err(invalid)?,
         neighborhood:   Neighborhood::new(row.neighborhood).map_err(invalid)?,
         address_detail: row.address_detail,
         created_at:     row.created_at,
         updated_at:     row.updated_at,
      }))
   }
}

/// enrollment_id で住所行を取得する
///
/// エンロールメントリポジトリの住所付き取得からも使う。
pub(crate) async fn fetch_by_enrollment_id<'e>(
   executor: impl PgExecutor<'e>,
   enrollment_id: &EnrollmentId,
) -> Result<Option<Address>, InfraError> {
   let row = sqlx::query_as::<_, AddressRow>(
      r#"
         SELECT
             id, enrollment_id, cep, street, city, state, number,
             neighborhood, address_detail, created_at, updated_at
         FROM addresses
         WHERE enrollment_id = $1
         "#,
   )
   .bind(enrollment_id.as_uuid())
   .fetch_optional(executor)
   .await?;

   row.map(Address::try_from).transpose()
}

/// PostgreSQL 実装の AddressRepository
#[derive(Debug, Clone)]
pub struct PostgresAddressRepository {
   pool: PgPool,
}

impl PostgresAddressRepository {
   pub fn new(pool: PgPool) -> Self {
      Self { pool }
   }
}

#[async_trait]
impl AddressRepository for PostgresAddressRepository {
   #[tracing::instrument(skip_all, level = "debug", fields(%enrollment_id))]
   async fn find_by_enrollment_id(
      &self,
      enrollment_id: &EnrollmentId,
   ) -> Result<Option<Address>, InfraError> {
      fetch_by_enrollment_id(&self.pool, enrollment_id).await
   }

   #[tracing::instrument(skip_all, level = "debug", fields(enrollment_id = %address.enrollment_id()))]
   async fn upsert(&self, tx: &mut TxContext, address: &Address) -> Result<Address, InfraError> {
      let row = sqlx::query_as::<_, AddressRow>(
         r#"
            INSERT INTO addresses (
                id, enrollment_id, cep, street, city, state, number,
                neighborhood, address_detail, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (enrollment_id) DO UPDATE SET
                cep = EXCLUDED.cep,
                street = EXCLUDED.street,
                city = EXCLUDED.city,
                state = EXCLUDED.state,
                number = EXCLUDED.number,
                neighborhood = EXCLUDED.neighborhood,
                address_detail = EXCLUDED.address_detail,
                updated_at = EXCLUDED.updated_at
            RETURNING
                id, enrollment_id, cep, street, city, state, number,
                neighborhood, address_detail, created_at, updated_at
            "#,
      )
      .bind(address.id().as_uuid())
      .bind(address.enrollment_id().as_uuid())
      .bind(address.cep().as_str())
      .bind(address.street().as_str())
      .bind(address.city().as_str())
      .bind(address.state().as_str())
      .bind(address.number().as_str())
      .bind(address.neighborhood().as_str())
      .bind(address.address_detail())
      .bind(address.created_at())
      .bind(address.updated_at())
      .fetch_one(tx.conn()?)
      .await?;

      Address::try_from(row)
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_トレイトはsendとsyncを実装している() {
      fn assert_send_sync<T: Send + Sync>() {}
      assert_send_sync::<Box<dyn AddressRepository>>();
   }

   #[test]
   fn test_不正なufの行はunexpectedエラー() {
      let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
      let row = AddressRow {
         id:             Uuid::now_v7(),
         enrollment_id:  Uuid::now_v7(),
         cep:            "01001000".to_string(),
         street:         "Praça da Sé".to_string(),
         city:           "São Paulo".to_string(),
         state:          "XX".to_string(),
         number:         "100".to_string(),
         neighborhood:   "Sé".to_string(),
         address_detail: None,
         created_at:     now,
         updated_at:     now,
      };

      let result = Address::try_from(row);

      assert!(matches!(
         result.map_err(|e| e.into_parts().0),
         Err(crate::error::InfraErrorKind::Unexpected(_))
      ));
   }
}
