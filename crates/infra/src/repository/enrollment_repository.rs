//! # EnrollmentRepository
//!
//! エンロールメントの永続化を担当するリポジトリ。
//!
//! `enrollments.user_id` の UNIQUE 制約により 1 ユーザー 1 エンロールメント。
//! 保存は `ON CONFLICT (user_id) DO UPDATE` による upsert で、同じユーザーで
//! 再度呼ぶと行は増えずに更新される。

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use drivent_domain::{
   DomainError,
   enrollment::{
      Birthday,
      Cpf,
      Enrollment,
      EnrollmentId,
      EnrollmentName,
      EnrollmentRecord,
      EnrollmentWithAddress,
      Phone,
   },
   user::UserId,
};
use sqlx::PgPool;
use uuid::Uuid;

use super::address_repository::fetch_by_enrollment_id;
use crate::{db::TxContext, error::InfraError};

/// エンロールメントリポジトリトレイト
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
   async fn find_by_user_id(&self, user_id: &UserId) -> Result<Option<Enrollment>, InfraError>;

   /// ユーザーのエンロールメントを住所付きで取得する
   async fn find_with_address_by_user_id(
      &self,
      user_id: &UserId,
   ) -> Result<Option<EnrollmentWithAddress>, InfraError>;

   /// ユーザー ID をキーにエンロールメントを作成または更新する
   ///
   /// 既存行がある場合は ID と作成日時を維持し、保存後の行を返す。
   async fn upsert(
      &self,
      tx: &mut TxContext,
      enrollment: &Enrollment,
   ) -> Result<Enrollment, InfraError>;
}

#[derive(sqlx::FromRow)]
struct EnrollmentRow {
   id:         Uuid,
   user_id:    Uuid,
   name:       String,
   cpf:        String,
   birthday:   NaiveDate,
   phone:      String,
   created_at: DateTime<Utc>,
   updated_at: DateTime<Utc>,
}

impl TryFrom<EnrollmentRow> for Enrollment {
   type Error = InfraError;

   fn try_from(row: EnrollmentRow) -> Result<Self, Self::Error> {
      let invalid = |e: DomainError| InfraError::unexpected(e.to_string());

      Ok(Enrollment::from_db(EnrollmentRecord {
         id:         EnrollmentId::from_uuid(row.id),
         user_id:    UserId::from_uuid(row.user_id),
         name:       EnrollmentName::new(row.name).map_err(invalid)?,
         cpf:        Cpf::new(&row.cpf).map_err(invalid)?,
         birthday:   Birthday::from_db(row.birthday),
         phone:      Phone::new(row.phone).map_err(invalid)?,
         created_at: row.created_at,
         updated_at: row.updated_at,
      }))
   }
}

const SELECT_COLUMNS: &str = "id, user_id, name, cpf, birthday, phone, created_at, updated_at";

/// PostgreSQL 実装の EnrollmentRepository
#[derive(Debug, Clone)]
pub struct PostgresEnrollmentRepository {
   pool: PgPool,
}

impl PostgresEnrollmentRepository {
   pub fn new(pool: PgPool) -> Self {
      Self { pool }
   }
}

#[async_trait]
impl EnrollmentRepository for PostgresEnrollmentRepository {
   #[tracing::instrument(skip_all, level = "debug", fields(%user_id))]
   async fn find_by_user_id(&self, user_id: &UserId) -> Result<Option<Enrollment>, InfraError> {
      let sql = format!("SELECT {SELECT_COLUMNS} FROM enrollments WHERE user_id = $1");
      let row = sqlx::query_as::<_, EnrollmentRow>(&sql)
         .bind(user_id.as_uuid())
         .fetch_optional(&self.pool)
         .await?;

      row.map(Enrollment::try_from).transpose()
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%user_id))]
   async fn find_with_address_by_user_id(
      &self,
      user_id: &UserId,
   ) -> Result<Option<EnrollmentWithAddress>, InfraError> {
      let Some(enrollment) = self.find_by_user_id(user_id).await? else {
         return Ok(None);
      };
      let address = fetch_by_enrollment_id(&self.pool, enrollment.id()).await?;

      Ok(Some(EnrollmentWithAddress {
         enrollment,
         address,
      }))
   }

   #[tracing::instrument(skip_all, level = "debug", fields(user_id = %enrollment.user_id()))]
   async fn upsert(
      &self,
      tx: &mut TxContext,
      enrollment: &Enrollment,
   ) -> Result<Enrollment, InfraError> {
      let sql = format!(
         r#"
            INSERT INTO enrollments (
                id, user_id, name, cpf, birthday, phone, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_id) DO UPDATE SET
                name = EXCLUDED.name,
                cpf = EXCLUDED.cpf,
                birthday = EXCLUDED.birthday,
                phone = EXCLUDED.phone,
                updated_at = EXCLUDED.updated_at
            RETURNING {SELECT_COLUMNS}
            "#
      );
      let row = sqlx::query_as::<_, EnrollmentRow>(&sql)
         .bind(enrollment.id().as_uuid())
         .bind(enrollment.user_id().as_uuid())
         .bind(enrollment.name().as_str())
         .bind(enrollment.cpf().as_str())
         .bind(enrollment.birthday().as_date())
         .bind(enrollment.phone().as_str())
         .bind(enrollment.created_at())
         .bind(enrollment.updated_at())
         .fetch_one(tx.conn()?)
         .await?;

      Enrollment::try_from(row)
   }
}
