//! # TicketRepository
//!
//! チケット種別の参照とチケットの永続化を担当するリポジトリ。
//!
//! - チケットは必ずチケット種別と JOIN して [`TicketWithType`] で返す
//! - ユーザーからチケットへはエンロールメント経由で辿る

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use drivent_domain::{
   enrollment::EnrollmentId,
   ticket::{Ticket, TicketId, TicketRecord, TicketStatus, TicketType, TicketTypeId, TicketWithType},
   user::UserId,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{db::TxContext, error::InfraError};

/// チケットリポジトリトレイト
#[async_trait]
pub trait TicketRepository: Send + Sync {
   /// 全チケット種別を取得する（id 昇順）
   async fn find_all_types(&self) -> Result<Vec<TicketType>, InfraError>;

   async fn find_type_by_id(&self, id: &TicketTypeId) -> Result<Option<TicketType>, InfraError>;

   /// ユーザーのチケットを種別付きで取得する
   ///
   /// 複数ある場合は最も古いものを返す。
   async fn find_by_user_id(&self, user_id: &UserId)
   -> Result<Option<TicketWithType>, InfraError>;

   /// チケットを保存し、DB に格納された値（タイムスタンプはマイクロ秒精度）を返す
   async fn insert(&self, tx: &mut TxContext, ticket: &Ticket) -> Result<Ticket, InfraError>;
}

#[derive(sqlx::FromRow)]
struct TicketTypeRow {
   id:             Uuid,
   name:           String,
   price:          i32,
   is_remote:      bool,
   includes_hotel: bool,
   created_at:     DateTime<Utc>,
   updated_at:     DateTime<Utc>,
}

impl From<TicketTypeRow> for TicketType {
   fn from(row: TicketTypeRow) -> Self {
      TicketType {
         id:             TicketTypeId::from_uuid(row.id),
         name:           row.name,
         price:          row.price,
         is_remote:      row.is_remote,
         includes_hotel: row.includes_hotel,
         created_at:     row.created_at,
         updated_at:     row.updated_at,
      }
   }
}

#[derive(sqlx::FromRow)]
struct TicketRow {
   id:             Uuid,
   ticket_type_id: Uuid,
   enrollment_id:  Uuid,
   status:         String,
   created_at:     DateTime<Utc>,
   updated_at:     DateTime<Utc>,
}

impl TryFrom<TicketRow> for Ticket {
   type Error = InfraError;

   fn try_from(row: TicketRow) -> Result<Self, Self::Error> {
      let status =
         TicketStatus::parse(&row.status).map_err(|e| InfraError::unexpected(e.to_string()))?;

      Ok(Ticket::from_db(TicketRecord {
         id: TicketId::from_uuid(row.id),
         ticket_type_id: TicketTypeId::from_uuid(row.ticket_type_id),
         enrollment_id: EnrollmentId::from_uuid(row.enrollment_id),
         status,
         created_at: row.created_at,
         updated_at: row.updated_at,
      }))
   }
}

/// tickets と ticket_types を JOIN した行
#[derive(sqlx::FromRow)]
struct TicketWithTypeRow {
   id:              Uuid,
   ticket_type_id:  Uuid,
   enrollment_id:   Uuid,
   status:          String,
   created_at:      DateTime<Utc>,
   updated_at:      DateTime<Utc>,
   type_name:       String,
   price:           i32,
   is_remote:       bool,
   includes_hotel:  bool,
   type_created_at: DateTime<Utc>,
   type_updated_at: DateTime<Utc>,
}

impl TryFrom<TicketWithTypeRow> for TicketWithType {
   type Error = InfraError;

   fn try_from(row: TicketWithTypeRow) -> Result<Self, Self::Error> {
      let status =
         TicketStatus::parse(&row.status).map_err(|e| InfraError::unexpected(e.to_string()))?;

      Ok(TicketWithType {
         ticket:      Ticket::from_db(TicketRecord {
            id: TicketId::from_uuid(row.id),
            ticket_type_id: TicketTypeId::from_uuid(row.ticket_type_id),
            enrollment_id: EnrollmentId::from_uuid(row.enrollment_id),
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
         }),
         ticket_type: TicketType {
            id:             TicketTypeId::from_uuid(row.ticket_type_id),
            name:           row.type_name,
            price:          row.price,
            is_remote:      row.is_remote,
            includes_hotel: row.includes_hotel,
            created_at:     row.type_created_at,
            updated_at:     row.type_updated_at,
         },
      })
   }
}

/// PostgreSQL 実装の TicketRepository
#[derive(Debug, Clone)]
pub struct PostgresTicketRepository {
   pool: PgPool,
}

impl PostgresTicketRepository {
   pub fn new(pool: PgPool) -> Self {
      Self { pool }
   }
}

#[async_trait]
impl TicketRepository for PostgresTicketRepository {
   #[tracing::instrument(skip_all, level = "debug")]
   async fn find_all_types(&self) -> Result<Vec<TicketType>, InfraError> {
      let rows = sqlx::query_as::<_, TicketTypeRow>(
         r#"
            SELECT id, name, price, is_remote, includes_hotel, created_at, updated_at
            FROM ticket_types
            ORDER BY id
            "#,
      )
      .fetch_all(&self.pool)
      .await?;

      Ok(rows.into_iter().map(TicketType::from).collect())
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%id))]
   async fn find_type_by_id(&self, id: &TicketTypeId) -> Result<Option<TicketType>, InfraError> {
      let row = sqlx::query_as::<_, TicketTypeRow>(
         r#"
            SELECT id, name, price, is_remote, includes_hotel, created_at, updated_at
            FROM ticket_types
            WHERE id = $1
            "#,
      )
      .bind(id.as_uuid())
      .fetch_optional(&self.pool)
      .await?;

      Ok(row.map(TicketType::from))
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%user_id))]
   async fn find_by_user_id(
      &self,
      user_id: &UserId,
   ) -> Result<Option<TicketWithType>, InfraError> {
      let row = sqlx::query_as::<_, TicketWithTypeRow>(
         r#"
            SELECT
                t.id, t.ticket_type_id, t.enrollment_id, t.status,
                t.created_at, t.updated_at,
                tt.name AS type_name, tt.price, tt.is_remote, tt.includes_hotel,
                tt.created_at AS type_created_at, tt.updated_at AS type_updated_at
            FROM tickets t
            INNER JOIN enrollments e ON e.id = t.enrollment_id
            INNER JOIN ticket_types tt ON tt.id = t.ticket_type_id
            WHERE e.user_id = $1
            ORDER BY t.created_at ASC, t.id ASC
            LIMIT 1
            "#,
      )
      .bind(user_id.as_uuid())
      .fetch_optional(&self.pool)
      .await?;

      row.map(TicketWithType::try_from).transpose()
   }

   #[tracing::instrument(skip_all, level = "debug", fields(ticket_id = %ticket.id()))]
   async fn insert(&self, tx: &mut TxContext, ticket: &Ticket) -> Result<Ticket, InfraError> {
      let row = sqlx::query_as::<_, TicketRow>(
         r#"
            INSERT INTO tickets (
                id, ticket_type_id, enrollment_id, status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, ticket_type_id, enrollment_id, status, created_at, updated_at
            "#,
      )
      .bind(ticket.id().as_uuid())
      .bind(ticket.ticket_type_id().as_uuid())
      .bind(ticket.enrollment_id().as_uuid())
      .bind(ticket.status().as_str())
      .bind(ticket.created_at())
      .bind(ticket.updated_at())
      .fetch_one(tx.conn()?)
      .await?;

      Ticket::try_from(row)
   }
}
