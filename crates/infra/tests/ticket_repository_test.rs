//! TicketRepository 統合テスト
//!
//! 実行方法:
//! ```bash
//! cargo test -p drivent-infra --test ticket_repository_test
//! ```

mod common;

use chrono::DateTime;
use common::{create_test_enrollment, seed_ticket_type, test_now};
use drivent_domain::{
   ticket::{Ticket, TicketId, TicketStatus, TicketTypeId},
   user::UserId,
};
use drivent_infra::{
   db::{PgTransactionManager, TransactionManager},
   repository::{
      EnrollmentRepository,
      PostgresEnrollmentRepository,
      PostgresTicketRepository,
      TicketRepository,
   },
};
use pretty_assertions::assert_eq;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../migrations")]
async fn test_find_all_typesは登録済みの種別をすべて返す(pool: PgPool) {
   let sut = PostgresTicketRepository::new(pool.clone());
   let mut expected = vec![
      seed_ticket_type(&pool, "Presencial", 25000).await,
      seed_ticket_type(&pool, "Online", 10000).await,
   ];
   expected.sort_by(|a, b| a.id.as_uuid().cmp(b.id.as_uuid()));

   let result = sut.find_all_types().await.unwrap();

   assert_eq!(result, expected);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_find_all_typesは種別がなければ空(pool: PgPool) {
   let sut = PostgresTicketRepository::new(pool);

   assert!(sut.find_all_types().await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_find_type_by_idは存在しないidでnone(pool: PgPool) {
   let sut = PostgresTicketRepository::new(pool.clone());
   seed_ticket_type(&pool, "Presencial", 25000).await;

   assert_eq!(sut.find_type_by_id(&TicketTypeId::new()).await.unwrap(), None);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_insertしたチケットをユーザーidから種別付きで取得できる(pool: PgPool) {
   let tx_manager = PgTransactionManager::new(pool.clone());
   let enrollment_repo = PostgresEnrollmentRepository::new(pool.clone());
   let sut = PostgresTicketRepository::new(pool.clone());
   let user_id = UserId::new();
   let ticket_type = seed_ticket_type(&pool, "Presencial", 25000).await;

   let mut tx = tx_manager.begin().await.unwrap();
   let enrollment = enrollment_repo
      .upsert(&mut tx, &create_test_enrollment(&user_id, "Maria Souza"))
      .await
      .unwrap();
   let ticket = Ticket::reserve(
      TicketId::new(),
      ticket_type.id.clone(),
      enrollment.id().clone(),
      test_now(),
   );
   let inserted = sut.insert(&mut tx, &ticket).await.unwrap();
   tx.commit().await.unwrap();

   let found = sut.find_by_user_id(&user_id).await.unwrap().unwrap();

   assert_eq!(found.ticket, inserted);
   assert_eq!(inserted.id(), ticket.id());
   assert_eq!(found.ticket.status(), TicketStatus::Reserved);
   assert_eq!(found.ticket_type, ticket_type);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_insertはマイクロ秒に丸めて保存した値を返す(pool: PgPool) {
   let tx_manager = PgTransactionManager::new(pool.clone());
   let enrollment_repo = PostgresEnrollmentRepository::new(pool.clone());
   let sut = PostgresTicketRepository::new(pool.clone());
   let user_id = UserId::new();
   let ticket_type = seed_ticket_type(&pool, "Presencial", 25000).await;
   let now = DateTime::from_timestamp(1_700_000_000, 123_456_789).unwrap();

   let mut tx = tx_manager.begin().await.unwrap();
   let enrollment = enrollment_repo
      .upsert(&mut tx, &create_test_enrollment(&user_id, "Maria Souza"))
      .await
      .unwrap();
   let ticket = Ticket::reserve(TicketId::new(), ticket_type.id.clone(), enrollment.id().clone(), now);
   let inserted = sut.insert(&mut tx, &ticket).await.unwrap();
   tx.commit().await.unwrap();

   let expected = DateTime::from_timestamp(1_700_000_000, 123_456_000).unwrap();
   assert_eq!(inserted.created_at(), expected);
   assert_eq!(inserted.updated_at(), expected);
   let found = sut.find_by_user_id(&user_id).await.unwrap().unwrap();
   assert_eq!(found.ticket, inserted);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_チケットのないユーザーはnone(pool: PgPool) {
   let tx_manager = PgTransactionManager::new(pool.clone());
   let enrollment_repo = PostgresEnrollmentRepository::new(pool.clone());
   let sut = PostgresTicketRepository::new(pool.clone());
   let user_id = UserId::new();

   let mut tx = tx_manager.begin().await.unwrap();
   enrollment_repo
      .upsert(&mut tx, &create_test_enrollment(&user_id, "Maria Souza"))
      .await
      .unwrap();
   tx.commit().await.unwrap();

   assert_eq!(sut.find_by_user_id(&user_id).await.unwrap(), None);
}
