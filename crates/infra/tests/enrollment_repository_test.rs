//! EnrollmentRepository / AddressRepository 統合テスト
//!
//! sqlx::test がテストごとに使い捨てのデータベースを作り、マイグレーションを適用する。
//!
//! 実行方法:
//! ```bash
//! cargo test -p drivent-infra --test enrollment_repository_test
//! ```

mod common;

use common::{
   count_rows,
   create_test_address,
   create_test_enrollment,
   enrollment_fields,
   address_fields,
   test_later,
};
use drivent_domain::{
   address::{Address, AddressId},
   enrollment::{Enrollment, EnrollmentId},
   user::UserId,
};
use drivent_infra::{
   db::{PgTransactionManager, TransactionManager},
   repository::{
      AddressRepository,
      EnrollmentRepository,
      PostgresAddressRepository,
      PostgresEnrollmentRepository,
   },
};
use pretty_assertions::assert_eq;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../migrations")]
async fn test_upsertで新規エンロールメントを作成できる(pool: PgPool) {
   let tx_manager = PgTransactionManager::new(pool.clone());
   let sut = PostgresEnrollmentRepository::new(pool.clone());
   let user_id = UserId::new();
   let enrollment = create_test_enrollment(&user_id, "Maria Souza");

   let mut tx = tx_manager.begin().await.unwrap();
   let stored = sut.upsert(&mut tx, &enrollment).await.unwrap();
   tx.commit().await.unwrap();

   assert_eq!(stored, enrollment);
   let found = sut.find_by_user_id(&user_id).await.unwrap();
   assert_eq!(found, Some(enrollment));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_同じユーザーで再度upsertすると行を増やさず更新する(pool: PgPool) {
   let tx_manager = PgTransactionManager::new(pool.clone());
   let sut = PostgresEnrollmentRepository::new(pool.clone());
   let user_id = UserId::new();
   let first = create_test_enrollment(&user_id, "Maria Souza");

   let mut tx = tx_manager.begin().await.unwrap();
   sut.upsert(&mut tx, &first).await.unwrap();
   tx.commit().await.unwrap();

   // 別 ID で組み立てた 2 回目の入力でも user_id で衝突して既存行が更新される
   let second = Enrollment::new(
      EnrollmentId::new(),
      user_id.clone(),
      enrollment_fields("Maria Oliveira"),
      test_later(),
   );
   let mut tx = tx_manager.begin().await.unwrap();
   let stored = sut.upsert(&mut tx, &second).await.unwrap();
   tx.commit().await.unwrap();

   assert_eq!(count_rows(&pool, "enrollments").await, 1);
   assert_eq!(stored.id(), first.id());
   assert_eq!(stored.name().as_str(), "Maria Oliveira");
   assert_eq!(stored.created_at(), first.created_at());
   assert_eq!(stored.updated_at(), test_later());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_コミットしないupsertはロールバックされる(pool: PgPool) {
   let tx_manager = PgTransactionManager::new(pool.clone());
   let sut = PostgresEnrollmentRepository::new(pool.clone());
   let user_id = UserId::new();

   {
      let mut tx = tx_manager.begin().await.unwrap();
      sut.upsert(&mut tx, &create_test_enrollment(&user_id, "Maria Souza"))
         .await
         .unwrap();
   }

   assert_eq!(sut.find_by_user_id(&user_id).await.unwrap(), None);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_find_with_address_by_user_idは住所付きで返す(pool: PgPool) {
   let tx_manager = PgTransactionManager::new(pool.clone());
   let enrollment_repo = PostgresEnrollmentRepository::new(pool.clone());
   let address_repo = PostgresAddressRepository::new(pool.clone());
   let user_id = UserId::new();

   let mut tx = tx_manager.begin().await.unwrap();
   let enrollment = enrollment_repo
      .upsert(&mut tx, &create_test_enrollment(&user_id, "Maria Souza"))
      .await
      .unwrap();
   let address = address_repo
      .upsert(&mut tx, &create_test_address(enrollment.id(), "Praça da Sé"))
      .await
      .unwrap();
   tx.commit().await.unwrap();

   let found = enrollment_repo
      .find_with_address_by_user_id(&user_id)
      .await
      .unwrap()
      .unwrap();

   assert_eq!(found.enrollment, enrollment);
   assert_eq!(found.address, Some(address));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_住所がなければaddressはnone(pool: PgPool) {
   let tx_manager = PgTransactionManager::new(pool.clone());
   let sut = PostgresEnrollmentRepository::new(pool.clone());
   let user_id = UserId::new();

   let mut tx = tx_manager.begin().await.unwrap();
   sut.upsert(&mut tx, &create_test_enrollment(&user_id, "Maria Souza"))
      .await
      .unwrap();
   tx.commit().await.unwrap();

   let found = sut.find_with_address_by_user_id(&user_id).await.unwrap().unwrap();

   assert_eq!(found.address, None);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_エンロールメントがなければnone(pool: PgPool) {
   let sut = PostgresEnrollmentRepository::new(pool);

   let found = sut.find_with_address_by_user_id(&UserId::new()).await.unwrap();

   assert!(found.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_住所のupsertはenrollment_idで既存行を更新する(pool: PgPool) {
   let tx_manager = PgTransactionManager::new(pool.clone());
   let enrollment_repo = PostgresEnrollmentRepository::new(pool.clone());
   let sut = PostgresAddressRepository::new(pool.clone());
   let user_id = UserId::new();

   let mut tx = tx_manager.begin().await.unwrap();
   let enrollment = enrollment_repo
      .upsert(&mut tx, &create_test_enrollment(&user_id, "Maria Souza"))
      .await
      .unwrap();
   let first = sut
      .upsert(&mut tx, &create_test_address(enrollment.id(), "Praça da Sé"))
      .await
      .unwrap();
   tx.commit().await.unwrap();

   let mut fields = address_fields("Rua Direita");
   fields.address_detail = None;
   let second = Address::new(
      AddressId::new(),
      enrollment.id().clone(),
      fields,
      test_later(),
   );
   let mut tx = tx_manager.begin().await.unwrap();
   let stored = sut.upsert(&mut tx, &second).await.unwrap();
   tx.commit().await.unwrap();

   assert_eq!(count_rows(&pool, "addresses").await, 1);
   assert_eq!(stored.id(), first.id());
   assert_eq!(stored.street().as_str(), "Rua Direita");
   assert_eq!(stored.address_detail(), None);
   let found = sut.find_by_enrollment_id(enrollment.id()).await.unwrap();
   assert_eq!(found, Some(stored));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_住所未登録のenrollment_idではnoneを返す(pool: PgPool) {
   let tx_manager = PgTransactionManager::new(pool.clone());
   let enrollment_repo = PostgresEnrollmentRepository::new(pool.clone());
   let sut = PostgresAddressRepository::new(pool.clone());

   let mut tx = tx_manager.begin().await.unwrap();
   let enrollment = enrollment_repo
      .upsert(&mut tx, &create_test_enrollment(&UserId::new(), "Maria Souza"))
      .await
      .unwrap();
   tx.commit().await.unwrap();

   assert_eq!(sut.find_by_enrollment_id(enrollment.id()).await.unwrap(), None);
   assert_eq!(sut.find_by_enrollment_id(&EnrollmentId::new()).await.unwrap(), None);
}
