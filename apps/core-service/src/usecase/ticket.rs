//! # チケットユースケース
//!
//! チケット種別の一覧、ユーザーのチケット取得、チケット予約を扱う。

use std::sync::Arc;

use drivent_domain::{
   clock::Clock,
   ticket::{Ticket, TicketId, TicketType, TicketTypeId, TicketWithType},
   user::UserId,
};
use drivent_infra::{
   db::TransactionManager,
   repository::{EnrollmentRepository, TicketRepository},
};

use crate::{error::CoreError, usecase::helpers::FindResultExt};

/// チケット予約の入力
#[derive(Debug, Clone)]
pub struct CreateTicketInput {
   pub user_id:        UserId,
   pub ticket_type_id: TicketTypeId,
}

/// チケットユースケース
pub struct TicketUseCaseImpl {
   ticket_repo:     Arc<dyn TicketRepository>,
   enrollment_repo: Arc<dyn EnrollmentRepository>,
   tx_manager:      Arc<dyn TransactionManager>,
   clock:           Arc<dyn Clock>,
}

impl TicketUseCaseImpl {
   pub fn new(
      ticket_repo: Arc<dyn TicketRepository>,
      enrollment_repo: Arc<dyn EnrollmentRepository>,
      tx_manager: Arc<dyn TransactionManager>,
      clock: Arc<dyn Clock>,
   ) -> Self {
      Self {
         ticket_repo,
         enrollment_repo,
         tx_manager,
         clock,
      }
   }

   /// 登録済みのチケット種別をすべて返す
   #[tracing::instrument(skip_all)]
   pub async fn get_ticket_types(&self) -> Result<Vec<TicketType>, CoreError> {
      Ok(self.ticket_repo.find_all_types().await?)
   }

   /// ユーザーのチケットを種別付きで返す
   #[tracing::instrument(skip_all, fields(%user_id))]
   pub async fn get_ticket(&self, user_id: &UserId) -> Result<TicketWithType, CoreError> {
      self.ticket_repo
         .find_by_user_id(user_id)
         .await
         .or_not_found("チケット")
   }

   /// チケットを予約する
   ///
   /// ## 処理フロー
   ///
   /// 1. ユーザーのエンロールメントを取得（なければ NotFound）
   /// 2. チケット種別を取得（なければ NotFound）
   /// 3. `RESERVED` のチケットを保存
   #[tracing::instrument(skip_all, fields(user_id = %input.user_id, ticket_type_id = %input.ticket_type_id))]
   pub async fn create_ticket(&self, input: CreateTicketInput) -> Result<TicketWithType, CoreError> {
      let enrollment = self
         .enrollment_repo
         .find_by_user_id(&input.user_id)
         .await
         .or_not_found("エンロールメント")?;

      let ticket_type = self
         .ticket_repo
         .find_type_by_id(&input.ticket_type_id)
         .await
         .or_not_found("チケット種別")?;

      let ticket = Ticket::reserve(
         TicketId::new(),
         ticket_type.id.clone(),
         enrollment.id().clone(),
         self.clock.now(),
      );

      let mut tx = self.tx_manager.begin().await?;
      let ticket = self.ticket_repo.insert(&mut tx, &ticket).await?;
      tx.commit().await?;

      tracing::info!(ticket_id = %ticket.id(), "チケットを予約しました");

      Ok(TicketWithType {
         ticket,
         ticket_type,
      })
   }
}

#[cfg(test)]
mod tests {
   use chrono::{DateTime, NaiveDate};
   use drivent_domain::{
      clock::FixedClock,
      enrollment::{
         Birthday,
         Cpf,
         Enrollment,
         EnrollmentFields,
         EnrollmentId,
         EnrollmentName,
         Phone,
      },
      ticket::TicketStatus,
   };
   use drivent_infra::mock::{MockEnrollmentStore, MockTicketRepository, MockTransactionManager};
   use pretty_assertions::assert_eq;

   use super::*;

   fn now() -> DateTime<chrono::Utc> {
      DateTime::from_timestamp(1_700_000_000, 0).unwrap()
   }

   fn ticket_type(name: &str, price: i32) -> TicketType {
      TicketType {
         id: TicketTypeId::new(),
         name: name.to_string(),
         price,
         is_remote: false,
         includes_hotel: false,
         created_at: now(),
         updated_at: now(),
      }
   }

   fn enrollment(user_id: &UserId) -> Enrollment {
      Enrollment::new(
         EnrollmentId::new(),
         user_id.clone(),
         EnrollmentFields {
            name:     EnrollmentName::new("Maria Souza").unwrap(),
            cpf:      Cpf::new("52998224725").unwrap(),
            birthday: Birthday::new(
               NaiveDate::from_ymd_opt(1990, 5, 20).unwrap(),
               now().date_naive(),
            )
            .unwrap(),
            phone:    Phone::new("(21) 98999-9999").unwrap(),
         },
         now(),
      )
   }

   struct Fixture {
      store:   MockEnrollmentStore,
      tickets: MockTicketRepository,
      sut:     TicketUseCaseImpl,
   }

   fn setup() -> Fixture {
      let store = MockEnrollmentStore::new();
      let tickets = MockTicketRepository::new(store.clone());
      let sut = TicketUseCaseImpl::new(
         Arc::new(tickets.clone()),
         Arc::new(store.enrollment_repository()),
         Arc::new(MockTransactionManager),
         Arc::new(FixedClock::new(now())),
      );
      Fixture {
         store,
         tickets,
         sut,
      }
   }

   #[tokio::test]
   async fn test_get_ticket_typesは登録済みの種別をすべて返す() {
      let f = setup();
      let presencial = ticket_type("Presencial", 25000);
      let online = ticket_type("Online", 10000);
      f.tickets.add_ticket_type(presencial.clone());
      f.tickets.add_ticket_type(online.clone());

      let mut expected = vec![presencial, online];
      expected.sort_by(|a, b| a.id.as_uuid().cmp(b.id.as_uuid()));

      let result = f.sut.get_ticket_types().await.unwrap();

      assert_eq!(result, expected);
   }

   #[tokio::test]
   async fn test_get_ticket_typesは種別がなければ空() {
      let f = setup();

      assert!(f.sut.get_ticket_types().await.unwrap().is_empty());
   }

   #[tokio::test]
   async fn test_エンロールメントのないユーザーのチケット予約はnot_found() {
      let f = setup();
      let ticket_type = ticket_type("Presencial", 25000);
      f.tickets.add_ticket_type(ticket_type.clone());

      let result = f
         .sut
         .create_ticket(CreateTicketInput {
            user_id:        UserId::new(),
            ticket_type_id: ticket_type.id,
         })
         .await;

      assert!(matches!(result, Err(CoreError::NotFound(_))));
      assert!(f.tickets.tickets().is_empty());
   }

   #[tokio::test]
   async fn test_存在しないチケット種別の予約はnot_found() {
      let f = setup();
      let user_id = UserId::new();
      f.store.add_enrollment(enrollment(&user_id));

      let result = f
         .sut
         .create_ticket(CreateTicketInput {
            user_id,
            ticket_type_id: TicketTypeId::new(),
         })
         .await;

      assert!(matches!(result, Err(CoreError::NotFound(msg)) if msg.contains("チケット種別")));
      assert!(f.tickets.tickets().is_empty());
   }

   #[tokio::test]
   async fn test_チケット予約は種別付きのreservedチケットを返す() {
      let f = setup();
      let user_id = UserId::new();
      let enrollment = enrollment(&user_id);
      f.store.add_enrollment(enrollment.clone());
      let ticket_type = ticket_type("Presencial", 25000);
      f.tickets.add_ticket_type(ticket_type.clone());

      let result = f
         .sut
         .create_ticket(CreateTicketInput {
            user_id:        user_id.clone(),
            ticket_type_id: ticket_type.id.clone(),
         })
         .await
         .unwrap();

      assert_eq!(result.ticket_type, ticket_type);
      assert_eq!(result.ticket.status(), TicketStatus::Reserved);
      assert_eq!(result.ticket.enrollment_id(), enrollment.id());
      assert_eq!(result.ticket.created_at(), now());
      assert_eq!(f.tickets.tickets(), vec![result.ticket.clone()]);

      let fetched = f.sut.get_ticket(&user_id).await.unwrap();
      assert_eq!(fetched, result);
   }

   #[tokio::test]
   async fn test_チケットのないユーザーの取得はnot_found() {
      let f = setup();
      let user_id = UserId::new();
      f.store.add_enrollment(enrollment(&user_id));

      let result = f.sut.get_ticket(&user_id).await;

      assert!(matches!(result, Err(CoreError::NotFound(msg)) if msg == "チケットが見つかりません"));
   }
}
