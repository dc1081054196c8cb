//! # テスト用モック
//!
//! ユースケース・ハンドラテストで使用するインメモリリポジトリとスタブ CEP クライアント。
//! `test-utils` feature を有効にすると他クレートからも利用できる。
//!
//! ```toml
//! [dev-dependencies]
//! drivent-infra = { workspace = true, features = ["test-utils"] }
//! ```
//!
//! upsert はキー（user_id / enrollment_id）が一致する既存行を置き換え、
//! ID と作成日時は既存行のものを残す。PostgreSQL 実装の `ON CONFLICT` と同じ挙動。

use std::{
   collections::HashMap,
   sync::{Arc, Mutex},
};

use async_trait::async_trait;
use drivent_domain::{
   address::{Address, AddressRecord, Cep, CepAddress},
   enrollment::{Enrollment, EnrollmentId, EnrollmentRecord, EnrollmentWithAddress},
   ticket::{Ticket, TicketType, TicketTypeId, TicketWithType},
   user::UserId,
};

use crate::{
   cep_client::CepClient,
   db::{TransactionManager, TxContext},
   error::InfraError,
   repository::{AddressRepository, EnrollmentRepository, TicketRepository},
};

// ===== MockTransactionManager =====

/// 常にモック TxContext を返す TransactionManager
pub struct MockTransactionManager;

#[async_trait]
impl TransactionManager for MockTransactionManager {
   async fn begin(&self) -> Result<TxContext, InfraError> {
      Ok(TxContext::mock())
   }
}

// ===== MockEnrollmentRepository / MockAddressRepository =====

/// エンロールメントと住所の共有ストア
///
/// `find_with_address_by_user_id` が住所も引けるよう、両リポジトリで共有する。
#[derive(Clone, Default)]
pub struct MockEnrollmentStore {
   enrollments: Arc<Mutex<Vec<Enrollment>>>,
   addresses:   Arc<Mutex<Vec<Address>>>,
}

impl MockEnrollmentStore {
   pub fn new() -> Self {
      Self::default()
   }

   pub fn enrollment_repository(&self) -> MockEnrollmentRepository {
      MockEnrollmentRepository {
         store: self.clone(),
      }
   }

   pub fn address_repository(&self) -> MockAddressRepository {
      MockAddressRepository {
         store: self.clone(),
      }
   }

   pub fn add_enrollment(&self, enrollment: Enrollment) {
      self.enrollments.lock().unwrap().push(enrollment);
   }

   pub fn enrollments(&self) -> Vec<Enrollment> {
      self.enrollments.lock().unwrap().clone()
   }

   pub fn addresses(&self) -> Vec<Address> {
      self.addresses.lock().unwrap().clone()
   }
}

#[derive(Clone)]
pub struct MockEnrollmentRepository {
   store: MockEnrollmentStore,
}

#[async_trait]
impl EnrollmentRepository for MockEnrollmentRepository {
   async fn find_by_user_id(&self, user_id: &UserId) -> Result<Option<Enrollment>, InfraError> {
      Ok(self
         .store
         .enrollments
         .lock()
         .unwrap()
         .iter()
         .find(|e| e.user_id() == user_id)
         .cloned())
   }

   async fn find_with_address_by_user_id(
      &self,
      user_id: &UserId,
   ) -> Result<Option<EnrollmentWithAddress>, InfraError> {
      let Some(enrollment) = self.find_by_user_id(user_id).await? else {
         return Ok(None);
      };
      let address = self
         .store
         .address_repository()
         .find_by_enrollment_id(enrollment.id())
         .await?;

      Ok(Some(EnrollmentWithAddress {
         enrollment,
         address,
      }))
   }

   async fn upsert(
      &self,
      _tx: &mut TxContext,
      enrollment: &Enrollment,
   ) -> Result<Enrollment, InfraError> {
      let mut enrollments = self.store.enrollments.lock().unwrap();

      let stored = match enrollments
         .iter()
         .position(|e| e.user_id() == enrollment.user_id())
      {
         Some(pos) => {
            let existing = &enrollments[pos];
            let merged = Enrollment::from_db(EnrollmentRecord {
               id:         existing.id().clone(),
               user_id:    existing.user_id().clone(),
               name:       enrollment.name().clone(),
               cpf:        enrollment.cpf().clone(),
               birthday:   enrollment.birthday(),
               phone:      enrollment.phone().clone(),
               created_at: existing.created_at(),
               updated_at: enrollment.updated_at(),
            });
            enrollments[pos] = merged.clone();
            merged
         }
         None => {
            enrollments.push(enrollment.clone());
            enrollment.clone()
         }
      };

      Ok(stored)
   }
}

#[derive(Clone)]
pub struct MockAddressRepository {
   store: MockEnrollmentStore,
}

#[async_trait]
impl AddressRepository for MockAddressRepository {
   async fn find_by_enrollment_id(
      &self,
      enrollment_id: &EnrollmentId,
   ) -> Result<Option<Address>, InfraError> {
      Ok(self
         .store
         .addresses
         .lock()
         .unwrap()
         .iter()
         .find(|a| a.enrollment_id() == enrollment_id)
         .cloned())
   }

   async fn upsert(&self, _tx: &mut TxContext, address: &Address) -> Result<Address, InfraError> {
      let mut addresses = self.store.addresses.lock().unwrap();

      let stored = match addresses
         .iter()
         .position(|a| a.enrollment_id() == address.enrollment_id())
      {
         Some(pos) => {
            let existing = &addresses[pos];
            let merged = Address::from_db(AddressRecord {
               id:             existing.id().clone(),
               enrollment_id:  existing.enrollment_id().clone(),
               cep:            address.cep().clone(),
               street:         address.street().clone(),
               city:           address.city().clone(),
               state:          address.state(),
               number:         address.number().clone(),
               neighborhood:   address.neighborhood().clone(),
               address_detail: address.address_detail().map(str::to_string),
               created_at:     existing.created_at(),
               updated_at:     address.updated_at(),
            });
            addresses[pos] = merged.clone();
            merged
         }
         None => {
            addresses.push(address.clone());
            address.clone()
         }
      };

      Ok(stored)
   }
}

// ===== MockTicketRepository =====

/// チケットのインメモリリポジトリ
///
/// ユーザーからチケットを辿るため、エンロールメントストアを参照する。
#[derive(Clone, Default)]
pub struct MockTicketRepository {
   ticket_types: Arc<Mutex<Vec<TicketType>>>,
   tickets:      Arc<Mutex<Vec<Ticket>>>,
   enrollments:  MockEnrollmentStore,
}

impl MockTicketRepository {
   pub fn new(enrollments: MockEnrollmentStore) -> Self {
      Self {
         ticket_types: Arc::new(Mutex::new(Vec::new())),
         tickets: Arc::new(Mutex::new(Vec::new())),
         enrollments,
      }
   }

   pub fn add_ticket_type(&self, ticket_type: TicketType) {
      self.ticket_types.lock().unwrap().push(ticket_type);
   }

   pub fn tickets(&self) -> Vec<Ticket> {
      self.tickets.lock().unwrap().clone()
   }
}

#[async_trait]
impl TicketRepository for MockTicketRepository {
   async fn find_all_types(&self) -> Result<Vec<TicketType>, InfraError> {
      let mut types = self.ticket_types.lock().unwrap().clone();
      types.sort_by(|a, b| a.id.as_uuid().cmp(b.id.as_uuid()));
      Ok(types)
   }

   async fn find_type_by_id(&self, id: &TicketTypeId) -> Result<Option<TicketType>, InfraError> {
      Ok(self
         .ticket_types
         .lock()
         .unwrap()
         .iter()
         .find(|t| &t.id == id)
         .cloned())
   }

   async fn find_by_user_id(
      &self,
      user_id: &UserId,
   ) -> Result<Option<TicketWithType>, InfraError> {
      let enrollment_ids: Vec<_> = self
         .enrollments
         .enrollments()
         .into_iter()
         .filter(|e| e.user_id() == user_id)
         .map(|e| e.id().clone())
         .collect();

      let ticket = self
         .tickets
         .lock()
         .unwrap()
         .iter()
         .filter(|t| enrollment_ids.contains(t.enrollment_id()))
         .min_by_key(|t| t.created_at())
         .cloned();

      let Some(ticket) = ticket else {
         return Ok(None);
      };
      let ticket_type = self
         .find_type_by_id(ticket.ticket_type_id())
         .await?
         .ok_or_else(|| InfraError::unexpected("チケット種別が存在しません"))?;

      Ok(Some(TicketWithType {
         ticket,
         ticket_type,
      }))
   }

   async fn insert(&self, _tx: &mut TxContext, ticket: &Ticket) -> Result<Ticket, InfraError> {
      self.tickets.lock().unwrap().push(ticket.clone());
      Ok(ticket.clone())
   }
}

// ===== StubCepClient =====

/// 登録済みの CEP だけを住所として返すスタブ
///
/// 未登録の CEP は ViaCEP の `"erro": true` と同じく `Ok(None)`。
/// [`fail_with_unavailable`](StubCepClient::fail_with_unavailable) を呼ぶと
/// 全検索がサービス障害エラーになる。
#[derive(Clone, Default)]
pub struct StubCepClient {
   addresses:   Arc<Mutex<HashMap<String, CepAddress>>>,
   unavailable: Arc<Mutex<bool>>,
   calls:       Arc<Mutex<Vec<String>>>,
}

impl StubCepClient {
   pub fn new() -> Self {
      Self::default()
   }

   pub fn with_address(self, cep: &str, address: CepAddress) -> Self {
      self.addresses
         .lock()
         .unwrap()
         .insert(cep.to_string(), address);
      self
   }

   pub fn fail_with_unavailable(&self) {
      *self.unavailable.lock().unwrap() = true;
   }

   /// これまでに検索された CEP（8 桁）
   pub fn calls(&self) -> Vec<String> {
      self.calls.lock().unwrap().clone()
   }
}

#[async_trait]
impl CepClient for StubCepClient {
   async fn lookup(&self, cep: &Cep) -> Result<Option<CepAddress>, InfraError> {
      self.calls.lock().unwrap().push(cep.as_str().to_string());

      if *self.unavailable.lock().unwrap() {
         return Err(InfraError::unexpected("ViaCEP が応答しません"));
      }

      Ok(self.addresses.lock().unwrap().get(cep.as_str()).cloned())
   }
}
