//! # エンロールメントユースケース
//!
//! エンロールメントと住所の登録・取得、CEP による住所検索を扱う。
//!
//! 登録は「入力検証 → CEP 検索 → 1 トランザクションで enrollment と address を upsert」
//! の順に行う。検証か CEP 検索で失敗した場合は何も書き込まない。

use std::sync::Arc;

use drivent_domain::{
   address::{
      Address,
      AddressFields,
      AddressId,
      AddressNumber,
      Cep,
      CepAddress,
      City,
      Neighborhood,
      Street,
      Uf,
      normalize_address_detail,
   },
   clock::Clock,
   enrollment::{
      Birthday,
      Cpf,
      Enrollment,
      EnrollmentFields,
      EnrollmentId,
      EnrollmentName,
      EnrollmentWithAddress,
      Phone,
   },
   user::UserId,
};
use drivent_infra::{
   CepClient,
   db::TransactionManager,
   repository::{AddressRepository, EnrollmentRepository},
};

use crate::{error::CoreError, usecase::helpers::FindResultExt};

/// 住所の入力（未検証）
#[derive(Debug, Clone)]
pub struct AddressInput {
   pub cep:            String,
   pub street:         String,
   pub city:           String,
   pub number:         String,
   pub state:          String,
   pub neighborhood:   String,
   pub address_detail: Option<String>,
}

/// エンロールメント登録・更新の入力（未検証）
#[derive(Debug, Clone)]
pub struct UpsertEnrollmentInput {
   pub user_id:  UserId,
   pub name:     String,
   pub cpf:      String,
   /// `YYYY-MM-DD` または RFC 3339
   pub birthday: String,
   pub phone:    String,
   pub address:  AddressInput,
}

/// エンロールメントユースケース
pub struct EnrollmentUseCaseImpl {
   enrollment_repo: Arc<dyn EnrollmentRepository>,
   address_repo:    Arc<dyn AddressRepository>,
   cep_client:      Arc<dyn CepClient>,
   tx_manager:      Arc<dyn TransactionManager>,
   clock:           Arc<dyn Clock>,
}

impl EnrollmentUseCaseImpl {
   pub fn new(
      enrollment_repo: Arc<dyn EnrollmentRepository>,
      address_repo: Arc<dyn AddressRepository>,
      cep_client: Arc<dyn CepClient>,
      tx_manager: Arc<dyn TransactionManager>,
      clock: Arc<dyn Clock>,
   ) -> Self {
      Self {
         enrollment_repo,
         address_repo,
         cep_client,
         tx_manager,
         clock,
      }
   }

   /// CEP から住所を検索する
   ///
   /// 形式不正の CEP は外部に問い合わせずに BadRequest。
   /// ViaCEP が「存在しない」と答えた場合も BadRequest。
   #[tracing::instrument(skip_all, fields(cep = %cep))]
   pub async fn get_address_from_cep(&self, cep: &str) -> Result<CepAddress, CoreError> {
      let cep = Cep::new(cep)?;
      self.lookup_cep(&cep).await
   }

   /// ユーザーのエンロールメントを住所付きで取得する
   ///
   /// エンロールメントが未登録なら BadRequest。
   #[tracing::instrument(skip_all, fields(%user_id))]
   pub async fn get_one_with_address_by_user_id(
      &self,
      user_id: &UserId,
   ) -> Result<EnrollmentWithAddress, CoreError> {
      self.enrollment_repo
         .find_with_address_by_user_id(user_id)
         .await
         .or_bad_request("エンロールメント")
   }

   /// エンロールメントと住所を登録または更新する
   ///
   /// ## 処理フロー
   ///
   /// 1. 入力を値オブジェクトに変換（失敗は BadRequest）
   /// 2. CEP を ViaCEP で検索（存在しなければ BadRequest）
   /// 3. 既存の登録があれば更新、なければ新規作成
   /// 4. enrollment → address の順に 1 トランザクションで upsert
   #[tracing::instrument(skip_all, fields(user_id = %input.user_id))]
   pub async fn create_or_update_enrollment_with_address(
      &self,
      input: UpsertEnrollmentInput,
   ) -> Result<EnrollmentWithAddress, CoreError> {
      let enrollment_fields = parse_enrollment_fields(&input, self.clock.today())?;
      let address_fields = parse_address_fields(input.address)?;

      self.lookup_cep(&address_fields.cep).await?;

      let now = self.clock.now();
      let existing = self
         .enrollment_repo
         .find_with_address_by_user_id(&input.user_id)
         .await?;

      let (enrollment, existing_address) = match existing {
         Some(EnrollmentWithAddress {
            enrollment,
            address,
         }) => (enrollment.updated(enrollment_fields, now), address),
         None => (
            Enrollment::new(EnrollmentId::new(), input.user_id, enrollment_fields, now),
            None,
         ),
      };

      let mut tx = self.tx_manager.begin().await?;
      let enrollment = self.enrollment_repo.upsert(&mut tx, &enrollment).await?;
      let address = match existing_address {
         Some(address) => address.updated(address_fields, now),
         None => Address::new(AddressId::new(), enrollment.id().clone(), address_fields, now),
      };
      let address = self.address_repo.upsert(&mut tx, &address).await?;
      tx.commit().await?;

      tracing::info!(enrollment_id = %enrollment.id(), "エンロールメントを保存しました");

      Ok(EnrollmentWithAddress {
         enrollment,
         address: Some(address),
      })
   }

   async fn lookup_cep(&self, cep: &Cep) -> Result<CepAddress, CoreError> {
      self.cep_client
         .lookup(cep)
         .await
         .map_err(|e| CoreError::Internal(format!("CEP 検索に失敗: {e}")))?
         .ok_or_else(|| CoreError::BadRequest(format!("CEP が見つかりません: {cep}")))
   }
}

fn parse_enrollment_fields(
   input: &UpsertEnrollmentInput,
   today: chrono::NaiveDate,
) -> Result<EnrollmentFields, CoreError> {
   Ok(EnrollmentFields {
      name:     EnrollmentName::new(input.name.as_str())?,
      cpf:      Cpf::new(&input.cpf)?,
      birthday: Birthday::parse(&input.birthday, today)?,
      phone:    Phone::new(input.phone.as_str())?,
   })
}

fn parse_address_fields(input: AddressInput) -> Result<AddressFields, CoreError> {
   Ok(AddressFields {
      cep:            Cep::new(&input.cep)?,
      street:         Street::new(input.street)?,
      city:           City::new(input.city)?,
      state:          Uf::parse(&input.state)?,
      number:         AddressNumber::new(input.number)?,
      neighborhood:   Neighborhood::new(input.neighborhood)?,
      address_detail: normalize_address_detail(input.address_detail)?,
   })
}
