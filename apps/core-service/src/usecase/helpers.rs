//! ユースケース層の共通ヘルパー
//!
//! リポジトリ呼び出し結果の変換など、複数のユースケースで繰り返されるパターンを共通化する。

use drivent_infra::InfraError;

use crate::error::CoreError;

/// リポジトリの `Result<Option<T>, InfraError>` を `Result<T, CoreError>` に変換する
///
/// ```ignore
/// let ticket = self.ticket_repo.find_by_user_id(&user_id).await
///     .or_not_found("チケット")?;
/// ```
pub(crate) trait FindResultExt<T> {
   /// `None` の場合は `CoreError::NotFound`、`InfraError` の場合は `CoreError::Database`
   fn or_not_found(self, entity_name: &str) -> Result<T, CoreError>;

   /// `None` の場合は `CoreError::BadRequest`、`InfraError` の場合は `CoreError::Database`
   ///
   /// 前提となるデータが未登録であることを呼び出し側の誤りとして扱う箇所で使う。
   fn or_bad_request(self, entity_name: &str) -> Result<T, CoreError>;
}

impl<T> FindResultExt<T> for Result<Option<T>, InfraError> {
   fn or_not_found(self, entity_name: &str) -> Result<T, CoreError> {
      self?.ok_or_else(|| CoreError::NotFound(format!("{entity_name}が見つかりません")))
   }

   fn or_bad_request(self, entity_name: &str) -> Result<T, CoreError> {
      self?.ok_or_else(|| CoreError::BadRequest(format!("{entity_name}が登録されていません")))
   }
}

#[cfg(test)]
mod tests {
   use drivent_infra::InfraError;

   use super::*;

   #[test]
   fn test_or_not_found_ok_some_は値を返す() {
      let result: Result<Option<i32>, InfraError> = Ok(Some(42));

      let value = result.or_not_found("テスト").unwrap();

      assert_eq!(value, 42);
   }

   #[test]
   fn test_or_not_found_ok_none_はnotfoundエラーを返す() {
      let result: Result<Option<i32>, InfraError> = Ok(None);

      let err = result.or_not_found("チケット").unwrap_err();

      match err {
         CoreError::NotFound(msg) => assert_eq!(msg, "チケットが見つかりません"),
         other => panic!("NotFound を期待したが {other:?} を受信"),
      }
   }

   #[test]
   fn test_or_bad_request_ok_none_はbadrequestエラーを返す() {
      let result: Result<Option<i32>, InfraError> = Ok(None);

      let err = result.or_bad_request("エンロールメント").unwrap_err();

      match err {
         CoreError::BadRequest(msg) => assert_eq!(msg, "エンロールメントが登録されていません"),
         other => panic!("BadRequest を期待したが {other:?} を受信"),
      }
   }

   #[test]
   fn test_errはdatabaseエラーを返す() {
      let result: Result<Option<i32>, InfraError> = Err(InfraError::unexpected("接続失敗"));

      let err = result.or_not_found("チケット").unwrap_err();

      assert!(matches!(err, CoreError::Database(_)));
   }
}
