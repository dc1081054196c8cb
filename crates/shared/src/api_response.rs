//! # API レスポンスエンベロープ
//!
//! 内部 API の統一レスポンス形式 `{ "data": T }` を提供する。

use serde::{Deserialize, Serialize};

/// 統一レスポンス型
///
/// ハンドラはすべて `{ "data": T }` 形式で返す。
///
/// ```
/// use drivent_shared::ApiResponse;
///
/// let response = ApiResponse::new(vec!["VIP", "Online"]);
/// assert_eq!(response.data.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
   pub data: T,
}

impl<T> ApiResponse<T> {
   pub fn new(data: T) -> Self {
      Self { data }
   }
}
