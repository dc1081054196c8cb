//! # ユーザー
//!
//! 認証はゲートウェイ側の責務であり、このサービスはユーザー ID のみを扱う。
//! ユーザーはエンロールメントを最大 1 件持つ（`enrollments.user_id` は UNIQUE）。

define_uuid_id! {
   /// ユーザーの一意識別子
   ///
   /// ゲートウェイが認証済みユーザーの ID として転送してくる値。
   pub struct UserId;
}
