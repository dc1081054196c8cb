/// UUID v7 ベースの ID 型を定義する宣言型マクロ
///
/// 以下を一括生成する:
/// - Newtype 構造体（`Uuid` をラップ、`#[serde(transparent)]`）
/// - `new()` / `from_uuid()` / `as_uuid()`
/// - `Default` impl（`new()` に委譲）
///
/// # 使用例
///
/// ```rust
/// use drivent_domain::ticket::TicketId;
///
/// let id = TicketId::new();
/// let restored = TicketId::from_uuid(*id.as_uuid());
/// assert_eq!(id, restored);
/// ```
macro_rules! define_uuid_id {
   (
      $(#[$meta:meta])*
      $vis:vis struct $Name:ident;
   ) => {
      $(#[$meta])*
      #[derive(
         Debug, Clone, PartialEq, Eq, Hash,
         serde::Serialize, serde::Deserialize,
         derive_more::Display,
      )]
      #[serde(transparent)]
      #[display("{_0}")]
      $vis struct $Name(uuid::Uuid);

      impl $Name {
         /// 新しい ID を生成する（UUID v7）
         pub fn new() -> Self {
            Self(uuid::Uuid::now_v7())
         }

         /// 既存の UUID から ID を作成する
         pub fn from_uuid(uuid: uuid::Uuid) -> Self {
            Self(uuid)
         }

         /// 内部の UUID 参照を取得する
         pub fn as_uuid(&self) -> &uuid::Uuid {
            &self.0
         }
      }

      impl Default for $Name {
         fn default() -> Self {
            Self::new()
         }
      }
   };
}

/// 長さ制約付き String Newtype を定義する宣言型マクロ
///
/// 住所の各項目や氏名のように「trim して長さだけ検証する」値に使う。
///
/// - `new()`: trim + 最小長チェック + 最大長チェック
/// - `as_str()`
/// - `Display`
///
/// `min_length` は `chars().count()` で数える。1 を指定すると「必須」の意味になる。
///
/// ```rust
/// use drivent_domain::address::Street;
///
/// let street = Street::new("  Praça da Sé  ").unwrap();
/// assert_eq!(street.as_str(), "Praça da Sé");
/// assert!(Street::new("   ").is_err());
/// ```
macro_rules! define_validated_string {
   (
      $(#[$meta:meta])*
      $vis:vis struct $Name:ident {
         label: $label:expr,
         min_length: $min_length:expr,
         max_length: $max_length:expr $(,)?
      }
   ) => {
      $(#[$meta])*
      #[derive(
         Debug, Clone, PartialEq, Eq,
         serde::Serialize, serde::Deserialize,
      )]
      #[serde(transparent)]
      $vis struct $Name(String);

      impl $Name {
         pub fn new(value: impl Into<String>) -> Result<Self, $crate::DomainError> {
            let value = value.into().trim().to_string();
            let length = value.chars().count();

            if length == 0 {
               return Err($crate::DomainError::Validation(format!(
                  "{}は必須です",
                  $label
               )));
            }

            if length < $min_length {
               return Err($crate::DomainError::Validation(format!(
                  "{}は {} 文字以上である必要があります",
                  $label, $min_length
               )));
            }

            if length > $max_length {
               return Err($crate::DomainError::Validation(format!(
                  "{}は {} 文字以内である必要があります",
                  $label, $max_length
               )));
            }

            Ok(Self(value))
         }

         /// 文字列参照を取得する
         pub fn as_str(&self) -> &str {
            &self.0
         }
      }

      impl std::fmt::Display for $Name {
         fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.0)
         }
      }
   };
}
