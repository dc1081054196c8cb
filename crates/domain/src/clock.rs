//! # Clock（時刻プロバイダ）
//!
//! ユースケース層での `Utc::now()` 直接呼び出しを置き換え、
//! テストで固定時刻を注入可能にする。
//! 誕生日の未来日チェックやタイムスタンプ付与で使用する。

use chrono::{DateTime, NaiveDate, Utc};

/// 現在時刻を提供するトレイト
pub trait Clock: Send + Sync {
   fn now(&self) -> DateTime<Utc>;

   /// 今日の日付（UTC）
   fn today(&self) -> NaiveDate {
      self.now().date_naive()
   }
}

/// 実際のシステム時刻を返す実装
pub struct SystemClock;

impl Clock for SystemClock {
   fn now(&self) -> DateTime<Utc> {
      Utc::now()
   }
}

/// 固定時刻を返すテスト用実装
pub struct FixedClock {
   now: DateTime<Utc>,
}

impl FixedClock {
   pub fn new(now: DateTime<Utc>) -> Self {
      Self { now }
   }
}

impl Clock for FixedClock {
   fn now(&self) -> DateTime<Utc> {
      self.now
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_system_clock_は現在時刻を返す() {
      let clock = SystemClock;
      let before = Utc::now();
      let result = clock.now();
      let after = Utc::now();

      assert!(result >= before);
      assert!(result <= after);
   }

   #[test]
   fn test_fixed_clock_は複数回呼んでも同じ時刻を返す() {
      let fixed_time = Utc::now();
      let clock = FixedClock::new(fixed_time);

      assert_eq!(clock.now(), fixed_time);
      assert_eq!(clock.now(), fixed_time);
   }

   #[test]
   fn test_todayはnowの日付部分を返す() {
      let fixed_time = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
      let clock = FixedClock::new(fixed_time);

      assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2023, 11, 14).unwrap());
   }
}
