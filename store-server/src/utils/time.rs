//! 时间工具函数 - 业务时区转换
//!
//! 订单时间戳以 UTC 存储，统计窗口 (日/周/月) 按业务时区的本地日历计算。

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;

/// 解析时区名 (IANA)，无效时返回 None
pub fn parse_timezone(name: &str) -> Option<Tz> {
    name.trim().parse().ok()
}

/// 本地日期零点 → UTC 时刻 (业务时区)
///
/// DST gap fallback: 如果本地零点不存在 (夏令时跳跃)，fallback 到 UTC 零点。
pub fn local_midnight(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let naive = date.and_time(chrono::NaiveTime::MIN);
    naive
        .and_local_timezone(tz)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

/// 本周起始日 (周日)
pub fn week_start(today: NaiveDate) -> NaiveDate {
    today - chrono::Duration::days(i64::from(today.weekday().num_days_from_sunday()))
}

/// 本月 1 号
pub fn month_start(today: NaiveDate) -> NaiveDate {
    today.with_day(1).unwrap_or(today)
}

/// UTC 时刻 → 业务时区日期字符串 (YYYY-MM-DD)
pub fn local_date_string(at: DateTime<Utc>, tz: Tz) -> String {
    at.with_timezone(&tz).format("%Y-%m-%d").to_string()
}
