//! Schedule Resolver
//!
//! 给定日历日期，产出当天的时段列表：
//! 闭店日 → Closed；特殊日期命中 → 原样返回其时段列表
//! (空列表即当天关闭)；否则返回周常规排期。

use crate::db::models::{BookingConfig, TimeSlot, weekday_name};
use chrono::{Datelike, NaiveDate};

/// Resolved schedule for one calendar date
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DaySchedule {
    /// 星期在闭店集合中
    Closed,
    /// 当天可用时段 (可能为空：特殊日期整天关闭)
    Open(Vec<TimeSlot>),
}

impl DaySchedule {
    /// Slots for the day; closed days yield an empty list
    pub fn slots(&self) -> &[TimeSlot] {
        match self {
            DaySchedule::Closed => &[],
            DaySchedule::Open(slots) => slots,
        }
    }

    /// Find a slot by exact hour string
    pub fn slot_at(&self, hour: &str) -> Option<&TimeSlot> {
        self.slots().iter().find(|s| s.hour == hour)
    }
}

/// Resolve the schedule for a date.
///
/// 特殊日期按日历日精确匹配 (忽略时刻)，命中时完全替换
/// 常规排期，不做合并。
pub fn resolve_day(config: &BookingConfig, date: NaiveDate) -> DaySchedule {
    let weekday = weekday_name(date.weekday());

    if config.closed_days.iter().any(|d| d == weekday) {
        return DaySchedule::Closed;
    }

    if let Some(special) = config.special_dates.iter().find(|sd| sd.date == date) {
        return DaySchedule::Open(special.time_slots.clone());
    }

    DaySchedule::Open(config.regular_schedule.for_weekday(date.weekday()).to_vec())
}
