//! Restaurant Model
//!
//! 餐厅文档：展示信息 + 预订配置 (BookingConfig)。
//! 预订配置是不可变快照，读路径绝不原地修改；
//! 变更只通过配置更新接口整体替换并重新校验。

use super::serde_helpers;
use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use thiserror::Error;

/// 配置校验错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("duplicate table number {0}")]
    DuplicateTableNumber(u32),

    #[error("table {0} has zero capacity")]
    ZeroCapacityTable(u32),

    #[error("duplicate special date {0}")]
    DuplicateSpecialDate(NaiveDate),

    #[error("invalid time slot hour '{0}', expected HH:MM")]
    InvalidSlotHour(String),

    #[error("invalid closed day '{0}'")]
    InvalidClosedDay(String),

    #[error("min_guests_per_booking exceeds max_guests_per_booking")]
    GuestRangeInverted,
}

/// Physical table (桌台)
///
/// 桌台从不删除，只停用 (`is_active = false`)，
/// 保证历史预订引用的桌号仍然可解析。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Table {
    pub number: u32,
    pub capacity: u32,
    #[serde(default, deserialize_with = "serde_helpers::bool_true")]
    pub is_active: bool,
}

impl Table {
    pub fn new(number: u32, capacity: u32) -> Self {
        Self {
            number,
            capacity,
            is_active: true,
        }
    }
}

/// Time slot: nominal capacity for one bookable hour
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeSlot {
    /// Format "HH:MM"
    pub hour: String,
    pub capacity: u32,
}

impl TimeSlot {
    pub fn new(hour: impl Into<String>, capacity: u32) -> Self {
        Self {
            hour: hour.into(),
            capacity,
        }
    }
}

/// Special date override — replaces the weekday slot list entirely
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialDate {
    pub date: NaiveDate,
    /// 空列表表示当天整天关闭
    pub time_slots: Vec<TimeSlot>,
    #[serde(default)]
    pub is_holiday: bool,
    pub note: Option<String>,
}

/// Weekly schedule: one ordered slot list per weekday
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegularSchedule {
    pub monday: Vec<TimeSlot>,
    pub tuesday: Vec<TimeSlot>,
    pub wednesday: Vec<TimeSlot>,
    pub thursday: Vec<TimeSlot>,
    pub friday: Vec<TimeSlot>,
    pub saturday: Vec<TimeSlot>,
    pub sunday: Vec<TimeSlot>,
}

impl RegularSchedule {
    pub fn for_weekday(&self, weekday: Weekday) -> &[TimeSlot] {
        match weekday {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }

    fn all_slots(&self) -> impl Iterator<Item = &TimeSlot> {
        self.monday
            .iter()
            .chain(&self.tuesday)
            .chain(&self.wednesday)
            .chain(&self.thursday)
            .chain(&self.friday)
            .chain(&self.saturday)
            .chain(&self.sunday)
    }
}

/// 固定英文小写星期名 (与 locale 无关)
pub const WEEKDAY_NAMES: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Locale-independent weekday name, Monday first
pub fn weekday_name(weekday: Weekday) -> &'static str {
    WEEKDAY_NAMES[weekday.num_days_from_monday() as usize]
}

/// Per-restaurant booking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    pub regular_schedule: RegularSchedule,
    #[serde(default)]
    pub special_dates: Vec<SpecialDate>,
    pub tables: Vec<Table>,
    pub min_guests_per_booking: u32,
    pub max_guests_per_booking: u32,
    pub advance_booking_days: u32,
    /// 固定英文小写星期名 (见 [`WEEKDAY_NAMES`])
    #[serde(default)]
    pub closed_days: Vec<String>,
    /// 预订默认时长 (分钟)，仅作展示
    pub default_booking_duration: Option<u32>,
    pub special_notes: Option<String>,
}

impl BookingConfig {
    /// Constructor-time invariant checks.
    ///
    /// 唯一桌号、正容量、唯一特殊日期、合法时段格式、合法闭店日。
    /// 配置更新接口在写入前必须调用。
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut numbers = std::collections::HashSet::new();
        for table in &self.tables {
            if table.capacity == 0 {
                return Err(ConfigError::ZeroCapacityTable(table.number));
            }
            if !numbers.insert(table.number) {
                return Err(ConfigError::DuplicateTableNumber(table.number));
            }
        }

        let mut dates = std::collections::HashSet::new();
        for special in &self.special_dates {
            if !dates.insert(special.date) {
                return Err(ConfigError::DuplicateSpecialDate(special.date));
            }
            for slot in &special.time_slots {
                check_hour(&slot.hour)?;
            }
        }

        for slot in self.regular_schedule.all_slots() {
            check_hour(&slot.hour)?;
        }

        for day in &self.closed_days {
            if !WEEKDAY_NAMES.contains(&day.as_str()) {
                return Err(ConfigError::InvalidClosedDay(day.clone()));
            }
        }

        if self.min_guests_per_booking > self.max_guests_per_booking {
            return Err(ConfigError::GuestRangeInverted);
        }

        Ok(())
    }

    /// Active tables only (允许分配的桌台集合)
    pub fn active_tables(&self) -> Vec<Table> {
        self.tables
            .iter()
            .filter(|t| t.is_active)
            .cloned()
            .collect()
    }
}

fn check_hour(hour: &str) -> Result<(), ConfigError> {
    NaiveTime::parse_from_str(hour, "%H:%M")
        .map(|_| ())
        .map_err(|_| ConfigError::InvalidSlotHour(hour.to_string()))
}

/// Contact block (展示信息，原样存储)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contact {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// Gift card settings per restaurant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GiftCardSettings {
    /// 卡号前缀 (如 "gc")
    pub prefix: String,
    pub validity_days: u32,
}

impl Default for GiftCardSettings {
    fn default() -> Self {
        Self {
            prefix: "gc".to_string(),
            validity_days: 365,
        }
    }
}

/// Restaurant entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// 对外标识 (如 "demo-restaurant")，全局唯一
    pub slug: String,
    pub name: String,
    pub slogan: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub contact: Contact,
    #[serde(default)]
    pub gift_cards: GiftCardSettings,
    pub booking_config: BookingConfig,
    #[serde(default, deserialize_with = "serde_helpers::bool_true")]
    pub is_active: bool,
}

/// Booking config update payload (整体替换)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfigUpdate {
    pub booking_config: BookingConfig,
}
