//! Booking Model

use super::serde_helpers;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Booking status
///
/// `cancelled` 是唯一释放桌台容量的状态；
/// 其余状态的预订都占用其 `tables`。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }
}

/// Booking entity
///
/// `tables` 在分配成功时写入，此后不可变 (编辑重分配不在范围内)。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// 餐厅对外标识 (slug)
    pub restaurant_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub date: NaiveDate,
    /// Format "HH:MM"
    pub time: String,
    pub guests: u32,
    /// 分配的桌号
    pub tables: Vec<u32>,
    pub status: BookingStatus,
    pub special_requests: Option<String>,
    /// 8 位大写字母数字，全局唯一
    pub confirmation_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create booking payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BookingCreate {
    #[validate(length(min = 1))]
    pub restaurant_id: String,
    #[validate(length(min = 1, max = 120))]
    pub customer_name: String,
    #[validate(email)]
    pub customer_email: String,
    #[validate(length(min = 3, max = 32))]
    pub customer_phone: String,
    pub date: NaiveDate,
    /// Format "HH:MM"
    pub time: String,
    pub guests: u32,
    #[validate(length(max = 500))]
    pub special_requests: Option<String>,
}

/// Status update payload
#[derive(Debug, Clone, Deserialize)]
pub struct BookingStatusUpdate {
    pub status: BookingStatus,
}

/// Booking enriched with restaurant summary (confirm / customer lookups)
#[derive(Debug, Clone, Serialize)]
pub struct BookingWithRestaurant {
    #[serde(flatten)]
    pub booking: Booking,
    pub restaurant: Option<RestaurantSummary>,
}

/// 预订响应中附带的餐厅摘要
#[derive(Debug, Clone, Serialize)]
pub struct RestaurantSummary {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}
