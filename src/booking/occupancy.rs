//! Slot Occupancy
//!
//! 从某时段的现有预订提取被占用的桌号集合与客人总数。
//! 查询层已排除 cancelled，这里再按状态过滤一次，
//! 保证纯函数对任意输入都成立。

use crate::db::models::{Booking, BookingStatus};
use std::collections::BTreeSet;

/// Occupancy of one (restaurant, date, time) slot
#[derive(Debug, Clone, Default)]
pub struct SlotOccupancy {
    /// 非取消预订持有的桌号并集
    pub occupied_tables: BTreeSet<u32>,
    /// 非取消预订的客人总数
    pub total_guests: u32,
}

/// Compute occupancy from the bookings of one slot
pub fn occupancy_of(bookings: &[Booking]) -> SlotOccupancy {
    let mut occupancy = SlotOccupancy::default();
    for booking in bookings {
        if booking.status == BookingStatus::Cancelled {
            continue;
        }
        occupancy.occupied_tables.extend(booking.tables.iter().copied());
        occupancy.total_guests += booking.guests;
    }
    occupancy
}
