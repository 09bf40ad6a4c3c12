//! Availability Projector
//!
//! 组合排期解析与时段占用，回答 "某天还能订什么"。
//! 每个时段：可用桌台 = 活跃桌台 − 该时段被占桌台，
//! 容量 = 可用桌台的容量之和。

use crate::booking::occupancy::SlotOccupancy;
use crate::booking::schedule::DaySchedule;
use crate::db::models::Table;
use chrono::NaiveDate;
use serde::Serialize;

/// Per-slot availability for display
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SlotAvailability {
    pub hour: String,
    /// 可用桌台容量之和
    pub capacity: u32,
    /// 可用桌号，升序
    pub available_tables: Vec<u32>,
}

/// Availability of one calendar date
#[derive(Debug, Clone, Serialize)]
pub struct DayAvailability {
    pub date: NaiveDate,
    /// 闭店日为空列表
    pub time_slots: Vec<SlotAvailability>,
}

/// Project availability from resolved schedule + per-slot occupancy.
///
/// `occupancy_for` 按时段小时字符串产出该时段的占用。
pub fn project_day<F>(
    date: NaiveDate,
    schedule: &DaySchedule,
    active_tables: &[Table],
    mut occupancy_for: F,
) -> DayAvailability
where
    F: FnMut(&str) -> SlotOccupancy,
{
    let time_slots = schedule
        .slots()
        .iter()
        .map(|slot| {
            let occupancy = occupancy_for(&slot.hour);
            project_slot(&slot.hour, active_tables, &occupancy)
        })
        .collect();

    DayAvailability { date, time_slots }
}

/// Availability of a single slot
pub fn project_slot(
    hour: &str,
    active_tables: &[Table],
    occupancy: &SlotOccupancy,
) -> SlotAvailability {
    let mut available: Vec<&Table> = active_tables
        .iter()
        .filter(|t| t.is_active && !occupancy.occupied_tables.contains(&t.number))
        .collect();
    available.sort_by_key(|t| t.number);

    SlotAvailability {
        hour: hour.to_string(),
        capacity: available.iter().map(|t| t.capacity).sum(),
        available_tables: available.iter().map(|t| t.number).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::TimeSlot;
    use std::collections::BTreeSet;

    fn make_tables() -> Vec<Table> {
        vec![Table::new(1, 2), Table::new(2, 4), Table::new(3, 6)]
    }

    fn occupancy(tables: &[u32]) -> SlotOccupancy {
        SlotOccupancy {
            occupied_tables: tables.iter().copied().collect::<BTreeSet<u32>>(),
            total_guests: 0,
        }
    }

    #[test]
    fn test_occupied_tables_removed_from_slot() {
        let slot = project_slot("13:00", &make_tables(), &occupancy(&[2]));
        assert_eq!(slot.available_tables, vec![1, 3]);
        assert_eq!(slot.capacity, 8);
    }

    #[test]
    fn test_slot_exactness() {
        // 14:00 的占用不影响 13:00 的投影
        let date = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        let schedule = DaySchedule::Open(vec![
            TimeSlot::new("13:00", 30),
            TimeSlot::new("14:00", 30),
        ]);

        let day = project_day(date, &schedule, &make_tables(), |hour| {
            if hour == "14:00" {
                occupancy(&[1, 2, 3])
            } else {
                occupancy(&[])
            }
        });

        assert_eq!(day.time_slots[0].available_tables, vec![1, 2, 3]);
        assert_eq!(day.time_slots[0].capacity, 12);
        assert!(day.time_slots[1].available_tables.is_empty());
        assert_eq!(day.time_slots[1].capacity, 0);
    }

    #[test]
    fn test_closed_day_has_no_slots() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 31).unwrap();
        let day = project_day(date, &DaySchedule::Closed, &make_tables(), |_| {
            occupancy(&[])
        });
        assert!(day.time_slots.is_empty());
    }

    #[test]
    fn test_inactive_tables_never_available() {
        let mut tables = make_tables();
        tables[2].is_active = false;
        let slot = project_slot("13:00", &tables, &occupancy(&[]));
        assert_eq!(slot.available_tables, vec![1, 2]);
        assert_eq!(slot.capacity, 6);
    }
}
