//! Table Allocator
//!
//! 给定空闲桌台集合和请求人数，产出具体的桌台分配。
//!
//! 策略：按容量升序贪心合并小桌，合并不能覆盖人数时退回
//! "单张最小的足够大的桌"。倾向于用小桌拼座以保留大桌给
//! 未来的大型聚会，但宁可给一张偏大的桌也不返回覆盖不完整
//! 的组合。这是有意为之的启发式，不是最优装箱。
//!
//! 同容量桌台按桌号升序断开平局，结果对相同输入完全确定。

use crate::db::models::Table;
use std::collections::BTreeSet;
use thiserror::Error;

/// 分配器只对畸形输入报错；容量不足是正常结果，不是错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AllocationError {
    #[error("requested guest count must be positive")]
    NonPositiveGuests,
}

/// Allocation outcome for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Allocation {
    /// 分配成功：桌号升序，容量总和 ≥ 请求人数
    Assigned(Vec<u32>),
    /// 不可行：附带当前空闲总容量供调用方诊断
    Infeasible { free_capacity: u32 },
}

/// Allocate tables for a party.
///
/// `occupied` 为该时段已被非取消预订持有的桌号集合。
pub fn allocate(
    active_tables: &[Table],
    occupied: &BTreeSet<u32>,
    requested_guests: u32,
) -> Result<Allocation, AllocationError> {
    if requested_guests == 0 {
        return Err(AllocationError::NonPositiveGuests);
    }

    // 空闲桌台，容量升序、桌号升序 (确定性排序)
    let mut free: Vec<&Table> = active_tables
        .iter()
        .filter(|t| t.is_active && !occupied.contains(&t.number))
        .collect();
    free.sort_by_key(|t| (t.capacity, t.number));

    let free_capacity: u32 = free.iter().map(|t| t.capacity).sum();
    if free_capacity < requested_guests {
        return Ok(Allocation::Infeasible { free_capacity });
    }

    // 贪心：选入所有 capacity ≤ 剩余人数的桌，直到覆盖
    let mut remaining = requested_guests as i64;
    let mut selected: Vec<u32> = Vec::new();
    for table in &free {
        if remaining <= 0 {
            break;
        }
        if i64::from(table.capacity) <= remaining {
            selected.push(table.number);
            remaining -= i64::from(table.capacity);
        }
    }

    if remaining > 0 {
        // 小桌拼不满：放弃部分选择，找单张容量足够的最小桌
        let single = free
            .iter()
            .find(|t| t.capacity >= requested_guests)
            .map(|t| t.number);
        return Ok(match single {
            Some(number) => Allocation::Assigned(vec![number]),
            None => Allocation::Infeasible { free_capacity },
        });
    }

    selected.sort_unstable();
    Ok(Allocation::Assigned(selected))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_tables(capacities: &[u32]) -> Vec<Table> {
        capacities
            .iter()
            .enumerate()
            .map(|(i, &cap)| Table::new(i as u32 + 1, cap))
            .collect()
    }

    fn assigned(tables: &[Table], occupied: &[u32], guests: u32) -> Vec<u32> {
        let occupied: BTreeSet<u32> = occupied.iter().copied().collect();
        match allocate(tables, &occupied, guests).unwrap() {
            Allocation::Assigned(numbers) => numbers,
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_exact_fit_combines_tables() {
        // [4,4] free, 8 guests -> both tables, ascending
        let tables = make_tables(&[4, 4]);
        assert_eq!(assigned(&tables, &[], 8), vec![1, 2]);
    }

    #[test]
    fn test_fallback_prefers_single_large_table() {
        // [2,2,2,8] free, 5 guests: greedy picks 2+2 (=4, remaining 1),
        // no table ≤ 1 -> fall back to the single 8-seat table.
        let tables = make_tables(&[2, 2, 2, 8]);
        assert_eq!(assigned(&tables, &[], 5), vec![4]);
    }

    #[test]
    fn test_infeasible_reports_free_capacity() {
        let tables = make_tables(&[2, 2]);
        let result = allocate(&tables, &BTreeSet::new(), 5).unwrap();
        assert_eq!(result, Allocation::Infeasible { free_capacity: 4 });
    }

    #[test]
    fn test_occupied_tables_excluded() {
        // Table 1 (cap 2) taken; 2 guests must land on table 2
        let tables = make_tables(&[2, 2]);
        assert_eq!(assigned(&tables, &[1], 2), vec![2]);
    }

    #[test]
    fn test_inactive_tables_excluded() {
        let mut tables = make_tables(&[2, 8]);
        tables[1].is_active = false;
        let result = allocate(&tables, &BTreeSet::new(), 4).unwrap();
        assert_eq!(result, Allocation::Infeasible { free_capacity: 2 });
    }

    #[test]
    fn test_small_tables_preferred_over_large() {
        // 4 guests: 2+2 combination keeps the 8-seater free
        let tables = make_tables(&[2, 2, 8]);
        assert_eq!(assigned(&tables, &[], 4), vec![1, 2]);
    }

    #[test]
    fn test_ties_broken_by_table_number() {
        let tables = make_tables(&[4, 4, 4]);
        assert_eq!(assigned(&tables, &[], 4), vec![1]);
        assert_eq!(assigned(&tables, &[1], 4), vec![2]);
    }

    #[test]
    fn test_deterministic_across_invocations() {
        let tables = make_tables(&[2, 4, 6, 2, 8]);
        let occupied: BTreeSet<u32> = [2].into_iter().collect();
        let first = allocate(&tables, &occupied, 7).unwrap();
        for _ in 0..10 {
            assert_eq!(allocate(&tables, &occupied, 7).unwrap(), first);
        }
    }

    #[test]
    fn test_allocation_covers_party_and_avoids_occupied() {
        let tables = make_tables(&[2, 2, 4, 6, 8]);
        let occupied: BTreeSet<u32> = [3].into_iter().collect();
        let numbers = assigned(&tables, &[3], 9);

        let total: u32 = numbers
            .iter()
            .map(|n| tables.iter().find(|t| t.number == *n).unwrap().capacity)
            .sum();
        assert!(total >= 9);
        assert!(numbers.iter().all(|n| !occupied.contains(n)));
    }

    #[test]
    fn test_zero_guests_is_an_error() {
        let tables = make_tables(&[4]);
        assert_eq!(
            allocate(&tables, &BTreeSet::new(), 0),
            Err(AllocationError::NonPositiveGuests)
        );
    }
}
