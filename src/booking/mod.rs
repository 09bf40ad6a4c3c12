//! 预订引擎
//!
//! # 模块结构
//!
//! - [`schedule`] - 排期解析 (特殊日期覆盖、闭店日)
//! - [`occupancy`] - 时段占用聚合
//! - [`allocator`] - 桌台分配 (贪心 + 单桌回退)
//! - [`availability`] - 可用性投影 (读侧)
//! - [`service`] - 持久化流程编排
//!
//! schedule / occupancy / allocator / availability 都是纯函数，
//! 输入为不可变的 [`crate::db::models::BookingConfig`] 快照。

pub mod allocator;
pub mod availability;
pub mod code;
pub mod error;
pub mod occupancy;
pub mod schedule;
pub mod service;

pub use allocator::{Allocation, AllocationError, allocate};
pub use availability::{DayAvailability, SlotAvailability};
pub use error::BookingError;
pub use occupancy::SlotOccupancy;
pub use schedule::DaySchedule;
pub use service::BookingService;
