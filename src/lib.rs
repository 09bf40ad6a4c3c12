//! Reserva Server - 餐厅预订与礼品卡后端
//!
//! # 模块结构
//!
//! ```text
//! src/
//! ├── core/          # 配置、状态、HTTP 服务器
//! ├── booking/       # 预订引擎 (排期、占用、桌台分配、可用性)
//! ├── db/            # 数据库层 (嵌入式 SurrealDB)
//! ├── services/      # 通知、支付
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 错误类型、日志
//! ```
//!
//! The booking engine lives in [`booking`]: pure schedule resolution,
//! slot occupancy, table allocation and availability projection, with
//! [`booking::BookingService`] orchestrating the persisted flow.

pub mod api;
pub mod booking;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use booking::{BookingError, BookingService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};
pub use utils::logger::{init_logger, init_logger_with_file};
