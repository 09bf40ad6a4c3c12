use std::sync::Arc;

use dashmap::DashMap;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio::sync::Mutex;

use crate::core::{Config, Result};
use crate::db::DbService;
use crate::services::{NotificationService, PaymentService};

/// 时段写入锁注册表
///
/// 预订创建是 "读占用 → 分配桌台 → 写入" 三步，中间不持有存储锁。
/// 同一时段的并发请求可能读到相同的空闲桌台集合并选中重叠的桌台。
/// 这里按 (restaurant, date, time) 键维护互斥锁，使同一时段的
/// 创建请求串行化；不同时段互不阻塞。
///
/// 锁条目按需创建且从不移除；键空间为 "活跃被预订的时段"，
/// 数量级很小，不需要回收。
#[derive(Debug, Default)]
pub struct SlotLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SlotLocks {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// 获取指定时段的互斥锁 (不存在时创建)
    pub fn for_slot(&self, restaurant: &str, date: &str, time: &str) -> Arc<Mutex<()>> {
        let key = format!("{restaurant}|{date}|{time}");
        self.locks
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，Clone 成本极低。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | db | 嵌入式数据库 (SurrealDB) |
/// | slot_locks | 时段写入锁 |
/// | notifier | 通知服务 (fire-and-forget) |
/// | payments | 支付服务 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 嵌入式数据库
    pub db: Surreal<Db>,
    /// 时段写入锁注册表
    pub slot_locks: Arc<SlotLocks>,
    /// 通知服务
    pub notifier: Arc<NotificationService>,
    /// 支付服务
    pub payments: Arc<PaymentService>,
}

impl ServerState {
    /// 构造预订服务 (仓储为浅拷贝句柄)
    pub fn booking_service(&self) -> crate::booking::BookingService {
        crate::booking::BookingService::new(
            self.db.clone(),
            self.slot_locks.clone(),
            self.notifier.clone(),
        )
    }

    /// 初始化服务器状态：打开数据库、应用 schema、写入种子数据
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db_service = DbService::new(&config.db_path()).await?;
        crate::db::seed::seed_demo_restaurant(&db_service.db).await?;

        Ok(Self {
            config: config.clone(),
            db: db_service.db,
            slot_locks: Arc::new(SlotLocks::new()),
            notifier: Arc::new(NotificationService::new(config.notify_url.clone())),
            payments: Arc::new(PaymentService::new(
                config.payment_api_url.clone(),
                config.payment_api_key.clone(),
            )),
        })
    }

    /// 测试用：内存数据库状态
    #[cfg(test)]
    pub async fn for_tests() -> Self {
        let db_service = DbService::in_memory().await.expect("in-memory db");
        let config = Config {
            work_dir: "/tmp/reserva-test".into(),
            http_port: 0,
            environment: "test".into(),
            log_level: "debug".into(),
            log_dir: None,
            notify_url: None,
            payment_api_url: None,
            payment_api_key: String::new(),
        };
        Self {
            config,
            db: db_service.db,
            slot_locks: Arc::new(SlotLocks::new()),
            notifier: Arc::new(NotificationService::new(None)),
            payments: Arc::new(PaymentService::new(None, String::new())),
        }
    }
}
