//! 外部服务封装 - 通知与支付
//!
//! 两者对核心流程都是不透明调用：
//! 通知失败只记录日志，支付只关心 intent 的最终状态。

pub mod notification;
pub mod payment;

pub use notification::NotificationService;
pub use payment::{PaymentError, PaymentIntent, PaymentIntentStatus, PaymentService};
