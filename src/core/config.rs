/// 服务器配置 - 所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/reserva | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (无) | 日志文件目录，未设置时仅输出到终端 |
/// | NOTIFY_URL | (无) | 邮件中继地址，未设置时通知只记录日志 |
/// | PAYMENT_API_URL | (无) | 支付服务地址 |
/// | PAYMENT_API_KEY | (空) | 支付服务密钥 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/reserva HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库和日志文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 日志级别
    pub log_level: String,
    /// 日志文件目录 (可选)
    pub log_dir: Option<String>,
    /// 邮件中继地址 (可选，未设置时通知仅记录日志)
    pub notify_url: Option<String>,
    /// 支付服务地址 (可选)
    pub payment_api_url: Option<String>,
    /// 支付服务密钥
    pub payment_api_key: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/reserva".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
            notify_url: std::env::var("NOTIFY_URL").ok(),
            payment_api_url: std::env::var("PAYMENT_API_URL").ok(),
            payment_api_key: std::env::var("PAYMENT_API_KEY").unwrap_or_default(),
        }
    }

    /// 数据库存储路径 ({work_dir}/db)
    pub fn db_path(&self) -> String {
        format!("{}/db", self.work_dir)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
