use thiserror::Error;

/// 启动期错误 - 数据库打开、端口绑定等
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("数据库错误: {0}")]
    Database(String),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("内部服务器错误")]
    Internal(#[from] anyhow::Error),
}

impl From<surrealdb::Error> for ServerError {
    fn from(err: surrealdb::Error) -> Self {
        ServerError::Database(err.to_string())
    }
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::Internal(err.into())
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
