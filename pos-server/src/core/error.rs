use thiserror::Error;

use crate::utils::AppError;

/// 服务器启动/运行错误
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("端口绑定失败: {0}")]
    Bind(#[source] std::io::Error),

    #[error("初始化失败: {0}")]
    Init(#[from] AppError),

    #[error("内部服务器错误")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
