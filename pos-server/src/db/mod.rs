//! 数据层
//!
//! - [`repository`] - 实体仓储接口与进程内实现
//! - [`seed`] - 演示数据

pub mod repository;
pub mod seed;
