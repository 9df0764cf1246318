//! Store Server - 外卖点餐店面核心服务
//!
//! # 架构概述
//!
//! - **订单** (`orders`): 下单、状态流转、支付标记、删除、再来一单
//! - **订单包** (`packs`): 登录用户保存的常用购物车，可一键再次下单
//! - **库存** (`inventory`): 随订单完成扣减/回退的库存账本
//! - **统计** (`stats`): 从全部订单计算的经营数据
//! - **存储** (`db`): 键值存储抽象，redb 持久化 + 内存演示存储兜底
//! - **通知** (`notify`): 订单邮件通知 (后台发送，失败只记日志)
//! - **HTTP API** (`api`): JSON 接口
//!
//! # 模块结构
//!
//! ```text
//! store-server/src/
//! ├── core/          # 配置、状态、错误、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 存储适配器
//! ├── orders/        # 订单服务
//! ├── packs/         # 常用订单包
//! ├── inventory/     # 库存账本
//! ├── stats/         # 统计计算
//! ├── menu/          # 菜单目录
//! ├── notify/        # 通知投递
//! └── utils/         # 日志、校验、时区
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod inventory;
pub mod menu;
pub mod notify;
pub mod orders;
pub mod packs;
pub mod stats;
pub mod utils;

use anyhow::Context;

// Re-export 公共类型
pub use crate::core::{Config, Server, ServerState};
pub use inventory::InventoryLedger;
pub use orders::OrderService;
pub use packs::PackService;

// Re-export unified error types from shared
pub use shared::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境: 加载 .env，初始化日志
///
/// - `LOG_LEVEL`: 默认日志级别 (`RUST_LOG` 优先)
/// - `LOG_DIR`: 设置后额外按天写入日志文件
/// - `ENVIRONMENT=production` 时输出 JSON 格式日志
pub fn setup_environment() -> anyhow::Result<()> {
    // .env 可选
    dotenv::dotenv().ok();

    let level = std::env::var("LOG_LEVEL").ok();
    let json = std::env::var("ENVIRONMENT").is_ok_and(|env| env == "production");
    let log_dir = std::env::var("LOG_DIR").ok();
    if let Some(dir) = &log_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create log directory {dir}"))?;
    }

    init_logger_with_file(level.as_deref(), json, log_dir.as_deref());
    Ok(())
}
