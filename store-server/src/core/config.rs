use std::path::PathBuf;

use chrono_tz::Tz;

use crate::utils::time::parse_timezone;

/// 存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// 未配置：所有数据保存在演示存储 (进程内)
    None,
    /// redb 嵌入式数据库，位于 `{WORK_DIR}/database/store.redb`
    Redb,
}

impl StoreBackend {
    fn from_env_value(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "redb" => StoreBackend::Redb,
            Some(v) if v.is_empty() || v == "none" || v == "memory" => StoreBackend::None,
            None => StoreBackend::None,
            Some(other) => {
                tracing::warn!(value = %other, "Unknown STORE_BACKEND, running without a backend");
                StoreBackend::None
            }
        }
    }
}

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | WORK_DIR | ./data | 工作目录 (数据库、日志) |
/// | STORE_BACKEND | (未设置) | `redb` 启用持久化，否则使用演示存储 |
/// | TIMEZONE | UTC | 统计窗口使用的业务时区 (IANA) |
/// | MENU_CATALOG_PATH | (内置示例菜单) | 菜单 JSON 文件 |
/// | NOTIFY_URL | (未设置) | 通知投递地址，未设置时模拟发送 |
/// | NOTIFY_API_KEY | (未设置) | 通知投递 Bearer token |
/// | NOTIFY_FROM | noreply@localhost | 发件人 |
/// | ENVIRONMENT | development | 运行环境 |
///
/// `LOG_LEVEL` / `LOG_DIR` 在 [`crate::setup_environment`] 中读取。
///
/// # 示例
///
/// ```ignore
/// STORE_BACKEND=redb TIMEZONE=Africa/Johannesburg cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 存储后端
    pub store_backend: StoreBackend,
    /// 业务时区
    pub timezone: Tz,
    /// 菜单文件 (None = 内置示例菜单)
    pub menu_catalog_path: Option<PathBuf>,
    pub notify_url: Option<String>,
    pub notify_api_key: Option<String>,
    pub notify_from: String,
    /// 运行环境: development | staging | production
    pub environment: String,
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无效，使用默认值
    pub fn from_env() -> Self {
        let timezone = match non_empty_var("TIMEZONE") {
            Some(name) => parse_timezone(&name).unwrap_or_else(|| {
                tracing::warn!(timezone = %name, "Invalid TIMEZONE, using UTC");
                chrono_tz::UTC
            }),
            None => chrono_tz::UTC,
        };

        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            store_backend: StoreBackend::from_env_value(std::env::var("STORE_BACKEND").ok().as_deref()),
            timezone,
            menu_catalog_path: non_empty_var("MENU_CATALOG_PATH").map(PathBuf::from),
            notify_url: non_empty_var("NOTIFY_URL"),
            notify_api_key: non_empty_var("NOTIFY_API_KEY"),
            notify_from: non_empty_var("NOTIFY_FROM").unwrap_or_else(|| "noreply@localhost".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// redb 数据库文件路径
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database").join("store.redb")
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
