use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use shared::AppResult;
use tokio::sync::Mutex;

use crate::core::config::StoreBackend;
use crate::core::{Config, Result};
use crate::db::{FailoverStore, KvStore, MemoryStore, RedbStore, UnconfiguredStore};
use crate::inventory::InventoryLedger;
use crate::menu::MenuCatalog;
use crate::notify::{Notifier, build_notifier};
use crate::orders::OrderService;
use crate::packs::PackService;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，每个请求处理器通过 `State<ServerState>` 获取。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | store | Arc<FailoverStore> | 主存储 + 演示存储 |
/// | orders | OrderService | 订单服务 |
/// | inventory | InventoryLedger | 库存账本 |
/// | packs | PackService | 常用订单包 |
/// | menu | Arc<MenuCatalog> | 菜单目录 (只读) |
///
/// 订单服务与库存账本共享同一个写锁 (write gate)。
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 存储 (主存储不可用时降级到演示存储)
    pub store: Arc<FailoverStore>,
    /// 订单服务
    pub orders: OrderService,
    /// 库存账本
    pub inventory: InventoryLedger,
    /// 常用订单包
    pub packs: PackService,
    /// 菜单目录
    pub menu: Arc<MenuCatalog>,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`ServerState::initialize`] 代替；测试直接传入主存储。
    pub fn new(
        config: Config,
        primary: Arc<dyn KvStore>,
        menu: MenuCatalog,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let store = Arc::new(FailoverStore::new(primary, Arc::new(MemoryStore::new())));
        let kv: Arc<dyn KvStore> = store.clone();
        let write_gate = Arc::new(Mutex::new(()));
        let inventory = InventoryLedger::new(kv.clone(), write_gate.clone());
        let orders = OrderService::new(kv.clone(), inventory.clone(), notifier, write_gate);
        let packs = PackService::new(kv, orders.clone());

        Self {
            config,
            store,
            orders,
            inventory,
            packs,
            menu: Arc::new(menu),
        }
    }

    /// 初始化服务器状态
    ///
    /// 1. 打开存储后端 (未配置时使用空适配器)
    /// 2. 加载菜单目录
    /// 3. 选择通知投递方式
    pub async fn initialize(config: &Config) -> Result<Self> {
        let primary = open_backend(config)?;
        let menu = MenuCatalog::load(config.menu_catalog_path.as_deref())?;
        let notifier = build_notifier(config);

        if config.is_production() && !primary.is_configured() {
            tracing::warn!("Production environment without STORE_BACKEND, orders are not durable");
        }

        let state = Self::new(config.clone(), primary, menu, notifier);
        tracing::info!(
            backend = state.store.primary_name(),
            demo_mode = state.is_demo_mode(),
            menu_items = state.menu.len(),
            timezone = %config.timezone,
            "Server state initialized"
        );
        Ok(state)
    }

    /// 未配置持久化后端
    pub fn is_demo_mode(&self) -> bool {
        self.store.is_demo_mode()
    }

    /// 演示模式下首次读取库存/菜单时，从菜单目录播种库存
    pub async fn ensure_demo_inventory(&self) -> AppResult<()> {
        if self.is_demo_mode() {
            self.inventory.seed_once(self.menu.items()).await?;
        }
        Ok(())
    }

    /// 业务时区的当前时间
    pub fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.config.timezone)
    }
}

fn open_backend(config: &Config) -> Result<Arc<dyn KvStore>> {
    match config.store_backend {
        StoreBackend::Redb => {
            let store = RedbStore::open(config.database_path())?;
            Ok(Arc::new(store))
        }
        StoreBackend::None => {
            tracing::info!("No STORE_BACKEND configured, running on the in-memory demo store");
            Ok(Arc::new(UnconfiguredStore::default()))
        }
    }
}
