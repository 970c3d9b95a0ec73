use crate::core::tasks::{BackgroundTasks, TaskKind};
use crate::core::{Config, Result};
use crate::services::{
    CatalogService, ChatLink, InsightService, OrderService, ShoppingService, TrackerService,
};
use crate::store::Store;

/// 服务器状态 - 持有所有服务的共享句柄
///
/// 克隆开销很低：每个字段都是共享存储的句柄。
///
/// | 字段 | 用途 |
/// |-------|---------|
/// | config | 不可变配置 |
/// | store | redb 文档存储 |
/// | catalog | 餐品增删改查和默认导入 |
/// | orders | 下单和订单管理 |
/// | shopping | 合并采购清单 |
/// | trackers | 二维码访问计数 |
/// | insight | 营养反馈 |
/// | chat | WhatsApp 跳转链接 |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub store: Store,
    pub catalog: CatalogService,
    pub orders: OrderService,
    pub shopping: ShoppingService,
    pub trackers: TrackerService,
    pub insight: InsightService,
    pub chat: ChatLink,
}

impl ServerState {
    /// Wire every service around an opened store
    pub fn new(config: Config, store: Store, insight: InsightService) -> Self {
        let chat = ChatLink::from_config(&config);
        let catalog = CatalogService::from_config(store.clone(), &config);
        let orders = OrderService::new(store.clone(), catalog.clone(), chat.clone());
        Self {
            shopping: ShoppingService::new(store.clone()),
            trackers: TrackerService::new(store.clone()),
            catalog,
            orders,
            insight,
            chat,
            store,
            config,
        }
    }

    /// Open the database under the work directory and build the state
    pub fn initialize(config: &Config) -> Result<Self> {
        let db_path = config.database_path();
        tracing::info!(path = %db_path.display(), "Opening database");
        let store = Store::open(&db_path)?;
        let insight = InsightService::from_config(config);
        Ok(Self::new(config.clone(), store, insight))
    }

    /// Start the listeners that keep derived views current
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();
        let token = tasks.shutdown_token();
        tasks.spawn(
            "shopping_list_watcher",
            TaskKind::Listener,
            self.shopping.clone().run(token),
        );
        tracing::info!("Background tasks registered: {}", tasks.len());
        tasks
    }

    /// Seed the built-in menu into an empty catalog, when enabled
    pub fn spawn_default_seed(&self, tasks: &mut BackgroundTasks) {
        if !self.config.seed_default_menu {
            tracing::debug!("Default menu seed disabled");
            return;
        }
        let catalog = self.catalog.clone();
        tasks.spawn("default_menu_seed", TaskKind::Warmup, async move {
            match catalog.seed_default_if_empty().await {
                Ok(Some(report)) => tracing::info!(
                    written = report.written,
                    skipped = report.skipped.len(),
                    "Default menu seeded"
                ),
                Ok(None) => {}
                Err(e) => tracing::error!(error = %e, "Default menu seed failed"),
            }
        });
    }
}
