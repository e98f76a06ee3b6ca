use product_catalog_api::{
    app::{self, AppState},
    config::AppConfig,
    infrastructure::{
        logger::Logger,
        store::{InMemoryProductStore, ProductStore},
    },
};
use tokio::net::TcpListener;
use tracing::{info, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    Logger::init(Level::INFO);

    let config = AppConfig::from_env()?;
    let address = config.bind_address();

    let store = InMemoryProductStore::seeded();
    info!("✅ 已初始化 {} 个示例产品", store.list().len());

    let state = AppState::new(config, store.into_shared());
    let app = app::router(state);

    let listener = TcpListener::bind(&address).await?;
    info!("🚀 产品 API 服务器运行在 http://{}", address);
    info!("📖 API 端点:");
    info!("   GET    /api/products          - 产品列表 (category, page, limit)");
    info!("   GET    /api/products/search   - 按名称搜索 (name)");
    info!("   GET    /api/products/stats    - 分类统计");
    info!("   GET    /api/products/:id      - 获取产品");
    info!("   POST   /api/products          - 创建产品");
    info!("   PUT    /api/products/:id      - 更新产品");
    info!("   DELETE /api/products/:id      - 删除产品");

    axum::serve(listener, app).await?;
    Ok(())
}
