use pos_server::{Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 设置环境 (dotenv, 配置, 日志)
    let config = setup_environment()?;

    print_banner();

    tracing::info!(
        environment = %config.environment,
        service_charge_percent = config.service_charge_percent,
        tax_percent = config.tax_percent,
        "🧾 POS server starting..."
    );

    // 2. 初始化服务器状态 (可选演示数据)
    let state = ServerState::initialize(config.clone()).await?;

    // 3. 启动 HTTP 服务器
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
