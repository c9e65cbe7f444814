//! # Page Analyzer 主程序

use std::sync::Arc;

use clap::Parser;
use page_analyzer::{
    app::AppContext,
    cli::Args,
    config::ConfigManager,
    database, lerror, linfo,
    logging::{self, LogComponent, LogStage},
    web::WebServer,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日志系统
    logging::init_optimized_logging(args.log_level.as_deref());

    let server = match bootstrap(&args).await {
        Ok(server) => server,
        Err(e) => {
            lerror!(
                "system",
                LogStage::Startup,
                LogComponent::Main,
                "startup_failed",
                &format!("启动失败: {e:?}")
            );
            std::process::exit(1);
        }
    };

    server.serve().await?;

    linfo!(
        "system",
        LogStage::Shutdown,
        LogComponent::Main,
        "service_shutdown",
        "服务正常关闭"
    );
    Ok(())
}

/// 加载配置、连接数据库、运行迁移并装配服务器
async fn bootstrap(args: &Args) -> page_analyzer::Result<WebServer> {
    let mut config = ConfigManager::new(args.config.as_deref())?.into_config();
    args.apply_to(&mut config);

    let db = database::init_database(&config.database).await?;
    database::run_migrations(&db).await?;

    let server_config = config.server.clone();
    let context = AppContext::from_config(config, db)?;

    linfo!(
        "system",
        LogStage::Startup,
        LogComponent::Main,
        "service_starting",
        "服务启动"
    );
    Ok(WebServer::new(server_config, Arc::new(context)))
}
