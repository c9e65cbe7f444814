//! # 数据库模块
//!
//! 数据库连接和迁移管理

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use crate::config::DatabaseConfig;
use crate::error::{AnalyzerError, Result};
use crate::logging::{LogComponent, LogStage};
use crate::{lerror, linfo};

/// 初始化数据库连接
///
/// SQLite 文件数据库会先创建目录与文件。
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection> {
    linfo!(
        "system",
        LogStage::Startup,
        LogComponent::Database,
        "db_connect",
        &format!("正在连接数据库: {}", config.redacted_url())
    );

    let url = config.get_connection_url()?;
    // 每个内存数据库连接各自独立，只能使用单连接
    let max_connections = if config.is_memory_database() {
        1
    } else {
        config.max_connections
    };

    let mut options = ConnectOptions::new(url);
    options
        .max_connections(max_connections)
        .connect_timeout(Duration::from_secs(config.connect_timeout))
        .sqlx_logging(false);

    let db = Database::connect(options).await.map_err(|e| {
        AnalyzerError::database_with_source(
            format!("数据库连接失败: {}", config.redacted_url()),
            e,
        )
    })?;

    linfo!(
        "system",
        LogStage::Startup,
        LogComponent::Database,
        "db_connected",
        "数据库连接成功"
    );
    Ok(db)
}

/// 运行数据库迁移
pub async fn run_migrations(db: &DatabaseConnection) -> Result<()> {
    linfo!(
        "system",
        LogStage::Startup,
        LogComponent::Database,
        "migration_start",
        "开始运行数据库迁移..."
    );

    if let Err(e) = ::migration::Migrator::up(db, None).await {
        lerror!(
            "system",
            LogStage::Startup,
            LogComponent::Database,
            "migration_failed",
            &format!("数据库迁移失败: {e}")
        );
        return Err(AnalyzerError::database_with_source("数据库迁移失败", e));
    }

    linfo!(
        "system",
        LogStage::Startup,
        LogComponent::Database,
        "migration_done",
        "数据库迁移完成"
    );
    Ok(())
}

/// 待应用的迁移数量
pub async fn pending_migrations(db: &DatabaseConnection) -> Result<usize> {
    let pending = ::migration::Migrator::get_pending_migrations(db)
        .await
        .map_err(|e| AnalyzerError::database_with_source("读取迁移状态失败", e))?;
    Ok(pending.len())
}
