//! 应用上下文（DI 容器）
//!
//! 统一持有跨模块共享的服务实例，便于在测试中注入替身实现。

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::checker::{HttpSiteChecker, SiteChecker};
use crate::config::AppConfig;
use crate::error::Result;
use crate::logging::{LogComponent, LogStage};
use crate::lwarn;
use crate::repository::UrlRepository;
use crate::web::flash::FlashSigner;

#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub db: Arc<DatabaseConnection>,
    pub repository: UrlRepository,
    pub checker: Arc<dyn SiteChecker>,
    pub flash: FlashSigner,
}

impl AppContext {
    pub fn new(
        config: Arc<AppConfig>,
        db: Arc<DatabaseConnection>,
        checker: Arc<dyn SiteChecker>,
        flash: FlashSigner,
    ) -> Self {
        let repository = UrlRepository::new(db.clone());
        Self { config, db, repository, checker, flash }
    }

    /// 按配置装配生产环境的上下文
    pub fn from_config(config: AppConfig, db: DatabaseConnection) -> Result<Self> {
        let checker = HttpSiteChecker::new(&config.checker)?;
        let flash = match config.session.secret_key.as_deref() {
            Some(secret) if !secret.is_empty() => FlashSigner::new(secret),
            _ => {
                lwarn!(
                    "system",
                    LogStage::Startup,
                    LogComponent::Config,
                    "secret_key_missing",
                    "SECRET_KEY is not set, using a random per-process secret"
                );
                FlashSigner::random()
            }
        };

        Ok(Self::new(Arc::new(config), Arc::new(db), Arc::new(checker), flash))
    }
}
