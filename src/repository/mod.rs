//! # 站点仓储
//!
//! `urls` 与 `url_checks` 两张表的全部读写。唯一性由数据库唯一索引保证，
//! 冲突以 `AnalyzerError::Conflict` 返回给调用方。

use std::sync::Arc;

use chrono::{NaiveDateTime, Utc};
use entity::{UrlChecks, Urls, url_checks, urls};
use sea_orm::sea_query::{Expr, Order, Query, SimpleExpr, SubQueryStatement};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::checker::{CheckResult, truncate_field};
use crate::error::{AnalyzerError, Context, Result};
use crate::logging::{LogComponent, LogStage};
use crate::{ldebug, linfo};

/// 站点列表中的一行：站点及其最近一次检查
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct UrlListItem {
    pub id: i32,
    pub name: String,
    pub created_at: NaiveDateTime,
    pub last_checked_at: Option<NaiveDateTime>,
    pub last_status_code: Option<i32>,
}

/// 站点仓储
#[derive(Debug, Clone)]
pub struct UrlRepository {
    db: Arc<DatabaseConnection>,
}

impl UrlRepository {
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// 底层连接
    #[must_use]
    pub fn connection(&self) -> &DatabaseConnection {
        self.db.as_ref()
    }

    /// 按规范化名称查找站点
    pub async fn find_url_by_name(&self, name: &str) -> Result<Option<urls::Model>> {
        Urls::find()
            .filter(urls::Column::Name.eq(name))
            .one(self.connection())
            .await
            .context("Failed to look up url by name")
    }

    pub async fn find_url_by_id(&self, id: i32) -> Result<Option<urls::Model>> {
        Urls::find_by_id(id)
            .one(self.connection())
            .await
            .context("Failed to look up url by id")
    }

    /// 列出全部站点，按创建时间倒序，附带最近一次检查
    ///
    /// 最近一次检查在数据库中按 `created_at`、`id` 倒序取第一条。
    pub async fn list_urls(&self) -> Result<Vec<UrlListItem>> {
        Urls::find()
            .select_only()
            .column(urls::Column::Id)
            .column(urls::Column::Name)
            .column(urls::Column::CreatedAt)
            .expr_as(latest_check_column(url_checks::Column::CreatedAt), "last_checked_at")
            .expr_as(latest_check_column(url_checks::Column::StatusCode), "last_status_code")
            .order_by_desc(urls::Column::CreatedAt)
            .order_by_desc(urls::Column::Id)
            .into_model::<UrlListItem>()
            .all(self.connection())
            .await
            .context("Failed to list urls")
    }

    /// 插入站点，返回新 id
    ///
    /// 名称已存在时返回 `Conflict`。
    pub async fn insert_url(&self, name: &str) -> Result<i32> {
        let len = name.chars().count();
        if len > urls::NAME_MAX_LEN {
            return Err(AnalyzerError::validation(
                format!("URL exceeds {} characters", urls::NAME_MAX_LEN),
                Some("name".to_string()),
            ));
        }

        let model = urls::ActiveModel {
            name: Set(name.to_string()),
            created_at: Set(now()),
            ..Default::default()
        };

        let inserted = model.insert(self.connection()).await.map_err(|e| {
            let err = AnalyzerError::from(e);
            if err.is_conflict() {
                AnalyzerError::conflict("url", name)
            } else {
                err
            }
        })?;

        linfo!(
            "system",
            LogStage::Persistence,
            LogComponent::Repository,
            "url_inserted",
            &format!("Inserted url {} as id {}", inserted.name, inserted.id)
        );
        Ok(inserted.id)
    }

    /// 某站点的全部检查记录，最新在前
    pub async fn list_checks(&self, url_id: i32) -> Result<Vec<url_checks::Model>> {
        UrlChecks::find()
            .filter(url_checks::Column::UrlId.eq(url_id))
            .order_by_desc(url_checks::Column::CreatedAt)
            .order_by_desc(url_checks::Column::Id)
            .all(self.connection())
            .await
            .context("Failed to list url checks")
    }

    /// 写入一次检查结果
    ///
    /// 站点不存在时返回 `NotFound`；文本字段超长时截断。
    pub async fn insert_check(&self, url_id: i32, result: &CheckResult) -> Result<url_checks::Model> {
        if self.find_url_by_id(url_id).await?.is_none() {
            return Err(AnalyzerError::not_found("url", url_id.to_string()));
        }

        let model = url_checks::ActiveModel {
            url_id: Set(url_id),
            status_code: Set(result.status_code.map(i32::from)),
            h1: Set(result.h1.as_deref().map(truncate_field)),
            title: Set(result.title.as_deref().map(truncate_field)),
            description: Set(result.description.as_deref().map(truncate_field)),
            created_at: Set(now()),
            ..Default::default()
        };

        // 外键约束失败同样视为站点不存在
        let inserted = model.insert(self.connection()).await.map_err(|e| {
            let err = AnalyzerError::from(e);
            if err.is_not_found() {
                AnalyzerError::not_found("url", url_id.to_string())
            } else {
                err
            }
        })?;

        ldebug!(
            "system",
            LogStage::Persistence,
            LogComponent::Repository,
            "check_inserted",
            &format!("Inserted check {} for url {}", inserted.id, url_id)
        );
        Ok(inserted)
    }

    pub async fn count_urls(&self) -> Result<u64> {
        Urls::find()
            .count(self.connection())
            .await
            .context("Failed to count urls")
    }

    pub async fn count_checks(&self, url_id: i32) -> Result<u64> {
        UrlChecks::find()
            .filter(url_checks::Column::UrlId.eq(url_id))
            .count(self.connection())
            .await
            .context("Failed to count url checks")
    }
}

/// 外层站点最近一次检查的某一列（关联标量子查询）
fn latest_check_column(column: url_checks::Column) -> SimpleExpr {
    let latest = Query::select()
        .column((UrlChecks, column))
        .from(UrlChecks)
        .and_where(
            Expr::col((UrlChecks, url_checks::Column::UrlId)).equals((Urls, urls::Column::Id)),
        )
        .order_by((UrlChecks, url_checks::Column::CreatedAt), Order::Desc)
        .order_by((UrlChecks, url_checks::Column::Id), Order::Desc)
        .limit(1)
        .to_owned();
    SimpleExpr::SubQuery(None, Box::new(SubQueryStatement::SelectStatement(latest)))
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}
