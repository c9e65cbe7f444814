//! # 业务服务
//!
//! 处理器调用的两条业务流程：添加站点、执行检查。
//! 结果以显式的结果枚举返回，由 Web 层决定渲染方式。

use entity::url_checks;

use crate::checker::{CheckError, SiteChecker};
use crate::error::Result;
use crate::logging::{LogComponent, LogStage};
use crate::repository::UrlRepository;
use crate::validator::{self, UrlValidationError};
use crate::{linfo, lwarn};

/// 添加站点的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddUrlOutcome {
    /// 输入未通过校验
    Invalid(UrlValidationError),
    /// 新建成功
    Created(i32),
    /// 规范化后的地址已存在
    Existing(i32),
}

/// 执行检查的结果
#[derive(Debug)]
pub enum CheckOutcome {
    UrlMissing,
    Stored(url_checks::Model),
    Failed(CheckError),
}

/// 校验、规范化并保存站点
///
/// 并发提交同一地址时，输掉唯一约束竞争的一方回读已存在的行。
pub async fn add_url(repo: &UrlRepository, raw: &str) -> Result<AddUrlOutcome> {
    let name = match validator::parse_site_url(raw) {
        Ok(name) => name,
        Err(err) => return Ok(AddUrlOutcome::Invalid(err)),
    };

    if let Some(existing) = repo.find_url_by_name(&name).await? {
        return Ok(AddUrlOutcome::Existing(existing.id));
    }

    match repo.insert_url(&name).await {
        Ok(id) => Ok(AddUrlOutcome::Created(id)),
        Err(err) if err.is_conflict() => {
            lwarn!(
                "system",
                LogStage::Persistence,
                LogComponent::Repository,
                "insert_race",
                &format!("Concurrent insert of {name}, reading existing row")
            );
            match repo.find_url_by_name(&name).await? {
                Some(existing) => Ok(AddUrlOutcome::Existing(existing.id)),
                None => Err(err),
            }
        }
        Err(err) => Err(err),
    }
}

/// 对站点执行一次检查并保存结果
///
/// 抓取失败不落库；抓取成功后的写库失败作为错误返回。
pub async fn run_check(
    repo: &UrlRepository,
    checker: &dyn SiteChecker,
    url_id: i32,
) -> Result<CheckOutcome> {
    let Some(url) = repo.find_url_by_id(url_id).await? else {
        return Ok(CheckOutcome::UrlMissing);
    };

    let result = match checker.check(&url.name).await {
        Ok(result) => result,
        Err(err) => {
            lwarn!(
                "system",
                LogStage::Check,
                LogComponent::Checker,
                "check_failed",
                &format!("Check of {} failed: {err}", url.name)
            );
            return Ok(CheckOutcome::Failed(err));
        }
    };

    match repo.insert_check(url.id, &result).await {
        Ok(check) => {
            linfo!(
                "system",
                LogStage::Check,
                LogComponent::Checker,
                "check_stored",
                &format!(
                    "Stored check {} for {} (status {:?})",
                    check.id, url.name, check.status_code
                )
            );
            Ok(CheckOutcome::Stored(check))
        }
        // 写入时站点已不存在
        Err(err) if err.is_not_found() => Ok(CheckOutcome::UrlMissing),
        Err(err) => Err(err),
    }
}
