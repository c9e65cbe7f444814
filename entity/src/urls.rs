//! # 站点实体定义
//!
//! 用户提交的站点地址，`name` 为规范化后的 `scheme://host`

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 站点名称最大长度（字符）
pub const NAME_MAX_LEN: usize = 255;

/// 站点实体
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "urls")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::url_checks::Entity")]
    UrlChecks,
}

impl Related<super::url_checks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UrlChecks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
