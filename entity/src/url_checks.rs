//! # 站点检查记录实体定义
//!
//! 每次检查产生一条不可变记录

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 文本字段（h1 / title / description）最大长度（字符）
pub const TEXT_FIELD_MAX_LEN: usize = 255;

/// 站点检查记录实体
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "url_checks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub url_id: i32,
    pub status_code: Option<i32>,
    pub h1: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::urls::Entity",
        from = "Column::UrlId",
        to = "super::urls::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Urls,
}

impl Related<super::urls::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Urls.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
