//! # Entity 模块
//!
//! 包含所有 Sea-ORM 实体定义

pub mod url_checks;
pub mod urls;

pub use url_checks::Entity as UrlChecks;
pub use urls::Entity as Urls;
