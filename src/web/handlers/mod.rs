pub mod checks;
pub mod system;
pub mod urls;

/// 路径中的站点 ID，非数字按不存在处理
pub(crate) fn parse_url_id(raw: &str) -> Option<i32> {
    raw.parse::<i32>().ok().filter(|id| *id > 0)
}

/// 站点详情页地址
pub(crate) fn url_location(id: i32) -> String {
    format!("/urls/{id}")
}
