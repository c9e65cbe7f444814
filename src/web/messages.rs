//! 用户可见的提示文案

pub const PAGE_ADDED: &str = "Page successfully added";
pub const PAGE_EXISTS: &str = "Page already exists";
pub const PAGE_NOT_FOUND: &str = "Page not found";
pub const ADD_FAILED: &str = "An error occurred while adding the URL";

pub const SITE_NOT_FOUND: &str = "Site not found";
pub const CHECK_SUCCEEDED: &str = "Page successfully checked";
pub const CHECK_FAILED: &str = "An error occurred during the check";
pub const CHECK_SAVE_FAILED: &str = "An error occurred while saving the check";
