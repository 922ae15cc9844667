//! 后端错误响应模型
//!
//! 非 2xx 响应携带的 JSON 错误体

use serde::{Deserialize, Serialize};

/// 后端错误响应体
///
/// `all_viewed` 为 true 表示全部股票已浏览完毕，
/// 属于正常的终止信号而非故障
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// 错误信息
    #[serde(default)]
    pub error: Option<String>,
    /// 是否所有股票均已浏览
    #[serde(default)]
    pub all_viewed: bool,
}
