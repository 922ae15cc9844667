//! 收藏记录模型

use chrono::Utc;
use chrono_tz::Asia::Shanghai;
use serde::{Deserialize, Serialize};

use crate::models::StockCard;

/// 获取北京时间字符串（ISO 8601 格式，带+08:00时区）
fn beijing_now() -> String {
    Utc::now().with_timezone(&Shanghai).to_rfc3339()
}

/// 收藏记录
///
/// 收藏时从当前卡片摘取最小展示信息并打上收藏时间戳，
/// `ts_code` 在收藏列表内唯一
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteRecord {
    /// 交易所合格代码
    pub ts_code: String,
    /// 公司名称
    pub name: String,
    /// 股票代码
    #[serde(default)]
    pub code: String,
    /// 收藏时间（北京时间，RFC 3339）
    pub saved_at: String,
}

impl FavoriteRecord {
    /// 从当前卡片生成收藏记录
    pub fn from_card(card: &StockCard) -> Self {
        Self {
            ts_code: card.ts_code.clone(),
            name: card.name.clone(),
            code: card.code.clone(),
            saved_at: beijing_now(),
        }
    }
}
