//! 股票卡片数据模型
//!
//! 定义后端 /api/random-stock 返回的完整股票数据结构
//! 后端字段可能缺失，所有非关键字段均容忍缺省

use serde::{Deserialize, Serialize};

/// 股票卡片
///
/// 一张闪卡对应一家上市公司，包含行情、市值、股东、
/// 主营业务和财务指标等信息，按后端返回原样使用
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockCard {
    /// 交易所合格代码（如 600000.SH），全局唯一标识
    pub ts_code: String,
    /// 股票代码（如 600000）
    #[serde(default)]
    pub code: String,
    /// 公司名称
    pub name: String,
    /// 最新收盘价
    #[serde(default)]
    pub price: f64,
    /// 涨跌幅（百分比）
    #[serde(default)]
    pub pct_chg: f64,
    /// 总市值（亿元）
    #[serde(default)]
    pub market_value: f64,
    /// 所属行业
    #[serde(default)]
    pub industry: String,
    /// 所在地域
    #[serde(default)]
    pub area: String,
    /// 上市日期（YYYYMMDD）
    #[serde(default)]
    pub list_date: String,
    /// 财务指标
    #[serde(default)]
    pub financial: FinancialRatios,
    /// 股东信息（后端可能缺失）
    #[serde(default)]
    pub holder: Option<HolderInfo>,
    /// 主营业务
    #[serde(default)]
    pub main_business: String,
    /// 经营范围
    #[serde(default)]
    pub business_scope: String,
    /// 公司简介
    #[serde(default)]
    pub introduction: String,
    /// 公司 Logo 地址
    #[serde(default)]
    pub logo_url: String,
    /// 财务指标的历史比较数据（逐项可选）
    #[serde(default)]
    pub historical_comparison: HistoricalComparison,
    /// 后端缓存时间
    #[serde(default)]
    pub cached_time: String,
    /// 是否来自后端缓存
    #[serde(default)]
    pub from_cache: bool,
}

impl StockCard {
    /// 业务描述摘要
    ///
    /// 按主营业务 > 经营范围 > 公司简介的优先级取值，
    /// 超过 100 个字符截断并补省略号
    pub fn business_brief(&self) -> String {
        let text = [&self.main_business, &self.business_scope, &self.introduction]
            .into_iter()
            .find(|s| !s.is_empty())
            .map(String::as_str)
            .unwrap_or("暂无业务描述");

        if text.chars().count() > 100 {
            let head: String = text.chars().take(100).collect();
            format!("{}...", head)
        } else {
            text.to_string()
        }
    }
}

/// 财务指标
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinancialRatios {
    /// 净资产收益率（%）
    #[serde(default)]
    pub roe: f64,
    /// 市盈率
    #[serde(default)]
    pub pe: f64,
    /// 市净率
    #[serde(default)]
    pub pb: f64,
    /// 毛利率（%）
    #[serde(default)]
    pub gross_profit_margin: f64,
    /// 资产负债率（%）
    #[serde(default)]
    pub debt_to_asset_ratio: f64,
}

/// 股东信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolderInfo {
    /// 股东户数
    #[serde(default)]
    pub holder_num: u64,
    /// 户均持股金额（万元）
    #[serde(default)]
    pub holder_avg_amount: f64,
}

/// 财务指标历史比较集合
///
/// 每项指标的比较数据由后端按可得性提供，缺失项为 None
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoricalComparison {
    #[serde(default)]
    pub roe: Option<MetricComparison>,
    #[serde(default)]
    pub pe: Option<MetricComparison>,
    #[serde(default)]
    pub pb: Option<MetricComparison>,
    #[serde(default)]
    pub gross_profit_margin: Option<MetricComparison>,
    #[serde(default)]
    pub debt_to_asset_ratio: Option<MetricComparison>,
}

/// 单项指标相对历史均值的比较
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricComparison {
    /// 在 0.5~2.0 倍均值区间内的线性百分位（0-100）
    pub percentile: f64,
    /// 当前值 / 历史均值
    pub ratio: f64,
    /// 当前值
    pub current: f64,
    /// 近 5 年历史均值
    pub historical_avg: f64,
    /// 相对均值的百分比差异
    pub vs_avg: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_brief_prefers_main_business() {
        let mut card = sample_card();
        card.main_business = "商业银行业务".to_string();
        card.business_scope = "吸收公众存款".to_string();
        assert_eq!(card.business_brief(), "商业银行业务");
    }

    #[test]
    fn business_brief_falls_back_in_order() {
        let mut card = sample_card();
        card.business_scope = "吸收公众存款".to_string();
        assert_eq!(card.business_brief(), "吸收公众存款");

        card.business_scope.clear();
        assert_eq!(card.business_brief(), "暂无业务描述");
    }

    #[test]
    fn business_brief_truncates_by_chars() {
        let mut card = sample_card();
        card.main_business = "银".repeat(150);
        let brief = card.business_brief();
        assert!(brief.ends_with("..."));
        assert_eq!(brief.chars().count(), 103);
    }

    #[test]
    fn deserializes_minimal_payload() {
        // 后端降级时只保证 ts_code 和 name
        let card: StockCard =
            serde_json::from_str(r#"{"ts_code":"600000.SH","name":"浦发银行"}"#).unwrap();
        assert_eq!(card.ts_code, "600000.SH");
        assert_eq!(card.price, 0.0);
        assert!(card.holder.is_none());
        assert!(card.historical_comparison.roe.is_none());
    }

    #[test]
    fn deserializes_historical_comparison() {
        let json = r#"{
            "ts_code": "600000.SH",
            "name": "浦发银行",
            "financial": {"roe": 10.5, "pe": 5.2, "pb": 0.6},
            "historical_comparison": {
                "roe": {"percentile": 62.0, "ratio": 1.12, "current": 10.5,
                        "historical_avg": 9.4, "vs_avg": 12.0}
            }
        }"#;
        let card: StockCard = serde_json::from_str(json).unwrap();
        let roe = card.historical_comparison.roe.unwrap();
        assert_eq!(roe.percentile, 62.0);
        assert_eq!(roe.vs_avg, 12.0);
        assert!(card.historical_comparison.pe.is_none());
    }

    fn sample_card() -> StockCard {
        serde_json::from_str(r#"{"ts_code":"600000.SH","name":"浦发银行"}"#).unwrap()
    }
}
