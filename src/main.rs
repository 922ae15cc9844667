//! A股上市公司闪卡 - 终端客户端
//!
//! 从后端随机抽取一只未浏览过的A股，逐张展示公司概况和财务指标，
//! 支持收藏、放弃、重新洗牌；浏览记录与收藏列表持久化在本地

mod config;    // 配置加载
mod models;    // 数据模型定义
mod services;  // 随机股票获取服务
mod session;   // 会话状态管理
mod storage;   // 本地持久化存储

use std::io::{self, BufRead, Write};

use env_logger::Env;

use crate::config::AppConfig;
use crate::models::{FavoriteRecord, MetricComparison, StockCard};
use crate::services::{FetchError, FetchOutcome, StockFetcher};
use crate::session::SessionState;
use crate::storage::{FileStorage, KvStorage};

/// 应用程序入口
///
/// 初始化日志与本地存储，进入命令行交互循环
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志系统，默认日志级别为 info
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::load();
    let storage = FileStorage::new(&config.storage.data_dir)?;
    let mut session = SessionState::load(storage);
    let mut fetcher = StockFetcher::new(&config)?;

    log::info!("启动A股闪卡客户端，后端地址: {}", config.api.base_url);

    if !session.guide_seen() {
        print_guide();
    }
    print_counts(&session);

    let mut current = next_card(&mut fetcher, &mut session).await;
    if let Some(card) = &current {
        print_card(card);
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("闪卡> ");
        io::stdout().flush().ok();
        let line = match lines.next() {
            Some(Ok(line)) => line,
            _ => break,
        };

        match line.trim() {
            "" | "n" | "d" => {
                // 放弃当前卡片，抽下一张
                session.mark_guide_seen();
                current = next_card(&mut fetcher, &mut session).await;
                if let Some(card) = &current {
                    print_card(card);
                }
            }
            "l" => {
                if let Some(card) = &current {
                    session.add_favorite(FavoriteRecord::from_card(card));
                    println!("已收藏 {} ({})", card.name, card.code);
                    session.mark_guide_seen();
                    current = next_card(&mut fetcher, &mut session).await;
                    if let Some(card) = &current {
                        print_card(card);
                    }
                } else {
                    println!("当前没有可收藏的卡片（回车抽下一张）");
                }
            }
            "f" => print_favorites(&session),
            "c" => print_counts(&session),
            "s" => {
                println!("确定要重新开始吗？这将清空浏览记录和收藏列表。(y/N)");
                if matches!(lines.next(), Some(Ok(ans)) if ans.trim().eq_ignore_ascii_case("y")) {
                    session.reset();
                    print_counts(&session);
                    current = next_card(&mut fetcher, &mut session).await;
                    if let Some(card) = &current {
                        print_card(card);
                    }
                }
            }
            "h" | "?" => print_guide(),
            "q" => break,
            cmd if cmd.starts_with("rm ") => {
                session.remove_favorite(cmd.trim_start_matches("rm ").trim());
                print_favorites(&session);
            }
            other => println!("未知命令: {}（输入 h 查看帮助）", other),
        }
    }

    Ok(())
}

/// 抽取下一张卡片并记录浏览
///
/// 所有失败路径只打印提示，循环保持可用
async fn next_card<S: KvStorage>(
    fetcher: &mut StockFetcher,
    session: &mut SessionState<S>,
) -> Option<StockCard> {
    let excluded = session.viewed().to_vec();
    match fetcher.fetch_next(&excluded).await {
        Ok(FetchOutcome::Delivered(card)) => {
            session.add_viewed(&card.ts_code);
            Some(card)
        }
        Ok(FetchOutcome::Exhausted) => {
            println!("恭喜！您已经浏览完所有股票了！（输入 s 重新洗牌）");
            None
        }
        Err(FetchError::Unreachable(e)) => {
            log::error!("后端不可达: {}", e);
            println!("加载失败，请检查：");
            println!("1. 后端服务是否启动");
            println!("2. 端口 5000 是否被占用");
            println!("3. 网络连接是否正常");
            None
        }
        Err(e) => {
            println!("加载失败: {}", e);
            None
        }
    }
}

/// 打印一张股票卡片
fn print_card(card: &StockCard) {
    let sign = if card.pct_chg > 0.0 { "+" } else { "" };
    println!();
    println!("──────────────────────────────────────────────");
    println!(
        " {} ({})  {:.2} 元  {}{:.2}%",
        card.name, card.code, card.price, sign, card.pct_chg
    );
    let industry = if card.industry.is_empty() { "未分类" } else { card.industry.as_str() };
    println!(" 市值 {:.2} 亿    行业: {}", card.market_value, industry);

    match &card.holder {
        Some(h) if h.holder_num > 0 => println!(
            " 股东户数 {}    户均持股 {:.2} 万元",
            h.holder_num,
            h.holder_avg_amount / 10000.0
        ),
        _ => println!(" 股东户数 ---    户均持股 ---"),
    }

    println!(" 主营业务: {}", card.business_brief());

    let f = &card.financial;
    let h = &card.historical_comparison;
    println!(" ROE    {}", metric_line(&format!("{:.2}%", f.roe), &h.roe));
    println!(" PE     {}", metric_line(&format!("{:.2}", f.pe), &h.pe));
    println!(" PB     {}", metric_line(&format!("{:.2}", f.pb), &h.pb));
    println!(
        " 毛利率 {}",
        metric_line(&format!("{:.2}%", f.gross_profit_margin), &h.gross_profit_margin)
    );
    println!(
        " 负债率 {}",
        metric_line(&format!("{:.2}%", f.debt_to_asset_ratio), &h.debt_to_asset_ratio)
    );
    println!("──────────────────────────────────────────────");
}

/// 单项财务指标展示，带可选的历史均值比较
fn metric_line(value: &str, comparison: &Option<MetricComparison>) -> String {
    match comparison {
        Some(c) => {
            let sign = if c.vs_avg > 0.0 { "+" } else { "" };
            format!("{}  vs 5年均值 {}{}%", value, sign, c.vs_avg)
        }
        None => value.to_string(),
    }
}

fn print_favorites<S: KvStorage>(session: &SessionState<S>) {
    if session.favorites().is_empty() {
        println!("还没有收藏任何公司");
        return;
    }
    for record in session.favorites() {
        println!("  {} ({})  收藏于 {}", record.name, record.code, record.saved_at);
    }
}

fn print_counts<S: KvStorage>(session: &SessionState<S>) {
    let counts = session.counts();
    println!("已浏览 {} 只，收藏 {} 只", counts.viewed, counts.favorites);
}

fn print_guide() {
    println!("操作说明：");
    println!("  回车/n/d  放弃当前公司，看下一张");
    println!("  l         收藏当前公司并看下一张");
    println!("  f         查看收藏列表");
    println!("  rm <代码> 取消收藏（如 rm 600000.SH）");
    println!("  s         重新洗牌（清空浏览记录和收藏）");
    println!("  c         查看统计");
    println!("  q         退出");
}
