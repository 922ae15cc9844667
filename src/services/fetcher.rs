//! 随机股票获取服务
//!
//! 对接后端 /api/random-stock 接口，携带已浏览列表做排除，
//! 区分"浏览完毕"信号和真正的失败

use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::config::AppConfig;
use crate::models::{ErrorBody, StockCard};

/// 单次获取周期的状态机
///
/// Idle → Requesting → {Delivered, Exhausted, Failed}
/// 终止态交由调用方处理，不做自动重试
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    Requesting,
    Delivered,
    Exhausted,
    Failed,
}

/// 获取成功的两种结果
#[derive(Debug)]
pub enum FetchOutcome {
    /// 取到一只未浏览过的股票
    Delivered(StockCard),
    /// 排除列表已覆盖全部股票，浏览完毕
    Exhausted,
}

/// 获取失败的分类
///
/// Unreachable 单独成类，调用方据此提示检查后端是否启动
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// 后端不可达（连接失败、DNS、超时等传输层错误）
    #[error("后端服务不可达: {0}")]
    Unreachable(#[source] reqwest::Error),
    /// 后端返回非 2xx 且未标记浏览完毕
    #[error("{message}")]
    Backend { status: u16, message: String },
    /// 已有请求在途，拒绝并发触发
    #[error("已有请求进行中")]
    Busy,
}

/// 随机股票获取器
///
/// 持有 HTTP 客户端和启动时解析好的后端基地址，
/// 自身不做任何持久化，成功后由调用方记录浏览
pub struct StockFetcher {
    client: Client,
    base: Url,
    state: RequestState,
}

impl StockFetcher {
    /// 按配置创建获取器，基地址在此一次性解析
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let base = Url::parse(&config.api.base_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.api.timeout_secs))
            .connect_timeout(Duration::from_secs(config.api.connect_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base,
            state: RequestState::Idle,
        })
    }

    /// 当前获取周期的状态
    pub fn state(&self) -> RequestState {
        self.state
    }

    /// 获取一只排除列表之外的随机股票
    ///
    /// 排除列表必须是调用时刻已浏览集合的完整内容。
    /// 在途期间再次调用返回 `FetchError::Busy`。
    pub async fn fetch_next(&mut self, excluded: &[String]) -> Result<FetchOutcome, FetchError> {
        if self.state == RequestState::Requesting {
            return Err(FetchError::Busy);
        }
        self.state = RequestState::Requesting;

        let url = random_stock_url(&self.base, excluded);
        log::debug!("请求随机股票: {}", url);

        let response = match self.client.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                self.state = RequestState::Failed;
                return Err(FetchError::Unreachable(e));
            }
        };

        let status = response.status().as_u16();
        if (200..300).contains(&status) {
            match response.json::<StockCard>().await {
                Ok(card) => {
                    log::info!("获取到股票: {} {}", card.ts_code, card.name);
                    self.state = RequestState::Delivered;
                    Ok(FetchOutcome::Delivered(card))
                }
                Err(e) => {
                    self.state = RequestState::Failed;
                    Err(FetchError::Backend {
                        status,
                        message: format!("响应解析失败: {}", e),
                    })
                }
            }
        } else {
            let body = response.text().await.unwrap_or_default();
            match interpret_failure(status, &body) {
                FailureKind::Exhausted => {
                    log::info!("所有股票已浏览完毕");
                    self.state = RequestState::Exhausted;
                    Ok(FetchOutcome::Exhausted)
                }
                FailureKind::Backend(message) => {
                    self.state = RequestState::Failed;
                    Err(FetchError::Backend { status, message })
                }
            }
        }
    }

    #[cfg(test)]
    fn set_state(&mut self, state: RequestState) {
        self.state = state;
    }
}

/// 构造随机股票请求地址
///
/// viewed 参数始终存在，排除列表为空时值为空串
fn random_stock_url(base: &Url, excluded: &[String]) -> Url {
    let mut url = base.clone();
    url.set_path("/api/random-stock");
    url.set_query(Some(&format!("viewed={}", excluded.join(","))));
    url
}

/// 非 2xx 响应体的解读结果
enum FailureKind {
    Exhausted,
    Backend(String),
}

/// 解读非 2xx 响应体
///
/// all_viewed 优先于错误信息；响应体不是 JSON 时
/// 以 HTTP 状态码作为兜底文案
fn interpret_failure(status: u16, body: &str) -> FailureKind {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) if parsed.all_viewed => FailureKind::Exhausted,
        Ok(parsed) => FailureKind::Backend(
            parsed.error.unwrap_or_else(|| format!("HTTP {}", status)),
        ),
        Err(_) => FailureKind::Backend(format!("HTTP {}", status)),
    }
}
