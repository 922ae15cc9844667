//! 业务逻辑服务模块

pub mod fetcher; // 随机股票获取服务

pub use fetcher::{FetchError, FetchOutcome, RequestState, StockFetcher};
