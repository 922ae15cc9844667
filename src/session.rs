//! 会话状态管理
//!
//! 维护两份持久化集合：已浏览股票代码和收藏记录，
//! 外加一次性引导提示的标记。所有变更同步落盘。

use crate::models::FavoriteRecord;
use crate::storage::KvStorage;

/// 已浏览列表的存储键
const VIEWED_KEY: &str = "viewed_stocks";
/// 收藏列表的存储键
const FAVORITES_KEY: &str = "favorite_stocks";
/// 引导标记的存储键
const GUIDE_KEY: &str = "has_seen_guide";

/// 规范化股票标识
///
/// 统一使用大写的交易所合格代码（如 600000.SH），
/// 所有进入会话状态的标识都先经过这里
pub fn normalize_ts_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// 两份集合的当前大小
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionCounts {
    pub viewed: usize,
    pub favorites: usize,
}

/// 会话状态
///
/// 浏览记录与收藏记录的唯一持有者。持久化值损坏时
/// 对应集合静默回退为空，不影响另一份集合。
pub struct SessionState<S: KvStorage> {
    storage: S,
    viewed: Vec<String>,
    favorites: Vec<FavoriteRecord>,
}

impl<S: KvStorage> SessionState<S> {
    /// 从存储加载会话状态
    pub fn load(storage: S) -> Self {
        let viewed = load_collection(&storage, VIEWED_KEY);
        let favorites = load_collection(&storage, FAVORITES_KEY);
        Self {
            storage,
            viewed,
            favorites,
        }
    }

    /// 已浏览的股票代码，按浏览顺序
    pub fn viewed(&self) -> &[String] {
        &self.viewed
    }

    /// 收藏记录，按收藏顺序
    pub fn favorites(&self) -> &[FavoriteRecord] {
        &self.favorites
    }

    /// 记录一只已浏览的股票，重复调用无副作用
    pub fn add_viewed(&mut self, ts_code: &str) {
        let ts_code = normalize_ts_code(ts_code);
        if self.viewed.iter().any(|c| *c == ts_code) {
            return;
        }
        self.viewed.push(ts_code);
        self.save_viewed();
    }

    /// 添加收藏，同代码已存在时不做任何事
    pub fn add_favorite(&mut self, mut record: FavoriteRecord) {
        record.ts_code = normalize_ts_code(&record.ts_code);
        if self.favorites.iter().any(|f| f.ts_code == record.ts_code) {
            return;
        }
        self.favorites.push(record);
        self.save_favorites();
    }

    /// 取消收藏，代码不存在时静默返回
    pub fn remove_favorite(&mut self, ts_code: &str) {
        let ts_code = normalize_ts_code(ts_code);
        let before = self.favorites.len();
        self.favorites.retain(|f| f.ts_code != ts_code);
        if self.favorites.len() != before {
            self.save_favorites();
        }
    }

    /// 清空浏览记录和收藏列表（重新洗牌）
    pub fn reset(&mut self) {
        self.viewed.clear();
        self.favorites.clear();
        self.save_viewed();
        self.save_favorites();
    }

    /// 两份集合的当前大小
    pub fn counts(&self) -> SessionCounts {
        SessionCounts {
            viewed: self.viewed.len(),
            favorites: self.favorites.len(),
        }
    }

    /// 是否已展示过引导提示
    pub fn guide_seen(&self) -> bool {
        self.storage.get(GUIDE_KEY).as_deref() == Some("true")
    }

    /// 标记引导提示已展示
    pub fn mark_guide_seen(&mut self) {
        self.storage.set(GUIDE_KEY, "true");
    }

    fn save_viewed(&mut self) {
        save_collection(&mut self.storage, VIEWED_KEY, &self.viewed);
    }

    fn save_favorites(&mut self) {
        save_collection(&mut self.storage, FAVORITES_KEY, &self.favorites);
    }
}

/// 从存储读取并反序列化一份集合
///
/// 键不存在或 JSON 损坏时回退为空集合，损坏只记录 warn
fn load_collection<S, T>(storage: &S, key: &str) -> Vec<T>
where
    S: KvStorage,
    T: serde::de::DeserializeOwned,
{
    match storage.get(key) {
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(e) => {
                log::warn!("本地数据 {} 已损坏，重置为空: {}", key, e);
                Vec::new()
            }
        },
        None => Vec::new(),
    }
}

fn save_collection<S, T>(storage: &mut S, key: &str, items: &[T])
where
    S: KvStorage,
    T: serde::Serialize,
{
    match serde_json::to_string(items) {
        Ok(json) => storage.set(key, &json),
        Err(e) => log::warn!("序列化本地数据 {} 失败: {}", key, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn favorite(ts_code: &str, name: &str) -> FavoriteRecord {
        FavoriteRecord {
            ts_code: ts_code.to_string(),
            name: name.to_string(),
            code: ts_code.split('.').next().unwrap_or_default().to_string(),
            saved_at: "2025-01-01T09:30:00+08:00".to_string(),
        }
    }

    #[test]
    fn add_viewed_is_idempotent() {
        let mut session = SessionState::load(MemoryStorage::default());
        session.add_viewed("600000.SH");
        session.add_viewed("600000.SH");
        session.add_viewed("600000.sh"); // 规范化后仍是同一只
        assert_eq!(session.viewed(), ["600000.SH"]);
        assert_eq!(session.counts().viewed, 1);
    }

    #[test]
    fn viewed_preserves_insertion_order() {
        let mut session = SessionState::load(MemoryStorage::default());
        session.add_viewed("600000.SH");
        session.add_viewed("000001.SZ");
        session.add_viewed("600519.SH");
        assert_eq!(session.viewed(), ["600000.SH", "000001.SZ", "600519.SH"]);
    }

    #[test]
    fn favorite_round_trip_restores_prior_state() {
        let mut session = SessionState::load(MemoryStorage::default());
        session.add_favorite(favorite("600000.SH", "浦发银行"));

        session.add_favorite(favorite("000001.SZ", "平安银行"));
        session.remove_favorite("000001.SZ");

        assert_eq!(session.counts().favorites, 1);
        assert_eq!(session.favorites()[0].ts_code, "600000.SH");
    }

    #[test]
    fn add_favorite_deduplicates_by_ts_code() {
        let mut session = SessionState::load(MemoryStorage::default());
        session.add_favorite(favorite("600000.SH", "浦发银行"));
        session.add_favorite(favorite("600000.sh", "浦发银行"));
        assert_eq!(session.counts().favorites, 1);
    }

    #[test]
    fn remove_absent_favorite_is_silent() {
        let mut session = SessionState::load(MemoryStorage::default());
        session.remove_favorite("600000.SH");
        assert_eq!(session.counts().favorites, 0);
    }

    #[test]
    fn load_recovers_from_corrupt_viewed() {
        let mut storage = MemoryStorage::default();
        storage.set(VIEWED_KEY, "not-json{{{");
        storage.set(FAVORITES_KEY, r#"[{"ts_code":"600000.SH","name":"浦发银行","code":"600000","saved_at":"2025-01-01T09:30:00+08:00"}]"#);

        let session = SessionState::load(storage);
        // 损坏的集合回退为空，另一份不受影响
        assert_eq!(session.counts().viewed, 0);
        assert_eq!(session.counts().favorites, 1);
    }

    #[test]
    fn load_recovers_from_corrupt_favorites() {
        let mut storage = MemoryStorage::default();
        storage.set(VIEWED_KEY, r#"["600000.SH"]"#);
        storage.set(FAVORITES_KEY, "[{]");

        let session = SessionState::load(storage);
        assert_eq!(session.counts().viewed, 1);
        assert_eq!(session.counts().favorites, 0);
    }

    #[test]
    fn reset_empties_both_collections() {
        let mut session = SessionState::load(MemoryStorage::default());
        session.add_viewed("600000.SH");
        session.add_favorite(favorite("600000.SH", "浦发银行"));

        session.reset();

        let counts = session.counts();
        assert_eq!(counts.viewed, 0);
        assert_eq!(counts.favorites, 0);
    }

    #[test]
    fn state_survives_reload_through_storage() {
        let mut storage = MemoryStorage::default();
        {
            let mut session = SessionState::load(&mut storage);
            session.add_viewed("600000.SH");
            session.add_favorite(favorite("600000.SH", "浦发银行"));
        }
        let session = SessionState::load(&mut storage);
        assert_eq!(session.viewed(), ["600000.SH"]);
        assert_eq!(session.favorites()[0].name, "浦发银行");
    }

    #[test]
    fn guide_flag_round_trip() {
        let mut session = SessionState::load(MemoryStorage::default());
        assert!(!session.guide_seen());
        session.mark_guide_seen();
        assert!(session.guide_seen());
    }

    #[test]
    fn normalize_uppercases_and_trims() {
        assert_eq!(normalize_ts_code(" 600000.sh "), "600000.SH");
    }
}
