//! 本地持久化存储
//!
//! 简单的键值存储抽象，值为 JSON 字符串
//! 对应浏览器 localStorage 的三个键：浏览记录、收藏列表、引导标记

use std::fs;
use std::path::{Path, PathBuf};

/// 键值存储接口
///
/// 写入失败只记录日志，不向调用方传播
pub trait KvStorage {
    /// 读取键对应的字符串值，不存在返回 None
    fn get(&self, key: &str) -> Option<String>;
    /// 写入键值
    fn set(&mut self, key: &str, value: &str);
}

impl<S: KvStorage + ?Sized> KvStorage for &mut S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) {
        (**self).set(key, value)
    }
}

/// 文件存储实现
///
/// 每个键对应数据目录下的一个 JSON 文件
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// 创建文件存储，确保数据目录存在
    pub fn new<P: AsRef<Path>>(dir: P) -> anyhow::Result<Self> {
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir: dir.as_ref().to_path_buf(),
        })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KvStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.key_path(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) {
        let path = self.key_path(key);
        if let Err(e) = fs::write(&path, value) {
            log::warn!("写入本地数据失败 {}: {}", path.display(), e);
        }
    }
}

/// 内存存储实现，供测试使用
#[cfg(test)]
#[derive(Default)]
pub struct MemoryStorage {
    entries: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl KvStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}
