//! LocalStorage 封装模块
//!
//! 使用 `web_sys::Storage` 提供简洁的本地存储接口，并实现核心库的 [`TokenStore`]。

use mindtrack::TokenStore;
use mindtrack_shared::TOKEN_STORAGE_KEY;

/// 本地存储操作封装
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    /// 键不存在或存储不可用时返回 None
    pub fn get(key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    /// 返回是否写入成功
    pub fn set(key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    pub fn delete(key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}

/// 令牌持久化在 `localStorage["token"]`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTokenStore;

impl TokenStore for LocalTokenStore {
    fn get(&self) -> Option<String> {
        LocalStorage::get(TOKEN_STORAGE_KEY).filter(|t| !t.is_empty())
    }

    fn set(&self, token: &str) {
        if !LocalStorage::set(TOKEN_STORAGE_KEY, token) {
            tracing::warn!("failed to persist credential token");
        }
    }

    fn remove(&self) {
        LocalStorage::delete(TOKEN_STORAGE_KEY);
    }
}
