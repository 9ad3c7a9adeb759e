//! 账号服务 - 业务能力层
//!
//! 注册与登录只依赖注入的凭据存储，不访问任何网络服务，
//! 之后可以替换为真正的认证服务。

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::{info, warn};

use crate::error::AccountError;

/// 密码中允许作为"特殊字符"的符号
const SPECIAL_CHARS: &str = "!@#$%^&*()_+[]{};':\"\\|,.<>/?";

/// 凭据存储能力
pub trait CredentialStore: Send + Sync {
    fn get(&self, email: &str) -> Option<String>;
    fn set(&self, email: &str, secret: &str);
    fn has(&self, email: &str) -> bool {
        self.get(email).is_some()
    }
}

/// 进程内凭据存储
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    entries: Mutex<HashMap<String, String>>,
}

impl CredentialStore for InMemoryCredentialStore {
    fn get(&self, email: &str) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(email).cloned())
    }

    fn set(&self, email: &str, secret: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(email.to_string(), secret.to_string());
        }
    }
}

/// 账号服务
pub struct AccountService<S: CredentialStore> {
    store: S,
}

impl<S: CredentialStore> AccountService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// 注册
    pub fn sign_up(&self, email: &str, password: &str, confirm: &str) -> Result<(), AccountError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AccountError::EmptyEmail);
        }
        if !is_strong_password(password) {
            return Err(AccountError::WeakPassword);
        }
        if password != confirm {
            return Err(AccountError::PasswordMismatch);
        }
        if self.store.has(email) {
            warn!("注册失败，用户已存在: {}", email);
            return Err(AccountError::UserExists);
        }

        self.store.set(email, password);
        info!("✓ 账号已创建: {}", email);
        Ok(())
    }

    /// 登录
    pub fn log_in(&self, email: &str, password: &str) -> Result<(), AccountError> {
        match self.store.get(email.trim()) {
            Some(stored) if stored == password => {
                info!("✓ 登录成功: {}", email.trim());
                Ok(())
            }
            _ => Err(AccountError::InvalidCredentials),
        }
    }
}

/// 至少 8 位，包含一个大写字母和一个特殊字符
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= 8
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| SPECIAL_CHARS.contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_rule() {
        assert!(is_strong_password("Secret#123"));
        assert!(!is_strong_password("secret#123"));
        assert!(!is_strong_password("Secret123"));
        assert!(!is_strong_password("S#1"));
    }

    #[test]
    fn test_sign_up_then_log_in() {
        let accounts = AccountService::new(InMemoryCredentialStore::default());

        assert_eq!(
            accounts.sign_up("a@b.com", "Secret#123", "Secret#124"),
            Err(AccountError::PasswordMismatch)
        );
        accounts.sign_up("a@b.com", "Secret#123", "Secret#123").unwrap();
        assert_eq!(
            accounts.sign_up("a@b.com", "Other#1234", "Other#1234"),
            Err(AccountError::UserExists)
        );

        assert!(accounts.log_in("a@b.com", "Secret#123").is_ok());
        assert_eq!(
            accounts.log_in("a@b.com", "wrong"),
            Err(AccountError::InvalidCredentials)
        );
        assert_eq!(
            accounts.log_in("nobody@b.com", "Secret#123"),
            Err(AccountError::InvalidCredentials)
        );
    }
}
