//! Local mock authentication provider.
//!
//! Accounts live in the `auth_users` table with SHA-256 password digests;
//! the signed-in session is a kv entry, so it survives restarts. State
//! changes go out through an explicit subscription interface: `subscribe`
//! returns a handle, dropping the handle unsubscribes, and the callback is
//! invoked immediately with the current value on subscribe.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{AuthError, Result};
use crate::storage::DiaryDb;

/// kv key holding the signed-in user.
const CURRENT_USER_KEY: &str = "auth_current_user";

/// The signed-in identity attached to wishes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
    pub display_name: String,
}

/// A stored account row. The password is kept only as a digest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthAccount {
    pub uid: String,
    pub email: String,
    pub password_digest: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

impl AuthAccount {
    fn to_user(&self) -> AuthUser {
        AuthUser {
            uid: self.uid.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
        }
    }
}

/// Hex-encoded SHA-256 digest of a password.
fn digest_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

type Callback = Box<dyn FnMut(Option<&AuthUser>) + Send>;

#[derive(Default)]
struct ListenerRegistry {
    next_id: u64,
    callbacks: HashMap<u64, Callback>,
}

/// Handle returned by [`AuthService::subscribe`]; dropping it
/// unsubscribes the callback.
pub struct Subscription {
    registry: Arc<Mutex<ListenerRegistry>>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Ok(mut registry) = self.registry.lock() {
            registry.callbacks.remove(&self.id);
        }
    }
}

/// Mock auth provider over the diary database.
pub struct AuthService<'a> {
    db: &'a DiaryDb,
    current: Mutex<Option<AuthUser>>,
    listeners: Arc<Mutex<ListenerRegistry>>,
}

impl<'a> AuthService<'a> {
    /// Create the service and restore a persisted session, if any.
    pub fn initialize(db: &'a DiaryDb) -> Result<Self> {
        let current = match db.kv_get(CURRENT_USER_KEY)? {
            Some(json) => serde_json::from_str(&json).ok(),
            None => None,
        };
        Ok(AuthService {
            db,
            current: Mutex::new(current),
            listeners: Arc::new(Mutex::new(ListenerRegistry::default())),
        })
    }

    /// Register a new account and sign it in.
    ///
    /// # Errors
    /// `EmailTaken` if an account already exists for the email.
    pub fn register(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<AuthUser> {
        let email = email.trim().to_lowercase();
        if self.db.auth_account_by_email(&email)?.is_some() {
            return Err(AuthError::EmailTaken { email }.into());
        }

        let account = AuthAccount {
            uid: uuid::Uuid::new_v4().to_string(),
            email: email.clone(),
            password_digest: digest_password(password),
            display_name: display_name.unwrap_or("user").to_string(),
            created_at: Utc::now(),
        };
        self.db.save_auth_account(&account)?;

        let user = account.to_user();
        self.set_current(Some(user.clone()))?;
        Ok(user)
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    /// `UserNotFound` for an unknown email, `WrongPassword` for a bad
    /// password.
    pub fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser> {
        let email = email.trim().to_lowercase();
        let account = self
            .db
            .auth_account_by_email(&email)?
            .ok_or(AuthError::UserNotFound {
                email: email.clone(),
            })?;

        if account.password_digest != digest_password(password) {
            return Err(AuthError::WrongPassword.into());
        }

        let user = account.to_user();
        self.set_current(Some(user.clone()))?;
        Ok(user)
    }

    /// Sign out the current session. A no-op when nobody is signed in.
    pub fn sign_out(&self) -> Result<()> {
        self.set_current(None)
    }

    /// Mock password reset: verifies the account exists.
    ///
    /// # Errors
    /// `UserNotFound` for an unknown email.
    pub fn reset_password(&self, email: &str) -> Result<()> {
        let email = email.trim().to_lowercase();
        if self.db.auth_account_by_email(&email)?.is_none() {
            return Err(AuthError::UserNotFound { email }.into());
        }
        Ok(())
    }

    /// The signed-in user, if any.
    pub fn current_user(&self) -> Option<AuthUser> {
        self.current.lock().ok().and_then(|guard| guard.clone())
    }

    /// The signed-in user, or `NotSignedIn`.
    pub fn require_user(&self) -> Result<AuthUser> {
        self.current_user().ok_or_else(|| AuthError::NotSignedIn.into())
    }

    /// Subscribe to auth state changes.
    ///
    /// The callback fires immediately with the current value, then on
    /// every subsequent change until the returned handle is dropped.
    pub fn subscribe<F>(&self, mut callback: F) -> Subscription
    where
        F: FnMut(Option<&AuthUser>) + Send + 'static,
    {
        callback(self.current_user().as_ref());

        let id = {
            let mut registry = self
                .listeners
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            let id = registry.next_id;
            registry.next_id += 1;
            registry.callbacks.insert(id, Box::new(callback));
            id
        };

        Subscription {
            registry: Arc::clone(&self.listeners),
            id,
        }
    }

    fn set_current(&self, user: Option<AuthUser>) -> Result<()> {
        match &user {
            Some(u) => {
                let json = serde_json::to_string(u)?;
                self.db.kv_set(CURRENT_USER_KEY, &json)?;
            }
            None => self.db.kv_remove(CURRENT_USER_KEY)?,
        }

        if let Ok(mut guard) = self.current.lock() {
            *guard = user.clone();
        }
        self.notify(user.as_ref());
        Ok(())
    }

    fn notify(&self, user: Option<&AuthUser>) {
        let mut registry = self
            .listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for callback in registry.callbacks.values_mut() {
            callback(user);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn service(db: &DiaryDb) -> AuthService<'_> {
        AuthService::initialize(db).unwrap()
    }

    #[test]
    fn register_signs_in() {
        let db = DiaryDb::open_memory().unwrap();
        let auth = service(&db);
        let user = auth.register("mia@example.com", "s3cret", Some("Mia")).unwrap();
        assert_eq!(user.email, "mia@example.com");
        assert_eq!(auth.current_user().unwrap().uid, user.uid);
    }

    #[test]
    fn register_rejects_duplicate_email() {
        let db = DiaryDb::open_memory().unwrap();
        let auth = service(&db);
        auth.register("mia@example.com", "one", None).unwrap();
        let err = auth.register("Mia@Example.com", "two", None).unwrap_err();
        assert!(matches!(err, CoreError::Auth(AuthError::EmailTaken { .. })));
    }

    #[test]
    fn sign_in_checks_password() {
        let db = DiaryDb::open_memory().unwrap();
        let auth = service(&db);
        auth.register("mia@example.com", "s3cret", None).unwrap();
        auth.sign_out().unwrap();

        let err = auth.sign_in("mia@example.com", "wrong").unwrap_err();
        assert!(matches!(err, CoreError::Auth(AuthError::WrongPassword)));
        assert!(auth.current_user().is_none());

        let user = auth.sign_in("mia@example.com", "s3cret").unwrap();
        assert_eq!(user.email, "mia@example.com");
    }

    #[test]
    fn sign_in_unknown_email_fails() {
        let db = DiaryDb::open_memory().unwrap();
        let auth = service(&db);
        let err = auth.sign_in("ghost@example.com", "pw").unwrap_err();
        assert!(matches!(err, CoreError::Auth(AuthError::UserNotFound { .. })));
    }

    #[test]
    fn passwords_are_stored_digested() {
        let db = DiaryDb::open_memory().unwrap();
        let auth = service(&db);
        auth.register("mia@example.com", "s3cret", None).unwrap();
        let account = db.auth_account_by_email("mia@example.com").unwrap().unwrap();
        assert_ne!(account.password_digest, "s3cret");
        assert_eq!(account.password_digest.len(), 64);
    }

    #[test]
    fn session_survives_reinitialize() {
        let db = DiaryDb::open_memory().unwrap();
        {
            let auth = service(&db);
            auth.register("mia@example.com", "s3cret", None).unwrap();
        }
        let auth2 = service(&db);
        assert_eq!(auth2.current_user().unwrap().email, "mia@example.com");
    }

    #[test]
    fn reset_password_requires_known_email() {
        let db = DiaryDb::open_memory().unwrap();
        let auth = service(&db);
        assert!(auth.reset_password("ghost@example.com").is_err());
        auth.register("mia@example.com", "pw", None).unwrap();
        assert!(auth.reset_password("mia@example.com").is_ok());
    }

    #[test]
    fn subscribe_fires_immediately_and_on_change() {
        let db = DiaryDb::open_memory().unwrap();
        let auth = service(&db);

        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in_cb = Arc::clone(&calls);
        let sub = auth.subscribe(move |_| {
            calls_in_cb.fetch_add(1, Ordering::SeqCst);
        });

        // Immediate invoke with the current (absent) value.
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        auth.register("mia@example.com", "pw", None).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        auth.sign_out().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        drop(sub);
        auth.sign_in("mia@example.com", "pw").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn require_user_errors_when_signed_out() {
        let db = DiaryDb::open_memory().unwrap();
        let auth = service(&db);
        let err = auth.require_user().unwrap_err();
        assert!(matches!(err, CoreError::Auth(AuthError::NotSignedIn)));
    }
}
