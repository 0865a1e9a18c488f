use crate::persistence::store::{KeyValueStore, KEY_USER_ID, KEY_USER_PW};
use anyhow::Result;
use serde_json::Value;
use thiserror::Error;

/// Validation failures for registration and login. Credentials are stored
/// in plaintext; this is a single-user local convenience gate, not security.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("Please fill in every field.")]
    EmptyField,
    #[error("The passwords do not match.")]
    PasswordMismatch,
    #[error("Wrong id or password.")]
    WrongCredentials,
    #[error("No account registered yet. Run `swot register <id>` first.")]
    NotRegistered,
}

/// Store the credential pair after validating the inputs
pub fn register<S: KeyValueStore>(
    store: &mut S,
    id: &str,
    password: &str,
    confirmation: &str,
) -> Result<Result<(), AccountError>> {
    let id = id.trim();
    if id.is_empty() || password.is_empty() || confirmation.is_empty() {
        return Ok(Err(AccountError::EmptyField));
    }
    if password != confirmation {
        return Ok(Err(AccountError::PasswordMismatch));
    }

    store.set(KEY_USER_ID, Value::String(id.to_string()))?;
    store.set(KEY_USER_PW, Value::String(password.to_string()))?;
    Ok(Ok(()))
}

/// Compare against the stored pair
pub fn login<S: KeyValueStore>(
    store: &S,
    id: &str,
    password: &str,
) -> Result<Result<(), AccountError>> {
    if id.is_empty() || password.is_empty() {
        return Ok(Err(AccountError::EmptyField));
    }

    let saved_id = registered_user(store)?;
    let saved_pw = string_value(store, KEY_USER_PW)?;

    match (saved_id, saved_pw) {
        (Some(saved_id), Some(saved_pw)) if saved_id == id && saved_pw == password => Ok(Ok(())),
        (None, _) => Ok(Err(AccountError::NotRegistered)),
        _ => Ok(Err(AccountError::WrongCredentials)),
    }
}

/// The registered user id, if any. The ledger is keyed by it.
pub fn registered_user<S: KeyValueStore>(store: &S) -> Result<Option<String>> {
    string_value(store, KEY_USER_ID)
}

fn string_value<S: KeyValueStore>(store: &S, key: &str) -> Result<Option<String>> {
    Ok(store
        .get(key)?
        .and_then(|v| v.as_str().map(|s| s.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::store::MemoryStore;

    #[test]
    fn test_register_validation() {
        let mut store = MemoryStore::new();

        assert_eq!(
            register(&mut store, "", "pw", "pw").unwrap(),
            Err(AccountError::EmptyField)
        );
        assert_eq!(
            register(&mut store, "alice", "pw", "").unwrap(),
            Err(AccountError::EmptyField)
        );
        assert_eq!(
            register(&mut store, "alice", "pw", "other").unwrap(),
            Err(AccountError::PasswordMismatch)
        );

        // Nothing was written for the failed attempts
        assert_eq!(registered_user(&store).unwrap(), None);
    }

    #[test]
    fn test_register_then_login() {
        let mut store = MemoryStore::new();
        register(&mut store, "alice", "pw", "pw").unwrap().unwrap();

        assert_eq!(registered_user(&store).unwrap(), Some("alice".to_string()));
        assert_eq!(login(&store, "alice", "pw").unwrap(), Ok(()));
        assert_eq!(
            login(&store, "alice", "wrong").unwrap(),
            Err(AccountError::WrongCredentials)
        );
        assert_eq!(
            login(&store, "bob", "pw").unwrap(),
            Err(AccountError::WrongCredentials)
        );
    }

    #[test]
    fn test_login_without_registration() {
        let store = MemoryStore::new();
        assert_eq!(
            login(&store, "alice", "pw").unwrap(),
            Err(AccountError::NotRegistered)
        );
    }

    #[test]
    fn test_reregistration_overwrites() {
        let mut store = MemoryStore::new();
        register(&mut store, "alice", "pw", "pw").unwrap().unwrap();
        register(&mut store, "bob", "secret", "secret").unwrap().unwrap();

        assert_eq!(registered_user(&store).unwrap(), Some("bob".to_string()));
        assert_eq!(login(&store, "bob", "secret").unwrap(), Ok(()));
    }
}
