use time::OffsetDateTime;
use tracing::{info, warn};

use crate::{
    auth::{jwt::JwtKeys, password},
    error::AuthError,
    store::{User, UserStore},
};

/// Verify an email/password pair and issue a bearer token for the account's
/// username. Unknown email and wrong password stay distinct here; the
/// boundary collapses them into one response.
pub async fn login(
    store: &dyn UserStore,
    keys: &JwtKeys,
    email: &str,
    password: &str,
    now: OffsetDateTime,
) -> Result<String, AuthError> {
    let user = store
        .find_user_by_email(email)
        .await?
        .ok_or(AuthError::NotFound)?;

    if !password::verify_password(password, &user.hashed_password)? {
        warn!(user_id = user.id, "login with wrong password");
        return Err(AuthError::BadCredentials);
    }

    let token = keys.issue(&user.username, now, keys.ttl)?;
    info!(user_id = user.id, username = %user.username, "login succeeded");
    Ok(token)
}

/// Resolve a bearer token to its user. Token failures propagate unchanged;
/// a subject that no longer resolves is `NotFound`, a disabled account is
/// `Inactive`.
pub async fn authenticate(
    store: &dyn UserStore,
    keys: &JwtKeys,
    token: &str,
    now: OffsetDateTime,
) -> Result<User, AuthError> {
    let subject = keys.validate(token, now)?;

    let user = store
        .find_user_by_username(&subject)
        .await?
        .ok_or(AuthError::NotFound)?;

    if !user.is_active {
        warn!(user_id = user.id, "token for inactive user");
        return Err(AuthError::Inactive);
    }

    Ok(user)
}

/// Replace a user's stored hash with one derived from the new password. The
/// confirmation is checked before any store access, so a mismatch cannot
/// touch the stored hash.
pub async fn reset_password(
    store: &dyn UserStore,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<User, AuthError> {
    if password != confirm_password {
        return Err(AuthError::Mismatch);
    }

    let user = store
        .find_user_by_email(email)
        .await?
        .ok_or(AuthError::NotFound)?;

    let hash = password::hash_password(password)?;
    store.update_user_password_hash(user.id, &hash).await?;
    info!(user_id = user.id, "password reset");

    store
        .find_user_by_id(user.id)
        .await?
        .ok_or(AuthError::NotFound)
}

#[cfg(test)]
mod tests {
    use axum::extract::FromRef;
    use time::Duration as TimeDuration;

    use super::*;
    use crate::{
        state::AppState,
        store::{memory::MemoryStore, NewUser},
    };

    fn make_keys() -> JwtKeys {
        JwtKeys::from_ref(&AppState::fake())
    }

    fn fixed_now() -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap()
    }

    async fn register(store: &MemoryStore, email: &str, username: &str, password: &str) -> User {
        store
            .insert_user(NewUser {
                email: email.into(),
                username: username.into(),
                given_name: "Alice".into(),
                family_name: "Smith".into(),
                hashed_password: password::hash_password(password).expect("hash"),
            })
            .await
            .expect("insert user")
    }

    #[tokio::test]
    async fn register_login_authenticate_roundtrip() {
        let store = MemoryStore::default();
        let keys = make_keys();
        let now = fixed_now();
        let alice = register(&store, "alice@example.com", "alice", "secret123").await;

        let token = login(&store, &keys, "alice@example.com", "secret123", now)
            .await
            .expect("login");
        let user = authenticate(&store, &keys, &token, now)
            .await
            .expect("authenticate");

        assert_eq!(user.id, alice.id);
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn token_outlives_ttl_and_fails_expired() {
        let store = MemoryStore::default();
        let keys = make_keys();
        let now = fixed_now();
        register(&store, "alice@example.com", "alice", "secret123").await;

        let token = login(&store, &keys, "alice@example.com", "secret123", now)
            .await
            .expect("login");
        let after_ttl = now + TimeDuration::seconds(keys.ttl.as_secs() as i64 + 1);
        assert!(matches!(
            authenticate(&store, &keys, &token, after_ttl).await,
            Err(AuthError::Expired)
        ));
    }

    #[tokio::test]
    async fn wrong_password_fails_bad_credentials() {
        let store = MemoryStore::default();
        let keys = make_keys();
        register(&store, "alice@example.com", "alice", "secret123").await;

        assert!(matches!(
            login(&store, &keys, "alice@example.com", "wrong", fixed_now()).await,
            Err(AuthError::BadCredentials)
        ));
    }

    #[tokio::test]
    async fn unknown_email_fails_not_found() {
        let store = MemoryStore::default();
        let keys = make_keys();

        assert!(matches!(
            login(&store, &keys, "nobody@example.com", "secret123", fixed_now()).await,
            Err(AuthError::NotFound)
        ));
    }

    #[tokio::test]
    async fn deleted_subject_fails_not_found() {
        let store = MemoryStore::default();
        let keys = make_keys();
        let now = fixed_now();
        let alice = register(&store, "alice@example.com", "alice", "secret123").await;

        let token = login(&store, &keys, "alice@example.com", "secret123", now)
            .await
            .expect("login");
        store.delete_user(alice.id);

        assert!(matches!(
            authenticate(&store, &keys, &token, now).await,
            Err(AuthError::NotFound)
        ));
    }

    #[tokio::test]
    async fn inactive_user_fails_inactive() {
        let store = MemoryStore::default();
        let keys = make_keys();
        let now = fixed_now();
        let alice = register(&store, "alice@example.com", "alice", "secret123").await;

        let token = login(&store, &keys, "alice@example.com", "secret123", now)
            .await
            .expect("login");
        store.set_active(alice.id, false);

        assert!(matches!(
            authenticate(&store, &keys, &token, now).await,
            Err(AuthError::Inactive)
        ));
    }

    #[tokio::test]
    async fn reset_mismatch_leaves_stored_hash_untouched() {
        let store = MemoryStore::default();
        let keys = make_keys();
        let alice = register(&store, "alice@example.com", "alice", "secret123").await;

        let result = reset_password(&store, "alice@example.com", "newpass99", "different").await;
        assert!(matches!(result, Err(AuthError::Mismatch)));

        let unchanged = store
            .find_user_by_id(alice.id)
            .await
            .expect("lookup")
            .expect("user");
        assert_eq!(unchanged.hashed_password, alice.hashed_password);
        assert!(
            login(&store, &keys, "alice@example.com", "secret123", fixed_now())
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn reset_swaps_which_password_logs_in() {
        let store = MemoryStore::default();
        let keys = make_keys();
        register(&store, "alice@example.com", "alice", "secret123").await;

        reset_password(&store, "alice@example.com", "newpass99", "newpass99")
            .await
            .expect("reset");

        assert!(matches!(
            login(&store, &keys, "alice@example.com", "secret123", fixed_now()).await,
            Err(AuthError::BadCredentials)
        ));
        assert!(
            login(&store, &keys, "alice@example.com", "newpass99", fixed_now())
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn reset_for_unknown_email_fails_not_found() {
        let store = MemoryStore::default();

        assert!(matches!(
            reset_password(&store, "nobody@example.com", "newpass99", "newpass99").await,
            Err(AuthError::NotFound)
        ));
    }
}
