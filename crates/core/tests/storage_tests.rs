// ═══════════════════════════════════════════════════════════════════
// Storage Tests — MemoryStore, FileStore, AuthService, persistence
// across session restarts
// ═══════════════════════════════════════════════════════════════════

use std::sync::Arc;

use crypto_tracker_core::errors::CoreError;
use crypto_tracker_core::services::auth_service::AuthService;
use crypto_tracker_core::storage::file_store::FileStore;
use crypto_tracker_core::storage::keys;
use crypto_tracker_core::storage::kv::KeyValueStore;
use crypto_tracker_core::storage::memory_store::MemoryStore;

// ═══════════════════════════════════════════════════════════════════
//  MemoryStore
// ═══════════════════════════════════════════════════════════════════

mod memory_store {
    use super::*;

    #[test]
    fn set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("ns", "key").unwrap(), None);

        store.set("ns", "key", "value").unwrap();
        assert_eq!(store.get("ns", "key").unwrap().as_deref(), Some("value"));

        store.set("ns", "key", "updated").unwrap();
        assert_eq!(store.get("ns", "key").unwrap().as_deref(), Some("updated"));

        store.remove("ns", "key").unwrap();
        assert_eq!(store.get("ns", "key").unwrap(), None);
    }

    #[test]
    fn remove_missing_key_is_noop() {
        let store = MemoryStore::new();
        store.remove("ns", "missing").unwrap();
    }

    #[test]
    fn namespaces_are_isolated() {
        let store = MemoryStore::new();
        store.set("user:a", "watchlist", r#"["bitcoin"]"#).unwrap();
        store.set("user:b", "watchlist", r#"["ethereum"]"#).unwrap();

        assert_eq!(
            store.get("user:a", "watchlist").unwrap().as_deref(),
            Some(r#"["bitcoin"]"#)
        );
        assert_eq!(
            store.get("user:b", "watchlist").unwrap().as_deref(),
            Some(r#"["ethereum"]"#)
        );

        store.remove("user:a", "watchlist").unwrap();
        assert!(store.get("user:b", "watchlist").unwrap().is_some());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  FileStore
// ═══════════════════════════════════════════════════════════════════

mod file_store {
    use super::*;

    #[test]
    fn open_creates_root_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("store");
        let store = FileStore::open(&root).unwrap();
        assert!(store.root().exists());
    }

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileStore::open(dir.path()).unwrap();
            store.set("user:u1", "portfolio", "[]").unwrap();
            store.set("user:u1", "watchlist", r#"["bitcoin"]"#).unwrap();
        }

        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get("user:u1", "portfolio").unwrap().as_deref(), Some("[]"));
        assert_eq!(
            store.get("user:u1", "watchlist").unwrap().as_deref(),
            Some(r#"["bitcoin"]"#)
        );
    }

    #[test]
    fn remove_persists() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileStore::open(dir.path()).unwrap();
            store.set("user:u1", "alerts", "[]").unwrap();
            store.remove("user:u1", "alerts").unwrap();
        }
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get("user:u1", "alerts").unwrap(), None);
    }

    #[test]
    fn namespaces_map_to_distinct_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.set("user:a", "watchlist", "[]").unwrap();
        store.set("user:b", "watchlist", "[]").unwrap();

        let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn corrupt_namespace_file_surfaces_deserialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.set("user:u1", "watchlist", "[]").unwrap();

        // Clobber the namespace file on disk.
        let path = std::fs::read_dir(dir.path())
            .unwrap()
            .next()
            .unwrap()
            .unwrap()
            .path();
        std::fs::write(&path, "{{{ not json").unwrap();

        assert!(matches!(
            store.get("user:u1", "watchlist"),
            Err(CoreError::Deserialization(_))
        ));
    }
}

// ═══════════════════════════════════════════════════════════════════
//  AuthService (mock identity)
// ═══════════════════════════════════════════════════════════════════

mod auth {
    use super::*;

    fn service() -> (Arc<MemoryStore>, AuthService) {
        let store = Arc::new(MemoryStore::new());
        let auth = AuthService::new(store.clone());
        (store, auth)
    }

    #[test]
    fn sign_up_creates_and_signs_in_user() {
        let (_, auth) = service();
        let user = auth.sign_up("alice@example.com", "secret1", "Alice").unwrap();
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.display_name, "Alice");

        let current = auth.current_user().unwrap().unwrap();
        assert_eq!(current.id, user.id);
    }

    #[test]
    fn sign_up_validation() {
        let (_, auth) = service();
        assert!(matches!(
            auth.sign_up("no-at-sign", "secret1", "Alice"),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            auth.sign_up("alice@example.com", "short", "Alice"),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            auth.sign_up("alice@example.com", "secret1", "A"),
            Err(CoreError::Validation(_))
        ));
        assert!(auth.current_user().unwrap().is_none());
    }

    #[test]
    fn sign_in_derives_display_name_from_email() {
        let (_, auth) = service();
        let user = auth.sign_in("bob@example.com", "hunter2").unwrap();
        assert_eq!(user.display_name, "bob");
    }

    #[test]
    fn sign_in_validation() {
        let (_, auth) = service();
        assert!(matches!(
            auth.sign_in("bad-email", "hunter2"),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            auth.sign_in("bob@example.com", "12345"),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn sign_out_clears_watchlist_and_portfolio_but_not_alerts() {
        let (store, auth) = service();
        let user = auth.sign_up("alice@example.com", "secret1", "Alice").unwrap();
        let namespace = keys::user_namespace(&user.id);

        store.set(&namespace, keys::WATCHLIST_KEY, r#"["bitcoin"]"#).unwrap();
        store.set(&namespace, keys::PORTFOLIO_KEY, "[]").unwrap();
        store.set(&namespace, keys::ALERTS_KEY, "[]").unwrap();

        auth.sign_out().unwrap();

        assert!(auth.current_user().unwrap().is_none());
        assert_eq!(store.get(&namespace, keys::WATCHLIST_KEY).unwrap(), None);
        assert_eq!(store.get(&namespace, keys::PORTFOLIO_KEY).unwrap(), None);
        assert!(store.get(&namespace, keys::ALERTS_KEY).unwrap().is_some());
    }

    #[test]
    fn sign_out_when_signed_out_is_noop() {
        let (_, auth) = service();
        auth.sign_out().unwrap();
    }

    #[test]
    fn corrupt_user_record_reads_as_signed_out() {
        let (store, auth) = service();
        store.set(keys::AUTH_NAMESPACE, keys::USER_KEY, "garbage").unwrap();
        assert!(auth.current_user().unwrap().is_none());
    }
}
