use recordhub_core::{
    AuthError, CredentialHasher, RecordRepository, Role, SaveOutcome, SessionManager,
    SessionState, Sha256CredentialHasher, SqliteUserRepository, StorageHandle, UpdateOutcome,
    User, ValidationError,
};

#[test]
fn user_save_is_insert_or_ignore() {
    let handle = StorageHandle::open_in_memory().unwrap();
    let repo = SqliteUserRepository::new(&handle);

    let first = User::new("jdoe", "digest-1", Role::Manager);
    let second = User::new("jdoe", "digest-2", Role::Admin);
    assert_eq!(repo.save(&first).unwrap(), SaveOutcome::Inserted);
    assert_eq!(repo.save(&second).unwrap(), SaveOutcome::Ignored);

    let stored = repo.find_by_username("jdoe").unwrap();
    assert_eq!(stored, first);
    assert!(repo.username_exists("jdoe").unwrap());
    assert!(!repo.username_exists("nobody").unwrap());
}

#[test]
fn register_twice_reports_duplicate_and_keeps_one_row() {
    let handle = StorageHandle::open_in_memory().unwrap();
    let sessions = SessionManager::new(&handle);

    let summary = sessions
        .register_new_user("jdoe", "pw", Role::Manager)
        .unwrap();
    assert_eq!(summary.username, "jdoe");
    assert_eq!(summary.role, Role::Manager);

    let err = sessions
        .register_new_user("jdoe", "other", Role::Admin)
        .unwrap_err();
    assert!(matches!(err, AuthError::DuplicateUsername(ref name) if name == "jdoe"));

    let rows: i64 = handle
        .conn()
        .query_row(
            "SELECT COUNT(*) FROM users WHERE username = 'jdoe';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(rows, 1);
    assert_eq!(sessions.get_all_users().unwrap()[0].role, Role::Manager);
}

#[test]
fn register_rejects_blank_username_and_empty_password() {
    let handle = StorageHandle::open_in_memory().unwrap();
    let sessions = SessionManager::new(&handle);

    let blank = sessions
        .register_new_user("   ", "pw", Role::Admin)
        .unwrap_err();
    assert!(matches!(
        blank,
        AuthError::Validation(ValidationError::EmptyField("username"))
    ));

    let empty = sessions
        .register_new_user("jdoe", "", Role::Admin)
        .unwrap_err();
    assert!(matches!(
        empty,
        AuthError::Validation(ValidationError::EmptyField("password"))
    ));
    assert!(sessions.get_all_users().unwrap().is_empty());
}

#[test]
fn stored_digest_is_not_the_plaintext() {
    let handle = StorageHandle::open_in_memory().unwrap();
    let sessions = SessionManager::new(&handle);
    sessions
        .register_new_user("jdoe", "s3cret", Role::HrSpecialist)
        .unwrap();

    let stored: String = handle
        .conn()
        .query_row(
            "SELECT hashed_password FROM users WHERE username = 'jdoe';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_ne!(stored, "s3cret");
    assert_eq!(stored, Sha256CredentialHasher.hash("s3cret"));
}

#[test]
fn login_success_binds_active_user() {
    let handle = StorageHandle::open_in_memory().unwrap();
    let mut sessions = SessionManager::new(&handle);
    sessions
        .register_new_user("jdoe", "pw", Role::DataAnalyst)
        .unwrap();

    assert_eq!(sessions.state(), SessionState::Anonymous);
    let user = sessions.login("jdoe", "pw").unwrap();
    assert_eq!(user.username, "jdoe");

    assert_eq!(sessions.active_role(), Some(Role::DataAnalyst));
    assert!(matches!(sessions.state(), SessionState::Authenticated(user) if user.username == "jdoe"));
}

#[test]
fn unknown_user_and_wrong_password_are_indistinguishable() {
    let handle = StorageHandle::open_in_memory().unwrap();
    let mut sessions = SessionManager::new(&handle);
    sessions.register_new_user("jdoe", "pw", Role::Admin).unwrap();

    let wrong_password = sessions.login("jdoe", "nope").unwrap_err();
    let unknown_user = sessions.login("ghost", "pw").unwrap_err();

    assert!(matches!(wrong_password, AuthError::InvalidCredentials));
    assert!(matches!(unknown_user, AuthError::InvalidCredentials));
    assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    assert!(sessions.active_user().is_none());
}

#[test]
fn failed_login_keeps_previous_session() {
    let handle = StorageHandle::open_in_memory().unwrap();
    let mut sessions = SessionManager::new(&handle);
    sessions.register_new_user("jdoe", "pw", Role::Admin).unwrap();
    sessions.login("jdoe", "pw").unwrap();

    assert!(sessions.login("jdoe", "bad").is_err());
    assert_eq!(sessions.active_user().unwrap().username, "jdoe");
}

#[test]
fn last_login_wins() {
    let handle = StorageHandle::open_in_memory().unwrap();
    let mut sessions = SessionManager::new(&handle);
    sessions.register_new_user("alice", "a", Role::Admin).unwrap();
    sessions
        .register_new_user("bob", "b", Role::CustomerServiceAgent)
        .unwrap();

    sessions.login("alice", "a").unwrap();
    sessions.login("bob", "b").unwrap();

    assert_eq!(sessions.active_user().unwrap().username, "bob");
    assert_eq!(sessions.active_role(), Some(Role::CustomerServiceAgent));
}

#[test]
fn logout_is_safe_when_anonymous() {
    let handle = StorageHandle::open_in_memory().unwrap();
    let mut sessions = SessionManager::new(&handle);
    sessions.logout();
    assert!(sessions.active_user().is_none());

    sessions.register_new_user("jdoe", "pw", Role::Admin).unwrap();
    sessions.login("jdoe", "pw").unwrap();
    sessions.logout();
    sessions.logout();
    assert_eq!(sessions.state(), SessionState::Anonymous);
}

#[test]
fn setup_initial_admin_is_idempotent() {
    let handle = StorageHandle::open_in_memory().unwrap();
    let mut sessions = SessionManager::new(&handle);

    assert!(sessions
        .setup_initial_admin("admin", "password123", Role::Admin)
        .unwrap());
    assert!(!sessions
        .setup_initial_admin("admin", "changed", Role::Manager)
        .unwrap());

    let users = sessions.get_all_users().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].role, Role::Admin);
    assert!(sessions.login("admin", "password123").is_ok());
}

#[test]
fn get_all_users_exposes_no_digest() {
    let handle = StorageHandle::open_in_memory().unwrap();
    let sessions = SessionManager::new(&handle);
    sessions.register_new_user("zed", "pw", Role::Manager).unwrap();
    sessions.register_new_user("amy", "pw", Role::Admin).unwrap();

    let users = sessions.get_all_users().unwrap();
    let names: Vec<&str> = users.iter().map(|user| user.username.as_str()).collect();
    assert_eq!(names, vec!["amy", "zed"]);

    let json = serde_json::to_string(&users).unwrap();
    assert!(!json.contains(&Sha256CredentialHasher.hash("pw")));
    assert!(json.contains("\"Manager\""));
}

#[test]
fn deleting_bound_user_ends_session() {
    let handle = StorageHandle::open_in_memory().unwrap();
    let mut sessions = SessionManager::new(&handle);
    sessions.register_new_user("jdoe", "pw", Role::Admin).unwrap();
    sessions.register_new_user("other", "pw", Role::Manager).unwrap();
    sessions.login("jdoe", "pw").unwrap();

    assert!(sessions.delete_user("other").unwrap());
    assert_eq!(sessions.active_user().unwrap().username, "jdoe");

    assert!(sessions.delete_user("jdoe").unwrap());
    assert!(sessions.active_user().is_none());
    assert!(!sessions.delete_user("jdoe").unwrap());
}

#[test]
fn change_password_replaces_credentials() {
    let handle = StorageHandle::open_in_memory().unwrap();
    let mut sessions = SessionManager::new(&handle);
    sessions.register_new_user("jdoe", "old", Role::Admin).unwrap();

    assert_eq!(
        sessions.change_password("jdoe", "new").unwrap(),
        UpdateOutcome::Updated
    );
    assert!(matches!(
        sessions.login("jdoe", "old").unwrap_err(),
        AuthError::InvalidCredentials
    ));
    assert!(sessions.login("jdoe", "new").is_ok());

    assert_eq!(
        sessions.change_password("ghost", "new").unwrap(),
        UpdateOutcome::NoMatch
    );
}

#[test]
fn change_role_refreshes_active_session() {
    let handle = StorageHandle::open_in_memory().unwrap();
    let mut sessions = SessionManager::new(&handle);
    sessions.register_new_user("jdoe", "pw", Role::DataAnalyst).unwrap();
    sessions.login("jdoe", "pw").unwrap();

    assert_eq!(
        sessions.change_role("jdoe", Role::Manager).unwrap(),
        UpdateOutcome::Updated
    );
    assert_eq!(sessions.active_role(), Some(Role::Manager));
}

struct ReversingHasher;

impl CredentialHasher for ReversingHasher {
    fn hash(&self, password: &str) -> String {
        password.chars().rev().collect()
    }
}

#[test]
fn custom_hasher_is_used_for_register_and_login() {
    let handle = StorageHandle::open_in_memory().unwrap();
    let mut sessions = SessionManager::with_hasher(&handle, ReversingHasher);
    sessions.register_new_user("jdoe", "abc", Role::Admin).unwrap();

    let stored: String = handle
        .conn()
        .query_row(
            "SELECT hashed_password FROM users WHERE username = 'jdoe';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(stored, "cba");
    assert!(sessions.login("jdoe", "abc").is_ok());
}

#[test]
fn padded_usernames_resolve_to_the_same_account() {
    let handle = StorageHandle::open_in_memory().unwrap();
    let mut sessions = SessionManager::new(&handle);
    sessions.register_new_user(" bob ", "pw", Role::Manager).unwrap();
    sessions.login(" bob ", "pw").unwrap();
    assert_eq!(sessions.active_user().unwrap().username, "bob");

    assert_eq!(
        sessions.change_role("bob ", Role::Admin).unwrap(),
        UpdateOutcome::Updated
    );
    assert_eq!(sessions.active_role(), Some(Role::Admin));
    assert_eq!(
        sessions.change_password(" bob", "next").unwrap(),
        UpdateOutcome::Updated
    );

    assert!(sessions.delete_user(" bob ").unwrap());
    assert!(sessions.active_user().is_none());
    assert!(sessions.get_all_users().unwrap().is_empty());
}
