//! Integration tests for the user model: OAuth profile upsert and role
//! propagation on re-login.

mod common;

use common::setup_test_db;
use ft_nexus::models::user::{self, UpsertUser};

fn profile(id: i64, login: &str, staff: bool) -> UpsertUser {
    UpsertUser {
        id,
        login: login.to_string(),
        email: format!("{login}@student.42.fr"),
        display_name: Some(format!("{login} display")),
        avatar_url: Some("https://cdn.intra.42.fr/users/x.jpg".to_string()),
        is_staff: staff,
        campus_id: Some(12),
    }
}

#[test]
fn test_upsert_creates_with_provider_id() {
    let (_dir, conn) = setup_test_db();

    let created = user::upsert(&conn, &profile(77042, "mrustaci", false)).expect("upsert");
    // The id comes from the identity provider, never generated locally.
    assert_eq!(created.id, 77042);
    assert_eq!(created.login, "mrustaci");
    assert!(!created.is_staff());
    assert_eq!(created.campus_id, Some(12));

    let found = user::find_by_login(&conn, "mrustaci").expect("find").expect("exists");
    assert_eq!(found.id, 77042);
}

#[test]
fn test_upsert_refreshes_profile_and_role() {
    let (_dir, conn) = setup_test_db();
    user::upsert(&conn, &profile(77042, "mrustaci", false)).expect("first login");

    // Second login after a staff promotion and an email change.
    let mut updated = profile(77042, "mrustaci", true);
    updated.email = "mrustaci@42.fr".to_string();
    let saved = user::upsert(&conn, &updated).expect("second login");

    assert!(saved.is_staff());
    assert_eq!(saved.email, "mrustaci@42.fr");

    // Still exactly one row for this id.
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM users WHERE id = 77042", [], |row| row.get(0))
        .expect("count");
    assert_eq!(count, 1);
}

#[test]
fn test_find_missing_user_is_none() {
    let (_dir, conn) = setup_test_db();
    assert!(user::find_by_id(&conn, 1).expect("find").is_none());
    assert!(user::find_by_login(&conn, "ghost").expect("find").is_none());
}
