#![allow(clippy::unwrap_used)]

use super::*;

// ── Schema & seeding ──────────────────────────────────────────

#[test]
fn test_seed_category_present() {
    let db = Database::open_in_memory().unwrap();
    let cat = db
        .get_category_by_name(Category::SEED_NAME)
        .unwrap()
        .unwrap();
    assert_eq!(cat.id, Some(Category::SEED_ID));
    assert_eq!(cat.name, Category::SEED_NAME);
}

#[test]
fn test_seed_category_not_duplicated() {
    let mut db = Database::open_in_memory().unwrap();
    db.seed_default_category().unwrap();
    db.seed_default_category().unwrap();
    let cats = db.get_categories().unwrap();
    let seeded = cats
        .iter()
        .filter(|c| c.name == Category::SEED_NAME)
        .count();
    assert_eq!(seeded, 1);
}

#[test]
fn test_category_lookup_is_exact_match() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.get_category_by_name("idea").unwrap().is_some());
    assert!(db.get_category_by_name("Idea").unwrap().is_none());
    assert!(db.get_category_by_name("errand").unwrap().is_none());
}

#[test]
fn test_reopen_preserves_data_and_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tas.db");
    {
        let db = Database::open(&path).unwrap();
        db.insert_user(&User::new("alice".into())).unwrap();
    }
    // Second open runs the same ensure path against an existing file.
    let db = Database::open(&path).unwrap();
    let users = db.get_users().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].username, "alice");
    assert!(db
        .get_category_by_name(Category::SEED_NAME)
        .unwrap()
        .is_some());
}

// ── Users ─────────────────────────────────────────────────────

#[test]
fn test_insert_and_list_users_in_id_order() {
    let db = Database::open_in_memory().unwrap();
    let before = chrono::Utc::now().timestamp();
    db.insert_user(&User::new("alice".into())).unwrap();
    db.insert_user(&User::new("bob".into())).unwrap();

    let users = db.get_users().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].username, "alice");
    assert_eq!(users[1].username, "bob");
    assert!(users[0].id.unwrap() < users[1].id.unwrap());
    assert!(users[0].created_at >= before);
}

#[test]
fn test_duplicate_user_rejected() {
    let db = Database::open_in_memory().unwrap();
    db.insert_user(&User::new("alice".into())).unwrap();
    let err = db.insert_user(&User::new("alice".into())).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<TasError>(),
        Some(TasError::DuplicateUser(name)) if name == "alice"
    ));
    assert_eq!(db.count_users().unwrap(), 1);
}

#[test]
fn test_user_by_id_not_found() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.get_user_by_id(99999).unwrap().is_none());
}

// ── Settings ──────────────────────────────────────────────────

#[test]
fn test_default_user_initially_unset() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(db.get_default_user_id().unwrap(), None);
}

#[test]
fn test_default_user_upsert_keeps_single_row() {
    let db = Database::open_in_memory().unwrap();
    let alice = db.insert_user(&User::new("alice".into())).unwrap();
    let bob = db.insert_user(&User::new("bob".into())).unwrap();

    db.set_default_user(alice).unwrap();
    db.set_default_user(bob).unwrap();

    assert_eq!(db.get_default_user_id().unwrap(), Some(bob));
    assert_eq!(db.count_settings_rows().unwrap(), 1);
}

#[test]
fn test_default_user_not_validated_at_write() {
    // The upsert accepts ids with no matching user row; dependent
    // operations are the validation point.
    let db = Database::open_in_memory().unwrap();
    db.set_default_user(42).unwrap();
    assert_eq!(db.get_default_user_id().unwrap(), Some(42));
}

// ── Notes ─────────────────────────────────────────────────────

fn seeded_user(db: &Database, name: &str) -> i64 {
    let id = db.insert_user(&User::new(name.into())).unwrap();
    db.set_default_user(id).unwrap();
    id
}

#[test]
fn test_insert_and_list_open_notes() {
    let db = Database::open_in_memory().unwrap();
    let uid = seeded_user(&db, "alice");
    db.insert_note(&Note::new(uid, Category::SEED_ID, "buy milk".into()))
        .unwrap();
    db.insert_note(&Note::new(uid, Category::SEED_ID, "write paper".into()))
        .unwrap();

    let open = db.get_open_notes().unwrap();
    assert_eq!(open.len(), 2);
    assert_eq!(open[0].content, "buy milk");
    assert_eq!(open[0].username, "alice");
    assert_eq!(open[0].category, "idea");
    assert!(open[0].id < open[1].id);
}

#[test]
fn test_complete_note_is_a_soft_delete() {
    let db = Database::open_in_memory().unwrap();
    let uid = seeded_user(&db, "alice");
    let id = db
        .insert_note(&Note::new(uid, Category::SEED_ID, "buy milk".into()))
        .unwrap();

    assert_eq!(db.get_open_notes().unwrap().len(), 1);
    db.complete_note(id).unwrap();
    assert!(db.get_open_notes().unwrap().is_empty());
    // The row itself survives.
    assert_eq!(db.count_notes().unwrap(), 1);
}

#[test]
fn test_complete_is_existence_gated_not_state_gated() {
    let db = Database::open_in_memory().unwrap();
    let uid = seeded_user(&db, "alice");
    let id = db
        .insert_note(&Note::new(uid, Category::SEED_ID, "buy milk".into()))
        .unwrap();

    db.complete_note(id).unwrap();
    // Re-marking a done note is still a success.
    db.complete_note(id).unwrap();
    assert!(db.get_open_notes().unwrap().is_empty());
}

#[test]
fn test_complete_missing_note() {
    let db = Database::open_in_memory().unwrap();
    let err = db.complete_note(7).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<TasError>(),
        Some(TasError::NoteNotFound(7))
    ));
}

#[test]
fn test_note_foreign_keys_enforced() {
    let db = Database::open_in_memory().unwrap();
    // No user with id 999 exists; the insert must not create an orphan.
    let result = db.insert_note(&Note::new(999, Category::SEED_ID, "orphan".into()));
    assert!(result.is_err());
    assert_eq!(db.count_notes().unwrap(), 0);
}
