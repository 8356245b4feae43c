//! Tests for member registration and credential checks

use std::fs;

use libris::{LibrisError, NewMember, Role};

use crate::{setup_library, setup_stocked_library};

#[test]
fn test_register_sets_join_date_and_role() {
    let (_temp, _clock, library) = setup_library();

    let member = library
        .register_member(NewMember::new("M7", "Grace", "pw", "grace@example.com"))
        .unwrap();

    assert_eq!(member.join_date, "2024-03-01");
    assert_eq!(member.role, Role::Member);
    assert!(!member.is_librarian());
    assert_eq!(library.find_member("M7").unwrap(), Some(member));
}

#[test]
fn test_register_duplicate_leaves_members_unchanged() {
    let (temp, _clock, library) = setup_library();
    library
        .register_member(NewMember::new("M1", "Ada", "pw", "ada@example.com"))
        .unwrap();
    let before = fs::read_to_string(temp.path().join("members.csv")).unwrap();

    let err = library
        .register_member(NewMember::new("M1", "Imposter", "pw2", "x@example.com"))
        .unwrap_err();

    assert!(matches!(err, LibrisError::DuplicateKey(_)));
    assert_eq!(
        fs::read_to_string(temp.path().join("members.csv")).unwrap(),
        before
    );
}

#[test]
fn test_secret_is_never_stored_in_clear() {
    let (temp, _clock, library) = setup_library();

    library
        .register_member(NewMember::new("M1", "Ada", "correct horse", "ada@example.com"))
        .unwrap();

    let text = fs::read_to_string(temp.path().join("members.csv")).unwrap();
    assert!(!text.contains("correct horse"));
    assert!(text.starts_with("MemberID,Name,PasswordHash,Email,JoinDate,Role\n"));
}

#[test]
fn test_verify_member() {
    let (_temp, _clock, library) = setup_stocked_library();

    let member = library.verify_member("M1", "ada-secret").unwrap().unwrap();
    assert_eq!(member.name, "Ada");

    assert!(library.verify_member("M1", "wrong").unwrap().is_none());
    assert!(library.verify_member("NOBODY", "ada-secret").unwrap().is_none());
}

#[test]
fn test_librarian_role_is_explicit() {
    let (_temp, _clock, library) = setup_stocked_library();

    // An id that merely looks privileged gets no privileges
    let admin = library
        .register_member(NewMember::new("admin", "Not Really", "pw", "a@example.com"))
        .unwrap();

    assert!(!admin.is_librarian());
    assert!(library.find_member("L1").unwrap().unwrap().is_librarian());
}

#[test]
fn test_bootstrap_only_without_librarian() {
    let (_temp, _clock, library) = setup_library();

    let first = library
        .bootstrap_librarian(NewMember::new("L1", "Head", "pw", "head@example.com"))
        .unwrap();
    assert_eq!(first.role, Role::Librarian);

    let err = library
        .bootstrap_librarian(NewMember::new("L2", "Second", "pw", "two@example.com"))
        .unwrap_err();
    assert!(matches!(err, LibrisError::Unauthorized(_)));
    assert!(library.find_member("L2").unwrap().is_none());
}

#[test]
fn test_bootstrap_unlocks_members_file_without_roles() {
    let (temp, _clock, library) = setup_library();
    fs::write(
        temp.path().join("members.csv"),
        "MemberID,Name,PasswordHash,Email,JoinDate
M1,Ada,plaintext,ada@example.com,2023-01-01
",
    )
    .unwrap();

    let librarian = library
        .bootstrap_librarian(NewMember::new("L1", "Head", "pw", "head@example.com"))
        .unwrap();
    assert!(librarian.is_librarian());
    assert!(library.verify_member("L1", "pw").unwrap().is_some());

    // Old ids stay taken; their cleartext secrets never verify
    assert!(library.verify_member("M1", "plaintext").unwrap().is_none());
    let err = library
        .register_member(NewMember::new("M1", "Ada", "new", "ada@example.com"))
        .unwrap_err();
    assert!(matches!(err, LibrisError::DuplicateKey(_)));
}

#[test]
fn test_bootstrap_refused_once_librarian_exists() {
    let (_temp, _clock, library) = setup_stocked_library();

    let err = library
        .bootstrap_librarian(NewMember::new("L9", "Usurper", "pw", "x@example.com"))
        .unwrap_err();
    assert!(matches!(err, LibrisError::Unauthorized(_)));
}

#[test]
fn test_new_member_debug_redacts_secret() {
    let new = NewMember::new("M1", "Ada", "s3cr3t", "ada@example.com");

    let rendered = format!("{:?}", new);

    assert!(!rendered.contains("s3cr3t"));
    assert!(rendered.contains("<redacted>"));
}
