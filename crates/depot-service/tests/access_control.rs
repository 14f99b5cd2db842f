//! Access control matrix scenarios and the NotFound-before-Forbidden
//! ordering.

mod common;

use common::Harness;
use depot_core::error::ErrorKind;
use depot_entity::user::UserRole;

#[tokio::test]
async fn test_admin_can_download_and_delete_any_file() {
    let h = Harness::new().await;
    let alice = h.seed_user("alice", UserRole::User).await;
    let admin = h.seed_user("root", UserRole::Admin).await;

    let up = h.upload_bytes(&h.ctx(&alice), "private.txt", b"secret").await;

    let dl = h
        .download
        .download(&h.ctx(&admin), up.file.id, None)
        .await
        .unwrap();
    assert_eq!(&dl.data[..], b"secret");

    h.files.delete(&h.ctx(&admin), up.file.id).await.unwrap();
    assert!(h.file_repo.find_by_id(up.file.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_owner_can_download_delete_and_rollback_own_file() {
    let h = Harness::new().await;
    let alice = h.seed_user("alice", UserRole::User).await;
    let ctx = h.ctx(&alice);

    let up = h.upload_bytes(&ctx, "mine.txt", b"one").await;
    h.upload_bytes(&ctx, "mine.txt", b"two").await;

    assert!(h.download.download(&ctx, up.file.id, None).await.is_ok());
    assert!(h.versions.rollback(&ctx, up.file.id, 1).await.is_ok());
    assert!(h.files.delete(&ctx, up.file.id).await.is_ok());
}

#[tokio::test]
async fn test_non_owner_user_is_forbidden() {
    let h = Harness::new().await;
    let alice = h.seed_user("alice", UserRole::User).await;
    let bob = h.seed_user("bob", UserRole::User).await;

    let up = h.upload_bytes(&h.ctx(&alice), "private.txt", b"secret").await;
    let bob_ctx = h.ctx(&bob);

    for err in [
        h.download.download(&bob_ctx, up.file.id, None).await.unwrap_err(),
        h.files.delete(&bob_ctx, up.file.id).await.unwrap_err(),
        h.files.info(&bob_ctx, up.file.id).await.unwrap_err(),
        h.versions.list_versions(&bob_ctx, up.file.id).await.unwrap_err(),
        h.versions.rollback(&bob_ctx, up.file.id, 1).await.unwrap_err(),
        h.shares.create_share(&bob_ctx, up.file.id).await.unwrap_err(),
    ] {
        assert_eq!(err.kind, ErrorKind::Forbidden);
    }

    // Nothing was mutated.
    assert!(h.file_repo.find_by_id(up.file.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_not_found_precedes_forbidden() {
    let h = Harness::new().await;
    let alice = h.seed_user("alice", UserRole::User).await;
    let bob = h.seed_user("bob", UserRole::User).await;
    let bob_ctx = h.ctx(&bob);

    let up = h.upload_bytes(&h.ctx(&alice), "private.txt", b"secret").await;

    // Nonexistent id: NotFound, even though bob could never access it —
    // existence is checked before any permission logic.
    let ghost = uuid::Uuid::new_v4();
    let err = h.files.delete(&bob_ctx, ghost).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    // Existing but foreign id: Forbidden. The two outcomes are distinct.
    let err = h.files.delete(&bob_ctx, up.file.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_zip_download_fails_on_foreign_file() {
    let h = Harness::new().await;
    let alice = h.seed_user("alice", UserRole::User).await;
    let bob = h.seed_user("bob", UserRole::User).await;

    let a = h.upload_bytes(&h.ctx(&alice), "a.txt", b"a").await;
    let b = h.upload_bytes(&h.ctx(&bob), "b.txt", b"b").await;

    let err = h
        .download
        .download_zip(&h.ctx(&bob), &[b.file.id, a.file.id])
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_user_admin_endpoints_require_admin() {
    let h = Harness::new().await;
    let alice = h.seed_user("alice", UserRole::User).await;
    let bob = h.seed_user("bob", UserRole::User).await;
    let alice_ctx = h.ctx(&alice);

    let err = h.users.list_users(&alice_ctx).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    let err = h.users.delete_user(&alice_ctx, bob.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    let err = h
        .users
        .change_role(&alice_ctx, bob.id, UserRole::Admin)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_admin_cannot_delete_or_demote_self() {
    let h = Harness::new().await;
    let admin = h.seed_user("root", UserRole::Admin).await;
    let ctx = h.ctx(&admin);

    let err = h.users.delete_user(&ctx, admin.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = h
        .users
        .change_role(&ctx, admin.id, UserRole::User)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_user_deletion_cascades_their_files() {
    let h = Harness::new().await;
    let admin = h.seed_user("root", UserRole::Admin).await;
    let alice = h.seed_user("alice", UserRole::User).await;

    let up = h.upload_bytes(&h.ctx(&alice), "doc.txt", b"bytes").await;

    h.users.delete_user(&h.ctx(&admin), alice.id).await.unwrap();

    assert!(h.user_repo.find_by_id(alice.id).await.unwrap().is_none());
    assert!(h.file_repo.find_by_id(up.file.id).await.unwrap().is_none());
    assert!(!h.store.exists(&up.version.storage_path).await.unwrap());
}

#[tokio::test]
async fn test_register_and_login_flow() {
    let h = Harness::new().await;

    let user = h
        .users
        .register("carol", "carol@example.com", "hunter2hunter2", None)
        .await
        .unwrap();
    assert_eq!(user.role, UserRole::User);

    let (logged_in, token) = h.users.login("carol", "hunter2hunter2", None).await.unwrap();
    assert_eq!(logged_in.id, user.id);
    assert!(!token.access_token.is_empty());

    let err = h.users.login("carol", "wrong", None).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthenticated);

    // Unknown user yields the same error kind as a bad password.
    let err = h.users.login("nobody", "hunter2hunter2", None).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unauthenticated);
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let h = Harness::new().await;

    h.users
        .register("carol", "carol@example.com", "password-one", None)
        .await
        .unwrap();

    let err = h
        .users
        .register("carol", "other@example.com", "password-two", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    let err = h
        .users
        .register("other", "carol@example.com", "password-two", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
}
