//! Rollback, deletion with reference counting, listing, and share links.

mod common;

use common::Harness;
use depot_core::error::ErrorKind;
use depot_entity::user::UserRole;

#[tokio::test]
async fn test_rollback_moves_pointer_without_touching_ledger() {
    let h = Harness::new().await;
    let alice = h.seed_user("alice", UserRole::User).await;
    let ctx = h.ctx(&alice);

    let v1 = h.upload_bytes(&ctx, "doc.txt", b"first").await;
    let v2 = h.upload_bytes(&ctx, "doc.txt", b"second, longer").await;
    let file_id = v1.file.id;

    let rolled = h.versions.rollback(&ctx, file_id, 1).await.unwrap();

    // The pointer mirrors version 1 exactly.
    assert_eq!(rolled.current_version, 1);
    assert_eq!(rolled.storage_path, v1.version.storage_path);
    assert_eq!(rolled.size_bytes, v1.version.size_bytes);

    // The ledger still holds both versions: rollback never deletes the
    // later one, so current pointer != max(version_number).
    let versions = h.versions.list_versions(&ctx, file_id).await.unwrap();
    assert_eq!(
        versions.iter().map(|v| v.version_number).collect::<Vec<_>>(),
        vec![1, 2]
    );
    let latest = h.versions.latest_version(file_id).await.unwrap();
    assert_eq!(latest.version_number, 2);
    assert_eq!(latest.storage_path, v2.version.storage_path);

    // Downloading "current" serves the rollback target.
    let dl = h.download.download(&ctx, file_id, None).await.unwrap();
    assert_eq!(&dl.data[..], b"first");
}

#[tokio::test]
async fn test_upload_after_rollback_continues_numbering() {
    let h = Harness::new().await;
    let alice = h.seed_user("alice", UserRole::User).await;
    let ctx = h.ctx(&alice);

    let v1 = h.upload_bytes(&ctx, "doc.txt", b"one").await;
    h.upload_bytes(&ctx, "doc.txt", b"two").await;
    h.versions.rollback(&ctx, v1.file.id, 1).await.unwrap();

    // Version numbers are never reused, even when current < max.
    let v3 = h.upload_bytes(&ctx, "doc.txt", b"three").await;
    assert_eq!(v3.version.version_number, 3);
    assert_eq!(v3.file.current_version, 3);
}

#[tokio::test]
async fn test_rollback_to_missing_version_is_not_found() {
    let h = Harness::new().await;
    let alice = h.seed_user("alice", UserRole::User).await;
    let ctx = h.ctx(&alice);

    let up = h.upload_bytes(&ctx, "doc.txt", b"only").await;
    let err = h.versions.rollback(&ctx, up.file.id, 9).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_removes_file_versions_and_content() {
    let h = Harness::new().await;
    let alice = h.seed_user("alice", UserRole::User).await;
    let ctx = h.ctx(&alice);

    let v1 = h.upload_bytes(&ctx, "doc.txt", b"one").await;
    let v2 = h.upload_bytes(&ctx, "doc.txt", b"two").await;

    h.files.delete(&ctx, v1.file.id).await.unwrap();

    assert!(h.file_repo.find_by_id(v1.file.id).await.unwrap().is_none());
    assert_eq!(h.version_repo.count_for_file(v1.file.id).await.unwrap(), 0);
    assert!(!h.store.exists(&v1.version.storage_path).await.unwrap());
    assert!(!h.store.exists(&v2.version.storage_path).await.unwrap());

    let err = h.download.download(&ctx, v1.file.id, None).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_keeps_bytes_aliased_by_another_file() {
    let h = Harness::new().await;
    let alice = h.seed_user("alice", UserRole::User).await;
    let bob = h.seed_user("bob", UserRole::User).await;

    // Bob's upload deduplicates against Alice's physical object.
    let a = h.upload_bytes(&h.ctx(&alice), "a.txt", b"shared").await;
    let b = h.upload_bytes(&h.ctx(&bob), "b.txt", b"shared").await;
    assert!(b.was_deduplicated);
    let shared_path = a.version.storage_path.clone();

    // Deleting the original owner must not unlink bytes still referenced
    // by the aliased version.
    h.files.delete(&h.ctx(&alice), a.file.id).await.unwrap();
    assert!(h.store.exists(&shared_path).await.unwrap());

    let dl = h.download.download(&h.ctx(&bob), b.file.id, None).await.unwrap();
    assert_eq!(&dl.data[..], b"shared");

    // Once the last reference goes, the bytes go with it.
    h.files.delete(&h.ctx(&bob), b.file.id).await.unwrap();
    assert!(!h.store.exists(&shared_path).await.unwrap());
}

#[tokio::test]
async fn test_download_of_missing_physical_content_is_not_found() {
    let h = Harness::new().await;
    let alice = h.seed_user("alice", UserRole::User).await;
    let ctx = h.ctx(&alice);

    let up = h.upload_bytes(&ctx, "doc.txt", b"bytes").await;
    // The ledger record survives an out-of-band removal of the bytes;
    // the download must fail rather than serve stale success.
    h.store.delete(&up.version.storage_path).await.unwrap();

    let err = h.download.download(&ctx, up.file.id, None).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_multiple_skips_missing_ids() {
    let h = Harness::new().await;
    let alice = h.seed_user("alice", UserRole::User).await;
    let ctx = h.ctx(&alice);

    let a = h.upload_bytes(&ctx, "a.txt", b"a").await;
    let b = h.upload_bytes(&ctx, "b.txt", b"b").await;
    let ghost = uuid::Uuid::new_v4();

    let deleted = h
        .files
        .delete_multiple(&ctx, &[a.file.id, ghost, b.file.id])
        .await
        .unwrap();
    assert_eq!(deleted, vec![a.file.id, b.file.id]);
}

#[tokio::test]
async fn test_list_supports_search_and_sort() {
    let h = Harness::new().await;
    let alice = h.seed_user("alice", UserRole::User).await;
    let ctx = h.ctx(&alice);

    h.upload_bytes(&ctx, "alpha.txt", b"aaaaaaaa").await;
    h.upload_bytes(&ctx, "beta.txt", b"bb").await;
    h.upload_bytes(&ctx, "gamma.log", b"cccc").await;

    let by_name = h.files.list(&ctx, None, Some("name_asc")).await.unwrap();
    assert_eq!(
        by_name.iter().map(|f| f.filename.as_str()).collect::<Vec<_>>(),
        vec!["alpha.txt", "beta.txt", "gamma.log"]
    );

    let by_size = h.files.list(&ctx, None, Some("size_desc")).await.unwrap();
    assert_eq!(by_size[0].filename, "alpha.txt");
    assert_eq!(by_size[2].filename, "beta.txt");

    let searched = h.files.list(&ctx, Some(".txt"), None).await.unwrap();
    assert_eq!(searched.len(), 2);

    let err = h.files.list(&ctx, None, Some("bogus_key")).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_list_only_shows_own_files() {
    let h = Harness::new().await;
    let alice = h.seed_user("alice", UserRole::User).await;
    let bob = h.seed_user("bob", UserRole::User).await;

    h.upload_bytes(&h.ctx(&alice), "mine.txt", b"a").await;
    h.upload_bytes(&h.ctx(&bob), "theirs.txt", b"b").await;

    let listed = h.files.list(&h.ctx(&alice), None, None).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].filename, "mine.txt");
}

#[tokio::test]
async fn test_info_reports_version_count() {
    let h = Harness::new().await;
    let alice = h.seed_user("alice", UserRole::User).await;
    let ctx = h.ctx(&alice);

    let up = h.upload_bytes(&ctx, "doc.txt", b"one").await;
    h.upload_bytes(&ctx, "doc.txt", b"two").await;
    h.upload_bytes(&ctx, "doc.txt", b"three").await;

    let info = h.files.info(&ctx, up.file.id).await.unwrap();
    assert_eq!(info.version_count, 3);
    assert_eq!(info.file.current_version, 3);
}

#[tokio::test]
async fn test_share_token_allows_anonymous_download() {
    let h = Harness::new().await;
    let alice = h.seed_user("alice", UserRole::User).await;
    let ctx = h.ctx(&alice);

    let up = h.upload_bytes(&ctx, "pub.txt", b"public bytes").await;
    let shared = h.shares.create_share(&ctx, up.file.id).await.unwrap();
    let token = shared.share_token.clone().unwrap();

    let dl = h.download.download_shared(&token, None).await.unwrap();
    assert_eq!(&dl.data[..], b"public bytes");
    assert_eq!(dl.filename, "pub.txt");

    let bogus = h.download.download_shared("no-such-token", None).await.unwrap_err();
    assert_eq!(bogus.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_revoked_share_token_stops_working() {
    let h = Harness::new().await;
    let alice = h.seed_user("alice", UserRole::User).await;
    let ctx = h.ctx(&alice);

    let up = h.upload_bytes(&ctx, "pub.txt", b"data").await;
    let shared = h.shares.create_share(&ctx, up.file.id).await.unwrap();
    let token = shared.share_token.clone().unwrap();

    h.shares.revoke_share(&ctx, up.file.id).await.unwrap();

    let err = h.download.download_shared(&token, None).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_share_download_follows_rollback_pointer() {
    let h = Harness::new().await;
    let alice = h.seed_user("alice", UserRole::User).await;
    let ctx = h.ctx(&alice);

    let v1 = h.upload_bytes(&ctx, "doc.txt", b"old").await;
    h.upload_bytes(&ctx, "doc.txt", b"new").await;
    let shared = h.shares.create_share(&ctx, v1.file.id).await.unwrap();
    let token = shared.share_token.clone().unwrap();

    h.versions.rollback(&ctx, v1.file.id, 1).await.unwrap();

    let dl = h.download.download_shared(&token, None).await.unwrap();
    assert_eq!(&dl.data[..], b"old");
}

#[tokio::test]
async fn test_zip_download_bundles_accessible_files() {
    let h = Harness::new().await;
    let alice = h.seed_user("alice", UserRole::User).await;
    let ctx = h.ctx(&alice);

    let a = h.upload_bytes(&ctx, "a.txt", b"aaa").await;
    let b = h.upload_bytes(&ctx, "b.txt", b"bbb").await;
    let ghost = uuid::Uuid::new_v4();

    let archive = h
        .download
        .download_zip(&ctx, &[a.file.id, ghost, b.file.id])
        .await
        .unwrap();
    // Zip local-file-header magic.
    assert_eq!(&archive[..4], b"PK\x03\x04");

    let none = h.download.download_zip(&ctx, &[ghost]).await.unwrap_err();
    assert_eq!(none.kind, ErrorKind::NotFound);
}
