//! End-to-end checksum -> diff -> sync pipeline tests
//!
//! Each test plays both endpoints: one engine checksums the reference file
//! and later applies the diff, the other diffs its local copy against the
//! received table.

use rollsync_sync::{SyncConfig, SyncEngine};
use rollsync_types::{Diff, DiffSegment, ErrorKind};
use tempfile::TempDir;

fn engine(block_size: usize) -> SyncEngine {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    SyncEngine::with_config(SyncConfig { block_size }).unwrap()
}

#[tokio::test]
async fn identity_roundtrip_yields_gapless_references() {
    let dir = TempDir::new().unwrap();
    let reference_path = dir.path().join("a/shared.txt");
    let copy_path = dir.path().join("b/shared.txt");
    tokio::fs::create_dir_all(reference_path.parent().unwrap())
        .await
        .unwrap();
    tokio::fs::create_dir_all(copy_path.parent().unwrap())
        .await
        .unwrap();

    let content = b"AAAAAAAABBBBBBBBCCCCCCCCDDDDDDDD";
    tokio::fs::write(&reference_path, content).await.unwrap();
    tokio::fs::write(&copy_path, content).await.unwrap();

    let mut holder = engine(8);
    let table = holder.compute_checksums(&reference_path).await.unwrap();

    let scanner = engine(8);
    let diff = scanner.compute_diff(&copy_path, &table).await.unwrap();

    match &diff {
        Diff::Segments(segments) => {
            let indices: Vec<u32> = segments
                .iter()
                .map(|s| match s {
                    DiffSegment::Reference { index } => *index,
                    other => panic!("expected pure references, got {:?}", other),
                })
                .collect();
            assert_eq!(indices, vec![0, 1, 2, 3]);
        }
        Diff::Removed => panic!("unexpected removal"),
    }

    // Ship the diff through its opaque binary envelope, as a transport would.
    let received = Diff::from_bytes(&diff.to_bytes().unwrap()).unwrap();
    let synced = holder
        .apply_diff(&reference_path, &received)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(synced, content);
}

#[tokio::test]
async fn interior_edit_reconstructs_modified_bytes() {
    let dir = TempDir::new().unwrap();
    let reference_path = dir.path().join("ref.bin");
    let copy_path = dir.path().join("copy.bin");

    let reference = b"AAAAAAAABBBBBBBBCCCCCCCC";
    let mut modified = reference.to_vec();
    modified[10] = b'X';
    tokio::fs::write(&reference_path, reference).await.unwrap();
    tokio::fs::write(&copy_path, &modified).await.unwrap();

    let mut holder = engine(8);
    let table = holder.compute_checksums(&reference_path).await.unwrap();

    let diff = engine(8).compute_diff(&copy_path, &table).await.unwrap();
    let Diff::Segments(segments) = &diff else {
        panic!("unexpected removal");
    };
    assert_eq!(
        segments.as_slice(),
        [
            DiffSegment::Reference { index: 0 },
            DiffSegment::LiteralThenReference {
                data: modified[8..16].to_vec(),
                index: 2,
            },
        ]
    );

    // Reconstruction yields the bytes present at scan time, not the
    // original reference.
    let synced = holder
        .apply_diff(&reference_path, &diff)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(synced, modified);
}

#[tokio::test]
async fn multi_block_edits_with_unaligned_tail() {
    let dir = TempDir::new().unwrap();
    let reference_path = dir.path().join("ref.bin");
    let copy_path = dir.path().join("copy.bin");

    // Strictly increasing counter pairs: every window of the reference is
    // unique, so matches only occur at true block positions.
    let reference: Vec<u8> = (0u16..150).flat_map(u16::to_be_bytes).collect();
    let mut modified = reference.clone();
    modified[40] ^= 0xff;
    modified[200] ^= 0xff;
    modified.extend_from_slice(b"appended tail");
    tokio::fs::write(&reference_path, &reference).await.unwrap();
    tokio::fs::write(&copy_path, &modified).await.unwrap();

    let mut holder = engine(16);
    let table = holder.compute_checksums(&reference_path).await.unwrap();
    let diff = engine(16).compute_diff(&copy_path, &table).await.unwrap();

    let synced = holder
        .apply_diff(&reference_path, &diff)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(synced, modified);
}

#[tokio::test]
async fn short_file_against_empty_counterpart() {
    let dir = TempDir::new().unwrap();
    let reference_path = dir.path().join("ref.bin");
    let copy_path = dir.path().join("copy.bin");

    tokio::fs::write(&reference_path, b"tiny").await.unwrap();
    tokio::fs::write(&copy_path, b"").await.unwrap();

    let mut holder = engine(750);
    let table = holder.compute_checksums(&reference_path).await.unwrap();

    let diff = engine(750).compute_diff(&copy_path, &table).await.unwrap();
    let Diff::Segments(segments) = &diff else {
        panic!("unexpected removal");
    };
    assert_eq!(segments.as_slice(), [DiffSegment::Literal { data: vec![] }]);

    let synced = holder
        .apply_diff(&reference_path, &diff)
        .await
        .unwrap()
        .unwrap();
    assert!(synced.is_empty());
}

#[tokio::test]
async fn deletion_roundtrip() {
    let dir = TempDir::new().unwrap();
    let reference_path = dir.path().join("ref.bin");
    let copy_path = dir.path().join("copy.bin");

    tokio::fs::write(&reference_path, b"will be deleted").await.unwrap();
    // copy_path is never created: the counterpart is gone.

    let mut holder = engine(750);
    let table = holder.compute_checksums(&reference_path).await.unwrap();

    let diff = engine(750).compute_diff(&copy_path, &table).await.unwrap();
    assert!(diff.is_removed());
    // The sentinel is a distinct non-array value on the wire.
    assert_eq!(serde_json::to_string(&diff).unwrap(), r#"{"remove":true}"#);

    let synced = holder.apply_diff(&reference_path, &diff).await.unwrap();
    assert!(synced.is_none());
    assert!(!reference_path.exists());
    assert!(!holder.has_cached_reference(&reference_path));
}

#[tokio::test]
async fn second_sync_without_new_checksum_fails() {
    let dir = TempDir::new().unwrap();
    let reference_path = dir.path().join("ref.bin");

    tokio::fs::write(&reference_path, b"AAAAAAAA").await.unwrap();

    let mut holder = engine(8);
    let table = holder.compute_checksums(&reference_path).await.unwrap();
    let diff = engine(8)
        .compute_diff(&reference_path, &table)
        .await
        .unwrap();

    holder.apply_diff(&reference_path, &diff).await.unwrap();
    let err = holder.apply_diff(&reference_path, &diff).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingChecksum);
}

#[tokio::test]
async fn sync_without_checksum_fails() {
    let mut holder = engine(8);
    let diff = Diff::Segments(vec![DiffSegment::Literal {
        data: b"x".to_vec(),
    }]);

    let err = holder.apply_diff("never-checksummed.bin", &diff).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingChecksum);
}
