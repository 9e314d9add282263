use std::fs;
use std::path::Path;

use gitlet_hash::{HashAlgorithm, ObjectId};
use gitlet_loose::{LooseError, LooseObjectStore, StoreConfig};
use gitlet_object::{zlib, Blob, FileMode, Object, ObjectError, ObjectType, Tree, TreeEntry};

const HELLO: &str = "ce013625030ba8dba906f756967f9e9ca394464a";

fn setup() -> (tempfile::TempDir, LooseObjectStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = LooseObjectStore::open(dir.path().join("objects"), StoreConfig::default());
    (dir, store)
}

/// Replace a stored file's bytes, working around its read-only mode.
fn overwrite(path: &Path, data: &[u8]) {
    let mut perms = fs::metadata(path).unwrap().permissions();
    #[allow(clippy::permissions_set_readonly_false)]
    perms.set_readonly(false);
    fs::set_permissions(path, perms).unwrap();
    fs::write(path, data).unwrap();
}

fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// ── Write / read ────────────────────────────────────────────────────

#[test]
fn blob_roundtrip() {
    let (_dir, store) = setup();
    let oid = store.write_blob(b"hello\n".to_vec()).unwrap();
    assert_eq!(oid.to_hex(), HELLO);

    let obj = store.read(&oid).unwrap();
    assert_eq!(obj.object_type(), ObjectType::Blob);
    assert_eq!(obj.payload(), b"hello\n");
    assert_eq!(obj.encoded(), b"blob 6\0hello\n");
    assert_eq!(obj.oid().unwrap(), oid);
}

#[test]
fn empty_blob_roundtrip() {
    let (_dir, store) = setup();
    let oid = store.write_blob(Vec::new()).unwrap();
    assert_eq!(oid.to_hex(), "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391");
    assert!(store.read(&oid).unwrap().payload().is_empty());
}

#[test]
fn file_holds_compressed_encoding_at_fanout_path() {
    let (dir, store) = setup();
    let oid = store.write_blob(b"hello\n".to_vec()).unwrap();

    let path = dir.path().join("objects").join("ce").join(&HELLO[2..]);
    assert_eq!(store.object_path(&oid), path);
    assert!(store.contains(&oid));

    let on_disk = fs::read(&path).unwrap();
    assert_eq!(zlib::decompress(&on_disk).unwrap(), b"blob 6\0hello\n");
}

#[test]
fn no_temp_files_left_behind() {
    let (dir, store) = setup();
    store.write_blob(b"hello\n".to_vec()).unwrap();
    assert_eq!(files_in(&dir.path().join("objects").join("ce")), vec![HELLO[2..].to_string()]);
}

#[cfg(unix)]
#[test]
fn stored_files_are_read_only() {
    use std::os::unix::fs::PermissionsExt;

    let (_dir, store) = setup();
    let oid = store.write_blob(b"hello\n".to_vec()).unwrap();
    let mode = fs::metadata(store.object_path(&oid)).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o444);
}

#[test]
fn existing_fanout_directory_is_reused() {
    let (dir, store) = setup();
    fs::create_dir_all(dir.path().join("objects").join("ce")).unwrap();
    let oid = store.write_blob(b"hello\n".to_vec()).unwrap();
    assert!(store.contains(&oid));
}

#[test]
fn second_store_writes_nothing() {
    let (_dir, store) = setup();
    let oid = store.write_blob(b"hello\n".to_vec()).unwrap();
    let path = store.object_path(&oid);
    let first = fs::read(&path).unwrap();

    assert_eq!(store.write_blob(b"hello\n".to_vec()).unwrap(), oid);
    assert_eq!(fs::read(&path).unwrap(), first);

    // A marker in place of the real bytes survives a third store.
    overwrite(&path, b"marker");
    assert_eq!(store.write_blob(b"hello\n".to_vec()).unwrap(), oid);
    assert_eq!(fs::read(&path).unwrap(), b"marker");
}

#[test]
fn concurrent_writers_of_one_object_all_succeed() {
    let (dir, store) = setup();
    let content = vec![b'x'; 256 * 1024];

    let oids: Vec<ObjectId> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| store.write_blob(content.clone()).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(oids.windows(2).all(|w| w[0] == w[1]));
    let (fanout, file) = oids[0].fanout_parts();
    assert_eq!(files_in(&dir.path().join("objects").join(fanout)), vec![file]);
    assert_eq!(store.read(&oids[0]).unwrap().payload(), content);
}

#[test]
fn greeting_tree_end_to_end() {
    let (_dir, store) = setup();
    let blob = store.write_blob(b"hello\n".to_vec()).unwrap();
    let tree = Tree::from_entries(vec![TreeEntry::new(FileMode::Regular, "greeting.txt", blob)]);
    let tree_oid = store.write_object(Object::Tree(tree.clone())).unwrap();
    assert_eq!(tree_oid.to_hex(), "57e9529754dc514a3ec10db2ff882018fbe1fcbf");

    let loaded = store.read(&tree_oid).unwrap();
    assert_eq!(loaded.object(), &Object::Tree(tree));
    assert_eq!(
        loaded.render(),
        format!("100644 blob {HELLO}\tgreeting.txt\n").into_bytes()
    );
}

#[test]
fn write_raw_validates_tree_payloads() {
    let (dir, store) = setup();
    let err = store.write_raw(ObjectType::Tree, b"999999 bad\0").unwrap_err();
    assert!(matches!(err, LooseError::Object(ObjectError::UnknownFileMode(_))));
    assert!(!dir.path().join("objects").exists());
}

#[test]
fn write_blob_from_reader() {
    let (_dir, store) = setup();
    let oid = store.write_blob_from(&b"hello\n"[..]).unwrap();
    assert_eq!(oid.to_hex(), HELLO);
}

#[test]
fn sha256_store_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let store = LooseObjectStore::open(dir.path(), StoreConfig::new(HashAlgorithm::Sha256));
    let blob = store.write_blob(b"hello\n".to_vec()).unwrap();
    assert_eq!(blob.algorithm(), HashAlgorithm::Sha256);
    assert_eq!(
        blob.to_hex(),
        "2cf8d83d9ee29543b34a87727421fdecb7e3f3a183d337639025de576db9ebb4"
    );

    let tree = store
        .write_object(Object::Tree(Tree::from_entries(vec![TreeEntry::new(
            FileMode::Executable,
            "run.sh",
            blob,
        )])))
        .unwrap();
    let loaded = store.read_verified(&tree).unwrap();
    assert_eq!(loaded.object().as_tree().unwrap().entries[0].oid, blob);
}

// ── Failures ────────────────────────────────────────────────────────

#[test]
fn missing_object_is_not_found() {
    let (_dir, store) = setup();
    let oid = ObjectId::from_hex(HELLO).unwrap();
    assert!(!store.contains(&oid));
    match store.read(&oid).unwrap_err() {
        LooseError::NotFound(missing) => assert_eq!(missing, oid),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn flipped_byte_is_corrupt_stream() {
    let (_dir, store) = setup();
    let content: Vec<u8> = (0..4096u32).map(|i| (i * 7 % 256) as u8).collect();
    let oid = store.write_blob(content).unwrap();
    let path = store.object_path(&oid);

    let pristine = fs::read(&path).unwrap();
    for pos in [0, 1, pristine.len() / 2, pristine.len() - 1] {
        let mut bytes = pristine.clone();
        bytes[pos] ^= 0xff;
        overwrite(&path, &bytes);
        assert!(
            matches!(store.read(&oid), Err(LooseError::CorruptStream { .. })),
            "flip at {pos} went unnoticed"
        );
    }
}

#[test]
fn truncated_file_is_corrupt_stream() {
    let (_dir, store) = setup();
    let oid = store.write_blob(b"hello\n".to_vec()).unwrap();
    let path = store.object_path(&oid);
    let bytes = fs::read(&path).unwrap();
    overwrite(&path, &bytes[..bytes.len() - 3]);
    assert!(matches!(store.read(&oid), Err(LooseError::CorruptStream { .. })));
}

#[test]
fn valid_stream_with_bad_encoding_is_a_decode_error() {
    let (_dir, store) = setup();
    let oid = store.write_blob(b"hello\n".to_vec()).unwrap();
    overwrite(&store.object_path(&oid), &zlib::compress(b"blob 10\0hello\n", 6).unwrap());

    match store.read(&oid).unwrap_err() {
        LooseError::Object(ObjectError::SizeMismatch { declared: 10, actual: 6 }) => {}
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn read_verified_detects_swapped_content() {
    let (_dir, store) = setup();
    let oid = store.write_blob(b"hello\n".to_vec()).unwrap();
    overwrite(&store.object_path(&oid), &zlib::compress(b"blob 3\0bye", 6).unwrap());

    assert_eq!(store.read(&oid).unwrap().payload(), b"bye");
    match store.read_verified(&oid).unwrap_err() {
        LooseError::HashMismatch { expected, actual, .. } => {
            assert_eq!(expected, oid);
            assert_ne!(actual, oid);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn mixed_digest_widths_are_rejected() {
    let (dir, store) = setup();

    let sha256_blob = Object::Blob(Blob::new(b"x".to_vec()));
    let lazy = gitlet_object::LazyObject::new(sha256_blob.clone(), HashAlgorithm::Sha256);
    assert!(matches!(
        store.write(&lazy).unwrap_err(),
        LooseError::AlgorithmMismatch {
            expected: HashAlgorithm::Sha1,
            actual: HashAlgorithm::Sha256
        }
    ));

    let child = sha256_blob.compute_oid(HashAlgorithm::Sha256).unwrap();
    let tree = Tree::from_entries(vec![TreeEntry::new(FileMode::Regular, "wide", child)]);
    assert!(matches!(
        store.write_object(Object::Tree(tree)).unwrap_err(),
        LooseError::AlgorithmMismatch { .. }
    ));

    assert!(matches!(
        store.read(&child).unwrap_err(),
        LooseError::AlgorithmMismatch { .. }
    ));
    assert!(!dir.path().join("objects").exists());
}

#[test]
fn tree_with_nul_in_entry_name_is_never_stored() {
    let (dir, store) = setup();
    let blob = Blob::new(b"hello\n".to_vec());
    let blob_oid = Object::Blob(blob).compute_oid(HashAlgorithm::Sha1).unwrap();
    let tree = Tree::from_entries(vec![
        TreeEntry::new(FileMode::Regular, "fine", blob_oid),
        TreeEntry::new(FileMode::Regular, &b"a\0b"[..], blob_oid),
    ]);

    match store.write_object(Object::Tree(tree)).unwrap_err() {
        LooseError::Object(ObjectError::InvalidEntryName { name }) => {
            assert_eq!(name, &b"a\0b"[..]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!dir.path().join("objects").exists());
}

// ── Properties ──────────────────────────────────────────────────────

proptest::proptest! {
    #![proptest_config(proptest::prelude::ProptestConfig::with_cases(32))]

    #[test]
    fn any_blob_survives_the_store(
        data in proptest::collection::vec(proptest::prelude::any::<u8>(), 0..4096),
        level in 0u32..=9,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let store = LooseObjectStore::open(
            dir.path(),
            StoreConfig::default().with_compression_level(level),
        );
        let oid = store.write_blob(data.clone()).unwrap();
        let loaded = store.read_verified(&oid).unwrap();
        proptest::prop_assert_eq!(loaded.payload(), &data[..]);
    }
}
