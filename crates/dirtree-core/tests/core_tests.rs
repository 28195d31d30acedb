use dirtree_core::{DirError, Entry, EntryKind, EntryType, TraversalConfig};
use std::path::PathBuf;

#[test]
fn test_config_serde_defaults() {
    // Every option may be omitted and falls back to the documented default
    let config: TraversalConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, TraversalConfig::default());

    let config: TraversalConfig = serde_json::from_str(
        r#"{"type": "file", "recursive": false, "include": "*.txt"}"#,
    )
    .unwrap();
    assert_eq!(config.entry_type, EntryType::File);
    assert!(!config.recursive);
    assert!(config.follow_symlinks);
    assert_eq!(config.include.as_deref(), Some("*.txt"));
    assert!(config.exclude.is_none());
}

#[test]
fn test_config_serde_roundtrip_uses_type_key() {
    let config = TraversalConfig::builder()
        .entry_type(EntryType::Directory)
        .leaves_only(true)
        .build()
        .unwrap();

    let json = serde_json::to_value(&config).unwrap();
    assert_eq!(json["type"], "directory");
    assert_eq!(json["leaves_only"], true);
}

#[test]
fn test_entry_accessors() {
    let entry = Entry::new(
        "root/nested/child.txt",
        "child.txt",
        EntryKind::File,
        2,
    );

    assert_eq!(entry.path, PathBuf::from("root/nested/child.txt"));
    assert_eq!(entry.name.as_str(), "child.txt");
    assert_eq!(entry.depth, 2);
    assert!(!entry.is_dir());
    assert_eq!(entry.into_path(), PathBuf::from("root/nested/child.txt"));
}

#[test]
fn test_classify_plain_entries() {
    let crate_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let meta = std::fs::symlink_metadata(&crate_dir).unwrap();
    assert_eq!(EntryKind::classify(meta.file_type(), None), EntryKind::Directory);

    let manifest = std::fs::symlink_metadata(crate_dir.join("Cargo.toml")).unwrap();
    assert_eq!(EntryKind::classify(manifest.file_type(), None), EntryKind::File);
}

#[test]
fn test_error_display() {
    let err = DirError::CreateFailed {
        path: PathBuf::from("/root/denied"),
        source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
    };
    assert!(err.to_string().contains("/root/denied"));

    let err = DirError::DestinationInsideSource {
        source_dir: PathBuf::from("a"),
        destination: PathBuf::from("a/b"),
    };
    assert_eq!(err.path(), Some(std::path::Path::new("a/b")));
}
