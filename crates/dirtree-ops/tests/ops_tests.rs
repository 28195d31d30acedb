use dirtree_ops::{
    copy_tree, make_dir, make_dirs, remove_tree, tempnam, CopyOptions, DirError, MakeOptions,
    TraversalConfig,
};
use dirtree_scan::scan;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Same layout as the scan fixture, under `<temp>/spec/fixture`.
fn create_fixture(temp: &TempDir) -> PathBuf {
    let root = temp.path().join("spec/fixture");

    fs::create_dir_all(root.join("nested/childs")).unwrap();
    fs::create_dir_all(root.join("extensions")).unwrap();
    fs::write(root.join("file1.txt"), "file1").unwrap();
    fs::write(root.join("nested/nested_file1.txt"), "n1").unwrap();
    fs::write(root.join("nested/nested_file2.txt"), "n2").unwrap();
    fs::write(root.join("nested/childs/child1.txt"), "c1").unwrap();
    fs::write(root.join("extensions/file.xml"), "<xml/>").unwrap();
    fs::write(root.join("extensions/index.html"), "<html/>").unwrap();
    fs::write(root.join("extensions/index.php"), "<?php").unwrap();

    #[cfg(unix)]
    std::os::unix::fs::symlink(
        root.join("nested/childs"),
        root.join("extensions/childs"),
    )
    .unwrap();

    root
}

/// A fresh, existing destination directory.
fn destination(temp: &TempDir) -> PathBuf {
    let dest = tempnam(Some(temp.path()), "dest").unwrap();
    make_dir(&dest, &MakeOptions::default()).unwrap();
    dest
}

/// Where `path` (under the fixture's parent) lands under `dest`.
fn mirrored(path: &Path, fixture: &Path, dest: &Path) -> PathBuf {
    let parent = fixture.parent().unwrap();
    dest.join(path.strip_prefix(parent).unwrap())
}

fn with(build: impl FnOnce(&mut dirtree_ops::TraversalConfigBuilder)) -> TraversalConfig {
    let mut builder = TraversalConfig::builder();
    build(&mut builder);
    builder.build().unwrap()
}

#[test]
fn test_copies_a_directory_recursively() {
    let temp = TempDir::new().unwrap();
    let fixture = create_fixture(&temp);
    let dest = destination(&temp);

    copy_tree(&fixture, &dest, &CopyOptions::default()).unwrap();

    for path in scan(&fixture, &TraversalConfig::default()).unwrap() {
        let target = mirrored(&path, &fixture, &dest);
        assert!(target.exists(), "missing {}", target.display());
    }
    assert_eq!(
        fs::read_to_string(dest.join("fixture/nested/nested_file1.txt")).unwrap(),
        "n1"
    );
}

#[cfg(unix)]
#[test]
fn test_copies_without_following_symlinks() {
    let temp = TempDir::new().unwrap();
    let fixture = create_fixture(&temp);
    let dest = destination(&temp);

    let options = CopyOptions::new(with(|b| {
        b.follow_symlinks(false);
    }));
    copy_tree(&fixture, &dest, &options).unwrap();

    let linked_child = dest.join("fixture/extensions/childs/child1.txt");
    for path in scan(&fixture, &TraversalConfig::default()).unwrap() {
        let target = mirrored(&path, &fixture, &dest);
        assert_eq!(target.exists(), target != linked_child, "{}", target.display());
    }
    assert!(dest.join("fixture/extensions/childs").is_dir());
}

#[test]
fn test_copies_with_custom_handler() {
    let temp = TempDir::new().unwrap();
    let fixture = create_fixture(&temp);
    let dest = destination(&temp);

    let options = CopyOptions::default().with_copy_handler(|from: &Path, to: &Path| {
        let mut bak = to.as_os_str().to_owned();
        bak.push(".bak");
        fs::copy(from, PathBuf::from(bak)).map(|_| ())
    });
    let summary = copy_tree(&fixture, &dest, &options).unwrap();

    assert!(dest.join("fixture/file1.txt.bak").is_file());
    assert!(!dest.join("fixture/file1.txt").exists());
    assert!(dest.join("fixture/nested/childs/child1.txt.bak").is_file());
    assert!(summary.files > 0);
}

#[test]
fn test_copies_only_included_files() {
    let temp = TempDir::new().unwrap();
    let fixture = create_fixture(&temp);
    let dest = destination(&temp);

    let options = CopyOptions::new(with(|b| {
        b.include("*.txt");
    }));
    copy_tree(&fixture, &dest, &options).unwrap();

    assert!(dest.join("fixture/file1.txt").is_file());
    assert!(dest.join("fixture/nested/childs/child1.txt").is_file());
    assert!(!dest.join("fixture/extensions/index.php").exists());
    assert!(!dest.join("fixture/extensions/file.xml").exists());
}

#[test]
fn test_copies_all_but_excluded_files() {
    let temp = TempDir::new().unwrap();
    let fixture = create_fixture(&temp);
    let dest = destination(&temp);

    let options = CopyOptions::new(with(|b| {
        b.exclude("*.txt");
    }));
    copy_tree(&fixture, &dest, &options).unwrap();

    assert!(!dest.join("fixture/file1.txt").exists());
    assert!(!dest.join("fixture/nested/nested_file1.txt").exists());
    assert!(dest.join("fixture/nested").is_dir());
    assert!(dest.join("fixture/extensions/index.php").is_file());
}

#[test]
fn test_copy_fails_on_missing_destination() {
    let temp = TempDir::new().unwrap();
    let fixture = create_fixture(&temp);

    let err = copy_tree(&fixture, "unexisting/folder", &CopyOptions::default()).unwrap_err();

    assert!(matches!(err, DirError::DestinationMissing { .. }));
    assert_eq!(err.to_string(), "Unexisting destination path `unexisting/folder`.");
}

#[test]
fn test_copy_fails_on_missing_source() {
    let temp = TempDir::new().unwrap();
    let dest = destination(&temp);

    let err = copy_tree(temp.path().join("nope"), &dest, &CopyOptions::default()).unwrap_err();
    assert!(matches!(err, DirError::NotFound { .. }));
}

#[test]
fn test_copy_stops_on_handler_error() {
    let temp = TempDir::new().unwrap();
    let fixture = create_fixture(&temp);
    let dest = destination(&temp);

    let options = CopyOptions::default().with_copy_handler(|_: &Path, _: &Path| {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
    });
    let err = copy_tree(&fixture, &dest, &options).unwrap_err();

    match err {
        DirError::Io { source, .. } => assert_eq!(source.kind(), io::ErrorKind::PermissionDenied),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_removes_a_copied_directory() {
    let temp = TempDir::new().unwrap();
    let fixture = create_fixture(&temp);
    let dest = destination(&temp);

    copy_tree(&fixture, &dest, &CopyOptions::default()).unwrap();
    remove_tree(&dest, &TraversalConfig::default()).unwrap();

    for path in scan(&fixture, &TraversalConfig::default()).unwrap() {
        assert!(!mirrored(&path, &fixture, &dest).exists());
    }
    assert!(!dest.exists());
}

#[test]
fn test_remove_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let dest = destination(&temp);

    remove_tree(&dest, &TraversalConfig::default()).unwrap();
    let summary = remove_tree(&dest, &TraversalConfig::default()).unwrap();

    assert!(summary.is_empty());
}

#[test]
fn test_removes_only_included_files() {
    let temp = TempDir::new().unwrap();
    let fixture = create_fixture(&temp);
    let dest = destination(&temp);
    copy_tree(&fixture, &dest, &CopyOptions::default()).unwrap();

    let summary = remove_tree(
        &dest,
        &with(|b| {
            b.include("*.txt");
        }),
    )
    .unwrap();

    assert!(!dest.join("fixture/file1.txt").exists());
    assert!(!dest.join("fixture/nested/nested_file1.txt").exists());
    assert!(dest.join("fixture/extensions/index.php").is_file());
    assert!(dest.join("fixture/extensions/file.xml").is_file());
    assert!(summary.files > 0);
}

#[test]
fn test_removes_all_but_excluded_files() {
    let temp = TempDir::new().unwrap();
    let fixture = create_fixture(&temp);
    let dest = destination(&temp);
    copy_tree(&fixture, &dest, &CopyOptions::default()).unwrap();

    let summary = remove_tree(
        &dest,
        &with(|b| {
            b.exclude("*.txt");
        }),
    )
    .unwrap();

    assert!(dest.join("fixture/file1.txt").is_file());
    assert!(dest.join("fixture/nested/nested_file1.txt").is_file());
    assert!(!dest.join("fixture/extensions/index.php").exists());
    assert!(summary.skipped > 0);
    assert!(dest.is_dir());
}

#[cfg(unix)]
#[test]
fn test_makes_nested_directory_with_default_mode() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let path = temp.path().join("my/nested/directory");
    make_dir(&path, &MakeOptions::default()).unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode();
    assert!(path.is_dir());
    assert_eq!(mode & 0o700, 0o700);
    assert_eq!(mode & 0o022, 0);
}

#[cfg(unix)]
#[test]
fn test_makes_nested_directory_with_mode() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let path = temp.path().join("my/nested/directory");
    make_dir(&path, &MakeOptions::with_mode(0o700)).unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o700);
}

#[test]
fn test_makes_multiple_directories() {
    let temp = TempDir::new().unwrap();
    let paths = [
        temp.path().join("my/nested/directory"),
        temp.path().join("sub/nested/directory"),
    ];

    make_dirs(&paths, &MakeOptions::default()).unwrap();
    make_dirs(&paths, &MakeOptions::default()).unwrap();

    assert!(paths.iter().all(|p| p.is_dir()));
}

#[test]
fn test_make_fails_over_existing_file() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("file");
    fs::write(&file, "x").unwrap();

    let err = make_dirs([temp.path().join("ok"), file.clone()], &MakeOptions::default())
        .unwrap_err();

    assert!(temp.path().join("ok").is_dir());
    assert_eq!(err.path(), Some(file.as_path()));
}

#[test]
fn test_tempnam_uses_system_temp_dir() {
    let path = tempnam(None, "spec").unwrap();

    assert!(path.starts_with(std::env::temp_dir()));
    let name = path.file_name().unwrap().to_string_lossy();
    assert!(name.starts_with("spec"));
    assert!(!path.exists());
}

#[test]
fn test_copy_into_own_parent_is_refused() {
    let temp = TempDir::new().unwrap();
    let fixture = create_fixture(&temp);
    let parent = fixture.parent().unwrap();

    let err = copy_tree(&fixture, parent, &CopyOptions::default()).unwrap_err();

    assert!(matches!(err, DirError::SameFile { .. }));
    assert_eq!(fs::read_to_string(fixture.join("file1.txt")).unwrap(), "file1");
    assert_eq!(
        fs::read_to_string(fixture.join("nested/nested_file1.txt")).unwrap(),
        "n1"
    );
}

#[test]
fn test_copy_file_into_own_directory_is_refused() {
    let temp = TempDir::new().unwrap();
    let fixture = create_fixture(&temp);
    let file = fixture.join("file1.txt");

    let err = copy_tree(&file, &fixture, &CopyOptions::default()).unwrap_err();

    assert!(matches!(err, DirError::SameFile { .. }));
    assert_eq!(fs::read_to_string(&file).unwrap(), "file1");
}

#[cfg(unix)]
#[test]
fn test_remove_leaves_linked_directory_target_alone() {
    let temp = TempDir::new().unwrap();
    let fixture = create_fixture(&temp);

    // extensions/childs links to nested/childs; remove only extensions.
    remove_tree(fixture.join("extensions"), &TraversalConfig::default()).unwrap();

    assert!(!fixture.join("extensions").exists());
    assert!(fixture.join("nested/childs/child1.txt").is_file());
}

#[cfg(unix)]
#[test]
fn test_remove_with_filter_keeps_files_behind_links() {
    let temp = TempDir::new().unwrap();
    let fixture = create_fixture(&temp);

    let summary = remove_tree(
        fixture.join("extensions"),
        &with(|b| {
            b.include("*.txt");
        }),
    )
    .unwrap();

    assert!(summary.is_empty());
    assert!(fixture.join("extensions/childs").exists());
    assert!(fixture.join("nested/childs/child1.txt").is_file());
}
