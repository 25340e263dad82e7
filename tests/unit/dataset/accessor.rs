use super::*;

fn touch(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"").unwrap();
}

fn accessor(root: &Path) -> DatasetAccessor {
    DatasetAccessor::new(&DatasetLayout::new(root), true)
}

#[test]
fn missing_base_root_is_dataset_missing() {
    let dir = tempfile::tempdir().unwrap();
    let acc = accessor(&dir.path().join("nope"));
    let err = acc.sequence_names().unwrap_err();
    assert!(matches!(err, ReelError::DatasetMissing { .. }));
}

#[test]
fn sequences_are_sorted_directories_only() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("JPEGImages/480p");
    for name in ["dog", "bear", "camel"] {
        fs::create_dir_all(base.join(name)).unwrap();
    }
    touch(&base.join("README.txt"));

    let names = accessor(dir.path()).sequence_names().unwrap();
    assert_eq!(names, vec!["bear", "camel", "dog"]);
}

#[test]
fn frames_sorted_and_hidden_files_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let seq = dir.path().join("JPEGImages/480p/bear");
    for name in ["00002.jpg", "00000.jpg", "00001.jpg", ".DS_Store"] {
        touch(&seq.join(name));
    }
    fs::create_dir_all(seq.join("nested")).unwrap();

    let frames = accessor(dir.path()).frame_names("bear").unwrap();
    assert_eq!(frames, vec!["00000.jpg", "00001.jpg", "00002.jpg"]);
}

#[test]
fn overlay_name_swaps_extension() {
    let dir = tempfile::tempdir().unwrap();
    let acc = accessor(dir.path());
    assert_eq!(acc.overlay_name("00017.jpg"), "00017.png");
    assert_eq!(acc.overlay_name("frame.v2.jpeg"), "frame.v2.png");
    assert_eq!(acc.overlay_name("noext"), "noext.png");
}

#[test]
fn resolve_mirrors_sequence_directories() {
    let acc = accessor(Path::new("/data/DAVIS"));
    let pair = acc.resolve("camel", "00003.jpg");
    assert_eq!(pair.sequence, "camel");
    assert_eq!(
        pair.base,
        PathBuf::from("/data/DAVIS/JPEGImages/480p/camel/00003.jpg")
    );
    assert_eq!(
        pair.overlay,
        PathBuf::from("/data/DAVIS/Annotations/480p/camel/00003.png")
    );
}

#[test]
fn hidden_sequence_directories_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("JPEGImages/480p");
    for name in ["bear", ".git", ".cache"] {
        fs::create_dir_all(base.join(name)).unwrap();
    }

    let names = accessor(dir.path()).sequence_names().unwrap();
    assert_eq!(names, vec!["bear"]);
}

#[cfg(unix)]
#[test]
fn symlinked_sequences_and_frames_are_listed() {
    use std::os::unix::fs::symlink;

    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("store/bear");
    for name in ["00000.jpg", "00001.jpg"] {
        touch(&store.join(name));
    }

    let base = dir.path().join("JPEGImages/480p");
    fs::create_dir_all(&base).unwrap();
    symlink(&store, base.join("bear")).unwrap();

    let camel = base.join("camel");
    fs::create_dir_all(&camel).unwrap();
    for name in ["00000.jpg", "00001.jpg"] {
        symlink(store.join(name), camel.join(name)).unwrap();
    }

    let acc = accessor(dir.path());
    assert_eq!(acc.sequence_names().unwrap(), vec!["bear", "camel"]);
    assert_eq!(
        acc.frame_names("bear").unwrap(),
        vec!["00000.jpg", "00001.jpg"]
    );
    assert_eq!(
        acc.frame_names("camel").unwrap(),
        vec!["00000.jpg", "00001.jpg"]
    );
}

#[cfg(unix)]
#[test]
fn dangling_frame_link_is_frame_load_error() {
    use std::os::unix::fs::symlink;

    let dir = tempfile::tempdir().unwrap();
    let seq = dir.path().join("JPEGImages/480p/bear");
    fs::create_dir_all(&seq).unwrap();
    symlink(dir.path().join("gone.jpg"), seq.join("00000.jpg")).unwrap();

    let err = accessor(dir.path()).frame_names("bear").unwrap_err();
    assert!(matches!(err, ReelError::FrameLoad { path, .. } if path == seq.join("00000.jpg")));
}

#[cfg(target_os = "linux")]
#[test]
fn non_utf8_frame_name_is_an_error() {
    use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

    let dir = tempfile::tempdir().unwrap();
    let seq = dir.path().join("JPEGImages/480p/bear");
    touch(&seq.join(OsStr::from_bytes(b"0000\xff.jpg")));

    let err = accessor(dir.path()).frame_names("bear").unwrap_err();
    assert!(matches!(err, ReelError::FrameLoad { .. }));
    assert!(err.to_string().contains("not valid UTF-8"));
}
