use retarget_util::fs::{find_ancestor_matching, find_ancestor_with, read_manifest};

#[test]
fn test_find_ancestor_in_same_dir() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("Retarget.toml"), "").unwrap();
    let found = find_ancestor_with(tmp.path(), "Retarget.toml").unwrap();
    assert_eq!(found, tmp.path());
}

#[test]
fn test_find_ancestor_walks_up() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("Retarget.toml"), "").unwrap();
    let nested = tmp.path().join("a").join("b");
    std::fs::create_dir_all(&nested).unwrap();
    let found = find_ancestor_with(&nested, "Retarget.toml").unwrap();
    assert_eq!(found, tmp.path());
}

#[test]
fn test_find_ancestor_matching_skips_rejected_candidates() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("Retarget.toml"), "[workspace]\n").unwrap();
    let member = tmp.path().join("app");
    std::fs::create_dir_all(&member).unwrap();
    std::fs::write(member.join("Retarget.toml"), "[module]\n").unwrap();

    let found = find_ancestor_matching(&member, "Retarget.toml", |p| {
        std::fs::read_to_string(p)
            .map(|c| c.contains("[workspace]"))
            .unwrap_or(false)
    })
    .unwrap();
    assert_eq!(found, tmp.path());
}

#[test]
fn test_read_manifest_missing_file_names_path() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("Retarget.toml");
    let err = read_manifest(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to read"), "got: {err}");
}
