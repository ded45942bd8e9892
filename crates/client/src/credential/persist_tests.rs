// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::credential::MemorySlot;

#[test]
fn missing_file_opens_empty() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let slot = FileSlot::open(tmp.path().join("storage.json"));
    assert_eq!(slot.get(), None);
    Ok(())
}

#[test]
fn token_survives_reopen() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("nested/dir/storage.json");

    FileSlot::open(&path).set("t1");

    let reopened = FileSlot::open(&path);
    assert_eq!(reopened.get().as_deref(), Some("t1"));
    Ok(())
}

#[test]
fn clear_removes_token_from_disk() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("storage.json");

    let slot = FileSlot::open(&path);
    slot.set("t1");
    slot.clear();
    assert_eq!(slot.get(), None);

    let contents = std::fs::read_to_string(&path)?;
    let entries: Entries = serde_json::from_str(&contents)?;
    assert!(!entries.contains_key(TOKEN_KEY));
    Ok(())
}

#[test]
fn unrelated_keys_are_preserved() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("storage.json");
    std::fs::write(&path, r#"{"i18nextLng": "zh", "token": "old"}"#)?;

    let slot = FileSlot::open(&path);
    assert_eq!(slot.get().as_deref(), Some("old"));
    slot.set("new");

    let entries: Entries = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    assert_eq!(entries.get("i18nextLng").and_then(Value::as_str), Some("zh"));
    assert_eq!(entries.get(TOKEN_KEY).and_then(Value::as_str), Some("new"));
    Ok(())
}

#[test]
fn non_string_values_are_kept() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("storage.json");
    std::fs::write(&path, r#"{"token":"t1","theme":1,"flags":{"beta":true}}"#)?;

    let slot = FileSlot::open(&path);
    assert_eq!(slot.get().as_deref(), Some("t1"));
    slot.clear();

    let entries: Entries = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    assert_eq!(entries.get("theme"), Some(&Value::from(1)));
    assert_eq!(entries.get("flags").and_then(|f| f.get("beta")), Some(&Value::Bool(true)));
    assert!(!entries.contains_key(TOKEN_KEY));
    Ok(())
}

#[test]
fn non_string_token_reads_as_absent() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("storage.json");
    std::fs::write(&path, r#"{"token":42}"#)?;

    let slot = FileSlot::open(&path);
    assert_eq!(slot.get(), None);
    slot.set("t2");
    assert_eq!(FileSlot::open(&path).get().as_deref(), Some("t2"));
    Ok(())
}

#[yare::parameterized(
    truncated = { r#"{"tok"# },
    not_json = { "{not json" },
    not_an_object = { r#"["token"]"# },
)]
fn damaged_file_opens_empty_and_is_replaced(contents: &str) {
    let result = reopen_after_damage(contents);
    assert!(result.is_ok(), "{result:?}");
}

fn reopen_after_damage(contents: &str) -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("storage.json");
    std::fs::write(&path, contents)?;

    let slot = FileSlot::open(&path);
    assert_eq!(slot.get(), None);

    slot.set("t1");
    assert_eq!(FileSlot::open(&path).get().as_deref(), Some("t1"));
    Ok(())
}

#[test]
fn no_temp_files_left_behind() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let slot = FileSlot::open(tmp.path().join("storage.json"));
    slot.set("a");
    slot.set("b");
    slot.clear();

    let names: Vec<String> = std::fs::read_dir(tmp.path())?
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["storage.json".to_owned()]);
    Ok(())
}

#[test]
fn memory_slot_holds_one_token() {
    let slot = MemorySlot::with_token("t1");
    assert_eq!(slot.get().as_deref(), Some("t1"));
    slot.set("t2");
    assert_eq!(slot.get().as_deref(), Some("t2"));
    slot.clear();
    slot.clear();
    assert_eq!(slot.get(), None);
}
