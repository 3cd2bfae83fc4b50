mod common;
use common::tmp_dir;

use agentkit::errors::ToolErrorKind;
use agentkit::services::logger::{LogLevel, Logger};
use agentkit::services::preset::PresetStore;
use agentkit::utils::preset_codec::{render, PresetRecord};
use std::fs;
use std::path::PathBuf;

fn store_in(dir: PathBuf, bundled: Option<PathBuf>) -> PresetStore {
    PresetStore::new(Logger::new("test", LogLevel::Error), dir, bundled)
}

fn preset_text(name: &str, body: &str) -> String {
    render(&PresetRecord {
        name: name.to_string(),
        system_prompt: body.to_string(),
        ..Default::default()
    })
}

#[tokio::test]
async fn save_without_overwrite_fails_on_existing_slug() {
    let dir = tmp_dir("agentkit-store");
    let store = store_in(dir.clone(), None);

    store
        .write("oracle", &preset_text("oracle", "First."), false)
        .expect("first write");
    let err = store
        .write("Oracle", &preset_text("Oracle", "Second."), false)
        .expect_err("second write must fail");
    assert_eq!(err.kind, ToolErrorKind::AlreadyExists);
    assert!(err.to_content_text().contains("overwrite=true"));
    assert_eq!(store.read("oracle").unwrap().system_prompt, "First.");

    store
        .write("oracle", &preset_text("oracle", "Second."), true)
        .expect("overwrite");
    assert_eq!(store.read("oracle").unwrap().system_prompt, "Second.");

    let _ = fs::remove_dir_all(dir);
}

#[tokio::test]
async fn names_that_slugify_alike_share_one_file() {
    let dir = tmp_dir("agentkit-store");
    let store = store_in(dir.clone(), None);

    let first = store
        .write("Code Review", &preset_text("Code Review", "A."), false)
        .unwrap();
    let second = store
        .write("code/review", &preset_text("code/review", "B."), true)
        .unwrap();
    assert_eq!(first, "code_review");
    assert_eq!(first, second);
    assert_eq!(store.slugs().unwrap(), vec!["code_review"]);
    assert_eq!(store.read("CODE REVIEW").unwrap().system_prompt, "B.");

    let _ = fs::remove_dir_all(dir);
}

#[tokio::test]
async fn missing_preset_lists_available_slugs() {
    let dir = tmp_dir("agentkit-store");
    let store = store_in(dir.clone(), None);

    let err = store.read("ghost").expect_err("empty store");
    assert_eq!(err.kind, ToolErrorKind::NotFound);
    assert!(err.message.contains("No presets exist yet"));

    store
        .write("oracle", &preset_text("oracle", "Think."), false)
        .unwrap();
    store
        .write("planner", &preset_text("planner", "Plan."), false)
        .unwrap();
    let err = store.read("oracel").expect_err("typo");
    assert_eq!(err.kind, ToolErrorKind::NotFound);
    assert!(err.message.contains("oracle, planner"), "{}", err.message);
    assert!(err.to_content_text().contains("oracle"));

    let _ = fs::remove_dir_all(dir);
}

#[tokio::test]
async fn delete_removes_file_and_reports_missing_afterwards() {
    let dir = tmp_dir("agentkit-store");
    let store = store_in(dir.clone(), None);
    store
        .write("oracle", &preset_text("oracle", "Think."), false)
        .unwrap();

    assert_eq!(store.delete("Oracle").unwrap(), "oracle");
    assert!(!store.path_for("oracle").exists());
    let err = store.delete("oracle").expect_err("already gone");
    assert_eq!(err.kind, ToolErrorKind::NotFound);

    let _ = fs::remove_dir_all(dir);
}

#[tokio::test]
async fn list_skips_malformed_and_foreign_files() {
    let dir = tmp_dir("agentkit-store");
    let store = store_in(dir.clone(), None);
    store
        .write("summarizer", &preset_text("summarizer", "Summarize input."), false)
        .unwrap();
    fs::write(dir.join("empty.md"), "# empty\n\n").unwrap();
    fs::write(dir.join("binary.md"), [0xff, 0xfe, 0x00, 0x41]).unwrap();
    fs::write(dir.join("notes.txt"), "# notes\n\nnot a preset").unwrap();
    fs::write(dir.join("summarizer.md.a1b2c3d4.tmp"), "partial").unwrap();
    fs::write(dir.join("Upper Case.md"), "# x\n\nbody").unwrap();

    let listed = store.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "summarizer");
    assert_eq!(listed[0].display_name, "summarizer");
    assert!(listed[0].description.is_none());

    let err = store.read("empty").expect_err("empty body");
    assert_eq!(err.kind, ToolErrorKind::InvalidParams);
    let err = store.read("binary").expect_err("not utf-8");
    assert_eq!(err.kind, ToolErrorKind::InvalidParams);

    let _ = fs::remove_dir_all(dir);
}

#[tokio::test]
async fn list_on_missing_directory_is_empty() {
    let store = store_in(tmp_dir("agentkit-missing"), None);
    assert!(store.list().unwrap().is_empty());
}

#[tokio::test]
async fn seeding_copies_missing_presets_once_and_keeps_user_edits() {
    let bundled = tmp_dir("agentkit-bundled");
    fs::create_dir_all(&bundled).unwrap();
    fs::write(bundled.join("oracle.md"), preset_text("oracle", "Bundled oracle.")).unwrap();
    fs::write(bundled.join("planner.md"), preset_text("planner", "Bundled planner.")).unwrap();
    fs::write(bundled.join("README.txt"), "ignored").unwrap();

    let dir = tmp_dir("agentkit-store");
    let store = store_in(dir.clone(), Some(bundled.clone()));

    let mut copied = store.seed_bundled();
    copied.sort();
    assert_eq!(copied, vec!["oracle", "planner"]);
    assert_eq!(
        fs::read_to_string(dir.join("oracle.md")).unwrap(),
        fs::read_to_string(bundled.join("oracle.md")).unwrap()
    );

    store
        .write("oracle", &preset_text("oracle", "My own oracle."), true)
        .unwrap();
    fs::remove_file(dir.join("planner.md")).unwrap();

    assert_eq!(store.seed_bundled(), vec!["planner"]);
    assert_eq!(store.read("oracle").unwrap().system_prompt, "My own oracle.");
    assert!(store.seed_bundled().is_empty());

    let _ = fs::remove_dir_all(dir);
    let _ = fs::remove_dir_all(bundled);
}

#[tokio::test]
async fn seeding_without_bundled_directory_is_silent() {
    let dir = tmp_dir("agentkit-store");
    let store = store_in(dir.clone(), Some(tmp_dir("agentkit-nowhere")));
    assert!(store.seed_bundled().is_empty());
    let store = store_in(dir, None);
    assert!(store.seed_bundled().is_empty());
}

#[tokio::test]
async fn write_leaves_no_temporary_files() {
    let dir = tmp_dir("agentkit-store");
    let store = store_in(dir.clone(), None);
    for round in 0..3 {
        store
            .write("oracle", &preset_text("oracle", &format!("Round {}.", round)), true)
            .unwrap();
    }
    let names: Vec<String> = fs::read_dir(&dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["oracle.md"]);
    assert_eq!(store.read("oracle").unwrap().system_prompt, "Round 2.");

    let _ = fs::remove_dir_all(dir);
}
