/*!
 * Batch runs over document trees
 */

use anyhow::Result;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use doctran::file_selector::{FileSelector, normalize_extensions};
use doctran::providers::mock::MockProvider;
use doctran::translation::{BatchTranslator, RunSummary};
use crate::common;

fn select(root: &Path) -> Result<Vec<PathBuf>> {
    Ok(FileSelector::default().select(root, true, &normalize_extensions([".md", ".txt"]))?)
}

fn snapshot(root: &Path) -> Result<BTreeMap<PathBuf, Vec<u8>>> {
    let mut files = BTreeMap::new();
    for entry in walkdir::WalkDir::new(root) {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.insert(entry.path().to_path_buf(), fs::read(entry.path())?);
        }
    }
    Ok(files)
}

#[tokio::test]
async fn test_run_overDocTree_shouldTranslateSkipAndCount() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_doc_tree(temp_dir.path())?;
    let root = common::canonical_root(&temp_dir)?;
    let candidates = select(&root)?;
    let mock = MockProvider::working();
    let batch = BatchTranslator::new(common::document_translator().with_base(&root));

    let mut progress = Vec::new();
    let summary = batch.run(&candidates, false, &mock, |done, total| progress.push((done, total))).await;

    // README.md already has README_zh.md, guide/empty.md is blank
    assert_eq!(summary.translated, 2);
    assert_eq!(summary.skipped_exists, 1);
    assert_eq!(summary.skipped_empty, 1);
    assert_eq!(summary.errors, 0);
    assert_eq!(summary.total(), candidates.len());
    assert_eq!(progress, vec![(1, 4), (2, 4), (3, 4), (4, 4)]);

    assert_eq!(fs::read_to_string(root.join("README_zh.md"))?, "# 标题\n");
    assert_eq!(fs::read_to_string(root.join("notes_zh.txt"))?, "[TRANSLATED] Some notes.\n");
    assert!(root.join("guide").join("intro_zh.md").exists());
    assert!(!root.join("guide").join("empty_zh.md").exists());
    assert!(!root.join("node_modules").join("pkg").join("readme_zh.md").exists());
    Ok(())
}

#[tokio::test]
async fn test_run_twice_shouldMakeNoCallsAndChangeNothing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_doc_tree(temp_dir.path())?;
    let root = common::canonical_root(&temp_dir)?;
    let batch = BatchTranslator::new(common::document_translator());

    let first = MockProvider::working();
    batch.run(&select(&root)?, false, &first, |_, _| {}).await;
    let after_first = snapshot(&root)?;

    let second = MockProvider::working();
    let candidates = select(&root)?;
    let summary = batch.run(&candidates, false, &second, |_, _| {}).await;

    assert_eq!(second.request_count(), 0);
    assert_eq!(summary.translated, 0);
    assert_eq!(summary.errors, 0);
    assert_eq!(summary.skipped(), candidates.len());
    assert_eq!(snapshot(&root)?, after_first);
    Ok(())
}

#[tokio::test]
async fn test_run_withFailingDocument_shouldContinueWithOthers() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = common::canonical_root(&temp_dir)?;
    for name in ["a.md", "b.md", "c.md"] {
        common::create_test_file(&root, name, &format!("content of {}", name))?;
    }
    let candidates = select(&root)?;
    let mock = MockProvider::failing_on(2);
    let batch = BatchTranslator::new(common::document_translator());

    let summary = batch.run(&candidates, false, &mock, |_, _| {}).await;

    assert_eq!(summary.translated, 2);
    assert_eq!(summary.skipped(), 0);
    assert_eq!(summary.errors, 1);
    assert_eq!(mock.request_count(), 3);
    assert!(root.join("a_zh.md").exists());
    assert!(!root.join("b_zh.md").exists());
    assert!(root.join("c_zh.md").exists());

    // The failed document is picked up again on the next run
    let retry = MockProvider::working();
    let summary = batch.run(&select(&root)?, false, &retry, |_, _| {}).await;
    assert_eq!(summary.translated, 1);
    assert_eq!(summary.skipped_exists, 2);
    assert_eq!(retry.requests()[0].content, "content of b.md");
    Ok(())
}

#[tokio::test]
async fn test_run_withForce_shouldRetranslateEverything() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_doc_tree(temp_dir.path())?;
    let root = common::canonical_root(&temp_dir)?;
    let candidates = select(&root)?;
    let mock = MockProvider::working();
    let batch = BatchTranslator::new(common::document_translator());

    let summary = batch.run(&candidates, true, &mock, |_, _| {}).await;

    assert_eq!(summary.translated, 3);
    assert_eq!(summary.skipped_empty, 1);
    assert_eq!(mock.request_count(), 3);
    assert_eq!(
        fs::read_to_string(root.join("README_zh.md"))?,
        "[TRANSLATED] # Title\n\nHello world.\n"
    );
    Ok(())
}

#[tokio::test]
async fn test_run_shouldRequestInSelectionOrder() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = common::canonical_root(&temp_dir)?;
    for name in ["z.md", "a/b.md", "a.txt", "m.md"] {
        common::create_test_file(&root, name, name)?;
    }
    let mock = MockProvider::working();
    let batch = BatchTranslator::new(common::document_translator());

    batch.run(&select(&root)?, false, &mock, |_, _| {}).await;

    // Paths compare component by component, so `a/b.md` sorts before `a.txt`
    let order: Vec<String> = mock.requests().into_iter().map(|r| r.content).collect();
    assert_eq!(order, vec!["a/b.md", "a.txt", "m.md", "z.md"]);
    Ok(())
}

#[tokio::test]
async fn test_preview_shouldReportStatusWithoutWriting() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_doc_tree(temp_dir.path())?;
    let root = common::canonical_root(&temp_dir)?;
    let before = snapshot(&root)?;
    let batch = BatchTranslator::new(common::document_translator());

    let preview = batch.preview(&select(&root)?);

    let statuses: Vec<(String, &str)> = preview.iter()
        .map(|entry| (common::relative_names(&root, &[entry.path.clone()]).remove(0), entry.status()))
        .collect();
    assert_eq!(statuses, vec![
        ("README.md".to_string(), "exists"),
        ("guide/empty.md".to_string(), "needs translation"),
        ("guide/intro.md".to_string(), "needs translation"),
        ("notes.txt".to_string(), "needs translation"),
    ]);
    assert_eq!(preview[0].output_path, root.join("README_zh.md"));
    assert_eq!(snapshot(&root)?, before);
    Ok(())
}

#[test]
fn test_run_summary_display_shouldFoldSkips() {
    let summary = RunSummary {
        translated: 3,
        skipped_exists: 2,
        skipped_empty: 1,
        errors: 1,
        ..RunSummary::default()
    };

    assert_eq!(summary.to_string(), "Summary: 3 translated, 3 skipped, 1 errors");
    assert_eq!(summary.total(), 7);
}
