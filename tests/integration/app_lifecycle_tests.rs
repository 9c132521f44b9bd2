/*!
 * Full app lifecycle tests
 */

use anyhow::Result;
use std::fs;
use doctran::app_config::Config;
use doctran::app_controller::{Controller, RunOptions, RunReport};
use doctran::errors::{AppError, SelectionError};
use doctran::providers::mock::MockProvider;
use doctran::translation::Translator;
use crate::common;

fn controller() -> Result<Controller> {
    Ok(Controller::with_config(Config::default())?)
}

#[tokio::test]
async fn test_controller_run_overDirectory_shouldReturnSummary() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_doc_tree(temp_dir.path())?;
    let controller = controller()?;
    let options = RunOptions::from_config(controller.config());
    let mock = MockProvider::working();

    let report = controller.run(temp_dir.path(), &options, Some(&mock as &dyn Translator)).await?;

    match report {
        RunReport::Translated(summary) => {
            assert_eq!(summary.translated, 2);
            assert_eq!(summary.skipped(), 2);
            assert_eq!(summary.errors, 0);
        }
        other => panic!("expected a translation summary, got {:?}", other),
    }
    assert!(temp_dir.path().join("notes_zh.txt").exists());

    let request = &mock.requests()[0];
    assert_eq!(request.model, "gpt-4o");
    assert!(request.instructions.contains("Simplified Chinese"));
    Ok(())
}

#[tokio::test]
async fn test_controller_run_withDryRun_shouldNotNeedTranslator() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_doc_tree(temp_dir.path())?;
    let controller = controller()?;
    let options = RunOptions {
        dry_run: true,
        ..RunOptions::from_config(controller.config())
    };

    let report = controller.run(temp_dir.path(), &options, None).await?;

    match report {
        RunReport::Preview(entries) => {
            assert_eq!(entries.len(), 4);
            assert_eq!(entries.iter().filter(|e| e.exists).count(), 1);
        }
        other => panic!("expected a preview, got {:?}", other),
    }
    assert!(!temp_dir.path().join("notes_zh.txt").exists());
    Ok(())
}

#[tokio::test]
async fn test_controller_run_withoutTranslator_shouldFailOutsideDryRun() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "a.md", "Hello")?;
    let controller = controller()?;
    let options = RunOptions::from_config(controller.config());

    let result = controller.run(temp_dir.path(), &options, None).await;

    assert!(matches!(result, Err(AppError::Config(_))));
    Ok(())
}

#[tokio::test]
async fn test_controller_run_withMissingRoot_shouldFailBeforeProcessing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = controller()?;
    let options = RunOptions::from_config(controller.config());
    let mock = MockProvider::working();

    let result = controller.run(&temp_dir.path().join("nope"), &options, Some(&mock as &dyn Translator)).await;

    assert!(matches!(result, Err(AppError::Selection(SelectionError::NotFound(_)))));
    assert_eq!(mock.request_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_controller_run_withUnsupportedFile_shouldFailWithInvalidInput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(temp_dir.path(), "diagram.png", "bytes")?;
    let controller = controller()?;
    let options = RunOptions::from_config(controller.config());
    let mock = MockProvider::working();

    let result = controller.run(&file, &options, Some(&mock as &dyn Translator)).await;

    assert!(matches!(result, Err(AppError::Selection(SelectionError::InvalidInput(_)))));
    assert_eq!(mock.request_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_controller_run_withSingleFile_shouldTranslateOnlyThatFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_doc_tree(temp_dir.path())?;
    let file = temp_dir.path().join("guide").join("intro.md");
    let controller = controller()?;
    let options = RunOptions::from_config(controller.config());
    let mock = MockProvider::working();

    let report = controller.run(&file, &options, Some(&mock as &dyn Translator)).await?;

    assert!(matches!(report, RunReport::Translated(ref s) if s.translated == 1 && s.total() == 1));
    assert_eq!(
        fs::read_to_string(temp_dir.path().join("guide").join("intro_zh.md"))?,
        "[TRANSLATED] Intro with `code`.\n"
    );
    assert!(!temp_dir.path().join("notes_zh.txt").exists());
    Ok(())
}

#[tokio::test]
async fn test_controller_run_withNoMatches_shouldReportNoCandidates() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "image.png", "x")?;
    common::create_test_file(temp_dir.path(), "done_zh.md", "x")?;
    let controller = controller()?;
    let options = RunOptions::from_config(controller.config());
    let mock = MockProvider::working();

    let report = controller.run(temp_dir.path(), &options, Some(&mock as &dyn Translator)).await?;

    assert_eq!(report, RunReport::NoCandidates);
    assert_eq!(mock.request_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_controller_run_withFailures_shouldStillSucceed() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "a.md", "A")?;
    common::create_test_file(temp_dir.path(), "b.md", "B")?;
    let controller = controller()?;
    let options = RunOptions::from_config(controller.config());
    let mock = MockProvider::failing();

    let report = controller.run(temp_dir.path(), &options, Some(&mock as &dyn Translator)).await?;

    assert!(matches!(report, RunReport::Translated(ref s) if s.errors == 2 && s.translated == 0));
    Ok(())
}

#[tokio::test]
async fn test_controller_withCustomMarkerAndExtensions_shouldFollowConfig() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "index.rst", "Index")?;
    common::create_test_file(temp_dir.path(), "index_fr.rst", "Indice")?;
    common::create_test_file(temp_dir.path(), "guide.rst", "Guide")?;
    common::create_test_file(temp_dir.path(), "readme.md", "Readme")?;
    let config = Config {
        target_language: "fr".to_string(),
        translation_marker: Some("_fr".to_string()),
        extensions: vec!["rst".to_string()],
        ..Config::default()
    };
    let controller = Controller::with_config(config)?;
    let options = RunOptions::from_config(controller.config());
    let mock = MockProvider::working();

    let report = controller.run(temp_dir.path(), &options, Some(&mock as &dyn Translator)).await?;

    assert!(matches!(report, RunReport::Translated(ref s) if s.translated == 1 && s.skipped_exists == 1));
    assert!(temp_dir.path().join("guide_fr.rst").exists());
    assert!(!temp_dir.path().join("readme_fr.md").exists());
    assert!(mock.requests()[0].instructions.contains("French"));
    Ok(())
}

#[test]
fn test_controller_withInvalidConfig_shouldFail() {
    let config = Config {
        source_language: "zz".to_string(),
        ..Config::default()
    };
    assert!(matches!(Controller::with_config(config), Err(AppError::Config(_))));
}

#[tokio::test]
async fn test_controller_withOtherTargetLanguage_shouldNotReuseChineseOutputs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "guide.md", "Hello")?;
    common::create_test_file(temp_dir.path(), "guide_zh.md", "你好")?;
    let config = Config {
        target_language: "ja".to_string(),
        ..Config::default()
    };
    let controller = Controller::with_config(config)?;
    let options = RunOptions::from_config(controller.config());
    let mock = MockProvider::working();

    let report = controller.run(temp_dir.path(), &options, Some(&mock as &dyn Translator)).await?;

    assert!(matches!(report, RunReport::Translated(ref s) if s.skipped_exists == 0 && s.errors == 0));
    assert!(mock.requests().iter().any(|r| r.content == "Hello"));
    assert_eq!(fs::read_to_string(temp_dir.path().join("guide_zh.md"))?, "你好");
    assert_eq!(fs::read_to_string(temp_dir.path().join("guide_ja.md"))?, "[TRANSLATED] Hello");
    assert!(mock.requests().iter().all(|r| r.instructions.contains("Japanese")));
    Ok(())
}
