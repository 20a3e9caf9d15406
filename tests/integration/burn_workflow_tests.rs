/*!
 * Integration tests for burning job files and stored series through the controller
 */

use anyhow::Result;
use std::sync::Arc;

use crate::common;
use vocabcut::app_controller::{BurnOptions, BurnOutcome, Controller};
use vocabcut::database::{KeywordRecord, Repository, SeriesRecord, SubtitleRecord};
use vocabcut::encoder::mock::MockCall;
use vocabcut::models::BurnMode;
use vocabcut::MockEncoder;

fn controller(encoder: Arc<MockEncoder>) -> Result<Controller> {
    Ok(Controller::new_for_test()?.with_encoder(encoder))
}

/// Test that a job file is burned next to its source video
#[tokio::test]
async fn test_runJobFile_shouldRenderNextToSource() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let job_path = common::write_job_file(temp_dir.path(), "lesson_1.mp4")?;
    let encoder = Arc::new(MockEncoder::working());

    let outcome = controller(encoder.clone())?
        .run_job_file(&job_path, &BurnOptions::default(), None)
        .await?;

    let expected_output = temp_dir.path().join("lesson_3.mp4");
    match outcome {
        BurnOutcome::Rendered(report) => {
            assert_eq!(report.succeeded, report.total);
            assert_eq!(report.output.as_deref(), Some(expected_output.as_path()));
        }
        BurnOutcome::Skipped(path) => panic!("job unexpectedly skipped: {:?}", path),
    }
    assert!(expected_output.is_file());

    // every cut reads the job's source video
    for call in encoder.cut_calls() {
        if let MockCall::Cut { input, .. } = call {
            assert_eq!(input, temp_dir.path().join("lesson_1.mp4"));
        }
    }
    Ok(())
}

/// Test that command line options override the job file
#[tokio::test]
async fn test_runJobFile_withOptions_shouldOverrideJobFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let job_path = common::write_job_file(temp_dir.path(), "lesson_1.mp4")?;
    let encoder = Arc::new(MockEncoder::working());
    let output = temp_dir.path().join("out").join("custom.mp4");
    let options = BurnOptions {
        output: Some(output.clone()),
        mode: Some(BurnMode::TitleOnly),
        title: Some("Override".to_string()),
        force_overwrite: false,
    };

    controller(encoder.clone())?
        .run_job_file(&job_path, &options, None)
        .await?;

    assert!(output.is_file());
    for call in encoder.overlay_calls() {
        if let MockCall::Overlay { filter, .. } = call {
            assert!(filter.contains("text=Override:"));
            assert!(!filter.contains("coffee"));
        }
    }
    Ok(())
}

/// Test that an existing output is kept unless overwriting is forced
#[tokio::test]
async fn test_runJobFile_withExistingOutput_shouldSkipUnlessForced() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let job_path = common::write_job_file(temp_dir.path(), "lesson_1.mp4")?;
    let existing = common::create_test_file(temp_dir.path(), "lesson_3.mp4", "old render")?;
    let encoder = Arc::new(MockEncoder::working());
    let controller = controller(encoder.clone())?;

    let outcome = controller
        .run_job_file(&job_path, &BurnOptions::default(), None)
        .await?;
    assert!(matches!(outcome, BurnOutcome::Skipped(ref path) if *path == existing));
    assert!(encoder.calls().is_empty());
    assert_eq!(std::fs::read_to_string(&existing)?, "old render");

    let forced = BurnOptions {
        force_overwrite: true,
        ..BurnOptions::default()
    };
    let outcome = controller.run_job_file(&job_path, &forced, None).await?;
    assert!(matches!(outcome, BurnOutcome::Rendered(_)));
    assert_eq!(std::fs::read_to_string(&existing)?, "final video");
    Ok(())
}

/// Test that a job file naming a missing video fails before any encoder call
#[tokio::test]
async fn test_runJobFile_withMissingSource_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let job_path = common::create_test_file(
        temp_dir.path(),
        "job.json",
        r#"{ "source_media": "gone.mp4", "utterances": [] }"#,
    )?;
    let encoder = Arc::new(MockEncoder::working());

    let result = controller(encoder.clone())?
        .run_job_file(&job_path, &BurnOptions::default(), None)
        .await;

    assert!(result.is_err());
    assert!(encoder.calls().is_empty());
    Ok(())
}

/// Test that a folder run counts rendered and failed jobs separately
#[tokio::test]
async fn test_runFolder_shouldSummarizeJobs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let good_dir = temp_dir.path().join("good");
    std::fs::create_dir_all(&good_dir)?;
    common::write_job_file(&good_dir, "lesson_1.mp4")?;
    common::create_test_file(temp_dir.path(), "broken.json", "{ not json")?;
    common::create_test_file(temp_dir.path(), "notes.txt", "ignored")?;
    let encoder = Arc::new(MockEncoder::working());

    let summary = controller(encoder.clone())?
        .run_folder(temp_dir.path(), &BurnOptions::default(), None)
        .await?;

    assert_eq!(summary.rendered, 1);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.failed, 1);
    assert!(good_dir.join("lesson_3.mp4").is_file());
    Ok(())
}

/// Test that a folder without job files is rejected
#[tokio::test]
async fn test_runFolder_withoutJobFiles_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let encoder = Arc::new(MockEncoder::working());

    let result = controller(encoder)?
        .run_folder(temp_dir.path(), &BurnOptions::default(), None)
        .await;

    assert!(result.is_err());
    Ok(())
}

/// Test that a stored series is burned and its output recorded
#[tokio::test]
async fn test_runSeries_shouldRecordOutputOnSeries() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_source_video(temp_dir.path(), "21_1.mp4")?;
    let repo = Repository::new_in_memory()?;
    let series_id = repo
        .create_series(&SeriesRecord::new("21", source.to_str()))
        .await?;
    let subtitle_id = repo
        .create_subtitle(&SubtitleRecord::new(series_id, 0.0, 2.5, "Grab your umbrella", Some("带上你的伞")))
        .await?;
    repo.create_keyword(&KeywordRecord::new(subtitle_id, "umbrella", "/ʌmˈbrelə/", "雨伞", true))
        .await?;
    repo.insert_frequency("umbrella", 6400).await?;
    let encoder = Arc::new(MockEncoder::working());

    let outcome = controller(encoder.clone())?
        .run_series(&repo, series_id, &BurnOptions::default())
        .await?;

    let expected_output = temp_dir.path().join("21_3.mp4");
    assert!(matches!(outcome, BurnOutcome::Rendered(_)));
    assert!(expected_output.is_file());

    let series = repo.get_series(series_id).await?.expect("series missing");
    assert_eq!(series.third_name.as_deref(), Some("21_3.mp4"));
    assert_eq!(
        series.third_file_path.as_deref(),
        Some(expected_output.to_string_lossy().as_ref())
    );

    // the selected keyword gets a word card
    for call in encoder.overlay_calls() {
        if let MockCall::Overlay { filter, .. } = call {
            assert!(filter.contains("text=umbrella:"));
        }
    }
    Ok(())
}

/// Test that an unknown series id is reported
#[tokio::test]
async fn test_runSeries_withUnknownSeries_shouldFail() -> Result<()> {
    let repo = Repository::new_in_memory()?;
    let result = controller(Arc::new(MockEncoder::working()))?
        .run_series(&repo, 99, &BurnOptions::default())
        .await;

    assert!(result.is_err());
    Ok(())
}

/// Test that previews read stored series without any rendering
#[tokio::test]
async fn test_previewSeries_shouldNotTouchEncoder() -> Result<()> {
    let repo = Repository::new_in_memory()?;
    let series_id = repo.create_series(&SeriesRecord::new("5", None)).await?;
    let subtitle_id = repo
        .create_subtitle(&SubtitleRecord::new(series_id, 0.0, 4.0, "Nice to meet you", None))
        .await?;
    repo.create_keyword(&KeywordRecord::new(subtitle_id, "meet", "/miːt/", "见面", true).with_coca(450))
        .await?;
    let encoder = Arc::new(MockEncoder::working());

    let preview = controller(encoder.clone())?.preview_series(&repo, series_id).await?;

    assert_eq!(preview.total_items, 1);
    assert_eq!(preview.focus_items, 1);
    assert_eq!(preview.samples[0].word, "meet");
    assert_eq!(preview.samples[0].frequency_rank, Some(450));
    assert!(encoder.calls().is_empty());
    Ok(())
}
