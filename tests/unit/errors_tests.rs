/*!
 * Tests for error types and conversions
 */

use std::path::PathBuf;
use vocabcut::errors::{AppError, EncoderError, JobError, PipelineError, RenderError};
use vocabcut::models::RenderStage;

#[test]
fn test_encoderError_exitStatus_shouldDisplayCodeAndStderr() {
    let error = EncoderError::ExitStatus {
        program: "ffmpeg".to_string(),
        code: Some(1),
        stderr: "Invalid argument".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("ffmpeg"));
    assert!(display.contains("Invalid argument"));
}

#[test]
fn test_encoderError_timeout_shouldDisplaySeconds() {
    let error = EncoderError::Timeout {
        program: "ffprobe".to_string(),
        secs: 30,
    };
    assert!(format!("{}", error).contains("30 seconds"));
}

#[test]
fn test_renderError_stage_shouldMatchVariant() {
    let failure = || EncoderError::Probe("bad".to_string());
    assert_eq!(RenderError::Cut(failure()).stage(), RenderStage::Cut);
    assert_eq!(RenderError::Probe(failure()).stage(), RenderStage::Probe);
    assert_eq!(RenderError::Overlay(failure()).stage(), RenderStage::Overlay);

    let missing = RenderError::MissingOutput {
        stage: RenderStage::Overlay,
        path: PathBuf::from("segment_0002.mp4"),
    };
    assert_eq!(missing.stage(), RenderStage::Overlay);
    assert!(format!("{}", missing).contains("overlay"));
}

#[test]
fn test_pipelineError_zeroSuccess_shouldListFailedIndices() {
    let error = PipelineError::ZeroSuccessfulSegments {
        total: 2,
        failed_indices: vec![0, 1],
    };
    let display = format!("{}", error);
    assert!(display.contains("2 items"));
    assert!(display.contains("[0, 1]"));
}

#[test]
fn test_jobError_overlapping_shouldDisplayTimes() {
    let error = JobError::Overlapping {
        index: 3,
        begin: 1.5,
        previous_end: 2.0,
    };
    let display = format!("{}", error);
    assert!(display.contains("Item 3"));
    assert!(display.contains("1.500s"));
    assert!(display.contains("2.000s"));
}

#[test]
fn test_appError_fromConversions_shouldWrapSources() {
    let app_error: AppError = PipelineError::ConcatenationFailure("exit 1".to_string()).into();
    assert!(matches!(app_error, AppError::Pipeline(_)));

    let app_error: AppError = JobError::Parse("bad json".to_string()).into();
    assert!(format!("{}", app_error).contains("bad json"));

    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    let app_error: AppError = io_error.into();
    assert!(matches!(app_error, AppError::File(_)));

    let app_error: AppError = anyhow::anyhow!("something odd").into();
    assert!(matches!(app_error, AppError::Unknown(_)));
}
