/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use vocabcut::file_utils::{FileManager, FileType};

use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "test_file_exists.tmp", "test content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path()));
    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

/// Test that ensure_dir creates nested directories
#[test]
fn test_ensure_dir_withNonExistentDir_shouldCreateDirectory() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("a").join("b");

    FileManager::ensure_dir(&nested)?;

    assert!(FileManager::dir_exists(&nested));
    Ok(())
}

/// Test that write_to_file creates parents and read_to_string reads it back
#[test]
fn test_write_to_file_withMissingParent_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("out").join("notes.txt");

    FileManager::write_to_file(&path, "hello")?;

    assert_eq!(FileManager::read_to_string(&path)?, "hello");
    assert_eq!(FileManager::file_size(&path), 5);
    Ok(())
}

/// Test that read_to_string fails for missing files
#[test]
fn test_read_to_string_withMissingFile_shouldFail() {
    assert!(FileManager::read_to_string("/nonexistent/dir/file.json").is_err());
}

/// Test recursive, case-insensitive, sorted extension search
#[test]
fn test_find_files_withNestedDirs_shouldFindSortedMatches() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("nested");
    FileManager::ensure_dir(&nested)?;

    common::create_test_file(temp_dir.path(), "b.json", "{}")?;
    common::create_test_file(temp_dir.path(), "a.JSON", "{}")?;
    common::create_test_file(&nested, "c.json", "{}")?;
    common::create_test_file(temp_dir.path(), "video.mp4", "")?;

    let found = FileManager::find_files(temp_dir.path(), ".json")?;

    assert_eq!(found.len(), 3);
    assert!(found[0].ends_with("a.JSON"));
    assert!(found[1].ends_with("b.json"));
    assert!(found[2].ends_with("nested/c.json"));
    Ok(())
}

/// Test classification of job files and videos
#[test]
fn test_detect_file_type_withKnownExtensions_shouldClassify() {
    assert_eq!(FileManager::detect_file_type("series/9_1.MKV"), FileType::Video);
    assert_eq!(FileManager::detect_file_type("jobs/job.json"), FileType::Job);
    assert_eq!(FileManager::detect_file_type("subtitle.srt"), FileType::Unknown);
}
