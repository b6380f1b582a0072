//! 통합 테스트 모듈
//!
//! slkconv의 전체 기능을 테스트합니다.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// 테스트용 SLK 파일 생성 헬퍼
fn create_slk_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// `rows`줄의 CSV로 변환되는 SLK 텍스트 (각 행: `row{n},{n}`)
fn slk_with_rows(rows: usize) -> String {
    let mut text = String::from("ID;PWXL;N;E\r\n");
    text.push_str(&format!("B;Y{};X2\r\n", rows));
    for r in 1..=rows {
        text.push_str(&format!("C;Y{};X1;K\"row{}\"\r\n", r, r));
        text.push_str(&format!("C;X2;K{}\r\n", r));
    }
    text.push_str("E\r\n");
    text
}

/// 정상/짧은/깨진 파일이 섞인 입력 폴더 생성
fn setup_mixed_directory() -> TempDir {
    let temp_dir = TempDir::new().unwrap();

    create_slk_file(temp_dir.path(), "Q1.slk", &slk_with_rows(20));
    create_slk_file(temp_dir.path(), "Q2.SLK", &slk_with_rows(30));
    create_slk_file(temp_dir.path(), "tiny.slk", &slk_with_rows(5));
    create_slk_file(temp_dir.path(), "broken.slk", "this is not sylk\n");
    create_slk_file(temp_dir.path(), "readme.txt", "ignored");

    temp_dir
}

mod sylk_tests {
    use super::*;
    use slkconv::render_csv;

    #[test]
    fn test_render_csv_rows() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_slk_file(temp_dir.path(), "a.slk", &slk_with_rows(3));

        let csv = render_csv(&path).unwrap();
        assert_eq!(csv, "row1,1\nrow2,2\nrow3,3\n");
    }

    #[test]
    fn test_render_csv_ansi_text() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ansi.slk");
        fs::write(&path, b"ID;P\r\nC;Y1;X1;K\"Z\xFCrich\"\r\nE\r\n").unwrap();

        assert_eq!(render_csv(&path).unwrap(), "Zürich\n");
    }

    #[test]
    fn test_render_csv_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = render_csv(&temp_dir.path().join("missing.slk")).unwrap_err();
        assert!(err.to_string().contains("missing.slk"));
    }
}

mod converter_tests {
    use super::*;
    use slkconv::converter::{convert_file, ConvertOptions};

    #[test]
    fn test_convert_trims_header_block() {
        let temp_dir = TempDir::new().unwrap();
        let input = create_slk_file(temp_dir.path(), "Q1.slk", &slk_with_rows(20));
        let out_dir = temp_dir.path().join("out");

        let options = ConvertOptions::new().with_output_dir(Some(out_dir.clone()));
        let result = convert_file(&input, &options);

        assert!(result.is_success());
        assert!(result.warning.is_none());
        assert_eq!(result.output, Some(out_dir.join("Q1.csv")));
        assert_eq!(
            fs::read_to_string(out_dir.join("Q1.csv")).unwrap(),
            "row18,18\nrow19,19\nrow20,20"
        );
    }

    #[test]
    fn test_convert_short_file_keeps_content() {
        let temp_dir = TempDir::new().unwrap();
        let input = create_slk_file(temp_dir.path(), "tiny.slk", &slk_with_rows(5));
        let out_dir = temp_dir.path().join("out");

        let options = ConvertOptions::new().with_output_dir(Some(out_dir.clone()));
        let result = convert_file(&input, &options);

        assert!(result.is_success());
        assert!(result.warning.unwrap().contains("tiny.slk"));
        assert_eq!(
            fs::read_to_string(out_dir.join("tiny.csv")).unwrap(),
            "row1,1\nrow2,2\nrow3,3\nrow4,4\nrow5,5\n"
        );
    }

    #[test]
    fn test_convert_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let input = create_slk_file(temp_dir.path(), "Q1.slk", &slk_with_rows(25));
        let out_dir = temp_dir.path().join("out");
        let options = ConvertOptions::new().with_output_dir(Some(out_dir.clone()));

        convert_file(&input, &options);
        let first = fs::read(out_dir.join("Q1.csv")).unwrap();
        convert_file(&input, &options);
        let second = fs::read(out_dir.join("Q1.csv")).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_convert_nonexistent_input() {
        let temp_dir = TempDir::new().unwrap();
        let options =
            ConvertOptions::new().with_output_dir(Some(temp_dir.path().join("out")));
        let result = convert_file(&temp_dir.path().join("ghost.slk"), &options);

        assert!(!result.is_success());
        assert!(result.output.is_none());
        assert!(result.error.is_some());
    }

    #[test]
    fn test_convert_unwritable_output() {
        let temp_dir = TempDir::new().unwrap();
        let input = create_slk_file(temp_dir.path(), "Q1.slk", &slk_with_rows(20));
        let blocker = create_slk_file(temp_dir.path(), "blocker", "file, not dir");

        let options = ConvertOptions::new().with_output_dir(Some(blocker));
        let result = convert_file(&input, &options);

        assert!(!result.is_success());
        assert!(result.error.unwrap().contains("출력 폴더"));
    }
}

mod batch_tests {
    use super::*;
    use slkconv::batch::{process_directory, process_directory_with_progress, BatchOptions};
    use slkconv::converter::ConvertOptions;
    use std::time::Instant;

    fn options_for(out_dir: &Path) -> BatchOptions {
        BatchOptions::new(ConvertOptions::new().with_output_dir(Some(out_dir.to_path_buf())))
    }

    #[test]
    fn test_process_directory_skips_failures() {
        let temp_dir = setup_mixed_directory();
        let out_dir = temp_dir.path().join("out");

        let report = process_directory(temp_dir.path(), &options_for(&out_dir), Instant::now());

        assert_eq!(report.processed.len(), 3);
        assert_eq!(report.stats.total_files, 4);
        assert_eq!(report.stats.success_count, 3);
        assert_eq!(report.stats.error_count, 1);
        assert_eq!(report.stats.warning_count, 1);
        assert!(out_dir.join("Q1.csv").exists());
        assert!(out_dir.join("Q2.csv").exists());
        assert!(out_dir.join("tiny.csv").exists());
        assert!(!out_dir.join("broken.csv").exists());
        assert!(report.stats.errors[0].0.ends_with("broken.slk"));
    }

    #[test]
    fn test_process_directory_with_progress_matches_plain() {
        let temp_dir = setup_mixed_directory();
        let out_dir = temp_dir.path().join("out");

        let report = process_directory_with_progress(
            temp_dir.path(),
            &options_for(&out_dir),
            Instant::now(),
        );

        let mut names: Vec<String> = report
            .processed
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["Q1.csv", "Q2.csv", "tiny.csv"]);
        assert_eq!(report.stats.processed(), 4);
    }

    #[test]
    fn test_huge_date_serial_does_not_stop_batch() {
        let temp_dir = TempDir::new().unwrap();
        let input_dir = temp_dir.path().join("in");
        fs::create_dir(&input_dir).unwrap();
        create_slk_file(
            &input_dir,
            "a.slk",
            "ID;P\r\nP;Pyyyy-mm-dd\r\nF;P0;FG0G;C1\r\nC;Y1;X1;K1E15\r\nE\r\n",
        );
        create_slk_file(&input_dir, "b.slk", &slk_with_rows(20));
        let out_dir = temp_dir.path().join("out");

        let report = process_directory(&input_dir, &options_for(&out_dir), Instant::now());

        assert_eq!(report.stats.success_count, 2);
        assert_eq!(fs::read_to_string(out_dir.join("a.csv")).unwrap(), "1E15\n");
        assert!(out_dir.join("b.csv").exists());
    }

    #[test]
    fn test_process_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        create_slk_file(temp_dir.path(), "notes.txt", "nothing here");

        let report = process_directory_with_progress(
            temp_dir.path(),
            &options_for(&temp_dir.path().join("out")),
            Instant::now(),
        );

        assert!(report.processed.is_empty());
        assert_eq!(report.stats.total_files, 0);
    }

    #[test]
    fn test_process_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("does-not-exist");

        let report = process_directory(&missing, &options_for(temp_dir.path()), Instant::now());

        assert!(report.processed.is_empty());
    }
}

mod error_tests {
    use slkconv::error::SlkError;
    use std::path::PathBuf;

    #[test]
    fn test_parse_error_display() {
        let error = SlkError::ParseError {
            file: PathBuf::from("Q1.slk"),
            reason: "unexpected record".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.contains("SLK 파싱 실패"));
        assert!(msg.contains("Q1.slk"));
    }

    #[test]
    fn test_write_error_display() {
        let error = SlkError::WriteError {
            path: PathBuf::from("out/Q1.csv"),
            reason: "disk full".to_string(),
        };
        assert!(error.to_string().contains("out/Q1.csv"));
    }
}
