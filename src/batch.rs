//! 폴더 일괄 변환 모듈
//!
//! 폴더 내 SLK 파일을 찾아 하나씩 변환하고, 선택적으로 진행률을 표시합니다.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressState, ProgressStyle};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

use crate::converter::{convert_file, ConvertOptions, ConvertResult};
use crate::error::{Result, SlkError};
use crate::stats::{estimate_remaining, format_time, Statistics, BAR_WIDTH};

/// SLK 확장자 (대소문자 구분 없음)
pub const SLK_EXTENSION: &str = ".slk";

/// 일괄 처리 옵션
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// 파일별 변환 옵션
    pub convert: ConvertOptions,
    /// 최대 폴더 탐색 깊이 (1이면 입력 폴더 바로 아래만)
    pub max_depth: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            convert: ConvertOptions::default(),
            max_depth: 1,
        }
    }
}

impl BatchOptions {
    pub fn new(convert: ConvertOptions) -> Self {
        Self {
            convert,
            ..Default::default()
        }
    }

    /// 탐색 깊이 설정
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }
}

/// 일괄 처리 결과
#[derive(Debug)]
pub struct BatchReport {
    /// 저장된 CSV 경로 (처리 순서)
    pub processed: Vec<PathBuf>,
    /// 처리 통계
    pub stats: Statistics,
}

impl BatchReport {
    fn empty(start: Instant) -> Self {
        Self {
            processed: Vec::new(),
            stats: Statistics::new(0, start),
        }
    }
}

/// 파일 이름이 `.slk`로 끝나는지 확인 (대소문자 무시)
pub fn has_slk_extension(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase().ends_with(SLK_EXTENSION))
        .unwrap_or(false)
}

/// SLK 파일 수집
///
/// 정렬하지 않으므로 결과는 파일 시스템의 목록 순서를 따릅니다.
/// 파일을 가리키는 심볼릭 링크도 포함하며, 폴더 링크는 따라가지 않습니다.
pub fn collect_slk_files(input_dir: &Path, max_depth: usize) -> Result<Vec<PathBuf>> {
    let read_dir_err = |reason: String| SlkError::ReadDirError {
        path: input_dir.to_path_buf(),
        reason,
    };

    if !input_dir.is_dir() {
        return Err(read_dir_err("폴더가 존재하지 않습니다".to_string()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(input_dir).min_depth(1).max_depth(max_depth) {
        let entry = entry.map_err(|e| read_dir_err(e.to_string()))?;
        if entry.path().is_file() && has_slk_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// 콘솔 출력 대상 (진행률 바가 있으면 바 위에 출력)
enum Console {
    Plain,
    Progress(ProgressBar),
}

impl Console {
    fn info(&self, line: String) {
        match self {
            Console::Plain => println!("{}", line),
            // pb.println은 바의 출력 대상(stderr)으로 가므로 stdout에 직접 출력
            Console::Progress(pb) => pb.suspend(|| println!("{}", line)),
        }
    }

    fn error(&self, line: String) {
        match self {
            Console::Plain => eprintln!("{}", line),
            Console::Progress(pb) => pb.suspend(|| eprintln!("{}", line)),
        }
    }
}

/// 변환 결과 한 건을 콘솔에 보고
fn report_result(console: &Console, result: &ConvertResult) {
    if let Some(ref warning) = result.warning {
        console.info(format!("  {} {}", "⚠️".bright_yellow(), warning.yellow()));
    }
    match (&result.output, &result.error) {
        (Some(output), _) => console.info(format!(
            "  {} CSV 저장 완료: {}",
            "✓".green(),
            output.display()
        )),
        (None, Some(error)) => console.error(format!(
            "  {} {} 처리 실패: {}",
            "✗".red(),
            result.input.display(),
            error.red()
        )),
        (None, None) => {}
    }
}

/// 단일 파일 변환 결과 출력 (진행률 바 없이)
pub fn print_result(result: &ConvertResult) {
    report_result(&Console::Plain, result);
}

/// 폴더 일괄 변환 (진행률 표시 없음)
///
/// # Arguments
/// * `input_dir` - SLK 파일이 있는 폴더
/// * `options` - 일괄 처리 옵션
/// * `start` - 배치 시작 시각 (경과 시간 계산 기준)
pub fn process_directory(input_dir: &Path, options: &BatchOptions, start: Instant) -> BatchReport {
    run_batch(input_dir, options, start, false)
}

/// 폴더 일괄 변환 (파일마다 진행률 표시)
pub fn process_directory_with_progress(
    input_dir: &Path,
    options: &BatchOptions,
    start: Instant,
) -> BatchReport {
    run_batch(input_dir, options, start, true)
}

fn run_batch(
    input_dir: &Path,
    options: &BatchOptions,
    start: Instant,
    show_progress: bool,
) -> BatchReport {
    let files = match collect_slk_files(input_dir, options.max_depth) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("{} {}", "❌".bright_red(), e.to_string().red());
            return BatchReport::empty(start);
        }
    };

    if files.is_empty() {
        println!(
            "{} SLK 파일을 찾을 수 없습니다: {}",
            "⚠️".bright_yellow(),
            input_dir.display()
        );
        return BatchReport::empty(start);
    }

    println!(
        "\n{} {} 개의 파일 처리 중...",
        "⚡".bright_cyan(),
        files.len().to_string().bright_green()
    );

    let mut report = BatchReport {
        processed: Vec::new(),
        stats: Statistics::new(files.len(), start),
    };

    let console = if show_progress {
        Console::Progress(create_progress_bar(files.len(), start))
    } else {
        Console::Plain
    };

    for path in &files {
        let result = convert_file(path, &options.convert);
        report_result(&console, &result);
        report.stats.record(&result);
        if let Some(output) = result.output {
            report.processed.push(output);
        }

        if let Console::Progress(ref pb) = console {
            pb.inc(1);
            if pb.is_hidden() {
                println!("{}", report.stats.snapshot().render());
            }
        }
    }

    if let Console::Progress(pb) = console {
        pb.finish();
    }

    report
}

/// 진행률 바 생성
///
/// 경과 시간과 남은 시간은 바 생성 시점이 아니라 배치 시작 시각 기준으로 계산합니다.
fn create_progress_bar(total: usize, start: Instant) -> ProgressBar {
    let template = format!(
        "[{{bar:{}}}] {{percent}}% | {{pos}}/{{len}} files | Time: {{batch_elapsed}} | ETA: {{batch_eta}}",
        BAR_WIDTH
    );

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::with_template(&template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .with_key(
                "batch_elapsed",
                move |_: &ProgressState, w: &mut dyn std::fmt::Write| {
                    let _ = write!(w, "{}", format_time(start.elapsed().as_secs_f64()));
                },
            )
            .with_key(
                "batch_eta",
                move |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                    let elapsed = start.elapsed().as_secs_f64();
                    let remaining = estimate_remaining(elapsed, state.fraction() as f64);
                    let _ = write!(w, "{}", format_time(remaining));
                },
            )
            .progress_chars("█-"),
    );
    pb
}
