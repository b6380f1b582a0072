//! SLK 파일 변환 모듈
//!
//! 개별 SLK 파일의 파싱, 헤더 제거, CSV 저장을 담당합니다.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, SlkError};
use crate::sylk;

/// 변환 결과 앞부분에서 제거할 줄 수
///
/// 이 내보내기 템플릿은 실제 표 헤더 앞에 17줄의 메타데이터 블록을 붙입니다.
/// 파일 내용에서 유도한 값이 아니며, 다른 SLK 출처에는 맞지 않을 수 있습니다.
pub const HEADER_LINES: usize = 17;

/// 출력 폴더가 지정되지 않았을 때 사용하는 기본 폴더
pub const FALLBACK_OUTPUT_DIR: &str = "data/processed";

/// 파일 변환 결과
#[derive(Debug)]
pub struct ConvertResult {
    /// 입력 SLK 파일 경로
    pub input: PathBuf,
    /// 저장된 CSV 경로 (성공 시)
    pub output: Option<PathBuf>,
    /// 에러 메시지 (실패 시)
    pub error: Option<String>,
    /// 경고 메시지 (헤더 제거를 건너뛴 경우)
    pub warning: Option<String>,
    /// 기록한 바이트 수
    pub bytes_written: u64,
}

impl ConvertResult {
    /// 성공 결과 생성
    pub fn success(
        input: PathBuf,
        output: PathBuf,
        warning: Option<String>,
        bytes_written: u64,
    ) -> Self {
        Self {
            input,
            output: Some(output),
            error: None,
            warning,
            bytes_written,
        }
    }

    /// 실패 결과 생성
    pub fn failure(input: PathBuf, error: String) -> Self {
        Self {
            input,
            output: None,
            error: Some(error),
            warning: None,
            bytes_written: 0,
        }
    }

    pub fn is_success(&self) -> bool {
        self.output.is_some()
    }
}

/// 변환 옵션
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// 출력 폴더 (None이면 `FALLBACK_OUTPUT_DIR`)
    pub output_dir: Option<PathBuf>,
}

impl ConvertOptions {
    /// 기본 옵션 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 출력 폴더 설정
    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }
}

/// 헤더 제거 결과
#[derive(Debug, Clone, PartialEq)]
pub enum TrimOutcome {
    /// 앞 17줄을 제거한 본문
    Trimmed(String),
    /// 줄 수가 부족하여 원본 그대로 유지
    TooShort { content: String, line_count: usize },
}

impl TrimOutcome {
    pub fn content(&self) -> &str {
        match self {
            TrimOutcome::Trimmed(content) => content,
            TrimOutcome::TooShort { content, .. } => content,
        }
    }

    pub fn into_content(self) -> String {
        match self {
            TrimOutcome::Trimmed(content) => content,
            TrimOutcome::TooShort { content, .. } => content,
        }
    }
}

/// CSV 텍스트에서 메타데이터 헤더 블록 제거
///
/// 줄 수가 `HEADER_LINES`보다 많으면 나머지 줄을 `\n`으로 다시 이어 붙이고,
/// 그렇지 않으면 입력을 그대로 돌려줍니다.
pub fn trim_header(text: &str) -> TrimOutcome {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() > HEADER_LINES {
        TrimOutcome::Trimmed(lines[HEADER_LINES..].join("\n"))
    } else {
        TrimOutcome::TooShort {
            content: text.to_string(),
            line_count: lines.len(),
        }
    }
}

/// CSV 텍스트를 파일로 저장 (기존 파일은 덮어씀)
///
/// # Returns
/// 기록한 바이트 수
pub fn write_csv(content: &str, path: &Path) -> Result<u64> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| SlkError::CreateDirError {
            path: parent.to_path_buf(),
            reason: e.to_string(),
        })?;
    }

    let write_err = |e: std::io::Error| SlkError::WriteError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    let file = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(content.as_bytes()).map_err(write_err)?;
    writer.flush().map_err(write_err)?;

    Ok(content.len() as u64)
}

/// 입력 경로로부터 출력 CSV 경로 결정
///
/// 파일 이름의 확장자를 `.csv`로 바꾸고 출력 폴더에 붙입니다.
pub fn output_path_for(input: &Path, options: &ConvertOptions) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .ok_or_else(|| SlkError::InvalidFileName {
            path: input.to_path_buf(),
        })?;

    let mut file_name = stem.to_os_string();
    file_name.push(".csv");

    let dir = options
        .output_dir
        .as_deref()
        .unwrap_or_else(|| Path::new(FALLBACK_OUTPUT_DIR));
    Ok(dir.join(file_name))
}

/// 단일 SLK 파일 변환
///
/// 어떤 단계에서 실패하더라도 에러를 전파하지 않고 실패 결과를 돌려줍니다.
///
/// # Arguments
/// * `input` - 변환할 SLK 파일 경로
/// * `options` - 변환 옵션
pub fn convert_file(input: &Path, options: &ConvertOptions) -> ConvertResult {
    match convert_file_internal(input, options) {
        Ok((output, warning, bytes)) => {
            ConvertResult::success(input.to_path_buf(), output, warning, bytes)
        }
        Err(e) => ConvertResult::failure(input.to_path_buf(), e.to_string()),
    }
}

/// 내부 변환 로직
fn convert_file_internal(
    input: &Path,
    options: &ConvertOptions,
) -> Result<(PathBuf, Option<String>, u64)> {
    let output = output_path_for(input, options)?;
    let csv = sylk::render_csv(input)?;

    let (content, warning) = match trim_header(&csv) {
        TrimOutcome::Trimmed(content) => (content, None),
        TrimOutcome::TooShort {
            content,
            line_count,
        } => (
            content,
            Some(format!(
                "CSV가 {}줄뿐이라 ({}줄 이하) 헤더를 제거하지 않고 그대로 저장합니다: {}",
                line_count,
                HEADER_LINES,
                input.display()
            )),
        ),
    };

    let bytes = write_csv(&content, &output)?;
    Ok((output, warning, bytes))
}
