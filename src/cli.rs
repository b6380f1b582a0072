//! CLI 인자 파싱 모듈
//!
//! clap을 사용한 명령줄 인자 정의 및 파싱을 담당합니다.
//! 인자 없이 실행하면 기본 입력/출력 경로로 동작합니다.

use clap::Parser;
use std::path::PathBuf;

use crate::batch::BatchOptions;
use crate::converter::ConvertOptions;

/// 기본 입력 경로 (폴더 또는 단일 SLK 파일)
pub const DEFAULT_INPUT_PATH: &str = "data/raw/2023";

/// 기본 출력 폴더
pub const DEFAULT_OUTPUT_DIR: &str = "data/processed/2023";

/// slkconv CLI 인자 구조체
#[derive(Parser, Debug)]
#[command(
    name = "slkconv",
    author = "YourName <your@email.com>",
    version,
    about = "SLK TO CSV CONVERTER - 폴더 내 SYLK(.slk) 파일들을 CSV로 일괄 변환하는 CLI 도구",
    long_about = r#"
SLK TO CSV CONVERTER
====================

지정된 폴더 내의 모든 SLK 파일을 CSV 파일로 변환합니다.
변환된 CSV의 앞 17줄(내보내기 메타데이터 블록)은 제거됩니다.

특징:
  • 파일별 진행률 및 남은 시간 표시
  • 실패한 파일은 건너뛰고 계속 처리
  • 처리 통계 및 에러 로그

예제:
  slkconv
  slkconv -i ./data/raw/2024 -o ./data/processed/2024
  slkconv -i ./data/raw/Q1.slk
  slkconv -i ./data/raw --max-depth 2 --log errors.txt
"#
)]
pub struct Args {
    /// SLK 파일들이 있는 입력 폴더 또는 단일 SLK 파일 경로
    #[arg(short, long, default_value = DEFAULT_INPUT_PATH)]
    pub input: PathBuf,

    /// CSV 파일이 저장될 출력 폴더
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// 최대 폴더 탐색 깊이 (1이면 입력 폴더 바로 아래만)
    #[arg(long, default_value_t = 1)]
    pub max_depth: usize,

    /// 진행률 바 없이 처리
    #[arg(long)]
    pub no_progress: bool,

    /// 실제 변환 없이 처리될 파일 목록만 표시
    #[arg(long)]
    pub dry_run: bool,

    /// 에러 로그 파일 경로
    #[arg(long)]
    pub log: Option<PathBuf>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT_PATH),
            output: PathBuf::from(DEFAULT_OUTPUT_DIR),
            max_depth: 1,
            no_progress: false,
            dry_run: false,
            log: None,
        }
    }
}

impl Args {
    /// 파일별 변환 옵션 생성
    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions::new().with_output_dir(Some(self.output.clone()))
    }

    /// 일괄 처리 옵션 생성
    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions::new(self.convert_options()).with_max_depth(self.max_depth)
    }
}
