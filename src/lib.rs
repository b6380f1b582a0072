//! slkconv - SLK TO CSV CONVERTER
//!
//! 폴더 내 SYLK(.slk) 스프레드시트 파일들을 CSV 파일로 일괄 변환하는 CLI 도구입니다.
//!
//! # 주요 기능
//!
//! - 📄 **SYLK 파싱**: 셀/서식/경계 레코드 해석, 날짜 서식 셀 변환, ANSI 인코딩 지원
//! - ✂️ **헤더 제거**: 내보내기 템플릿의 17줄 메타데이터 블록 제거
//! - 📊 **진행률 표시**: 파일별 진행률, 경과 시간, 남은 예상 시간
//! - 🛡️ **실패 격리**: 개별 파일 실패는 기록만 하고 나머지 파일 계속 처리
//! - 📝 **에러 로그**: 실패한 파일 목록을 로그 파일로 저장
//!
//! # 예제
//!
//! ```bash
//! # 기본 경로 (data/raw/2023 -> data/processed/2023)
//! slkconv
//!
//! # 경로 지정
//! slkconv -i ./data/raw/2024 -o ./data/processed/2024
//! ```

pub mod batch;
pub mod cli;
pub mod converter;
pub mod error;
pub mod stats;
pub mod sylk;

// Re-exports for convenient access
pub use batch::{
    collect_slk_files, has_slk_extension, process_directory, process_directory_with_progress,
    BatchOptions, BatchReport,
};
pub use cli::Args;
pub use converter::{
    convert_file, trim_header, write_csv, ConvertOptions, ConvertResult, TrimOutcome,
};
pub use error::{Result, SlkError};
pub use stats::{format_time, ProgressSnapshot, Statistics};
pub use sylk::render_csv;
