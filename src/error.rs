//! 에러 타입 정의 모듈
//!
//! slkconv에서 발생할 수 있는 모든 에러 타입을 정의합니다.

use std::path::PathBuf;
use thiserror::Error;

/// slkconv에서 발생할 수 있는 에러 타입
#[derive(Error, Debug)]
pub enum SlkError {
    /// SLK 파일 열기/읽기 실패
    #[error("파일을 열 수 없습니다 ({file}): {reason}")]
    FileOpenError { file: PathBuf, reason: String },

    /// SYLK 파싱 실패
    #[error("SLK 파싱 실패 ({file}): {reason}")]
    ParseError { file: PathBuf, reason: String },

    /// CSV 직렬화 실패
    #[error("CSV 직렬화 실패 ({file}): {reason}")]
    SerializeError { file: PathBuf, reason: String },

    /// 출력 폴더 생성 실패
    #[error("출력 폴더를 만들 수 없습니다 ({path}): {reason}")]
    CreateDirError { path: PathBuf, reason: String },

    /// 파일 쓰기 실패
    #[error("파일 쓰기 실패 ({path}): {reason}")]
    WriteError { path: PathBuf, reason: String },

    /// 입력 폴더 목록 조회 실패
    #[error("폴더를 읽을 수 없습니다 ({path}): {reason}")]
    ReadDirError { path: PathBuf, reason: String },

    /// 출력 파일 이름을 만들 수 없는 입력 경로
    #[error("유효하지 않은 파일 이름: {path}")]
    InvalidFileName { path: PathBuf },
}

/// slkconv 결과 타입 별칭
pub type Result<T> = std::result::Result<T, SlkError>;
