//! 통계 및 유틸리티 모듈
//!
//! 처리 통계 수집, 진행 상태 계산 및 포맷팅을 담당합니다.

use colored::Colorize;
use std::time::{Duration, Instant};

use crate::converter::ConvertResult;

/// 진행률 바 폭 (문자 수)
pub const BAR_WIDTH: usize = 40;

/// 배치 진행 상태 스냅샷
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSnapshot {
    /// 처리 완료 파일 수
    pub completed: usize,
    /// 전체 파일 수
    pub total: usize,
    /// 배치 시작 후 경과 시간 (초)
    pub elapsed: f64,
}

impl ProgressSnapshot {
    pub fn new(completed: usize, total: usize, elapsed: f64) -> Self {
        Self {
            completed,
            total,
            elapsed,
        }
    }

    /// 진행 비율 (0.0 ~ 1.0)
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }

    /// 정수 백분율 (소수점 버림)
    pub fn percent(&self) -> u32 {
        (self.fraction() * 100.0) as u32
    }

    /// 남은 예상 시간 (초)
    pub fn remaining(&self) -> f64 {
        estimate_remaining(self.elapsed, self.fraction())
    }

    /// 고정 폭 텍스트 막대
    pub fn bar(&self, width: usize) -> String {
        let filled = ((width as f64 * self.fraction()) as usize).min(width);
        format!("{}{}", "█".repeat(filled), "-".repeat(width - filled))
    }

    /// 진행 상황 한 줄 렌더링
    pub fn render(&self) -> String {
        format!(
            "[{}] {}% | {}/{} files | Time: {} | ETA: {}",
            self.bar(BAR_WIDTH),
            self.percent(),
            self.completed,
            self.total,
            format_time(self.elapsed),
            format_time(self.remaining())
        )
    }
}

/// 처리 통계 구조체
#[derive(Debug)]
pub struct Statistics {
    /// 총 파일 수
    pub total_files: usize,
    /// 성공 변환 수
    pub success_count: usize,
    /// 실패 수
    pub error_count: usize,
    /// 헤더가 잘리지 않은 (짧은) 파일 수
    pub warning_count: usize,
    /// 쓴 총 바이트
    pub total_bytes_written: u64,
    /// 실패한 파일과 사유
    pub errors: Vec<(std::path::PathBuf, String)>,
    /// 처리 시작 시간
    start_time: Instant,
}

impl Statistics {
    /// 새 통계 인스턴스 생성
    pub fn new(total_files: usize, start_time: Instant) -> Self {
        Self {
            total_files,
            success_count: 0,
            error_count: 0,
            warning_count: 0,
            total_bytes_written: 0,
            errors: Vec::new(),
            start_time,
        }
    }

    /// 변환 결과 반영
    pub fn record(&mut self, result: &ConvertResult) {
        if result.warning.is_some() {
            self.warning_count += 1;
        }
        if result.is_success() {
            self.success_count += 1;
            self.total_bytes_written += result.bytes_written;
        } else {
            self.error_count += 1;
            if let Some(ref error) = result.error {
                self.errors.push((result.input.clone(), error.clone()));
            }
        }
    }

    /// 처리 완료 파일 수
    pub fn processed(&self) -> usize {
        self.success_count + self.error_count
    }

    /// 경과 시간 반환
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// 현재 진행 상태 스냅샷
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot::new(
            self.processed(),
            self.total_files,
            self.elapsed().as_secs_f64(),
        )
    }

    /// 처리 통계 요약 출력
    pub fn print_summary(&self) {
        println!("\n{}", "═".repeat(50).bright_blue());
        println!("{}", " 📊 처리 통계".bright_white().bold());
        println!("{}", "═".repeat(50).bright_blue());

        println!(
            "  {} 전체 파일:    {}",
            "📁".bright_cyan(),
            self.total_files
        );
        println!(
            "  {} 성공:         {}",
            "✅".bright_green(),
            self.success_count.to_string().green()
        );

        if self.error_count > 0 {
            println!(
                "  {} 실패:         {}",
                "❌".bright_red(),
                self.error_count.to_string().red()
            );
        } else {
            println!("  {} 실패:         {}", "✅".bright_green(), "0".green());
        }

        if self.warning_count > 0 {
            println!(
                "  {} 경고:         {}",
                "⚠️".bright_yellow(),
                self.warning_count.to_string().yellow()
            );
        }

        println!(
            "  {} 출력 용량:    {}",
            "📤".bright_magenta(),
            format_bytes(self.total_bytes_written)
        );

        if self.total_files > 0 {
            let success_rate = (self.success_count as f64 / self.total_files as f64) * 100.0;
            println!(
                "  {} 성공률:       {:.1}%",
                "📈".bright_white(),
                success_rate
            );
        }

        println!(
            "  {} 처리 시간:    {}",
            "⏱️".bright_cyan(),
            format_time(self.elapsed().as_secs_f64())
        );

        println!("{}", "═".repeat(50).bright_blue());
    }
}

/// 초 단위 시간을 `HH:MM:SS` 형식으로 변환
///
/// 소수점 이하는 버리고, 시는 24를 넘어도 그대로 표시합니다.
///
/// # Examples
/// ```
/// use slkconv::stats::format_time;
///
/// assert_eq!(format_time(0.0), "00:00:00");
/// assert_eq!(format_time(3661.9), "01:01:01");
/// ```
pub fn format_time(seconds: f64) -> String {
    let total = seconds as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// 선형 외삽으로 남은 시간 추정
///
/// 진행 비율이 0이면 0을 반환합니다.
pub fn estimate_remaining(elapsed: f64, fraction: f64) -> f64 {
    if fraction > 0.0 {
        elapsed / fraction - elapsed
    } else {
        0.0
    }
}

/// 바이트를 읽기 쉬운 형식으로 변환
///
/// # Examples
/// ```
/// use slkconv::stats::format_bytes;
///
/// assert_eq!(format_bytes(500), "500 B");
/// assert_eq!(format_bytes(1024), "1.00 KB");
/// assert_eq!(format_bytes(1048576), "1.00 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
