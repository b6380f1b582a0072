//! slkconv - SLK TO CSV CONVERTER
//!
//! 메인 엔트리포인트

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use slkconv::{
    batch::{
        collect_slk_files, has_slk_extension, print_result, process_directory,
        process_directory_with_progress,
    },
    cli::Args,
    converter::convert_file,
    stats::format_time,
};

fn main() -> Result<()> {
    let args = Args::parse();
    let start = Instant::now();

    print_header(&args);
    println!(
        "  {} 시작 시각: {}",
        "🕒".bright_white(),
        Local::now().format("%H:%M:%S")
    );

    let errors = if args.input.is_dir() {
        run_directory(&args, start)
    } else if args.input.is_file() && has_slk_extension(&args.input) {
        run_single_file(&args)
    } else {
        println!(
            "{} 유효한 SLK 파일 또는 폴더가 아닙니다: {:?}",
            "⚠️".bright_yellow(),
            args.input
        );
        Vec::new()
    };

    // 로그 파일 작성
    if let Some(ref log_path) = args.log {
        write_error_log(log_path, &errors)
            .with_context(|| format!("에러 로그 저장 실패: {:?}", log_path))?;
    }

    println!(
        "\n{} 전체 처리 시간: {}\n",
        "⏱️".bright_cyan(),
        format_time(start.elapsed().as_secs_f64())
    );

    Ok(())
}

/// 헤더 출력
fn print_header(args: &Args) {
    println!("\n{}", "═".repeat(50).bright_blue());
    println!("{}", " 🚀 SLK TO CSV CONVERTER".bright_white().bold());
    println!("{}", "═".repeat(50).bright_blue());
    println!("  {} 입력 경로: {:?}", "📂".bright_cyan(), args.input);
    println!("  {} 출력 폴더: {:?}", "📄".bright_green(), args.output);

    if args.max_depth > 1 {
        println!("  {} 최대 깊이: {}", "📏".bright_white(), args.max_depth);
    }

    if args.dry_run {
        println!(
            "  {} {}",
            "⚠️".bright_yellow(),
            "드라이런 모드 (실제 변환 없음)".yellow()
        );
    }

    println!("{}", "═".repeat(50).bright_blue());
}

/// 폴더 처리
fn run_directory(args: &Args, start: Instant) -> Vec<(PathBuf, String)> {
    let options = args.batch_options();

    if args.dry_run {
        match collect_slk_files(&args.input, options.max_depth) {
            Ok(files) => print_dry_run(&files),
            Err(e) => eprintln!("{} {}", "❌".bright_red(), e.to_string().red()),
        }
        return Vec::new();
    }

    println!("\n{} 폴더 처리: {:?}", "📁".bright_cyan(), args.input);

    let report = if args.no_progress {
        process_directory(&args.input, &options, start)
    } else {
        process_directory_with_progress(&args.input, &options, start)
    };

    if report.stats.total_files > 0 {
        report.stats.print_summary();
    }

    report.stats.errors
}

/// 단일 파일 처리 (진행률 표시 없음)
fn run_single_file(args: &Args) -> Vec<(PathBuf, String)> {
    if args.dry_run {
        print_dry_run(std::slice::from_ref(&args.input));
        return Vec::new();
    }

    println!("\n{} 파일 처리: {:?}", "📄".bright_cyan(), args.input);

    let result = convert_file(&args.input, &args.convert_options());
    print_result(&result);

    match result.error {
        Some(error) => vec![(result.input, error)],
        None => Vec::new(),
    }
}

/// 드라이런 출력
fn print_dry_run(files: &[PathBuf]) {
    println!("\n{}", "📋 변환 예정 파일 목록:".bright_cyan());
    for (i, path) in files.iter().enumerate() {
        println!("  {}. {}", i + 1, path.display());
    }
    println!(
        "\n{} 총 {} 개의 파일이 변환될 예정입니다.",
        "ℹ️".bright_blue(),
        files.len().to_string().bright_green()
    );
}

/// 에러 로그 파일 작성
fn write_error_log(log_path: &Path, errors: &[(PathBuf, String)]) -> Result<()> {
    let mut log_file = File::create(log_path)?;

    writeln!(log_file, "slkconv 에러 로그")?;
    writeln!(
        log_file,
        "생성 시간: {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(log_file, "총 에러 수: {}", errors.len())?;
    writeln!(log_file, "{}", "=".repeat(50))?;

    for (path, error) in errors {
        writeln!(log_file, "\n파일: {:?}", path)?;
        writeln!(log_file, "에러: {}", error)?;
    }

    println!("\n{} 에러 로그 저장: {:?}", "📝".bright_cyan(), log_path);

    Ok(())
}
