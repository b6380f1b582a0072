//! SYLK 파싱 모듈
//!
//! SLK(SYmbolic LinK) 스프레드시트 파일을 읽어 셀 격자로 만들고
//! CSV 텍스트로 직렬화합니다.

use chrono::{Duration, NaiveDate};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{Result, SlkError};

/// 최대 행 수 (스프레드시트 행 한계)
pub const MAX_ROWS: usize = 1_048_576;

/// 최대 열 수
pub const MAX_COLS: usize = 16_384;

/// 파싱된 워크시트 (1-based 좌표를 0-based 격자에 저장)
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Sheet {
    rows: Vec<Vec<String>>,
    width: usize,
}

impl Sheet {
    /// 행 수
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// 열 수 (가장 넓은 행 기준)
    pub fn width(&self) -> usize {
        self.width
    }

    /// 셀 값 조회 (1-based, 비어 있으면 None)
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        if row == 0 || col == 0 {
            return None;
        }
        self.rows
            .get(row - 1)
            .and_then(|r| r.get(col - 1))
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    fn reserve(&mut self, rows: usize, cols: usize) {
        if self.rows.len() < rows {
            self.rows.resize_with(rows, Vec::new);
        }
        self.width = self.width.max(cols);
    }

    fn set(&mut self, row: usize, col: usize, value: String) {
        self.reserve(row, col);
        let cells = &mut self.rows[row - 1];
        if cells.len() < col {
            cells.resize(col, String::new());
        }
        cells[col - 1] = value;
    }

    /// CSV 텍스트로 직렬화 (모든 행을 최대 열 수에 맞춰 채움)
    pub fn to_csv(&self) -> std::result::Result<String, csv::Error> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        let mut record: Vec<&str> = Vec::with_capacity(self.width);
        for row in &self.rows {
            record.clear();
            record.extend(row.iter().map(String::as_str));
            record.resize(self.width, "");
            writer.write_record(&record)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| csv::Error::from(e.into_error()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// SLK 파일을 파싱하여 CSV 텍스트로 반환
///
/// # Arguments
/// * `path` - 읽을 SLK 파일 경로
///
/// # Returns
/// CSV 텍스트 또는 경로와 원인을 담은 에러
pub fn render_csv(path: &Path) -> Result<String> {
    let sheet = read_sheet(path)?;
    sheet.to_csv().map_err(|e| SlkError::SerializeError {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// SLK 파일을 읽어 워크시트로 파싱
pub fn read_sheet(path: &Path) -> Result<Sheet> {
    let bytes = fs::read(path).map_err(|e| SlkError::FileOpenError {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let text = decode(&bytes);
    parse_str(&text).map_err(|reason| SlkError::ParseError {
        file: path.to_path_buf(),
        reason,
    })
}

/// UTF-8이 아니면 Windows-1252(ANSI)로 디코딩
fn decode(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned(),
    }
}

/// 파서 진행 상태
#[derive(Default)]
struct ParserState {
    row: usize,
    col: usize,
    formats: Vec<String>,
    cell_formats: HashMap<(usize, usize), usize>,
    row_formats: HashMap<usize, usize>,
    col_formats: HashMap<usize, usize>,
}

impl ParserState {
    fn new() -> Self {
        Self {
            row: 1,
            col: 1,
            ..Default::default()
        }
    }

    fn format_for(&self, row: usize, col: usize) -> Option<&str> {
        self.cell_formats
            .get(&(row, col))
            .or_else(|| self.row_formats.get(&row))
            .or_else(|| self.col_formats.get(&col))
            .and_then(|&index| self.formats.get(index))
            .map(String::as_str)
    }
}

/// SYLK 텍스트 파싱
///
/// 에러는 줄 번호가 포함된 사유 문자열로 반환되며, 호출자가 파일 경로를 붙입니다.
pub fn parse_str(text: &str) -> std::result::Result<Sheet, String> {
    let mut sheet = Sheet::default();
    let mut state = ParserState::new();
    let mut seen_id = false;

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        let fields = split_fields(line);
        let kind = fields[0].as_str();

        if !seen_id {
            if kind != "ID" {
                return Err("SYLK 파일이 아닙니다 (ID 레코드로 시작하지 않음)".to_string());
            }
            seen_id = true;
            continue;
        }

        match kind {
            "B" => parse_bounds(&fields[1..], &mut sheet, line_no)?,
            "C" => parse_cell(&fields[1..], &mut sheet, &mut state, line_no)?,
            "F" => parse_format(&fields[1..], &mut state, line_no)?,
            "P" => {
                if let Some(pattern) = fields[1..].iter().find_map(|f| f.strip_prefix('P')) {
                    state.formats.push(pattern.to_string());
                }
            }
            "E" => break,
            _ => {}
        }
    }

    if !seen_id {
        return Err("SYLK 파일이 아닙니다 (빈 파일)".to_string());
    }

    Ok(sheet)
}

/// `;`로 필드 분리 (`;;`는 리터럴 세미콜론)
fn split_fields(record: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = record.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            ';' if chars.peek() == Some(&';') => {
                chars.next();
                current.push(';');
            }
            ';' => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);

    fields
}

fn parse_coordinate(
    value: &str,
    axis: char,
    line_no: usize,
) -> std::result::Result<usize, String> {
    let limit = if axis == 'Y' { MAX_ROWS } else { MAX_COLS };
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 && n <= limit => Ok(n),
        Ok(n) if n > limit => Err(format!(
            "{}번째 줄: {} 좌표 {}이(가) 한계 {}을(를) 넘습니다",
            line_no, axis, n, limit
        )),
        _ => Err(format!("{}번째 줄: 잘못된 {} 좌표 '{}'", line_no, axis, value)),
    }
}

fn parse_bounds(
    fields: &[String],
    sheet: &mut Sheet,
    line_no: usize,
) -> std::result::Result<(), String> {
    let mut rows = 0;
    let mut cols = 0;
    for field in fields {
        if let Some(v) = field.strip_prefix('Y') {
            rows = parse_coordinate(v, 'Y', line_no)?;
        } else if let Some(v) = field.strip_prefix('X') {
            cols = parse_coordinate(v, 'X', line_no)?;
        }
    }
    sheet.reserve(rows, cols);
    Ok(())
}

fn parse_cell(
    fields: &[String],
    sheet: &mut Sheet,
    state: &mut ParserState,
    line_no: usize,
) -> std::result::Result<(), String> {
    let mut value = None;
    for field in fields {
        if let Some(v) = field.strip_prefix('Y') {
            state.row = parse_coordinate(v, 'Y', line_no)?;
        } else if let Some(v) = field.strip_prefix('X') {
            state.col = parse_coordinate(v, 'X', line_no)?;
        } else if let Some(v) = field.strip_prefix('K') {
            value = Some(v);
        }
    }

    if let Some(raw) = value {
        let rendered = render_value(raw, state.format_for(state.row, state.col));
        sheet.set(state.row, state.col, rendered);
    }
    Ok(())
}

fn parse_format(
    fields: &[String],
    state: &mut ParserState,
    line_no: usize,
) -> std::result::Result<(), String> {
    let mut format = None;
    let mut column = None;
    let mut row = None;

    for field in fields {
        if let Some(v) = field.strip_prefix('Y') {
            state.row = parse_coordinate(v, 'Y', line_no)?;
        } else if let Some(v) = field.strip_prefix('X') {
            state.col = parse_coordinate(v, 'X', line_no)?;
        } else if let Some(v) = field.strip_prefix('P') {
            format = v.trim().parse::<usize>().ok();
        } else if let Some(v) = field.strip_prefix('C') {
            column = v.trim().parse::<usize>().ok();
        } else if let Some(v) = field.strip_prefix('R') {
            row = v.trim().parse::<usize>().ok();
        }
    }

    if let Some(index) = format {
        match (column, row) {
            (Some(c), _) => {
                state.col_formats.insert(c, index);
            }
            (None, Some(r)) => {
                state.row_formats.insert(r, index);
            }
            (None, None) => {
                state.cell_formats.insert((state.row, state.col), index);
            }
        }
    }
    Ok(())
}

/// K 필드 값 렌더링
fn render_value(raw: &str, format: Option<&str>) -> String {
    if let Some(text) = raw.strip_prefix('"') {
        return text.strip_suffix('"').unwrap_or(text).to_string();
    }

    if let Some(pattern) = format.and_then(date_format) {
        let date = raw
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(|serial| serial_to_date(serial, &pattern));
        if let Some(date) = date {
            return date;
        }
    }

    raw.to_string()
}

/// 1900 날짜 체계의 일련번호를 날짜 문자열로 변환
fn serial_to_date(serial: f64, pattern: &str) -> Option<String> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let days = serial.floor();
    let seconds = ((serial - days) * 86_400.0).round() as i64;
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let datetime = base
        .checked_add_signed(Duration::try_days(days as i64)?)?
        .checked_add_signed(Duration::try_seconds(seconds)?)?;
    Some(datetime.format(pattern).to_string())
}

/// 스프레드시트 날짜 서식을 chrono 서식 문자열로 변환
///
/// 날짜/시간 서식이 아니면 None을 반환합니다.
fn date_format(pattern: &str) -> Option<String> {
    let section = pattern.split(';').next().unwrap_or_default();
    if section.eq_ignore_ascii_case("general")
        || section.contains(['0', '#', '?', '@'])
    {
        return None;
    }

    let chars: Vec<char> = section.chars().collect();
    let twelve_hour = (0..chars.len()).any(|i| ampm_marker_len(&chars[i..]).is_some());
    let mut out = String::new();
    let mut found = false;
    let mut last_was_hour = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let lower = c.to_ascii_lowercase();

        if let Some(len) = ampm_marker_len(&chars[i..]) {
            out.push_str("%p");
            i += len;
            continue;
        }

        if matches!(lower, 'y' | 'd' | 'm' | 'h' | 's') {
            let run = chars[i..]
                .iter()
                .take_while(|ch| ch.to_ascii_lowercase() == lower)
                .count();
            found = true;
            match lower {
                'y' => out.push_str(if run >= 3 { "%Y" } else { "%y" }),
                'd' => out.push_str(match run {
                    1 => "%-d",
                    2 => "%d",
                    3 => "%a",
                    _ => "%A",
                }),
                'h' => out.push_str(match (twelve_hour, run) {
                    (true, 1) => "%-I",
                    (true, _) => "%I",
                    (false, 1) => "%-H",
                    (false, _) => "%H",
                }),
                's' => out.push_str("%S"),
                _ => {
                    let seconds_follow = chars[i + run..]
                        .iter()
                        .find(|ch| ch.is_ascii_alphabetic())
                        .map(|ch| ch.to_ascii_lowercase() == 's')
                        .unwrap_or(false);
                    if last_was_hour || seconds_follow {
                        out.push_str("%M");
                    } else {
                        out.push_str(match run {
                            1 => "%-m",
                            2 => "%m",
                            3 => "%b",
                            _ => "%B",
                        });
                    }
                }
            }
            last_was_hour = lower == 'h';
            i += run;
            continue;
        }

        match c {
            '\\' => {
                if let Some(&next) = chars.get(i + 1) {
                    push_literal(&mut out, next);
                }
                i += 2;
            }
            '"' => {
                i += 1;
                while i < chars.len() && chars[i] != '"' {
                    push_literal(&mut out, chars[i]);
                    i += 1;
                }
                i += 1;
            }
            '[' => {
                // [$-409], [Red] 같은 로캘/색상 지정자
                while i < chars.len() && chars[i] != ']' {
                    i += 1;
                }
                i += 1;
            }
            _ => {
                push_literal(&mut out, c);
                i += 1;
            }
        }
    }

    found.then_some(out)
}

/// `AM/PM` 또는 `A/P` 표식 길이 (대소문자 무시)
fn ampm_marker_len(chars: &[char]) -> Option<usize> {
    ["am/pm", "a/p"].iter().find_map(|marker| {
        let len = marker.chars().count();
        let matches = chars.len() >= len
            && chars[..len]
                .iter()
                .zip(marker.chars())
                .all(|(c, m)| c.to_ascii_lowercase() == m);
        matches.then_some(len)
    })
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}
