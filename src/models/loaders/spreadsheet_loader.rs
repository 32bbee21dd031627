use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use tracing::{error, info, warn};

use crate::error::{AppError, AppResult, ConfigError};
use crate::models::process_number::{digits_only, is_plausible_length};

/// 表头中需要包含的关键字（不区分大小写）
const PROCESS_COLUMN_KEYWORD: &str = "processo";

/// 读取表格第一个工作表，返回有效的案件编号（纯数字，按表格顺序）
pub fn load_process_numbers(path: &Path) -> AppResult<Vec<String>> {
    info!("📄 正在读取表格: {}", path.display());

    if !path.exists() {
        return Err(ConfigError::SpreadsheetNotFound {
            path: path.display().to_string(),
        }
        .into());
    }

    let read_err = |e: calamine::Error| AppError::file_read_failed(path.display().to_string(), e);
    let mut workbook = open_workbook_auto(path).map_err(read_err)?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(read_err)?,
        None => {
            warn!("⚠️ 表格中没有工作表");
            return Ok(Vec::new());
        }
    };

    let rows = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>());

    Ok(extract_process_numbers(rows))
}

/// 从表格行中提取案件编号，第一行为表头
pub fn extract_process_numbers<I>(rows: I) -> Vec<String>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut rows = rows.into_iter();

    let Some(header) = rows.next() else {
        warn!("⚠️ 表格为空");
        return Vec::new();
    };

    let Some(column) = header
        .iter()
        .position(|h| h.to_lowercase().contains(PROCESS_COLUMN_KEYWORD))
    else {
        error!("❌ 表头中没有包含 '{}' 的列", PROCESS_COLUMN_KEYWORD);
        return Vec::new();
    };
    info!("✓ 找到案件编号列: '{}'", header[column]);

    let mut numbers = Vec::new();
    for row in rows {
        let raw = row.get(column).map(|v| v.trim()).unwrap_or_default();
        if raw.is_empty() {
            continue;
        }

        let digits = digits_only(raw);
        if is_plausible_length(&digits) {
            numbers.push(digits);
        } else {
            warn!("⚠️ 无效或无法识别的案件编号: '{}'", raw);
        }
    }

    numbers
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        // 纯数字编号可能被存成浮点数
        Data::Float(f) => format!("{:.0}", f),
        other => other.to_string(),
    }
}
