//! CNJ 案件编号的解析与格式化

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

/// 宽松格式：`NNNNNNN-DD.AAAA.J.TR.OOOO`，分隔符可省略，序号可少于 7 位
static LOOSE_CNJ: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,7})-?([0-9]{2})\.?([0-9]{4})\.?([0-9])\.?([0-9]{2})\.?([0-9]{4})")
        .expect("CNJ 正则表达式无效")
});

/// 表格中被接受的纯数字编号长度范围
pub const MIN_DIGITS: usize = 15;
pub const MAX_DIGITS: usize = 20;

/// CNJ 编号的各个组成部分，均已补零到固定宽度
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CaseParts {
    /// 序号 (7 位)
    pub sequential: String,
    /// 校验位 (2 位)
    pub check_digits: String,
    /// 年份 (4 位)
    pub year: String,
    /// 司法分支 (1 位)
    pub branch: String,
    /// 法院 (2 位)
    pub court: String,
    /// 来源单位 (4 位)
    pub origin: String,
}

impl CaseParts {
    /// 解析案件编号
    ///
    /// 先尝试 20 位纯数字，再尝试宽松的 CNJ 格式；都不匹配时返回 `None`。
    pub fn parse(identifier: &str) -> Option<Self> {
        let digits = digits_only(identifier);
        if digits.len() == 20 {
            return Some(Self {
                sequential: digits[0..7].to_string(),
                check_digits: digits[7..9].to_string(),
                year: digits[9..13].to_string(),
                branch: digits[13..14].to_string(),
                court: digits[14..16].to_string(),
                origin: digits[16..20].to_string(),
            });
        }

        let caps = LOOSE_CNJ.captures(identifier.trim())?;
        Some(Self {
            sequential: zero_pad(&caps[1], 7),
            check_digits: zero_pad(&caps[2], 2),
            year: zero_pad(&caps[3], 4),
            branch: caps[4].to_string(),
            court: zero_pad(&caps[5], 2),
            origin: zero_pad(&caps[6], 4),
        })
    }

    /// 拼回 20 位纯数字
    pub fn digits(&self) -> String {
        [
            self.sequential.as_str(),
            self.check_digits.as_str(),
            self.year.as_str(),
            self.branch.as_str(),
            self.court.as_str(),
            self.origin.as_str(),
        ]
        .concat()
    }
}

impl fmt::Display for CaseParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}.{}.{}.{}.{}",
            self.sequential, self.check_digits, self.year, self.branch, self.court, self.origin
        )
    }
}

/// 转成门户"快速访问"输入框需要的格式
///
/// 无法解析时原样返回，让后续步骤照常尝试。
pub fn format_for_search(identifier: &str) -> String {
    match CaseParts::parse(identifier) {
        Some(parts) => parts.to_string(),
        None => {
            warn!("⚠️ 无法将 '{}' 格式化为 CNJ 编号，按原样使用", identifier);
            identifier.to_string()
        }
    }
}

/// 只保留 ASCII 数字
pub fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

pub fn is_plausible_length(digits: &str) -> bool {
    (MIN_DIGITS..=MAX_DIGITS).contains(&digits.len())
}

fn zero_pad(value: &str, width: usize) -> String {
    format!("{:0>width$}", value, width = width)
}
