//! 案件处理上下文
//!
//! 封装"我正在处理第几个案件、编号是什么"这一信息

use std::fmt::Display;

/// 案件处理上下文
#[derive(Debug, Clone)]
pub struct ProcessCtx {
    /// 表格中的纯数字编号
    pub process_number: String,

    /// 在待处理列表中的位置（从 1 开始，仅用于日志）
    pub index: usize,

    /// 待处理总数
    pub total: usize,
}

impl ProcessCtx {
    pub fn new(process_number: impl Into<String>, index: usize, total: usize) -> Self {
        Self {
            process_number: process_number.into(),
            index,
            total,
        }
    }
}

impl Display for ProcessCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[案件 {}/{} #{}]", self.index, self.total, self.process_number)
    }
}
