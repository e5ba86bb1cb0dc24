// ==========================================
// AutoTrac 作业分析系统 - 原始表格模型
// ==========================================
// 用途: 文件解析产物（表头 + 行），解析后即丢弃
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

static EMPTY_CELL: CellValue = CellValue::Empty;

// ==========================================
// CellValue - 单元格原始值
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Empty,
}

impl CellValue {
    /// 从文本构造（空白文本视为 Empty）
    pub fn from_text(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(trimmed.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }

    /// 字符串化并去除首尾空白
    ///
    /// 整数值的浮点数不带小数部分（100.0 → "100"），
    /// 保证 Excel 数值单元格与 CSV 文本单元格得到相同的机器号。
    pub fn as_key(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            CellValue::Number(n) => Some(format_number(*n)),
        }
    }

    /// 数值视图（文本按十进制解析，失败返回 None）
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if n.is_finite() => Some(*n),
            CellValue::Number(_) => None,
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            CellValue::Empty => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", format_number(*n)),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Empty => Ok(()),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

// ==========================================
// RawTable - 原始表格
// ==========================================
// 表头保持源文件原样（大小写/空格/标点/重音均不统一）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTable {
    /// 来源标识（文件名或班次槽位，用于错误信息）
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    /// 追加一行（完全空白的行被跳过）
    pub fn push_row(&mut self, row: Vec<CellValue>) -> bool {
        if row.iter().all(CellValue::is_empty) {
            return false;
        }
        self.rows.push(row);
        true
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 读取单元格，越界（短行）视为空
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_key_trims_and_drops_fraction() {
        assert_eq!(CellValue::Text("  T-100 ".into()).as_key(), Some("T-100".into()));
        assert_eq!(CellValue::Number(100.0).as_key(), Some("100".into()));
        assert_eq!(CellValue::Number(12.5).as_key(), Some("12.5".into()));
        assert_eq!(CellValue::Text("   ".into()).as_key(), None);
        assert_eq!(CellValue::Empty.as_key(), None);
    }

    #[test]
    fn test_as_number() {
        assert_eq!(CellValue::Text(" 4.5 ".into()).as_number(), Some(4.5));
        assert_eq!(CellValue::Text("n/a".into()).as_number(), None);
        assert_eq!(CellValue::Text("NaN".into()).as_number(), None);
        assert_eq!(CellValue::Number(f64::INFINITY).as_number(), None);
        assert_eq!(CellValue::Empty.as_number(), None);
    }

    #[test]
    fn test_push_row_skips_blank() {
        let mut table = RawTable::new("t", vec!["a".into(), "b".into()]);
        assert!(!table.push_row(vec![CellValue::Empty, CellValue::from_text("  ")]));
        assert!(table.push_row(vec![CellValue::from_text("x"), CellValue::Empty]));
        assert_eq!(table.len(), 1);
        assert_eq!(table.cell(0, 5), &CellValue::Empty);
        assert_eq!(table.cell(3, 0), &CellValue::Empty);
    }
}
