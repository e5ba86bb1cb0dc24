// ==========================================
// AutoTrac 作业分析系统 - 列名解析器实现
// ==========================================
// 职责: 任意命名/大小写的表头 → 规范列
// 流程: 表头清洗 → 有序规则匹配（首个命中生效）→ 去重
// ==========================================

use crate::config::{PipelineConfig, ResolverVocabulary};
use crate::domain::RawTable;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::ColumnResolver;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{debug, warn};
use unicode_normalization::UnicodeNormalization;

// ==========================================
// CanonicalField - 规范列
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    MachineId,
    AutotracActiveHours,
    HarvestUtilizationHours,
    Zone,
}

impl CanonicalField {
    pub fn name(&self) -> &'static str {
        match self {
            CanonicalField::MachineId => "machine_id",
            CanonicalField::AutotracActiveHours => "autotrac_active_hours",
            CanonicalField::HarvestUtilizationHours => "harvest_utilization_hours",
            CanonicalField::Zone => "zone",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 表头清洗: NFC 归一化，小写，空白/连字符/句点 → 下划线，去掉括号
///
/// `(h)` 清洗后变为 `_h`
pub fn clean_header(raw: &str) -> String {
    raw.trim()
        .nfc()
        .collect::<String>()
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            '(' | ')' => None,
            c if c.is_whitespace() || c == '-' || c == '.' => Some('_'),
            c => Some(c),
        })
        .collect()
}

/// 工时单位标记（作用于清洗后的表头）: 后缀 `_h` 或中缀 `_h_`
pub fn has_hour_unit(header: &str) -> bool {
    header.ends_with("_h") || header.contains("_h_")
}

fn contains_any(header: &str, tokens: &[String]) -> bool {
    tokens.iter().any(|t| header.contains(t.as_str()))
}

fn lowered(tokens: &[String]) -> Vec<String> {
    tokens
        .iter()
        .map(|t| t.trim().nfc().collect::<String>().to_lowercase())
        .collect()
}

// ==========================================
// ColumnRule - (谓词, 规范列)
// ==========================================
type HeaderPredicate = Box<dyn Fn(&str) -> bool + Send + Sync>;

pub struct ColumnRule {
    pub field: CanonicalField,
    predicate: HeaderPredicate,
}

impl ColumnRule {
    pub fn new<F>(field: CanonicalField, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self {
            field,
            predicate: Box::new(predicate),
        }
    }

    pub fn matches(&self, cleaned_header: &str) -> bool {
        (self.predicate)(cleaned_header)
    }
}

impl fmt::Debug for ColumnRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnRule").field("field", &self.field).finish()
    }
}

fn machine_rule(vocab: &ResolverVocabulary) -> ColumnRule {
    let synonyms = lowered(&vocab.machine_synonyms);
    ColumnRule::new(CanonicalField::MachineId, move |h| contains_any(h, &synonyms))
}

/// 班次表规则（顺序即优先级）
pub fn shift_rules(vocab: &ResolverVocabulary) -> Vec<ColumnRule> {
    let autotrac = lowered(&vocab.autotrac_tokens);
    let active = lowered(&vocab.active_tokens);
    let utilization = lowered(&vocab.utilization_tokens);
    let harvest = lowered(&vocab.harvest_tokens);

    vec![
        machine_rule(vocab),
        ColumnRule::new(CanonicalField::AutotracActiveHours, move |h| {
            contains_any(h, &autotrac) && contains_any(h, &active) && has_hour_unit(h)
        }),
        ColumnRule::new(CanonicalField::HarvestUtilizationHours, move |h| {
            contains_any(h, &utilization) && contains_any(h, &harvest) && has_hour_unit(h)
        }),
    ]
}

/// 分区对照表规则
pub fn zone_rules(vocab: &ResolverVocabulary) -> Vec<ColumnRule> {
    let zone = lowered(&vocab.zone_tokens);
    vec![
        machine_rule(vocab),
        ColumnRule::new(CanonicalField::Zone, move |h| contains_any(h, &zone)),
    ]
}

// ==========================================
// ResolvedTable - 列名解析结果
// ==========================================
// table: 表头已清洗并映射，重复列已删除（保留首列）
#[derive(Debug, Clone)]
pub struct ResolvedTable {
    pub table: RawTable,
    columns: HashMap<CanonicalField, usize>,
}

impl ResolvedTable {
    pub fn column(&self, field: CanonicalField) -> Option<usize> {
        self.columns.get(&field).copied()
    }

    /// 必需列定位，缺失时返回指明表/列的错误
    pub fn require(&self, field: CanonicalField) -> ImportResult<usize> {
        self.column(field).ok_or_else(|| ImportError::ColumnResolution {
            table: self.table.name.clone(),
            column: field.name().to_string(),
        })
    }
}

/// 按规则解析表头（不校验必需列）
///
/// 规范列按命中时的列下标记录，不按名称回查；
/// 未命中的表头与规范列重名时丢弃，不能顶替已命中的列
pub fn resolve_with_rules(table: &RawTable, rules: &[ColumnRule]) -> ResolvedTable {
    let mut claimed: HashSet<CanonicalField> = HashSet::new();

    // 1. 清洗 + 规则映射（每个规范列只取第一个命中的表头）
    let mapped: Vec<(String, Option<CanonicalField>)> = table
        .headers
        .iter()
        .map(|raw| {
            let cleaned = clean_header(raw);
            let hit = rules
                .iter()
                .find(|rule| !claimed.contains(&rule.field) && rule.matches(&cleaned));
            match hit {
                Some(rule) => {
                    claimed.insert(rule.field);
                    debug!(table = %table.name, header = %raw, field = %rule.field, "列名映射");
                    (rule.field.name().to_string(), Some(rule.field))
                }
                None => (cleaned, None),
            }
        })
        .collect();

    // 2. 去重: 已命中列全部保留；未命中列与规范列名或先出现的列名重复时丢弃
    let reserved: HashSet<&str> = rules.iter().map(|rule| rule.field.name()).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let keep: Vec<usize> = mapped
        .iter()
        .enumerate()
        .filter(|(_, (name, hit))| match hit {
            Some(_) => {
                seen.insert(name.as_str());
                true
            }
            None => !reserved.contains(name.as_str()) && seen.insert(name.as_str()),
        })
        .map(|(idx, _)| idx)
        .collect();

    if keep.len() < mapped.len() {
        warn!(
            table = %table.name,
            dropped = mapped.len() - keep.len(),
            "存在重复列名，未映射的重名列已丢弃"
        );
    }

    let headers: Vec<String> = keep.iter().map(|&i| mapped[i].0.clone()).collect();
    let mut resolved = RawTable::new(table.name.clone(), headers);
    resolved.rows = (0..table.rows.len())
        .map(|r| keep.iter().map(|&c| table.cell(r, c).clone()).collect())
        .collect();

    let columns = keep
        .iter()
        .enumerate()
        .filter_map(|(new_idx, &old_idx)| mapped[old_idx].1.map(|field| (field, new_idx)))
        .collect();

    ResolvedTable {
        table: resolved,
        columns,
    }
}

// ==========================================
// RuleBasedColumnResolver
// ==========================================
pub struct RuleBasedColumnResolver {
    shift_rules: Vec<ColumnRule>,
    zone_rules: Vec<ColumnRule>,
}

impl RuleBasedColumnResolver {
    pub fn new(vocab: &ResolverVocabulary) -> Self {
        Self {
            shift_rules: shift_rules(vocab),
            zone_rules: zone_rules(vocab),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(&config.vocabulary)
    }
}

impl Default for RuleBasedColumnResolver {
    fn default() -> Self {
        Self::new(&ResolverVocabulary::default())
    }
}

impl ColumnResolver for RuleBasedColumnResolver {
    fn resolve_shift_table(&self, table: &RawTable) -> ImportResult<ResolvedTable> {
        let resolved = resolve_with_rules(table, &self.shift_rules);
        resolved.require(CanonicalField::MachineId)?;
        resolved.require(CanonicalField::AutotracActiveHours)?;
        resolved.require(CanonicalField::HarvestUtilizationHours)?;
        Ok(resolved)
    }

    fn resolve_zone_table(&self, table: &RawTable) -> ImportResult<ResolvedTable> {
        let resolved = resolve_with_rules(table, &self.zone_rules);
        resolved.require(CanonicalField::MachineId)?;
        resolved.require(CanonicalField::Zone)?;
        Ok(resolved)
    }
}
