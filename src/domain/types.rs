// ==========================================
// AutoTrac 作业分析系统 - 领域类型定义
// ==========================================
// 班次模式 / 班次标签
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 班次模式 (Schedule Mode)
// ==========================================
// 决定班次标签集合与所需输入文件数量 (3+1 / 2+1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleMode {
    EightHour,  // 8 小时三班
    TwelveHour, // 12 小时两班
}

impl ScheduleMode {
    /// 该模式下的班次标签（固定顺序）
    pub fn shifts(&self) -> &'static [ShiftLabel] {
        match self {
            ScheduleMode::EightHour => &[ShiftLabel::Early, ShiftLabel::Mid, ShiftLabel::Late],
            ScheduleMode::TwelveHour => &[ShiftLabel::Day, ShiftLabel::Night],
        }
    }

    /// 需要的输入文件数（班次文件 + 分区对照表）
    pub fn required_inputs(&self) -> usize {
        self.shifts().len() + 1
    }

    pub fn contains(&self, shift: ShiftLabel) -> bool {
        self.shifts().contains(&shift)
    }
}

impl fmt::Display for ScheduleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleMode::EightHour => write!(f, "eight_hour"),
            ScheduleMode::TwelveHour => write!(f, "twelve_hour"),
        }
    }
}

impl FromStr for ScheduleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "eight_hour" | "8h" | "8" => Ok(ScheduleMode::EightHour),
            "twelve_hour" | "12h" | "12" => Ok(ScheduleMode::TwelveHour),
            other => Err(format!("未知班次模式: {}", other)),
        }
    }
}

// ==========================================
// 班次标签 (Shift Label)
// ==========================================
// 声明顺序即输出排序顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftLabel {
    Early, // 6-2
    Mid,   // 2-10
    Late,  // 10-6
    Day,   // 6am-6pm
    Night, // 6pm-6am
}

impl ShiftLabel {
    /// 标签代码（输出表使用）
    pub fn code(&self) -> &'static str {
        match self {
            ShiftLabel::Early => "early",
            ShiftLabel::Mid => "mid",
            ShiftLabel::Late => "late",
            ShiftLabel::Day => "day",
            ShiftLabel::Night => "night",
        }
    }

    /// 展示名称（报表/图表使用）
    pub fn display_name(&self) -> &'static str {
        match self {
            ShiftLabel::Early => "Turno 6-2",
            ShiftLabel::Mid => "Turno 2-10",
            ShiftLabel::Late => "Turno 10-6",
            ShiftLabel::Day => "Turno 6am-6pm",
            ShiftLabel::Night => "Turno 6pm-6am",
        }
    }

    pub fn mode(&self) -> ScheduleMode {
        match self {
            ShiftLabel::Early | ShiftLabel::Mid | ShiftLabel::Late => ScheduleMode::EightHour,
            ShiftLabel::Day | ShiftLabel::Night => ScheduleMode::TwelveHour,
        }
    }
}

impl fmt::Display for ShiftLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for ShiftLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "early" | "6-2" => Ok(ShiftLabel::Early),
            "mid" | "2-10" => Ok(ShiftLabel::Mid),
            "late" | "10-6" => Ok(ShiftLabel::Late),
            "day" | "am" => Ok(ShiftLabel::Day),
            "night" | "pm" => Ok(ShiftLabel::Night),
            other => Err(format!("未知班次: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_shift_sets() {
        assert_eq!(ScheduleMode::EightHour.shifts().len(), 3);
        assert_eq!(ScheduleMode::TwelveHour.shifts().len(), 2);
        assert_eq!(ScheduleMode::EightHour.required_inputs(), 4);
        assert_eq!(ScheduleMode::TwelveHour.required_inputs(), 3);
        assert!(ScheduleMode::TwelveHour.contains(ShiftLabel::Night));
        assert!(!ScheduleMode::TwelveHour.contains(ShiftLabel::Early));
    }

    #[test]
    fn test_parse_mode_aliases() {
        assert_eq!("eight-hour".parse::<ScheduleMode>().unwrap(), ScheduleMode::EightHour);
        assert_eq!("12h".parse::<ScheduleMode>().unwrap(), ScheduleMode::TwelveHour);
        assert!("weekly".parse::<ScheduleMode>().is_err());
    }

    #[test]
    fn test_shift_label_roundtrip_code() {
        for shift in ScheduleMode::EightHour.shifts().iter().chain(ScheduleMode::TwelveHour.shifts()) {
            assert_eq!(shift.code().parse::<ShiftLabel>().unwrap(), *shift);
            assert_eq!(shift.mode().contains(*shift), true);
        }
        assert_eq!(ShiftLabel::Early.display_name(), "Turno 6-2");
    }

    #[test]
    fn test_shift_serde_snake_case() {
        let json = serde_json::to_string(&ShiftLabel::Night).unwrap();
        assert_eq!(json, "\"night\"");
        let mode: ScheduleMode = serde_json::from_str("\"twelve_hour\"").unwrap();
        assert_eq!(mode, ScheduleMode::TwelveHour);
    }
}
