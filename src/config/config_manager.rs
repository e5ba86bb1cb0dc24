// ==========================================
// AutoTrac 作业分析系统 - 配置管理器
// ==========================================
// 职责: 配置加载、保存、默认路径
// 存储: <config_dir>/autotrac-analytics/config.json
// ==========================================

use crate::config::pipeline_config::{ConfigError, PipelineConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const APP_DIR: &str = "autotrac-analytics";
const CONFIG_FILE: &str = "config.json";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager;

impl ConfigManager {
    /// 默认配置文件路径
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// 读取配置文件
    ///
    /// # 返回
    /// - 文件不存在: 默认配置
    /// - 文件存在但格式错误/值无效: Err
    pub fn load(path: &Path) -> Result<PipelineConfig, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "配置文件不存在，使用默认配置");
            return Ok(PipelineConfig::default());
        }

        let raw = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let config: PipelineConfig =
            serde_json::from_str(&raw).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        config.validate()?;

        info!(path = %path.display(), "配置加载完成");
        Ok(config)
    }

    /// 读取指定路径或默认路径的配置
    pub fn load_or_default(path: Option<&Path>) -> Result<PipelineConfig, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => match Self::default_path() {
                Ok(p) => Self::load(&p),
                Err(_) => Ok(PipelineConfig::default()),
            },
        }
    }

    /// 保存配置（美化 JSON），自动创建父目录
    pub fn save(path: &Path, config: &PipelineConfig) -> Result<(), ConfigError> {
        config.validate()?;

        let write_err = |e: std::io::Error| ConfigError::WriteError {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }

        let json = serde_json::to_string_pretty(config).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        fs::write(path, json).map_err(write_err)?;

        info!(path = %path.display(), "配置已保存");
        Ok(())
    }
}
