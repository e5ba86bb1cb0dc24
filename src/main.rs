// ==========================================
// AutoTrac 作业分析系统 - 命令行入口
// ==========================================
// 子命令:
// - analyze: 运行分析流水线，输出/导出结果
// - init-config: 写出默认配置文件
// ==========================================

use anyhow::{anyhow, Context, Result};
use autotrac_analytics::config::{ConfigManager, PipelineConfig};
use autotrac_analytics::export::{self, ExportFormat};
use autotrac_analytics::{logging, AnalysisApi, PipelineInputs, ScheduleMode, ShiftLabel};
use clap::{Parser, Subcommand, ValueEnum};
use std::io;
use std::path::PathBuf;
use tracing::info;

/// 日志输出格式
#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "autotrac-analytics")]
#[command(version)]
#[command(about = "AutoTrac usage analytics over harvester shift logs", long_about = None)]
struct Cli {
    /// Log output format (logs go to stderr)
    #[arg(long = "log-format", value_enum, default_value = "text", global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the pipeline over one file per shift plus the zone lookup
    Analyze {
        /// Shift schedule (eight-hour | twelve-hour); defaults to the config value
        #[arg(short, long)]
        mode: Option<ScheduleMode>,

        /// Shift input as LABEL=FILE (e.g. early=turno_6_2.xlsx); repeat per shift
        #[arg(short, long = "shift", value_name = "LABEL=FILE", value_parser = parse_shift_arg)]
        shifts: Vec<(ShiftLabel, PathBuf)>,

        /// Machine to zone lookup file
        #[arg(short, long, value_name = "FILE")]
        zones: PathBuf,

        /// Config file (default: user config dir)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Write tables and report here instead of printing to stdout
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Table format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,
    },

    /// Write the default configuration file
    InitConfig {
        /// Target path (default: user config dir)
        #[arg(short, long, value_name = "FILE")]
        path: Option<PathBuf>,
    },
}

/// 解析 LABEL=FILE
fn parse_shift_arg(raw: &str) -> Result<(ShiftLabel, PathBuf), String> {
    let (label, path) = raw
        .split_once('=')
        .ok_or_else(|| format!("期望 LABEL=FILE，实际为 '{}'", raw))?;
    if path.trim().is_empty() {
        return Err(format!("班次 '{}' 未指定文件", label));
    }
    Ok((label.parse::<ShiftLabel>()?, PathBuf::from(path.trim())))
}

fn run_analyze(
    mode: Option<ScheduleMode>,
    shifts: Vec<(ShiftLabel, PathBuf)>,
    zones: PathBuf,
    config_path: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    format: ExportFormat,
) -> Result<()> {
    let config: PipelineConfig =
        ConfigManager::load_or_default(config_path.as_deref()).context("加载配置失败")?;
    let mode = mode.unwrap_or(config.default_mode);

    let mut inputs = PipelineInputs::new(mode).with_zone_file(zones);
    for (shift, path) in shifts {
        if inputs.shift_files.contains_key(&shift) {
            return Err(anyhow!("班次 '{}' 重复指定", shift));
        }
        inputs = inputs.with_shift(shift, path);
    }

    let api = AnalysisApi::new(&config)?;
    let session = api.open_session()?;
    let result = api
        .run_analysis(session, &inputs)
        .with_context(|| format!("分析失败 (模式 {})", mode))?;

    info!(
        rows = result.rows.len(),
        global_rows = result.global_stats.len(),
        zone_misses = result.stats.zone_misses,
        "分析完成"
    );

    match output_dir {
        Some(dir) => {
            let written = api
                .export(session, &dir, format)
                .with_context(|| format!("导出到 {} 失败", dir.display()))?;
            for path in written {
                println!("{}", path.display());
            }
        }
        None => match format {
            ExportFormat::Json => export::write_json(io::stdout().lock(), &api.report(session)?)?,
            ExportFormat::Csv => export::write_tables_csv(io::stdout().lock(), &api.report(session)?)?,
        },
    }

    api.close_session(session)?;
    Ok(())
}

fn run_init_config(path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(p) => p,
        None => ConfigManager::default_path()?,
    };
    ConfigManager::save(&path, &PipelineConfig::default())
        .with_context(|| format!("写入配置失败: {}", path.display()))?;
    println!("{}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.log_format {
        LogFormat::Text => logging::init(),
        LogFormat::Json => logging::init_json(),
    }

    match cli.command {
        Command::Analyze {
            mode,
            shifts,
            zones,
            config,
            output_dir,
            format,
        } => run_analyze(mode, shifts, zones, config, output_dir, format),
        Command::InitConfig { path } => run_init_config(path),
    }
}
