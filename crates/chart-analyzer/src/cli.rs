use std::path::PathBuf;

use analysis_core::{ImageInput, Plan, Region, StockSubMode};
use analysis_orchestrator::{GlobalAnalysisParams, StockAnalysisParams};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tokio::io::AsyncReadExt;

/// AI chart and market analysis
#[derive(Parser, Debug)]
#[command(name = "chart-analyzer", about = "Analyze stock charts and global market data with Gemini")]
pub struct Cli {
    /// Print JSON instead of the share text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze chart images and/or strategy rules
    Stock(StockArgs),
    /// Analyze pasted market data and headlines
    Global(GlobalArgs),
    /// Split a saved raw model response offline
    Parse(ParseArgs),
}

#[derive(Args, Debug)]
pub struct StockArgs {
    /// Chart image file; repeat for several charts
    #[arg(short, long = "image")]
    pub images: Vec<PathBuf>,

    #[arg(long, value_enum, default_value_t = SubModeArg::SingleChart)]
    pub mode: SubModeArg,

    #[arg(long, value_enum, default_value_t = RegionArg::International)]
    pub region: RegionArg,

    #[arg(long, value_enum, default_value_t = PlanArg::Pro)]
    pub plan: PlanArg,

    /// Custom strategy rules
    #[arg(long)]
    pub rules: Option<String>,

    /// Indicator to focus on; repeat for several
    #[arg(long = "indicator")]
    pub indicators: Vec<String>,
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Market data and headlines
    #[arg(long, required_unless_present = "data_file", conflicts_with = "data_file")]
    pub data: Option<String>,

    /// File holding the market data
    #[arg(long)]
    pub data_file: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = PlanArg::Pro)]
    pub plan: PlanArg,
}

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Saved response file, `-` for stdin
    pub input: PathBuf,

    /// Apply this plan's metric limits
    #[arg(long, value_enum)]
    pub plan: Option<PlanArg>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PlanArg {
    Free,
    Pro,
    Advanced,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RegionArg {
    Domestic,
    International,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SubModeArg {
    SingleChart,
    MultiChart,
    StrategyOnly,
}

impl From<PlanArg> for Plan {
    fn from(arg: PlanArg) -> Self {
        match arg {
            PlanArg::Free => Plan::Free,
            PlanArg::Pro => Plan::Pro,
            PlanArg::Advanced => Plan::Advanced,
        }
    }
}

impl From<RegionArg> for Region {
    fn from(arg: RegionArg) -> Self {
        match arg {
            RegionArg::Domestic => Region::Domestic,
            RegionArg::International => Region::International,
        }
    }
}

impl From<SubModeArg> for StockSubMode {
    fn from(arg: SubModeArg) -> Self {
        match arg {
            SubModeArg::SingleChart => StockSubMode::SingleChart,
            SubModeArg::MultiChart => StockSubMode::MultiChart,
            SubModeArg::StrategyOnly => StockSubMode::StrategyOnly,
        }
    }
}

impl From<StockArgs> for StockAnalysisParams {
    fn from(args: StockArgs) -> Self {
        StockAnalysisParams {
            images: args.images.into_iter().map(ImageInput::File).collect(),
            region: args.region.into(),
            sub_mode: args.mode.into(),
            plan: args.plan.into(),
            strategy_rules: args.rules,
            focus_indicators: args.indicators,
        }
    }
}

impl GlobalArgs {
    pub async fn into_params(self) -> Result<GlobalAnalysisParams> {
        let market_data = match (self.data, self.data_file) {
            (Some(data), _) => data,
            (None, Some(path)) => tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read market data from {}", path.display()))?,
            (None, None) => String::new(),
        };
        Ok(GlobalAnalysisParams {
            market_data,
            plan: self.plan.into(),
        })
    }
}

impl ParseArgs {
    pub async fn read_input(&self) -> Result<String> {
        if self.input.as_os_str() == "-" {
            let mut raw = String::new();
            tokio::io::stdin()
                .read_to_string(&mut raw)
                .await
                .context("Failed to read response from stdin")?;
            return Ok(raw);
        }
        tokio::fs::read_to_string(&self.input)
            .await
            .with_context(|| format!("Failed to read {}", self.input.display()))
    }
}
