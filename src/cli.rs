//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// 一款基于 LSB (最低有效位) 的命令行工具，用于在无损格式图像 (如 PNG) 中编织或提取 8 位图像与文本。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 的命令行工具，用于在无损格式图像 (如 PNG) 中编织或提取 8 位图像与文本。\n\
                  编织成功后原始载体文件会被删除，结果以新文件名保存。"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 从载体图像中提取嵌入的 8 位图像，保存为 `<stem>-g.<ext>`。
    Extract(ExtractArgs),

    /// 从载体图像中提取隐藏的文本。
    ExtractTxt(ExtractTxtArgs),

    /// 将同尺寸的 8 位图像编织进载体图像，保存为 `<stem>[0].png`。
    Weave(WeaveArgs),

    /// 将文本编织进载体图像，保存为 `<stem>-00.png`。
    WeaveTxt(WeaveTxtArgs),

    /// 列出所有操作及其说明。
    Functions,
}

/// 提取出的图像的保存格式。
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmbedFormat {
    #[default]
    Png,
    Gif,
}

/// 'extract' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct ExtractArgs {
    /// 载体图像路径；缺少扩展名时自动追加 `.png`。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 提取结果的保存格式。
    #[arg(short, long, value_enum, default_value_t = EmbedFormat::Png)]
    pub format: EmbedFormat,
}

/// 'extract-txt' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct ExtractTxtArgs {
    /// 载体图像路径；缺少扩展名时自动追加 `.png`。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复文本的保存路径；省略时输出到标准输出。
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// 'weave' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct WeaveArgs {
    /// 载体图像路径；缺少扩展名时自动追加 `.png`。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要嵌入的图像路径 (尺寸必须与载体一致)；缺少扩展名时自动追加 `.gif`。
    #[arg(short, long)]
    pub embed: PathBuf,

    /// 编织成功后保留原始载体文件。
    #[arg(short, long)]
    pub keep_carrier: bool,
}

/// 'weave-txt' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct WeaveTxtArgs {
    /// 载体图像路径；缺少扩展名时自动追加 `.png`。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的文本。
    #[arg(short, long, conflicts_with = "file", required_unless_present = "file")]
    pub text: Option<String>,

    /// 要隐藏的文件，每个字节作为一个字符。
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// 编织成功后保留原始载体文件。
    #[arg(short, long)]
    pub keep_carrier: bool,
}
