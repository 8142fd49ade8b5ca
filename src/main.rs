use clap::Parser;
use env_logger::Env;

use lsb_weaver::{
    cli::{Cli, Commands},
    handler::{handle_extract, handle_extract_txt, handle_functions, handle_weave, handle_weave_txt},
};

/// 程序的主入口点
///
/// 负责初始化日志、解析命令行参数，并根据指定的子命令
/// 将执行分派到相应的处理函数
fn main() -> anyhow::Result<()> {
    // 默认输出 info 级别的进度信息，可通过 RUST_LOG 覆盖
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    // 解析命令行参数
    let cli = Cli::parse();

    // 根据子命令调用相应的处理函数
    match cli.command {
        Commands::Extract(args) => handle_extract(args).map(drop),
        Commands::ExtractTxt(args) => handle_extract_txt(args).map(drop),
        Commands::Weave(args) => handle_weave(args).map(drop),
        Commands::WeaveTxt(args) => handle_weave_txt(args).map(drop),
        Commands::Functions => handle_functions(),
    }
}
