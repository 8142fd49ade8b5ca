//! # 命令处理逻辑模块
//!
//! 包含 `extract`、`extract-txt`、`weave`、`weave-txt` 与 `functions` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用编解码模块以及向用户报告结果。
//!
//! 编织操作成功后会删除原始载体文件 (除非指定 `--keep-carrier`)；
//! 删除只发生在结果图像写入成功之后，任何失败路径都不会修改文件。

use crate::bits::{decode_latin1, encode_latin1};
use crate::cli::{ExtractArgs, ExtractTxtArgs, WeaveArgs, WeaveTxtArgs};
use crate::constants::{CARRIER_EXTENSION, EMBED_EXTENSION, OPERATIONS};
use crate::error::WeaveError;
use crate::image_codec::{extract_image, weave_image};
use crate::raster_io::{
    extract_output_path, load_carrier, load_embedded, remove_carrier, save_gray, save_rgb,
    weave_output_path, weave_txt_output_path, with_default_extension,
};
use crate::text_codec::{extract_text, weave_text};
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::io::{self, ErrorKind, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// 处理 'Extract' 命令的执行逻辑。
///
/// 读取载体图像，按 3/3/2 位提取出同尺寸的 8 位单通道图像，保存为 `<stem>-g.<ext>`。
///
/// # Errors
///
/// * 载体不存在 ([`WeaveError::NotFound`]) 或无法解码 ([`WeaveError::UnsupportedFormat`])。
/// * 无法写入结果图像 ([`WeaveError::Save`])。
pub fn handle_extract(args: ExtractArgs) -> Result<PathBuf> {
    let carrier_path = with_default_extension(&args.image, CARRIER_EXTENSION);
    let carrier = load_carrier(&carrier_path)?;

    let start = Instant::now();
    log::info!("Beginning to extract image from {}...", carrier_path.display());
    let extracted = extract_image(&carrier);

    let dest = extract_output_path(&carrier_path, args.format);
    save_gray(&extracted, &dest, args.format)?;
    log::info!(
        "Extraction successful. {:.2} second(s)",
        start.elapsed().as_secs_f64()
    );

    println!(
        "The image has been successfully extracted and saved: {}",
        dest.to_string_lossy().green().bold()
    );
    Ok(dest)
}

/// 处理 'ExtractTxt' 命令的执行逻辑。
///
/// 读取载体图像，按 2/2/2 位恢复文本并截断于第一个终止符。
/// 指定 `output` 时以 8 位码点写入文件，否则写到标准输出。
///
/// # Errors
///
/// * 载体不存在或无法解码。
/// * 无法写入目标文本文件或标准输出。
pub fn handle_extract_txt(args: ExtractTxtArgs) -> Result<String> {
    let carrier_path = with_default_extension(&args.image, CARRIER_EXTENSION);
    let carrier = load_carrier(&carrier_path)?;

    let start = Instant::now();
    log::info!("Beginning to extract data from {}...", carrier_path.display());
    let text = extract_text(&carrier);
    log::info!(
        "Extraction successful. {:.2} second(s)",
        start.elapsed().as_secs_f64()
    );
    log::info!("End file length: {}", text.chars().count());

    let bytes = encode_latin1(&text);
    match &args.output {
        Some(path) => {
            fs::write(path, &bytes).with_context(|| {
                format!(
                    "Unable to write to target text file: {}",
                    path.to_string_lossy().red().bold()
                )
            })?;
            println!(
                "The text has been successfully recovered and saved: {}",
                path.to_string_lossy().green().bold()
            );
        }
        None => {
            let mut stdout = io::stdout().lock();
            let terminal = stdout.is_terminal();
            write_recovered_text(&mut stdout, &bytes, terminal)
                .context("Unable to write recovered text to stdout")?;
        }
    }

    Ok(text)
}

/// 处理 'Weave' 命令的执行逻辑。
///
/// 读取载体与嵌入图像，检查尺寸一致后编织，保存为 `<stem>[0].png` 并删除原始载体。
///
/// # Errors
///
/// * 任一图像不存在或无法解码。
/// * 尺寸不一致 ([`WeaveError::SizeMismatch`])。
/// * 无法写入结果图像或删除载体。
pub fn handle_weave(args: WeaveArgs) -> Result<PathBuf> {
    let carrier_path = with_default_extension(&args.image, CARRIER_EXTENSION);
    let embed_path = with_default_extension(&args.embed, EMBED_EXTENSION);
    let carrier = load_carrier(&carrier_path)?;
    let embedded = load_embedded(&embed_path)?;

    let dest = weave_output_path(&carrier_path);
    let start = Instant::now();
    log::info!(
        "Beginning to weave {} into {}...",
        embed_path.display(),
        dest.display()
    );
    let woven = weave_image(&carrier, &embedded)?;

    save_rgb(&woven, &dest)?;
    if !args.keep_carrier {
        remove_carrier(&carrier_path)?;
    }

    let (width, height) = woven.dimensions();
    log::info!(
        "Weave successful. {:.2} second(s)",
        start.elapsed().as_secs_f64()
    );
    log::info!("Bytes encoded: {}, {}x{}px", embedded.as_raw().len(), width, height);

    println!(
        "The image has been successfully woven and saved: {}",
        dest.to_string_lossy().green().bold()
    );
    Ok(dest)
}

/// 处理 'WeaveTxt' 命令的执行逻辑。
///
/// 读取载体与文本负载，检查容量后编织，保存为 `<stem>-00.png` 并删除原始载体。
/// 负载之后未使用的像素低位以随机值填充。
///
/// # Errors
///
/// * 载体或负载文件不存在，或载体无法解码。
/// * 容量不足 ([`WeaveError::CapacityExceeded`])；此时不写入也不删除任何文件。
/// * 无法写入结果图像或删除载体。
pub fn handle_weave_txt(args: WeaveTxtArgs) -> Result<PathBuf> {
    let payload = match (&args.text, &args.file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => read_payload(path)?,
        (None, None) => anyhow::bail!("Either --text or --file must be provided."),
    };

    let carrier_path = with_default_extension(&args.image, CARRIER_EXTENSION);
    let carrier = load_carrier(&carrier_path)?;

    let dest = weave_txt_output_path(&carrier_path);
    let start = Instant::now();
    log::info!("Weaving data into {}...", dest.display());
    let woven = weave_text(&carrier, &payload, &mut rand::rng())?;

    save_rgb(&woven, &dest)?;
    if !args.keep_carrier {
        remove_carrier(&carrier_path)?;
    }

    log::info!(
        "Weave successful. {:.2} second(s)",
        start.elapsed().as_secs_f64()
    );

    println!(
        "The text has been successfully woven and saved: {}",
        dest.to_string_lossy().green().bold()
    );
    Ok(dest)
}

/// 处理 'Functions' 命令：列出只读帮助表。
pub fn handle_functions() -> Result<()> {
    println!("Functions:");
    for (signature, description) in OPERATIONS {
        println!("{} :: {}", signature.green().bold(), description);
    }
    println!();
    Ok(())
}

/// 将恢复文本的 8 位码点原样写出。
///
/// `trailing_newline` 仅用于终端输出；重定向到文件或管道时字节流与 `--output` 写入的内容一致。
pub fn write_recovered_text<W: Write>(
    out: &mut W,
    bytes: &[u8],
    trailing_newline: bool,
) -> io::Result<()> {
    out.write_all(bytes)?;
    if trailing_newline {
        out.write_all(b"\n")?;
    }
    out.flush()
}

/// 读取负载文件，每个字节作为一个 8 位码点。
fn read_payload(path: &Path) -> Result<String, WeaveError> {
    let bytes = fs::read(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => WeaveError::NotFound {
            path: path.to_path_buf(),
        },
        _ => WeaveError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    Ok(decode_latin1(&bytes))
}
