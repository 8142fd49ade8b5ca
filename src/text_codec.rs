//! # 文本编解码模块
//!
//! 文本负载按每像素 6 bits (R/G/B 各 2 位) 写入载体，以终止符 `{#ß#}` 结束。
//! 负载之后未使用的像素，其低 6 位以随机值填充，避免留下可识别的平坦区域。

use crate::bits::{BitStream, push_code_point};
use crate::capacity::{ensure_text_capacity, frame_text};
use crate::constants::SENTINEL;
use crate::error::WeaveError;
use crate::steganography::{ChannelSplit, extract_pixel, mask, weave_pixel};
use image::{Rgb, RgbImage};
use rand::Rng;

/// 将文本编织进 `carrier`，返回新的 RGB 图像。
///
/// 负载区域内的像素是确定的；负载之后的像素低位取自 `rng`。
/// 所有通道的高 6 位保持载体原值。
///
/// # Errors
///
/// 负载所需像素数超过载体像素数时返回 [`WeaveError::CapacityExceeded`]。
pub fn weave_text<R: Rng>(
    carrier: &RgbImage,
    payload: &str,
    rng: &mut R,
) -> Result<RgbImage, WeaveError> {
    let frame = frame_text(payload);
    let (width, height) = carrier.dimensions();
    ensure_text_capacity(&frame, width, height)?;

    let split = ChannelSplit::TEXT;
    let bpp = split.bits_per_pixel();
    let budget = frame.pixel_budget();

    let mut woven = RgbImage::new(width, height);
    woven
        .pixels_mut()
        .zip(carrier.pixels())
        .enumerate()
        .for_each(|(n, (dst, src))| {
            let value = if n < budget {
                frame.bits().chunk(n * usize::from(bpp), bpp)
            } else {
                rng.random::<u8>() & mask(bpp)
            };
            *dst = Rgb(weave_pixel(src.0, value, split));
        });

    log::debug!(
        "Framed {} chars into {} bits over {} of {} pixels",
        frame.char_count(),
        frame.bits().len(),
        budget,
        width as usize * height as usize
    );
    Ok(woven)
}

/// 从载体中提取文本。
///
/// 返回第一个终止符之前的内容；找不到终止符时返回整个解码缓冲区
/// (包括未使用容量中的噪声)。
pub fn extract_text(carrier: &RgbImage) -> String {
    let split = ChannelSplit::TEXT;
    let bpp = split.bits_per_pixel();

    let (width, height) = carrier.dimensions();
    let mut stream = BitStream::with_capacity(width as usize * height as usize * usize::from(bpp));
    carrier
        .pixels()
        .for_each(|p| stream.push(extract_pixel(p.0, split), bpp));

    let mut text = String::new();
    for byte in stream.bytes() {
        push_code_point(&mut text, u32::from(byte));
        if text.ends_with(SENTINEL) {
            text.truncate(text.len() - SENTINEL.len());
            return text;
        }
    }

    log::debug!("No terminator found in {} decoded chars", text.chars().count());
    text
}
