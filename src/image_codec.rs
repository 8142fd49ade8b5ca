//! # 图像编解码模块
//!
//! 将与载体同尺寸的 8 位单通道图像编织进载体的 RGB 低位 (3/3/2)，以及反向提取。
//! 载体像素与嵌入像素按行优先顺序一一对应。

use crate::bits::BitStream;
use crate::capacity::ensure_same_dimensions;
use crate::error::WeaveError;
use crate::steganography::{ChannelSplit, extract_pixel, weave_pixel};
use image::{GrayImage, Luma, Rgb, RgbImage};

/// 将 `embedded` 编织进 `carrier`，返回新的 RGB 图像。
///
/// 第 n 个载体像素承载比特流中从 `n * 8` 开始的 8 位，
/// 其高 5/5/6 位保持载体原值。
///
/// # Errors
///
/// 两幅图像尺寸不同时返回 [`WeaveError::SizeMismatch`]。
pub fn weave_image(carrier: &RgbImage, embedded: &GrayImage) -> Result<RgbImage, WeaveError> {
    ensure_same_dimensions(carrier.dimensions(), embedded.dimensions())?;

    let split = ChannelSplit::IMAGE;
    let bpp = split.bits_per_pixel();
    let stream: BitStream = embedded.as_raw().iter().copied().collect();

    let (width, height) = carrier.dimensions();
    let mut woven = RgbImage::new(width, height);
    woven
        .pixels_mut()
        .zip(carrier.pixels())
        .enumerate()
        .for_each(|(n, (dst, src))| {
            let value = stream.chunk(n * usize::from(bpp), bpp);
            *dst = Rgb(weave_pixel(src.0, value, split));
        });

    log::debug!(
        "Wove {} bytes into {}x{}px",
        stream.len() / 8,
        width,
        height
    );
    Ok(woven)
}

/// 从载体中提取嵌入的 8 位单通道图像，尺寸与载体相同。
pub fn extract_image(carrier: &RgbImage) -> GrayImage {
    let (width, height) = carrier.dimensions();
    // 每个载体像素恰好贡献 8 位，即输出图像同一位置的一个像素。
    GrayImage::from_fn(width, height, |x, y| {
        Luma([extract_pixel(carrier.get_pixel(x, y).0, ChannelSplit::IMAGE)])
    })
}
