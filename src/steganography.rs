//! # 核心隐写算法模块
//!
//! 在单个 RGB 像素的低位中写入/读取数据。每个通道使用的低位数由 [`ChannelSplit`] 决定，
//! 数据位按 R、G、B 的顺序、最高位在前分配到各通道，通道高位保持不变。

use crate::constants::{IMAGE_SPLIT, TEXT_SPLIT};

/// 一个像素的三个通道值 (R, G, B)。
pub type Rgb = [u8; 3];

/// 每个通道使用的低位数。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSplit([u8; 3]);

impl ChannelSplit {
    /// 图像模式：3/3/2，每像素 8 bits。
    pub const IMAGE: ChannelSplit = ChannelSplit(IMAGE_SPLIT);
    /// 文本模式：2/2/2，每像素 6 bits。
    pub const TEXT: ChannelSplit = ChannelSplit(TEXT_SPLIT);

    /// 每个像素承载的位数。
    pub const fn bits_per_pixel(self) -> u8 {
        self.0[0] + self.0[1] + self.0[2]
    }

    pub const fn widths(self) -> [u8; 3] {
        self.0
    }
}

/// 低 `width` 位的掩码。
pub const fn mask(width: u8) -> u8 {
    ((1u16 << width) - 1) as u8
}

/// 用 `bits` 的低 `width` 位替换 `channel` 的低 `width` 位。
pub fn splice(channel: u8, bits: u8, width: u8) -> u8 {
    let m = mask(width);
    (channel & !m) | (bits & m)
}

/// 读取 `channel` 的低 `width` 位。
pub fn low_bits(channel: u8, width: u8) -> u8 {
    channel & mask(width)
}

/// 将 `value` 的低 `split.bits_per_pixel()` 位写入像素，返回新像素。
pub fn weave_pixel(pixel: Rgb, value: u8, split: ChannelSplit) -> Rgb {
    let mut remaining = split.bits_per_pixel();
    let mut out = pixel;
    for (channel, width) in out.iter_mut().zip(split.widths()) {
        remaining -= width;
        *channel = splice(*channel, value >> remaining, width);
    }
    out
}

/// 按 R、G、B 顺序拼接各通道的低位，返回 `split.bits_per_pixel()` 位的值。
pub fn extract_pixel(pixel: Rgb, split: ChannelSplit) -> u8 {
    pixel
        .iter()
        .zip(split.widths())
        .fold(0u8, |acc, (&channel, width)| (acc << width) | low_bits(channel, width))
}
