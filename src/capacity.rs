//! # 容量与分帧模块
//!
//! 文本负载的分帧 (追加终止符、填充、转换为比特流) 以及两种模式的容量/尺寸检查。

use crate::bits::{BitStream, encode_code_point};
use crate::constants::{BITS_PER_CHAR, PADDING_CHAR, PADDING_MODULUS, SENTINEL};
use crate::error::WeaveError;
use crate::steganography::ChannelSplit;
use std::iter;

/// 分帧后的文本负载。
#[derive(Debug, Clone)]
pub struct TextFrame {
    bits: BitStream,
    chars: usize,
}

impl TextFrame {
    /// 负载比特流 (含终止符与填充)。
    pub fn bits(&self) -> &BitStream {
        &self.bits
    }

    /// 分帧后的字符数。
    pub fn char_count(&self) -> usize {
        self.chars
    }

    /// 承载该负载所需的像素数。
    pub fn pixel_budget(&self) -> usize {
        required_pixels(self.bits.len(), ChannelSplit::TEXT)
    }
}

/// 对文本负载分帧。
///
/// 依次执行：追加终止符 `{#ß#}`；按 `字符数 % 6` 追加 `'0'` 字符；
/// 每个字符映射为 8 位码点 (超过 255 的替换为 `?`) 后拼接为比特流。
///
/// 注意填充按字符数而非位数计算，因此比特流长度不一定是 6 的倍数，
/// 最后一个像素中不足的位以 0 补齐。这些位总是落在填充字符内。
pub fn frame_text(payload: &str) -> TextFrame {
    let with_sentinel = payload.chars().chain(SENTINEL.chars());
    let count = with_sentinel.clone().count();
    let padding = count % PADDING_MODULUS;
    let chars = count + padding;

    let mut bits = BitStream::with_capacity(chars * BITS_PER_CHAR);
    with_sentinel
        .chain(iter::repeat_n(PADDING_CHAR, padding))
        .for_each(|c| bits.push_byte(encode_code_point(c)));

    TextFrame { bits, chars }
}

/// `bits` 位数据在给定分配方式下需要的像素数 (向上取整)。
pub fn required_pixels(bits: usize, split: ChannelSplit) -> usize {
    bits.div_ceil(usize::from(split.bits_per_pixel()))
}

/// 图像的像素总数。
pub fn pixel_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

/// 检查载体是否能容纳文本负载。
///
/// # Errors
///
/// 所需像素数超过 `width * height` 时返回 [`WeaveError::CapacityExceeded`]。
pub fn ensure_text_capacity(frame: &TextFrame, width: u32, height: u32) -> Result<(), WeaveError> {
    let required = frame.pixel_budget();
    let available = pixel_count(width, height);
    if required > available {
        return Err(WeaveError::CapacityExceeded {
            required,
            available,
            width,
            height,
        });
    }
    Ok(())
}

/// 检查载体与嵌入图像尺寸一致。
///
/// # Errors
///
/// 尺寸不同时返回 [`WeaveError::SizeMismatch`]。
pub fn ensure_same_dimensions(carrier: (u32, u32), embedded: (u32, u32)) -> Result<(), WeaveError> {
    if carrier != embedded {
        return Err(WeaveError::SizeMismatch { carrier, embedded });
    }
    Ok(())
}
