//! # 位操作原语模块
//!
//! 负责 8 位值与二进制数字串之间的转换、按位打包的比特流，以及字符与 8 位码点之间的映射。
//! 比特流中的位一律按大端顺序 (最高位在前) 排列。

use crate::constants::{INVALID_PLACEHOLDER, REPLACEMENT_CHAR};

// 二进制数字串仅用于展示与对照；编解码本身直接使用移位与掩码运算。

/// 将 8 位值转换为定宽 (8 个字符) 的二进制数字串，例如 `170 -> "10101010"`。
pub fn to_bit_string(value: u8) -> String {
    format!("{value:08b}")
}

/// 将二进制数字串解析为无符号整数。
///
/// 空串、含非 `0`/`1` 字符或超出 `u32` 范围时返回 `None`。
pub fn parse_bit_string(bits: &str) -> Option<u32> {
    if bits.is_empty() || !bits.bytes().all(|b| b == b'0' || b == b'1') {
        return None;
    }
    u32::from_str_radix(bits, 2).ok()
}

/// 将字符映射为 8 位码点；码点超过 255 的字符被替换为 `?`。
pub fn encode_code_point(c: char) -> u8 {
    u8::try_from(c).unwrap_or(REPLACEMENT_CHAR as u8)
}

/// 将码点追加到文本缓冲区；无效码点以 `"[?]"` 代替。
pub fn push_code_point(buf: &mut String, code: u32) {
    match char::from_u32(code) {
        Some(c) => buf.push(c),
        None => buf.push_str(INVALID_PLACEHOLDER),
    }
}

/// 逐字符映射为 8 位码点。
pub fn encode_latin1(text: &str) -> Vec<u8> {
    text.chars().map(encode_code_point).collect()
}

/// 每个字节视为一个码点 (0-255)，还原为文本。
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// 按位追加、按任意位偏移读取的比特流。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitStream {
    bytes: Vec<u8>,
    len: usize,
}

impl BitStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预留可容纳 `bits` 位的空间。
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bits.div_ceil(8)),
            len: 0,
        }
    }

    /// 比特流长度 (位)。
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 追加 `value` 的低 `width` 位，最高位在前。`width` 不得超过 8。
    pub fn push(&mut self, value: u8, width: u8) {
        debug_assert!(width <= 8);
        for k in (0..width).rev() {
            let bit = (value >> k) & 1;
            let offset = self.len % 8;
            if offset == 0 {
                self.bytes.push(0);
            }
            if let Some(last) = self.bytes.last_mut() {
                *last |= bit << (7 - offset);
            }
            self.len += 1;
        }
    }

    /// 追加一个完整的 8 位值。
    pub fn push_byte(&mut self, value: u8) {
        if self.len % 8 == 0 {
            self.bytes.push(value);
            self.len += 8;
        } else {
            self.push(value, 8);
        }
    }

    /// 读取第 `index` 位；超出末尾的位视为 0。
    pub fn bit(&self, index: usize) -> u8 {
        if index >= self.len {
            return 0;
        }
        (self.bytes[index / 8] >> (7 - index % 8)) & 1
    }

    /// 从位偏移 `offset` 开始读取 `width` 位 (最多 8 位)，超出末尾部分以 0 补齐。
    pub fn chunk(&self, offset: usize, width: u8) -> u8 {
        debug_assert!(width <= 8);
        (0..usize::from(width)).fold(0u8, |acc, k| (acc << 1) | self.bit(offset + k))
    }

    /// 按 8 位一组重新分组后的完整字节；不足 8 位的尾部被丢弃。
    pub fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.bytes[..self.len / 8].iter().copied()
    }
}

impl FromIterator<u8> for BitStream {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut stream = BitStream::new();
        iter.into_iter().for_each(|b| stream.push_byte(b));
        stream
    }
}
