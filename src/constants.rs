//! # 常量模块
//!
//! 编织/提取所用的固定参数：通道位分配、终止符、文件名后缀以及只读的帮助表。

/// 文本负载的终止符。
/// 其中 `ß` 的码点为 0xDF，可以用单个 8 位值表示。
pub const SENTINEL: &str = "{#ß#}";

/// 终止符之后用于对齐的填充字符。
pub const PADDING_CHAR: char = '0';

/// 填充字符数量 = 字符数 % `PADDING_MODULUS`。
pub const PADDING_MODULUS: usize = 6;

/// 无法编码为 8 位的字符在编织时被替换为该字符。
pub const REPLACEMENT_CHAR: char = '?';

/// 提取时无效码点的占位符。
pub const INVALID_PLACEHOLDER: &str = "[?]";

/// 每个字符按 8 bits 编码。
pub const BITS_PER_CHAR: usize = 8;

/// 图像模式下 R/G/B 各通道使用的低位数 (3 + 3 + 2 = 8 bits / 像素)。
pub const IMAGE_SPLIT: [u8; 3] = [3, 3, 2];

/// 文本模式下 R/G/B 各通道使用的低位数 (2 + 2 + 2 = 6 bits / 像素)。
pub const TEXT_SPLIT: [u8; 3] = [2, 2, 2];

/// 载体路径缺少扩展名时自动追加的扩展名。
pub const CARRIER_EXTENSION: &str = "png";

/// 嵌入图像路径缺少扩展名时自动追加的扩展名。
pub const EMBED_EXTENSION: &str = "gif";

/// `extract` 输出文件名的后缀：`<stem>-g.<ext>`。
pub const EXTRACT_SUFFIX: &str = "-g";

/// `weave` 输出文件名的后缀：`<stem>[0].png`。
pub const WEAVE_SUFFIX: &str = "[0]";

/// `weave-txt` 输出文件名的后缀：`<stem>-00.png`。
pub const WEAVE_TXT_SUFFIX: &str = "-00";

/// 只读帮助表：操作签名 -> 描述。
pub const OPERATIONS: &[(&str, &str)] = &[
    ("extract(png)", "Extracts an embedded 8-bit image from a PNG image."),
    ("extract_txt(png)", "Extracts most 8-bit chars from a PNG."),
    ("weave(png, gif)", "Inserts an 8-bit image into a PNG image of the same size."),
    ("weave_txt(png, txt)", "Plants most 8-bit chars into a PNG."),
];
