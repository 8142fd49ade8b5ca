//! # 错误类型模块
//!
//! 编织与提取过程中所有可报告的失败。任何失败都不会留下部分输出，也不会删除载体文件。

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// 编织/提取操作的错误。
#[derive(Error, Debug)]
pub enum WeaveError {
    /// 文件不存在。
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// 文件存在，但无法解码为图像。
    #[error("Unsupported or corrupt image: {}", path.display())]
    UnsupportedFormat {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// 载体与嵌入图像尺寸不一致。
    #[error(
        "Image sizes are not the same: carrier is {}x{}px, embedded image is {}x{}px",
        carrier.0, carrier.1, embedded.0, embedded.1
    )]
    SizeMismatch {
        carrier: (u32, u32),
        embedded: (u32, u32),
    },

    /// 负载所需像素数超过载体像素数。
    #[error("{width}x{height}px is not enough: required {required} pixels, available {available}")]
    CapacityExceeded {
        required: usize,
        available: usize,
        width: u32,
        height: u32,
    },

    /// 结果图像写入失败。
    #[error("Unable to save image: {}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// 其余文件系统错误 (读取负载文件、删除载体等)。
    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
