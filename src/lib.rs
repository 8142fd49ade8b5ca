//! # lsb_weaver 库
//!
//! 本库包含 LSB 编织工具的核心逻辑：位操作原语、容量与分帧、图像与文本编解码，
//! 以及文件 I/O 与命令处理。

// 声明库包含的所有模块。

pub mod bits;
pub mod capacity;
pub mod cli;
pub mod constants;
pub mod error;
pub mod handler;
pub mod image_codec;
pub mod raster_io;
pub mod steganography;
pub mod text_codec;
