//! # 图像文件 I/O 模块
//!
//! 路径补全、输出文件命名、载体/嵌入图像的加载，以及结果的保存与载体删除。

use crate::cli::EmbedFormat;
use crate::constants::{EXTRACT_SUFFIX, WEAVE_SUFFIX, WEAVE_TXT_SUFFIX};
use crate::error::WeaveError;
use image::error::{DecodingError, EncodingError, LimitError, LimitErrorKind};
use image::{DynamicImage, GrayImage, ImageError, ImageFormat, ImageResult, Luma, RgbImage};
use std::borrow::Cow;
use std::fs;
use std::io::{Cursor, ErrorKind};
use std::path::{Path, PathBuf};

impl EmbedFormat {
    pub fn extension(self) -> &'static str {
        match self {
            EmbedFormat::Png => "png",
            EmbedFormat::Gif => "gif",
        }
    }
}

/// 路径没有扩展名时追加 `.{extension}`，否则原样返回。
pub fn with_default_extension(path: &Path, extension: &str) -> PathBuf {
    if path.extension().is_some() {
        return path.to_path_buf();
    }
    let mut raw = path.as_os_str().to_owned();
    raw.push(".");
    raw.push(extension);
    PathBuf::from(raw)
}

/// 在同一目录下生成 `<stem><suffix>.<extension>`。
fn sibling(path: &Path, suffix: &str, extension: &str) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    path.with_file_name(format!("{stem}{suffix}.{extension}"))
}

/// `extract` 的输出路径：`<stem>-g.<ext>`。
pub fn extract_output_path(carrier: &Path, format: EmbedFormat) -> PathBuf {
    sibling(carrier, EXTRACT_SUFFIX, format.extension())
}

/// `weave` 的输出路径：`<stem>[0].png`。
pub fn weave_output_path(carrier: &Path) -> PathBuf {
    sibling(carrier, WEAVE_SUFFIX, "png")
}

/// `weave-txt` 的输出路径：`<stem>-00.png`。
pub fn weave_txt_output_path(carrier: &Path) -> PathBuf {
    sibling(carrier, WEAVE_TXT_SUFFIX, "png")
}

fn open(path: &Path) -> Result<DynamicImage, WeaveError> {
    if !path.is_file() {
        return Err(WeaveError::NotFound {
            path: path.to_path_buf(),
        });
    }
    image::open(path).map_err(|source| match source {
        ImageError::IoError(ref e) if e.kind() == ErrorKind::NotFound => WeaveError::NotFound {
            path: path.to_path_buf(),
        },
        source => WeaveError::UnsupportedFormat {
            path: path.to_path_buf(),
            source,
        },
    })
}

/// 以 RGB8 加载载体图像；alpha 通道被丢弃。
///
/// # Errors
///
/// 文件不存在时返回 [`WeaveError::NotFound`]，无法解码时返回 [`WeaveError::UnsupportedFormat`]。
pub fn load_carrier(path: &Path) -> Result<RgbImage, WeaveError> {
    Ok(open(path)?.to_rgb8())
}

/// 以 8 位单通道加载嵌入图像。
///
/// GIF 按调色板索引读取，每个像素的值就是其索引；其他格式取亮度。
///
/// # Errors
///
/// 同 [`load_carrier`]。
pub fn load_embedded(path: &Path) -> Result<GrayImage, WeaveError> {
    if !path.is_file() {
        return Err(WeaveError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let bytes = fs::read(path).map_err(|source| WeaveError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let decoded = match image::guess_format(&bytes) {
        Ok(ImageFormat::Gif) => decode_gif_indices(&bytes),
        _ => image::load_from_memory(&bytes).map(|image| image.to_luma8()),
    };
    decoded.map_err(|source| WeaveError::UnsupportedFormat {
        path: path.to_path_buf(),
        source,
    })
}

fn gif_decoding_error(err: gif::DecodingError) -> ImageError {
    ImageError::Decoding(DecodingError::new(ImageFormat::Gif.into(), err))
}

/// 读取 GIF 第一帧的调色板索引，按逻辑屏幕尺寸铺放 (帧外区域为 0)。
fn decode_gif_indices(bytes: &[u8]) -> ImageResult<GrayImage> {
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::Indexed);
    let mut decoder = options.read_info(Cursor::new(bytes)).map_err(gif_decoding_error)?;

    let width = u32::from(decoder.width());
    let height = u32::from(decoder.height());
    let mut indices = GrayImage::new(width, height);

    let frame = decoder
        .read_next_frame()
        .map_err(gif_decoding_error)?
        .ok_or_else(|| {
            ImageError::Decoding(DecodingError::new(
                ImageFormat::Gif.into(),
                "GIF contains no frames",
            ))
        })?;

    let frame_width = usize::from(frame.width);
    let (left, top) = (u32::from(frame.left), u32::from(frame.top));
    for (row, line) in frame.buffer.chunks_exact(frame_width.max(1)).enumerate() {
        let y = top + row as u32;
        for (col, &index) in line.iter().enumerate() {
            let x = left + col as u32;
            if x < width && y < height {
                indices.put_pixel(x, y, Luma([index]));
            }
        }
    }
    Ok(indices)
}

fn saved(path: &Path, result: ImageResult<()>) -> Result<(), WeaveError> {
    result.map_err(|source| WeaveError::Save {
        path: path.to_path_buf(),
        source,
    })
}

/// 以 PNG 保存编织结果。
pub fn save_rgb(image: &RgbImage, path: &Path) -> Result<(), WeaveError> {
    saved(path, image.save_with_format(path, ImageFormat::Png))
}

/// 以指定格式保存提取出的单通道图像。
///
/// GIF 以 256 级灰度恒等调色板保存，像素索引即提取出的值。
pub fn save_gray(image: &GrayImage, path: &Path, format: EmbedFormat) -> Result<(), WeaveError> {
    match format {
        EmbedFormat::Png => saved(path, image.save_with_format(path, ImageFormat::Png)),
        EmbedFormat::Gif => {
            let written = encode_gif_indices(image)
                .and_then(|bytes| fs::write(path, bytes).map_err(ImageError::IoError));
            saved(path, written)
        }
    }
}

fn encode_gif_indices(image: &GrayImage) -> ImageResult<Vec<u8>> {
    let too_large = || ImageError::Limits(LimitError::from_kind(LimitErrorKind::DimensionError));
    let width = u16::try_from(image.width()).map_err(|_| too_large())?;
    let height = u16::try_from(image.height()).map_err(|_| too_large())?;
    let gif_error = |err: gif::EncodingError| {
        ImageError::Encoding(EncodingError::new(ImageFormat::Gif.into(), err))
    };

    let palette: Vec<u8> = (0..=255u8).flat_map(|v| [v, v, v]).collect();
    let frame = gif::Frame {
        width,
        height,
        buffer: Cow::Borrowed(image.as_raw().as_slice()),
        ..gif::Frame::default()
    };

    let mut bytes = Vec::new();
    {
        let mut encoder =
            gif::Encoder::new(&mut bytes, width, height, &palette).map_err(gif_error)?;
        encoder.write_frame(&frame).map_err(gif_error)?;
    }
    Ok(bytes)
}

/// 删除原始载体文件。
pub fn remove_carrier(path: &Path) -> Result<(), WeaveError> {
    fs::remove_file(path).map_err(|source| WeaveError::Io {
        path: path.to_path_buf(),
        source,
    })
}
