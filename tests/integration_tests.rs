use image::{GrayImage, ImageBuffer, Luma, Rgb};
use lsb_weaver::{
    cli::{EmbedFormat, ExtractArgs, ExtractTxtArgs, WeaveArgs, WeaveTxtArgs},
    error::WeaveError,
    handler::{
        handle_extract, handle_extract_txt, handle_functions, handle_weave, handle_weave_txt,
        write_recovered_text,
    },
    raster_io::{
        extract_output_path, load_embedded, weave_output_path, weave_txt_output_path,
        with_default_extension,
    },
};
use rand::{Rng, RngCore};
use std::borrow::Cow;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// 一个辅助函数，用于创建一个带有随机像素的测试图像
fn create_test_image(path: &Path, width: u32, height: u32) {
    let mut img_buf = ImageBuffer::new(width, height);
    let mut raw_pixels = vec![0u8; (width * height * 3) as usize];
    rand::rng().fill_bytes(&mut raw_pixels);

    img_buf
        .pixels_mut()
        .zip(raw_pixels.chunks_exact(3))
        .for_each(|(pixel, chunk)| {
            *pixel = Rgb([chunk[0], chunk[1], chunk[2]]);
        });

    img_buf.save(path).expect("Failed to create test image.");
}

/// 创建一个带有随机灰度值的单通道测试图像
fn create_gray_image(path: &Path, width: u32, height: u32) -> GrayImage {
    let mut rng = rand::rng();
    let img_buf = GrayImage::from_fn(width, height, |_, _| Luma([rng.random::<u8>()]));
    img_buf.save(path).expect("Failed to create gray test image.");
    img_buf
}

/// 创建一个彩色调色板的 GIF，像素索引与其颜色的亮度不同
fn create_palette_gif(path: &Path, width: u16, height: u16) -> anyhow::Result<GrayImage> {
    let indices = GrayImage::from_fn(u32::from(width), u32::from(height), |x, y| {
        Luma([((x * 7 + y * 13) % 256) as u8])
    });
    let palette: Vec<u8> = (0..=255u8)
        .flat_map(|v| [v.wrapping_mul(37), 255 - v, v / 3])
        .collect();

    let mut bytes = Vec::new();
    {
        let mut encoder = gif::Encoder::new(&mut bytes, width, height, &palette)?;
        let frame = gif::Frame {
            width,
            height,
            buffer: Cow::Borrowed(indices.as_raw().as_slice()),
            ..gif::Frame::default()
        };
        encoder.write_frame(&frame)?;
    }
    fs::write(path, bytes)?;
    Ok(indices)
}

fn weave_txt_args(image: &Path, text: &str) -> WeaveTxtArgs {
    WeaveTxtArgs {
        image: image.to_path_buf(),
        text: Some(text.to_string()),
        file: None,
        keep_carrier: false,
    }
}

/// 验证输出文件命名与扩展名补全
#[test]
fn test_output_naming() {
    let carrier = Path::new("dir/picture.png");
    assert_eq!(
        extract_output_path(carrier, EmbedFormat::Png),
        Path::new("dir/picture-g.png")
    );
    assert_eq!(
        extract_output_path(carrier, EmbedFormat::Gif),
        Path::new("dir/picture-g.gif")
    );
    assert_eq!(weave_output_path(carrier), Path::new("dir/picture[0].png"));
    assert_eq!(weave_txt_output_path(carrier), Path::new("dir/picture-00.png"));

    assert_eq!(
        with_default_extension(Path::new("dir/picture"), "png"),
        Path::new("dir/picture.png")
    );
    assert_eq!(
        with_default_extension(Path::new("dir/picture.bmp"), "png"),
        Path::new("dir/picture.bmp")
    );
}

/// 验证图像从编织到提取的完整流程
#[test]
fn test_handle_weave_and_extract_integration() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let carrier_path = dir.path().join("carrier.png");
    let embed_path = dir.path().join("embed.png");

    create_test_image(&carrier_path, 48, 32);
    let embedded = create_gray_image(&embed_path, 48, 32);

    // 2. 测试 handle_weave
    let woven_path = handle_weave(WeaveArgs {
        image: carrier_path.clone(),
        embed: embed_path.clone(),
        keep_carrier: false,
    })?;
    assert_eq!(woven_path, dir.path().join("carrier[0].png"));
    assert!(woven_path.exists(), "Woven image should be created.");
    assert!(!carrier_path.exists(), "Original carrier should be deleted.");

    // 3. 测试 handle_extract
    let extracted_path = handle_extract(ExtractArgs {
        image: woven_path.clone(),
        format: EmbedFormat::Png,
    })?;
    assert_eq!(extracted_path, dir.path().join("carrier[0]-g.png"));

    // 4. 验证结果
    let extracted = image::open(&extracted_path)?.to_luma8();
    assert_eq!(extracted, embedded, "Extracted image must match the embedded one.");

    Ok(())
}

/// 验证全黑载体与常量嵌入图像的编织结果
#[test]
fn test_weave_constant_embed_into_black_carrier() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let carrier_path = dir.path().join("black.png");
    let embed_path = dir.path().join("grey.png");

    ImageBuffer::from_pixel(100, 100, Rgb([0u8, 0, 0])).save(&carrier_path)?;
    let embedded = GrayImage::from_pixel(100, 100, Luma([170]));
    embedded.save(&embed_path)?;

    let woven_path = handle_weave(WeaveArgs {
        image: carrier_path,
        embed: embed_path,
        keep_carrier: false,
    })?;

    let woven = image::open(&woven_path)?.to_rgb8();
    assert!(woven.pixels().all(|p| p.0 == [0b101, 0b010, 0b10]));

    let extracted_path = handle_extract(ExtractArgs {
        image: woven_path,
        format: EmbedFormat::Png,
    })?;
    assert_eq!(image::open(&extracted_path)?.to_luma8(), embedded);

    Ok(())
}

/// 验证尺寸不一致时不会写入或删除任何文件
#[test]
fn test_handle_weave_size_mismatch() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let carrier_path = dir.path().join("carrier.png");
    let embed_path = dir.path().join("embed.png");

    create_test_image(&carrier_path, 10, 10);
    create_gray_image(&embed_path, 9, 10);
    let carrier_before = fs::read(&carrier_path)?;

    let result = handle_weave(WeaveArgs {
        image: carrier_path.clone(),
        embed: embed_path,
        keep_carrier: false,
    });

    let err = result.expect_err("Weaving images of different sizes should fail.");
    assert!(matches!(
        err.downcast_ref::<WeaveError>(),
        Some(WeaveError::SizeMismatch { .. })
    ));
    assert_eq!(fs::read(&carrier_path)?, carrier_before);
    assert!(!dir.path().join("carrier[0].png").exists());

    Ok(())
}

/// 验证文本从编织到提取的完整流程，以及载体路径的扩展名补全
#[test]
fn test_handle_weave_txt_and_extract_txt_integration() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let carrier_path = dir.path().join("original.png");
    let recovered_text_path = dir.path().join("recovered.txt");

    create_test_image(&carrier_path, 100, 100);
    let original_text = "This is a test message for the handler! Grüße aus Köln.";

    // 2. 测试 handle_weave_txt，载体路径不带扩展名
    let woven_path = handle_weave_txt(weave_txt_args(&dir.path().join("original"), original_text))?;
    assert_eq!(woven_path, dir.path().join("original-00.png"));
    assert!(woven_path.exists(), "Woven image should be created.");
    assert!(!carrier_path.exists(), "Original carrier should be deleted.");

    // 3. 测试 handle_extract_txt
    let recovered = handle_extract_txt(ExtractTxtArgs {
        image: woven_path,
        output: Some(recovered_text_path.clone()),
    })?;
    assert_eq!(recovered, original_text);

    // 4. 验证结果：文件中为 8 位码点
    let recovered_bytes = fs::read(&recovered_text_path)?;
    let expected: Vec<u8> = original_text.chars().map(|c| c as u8).collect();
    assert_eq!(recovered_bytes, expected);

    Ok(())
}

/// 验证以文件形式提供的负载能按字节原样恢复
#[test]
fn test_handle_weave_txt_from_file() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let carrier_path = dir.path().join("carrier.png");
    let source_text_path = dir.path().join("source.txt");
    let recovered_text_path = dir.path().join("recovered.txt");

    create_test_image(&carrier_path, 80, 80);
    let original_text = "这是一个给处理器的测试信息！";
    fs::write(&source_text_path, original_text)?;

    let woven_path = handle_weave_txt(WeaveTxtArgs {
        image: carrier_path,
        text: None,
        file: Some(source_text_path),
        keep_carrier: false,
    })?;

    handle_extract_txt(ExtractTxtArgs {
        image: woven_path,
        output: Some(recovered_text_path.clone()),
    })?;

    let recovered_text = fs::read_to_string(&recovered_text_path)?;
    assert_eq!(
        original_text, recovered_text,
        "Recovered text must match the original."
    );

    Ok(())
}

/// 验证 `--keep-carrier` 会保留原始载体
#[test]
fn test_keep_carrier_flag() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let carrier_path = dir.path().join("keep.png");
    create_test_image(&carrier_path, 30, 30);

    let woven_path = handle_weave_txt(WeaveTxtArgs {
        keep_carrier: true,
        ..weave_txt_args(&carrier_path, "kept")
    })?;

    assert!(carrier_path.exists(), "Carrier should be kept.");
    assert!(woven_path.exists());
    Ok(())
}

/// 验证空间不足时的错误处理：不写入、不删除
#[test]
fn test_handle_weave_txt_not_enough_space() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let carrier_path = dir.path().join("small.png");

    // 创建一个非常小的图片
    ImageBuffer::from_fn(2, 1, |x, _| {
        if x == 0 {
            Rgb([255u8, 255, 255])
        } else {
            Rgb([0, 0, 0])
        }
    })
    .save(&carrier_path)?;
    let carrier_before = fs::read(&carrier_path)?;

    // 2. 执行并断言错误
    let result = handle_weave_txt(weave_txt_args(&carrier_path, "Hi"));

    let err = result.expect_err("Weaving into a 2x1px carrier should fail.");
    match err.downcast_ref::<WeaveError>() {
        Some(WeaveError::CapacityExceeded {
            required,
            available,
            ..
        }) => {
            assert_eq!(*required, 11);
            assert_eq!(*available, 2);
        }
        other => panic!("Unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("is not enough"));

    // 3. 载体保持原样，未生成输出
    assert_eq!(fs::read(&carrier_path)?, carrier_before);
    assert!(!dir.path().join("small-00.png").exists());

    Ok(())
}

/// 验证缺失文件与无法解码的文件分别报告
#[test]
fn test_missing_and_corrupt_carriers() -> anyhow::Result<()> {
    let dir = tempdir()?;

    let missing = handle_extract_txt(ExtractTxtArgs {
        image: dir.path().join("missing.png"),
        output: None,
    });
    assert!(matches!(
        missing.expect_err("Missing carrier should fail.").downcast_ref::<WeaveError>(),
        Some(WeaveError::NotFound { .. })
    ));

    let corrupt_path = dir.path().join("corrupt.png");
    fs::write(&corrupt_path, "this is not an image")?;
    let corrupt = handle_extract(ExtractArgs {
        image: corrupt_path.clone(),
        format: EmbedFormat::Png,
    });
    assert!(matches!(
        corrupt.expect_err("Corrupt carrier should fail.").downcast_ref::<WeaveError>(),
        Some(WeaveError::UnsupportedFormat { .. })
    ));
    assert!(!dir.path().join("corrupt-g.png").exists());

    let missing_payload = handle_weave_txt(WeaveTxtArgs {
        image: corrupt_path.clone(),
        text: None,
        file: Some(dir.path().join("missing.txt")),
        keep_carrier: false,
    });
    assert!(matches!(
        missing_payload.expect_err("Missing payload should fail.").downcast_ref::<WeaveError>(),
        Some(WeaveError::NotFound { .. })
    ));
    assert!(corrupt_path.exists());

    Ok(())
}

/// 验证提取结果可以保存为 GIF，且调色板索引即提取出的值
#[test]
fn test_extract_to_gif() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let carrier_path = dir.path().join("c.png");
    let embed_path = dir.path().join("e.png");

    create_test_image(&carrier_path, 32, 16);
    let embedded = create_gray_image(&embed_path, 32, 16);

    let woven_path = handle_weave(WeaveArgs {
        image: carrier_path,
        embed: embed_path,
        keep_carrier: false,
    })?;

    let extracted_path = handle_extract(ExtractArgs {
        image: woven_path,
        format: EmbedFormat::Gif,
    })?;
    assert_eq!(extracted_path, dir.path().join("c[0]-g.gif"));
    assert!(extracted_path.exists(), "Extracted GIF should be created.");

    assert_eq!(load_embedded(&extracted_path)?, embedded);
    // 其他解码器也能读取该 GIF
    assert_eq!(image::open(&extracted_path)?.to_rgb8().dimensions(), (32, 16));

    Ok(())
}

/// 验证嵌入 GIF 时写入的是调色板索引而非颜色亮度，并验证 `.gif` 扩展名补全
#[test]
fn test_weave_palette_gif_embeds_indices() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let carrier_path = dir.path().join("host.png");
    let gif_path = dir.path().join("palette.gif");

    create_test_image(&carrier_path, 24, 20);
    let indices = create_palette_gif(&gif_path, 24, 20)?;
    assert_ne!(
        image::open(&gif_path)?.to_luma8(),
        indices,
        "Palette colours should not be an identity grey ramp."
    );
    assert_eq!(load_embedded(&gif_path)?, indices);

    // 嵌入路径不带扩展名，自动补全为 palette.gif
    let woven_path = handle_weave(WeaveArgs {
        image: carrier_path,
        embed: dir.path().join("palette"),
        keep_carrier: false,
    })?;

    let extracted_path = handle_extract(ExtractArgs {
        image: woven_path,
        format: EmbedFormat::Png,
    })?;
    assert_eq!(image::open(&extracted_path)?.to_luma8(), indices);

    Ok(())
}

/// 验证恢复文本的字节流写出：换行只在终端输出时追加
#[test]
fn test_write_recovered_text() -> anyhow::Result<()> {
    let bytes = "Straße".chars().map(|c| c as u8).collect::<Vec<u8>>();

    let mut piped = Vec::new();
    write_recovered_text(&mut piped, &bytes, false)?;
    assert_eq!(piped, bytes);

    let mut terminal = Vec::new();
    write_recovered_text(&mut terminal, &bytes, true)?;
    assert_eq!(terminal, [bytes.as_slice(), &b"\n"[..]].concat());

    Ok(())
}

#[test]
fn test_handle_functions() -> anyhow::Result<()> {
    handle_functions()
}
