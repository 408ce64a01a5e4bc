//! PixelShield 输入格式校验
//!
//! 仅在加密路径上调用，且必须在生成 salt / nonce 之前完成：
//! 被拒绝的文件不应触发任何随机数生成或密钥派生。
//!
//! 校验顺序：
//! 1. 文件存在
//! 2. 文件非空
//! 3. 扩展名在支持列表中
//! 4. 内容能通过轻量结构校验（只读 header，不做完整解码）

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use image::{ImageFormat, ImageReader};
use tracing::debug;

use crate::error::{PixelShieldError, Result};

/// 支持的图片格式：格式名 → 扩展名（小写，不含前导点）
///
/// 供外部 UI 构造文件选择过滤器与“支持格式”列表。
pub const SUPPORTED_FORMATS: &[(&str, &[&str])] = &[
    ("JPEG", &["jpg", "jpeg", "jpe", "jfif"]),
    ("PNG", &["png"]),
    ("BMP", &["bmp", "dib"]),
    ("GIF", &["gif"]),
    ("TIFF", &["tiff", "tif"]),
    ("WebP", &["webp"]),
    ("ICO", &["ico"]),
    ("HEIC", &["heic", "heif"]),
    ("AVIF", &["avif"]),
    ("SVG", &["svg"]),
    ("RAW", &["raw", "cr2", "nef", "arw", "dng"]),
    ("PBM", &["pbm"]),
    ("PGM", &["pgm"]),
    ("PPM", &["ppm"]),
    ("XBM", &["xbm"]),
    ("XPM", &["xpm"]),
];

/// 签名探测只读取文件开头这么多字节
const SNIFF_LEN: u64 = 4096;

const HEIF_BRANDS: &[&[u8; 4]] = &[
    b"heic", b"heix", b"hevc", b"hevx", b"heim", b"heis", b"hevm", b"hevs", b"mif1", b"msf1",
];

const AVIF_BRANDS: &[&[u8; 4]] = &[b"avif", b"avis"];

/// 内容校验方式
#[derive(Debug, Clone, Copy)]
enum Probe {
    /// 交给 image crate 读取 header 与尺寸
    Decoder(ImageFormat),
    /// ISO-BMFF ftyp box 中出现任一 brand
    IsoBmff(&'static [&'static [u8; 4]]),
    /// 基于 TIFF 的相机 RAW（CR2 / NEF / ARW / DNG）
    TiffRaw,
    Svg,
    Xbm,
    Xpm,
    /// 无 header 的裸数据，非空即可
    Opaque,
}

fn probe_for(ext: &str) -> Option<Probe> {
    let probe = match ext {
        "jpg" | "jpeg" | "jpe" | "jfif" => Probe::Decoder(ImageFormat::Jpeg),
        "png" => Probe::Decoder(ImageFormat::Png),
        "bmp" | "dib" => Probe::Decoder(ImageFormat::Bmp),
        "gif" => Probe::Decoder(ImageFormat::Gif),
        "tiff" | "tif" => Probe::Decoder(ImageFormat::Tiff),
        "webp" => Probe::Decoder(ImageFormat::WebP),
        "ico" => Probe::Decoder(ImageFormat::Ico),
        "pbm" | "pgm" | "ppm" => Probe::Decoder(ImageFormat::Pnm),
        "heic" | "heif" => Probe::IsoBmff(HEIF_BRANDS),
        "avif" => Probe::IsoBmff(AVIF_BRANDS),
        "cr2" | "nef" | "arw" | "dng" => Probe::TiffRaw,
        "raw" => Probe::Opaque,
        "svg" => Probe::Svg,
        "xbm" => Probe::Xbm,
        "xpm" => Probe::Xpm,
        _ => return None,
    };

    Some(probe)
}

/// 所有受支持的扩展名（按 SUPPORTED_FORMATS 顺序）
pub fn supported_extensions() -> impl Iterator<Item = &'static str> {
    SUPPORTED_FORMATS
        .iter()
        .flat_map(|(_, exts)| exts.iter().copied())
}

/// 根据扩展名查找格式名，大小写不敏感，允许带前导点
pub fn format_for_extension(ext: &str) -> Option<&'static str> {
    let ext = ext.trim_start_matches('.').to_ascii_lowercase();

    SUPPORTED_FORMATS
        .iter()
        .find(|(_, exts)| exts.contains(&ext.as_str()))
        .map(|(name, _)| *name)
}

/// 校验加密输入，返回类型化错误
pub fn validate_image(path: &Path) -> Result<()> {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(PixelShieldError::InputNotFound(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };

    if !metadata.is_file() {
        return Err(PixelShieldError::UnsupportedFormat(format!(
            "'{}' is not a regular file",
            path.display()
        )));
    }

    if metadata.len() == 0 {
        return Err(PixelShieldError::EmptyInput(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let Some(format_name) = format_for_extension(&ext) else {
        let supported: Vec<String> = supported_extensions().map(|e| format!(".{e}")).collect();
        return Err(PixelShieldError::UnsupportedFormat(format!(
            "unsupported format '.{ext}'. Supported formats: {}",
            supported.join(", ")
        )));
    };

    let probe = probe_for(&ext).ok_or_else(|| {
        PixelShieldError::UnsupportedFormat(format!("unsupported format '.{ext}'"))
    })?;

    if let Err(reason) = verify_content(path, probe) {
        debug!(path = %path.display(), format = format_name, %reason, "content verification failed");
        return Err(PixelShieldError::UnsupportedFormat(format!(
            "invalid or corrupted image file: {reason}"
        )));
    }

    debug!(path = %path.display(), format = format_name, "input image accepted");
    Ok(())
}

/// 面向 UI 的校验接口：成功时返回 `(true, "")`，失败时返回可读信息
pub fn is_supported_image(path: &Path) -> (bool, String) {
    match validate_image(path) {
        Ok(()) => (true, String::new()),
        Err(e) => (false, e.to_string()),
    }
}

fn verify_content(path: &Path, probe: Probe) -> std::result::Result<(), String> {
    match probe {
        Probe::Decoder(format) => {
            let mut reader = ImageReader::open(path).map_err(|e| e.to_string())?;
            reader.set_format(format);
            reader.into_dimensions().map(|_| ()).map_err(|e| e.to_string())
        }
        Probe::IsoBmff(brands) => {
            let head = sniff(path)?;
            if has_ftyp_brand(&head, brands) {
                Ok(())
            } else {
                Err("missing or unexpected ftyp brand".to_owned())
            }
        }
        Probe::TiffRaw => {
            let head = sniff(path)?;
            if head.starts_with(b"II*\0") || head.starts_with(b"MM\0*") {
                Ok(())
            } else {
                Err("missing TIFF byte-order header".to_owned())
            }
        }
        Probe::Svg => text_marker(path, "<svg"),
        Probe::Xbm => text_marker(path, "#define"),
        Probe::Xpm => text_marker(path, "/* XPM */"),
        Probe::Opaque => Ok(()),
    }
}

fn sniff(path: &Path) -> std::result::Result<Vec<u8>, String> {
    let mut head = Vec::new();
    File::open(path)
        .and_then(|f| f.take(SNIFF_LEN).read_to_end(&mut head))
        .map_err(|e| e.to_string())?;
    Ok(head)
}

fn text_marker(path: &Path, marker: &str) -> std::result::Result<(), String> {
    let head = sniff(path)?;
    let text = String::from_utf8_lossy(&head).to_ascii_lowercase();

    if text.contains(&marker.to_ascii_lowercase()) {
        Ok(())
    } else {
        Err(format!("missing '{marker}' marker"))
    }
}

fn has_ftyp_brand(head: &[u8], brands: &[&[u8; 4]]) -> bool {
    if head.len() < 12 || &head[4..8] != b"ftyp" {
        return false;
    }

    let box_size = u32::from_be_bytes([head[0], head[1], head[2], head[3]]) as usize;
    let end = box_size.clamp(12, head.len());

    // major brand, 跳过 minor version, 之后是 compatible brands
    let major = std::iter::once(&head[8..12]);
    let compatible = head.get(16..end).unwrap_or_default().chunks_exact(4);

    major
        .chain(compatible)
        .any(|brand| brands.iter().any(|b| brand == &b[..]))
}
