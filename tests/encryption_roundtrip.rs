use std::fs;

use image::{ImageFormat, Rgb, RgbImage};
use pixelshield::{HEADER_SIZE, PixelShieldError};
use tempfile::tempdir;

fn write_test_png(path: &std::path::Path) {
    RgbImage::from_fn(8, 8, |x, y| Rgb([x as u8 * 30, y as u8 * 30, 128]))
        .save_with_format(path, ImageFormat::Png)
        .expect("write png");
}

#[test]
fn encrypt_decrypt_image_roundtrip() {
    // 加密后再解密必须逐字节恢复原始文件。
    let temp_dir = tempdir().expect("create temp dir");
    let input_path = temp_dir.path().join("photo.png");
    let encrypted_path = temp_dir.path().join("photo.bin");
    let decrypted_path = temp_dir.path().join("restored.png");

    write_test_png(&input_path);
    let original = fs::read(&input_path).expect("read original");

    pixelshield::encrypt_image(&input_path, &encrypted_path, "test-password")
        .expect("encrypt file");

    let container = fs::read(&encrypted_path).expect("read container");
    assert_eq!(container.len(), HEADER_SIZE + original.len());

    pixelshield::decrypt_image(&encrypted_path, &decrypted_path, "test-password")
        .expect("decrypt file");

    let decrypted = fs::read(&decrypted_path).expect("read decrypted");
    assert_eq!(decrypted, original);
}

#[test]
fn decrypt_with_wrong_password_fails_without_output() {
    // 错误密码必须导致认证失败，且不留下输出文件。
    let temp_dir = tempdir().expect("create temp dir");
    let input_path = temp_dir.path().join("photo.png");
    let encrypted_path = temp_dir.path().join("photo.bin");
    let decrypted_path = temp_dir.path().join("restored.png");

    write_test_png(&input_path);

    pixelshield::encrypt_image(&input_path, &encrypted_path, "correct-password")
        .expect("encrypt file");

    let result = pixelshield::decrypt_image(&encrypted_path, &decrypted_path, "wrong-password");
    assert!(matches!(result, Err(PixelShieldError::AuthenticationFailure)));
    assert!(!decrypted_path.exists());
}

#[test]
fn encrypt_rejects_unsupported_input_without_output() {
    let temp_dir = tempdir().expect("create temp dir");
    let input_path = temp_dir.path().join("notes.txt");
    let encrypted_path = temp_dir.path().join("notes.bin");

    fs::write(&input_path, b"not an image").expect("write input");

    let result = pixelshield::encrypt_image(&input_path, &encrypted_path, "pw");
    assert!(matches!(result, Err(PixelShieldError::UnsupportedFormat(_))));
    assert!(!encrypted_path.exists());
}

#[test]
fn encrypt_rejects_missing_and_empty_input() {
    let temp_dir = tempdir().expect("create temp dir");
    let missing = temp_dir.path().join("missing.png");
    let empty = temp_dir.path().join("empty.png");
    let output = temp_dir.path().join("out.bin");

    fs::write(&empty, b"").expect("write empty");

    assert!(matches!(
        pixelshield::encrypt_image(&missing, &output, "pw"),
        Err(PixelShieldError::InputNotFound(_))
    ));
    assert!(matches!(
        pixelshield::encrypt_image(&empty, &output, "pw"),
        Err(PixelShieldError::EmptyInput(_))
    ));
    assert!(!output.exists());
}

#[test]
fn decrypt_rejects_short_container() {
    // 不足 44 字节的输入直接判定为格式错误。
    let temp_dir = tempdir().expect("create temp dir");
    let bad_path = temp_dir.path().join("bad.bin");
    let output_path = temp_dir.path().join("output.png");

    fs::write(&bad_path, b"not a pixelshield file").expect("write bad file");

    let result = pixelshield::decrypt_image(&bad_path, &output_path, "password");
    assert!(matches!(result, Err(PixelShieldError::MalformedContainer)));
    assert!(!output_path.exists());
}

#[test]
fn decrypt_reports_missing_and_empty_input() {
    let temp_dir = tempdir().expect("create temp dir");
    let missing = temp_dir.path().join("missing.bin");
    let empty = temp_dir.path().join("empty.bin");
    let output = temp_dir.path().join("out.png");

    fs::write(&empty, b"").expect("write empty");

    assert!(matches!(
        pixelshield::decrypt_image(&missing, &output, "pw"),
        Err(PixelShieldError::InputNotFound(_))
    ));
    assert!(matches!(
        pixelshield::decrypt_image(&empty, &output, "pw"),
        Err(PixelShieldError::EmptyInput(_))
    ));
}

#[test]
fn decrypt_overwrites_existing_output_only_on_success() {
    let temp_dir = tempdir().expect("create temp dir");
    let input_path = temp_dir.path().join("photo.png");
    let encrypted_path = temp_dir.path().join("photo.bin");
    let output_path = temp_dir.path().join("restored.png");

    write_test_png(&input_path);
    fs::write(&output_path, b"previous contents").expect("seed output");

    pixelshield::encrypt_image(&input_path, &encrypted_path, "pw").expect("encrypt file");

    assert!(pixelshield::decrypt_image(&encrypted_path, &output_path, "nope").is_err());
    assert_eq!(fs::read(&output_path).expect("read output"), b"previous contents");

    pixelshield::decrypt_image(&encrypted_path, &output_path, "pw").expect("decrypt file");
    assert_eq!(
        fs::read(&output_path).expect("read output"),
        fs::read(&input_path).expect("read input")
    );
}
