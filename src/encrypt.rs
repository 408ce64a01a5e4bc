//! PixelShield 加密流程实现
//!
//! 加密流程（严格顺序）：
//! 1. 校验输入图片（仅文件路径入口）
//! 2. 生成 salt，使用 KDF 从密码派生 AEAD key
//! 3. 生成 nonce，AES-256-GCM 加密
//! 4. 输出 salt || nonce || tag || ciphertext
//!
//! 注意：
//! - 整个文件读入内存，不做流式处理
//! - 每次调用都重新生成 salt 与 nonce，同一明文 + 密码两次加密结果必然不同

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::crypto::{aead, kdf};
use crate::error::Result;
use crate::format::header::{HEADER_SIZE, Header};
use crate::formats::validate_image;
use crate::fs::atomic::write_bytes_atomic;

/// 使用密码加密一段字节，返回完整容器
pub fn encrypt_bytes(plaintext: &[u8], password: &str) -> Result<Vec<u8>> {
    // ---------- KDF 派生密钥 ----------
    let salt = kdf::generate_salt();
    let key = kdf::derive_key(password, &salt);

    // ---------- AEAD 加密 ----------
    let nonce = aead::generate_nonce();
    let sealed = aead::seal(&key, &nonce, plaintext)?;

    // ---------- 组装容器 ----------
    let header = Header::new(salt, nonce, sealed.tag);

    let mut container = Vec::with_capacity(HEADER_SIZE + sealed.ciphertext.len());
    header.write(&mut container)?;
    container.extend_from_slice(&sealed.ciphertext);

    debug!(
        plaintext_len = plaintext.len(),
        container_len = container.len(),
        "payload sealed"
    );

    Ok(container)
}

/// 加密图片文件
///
/// 输入未通过格式校验时直接返回，不会生成任何随机数或派生密钥。
/// 输出以原子方式写入，失败时不会留下文件。
pub fn encrypt_file(input_path: &Path, output_path: &Path, password: &str) -> Result<()> {
    // ---------- 校验输入 ----------
    validate_image(input_path)?;

    let plaintext = fs::read(input_path)?;

    let container = encrypt_bytes(&plaintext, password)?;

    // ---------- 原子写出 ----------
    write_bytes_atomic(output_path, &container)?;

    info!(
        input = %input_path.display(),
        output = %output_path.display(),
        bytes = container.len(),
        "image encrypted"
    );

    Ok(())
}
