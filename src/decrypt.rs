//! PixelShield 解密流程实现
//!
//! 解密流程（严格顺序）：
//! 1. 校验容器长度（< 44 字节直接拒绝，不做任何密钥派生）
//! 2. 拆分 salt / nonce / tag / ciphertext
//! 3. 使用容器中的 salt + 密码派生 AEAD key
//! 4. 认证解密
//!
//! 注意：
//! - 认证失败不区分原因，统一返回 AuthenticationFailure
//! - 解密不做图片格式校验，任何通过长度检查的输入都会尝试解密

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, info};

use crate::crypto::{aead, kdf};
use crate::error::{PixelShieldError, Result};
use crate::format::header::Header;
use crate::fs::atomic::write_bytes_atomic;

/// 使用密码解密完整容器，返回明文
pub fn decrypt_bytes(container: &[u8], password: &str) -> Result<Vec<u8>> {
    // ---------- 解析 Header ----------
    let (header, ciphertext) = Header::split(container)?;

    // ---------- KDF 派生密钥 ----------
    let key = kdf::derive_key(password, &header.salt);

    // ---------- AEAD 解密 ----------
    let plaintext = aead::open(&key, &header.nonce, &header.tag, ciphertext)?;

    debug!(
        container_len = container.len(),
        plaintext_len = plaintext.len(),
        "payload opened"
    );

    Ok(plaintext)
}

/// 解密容器文件并写出原始图片
///
/// 只有认证通过后才会写出，且写出为原子操作。
pub fn decrypt_file(input_path: &Path, output_path: &Path, password: &str) -> Result<()> {
    // ---------- 读取输入 ----------
    let container = match fs::read(input_path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(PixelShieldError::InputNotFound(input_path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };

    if container.is_empty() {
        return Err(PixelShieldError::EmptyInput(input_path.to_path_buf()));
    }

    let plaintext = decrypt_bytes(&container, password)?;

    // ---------- 原子写出 ----------
    write_bytes_atomic(output_path, &plaintext)?;

    info!(
        input = %input_path.display(),
        output = %output_path.display(),
        bytes = plaintext.len(),
        "image decrypted"
    );

    Ok(())
}
