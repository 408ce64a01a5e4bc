//! PixelShield：基于密码的图片文件加密库。
//!
//! PBKDF2-HMAC-SHA256 派生密钥，AES-256-GCM 认证加密，
//! 输出 `salt(16) || nonce(12) || tag(16) || ciphertext` 单一容器格式。
//!
//! 库本身无任何进程级状态，所有函数都是同步阻塞的。

mod encrypt;
mod decrypt;

pub mod crypto;
pub mod format;
pub mod formats;
pub mod fs;
pub mod error;

pub use error::{PixelShieldError, Result};
pub use format::header::HEADER_SIZE;
pub use formats::{SUPPORTED_FORMATS, is_supported_image, supported_extensions, validate_image};

use std::path::Path;

/// 加密内存中的明文，返回容器字节
pub fn encrypt(plaintext: &[u8], password: &str) -> Result<Vec<u8>> {
    encrypt::encrypt_bytes(plaintext, password)
}

/// 解密容器字节，返回明文
pub fn decrypt(container: &[u8], password: &str) -> Result<Vec<u8>> {
    decrypt::decrypt_bytes(container, password)
}

pub fn encrypt_image(input: &Path, output: &Path, password: &str) -> Result<()> {
    encrypt::encrypt_file(input, output, password)
}

pub fn decrypt_image(input: &Path, output: &Path, password: &str) -> Result<()> {
    decrypt::decrypt_file(input, output, password)
}
