//! PixelShield 容器 Header 实现
//!
//! 容器布局（无 magic、无版本号）：
//!
//! ```text
//! offset  size   field
//! 0       16     salt
//! 16      12     nonce
//! 28      16     tag
//! 44      N      ciphertext（N = 明文长度）
//! ```
//!
//! 解密前必须先完成长度校验：不足 44 字节的输入在构造上就不可能合法，
//! 必须在 KDF / AEAD 之前直接拒绝。

use std::io::Write;

use crate::crypto::aead::{NONCE_SIZE, TAG_SIZE};
use crate::crypto::kdf::SALT_SIZE;
use crate::error::{PixelShieldError, Result};

/// 固定 Header 大小
///
/// 16 (salt)
/// 12 (nonce)
/// 16 (tag)
pub const HEADER_SIZE: usize = SALT_SIZE + NONCE_SIZE + TAG_SIZE;

/// 容器 Header 结构
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub salt: [u8; SALT_SIZE],
    pub nonce: [u8; NONCE_SIZE],
    pub tag: [u8; TAG_SIZE],
}

impl Header {
    pub fn new(salt: [u8; SALT_SIZE], nonce: [u8; NONCE_SIZE], tag: [u8; TAG_SIZE]) -> Self {
        Self { salt, nonce, tag }
    }

    /// 将 Header 写入输出流，顺序为 salt → nonce → tag
    pub fn write<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        writer.write_all(&self.salt)?;
        writer.write_all(&self.nonce)?;
        writer.write_all(&self.tag)?;

        Ok(())
    }

    /// 将完整容器拆分为 Header 与密文
    ///
    /// 长度不足 HEADER_SIZE 时返回 MalformedContainer。
    pub fn split(container: &[u8]) -> Result<(Self, &[u8])> {
        if container.len() < HEADER_SIZE {
            return Err(PixelShieldError::MalformedContainer);
        }

        let (header, ciphertext) = container.split_at(HEADER_SIZE);
        let (salt, rest) = header.split_at(SALT_SIZE);
        let (nonce, tag) = rest.split_at(NONCE_SIZE);

        let mut parsed = Self::new([0u8; SALT_SIZE], [0u8; NONCE_SIZE], [0u8; TAG_SIZE]);
        parsed.salt.copy_from_slice(salt);
        parsed.nonce.copy_from_slice(nonce);
        parsed.tag.copy_from_slice(tag);

        Ok((parsed, ciphertext))
    }
}
