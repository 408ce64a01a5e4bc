//! PixelShield AEAD 加解密模块
//!
//! 本模块基于 AES-256-GCM 实现 AEAD（Authenticated Encryption
//! with Associated Data）。
//!
//! 功能说明：
//! - 提供“加密 + 完整性校验”一体化能力
//! - 认证标签与密文分离存放，密文长度与明文完全一致
//! - 解密失败即表示：密码错误 或 数据被篡改（二者不区分）
//!
//! 安全约束：
//! - 同一 key 下 nonce 严禁复用
//! - 不允许在未校验通过的情况下输出任何明文

use aes_gcm::{
    Aes256Gcm, Key, Nonce, Tag,
    aead::{AeadInPlace, KeyInit},
};
use rand::{RngCore, rngs::OsRng};

use crate::crypto::kdf::KEY_LEN;
use crate::error::{PixelShieldError, Result};

/// AES-GCM 使用的 nonce 长度（96 bit，标准推荐值）
pub const NONCE_SIZE: usize = 12;

/// 认证标签长度（128 bit）
pub const TAG_SIZE: usize = 16;

/// 加密结果结构
///
/// tag 需要与密文一同保存，用于解密时校验
pub struct SealedData {
    pub tag: [u8; TAG_SIZE],
    pub ciphertext: Vec<u8>,
}

/// 生成随机 nonce（96 bit）
pub fn generate_nonce() -> [u8; NONCE_SIZE] {
    let mut nonce = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce);
    nonce
}

/// 使用 AES-256-GCM 加密数据
///
/// #### 参数
/// - `key_bytes`：32 字节对称密钥（来自 KDF）
/// - `nonce`：本次加密专用的 nonce，调用方保证唯一
/// - `plaintext`：待加密的数据，可以为空
///
/// #### 返回
/// - SealedData（密文 + 分离的认证标签）
pub fn seal(
    key_bytes: &[u8; KEY_LEN],
    nonce: &[u8; NONCE_SIZE],
    plaintext: &[u8],
) -> Result<SealedData> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key_bytes));

    let mut ciphertext = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(Nonce::from_slice(nonce), b"", &mut ciphertext)
        .map_err(|_| std::io::Error::other("AEAD encrypt failed"))?;

    let mut tag_bytes = [0u8; TAG_SIZE];
    tag_bytes.copy_from_slice(&tag);

    Ok(SealedData {
        tag: tag_bytes,
        ciphertext,
    })
}

/// 使用 AES-256-GCM 解密数据
///
/// # 错误
/// - 任何失败（tag 不匹配、密码错误、数据损坏）统一返回 AuthenticationFailure
///
/// # 安全保证
/// - 在认证未通过前，不会返回任何明文数据
pub fn open(
    key_bytes: &[u8; KEY_LEN],
    nonce: &[u8; NONCE_SIZE],
    tag: &[u8; TAG_SIZE],
    ciphertext: &[u8],
) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key_bytes));

    let mut plaintext = ciphertext.to_vec();
    cipher
        .decrypt_in_place_detached(
            Nonce::from_slice(nonce),
            b"",
            &mut plaintext,
            Tag::from_slice(tag),
        )
        .map_err(|_| PixelShieldError::AuthenticationFailure)?;

    Ok(plaintext)
}
