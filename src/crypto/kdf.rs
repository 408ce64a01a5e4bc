//! PixelShield 密钥派生函数（KDF）模块
//!
//! 本模块负责将用户输入的密码，通过 PBKDF2-HMAC-SHA256
//! 派生为 256 bit 对称密钥，用于后续 AES-256-GCM 加解密。
//!
//! 设计目标：
//! - 刻意放慢单次派生（100,000 次迭代），抵抗暴力猜测
//! - 每个加密文件使用独立的随机 salt
//! - 派生结果为原始字节，直接作为 AEAD key，不做任何编码
//! - 敏感密钥材料在离开作用域后自动清零
//!
//! 注意：
//! - 派生是阻塞的 CPU 密集操作（数十毫秒量级），调用方如需响应性应自行放到工作线程
//! - 本层不对密码做任何强度校验，空密码同样接受

use pbkdf2::pbkdf2_hmac;
use rand::{RngCore, rngs::OsRng};
use sha2::Sha256;
use zeroize::Zeroizing;

/// 派生密钥长度（256-bit）
pub const KEY_LEN: usize = 32;

/// KDF 使用的 salt 长度（字节）
pub const SALT_SIZE: usize = 16;

/// PBKDF2 迭代次数
///
/// 修改该值会导致已有容器无法解密（容器中没有记录参数）。
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// 生成用于 KDF 的随机 salt
///
/// 每次加密都必须使用全新的 salt，严禁复用。
pub fn generate_salt() -> [u8; SALT_SIZE] {
    let mut salt = [0u8; SALT_SIZE];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// 根据密码和 salt 派生对称加密密钥
///
/// 相同的 (password, salt) 永远得到相同的密钥，解密依赖这一点从容器中的 salt 重建密钥。
/// 返回值使用 Zeroizing 包装，drop 时清零。
pub fn derive_key(password: &str, salt: &[u8; SALT_SIZE]) -> Zeroizing<[u8; KEY_LEN]> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);

    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut key[..]);

    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_key_is_deterministic() {
        let salt = [42u8; SALT_SIZE];

        let k1 = derive_key("password", &salt);
        let k2 = derive_key("password", &salt);

        assert_eq!(*k1, *k2);
    }

    #[test]
    fn salt_changes_derived_key() {
        let k1 = derive_key("password", &[1u8; SALT_SIZE]);
        let k2 = derive_key("password", &[2u8; SALT_SIZE]);

        assert_ne!(*k1, *k2);
    }

    #[test]
    fn password_changes_derived_key() {
        let salt = [7u8; SALT_SIZE];

        assert_ne!(*derive_key("pw-a", &salt), *derive_key("pw-b", &salt));
    }

    #[test]
    fn empty_password_is_accepted() {
        let key = derive_key("", &[0u8; SALT_SIZE]);
        assert_eq!(key.len(), KEY_LEN);
    }

    #[test]
    fn matches_pbkdf2_sha256_reference() {
        // RFC 7914 §11 PBKDF2-HMAC-SHA256 向量，迭代次数不同，这里只校验算法本身
        let mut out = [0u8; 64];
        pbkdf2_hmac::<Sha256>(b"passwd", b"salt", 1, &mut out);
        assert_eq!(
            &out[..8],
            &[0x55, 0xac, 0x04, 0x6e, 0x56, 0xe3, 0x08, 0x9f]
        );
    }

    #[test]
    fn generated_salts_differ() {
        assert_ne!(generate_salt(), generate_salt());
    }
}
