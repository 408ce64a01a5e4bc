//! 密码学原语：密钥派生与 AEAD。

pub mod aead;
pub mod kdf;
