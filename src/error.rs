//! PixelShield 错误类型
//!
//! 错误粒度刻意保持粗糙：认证失败不区分密码错误、数据损坏或篡改，
//! 统一报告为 AuthenticationFailure，避免形成解密预言机。

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PixelShieldError {
    #[error("input file '{}' does not exist", .0.display())]
    InputNotFound(PathBuf),

    #[error("input file '{}' is empty", .0.display())]
    EmptyInput(PathBuf),

    #[error("{0}")]
    UnsupportedFormat(String),

    #[error("invalid encrypted file format")]
    MalformedContainer,

    #[error("decryption failed: incorrect password or corrupted file")]
    AuthenticationFailure,

    #[error("I/O error: {0}")]
    IoFailure(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PixelShieldError>;
