//! 加密容器格式。

pub mod header;
