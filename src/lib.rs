//! # lsb_steg 库
//!
//! 本库包含 BMP LSB 隐写工具的核心逻辑。

// 声明库包含的所有模块。

pub mod capacity;
pub mod cli;
pub mod codec;
pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod handler;
