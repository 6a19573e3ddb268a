//! # 错误类型模块
//!
//! 定义隐写管线中所有可能出现的致命错误。
//! 所有错误都是不可恢复的：任何阶段检测到错误后整个管线立即中止，
//! 不做重试，也不回滚已写入的字节。

use std::io;
use std::path::PathBuf;
use std::string::FromUtf8Error;
use thiserror::Error;

/// 编码/解码管线的错误类型。
#[derive(Error, Debug)]
pub enum StegError {
    /// 无法打开输入或输出文件。
    #[error("Unable to open file: {path}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 载体图像的像素数据不足以容纳整个数据帧。
    #[error(
        "Not enough capacity in the carrier image: {required} pixel bytes required, {available} available"
    )]
    Capacity { required: u64, available: u64 },

    /// 秘密文件的大小超出了帧中 32 位 DATA_LEN 字段的表示范围。
    #[error("The secret file is too large for the 32-bit data length field: {size} bytes")]
    SecretTooLarge { size: u64 },

    /// 解码出的魔术标记与调用者提供的不一致。
    #[error("The decoded magic marker {decoded:?} does not match the supplied marker {expected:?}")]
    MagicMismatch { expected: String, decoded: String },

    /// 数据帧尚未处理完，输入字节流就已结束。
    #[error("The input stream ended mid-frame; the image may be corrupted or contain no hidden data")]
    TruncatedStream(#[source] io::Error),

    /// 恢复出的扩展名不是合法的 UTF-8，无法用于构造输出文件名。
    #[error("The recovered file extension is not valid UTF-8")]
    InvalidExtension(#[from] FromUtf8Error),

    /// 恢复出的扩展名中含有路径分隔符，拒绝将其拼入输出文件名。
    #[error("The recovered file extension {extension:?} contains a path separator")]
    UnsafeExtension { extension: String },

    /// 写入目标文件失败。
    #[error("Short write to the output file")]
    OutputWrite(#[source] io::Error),
}
