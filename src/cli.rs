//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use crate::constants::DEFAULT_MAGIC;
use clap::Parser;
use std::path::PathBuf;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在 24 位未压缩 BMP 图像中隐藏或恢复任意秘密文件。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在 24 位未压缩 BMP 图像中隐藏或恢复任意秘密文件。"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：encode (嵌入) 和 decode (恢复)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 将一个秘密文件嵌入到 BMP 载体图像的像素最低有效位中。
    Encode(EncodeArgs),

    /// 从隐写图像中恢复嵌入的秘密文件。
    Decode(DecodeArgs),
}

/// 'encode' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct EncodeArgs {
    /// 用作载体的 BMP 图像路径 (必须以 .bmp 结尾)。
    pub carrier: PathBuf,

    /// 要隐藏的秘密文件路径 (文件名必须包含 '.'，用于推导要嵌入的扩展名)。
    pub secret: PathBuf,

    /// 保存隐写结果图像的输出路径 (必须以 .bmp 结尾)。
    pub output: Option<PathBuf>,

    /// 嵌入到帧最前面的魔术标记；解码时必须提供相同的标记。
    #[arg(short, long, default_value = DEFAULT_MAGIC)]
    pub magic: String,

    /// 如果输出文件已存在则直接覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'decode' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct DecodeArgs {
    /// 包含隐藏数据的隐写图像路径 (必须以 .bmp 结尾)。
    pub stego: PathBuf,

    /// 恢复文件的输出基础名；恢复出的扩展名会附加在其后。
    pub output_base: Option<String>,

    /// 编码时使用的魔术标记；省略时将从标准输入交互式读取。
    #[arg(short, long)]
    pub magic: Option<String>,

    /// 如果输出文件已存在则直接覆盖。
    #[arg(short, long)]
    pub force: bool,
}
