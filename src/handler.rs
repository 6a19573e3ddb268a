//! # 命令处理逻辑模块
//!
//! 包含驱动 `encode` 和 `decode` 两条管线的高级业务逻辑。
//! 本模块负责输入参数校验、按固定顺序调度各管线阶段、
//! 向用户报告每个阶段的进度以及最终结果。

use crate::cli::{DecodeArgs, EncodeArgs};
use crate::constants::{DEFAULT_OUTPUT_BASE, DEFAULT_STEGO_NAME};
use crate::decoder::DecodingSession;
use crate::encoder::EncodingSession;
use anyhow::{Context, Result};
use colored::Colorize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// 校验路径是否以 .bmp 扩展名结尾。
fn ensure_bmp(path: &Path, role: &str) -> Result<()> {
    anyhow::ensure!(
        path.extension().is_some_and(|extn| extn == "bmp"),
        "The {} file must have a .bmp extension: {}",
        role,
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

/// 从秘密文件名中推导要嵌入的扩展名 (最后一个 '.' 到末尾，含点)。
///
/// 文件名中没有 '.' 属于致命的输入错误，在管线启动之前就会被拒绝。
fn secret_extension(path: &Path) -> Result<String> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| {
            format!(
                "Invalid secret file name: {}",
                path.to_string_lossy().red().bold()
            )
        })?;

    let dot = name.rfind('.').with_context(|| {
        format!(
            "The secret file name {} contains no '.'; unable to derive an extension to embed.",
            name.red().bold()
        )
    })?;

    Ok(name[dot..].to_owned())
}

/// 交互式地从标准输入读取魔术标记。
fn prompt_magic() -> Result<String> {
    print!("Enter the magic string used at encode time: ");
    io::stdout().flush().context("Unable to flush stdout")?;

    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Unable to read the magic string from standard input")?;
    Ok(line.trim().to_owned())
}

/// 处理 'encode' 命令的执行逻辑。
///
/// 负责校验输入参数、打开会话、执行容量检查，然后按帧布局的固定顺序
/// 依次运行各编码阶段：复制头部、嵌入魔术标记、扩展名长度、扩展名、
/// 负载长度、负载，最后原样复制载体的剩余字节。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径与魔术标记的 `EncodeArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 载体或输出路径不以 .bmp 结尾，或秘密文件名中没有 '.'。
/// * 任一文件无法打开，或输出文件已存在且未指定 `--force`。
/// * 载体的像素数据容量不足以容纳完整的数据帧。
/// * 任一编码阶段在读取载体或写入输出时失败。
pub fn handle_encode(args: EncodeArgs) -> Result<()> {
    ensure_bmp(&args.carrier, "carrier")?;
    anyhow::ensure!(!args.magic.is_empty(), "The magic marker must not be empty.");
    let extension = secret_extension(&args.secret)?;

    let output = match args.output {
        Some(path) => {
            ensure_bmp(&path, "output")?;
            path
        }
        None => {
            println!(
                "No stego image file provided. Using default: {}",
                DEFAULT_STEGO_NAME.green().bold()
            );
            PathBuf::from(DEFAULT_STEGO_NAME)
        }
    };

    println!("INFO: ## Encoding Procedure Started ##");

    let mut session = EncodingSession::open(
        &args.carrier,
        &args.secret,
        &output,
        extension,
        args.force,
    )
    .with_context(|| {
        "Unable to open the files required for encoding. \
         If the output file already exists, pass --force to overwrite it."
    })?;
    println!("INFO: Opening required files");
    println!("INFO: Opened {}", args.carrier.to_string_lossy());
    println!("INFO: Opened {}", args.secret.to_string_lossy());
    println!("INFO: Opened {}", output.to_string_lossy());
    println!("INFO: Done");

    session.check_capacity(&args.magic).with_context(|| {
        format!(
            "The carrier image {} is too small to hold {}.",
            args.carrier.to_string_lossy().red().bold(),
            args.secret.to_string_lossy().red().bold()
        )
    })?;
    println!(
        "INFO: Checking for {} capacity to handle {}",
        args.carrier.to_string_lossy(),
        args.secret.to_string_lossy()
    );
    println!("INFO: Done. Found OK");

    session
        .copy_header()
        .context("Failed to copy the BMP header to the stego image.")?;
    println!("INFO: Copying Image Header");
    println!("INFO: Done");

    session
        .encode_magic(&args.magic)
        .context("Failed to encode the magic string signature.")?;
    println!("INFO: Encoding Magic String Signature");
    println!("INFO: Done");

    session
        .encode_extension_size()
        .context("Failed to encode the secret file extension size.")?;
    println!("INFO: Encoding Secret File Extension Size");
    println!("INFO: Done");

    session
        .encode_extension()
        .context("Failed to encode the secret file extension.")?;
    println!("INFO: Encoding Secret File Extension");
    println!("INFO: Done");

    session
        .encode_data_size()
        .context("Failed to encode the secret file size.")?;
    println!("INFO: Encoding Secret File Size");
    println!("INFO: Done");

    session
        .encode_data()
        .context("Failed to encode the secret file data.")?;
    println!("INFO: Encoding Secret File Data");
    println!("INFO: Done");

    session
        .copy_tail()
        .context("Failed to copy the remaining image data.")?;
    println!("INFO: Copying Left Over Data");
    println!("INFO: Done");

    println!("INFO: ## Encoding Done Successfully ##");
    println!(
        "The secret file has been successfully hidden and saved: {}",
        output.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'decode' 命令的执行逻辑。
///
/// 负责打开隐写图像并跳过头部、校验魔术标记、恢复扩展名并推导输出
/// 文件名，然后将负载逐字节流式写入输出文件。
///
/// # Arguments
///
/// * `args` - 包含隐写图像路径与输出基础名的 `DecodeArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 隐写图像路径不以 .bmp 结尾，或文件无法打开。
/// * 解码出的魔术标记与提供的标记不一致。
/// * 数据帧尚未读完，图像字节流就已结束。
/// * 输出文件无法创建 (已存在且未指定 `--force`)，或写入失败。
pub fn handle_decode(args: DecodeArgs) -> Result<()> {
    ensure_bmp(&args.stego, "stego")?;

    let magic = match args.magic {
        Some(magic) => magic,
        None => prompt_magic()?,
    };
    anyhow::ensure!(!magic.is_empty(), "The magic marker must not be empty.");

    let output_base = args
        .output_base
        .unwrap_or_else(|| DEFAULT_OUTPUT_BASE.to_owned());

    println!("INFO: ## Decoding Procedure Started ##");

    let mut session = DecodingSession::open(&args.stego, &output_base).with_context(|| {
        format!(
            "Unable to open the stego image: {}",
            args.stego.to_string_lossy().red().bold()
        )
    })?;
    println!("INFO: Opening required files");
    println!("INFO: Opened {}", args.stego.to_string_lossy());

    session.decode_magic(&magic).with_context(|| {
        format!(
            "The image {} may not contain hidden data, or the supplied magic marker is wrong.",
            args.stego.to_string_lossy().red().bold()
        )
    })?;
    println!("INFO: Decoding Magic String Signature");
    println!("INFO: Done");

    session
        .decode_extension_size()
        .context("Failed to decode the secret file extension size.")?;
    println!("INFO: Decoding Secret File Extension Size");
    println!("INFO: Done");

    session
        .decode_extension()
        .context("Failed to decode the secret file extension.")?;
    println!("INFO: Decoding Secret File Extension");
    println!("INFO: Done");

    let output_path = session.open_output(args.force).with_context(|| {
        "Unable to create the output file. \
         If it already exists, pass --force to overwrite it."
    })?;
    println!("INFO: Opened {}", output_path.to_string_lossy());

    session
        .decode_data_size()
        .context("Failed to decode the secret file size.")?;
    println!("INFO: Decoding Secret File Size");
    println!("INFO: Done");

    session
        .decode_data()
        .context("Failed to decode the secret file data.")?;
    println!("INFO: Decoding Secret File Data");
    println!("INFO: Done");

    println!("INFO: ## Decoding Done Successfully ##");
    println!(
        "The secret file has been successfully recovered and saved: {}",
        output_path.to_string_lossy().green().bold()
    );

    Ok(())
}
