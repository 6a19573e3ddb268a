//! # 编码管线模块
//!
//! [`EncodingSession`] 持有一次编码调用涉及的三个文件流，
//! 并按固定顺序暴露各个管线阶段。各阶段严格顺序消耗载体字节，
//! 任何阶段失败都会使整个管线中止，已写入的字节不回滚。

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::capacity;
use crate::codec::{encode_byte_to_lsb, encode_u32_to_lsb};
use crate::constants::{BMP_HEADER_SIZE, BYTE_COVER_SIZE, U32_COVER_SIZE};
use crate::error::StegError;

fn open_error(path: &Path, source: io::Error) -> StegError {
    StegError::FileOpen {
        path: path.to_path_buf(),
        source,
    }
}

fn embed_byte<R: Read, W: Write>(
    carrier: &mut R,
    output: &mut W,
    value: u8,
) -> Result<(), StegError> {
    let mut cover = [0u8; BYTE_COVER_SIZE];
    carrier
        .read_exact(&mut cover)
        .map_err(StegError::TruncatedStream)?;
    encode_byte_to_lsb(value, &mut cover);
    output.write_all(&cover).map_err(StegError::OutputWrite)
}

fn embed_u32<R: Read, W: Write>(
    carrier: &mut R,
    output: &mut W,
    value: u32,
) -> Result<(), StegError> {
    let mut cover = [0u8; U32_COVER_SIZE];
    carrier
        .read_exact(&mut cover)
        .map_err(StegError::TruncatedStream)?;
    encode_u32_to_lsb(value, &mut cover);
    output.write_all(&cover).map_err(StegError::OutputWrite)
}

/// 一次编码调用的会话状态。
///
/// 持有载体 (读)、秘密文件 (读)、隐写图像 (写) 三个流句柄，
/// 以及秘密文件的扩展名 (含前导点) 和在打开时测量一次、
/// 之后所有阶段复用的秘密文件大小。
pub struct EncodingSession {
    carrier: BufReader<File>,
    secret: BufReader<File>,
    output: BufWriter<File>,
    header: [u8; BMP_HEADER_SIZE],
    extension: String,
    secret_size: u64,
}

impl EncodingSession {
    /// 打开全部三个文件并缓存载体的 54 字节头部。
    ///
    /// 秘密文件的大小在这里测量一次，容量检查和数据编码阶段
    /// 使用的是同一个值。`force` 为假时拒绝覆盖已存在的输出文件。
    pub fn open(
        carrier_path: &Path,
        secret_path: &Path,
        output_path: &Path,
        extension: String,
        force: bool,
    ) -> Result<Self, StegError> {
        let carrier_file =
            File::open(carrier_path).map_err(|source| open_error(carrier_path, source))?;
        let secret_file =
            File::open(secret_path).map_err(|source| open_error(secret_path, source))?;
        let secret_size = secret_file
            .metadata()
            .map_err(|source| open_error(secret_path, source))?
            .len();

        // DATA_LEN 是帧中固定的 32 位字段
        if secret_size > u64::from(u32::MAX) {
            return Err(StegError::SecretTooLarge { size: secret_size });
        }

        let output_file = if force {
            File::create(output_path)
        } else {
            File::create_new(output_path)
        }
        .map_err(|source| open_error(output_path, source))?;

        let mut carrier = BufReader::new(carrier_file);
        let mut header = [0u8; BMP_HEADER_SIZE];
        carrier
            .read_exact(&mut header)
            .map_err(StegError::TruncatedStream)?;

        Ok(Self {
            carrier,
            secret: BufReader::new(secret_file),
            output: BufWriter::new(output_file),
            header,
            extension,
            secret_size,
        })
    }

    /// 验证载体的像素数据是否容得下完整的数据帧。
    /// 必须在任何写入阶段之前调用。
    pub fn check_capacity(&self, magic: &str) -> Result<(), StegError> {
        capacity::check_capacity(
            &self.header,
            magic.len(),
            self.extension.len(),
            self.secret_size,
        )
    }

    /// 将 54 字节头部原样写入输出。
    pub fn copy_header(&mut self) -> Result<(), StegError> {
        self.output
            .write_all(&self.header)
            .map_err(StegError::OutputWrite)
    }

    /// 逐字符嵌入魔术标记。
    pub fn encode_magic(&mut self, magic: &str) -> Result<(), StegError> {
        for &byte in magic.as_bytes() {
            embed_byte(&mut self.carrier, &mut self.output, byte)?;
        }
        Ok(())
    }

    /// 嵌入扩展名的字节长度 (含前导点)。
    pub fn encode_extension_size(&mut self) -> Result<(), StegError> {
        embed_u32(
            &mut self.carrier,
            &mut self.output,
            self.extension.len() as u32,
        )
    }

    /// 逐字符嵌入扩展名。
    pub fn encode_extension(&mut self) -> Result<(), StegError> {
        for &byte in self.extension.as_bytes() {
            embed_byte(&mut self.carrier, &mut self.output, byte)?;
        }
        Ok(())
    }

    /// 嵌入秘密文件的总字节大小。
    pub fn encode_data_size(&mut self) -> Result<(), StegError> {
        embed_u32(&mut self.carrier, &mut self.output, self.secret_size as u32)
    }

    /// 逐字节流式嵌入秘密文件内容：每个秘密字节消耗 8 个新的载体字节。
    pub fn encode_data(&mut self) -> Result<(), StegError> {
        let mut secret_byte = [0u8; 1];
        for _ in 0..self.secret_size {
            self.secret
                .read_exact(&mut secret_byte)
                .map_err(StegError::TruncatedStream)?;
            embed_byte(&mut self.carrier, &mut self.output, secret_byte[0])?;
        }
        Ok(())
    }

    /// 将载体中剩余的全部字节原样复制到输出，并冲刷输出流。
    pub fn copy_tail(&mut self) -> Result<(), StegError> {
        io::copy(&mut self.carrier, &mut self.output).map_err(StegError::OutputWrite)?;
        self.output.flush().map_err(StegError::OutputWrite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode_lsb_to_byte;
    use std::io::Cursor;

    #[test]
    fn embed_byte_consumes_exactly_eight_carrier_bytes() {
        let mut carrier = Cursor::new(vec![0xF0u8; 10]);
        let mut output = Vec::new();

        embed_byte(&mut carrier, &mut output, 0xA5).unwrap();

        assert_eq!(carrier.position(), 8);
        assert_eq!(output.len(), 8);
        let cover: [u8; 8] = output.try_into().unwrap();
        assert_eq!(decode_lsb_to_byte(&cover), 0xA5);
        assert!(cover.iter().all(|&byte| byte & 0xFE == 0xF0));
    }

    #[test]
    fn embed_byte_fails_on_a_short_carrier() {
        let mut carrier = Cursor::new(vec![0u8; 5]);
        let mut output = Vec::new();

        let err = embed_byte(&mut carrier, &mut output, 0x42).unwrap_err();
        assert!(matches!(err, StegError::TruncatedStream(_)));
    }
}
