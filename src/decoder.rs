//! # 解码管线模块
//!
//! [`DecodingSession`] 持有隐写图像的读取流，按固定顺序从像素字节的
//! 最低有效位中恢复数据帧：魔术标记、扩展名长度、扩展名、负载长度、负载。
//! 输出文件在扩展名恢复成功之后才会被创建。

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::codec::{decode_lsb_to_byte, decode_lsb_to_u32};
use crate::constants::{BMP_HEADER_SIZE, BYTE_COVER_SIZE, U32_COVER_SIZE};
use crate::error::StegError;

fn extract_byte<R: Read>(stego: &mut R) -> Result<u8, StegError> {
    let mut cover = [0u8; BYTE_COVER_SIZE];
    stego
        .read_exact(&mut cover)
        .map_err(StegError::TruncatedStream)?;
    Ok(decode_lsb_to_byte(&cover))
}

fn extract_u32<R: Read>(stego: &mut R) -> Result<u32, StegError> {
    let mut cover = [0u8; U32_COVER_SIZE];
    stego
        .read_exact(&mut cover)
        .map_err(StegError::TruncatedStream)?;
    Ok(decode_lsb_to_u32(&cover))
}

/// 一次解码调用的会话状态。
///
/// 持有隐写图像的读取流、恢复出的扩展名及其长度、恢复出的负载大小，
/// 以及在扩展名已知后才打开的输出文件句柄。
pub struct DecodingSession {
    stego: BufReader<File>,
    output_base: String,
    extension: String,
    extn_size: u32,
    data_size: u32,
    output: Option<BufWriter<File>>,
}

impl DecodingSession {
    /// 打开隐写图像并跳过 54 字节的 BMP 头部。
    pub fn open(stego_path: &Path, output_base: &str) -> Result<Self, StegError> {
        let file = File::open(stego_path).map_err(|source| StegError::FileOpen {
            path: stego_path.to_path_buf(),
            source,
        })?;

        let mut stego = BufReader::new(file);
        let mut header = [0u8; BMP_HEADER_SIZE];
        stego
            .read_exact(&mut header)
            .map_err(StegError::TruncatedStream)?;

        Ok(Self {
            stego,
            output_base: output_base.to_owned(),
            extension: String::new(),
            extn_size: 0,
            data_size: 0,
            output: None,
        })
    }

    /// 解码魔术标记并与调用者提供的标记比对。
    /// 这是协议中唯一的完整性校验。
    pub fn decode_magic(&mut self, magic: &str) -> Result<(), StegError> {
        let mut decoded = Vec::with_capacity(magic.len());
        for _ in 0..magic.len() {
            decoded.push(extract_byte(&mut self.stego)?);
        }

        if decoded != magic.as_bytes() {
            return Err(StegError::MagicMismatch {
                expected: magic.to_owned(),
                decoded: String::from_utf8_lossy(&decoded).into_owned(),
            });
        }
        Ok(())
    }

    /// 解码扩展名的字节长度。
    pub fn decode_extension_size(&mut self) -> Result<(), StegError> {
        self.extn_size = extract_u32(&mut self.stego)?;
        Ok(())
    }

    /// 逐字节解码扩展名。
    ///
    /// 长度字段来自不可信的图像数据，因此不据此预分配缓冲区；
    /// 含路径分隔符的扩展名会被拒绝，不会拼入输出文件名。
    pub fn decode_extension(&mut self) -> Result<(), StegError> {
        let mut bytes = Vec::new();
        for _ in 0..self.extn_size {
            bytes.push(extract_byte(&mut self.stego)?);
        }

        let extension = String::from_utf8(bytes)?;
        if extension.contains(['/', '\\']) {
            return Err(StegError::UnsafeExtension { extension });
        }
        self.extension = extension;
        Ok(())
    }

    /// 由输出基础名和恢复出的扩展名推导输出路径并打开输出文件。
    ///
    /// 基础名的文件名部分中已有的扩展名会先被剥除，再附加恢复出的
    /// 扩展名。`force` 为假时拒绝覆盖已存在的文件。
    pub fn open_output(&mut self, force: bool) -> Result<PathBuf, StegError> {
        let path =
            Path::new(&self.output_base).with_extension(self.extension.trim_start_matches('.'));

        let file = if force {
            File::create(&path)
        } else {
            File::create_new(&path)
        }
        .map_err(|source| StegError::FileOpen {
            path: path.clone(),
            source,
        })?;

        self.output = Some(BufWriter::new(file));
        Ok(path)
    }

    /// 解码负载的字节大小。
    pub fn decode_data_size(&mut self) -> Result<(), StegError> {
        self.data_size = extract_u32(&mut self.stego)?;
        Ok(())
    }

    /// 逐字节解码负载并立即流式写入输出文件，最后冲刷输出流。
    pub fn decode_data(&mut self) -> Result<(), StegError> {
        let Some(output) = self.output.as_mut() else {
            return Err(StegError::OutputWrite(io::Error::new(
                io::ErrorKind::NotConnected,
                "the output file has not been opened",
            )));
        };

        for _ in 0..self.data_size {
            let byte = extract_byte(&mut self.stego)?;
            output.write_all(&[byte]).map_err(StegError::OutputWrite)?;
        }
        output.flush().map_err(StegError::OutputWrite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{encode_byte_to_lsb, encode_u32_to_lsb};
    use std::io::Cursor;

    #[test]
    fn extract_byte_inverts_embedding() {
        let mut cover = [0x7Eu8; 8];
        encode_byte_to_lsb(0x3C, &mut cover);
        let mut stego = Cursor::new(cover.to_vec());

        assert_eq!(extract_byte(&mut stego).unwrap(), 0x3C);
        assert_eq!(stego.position(), 8);
    }

    #[test]
    fn extract_u32_inverts_embedding() {
        let mut cover = [0xFFu8; 32];
        encode_u32_to_lsb(0xDEAD_BEEF, &mut cover);
        let mut stego = Cursor::new(cover.to_vec());

        assert_eq!(extract_u32(&mut stego).unwrap(), 0xDEAD_BEEF);
    }

    #[test]
    fn extract_fails_when_the_stream_ends_mid_field() {
        let mut stego = Cursor::new(vec![0u8; 31]);
        let err = extract_u32(&mut stego).unwrap_err();
        assert!(matches!(err, StegError::TruncatedStream(_)));
    }
}
