//! # 容量分析模块
//!
//! 根据 BMP 头部中的宽高字段计算载体图像的像素数据容量，
//! 并在写入任何字节之前验证其是否足以容纳完整的数据帧。

use crate::constants::{
    BMP_HEADER_SIZE, BYTE_COVER_SIZE, HEIGHT_OFFSET, LENGTH_FIELD_SIZE, WIDTH_OFFSET,
};
use crate::error::StegError;

fn le_u32_at(header: &[u8; BMP_HEADER_SIZE], offset: usize) -> u32 {
    u32::from_le_bytes([
        header[offset],
        header[offset + 1],
        header[offset + 2],
        header[offset + 3],
    ])
}

/// 计算载体图像的像素数据字节数 (宽 × 高 × 3)。
///
/// 假定输入是 24 位、无压缩、无行填充的 BMP，宽高分别存储在
/// 头部偏移 18 和 22 处的小端 4 字节字段中。这是一个刻意的简化，
/// 不是完整的 BMP 解析器。
pub fn pixel_data_size(header: &[u8; BMP_HEADER_SIZE]) -> u64 {
    let width = u64::from(le_u32_at(header, WIDTH_OFFSET));
    let height = u64::from(le_u32_at(header, HEIGHT_OFFSET));
    width * height * 3
}

/// 计算嵌入完整数据帧所需的载体字节数。
///
/// 帧布局为 `MAGIC | EXT_LEN:u32 | EXT | DATA_LEN:u32 | DATA`，
/// 每个负载字节占用 8 个载体字节。
pub fn required_carrier_bytes(magic_len: usize, extn_len: usize, secret_size: u64) -> u64 {
    let frame_bytes =
        magic_len as u64 + extn_len as u64 + secret_size + 2 * LENGTH_FIELD_SIZE as u64;
    frame_bytes * BYTE_COVER_SIZE as u64
}

/// 验证载体容量是否足够，不足时返回 [`StegError::Capacity`]。
///
/// 此检查必须在编码管线写入任何字节之前运行。
pub fn check_capacity(
    header: &[u8; BMP_HEADER_SIZE],
    magic_len: usize,
    extn_len: usize,
    secret_size: u64,
) -> Result<(), StegError> {
    let available = pixel_data_size(header);
    let required = required_carrier_bytes(magic_len, extn_len, secret_size);

    if available >= required {
        Ok(())
    } else {
        Err(StegError::Capacity {
            required,
            available,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_for(width: u32, height: u32) -> [u8; BMP_HEADER_SIZE] {
        let mut header = [0u8; BMP_HEADER_SIZE];
        header[WIDTH_OFFSET..WIDTH_OFFSET + 4].copy_from_slice(&width.to_le_bytes());
        header[HEIGHT_OFFSET..HEIGHT_OFFSET + 4].copy_from_slice(&height.to_le_bytes());
        header
    }

    #[test]
    fn pixel_data_size_reads_width_and_height_fields() {
        assert_eq!(pixel_data_size(&header_for(100, 50)), 100 * 50 * 3);
        assert_eq!(pixel_data_size(&header_for(0, 50)), 0);
    }

    #[test]
    fn required_bytes_cover_the_whole_frame() {
        // MAGIC "#*" (2) + EXT_LEN (4) + ".txt" (4) + DATA_LEN (4) + "abcd" (4)
        assert_eq!(required_carrier_bytes(2, 4, 4), (2 + 4 + 4 + 4 + 4) * 8);
    }

    #[test]
    fn exact_capacity_passes() {
        // 1 × 48 × 3 = 144 像素字节，恰好等于所需的 144 个载体字节
        let header = header_for(1, 48);
        assert_eq!(pixel_data_size(&header), 144);
        assert!(check_capacity(&header, 2, 4, 4).is_ok());
    }

    #[test]
    fn short_capacity_fails() {
        // 141 像素字节，比所需的 144 少
        let header = header_for(1, 47);
        let err = check_capacity(&header, 2, 4, 4).unwrap_err();
        assert!(matches!(
            err,
            StegError::Capacity {
                required: 144,
                available: 141,
            }
        ));
    }

    #[test]
    fn tiny_carrier_rejects_even_an_empty_secret() {
        // 2×2 载体只有 12 个像素字节，连空负载的帧头都装不下
        let err = check_capacity(&header_for(2, 2), 2, 4, 0).unwrap_err();
        assert!(matches!(err, StegError::Capacity { .. }));
    }
}
