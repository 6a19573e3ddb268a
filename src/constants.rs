/// BMP 文件的标准头部大小 (字节)。
/// 头部永远不会被隐写修改：编码时原样复制到输出，解码时直接跳过。
pub const BMP_HEADER_SIZE: usize = 54;

/// BMP 头部中图像宽度字段的偏移量 (小端 4 字节)。
pub const WIDTH_OFFSET: usize = 18;

/// BMP 头部中图像高度字段的偏移量 (小端 4 字节)。
pub const HEIGHT_OFFSET: usize = 22;

/// 隐藏单个字节所需的载体字节数。
/// 每个载体字节的最低有效位只承载 1 bit，因此 8 bits 需要 8 个载体字节。
pub const BYTE_COVER_SIZE: usize = 8;

/// 隐藏一个 32 位长度字段所需的载体字节数 (32 bits × 1 载体字节/bit)。
pub const U32_COVER_SIZE: usize = 32;

/// 帧中每个长度字段本身占用的字节数 (u32)。
pub const LENGTH_FIELD_SIZE: usize = 4;

/// 默认的魔术标记。
/// 它被嵌入在帧的最前面，解码时用于确认图像确实包含隐藏数据。
pub const DEFAULT_MAGIC: &str = "#*";

/// 未指定输出路径时，编码使用的默认隐写图像文件名。
pub const DEFAULT_STEGO_NAME: &str = "stego_img.bmp";

/// 未指定输出基础名时，解码使用的默认基础名 (恢复出的扩展名会附加在其后)。
pub const DEFAULT_OUTPUT_BASE: &str = "output";
