pub fn encode_byte_to_lsb(value: u8, buf: &mut [u8; 8]) {
    for (i, byte) in buf.iter_mut().enumerate() {
        let bit = (value >> (7 - i)) & 1;
        *byte = (*byte & 0xFE) | bit;
    }
}

pub fn decode_lsb_to_byte(buf: &[u8; 8]) -> u8 {
    buf.iter().fold(0u8, |acc, &byte| (acc << 1) | (byte & 1))
}

pub fn encode_u32_to_lsb(value: u32, buf: &mut [u8; 32]) {
    for (i, byte) in buf.iter_mut().enumerate() {
        let bit = ((value >> (31 - i)) & 1) as u8;
        *byte = (*byte & 0xFE) | bit;
    }
}

pub fn decode_lsb_to_u32(buf: &[u8; 32]) -> u32 {
    buf.iter()
        .fold(0u32, |acc, &byte| (acc << 1) | u32::from(byte & 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_round_trip_for_all_values() {
        for value in 0..=u8::MAX {
            let mut buf = [0u8; 8];
            encode_byte_to_lsb(value, &mut buf);
            assert_eq!(decode_lsb_to_byte(&buf), value);
        }
    }

    #[test]
    fn byte_bits_are_placed_msb_first() {
        let mut buf = [0u8; 8];
        encode_byte_to_lsb(0b1000_0001, &mut buf);
        assert_eq!(buf, [1, 0, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn upper_bits_of_cover_bytes_are_untouched() {
        let mut buf = [0xAB; 8];
        encode_byte_to_lsb(0x00, &mut buf);
        assert_eq!(buf, [0xAA; 8]);

        let mut buf = [0x54; 8];
        encode_byte_to_lsb(0xFF, &mut buf);
        assert_eq!(buf, [0x55; 8]);
    }

    #[test]
    fn u32_round_trip() {
        for value in [0, 1, 0x1234_5678, 0x8000_0000, u32::MAX] {
            let mut buf = [0u8; 32];
            encode_u32_to_lsb(value, &mut buf);
            assert_eq!(decode_lsb_to_u32(&buf), value);
        }
    }

    #[test]
    fn u32_bits_are_placed_msb_first() {
        let mut buf = [0u8; 32];
        encode_u32_to_lsb(1 << 31, &mut buf);
        assert_eq!(buf[0], 1);
        assert!(buf[1..].iter().all(|&byte| byte == 0));
    }
}
