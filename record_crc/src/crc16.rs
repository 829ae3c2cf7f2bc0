//! CRC-16/BUYPASS: polynomial `0x8005`, initial value `0`, no reflection,
//! no final xor.

/// Generator polynomial, MSB-first.
pub const POLYNOMIAL: u16 = 0x8005;

/// CRC of the ASCII bytes `"123456789"`.
pub const CHECK: u16 = 0xFEE8;

static TABLE: [u16; 256] = generate_table();

const fn generate_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    let mut i = 0;

    while i < 256 {
        let mut crc = (i as u16) << 8;
        let mut j = 0;

        while j < 8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ POLYNOMIAL;
            } else {
                crc <<= 1;
            }
            j += 1;
        }

        table[i] = crc;
        i += 1;
    }

    table
}

/// Continues a running CRC over `data`.
#[inline]
pub fn update(mut crc: u16, data: &[u8]) -> u16 {
    for &byte in data {
        let idx = ((crc >> 8) ^ u16::from(byte)) & 0xFF;
        crc = (crc << 8) ^ TABLE[idx as usize];
    }
    crc
}

#[inline]
pub fn crc16(data: &[u8]) -> u16 {
    update(0, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_value() {
        assert_eq!(crc16(b"123456789"), CHECK);
    }

    #[test]
    fn empty_input_is_zero() {
        assert_eq!(crc16(&[]), 0);
    }

    #[test]
    fn table_matches_bitwise() {
        fn bitwise(data: &[u8]) -> u16 {
            let mut crc = 0u16;
            for &byte in data {
                crc ^= u16::from(byte) << 8;
                for _ in 0..8 {
                    crc = if crc & 0x8000 != 0 {
                        (crc << 1) ^ POLYNOMIAL
                    } else {
                        crc << 1
                    };
                }
            }
            crc
        }

        let data: Vec<u8> = (0..=255).collect();
        assert_eq!(crc16(&data), bitwise(&data));
        assert_eq!(TABLE[1], POLYNOMIAL);
    }

    #[test]
    fn incremental_equals_one_shot() {
        let whole = crc16(b"hello, world");
        let split = update(update(0, b"hello, "), b"world");
        assert_eq!(whole, split);
    }
}
