use bit_span::{BitOrder, BitSpanError, copy_bits, invert_bits, new_buffer, sub_bits, to_bit_string};

fn main() -> Result<(), BitSpanError> {
    println!("=== Bit Span Examples ===\n");

    example_split_field()?;
    example_inverted_flags()?;

    Ok(())
}

fn example_split_field() -> Result<(), BitSpanError> {
    println!("Example 1: a 10-bit value stored as two pieces (6 + 4 bits)");

    let value = [0b0000_0010u8, 0b1101_0110]; // 0x2D6, right-aligned
    let mut record = new_buffer(32);

    // first 6 value bits at offset 2, remaining 4 bits at offset 20
    copy_bits(BitOrder::Msb0, &value, 6, &mut record, 2, 6)?;
    copy_bits(BitOrder::Msb0, &value, 12, &mut record, 20, 4)?;
    println!("  record bits: {}", to_bit_string(BitOrder::Msb0, &record, 0, 32)?);

    let mut joined = new_buffer(10);
    copy_bits(BitOrder::Msb0, &record, 2, &mut joined, 6, 6)?;
    copy_bits(BitOrder::Msb0, &record, 20, &mut joined, 12, 4)?;
    println!("  reassembled: {:02X?}", joined);
    println!();

    Ok(())
}

fn example_inverted_flags() -> Result<(), BitSpanError> {
    println!("Example 2: active-low flags");

    let mut raw = [0b1111_1010u8];
    invert_bits(BitOrder::Lsb0, &mut raw, 0, 4)?;
    println!("  logical flags: {:08b}", sub_bits(BitOrder::Lsb0, &raw, 0, 4)?[0]);
    println!();

    Ok(())
}
