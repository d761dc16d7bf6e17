//! Hex formatting helpers for page dumps and offsets.

use std::fmt::Write;

const BYTES_PER_LINE: usize = 16;

/// Format a byte offset as "decimal (0xhex)".
pub fn format_offset(offset: u64) -> String {
    format!("{} (0x{:x})", offset, offset)
}

/// Format a u32 value as zero-padded hex with a 0x prefix.
pub fn format_hex32(value: u32) -> String {
    format!("0x{:08x}", value)
}

/// Render `data` as a classic hex dump, labelling lines from `base_offset`.
///
/// ```text
/// 00000800  02 01 56 43 00 00 00 00  00 00 00 00 00 00 00 00  |..VC............|
/// ```
pub fn hex_dump(data: &[u8], base_offset: u64) -> String {
    let mut out = String::with_capacity(data.len() / BYTES_PER_LINE * 80 + 80);

    for (line_no, chunk) in data.chunks(BYTES_PER_LINE).enumerate() {
        if line_no > 0 {
            out.push('\n');
        }
        let offset = base_offset + (line_no * BYTES_PER_LINE) as u64;
        let _ = write!(out, "{:08x}  ", offset);

        for col in 0..BYTES_PER_LINE {
            if col == BYTES_PER_LINE / 2 {
                out.push(' ');
            }
            match chunk.get(col) {
                Some(b) => {
                    let _ = write!(out, "{:02x} ", b);
                }
                None => out.push_str("   "),
            }
        }

        out.push_str(" |");
        out.extend(chunk.iter().map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '.'
            }
        }));
        out.extend(std::iter::repeat(' ').take(BYTES_PER_LINE - chunk.len()));
        out.push('|');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_offset() {
        assert_eq!(format_offset(4096), "4096 (0x1000)");
        assert_eq!(format_hex32(0x6b39dac7), "0x6b39dac7");
    }

    #[test]
    fn test_hex_dump_full_line() {
        let data: Vec<u8> = (0..16).collect();
        let output = hex_dump(&data, 0);
        assert_eq!(
            output,
            "00000000  00 01 02 03 04 05 06 07  08 09 0a 0b 0c 0d 0e 0f  |................|"
        );
    }

    #[test]
    fn test_hex_dump_partial_line_is_padded() {
        let output = hex_dump(b"Standard", 0x800);
        assert!(output.starts_with("00000800  53 74 61 6e 64 61 72 64"));
        assert!(output.ends_with("|Standard        |"));
        assert_eq!(output.len(), hex_dump(&[0u8; 16], 0).len());
    }

    #[test]
    fn test_hex_dump_multiple_lines() {
        let output = hex_dump(&[0u8; 40], 0x1000);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("00001010"));
        assert!(lines[2].starts_with("00001020"));
    }

    #[test]
    fn test_hex_dump_empty() {
        assert_eq!(hex_dump(&[], 0), "");
    }
}
