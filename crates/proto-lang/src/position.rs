//
// position.rs
//
// Conversion between byte offsets and LSP (line, UTF-16 column) positions
//

use tower_lsp::lsp_types::Position;

/// Convert a UTF-16 column offset (from LSP Position.character) to a byte
/// offset within the given line. Columns past the end clamp to the line length.
pub fn utf16_column_to_byte_offset(line: &str, utf16_col: u32) -> usize {
    let mut utf16_count = 0;
    for (byte_idx, ch) in line.char_indices() {
        if utf16_count >= utf16_col as usize {
            return byte_idx;
        }
        utf16_count += ch.len_utf16();
    }
    line.len()
}

/// Largest char boundary not greater than `offset`, clamped to the text.
pub fn snap_to_char_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Map a byte offset to a zero-based (line, UTF-16 column) position.
///
/// `line` is the number of `\n` characters before `offset`; `character` is the
/// UTF-16 length of the text between the start of that line and `offset`.
pub fn offset_to_position(text: &str, offset: usize) -> Position {
    let offset = snap_to_char_boundary(text, offset);
    let before = &text[..offset];

    let line = before.bytes().filter(|b| *b == b'\n').count();
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let character: usize = before[line_start..].chars().map(char::len_utf16).sum();

    Position::new(line as u32, character as u32)
}

/// Map a zero-based (line, UTF-16 column) position back to a byte offset.
///
/// Lines past the end of the document clamp to the document end; columns past
/// the end of a line clamp to the end of that line (before its `\n`).
pub fn position_to_offset(text: &str, position: Position) -> usize {
    let mut line_start = 0;
    for _ in 0..position.line {
        match text[line_start..].find('\n') {
            Some(i) => line_start += i + 1,
            None => return text.len(),
        }
    }

    let line_end = text[line_start..]
        .find('\n')
        .map(|i| line_start + i)
        .unwrap_or(text.len());

    line_start + utf16_column_to_byte_offset(&text[line_start..line_end], position.character)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_to_position_first_line() {
        let text = "syntax = \"proto3\";";
        assert_eq!(offset_to_position(text, 0), Position::new(0, 0));
        assert_eq!(offset_to_position(text, 6), Position::new(0, 6));
    }

    #[test]
    fn test_offset_to_position_counts_newlines() {
        let text = "a\nbc\ndef";
        assert_eq!(offset_to_position(text, 2), Position::new(1, 0));
        assert_eq!(offset_to_position(text, 4), Position::new(1, 2));
        assert_eq!(offset_to_position(text, 7), Position::new(2, 2));
    }

    #[test]
    fn test_offset_past_end_clamps() {
        let text = "ab\ncd";
        assert_eq!(offset_to_position(text, 100), Position::new(1, 2));
    }

    #[test]
    fn test_utf16_columns() {
        // 'é' is 2 bytes in UTF-8, 1 UTF-16 unit; '😀' is 4 bytes, 2 units
        let text = "é😀x";
        assert_eq!(offset_to_position(text, 2), Position::new(0, 1));
        assert_eq!(offset_to_position(text, 6), Position::new(0, 3));
        assert_eq!(position_to_offset(text, Position::new(0, 3)), 6);
    }

    #[test]
    fn test_non_boundary_offset_snaps_back() {
        let text = "é";
        assert_eq!(offset_to_position(text, 1), Position::new(0, 0));
    }

    #[test]
    fn test_position_to_offset() {
        let text = "a\nbc\ndef";
        assert_eq!(position_to_offset(text, Position::new(0, 0)), 0);
        assert_eq!(position_to_offset(text, Position::new(1, 1)), 3);
        assert_eq!(position_to_offset(text, Position::new(2, 3)), 8);
    }

    #[test]
    fn test_position_to_offset_clamps() {
        let text = "ab\ncd";
        assert_eq!(position_to_offset(text, Position::new(0, 10)), 2);
        assert_eq!(position_to_offset(text, Position::new(9, 0)), 5);
    }

    #[test]
    fn test_round_trip_multiline() {
        let text = "message A {\n  int32 x = 1;\n}\n";
        for offset in 0..=text.len() {
            let pos = offset_to_position(text, offset);
            assert_eq!(position_to_offset(text, pos), offset, "offset {}", offset);
        }
    }
}
