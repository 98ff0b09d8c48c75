use super::*;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn test_new_buffer() {
    let buffer = GapBuffer::new();
    assert!(buffer.is_empty());
    assert_eq!(buffer.len(), 0);
    assert_eq!(buffer.line_count(), 1);
}

#[test]
fn test_from_str() {
    let buffer = GapBuffer::from_str("hello\nworld");
    assert_eq!(buffer.len(), 11);
    assert_eq!(buffer.line_count(), 2);
    assert_eq!(buffer.to_string(), "hello\nworld");
}

#[test]
fn test_from_chars_seeds_line_count() {
    let buffer = GapBuffer::from_chars("a\nb\nc".chars().collect());
    assert_eq!(buffer.len(), 5);
    assert_eq!(buffer.line_count(), 3);
    assert_eq!(buffer.to_string(), "a\nb\nc");
}

#[test]
fn test_insert_at_start_middle_end() {
    let mut buffer = GapBuffer::from_str("bd");
    buffer.insert(0, "a");
    assert_eq!(buffer.to_string(), "abd");
    buffer.insert(2, "c");
    assert_eq!(buffer.to_string(), "abcd");
    buffer.insert(4, "e");
    assert_eq!(buffer.to_string(), "abcde");
    assert_eq!(buffer.len(), 5);
}

#[test]
fn test_insert_updates_line_count() {
    let mut buffer = GapBuffer::new();
    buffer.insert(0, "one\ntwo");
    assert_eq!(buffer.line_count(), 2);
    buffer.insert(3, "\nmore\n");
    assert_eq!(buffer.line_count(), 4);
}

#[test]
fn test_insert_larger_than_gap_grows() {
    let mut buffer = GapBuffer::new();
    let long = "x".repeat(1000);
    buffer.insert(0, &long);
    assert_eq!(buffer.len(), 1000);
    assert_eq!(buffer.to_string(), long);
}

#[test]
fn test_repeated_local_inserts() {
    // Typing pattern: every insert lands where the gap already is.
    let mut buffer = GapBuffer::new();
    for (i, c) in "abcdefghij".chars().enumerate() {
        buffer.insert(i, &c.to_string());
    }
    assert_eq!(buffer.to_string(), "abcdefghij");
}

#[test]
fn test_append() {
    let mut buffer = GapBuffer::from_str("ab");
    buffer.append("cd");
    assert_eq!(buffer.to_string(), "abcd");
}

#[test]
fn test_delete_range() {
    let mut buffer = GapBuffer::from_str("hello world");
    buffer.delete(5, 11);
    assert_eq!(buffer.to_string(), "hello");
    assert_eq!(buffer.len(), 5);
}

#[test]
fn test_delete_updates_line_count() {
    let mut buffer = GapBuffer::from_str("a\nb\nc");
    assert_eq!(buffer.line_count(), 3);
    buffer.delete(1, 2); // the first newline
    assert_eq!(buffer.line_count(), 2);
    assert_eq!(buffer.to_string(), "ab\nc");
}

#[test]
fn test_delete_far_from_gap() {
    let mut buffer = GapBuffer::from_str("0123456789");
    // Gap sits at the end after from_str; delete at the front forces a
    // gap shift left.
    buffer.delete(0, 3);
    assert_eq!(buffer.to_string(), "3456789");
    // And shift right again.
    buffer.insert(7, "X");
    buffer.delete(5, 7);
    assert_eq!(buffer.to_string(), "34567X");
}

#[test]
fn test_delete_empty_range() {
    let mut buffer = GapBuffer::from_str("abc");
    buffer.delete(1, 1);
    assert_eq!(buffer.to_string(), "abc");
    assert_eq!(buffer.line_count(), 1);
}

#[test]
fn test_replace() {
    let mut buffer = GapBuffer::from_str("hello world");
    buffer.replace(6, 11, "rust");
    assert_eq!(buffer.to_string(), "hello rust");
}

#[test]
fn test_replace_across_lines() {
    let mut buffer = GapBuffer::from_str("one\ntwo\nthree");
    buffer.replace(4, 7, "2");
    assert_eq!(buffer.to_string(), "one\n2\nthree");
    assert_eq!(buffer.line_count(), 3);
}

#[test]
fn test_char_at() {
    let mut buffer = GapBuffer::from_str("abcde");
    assert_eq!(buffer.char_at(0), 'a');
    assert_eq!(buffer.char_at(4), 'e');
    // Unchanged after the gap moves.
    buffer.insert(2, "");
    buffer.delete(2, 2);
    assert_eq!(buffer.char_at(2), 'c');
}

#[test]
fn test_substring_spanning_gap() {
    let mut buffer = GapBuffer::from_str("hello world");
    // Park the gap in the middle.
    buffer.insert(5, "X");
    buffer.delete(5, 6);
    assert_eq!(buffer.substring(3, 8), "lo wo");
}

#[test]
fn test_substring_clamps_end() {
    let buffer = GapBuffer::from_str("abc");
    assert_eq!(buffer.substring(1, 100), "bc");
    assert_eq!(buffer.substring(0, 3), "abc");
    assert_eq!(buffer.substring(2, 2), "");
}

#[test]
fn test_line_start_offset() {
    let buffer = GapBuffer::from_str("ab\ncde\nf");
    assert_eq!(buffer.line_start_offset(1).unwrap(), 0);
    assert_eq!(buffer.line_start_offset(2).unwrap(), 3);
    assert_eq!(buffer.line_start_offset(3).unwrap(), 7);
}

#[test]
fn test_line_start_offset_backward_from_warm_cache() {
    let buffer = GapBuffer::from_str("a\nb\nc\nd\ne");
    // Warm the cache near the bottom, then resolve a slightly earlier line:
    // the cached pair is nearer than the origin, so the backward scan runs.
    assert_eq!(buffer.line_start_offset(5).unwrap(), 8);
    assert_eq!(buffer.line_start_offset(4).unwrap(), 6);
    assert_eq!(buffer.line_start_offset(1).unwrap(), 0);
}

#[test]
fn test_line_start_offset_invalid_line() {
    let buffer = GapBuffer::from_str("ab\ncd");
    let err = buffer.line_start_offset(0).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidLine);
    let err = buffer.line_start_offset(3).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidLine);
    assert!(err.contains_msg("line 3"));
}

#[test]
fn test_line_start_offset_first_line_always_zero() {
    let mut buffer = GapBuffer::from_str("x\ny\nz");
    assert_eq!(buffer.line_start_offset(1).unwrap(), 0);
    buffer.insert(0, "w");
    assert_eq!(buffer.line_start_offset(1).unwrap(), 0);
    buffer.delete(0, 3);
    assert_eq!(buffer.line_start_offset(1).unwrap(), 0);
}

#[test]
fn test_line_length() {
    let buffer = GapBuffer::from_str("ab\ncde\n\nf");
    assert_eq!(buffer.line_length(1), 2);
    assert_eq!(buffer.line_length(2), 3);
    assert_eq!(buffer.line_length(3), 0); // empty line
    assert_eq!(buffer.line_length(4), 1);
    // Nonexistent lines report zero length.
    assert_eq!(buffer.line_length(5), 0);
    assert_eq!(buffer.line_length(0), 0);
}

#[test]
fn test_line_length_stops_at_end_marker() {
    let buffer = GapBuffer::from_str("ab\u{FFFF}");
    assert_eq!(buffer.line_length(1), 2);
}

#[test]
fn test_line_text() {
    let buffer = GapBuffer::from_str("ab\ncde\nf");
    assert_eq!(buffer.line_text(1).unwrap(), "ab");
    assert_eq!(buffer.line_text(2).unwrap(), "cde");
    assert_eq!(buffer.line_text(3).unwrap(), "f");
    assert!(buffer.line_text(4).is_err());
}

#[test]
fn test_line_of() {
    let buffer = GapBuffer::from_str("ab\ncde\nf");
    assert_eq!(buffer.line_of(0), 1);
    assert_eq!(buffer.line_of(2), 1); // the newline belongs to line 1
    assert_eq!(buffer.line_of(3), 2);
    assert_eq!(buffer.line_of(6), 2);
    assert_eq!(buffer.line_of(7), 3);
}

#[test]
fn test_line_of_backward_from_warm_cache() {
    let buffer = GapBuffer::from_str("a\nb\nc\nd\ne");
    // Resolve near the end first so the cache points past the next query.
    assert_eq!(buffer.line_of(8), 5);
    assert_eq!(buffer.line_of(6), 4);
    assert_eq!(buffer.line_of(2), 2);
    assert_eq!(buffer.line_of(0), 1);
}

#[test]
fn test_line_queries_consistent_any_cache_state() {
    let buffer = GapBuffer::from_str("aa\nbbb\n\ncccc\nd");
    let len = buffer.len();

    // Probe offsets in a scattered order so every query runs against a
    // differently warmed cache; the line/offset relation must hold
    // regardless.
    for &offset in &[5, 0, 7, 13, 3, 12, 8, 2, 6, 1, 10] {
        assert!(offset < len);
        let line = buffer.line_of(offset);
        assert_ne!(line, 0, "line_of failed for valid offset {offset}");

        let start = buffer.line_start_offset(line).unwrap();
        assert!(start <= offset);
        let next_start = if line < buffer.line_count() {
            buffer.line_start_offset(line + 1).unwrap()
        } else {
            len
        };
        assert!(offset < next_start);
    }
}

#[test]
fn test_length_and_line_count_bookkeeping() {
    let mut buffer = GapBuffer::new();
    buffer.insert(0, "one\ntwo\nthree");
    assert_eq!(buffer.len(), 13);
    assert_eq!(buffer.line_count(), 3);

    buffer.delete(3, 8); // "\ntwo\n"
    assert_eq!(buffer.len(), 8);
    assert_eq!(buffer.line_count(), 1);

    buffer.insert(8, "\n");
    assert_eq!(buffer.len(), 9);
    assert_eq!(buffer.line_count(), 2);

    // Line count is always newlines + 1.
    let newlines = buffer.to_string().matches('\n').count();
    assert_eq!(buffer.line_count(), newlines + 1);
}

#[test]
fn test_random_edits_match_reference_model() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut buffer = GapBuffer::new();
    let mut model: Vec<char> = Vec::new();
    let alphabet = ['a', 'b', 'c', '\n', 'x'];

    for _ in 0..500 {
        if model.is_empty() || rng.gen_bool(0.6) {
            let offset = rng.gen_range(0..=model.len());
            let length = rng.gen_range(1..=5);
            let text: String = (0..length)
                .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
                .collect();
            buffer.insert(offset, &text);
            model.splice(offset..offset, text.chars());
        } else {
            let start = rng.gen_range(0..model.len());
            let end = rng.gen_range(start..=model.len());
            buffer.delete(start, end);
            model.drain(start..end);
        }

        assert_eq!(buffer.len(), model.len());
        let expected: String = model.iter().collect();
        assert_eq!(buffer.to_string(), expected);
        let newlines = model.iter().filter(|&&c| c == '\n').count();
        assert_eq!(buffer.line_count(), newlines + 1);
    }
}

#[test]
fn test_scenario_insert_delete_lines() {
    let mut buffer = GapBuffer::new();
    buffer.insert(0, "ab\ncd");
    assert_eq!(buffer.line_count(), 2);
    assert_eq!(buffer.line_text(1).unwrap(), "ab");
    assert_eq!(buffer.line_text(2).unwrap(), "cd");

    buffer.delete(1, 3); // "b\n"
    assert_eq!(buffer.to_string(), "acd");
    assert_eq!(buffer.line_count(), 1);
}

#[test]
fn test_display() {
    let buffer = GapBuffer::from_str("show me");
    assert_eq!(format!("{}", buffer), "show me");
}
