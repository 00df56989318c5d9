//! The character-walk predicate deciding whether a filename is the next (or
//! a previous) instance of a `#`-templated name, and if so, which index it
//! holds or would hold next.
//!
//! Operates on bytes, not `char`s: restart filenames are expected to be
//! plain ASCII, so byte-level comparison is both correct and cheaper than
//! decoding UTF-8 for every character.

fn byte_at(s: &[u8], idx: usize) -> u8 {
    s.get(idx).copied().unwrap_or(0)
}

/// Returns `errval` on a usage error (template and name identical, or the
/// numeric run overflows), `0` when `name` does not match `tmpl`'s pattern,
/// or one past the index `name` encodes (i.e. the index `name` would hold
/// after being renamed forward by one slot).
pub fn nextindex(tmpl: &str, name: &str, errval: i64) -> i64 {
    let tmpl = tmpl.as_bytes();
    let name = name.as_bytes();

    // Advance both until the first hash or a mismatch is encountered.
    let mut i = 0usize;
    while i < tmpl.len() && i < name.len() && tmpl[i] == name[i] {
        i += 1;
    }
    if i == tmpl.len() {
        return errval; // tmpl exhausted with no distinguishing '#': usage error.
    }
    if tmpl[i] != b'#' {
        return 0; // Mismatch.
    }
    if i >= name.len() || !name[i].is_ascii_digit() {
        return 0; // Mismatch, or a leading sign where a digit was required.
    }

    // Advance template to its end, remembering the position of the final '#'.
    let mut j = i;
    let mut k = i + 1;
    while k < tmpl.len() {
        if tmpl[k] == b'#' {
            j = k;
        }
        k += 1;
    }

    // Advance name to its end.
    let mut l = i + 1;
    while l < name.len() {
        l += 1;
    }

    // Scan both backwards until the final '#' is encountered.
    while k > j && l > i && byte_at(tmpl, k) == byte_at(name, l) {
        k -= 1;
        l -= 1;
    }
    if byte_at(tmpl, k) != b'#' {
        return 0; // Mismatch.
    }

    // Attempt to read a decimal unsigned integer from name[i..=l].
    let mut endptr = i;
    while endptr < name.len() && name[endptr].is_ascii_digit() {
        endptr += 1;
    }
    if endptr != l + 1 {
        return 0; // Mismatch: the digit run doesn't land exactly on l.
    }
    let digits = std::str::from_utf8(&name[i..endptr]).expect("ascii digits are valid utf8");
    let curr: u64 = match digits.parse() {
        Ok(v) => v,
        Err(_) => return errval, // Overflow.
    };
    if curr > (i32::MAX as u64) - 1 {
        return errval; // Overflow.
    }

    // Sanity check that the template contained only a single hash sequence.
    let mut i = i;
    while i != j {
        if tmpl[i] != b'#' {
            return errval; // Usage error.
        }
        i += 1;
    }

    (curr + 1) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_and_advances_index() {
        assert_eq!(nextindex("restart#.h5", "restart0.h5", -1), 1);
        assert_eq!(nextindex("restart#.h5", "restart9.h5", -1), 10);
    }

    #[test]
    fn zero_padded_multi_hash_template_matches() {
        assert_eq!(nextindex("restart##.h5", "restart07.h5", -1), 8);
    }

    #[test]
    fn mismatched_prefix_or_suffix_is_zero() {
        assert_eq!(nextindex("restart#.h5", "checkpoint0.h5", -1), 0);
        assert_eq!(nextindex("restart#.h5", "restart0.dat", -1), 0);
    }

    #[test]
    fn non_digit_after_hash_position_is_zero() {
        assert_eq!(nextindex("restart#.h5", "restartX.h5", -1), 0);
    }

    #[test]
    fn name_identical_to_template_is_usage_error() {
        assert_eq!(nextindex("restart#.h5", "restart#.h5", -7), -7);
    }

    #[test]
    fn overflowing_index_reports_errval() {
        assert_eq!(nextindex("restart#.h5", "restart99999999999999999999.h5", -1), -1);
    }
}
