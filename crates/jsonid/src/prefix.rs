//! Fixed-length prefix derivation from config labels.

/// Character used to right-pad labels shorter than the prefix length.
pub const FILLER: char = '#';

/// Derive a fixed-length uppercase prefix from `label`: truncated when
/// longer than `prefix_length`, right-padded with [`FILLER`] when
/// shorter. A zero length yields an empty prefix.
#[must_use]
pub fn derive_prefix(label: &str, prefix_length: usize) -> String {
    let mut prefix = String::with_capacity(prefix_length);
    let mut taken = 0usize;
    'label: for ch in label.chars() {
        // `char::to_uppercase` may expand to several characters; the
        // fixed length bounds the expansion too.
        for upper in ch.to_uppercase() {
            if taken == prefix_length {
                break 'label;
            }
            prefix.push(upper);
            taken += 1;
        }
    }
    for _ in taken..prefix_length {
        prefix.push(FILLER);
    }
    prefix
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_long_labels() {
        assert_eq!(derive_prefix("weapons", 5), "WEAPO");
        assert_eq!(derive_prefix("weapons", 7), "WEAPONS");
    }

    #[test]
    fn pads_short_labels_with_filler() {
        assert_eq!(derive_prefix("ab", 5), "AB###");
        assert_eq!(derive_prefix("", 3), "###");
    }

    #[test]
    fn zero_length_yields_empty_prefix() {
        assert_eq!(derive_prefix("weapons", 0), "");
    }

    #[test]
    fn always_returns_exactly_prefix_length_chars() {
        for label in ["", "a", "ab", "abcde", "abcdefgh", "caf\u{e9}s", "stra\u{df}e"] {
            for len in 0..8 {
                assert_eq!(derive_prefix(label, len).chars().count(), len, "{label:?}/{len}");
            }
        }
    }
}
