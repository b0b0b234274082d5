//! ISBN-10 / ISBN-13 checksum validation

/// Check whether `candidate` is a well-formed ISBN-10 or ISBN-13.
///
/// Hyphens are ignored. After stripping them the candidate must be exactly
/// 10 or 13 characters long; any other length is rejected outright.
///
/// - ISBN-10: the first nine characters are digits weighted 1..=9, the check
///   character (weight 10) is a digit or `X` (worth 10). Valid when the
///   weighted sum is divisible by 11.
/// - ISBN-13: all thirteen characters are digits weighted alternately 1 and 3,
///   starting with 1. Valid when the weighted sum is divisible by 10.
pub fn is_valid_isbn(candidate: &str) -> bool {
    let isbn: Vec<char> = candidate.chars().filter(|c| *c != '-').collect();

    match isbn.len() {
        10 => is_valid_isbn10(&isbn),
        13 => is_valid_isbn13(&isbn),
        _ => false,
    }
}

fn is_valid_isbn10(isbn: &[char]) -> bool {
    let mut sum = 0u32;
    for (i, c) in isbn[..9].iter().enumerate() {
        match c.to_digit(10) {
            Some(digit) => sum += (i as u32 + 1) * digit,
            None => return false,
        }
    }

    let check = match isbn[9] {
        'X' => 10,
        c => match c.to_digit(10) {
            Some(digit) => digit,
            None => return false,
        },
    };
    sum += 10 * check;

    sum % 11 == 0
}

fn is_valid_isbn13(isbn: &[char]) -> bool {
    let mut sum = 0u32;
    for (i, c) in isbn.iter().enumerate() {
        let Some(digit) = c.to_digit(10) else {
            return false;
        };
        sum += if i % 2 == 0 { digit } else { digit * 3 };
    }
    sum % 10 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isbn10_with_x_check_character() {
        assert!(is_valid_isbn("156881111X"));
        assert!(is_valid_isbn("1-56881-111-X"));
    }

    #[test]
    fn test_isbn10_checksum_mismatch() {
        assert!(!is_valid_isbn("1234567890"));
    }

    #[test]
    fn test_isbn10_letter_in_weighted_region() {
        assert!(!is_valid_isbn("1234567A89"));
    }

    #[test]
    fn test_isbn10_lowercase_x_is_rejected() {
        assert!(!is_valid_isbn("156881111x"));
    }

    #[test]
    fn test_isbn10_digit_check_character() {
        // 0-306-40615-2
        assert!(is_valid_isbn("0306406152"));
        assert!(is_valid_isbn("0-306-40615-2"));
    }

    #[test]
    fn test_isbn13_valid() {
        assert!(is_valid_isbn("9783161484100"));
        assert!(is_valid_isbn("978-3-16-148410-0"));
    }

    #[test]
    fn test_isbn13_invalid() {
        assert!(!is_valid_isbn("1234567A89123"));
        assert!(!is_valid_isbn("9783161484101"));
        // X is never a valid ISBN-13 character
        assert!(!is_valid_isbn("978316148410X"));
    }

    #[test]
    fn test_other_lengths_are_rejected() {
        for candidate in [
            "",
            "123456789",
            "12345678901",
            "123456789012",
            "12345678901234",
            "978-3-16-14841-00-0",
            "---",
        ] {
            assert!(!is_valid_isbn(candidate), "{candidate:?} should be invalid");
        }
    }

    #[test]
    fn test_hyphens_do_not_count_towards_length() {
        // 11 raw characters, 10 after stripping the hyphen
        assert!(is_valid_isbn("15688-1111X"));
        // 12 characters after stripping, digits only: still rejected
        assert!(!is_valid_isbn("9783-16148410"));
    }

    #[test]
    fn test_non_ascii_digits_are_rejected() {
        assert!(!is_valid_isbn("١٥٦٨٨١١١١X"));
    }
}
