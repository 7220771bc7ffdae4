//! Luhn checksum validation for card-shaped digit runs.

/// Shortest digit run accepted as a card number.
pub const MIN_CARD_DIGITS: usize = 13;

/// Longest digit run accepted as a card number.
pub const MAX_CARD_DIGITS: usize = 19;

/// Validate a raw match, ignoring spaces and hyphens.
///
/// Any other non-digit character makes the token invalid.
pub fn luhn_valid_token(raw: &str) -> bool {
    let digits: String = raw.chars().filter(|c| *c != ' ' && *c != '-').collect();
    luhn_valid(&digits)
}

/// Validate a stripped digit string with the mod-10 checksum.
pub fn luhn_valid(number: &str) -> bool {
    let len = number.len();
    if !(MIN_CARD_DIGITS..=MAX_CARD_DIGITS).contains(&len) {
        return false;
    }

    let mut sum = 0u32;
    let mut double = false;
    for byte in number.bytes().rev() {
        if !byte.is_ascii_digit() {
            return false;
        }
        let mut digit = u32::from(byte - b'0');
        if double {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
        double = !double;
    }

    sum % 10 == 0
}
