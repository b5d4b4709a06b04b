use rand::rngs::OsRng;
use rand::Rng;
use std::ops::BitOr;

use crate::types::Tools;

pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const DIGITS: &str = "0123456789";
pub const SYMBOLS: &str = "_+";

/// Set of character pools a random string is drawn from.
///
/// Pools combine with `|`, e.g. `Alphabet::LOWERCASE | Alphabet::DIGITS`.
/// There is no way to build an empty alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alphabet {
    lowercase: bool,
    uppercase: bool,
    digits: bool,
    symbols: bool,
}

impl Alphabet {
    pub const LOWERCASE: Alphabet = Alphabet::only(true, false, false, false);
    pub const UPPERCASE: Alphabet = Alphabet::only(false, true, false, false);
    pub const DIGITS: Alphabet = Alphabet::only(false, false, true, false);
    pub const SYMBOLS: Alphabet = Alphabet::only(false, false, false, true);
    pub const LETTERS: Alphabet = Alphabet::only(true, true, false, false);
    pub const ALPHANUMERIC: Alphabet = Alphabet::only(true, true, true, false);
    pub const ALL: Alphabet = Alphabet::only(true, true, true, true);

    const fn only(lowercase: bool, uppercase: bool, digits: bool, symbols: bool) -> Self {
        Self {
            lowercase,
            uppercase,
            digits,
            symbols,
        }
    }

    pub fn chars(&self) -> Vec<char> {
        let pools = [
            (self.lowercase, LOWERCASE),
            (self.uppercase, UPPERCASE),
            (self.digits, DIGITS),
            (self.symbols, SYMBOLS),
        ];
        pools
            .iter()
            .filter(|(enabled, _)| *enabled)
            .flat_map(|(_, pool)| pool.chars())
            .collect()
    }

    pub fn contains(&self, c: char) -> bool {
        (self.lowercase && LOWERCASE.contains(c))
            || (self.uppercase && UPPERCASE.contains(c))
            || (self.digits && DIGITS.contains(c))
            || (self.symbols && SYMBOLS.contains(c))
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Alphabet::ALL
    }
}

impl BitOr for Alphabet {
    type Output = Alphabet;

    fn bitor(self, rhs: Alphabet) -> Alphabet {
        Alphabet {
            lowercase: self.lowercase || rhs.lowercase,
            uppercase: self.uppercase || rhs.uppercase,
            digits: self.digits || rhs.digits,
            symbols: self.symbols || rhs.symbols,
        }
    }
}

/// Draws `n` characters from the default alphabet using the OS CSPRNG.
pub fn random_string(n: usize) -> String {
    random_string_from(n, Alphabet::default())
}

pub fn random_string_from(n: usize, alphabet: Alphabet) -> String {
    let pool = alphabet.chars();
    let mut rng = OsRng;
    (0..n).map(|_| pool[rng.gen_range(0..pool.len())]).collect()
}

impl Tools {
    pub fn random_string(&self, n: usize) -> String {
        random_string(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_random_string_length() {
        let tools = Tools::default();
        let s = tools.random_string(10);
        assert_eq!(s.chars().count(), 10);
    }

    #[test]
    fn test_random_string_zero() {
        assert_eq!(random_string(0), "");
    }

    #[test]
    fn test_default_alphabet_pools() {
        let chars = Alphabet::default().chars();
        assert_eq!(chars.len(), 26 + 26 + 10 + 2);
        assert!(chars.contains(&'x'));
        assert!(chars.contains(&'_'));
        assert!(chars.contains(&'+'));
    }

    #[test]
    fn test_alphabet_composition() {
        let alphabet = Alphabet::LOWERCASE | Alphabet::DIGITS;
        assert!(alphabet.contains('a'));
        assert!(alphabet.contains('7'));
        assert!(!alphabet.contains('A'));
        assert!(!alphabet.contains('_'));
        assert_eq!(Alphabet::LETTERS | Alphabet::DIGITS, Alphabet::ALPHANUMERIC);
    }

    #[test]
    fn test_digits_only() {
        let s = random_string_from(64, Alphabet::DIGITS);
        assert!(s.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_calls_do_not_repeat() {
        assert_ne!(random_string(32), random_string(32));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_length_and_alphabet(n in 0usize..256) {
            let s = random_string(n);
            prop_assert_eq!(s.chars().count(), n);
            prop_assert!(s.chars().all(|c| Alphabet::ALL.contains(c)));
        }

        #[test]
        fn prop_composed_alphabet_respected(n in 0usize..128, upper in any::<bool>()) {
            let alphabet = if upper {
                Alphabet::UPPERCASE | Alphabet::SYMBOLS
            } else {
                Alphabet::LOWERCASE
            };
            let s = random_string_from(n, alphabet);
            prop_assert!(s.chars().all(|c| alphabet.contains(c)));
        }
    }
}
