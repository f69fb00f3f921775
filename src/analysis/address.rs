use regex::Regex;

/// Base-58 alphabet (no `0`, `I`, `O`, `l`), 32 to 44 characters.
const ADDRESS_PATTERN: &str = "^[1-9A-HJ-NP-Za-km-z]{32,44}$";

/// Syntactic wallet address check. No checksum or on-chain lookup.
#[derive(Debug, Clone)]
pub struct AddressValidator {
    pattern: Regex,
}

impl Default for AddressValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressValidator {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(ADDRESS_PATTERN).expect("address pattern is a valid regex"),
        }
    }

    pub fn is_valid(&self, address: &str) -> bool {
        self.pattern.is_match(address)
    }
}
