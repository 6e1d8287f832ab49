// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

/// Scheme prefix of a health certificate QR payload.
pub const HC1_PREFIX: &str = "HC1:";

/// Strip a leading `HC1:`; any other input passes through unchanged.
pub fn strip_hc1_prefix(text: &str) -> &str {
    text.strip_prefix(HC1_PREFIX).unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_only_the_exact_prefix() {
        assert_eq!(strip_hc1_prefix("HC1:6BF"), "6BF");
        assert_eq!(strip_hc1_prefix("6BF"), "6BF");
        assert_eq!(strip_hc1_prefix("hc1:6BF"), "hc1:6BF");
        assert_eq!(strip_hc1_prefix("HC1:HC1:X"), "HC1:X");
        assert_eq!(strip_hc1_prefix(""), "");
    }
}
