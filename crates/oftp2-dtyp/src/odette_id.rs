//! ODETTE identifier construction (SPEC_FULL.md §6.3).

/// Builds an ODETTE identification code from its three bilateral-agreement
/// components: `O` + 4-digit international code + 14-char organization code
/// (space-padded/truncated) + 6-char sub-address (space-padded/truncated),
/// with trailing spaces trimmed from the final concatenation.
pub fn build_odette_id(international_code: u16, org_code: &str, sub_address: &str) -> String {
    let org = pad_or_truncate(org_code, 14);
    let sub = pad_or_truncate(sub_address, 6);
    let id = format!("O{international_code:04}{org}{sub}");
    id.trim_end_matches(' ').to_string()
}

fn pad_or_truncate(s: &str, width: usize) -> String {
    if s.len() >= width {
        s[..width].to_string()
    } else {
        let mut s = s.to_string();
        s.push_str(&" ".repeat(width - s.len()));
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_padded_id() {
        // Only trailing spaces from the sub-address padding are trimmed;
        // the organization code's own right-padding is interior and stays.
        let id = build_odette_id(21, "ACME", "MAIN");
        assert_eq!(id, "O0021ACME          MAIN");
    }

    #[test]
    fn trims_when_sub_address_is_blank() {
        let id = build_odette_id(21, "ACME", "");
        assert_eq!(id, "O0021ACME");
    }

    #[test]
    fn truncates_overlong_components() {
        let id = build_odette_id(1, "A VERY LONG ORGANIZATION NAME", "ABCDEFGH");
        assert_eq!(id.len(), 1 + 4 + 14 + 6);
    }
}
