//! Regional prefix codes for Indian registration plates.
//!
//! The scorer takes the *first* code in [`STATE_CODES`] that is a literal
//! prefix of the candidate, never the longest one. Reordering entries changes
//! scores.

/// A registration prefix code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateCode {
    /// Prefix as printed on the plate.
    pub code: &'static str,
    /// State, territory or series the code belongs to.
    pub region: &'static str,
    /// Frequently seen in the fleet; earns the common-code bonus.
    pub common: bool,
}

const fn code(code: &'static str, region: &'static str, common: bool) -> StateCode {
    StateCode { code, region, common }
}

/// Prefix codes in matching priority order.
pub static STATE_CODES: &[StateCode] = &[
    // Major states
    code("DL", "Delhi", true),
    code("UP", "Uttar Pradesh", true),
    code("KA", "Karnataka", true),
    code("MH", "Maharashtra", false),
    code("TN", "Tamil Nadu", false),
    code("GJ", "Gujarat", false),
    code("RJ", "Rajasthan", false),
    code("MP", "Madhya Pradesh", false),
    code("WB", "West Bengal", false),
    code("AP", "Andhra Pradesh", false),
    code("TG", "Telangana", false),
    code("OR", "Odisha", false),
    code("KL", "Kerala", false),
    code("AS", "Assam", false),
    code("BR", "Bihar", false),
    code("HR", "Haryana", false),
    code("HP", "Himachal Pradesh", false),
    code("JH", "Jharkhand", false),
    code("UK", "Uttarakhand", false),
    code("PB", "Punjab", false),
    // Union territories and special codes
    code("NCR", "National Capital Region", true),
    code("CH", "Chandigarh", false),
    code("GA", "Goa", false),
    code("MN", "Manipur", false),
    code("ML", "Meghalaya", false),
    code("MZ", "Mizoram", false),
    code("NL", "Nagaland", false),
    code("SK", "Sikkim", false),
    code("TR", "Tripura", false),
    code("AR", "Arunachal Pradesh", false),
    code("JK", "Jammu and Kashmir", false),
    code("LA", "Ladakh", false),
    code("LD", "Lakshadweep", false),
    code("PY", "Puducherry", false),
    code("AN", "Andaman and Nicobar Islands", false),
    code("DN", "Dadra and Nagar Haveli", false),
    code("DD", "Daman and Diu", false),
    code("BH", "Bharat series", false),
    code("CG", "Chhattisgarh", false),
];

/// First code in priority order that `text` starts with.
pub fn match_prefix(text: &str) -> Option<&'static StateCode> {
    STATE_CODES.iter().find(|c| text.starts_with(c.code))
}

/// Look up a code by its exact spelling.
pub fn lookup(code: &str) -> Option<&'static StateCode> {
    STATE_CODES.iter().find(|c| c.code == code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_prefix_first_wins() {
        assert_eq!(match_prefix("DL01AB1234").map(|c| c.code), Some("DL"));
        assert_eq!(match_prefix("NCRBD00012").map(|c| c.code), Some("NCR"));
        assert!(match_prefix("XY123456").is_none());
    }

    #[test]
    fn test_common_codes() {
        let common: Vec<_> = STATE_CODES
            .iter()
            .filter(|c| c.common)
            .map(|c| c.code)
            .collect();
        assert_eq!(common, vec!["DL", "UP", "KA", "NCR"]);
    }

    #[test]
    fn test_codes_are_unique() {
        for (i, a) in STATE_CODES.iter().enumerate() {
            for b in &STATE_CODES[i + 1..] {
                assert_ne!(a.code, b.code);
            }
        }
        assert_eq!(lookup("CG").map(|c| c.region), Some("Chhattisgarh"));
    }
}
