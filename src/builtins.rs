//! The core rules of RFC 5234 Appendix B.1.
//!
//! These names are usable in every grammar without a definition. They are
//! bundled data, never discovered from a document.

/// A predefined terminal rule with its one-line description.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoreRule {
    pub name: &'static str,
    pub description: &'static str,
}

pub const CORE_RULES: [CoreRule; 16] = [
    core("ALPHA", "ASCII alphabetic characters (A-Z, a-z)"),
    core("BIT", "Binary digit (0 or 1)"),
    core("CHAR", "Any US-ASCII character (octets 0-127)"),
    core("CR", "Carriage return"),
    core("CRLF", "Internet standard newline (CRLF)"),
    core("CTL", "Control characters"),
    core("DIGIT", "Decimal digit (0-9)"),
    core("DQUOTE", "Double quote"),
    core("HEXDIG", "Hexadecimal digit (0-9, A-F, a-f)"),
    core("HTAB", "Horizontal tab"),
    core("LF", "Linefeed"),
    core("LWSP", "Linear white space (per RFC 7405)"),
    core("OCTET", "Any octet (8-bit data)"),
    core("SP", "Space"),
    core("VCHAR", "Visible (printing) characters"),
    core("WSP", "White space (SP or HTAB)"),
];

const fn core(name: &'static str, description: &'static str) -> CoreRule {
    CoreRule { name, description }
}

/// Look up a core rule by name, ignoring ASCII case.
pub fn core_rule(name: &str) -> Option<&'static CoreRule> {
    CORE_RULES
        .iter()
        .find(|rule| rule.name.eq_ignore_ascii_case(name))
}

pub fn is_core_rule(name: &str) -> bool {
    core_rule(name).is_some()
}
