//! Command parser: raw command string → function token + argument tail.
//!
//! Pure classification, no side effects. Two shapes exist:
//! * selector commands: the whole string is bracketed; it stays intact so
//!   selector payloads keep their internal spaces (`[find a b]`);
//! * everything else: split on the first *plain* space (escape context
//!   honored), so a quoted function token like `"a b"` survives as one
//!   piece.
//!
//! An empty argument tail normalizes to `None`; the engine treats `None`
//! and a missing tail identically.

use core_lex::{Escaping, field_and_rest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub function: String,
    pub arguments: Option<String>,
}

impl Command {
    /// Selector commands carry their whole selector expression in
    /// `function` and never have arguments.
    pub fn is_selector(&self) -> bool {
        self.arguments.is_none()
            && self.function.starts_with('[')
            && self.function.ends_with(']')
            && self.function.len() >= 2
    }
}

/// Parse one raw command.
pub fn parse(raw: &str) -> Command {
    if raw.len() >= 2 && raw.starts_with('[') && raw.ends_with(']') {
        return Command {
            function: raw.to_string(),
            arguments: None,
        };
    }
    let (function, rest) = field_and_rest(raw, b' ', Escaping::Respect, 0);
    Command {
        function: function.to_string(),
        arguments: (!rest.is_empty()).then(|| rest.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(function: &str, arguments: Option<&str>) -> Command {
        Command {
            function: function.to_string(),
            arguments: arguments.map(str::to_string),
        }
    }

    #[test]
    fn bare_function() {
        assert_eq!(parse("drow"), cmd("drow", None));
        assert!(!parse("drow").is_selector());
    }

    #[test]
    fn function_with_arguments() {
        assert_eq!(parse("set X"), cmd("set", Some("X")));
        assert_eq!(parse("swap [1,3]"), cmd("swap", Some("[1,3]")));
    }

    #[test]
    fn argument_tail_splits_only_once() {
        // everything after the first space belongs to the tail, verbatim
        assert_eq!(parse("set a b c"), cmd("set", Some("a b c")));
        assert_eq!(parse("set  X"), cmd("set", Some(" X")));
    }

    #[test]
    fn quoted_space_does_not_split() {
        assert_eq!(parse("set \"a b\""), cmd("set", Some("\"a b\"")));
        assert_eq!(parse("\"a b\" c"), cmd("\"a b\"", Some("c")));
    }

    #[test]
    fn selector_stays_whole() {
        let c = parse("[find needle with spaces]");
        assert_eq!(c, cmd("[find needle with spaces]", None));
        assert!(c.is_selector());
    }

    #[test]
    fn plain_selectors() {
        assert!(parse("[1,1]").is_selector());
        assert!(parse("[_,_]").is_selector());
        assert!(parse("[set]").is_selector());
        assert!(parse("[_]").is_selector());
    }

    #[test]
    fn unterminated_bracket_is_not_a_selector() {
        let c = parse("[find ab");
        assert_eq!(c, cmd("[find", Some("ab")));
        assert!(!c.is_selector());
    }

    #[test]
    fn empty_command() {
        assert_eq!(parse(""), cmd("", None));
    }

    #[test]
    fn trailing_space_normalizes_to_no_arguments() {
        assert_eq!(parse("drow "), cmd("drow", None));
    }
}
