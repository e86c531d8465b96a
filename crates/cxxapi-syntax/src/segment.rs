//! Type strings with embedded parameter lists.
//!
//! Callable types carry their parameter lists inline (`void(int x)`,
//! `std::function<R(Args...)>`, `void(*)(int)`). Splitting those lists out as
//! structured arguments lets qualification reach the types inside them.

use crate::argument::{format_arguments, parse_argument_list, Argument};
use crate::scanner::find_matching;
use regex::Regex;
use std::sync::LazyLock;

// `Class::*` / `Class::&` inside a declarator group.
static RE_MEMBER_DECLARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*\s*::\s*[*&]$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSegment {
    Text(String),
    Arguments(Vec<Argument>),
}

/// Split a type string into literal text and parsed argument lists.
///
/// ```text
/// "void(int x, float y)"                → [Text("void"), Arguments([..])]
/// "std::function<void(int x, float y)>" → [Text("std::function<void"), Arguments([..]), Text(">")]
/// "void(*)(int x, float y)"             → [Text("void(*)"), Arguments([..])]
/// "int"                                 → [Text("int")]
/// ```
pub fn parse_type_segments(ty: &str) -> Vec<TypeSegment> {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut pos = 0;

    while let Some(c) = ty[pos..].chars().next() {
        if c != '(' {
            text.push(c);
            pos += c.len_utf8();
            continue;
        }

        let Some(close) = find_matching(ty, pos) else {
            text.push(c);
            pos += 1;
            continue;
        };

        let group = &ty[pos..=close];
        let inner = ty[pos + 1..close].trim();

        if is_declarator_group(inner) {
            text.push_str(group);
        } else {
            let arguments = parse_argument_list(inner);
            if arguments.is_empty() {
                text.push_str(group);
            } else {
                if !text.is_empty() {
                    segments.push(TypeSegment::Text(std::mem::take(&mut text)));
                }
                segments.push(TypeSegment::Arguments(arguments));
            }
        }
        pos = close + 1;
    }

    if !text.is_empty() {
        segments.push(TypeSegment::Text(text));
    }
    segments
}

/// Inverse of [`parse_type_segments`].
pub fn format_type_segments(segments: &[TypeSegment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            TypeSegment::Text(text) => out.push_str(text),
            TypeSegment::Arguments(arguments) => {
                out.push('(');
                out.push_str(&format_arguments(arguments));
                out.push(')');
            }
        }
    }
    out
}

fn is_declarator_group(inner: &str) -> bool {
    inner == "*" || inner == "&" || RE_MEMBER_DECLARATOR.is_match(inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use TypeSegment::*;

    fn named(ty: &str, name: &str) -> Argument {
        Argument::new(None, ty, Some(name), None)
    }

    #[test]
    fn plain_type() {
        assert_eq!(parse_type_segments("int"), vec![Text("int".into())]);
        assert!(parse_type_segments("").is_empty());
    }

    #[test]
    fn bare_signature() {
        assert_eq!(
            parse_type_segments("void(int x, float y)"),
            vec![Text("void".into()), Arguments(vec![named("int", "x"), named("float", "y")])]
        );
    }

    #[test]
    fn std_function() {
        assert_eq!(
            parse_type_segments("std::function<void(int x, float y)>"),
            vec![
                Text("std::function<void".into()),
                Arguments(vec![named("int", "x"), named("float", "y")]),
                Text(">".into()),
            ]
        );
    }

    #[test]
    fn pointer_declarator_stays_literal() {
        assert_eq!(
            parse_type_segments("void(*)(int x, float y)"),
            vec![Text("void(*)".into()), Arguments(vec![named("int", "x"), named("float", "y")])]
        );
        assert_eq!(
            parse_type_segments("void(Widget::*)(int)"),
            vec![
                Text("void(Widget::*)".into()),
                Arguments(vec![Argument::new(None, "int", None, None)])
            ]
        );
    }

    #[test]
    fn member_reference_declarator_stays_literal() {
        assert_eq!(
            parse_type_segments("void(Widget::&)(float scale)"),
            vec![Text("void(Widget::&)".into()), Arguments(vec![named("float", "scale")])]
        );
        assert_eq!(
            parse_type_segments("int(Widget :: &)"),
            vec![Text("int(Widget :: &)".into())]
        );
        assert_eq!(
            parse_type_segments("void(&)(int x)"),
            vec![Text("void(&)".into()), Arguments(vec![named("int", "x")])]
        );
    }

    #[test]
    fn empty_parameter_list_stays_literal() {
        assert_eq!(
            parse_type_segments("std::function<void()>"),
            vec![Text("std::function<void()>".into())]
        );
    }

    #[test]
    fn unbalanced_paren_is_text() {
        assert_eq!(parse_type_segments("void(*"), vec![Text("void(*".into())]);
    }

    #[test]
    fn format_round_trip() {
        for ty in [
            "int",
            "void(*",
            "std::function<void(int x, float y)>",
            "std::function<Result(Param, int)>",
            "void(*)(const char* s)",
        ] {
            assert_eq!(format_type_segments(&parse_type_segments(ty)), ty);
        }
    }
}
