//! Declarator parsing: `(arg, arg, ...) modifiers`.

use crate::argument::{format_arguments, parse_argument_list, Argument};
use crate::error::DeclaratorError;
use crate::scanner::{find_matching, top_level};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static RE_TRAILING_ASSIGN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"=\s*(0|default|delete)\s*$").unwrap());

static RE_NOEXCEPT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bnoexcept\b").unwrap());

/// Trailing function modifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionModifiers {
    pub is_const: bool,
    pub is_override: bool,
    pub is_final: bool,
    pub is_noexcept: bool,
    pub noexcept_expr: Option<String>,
    pub is_pure_virtual: bool,
    pub is_default: bool,
    pub is_delete: bool,
}

impl FunctionModifiers {
    /// Parse the text after the closing parenthesis of a parameter list.
    ///
    /// Handles `const`, `override`, `final` in any order, `noexcept`,
    /// `noexcept(expr)` and a trailing `= 0`, `= default` or `= delete`.
    /// A trailing return type (`-> const T&`) contributes no modifiers; only
    /// `override` and `final` may follow it.
    pub fn parse(tail: &str) -> Self {
        let mut modifiers = Self::default();
        let mut rest = tail.trim().to_string();

        if let Some(caps) = RE_TRAILING_ASSIGN.captures(&rest) {
            match &caps[1] {
                "0" => modifiers.is_pure_virtual = true,
                "default" => modifiers.is_default = true,
                _ => modifiers.is_delete = true,
            }
            let start = caps.get(0).map_or(rest.len(), |m| m.start());
            rest = rest[..start].trim().to_string();
        }

        let mut virt_specifiers = String::new();
        if let Some(arrow) = find_arrow(&rest) {
            virt_specifiers = rest[arrow + 2..].to_string();
            rest.truncate(arrow);
        }

        if let Some(keyword) = RE_NOEXCEPT.find(&rest) {
            modifiers.is_noexcept = true;
            let mut end = keyword.end();
            let after = &rest[end..];
            let open = end + (after.len() - after.trim_start().len());
            if rest[open..].starts_with('(') {
                if let Some(close) = find_matching(&rest, open) {
                    let expr = rest[open + 1..close].trim();
                    if !expr.is_empty() {
                        modifiers.noexcept_expr = Some(expr.to_string());
                    }
                    end = close + 1;
                }
            }
            rest = format!("{} {}", &rest[..keyword.start()], &rest[end..]);
        }

        for token in rest.split_whitespace() {
            match token {
                "const" => modifiers.is_const = true,
                "override" => modifiers.is_override = true,
                "final" => modifiers.is_final = true,
                _ => {}
            }
        }
        for token in virt_specifiers.split_whitespace() {
            match token {
                "override" => modifiers.is_override = true,
                "final" => modifiers.is_final = true,
                _ => {}
            }
        }

        modifiers
    }
}

/// Byte index of the first `->` outside parentheses.
fn find_arrow(text: &str) -> Option<usize> {
    top_level(text)
        .find(|&(idx, c, at_top)| c == '-' && at_top && text[idx + 1..].starts_with('>'))
        .map(|(idx, _, _)| idx)
}

impl fmt::Display for FunctionModifiers {
    /// Canonical trailing form, each part preceded by a space.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_const {
            f.write_str(" const")?;
        }
        if self.is_noexcept {
            match &self.noexcept_expr {
                Some(expr) => write!(f, " noexcept({})", expr)?,
                None => f.write_str(" noexcept")?,
            }
        }
        if self.is_override {
            f.write_str(" override")?;
        }
        if self.is_final {
            f.write_str(" final")?;
        }
        if self.is_pure_virtual {
            f.write_str(" = 0")?;
        } else if self.is_default {
            f.write_str(" = default")?;
        } else if self.is_delete {
            f.write_str(" = delete")?;
        }
        Ok(())
    }
}

/// A parsed parameter list plus its trailing modifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declarator {
    pub arguments: Vec<Argument>,
    pub modifiers: FunctionModifiers,
}

impl fmt::Display for Declarator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}){}", format_arguments(&self.arguments), self.modifiers)
    }
}

/// Parse `"(type1 arg1, type2 arg2 = default) modifiers"`.
pub fn parse_declarator(text: &str) -> Result<Declarator, DeclaratorError> {
    let text = text.trim();
    if !text.starts_with('(') {
        return Err(DeclaratorError::MissingOpenParen(text.to_string()));
    }
    let close = find_matching(text, 0).ok_or_else(|| DeclaratorError::Unbalanced(text.to_string()))?;

    Ok(Declarator {
        arguments: parse_argument_list(&text[1..close]),
        modifiers: FunctionModifiers::parse(&text[close + 1..]),
    })
}

/// Parse the generator's function-pointer argstring form `")(args...)"`.
///
/// The leading `)` closes a declarator opened in the type text (`"void(*"`).
/// Any other shape yields no arguments.
pub fn parse_function_pointer_argstring(argstring: &str) -> Vec<Argument> {
    match argstring.strip_prefix(')') {
        Some(inner) if inner.starts_with('(') => parse_declarator(inner)
            .map(|declarator| declarator.arguments)
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Declarator {
        parse_declarator(text).unwrap()
    }

    fn arg(ty: &str, name: Option<&str>) -> Argument {
        Argument::new(None, ty, name, None)
    }

    #[test]
    fn empty_list() {
        let d = parse("()");
        assert!(d.arguments.is_empty());
        assert_eq!(d.modifiers, FunctionModifiers::default());
    }

    #[test]
    fn two_simple_arguments() {
        let d = parse("(int x, float y)");
        assert_eq!(d.arguments, vec![arg("int", Some("x")), arg("float", Some("y"))]);
        assert_eq!(d.modifiers, FunctionModifiers::default());
    }

    #[test]
    fn void_argument() {
        assert_eq!(parse("(void)").arguments, vec![arg("void", None)]);
    }

    #[test]
    fn const_override() {
        let d = parse("() const override");
        assert!(d.arguments.is_empty());
        assert_eq!(
            d.modifiers,
            FunctionModifiers {
                is_const: true,
                is_override: true,
                ..Default::default()
            }
        );
    }

    #[test]
    fn modifier_order_does_not_matter() {
        assert_eq!(parse("() override const").modifiers, parse("() const override").modifiers);
        let m = parse("() const override final").modifiers;
        assert!(m.is_const && m.is_override && m.is_final);
    }

    #[test]
    fn noexcept_forms() {
        let m = parse("() noexcept").modifiers;
        assert!(m.is_noexcept);
        assert_eq!(m.noexcept_expr, None);

        let m = parse("() noexcept(false)").modifiers;
        assert_eq!(m.noexcept_expr.as_deref(), Some("false"));

        let m = parse("() const noexcept").modifiers;
        assert!(m.is_const && m.is_noexcept);
    }

    #[test]
    fn nested_noexcept_expression() {
        let m = parse("() noexcept(noexcept(other()))").modifiers;
        assert!(m.is_noexcept);
        assert_eq!(m.noexcept_expr.as_deref(), Some("noexcept(other())"));
    }

    #[test]
    fn noexcept_expression_does_not_leak_tokens() {
        let m = parse("() noexcept(is_const<T>::value) override").modifiers;
        assert!(m.is_override);
        assert!(!m.is_const);
    }

    #[test]
    fn trailing_return_type_is_not_a_modifier() {
        let m = parse("() -> const Foo &").modifiers;
        assert_eq!(m, FunctionModifiers::default());

        let m = parse("() const noexcept -> const Foo& override").modifiers;
        assert!(m.is_const && m.is_noexcept && m.is_override);

        let m = parse("() -> std::enable_if_t<(N > 0), const T*> = 0").modifiers;
        assert!(m.is_pure_virtual);
        assert!(!m.is_const);

        let m = parse("() noexcept(noexcept(p->get())) -> int").modifiers;
        assert_eq!(m.noexcept_expr.as_deref(), Some("noexcept(p->get())"));
    }

    #[test]
    fn assignment_forms() {
        assert!(parse("() = 0").modifiers.is_pure_virtual);
        assert!(parse("() = default").modifiers.is_default);
        assert!(parse("() = delete").modifiers.is_delete);

        let m = parse("() const = 0").modifiers;
        assert!(m.is_const && m.is_pure_virtual);

        let m = parse("() noexcept = default").modifiers;
        assert!(m.is_noexcept && m.is_default);
    }

    #[test]
    fn template_commas_do_not_split() {
        assert_eq!(
            parse("(std::map<std::string, int> m)").arguments,
            vec![arg("std::map<std::string, int>", Some("m"))]
        );
        assert_eq!(
            parse("(std::map<K, std::function<void(A, B)>> m)").arguments,
            vec![arg("std::map<K, std::function<void(A, B)>>", Some("m"))]
        );
    }

    #[test]
    fn function_pointer_argument() {
        assert_eq!(
            parse("(int (*callback)(int, int))").arguments,
            vec![arg("int (*)(int, int)", Some("callback"))]
        );
    }

    #[test]
    fn full_signature() {
        let d = parse(
            "(const std::vector<int>& v, std::function<int(int, int)> f = nullptr) const noexcept override",
        );
        assert_eq!(
            d.arguments,
            vec![
                Argument::new(Some("const"), "std::vector<int>&", Some("v"), None),
                Argument::new(None, "std::function<int(int, int)>", Some("f"), Some("nullptr")),
            ]
        );
        assert!(d.modifiers.is_const && d.modifiers.is_noexcept && d.modifiers.is_override);
    }

    #[test]
    fn malformed_input() {
        assert_eq!(
            parse_declarator("int x"),
            Err(DeclaratorError::MissingOpenParen("int x".into()))
        );
        assert!(matches!(parse_declarator("(int x"), Err(DeclaratorError::Unbalanced(_))));
    }

    #[test]
    fn function_pointer_argstring() {
        assert_eq!(
            parse_function_pointer_argstring(")(int x, float y)"),
            vec![arg("int", Some("x")), arg("float", Some("y"))]
        );
        assert!(parse_function_pointer_argstring("(int x)").is_empty());
        assert!(parse_function_pointer_argstring("").is_empty());
        assert!(parse_function_pointer_argstring(")(int").is_empty());
    }

    #[test]
    fn canonical_modifier_order() {
        let d = parse("() final = delete override noexcept const");
        // trailing "= delete" is only recognised at the end
        assert!(!d.modifiers.is_delete);
        let d = parse("() override final noexcept(true) const = 0");
        assert_eq!(d.to_string(), "() const noexcept(true) override final = 0");
    }

    #[test]
    fn format_then_parse_is_stable() {
        let inputs = [
            "(int x, float y)",
            "(const std::string& s, std::map<K, V> m = {}) const noexcept",
            "(int (*callback)(int, int), void (Class::*method)()) override final",
            "(unsigned long, const char* const name = \"x\") = delete",
        ];
        for input in inputs {
            let once = parse(input);
            let twice = parse(&once.to_string());
            assert_eq!(once, twice, "{}", input);
        }
    }
}
