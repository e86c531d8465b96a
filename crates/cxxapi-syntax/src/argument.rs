//! Function arguments: parsing one `type name = default` fragment.

use crate::scanner::{find_top_level, split_top_level};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

// -- Keyword sets -------------------------------------------------------------

/// Qualifiers moved out of the type into [`Argument::qualifiers`].
const CV_QUALIFIERS: &[&str] = &["const", "volatile", "mutable"];

/// Specifiers that belong to the type itself (`unsigned long`).
const TYPE_SPECIFIERS: &[&str] = &["unsigned", "signed", "long", "short"];

// `(*name)`, `(Class::*name)`, `(&name)`, `(&&name)`. Group 1 is the name.
// Only a declarator when a `(...)` or `[...]` suffix follows.
static RE_POINTER_DECLARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\(\s*",
        r"(?:[a-zA-Z_][a-zA-Z0-9_]*\s*::\s*)?",
        r"(?:\*|&&?)\s*",
        r"([a-zA-Z_][a-zA-Z0-9_]*)",
        r"\s*\)"
    ))
    .unwrap()
});

fn is_cv_qualifier(token: &str) -> bool {
    CV_QUALIFIERS.contains(&token)
}

fn is_type_specifier(token: &str) -> bool {
    TYPE_SPECIFIERS.contains(&token)
}

// -- Argument -----------------------------------------------------------------

/// One parsed function argument.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Argument {
    /// Leading CV-qualifiers, e.g. `const` or `const volatile`.
    pub qualifiers: Option<String>,
    /// Core type, eligible for qualification.
    pub ty: String,
    pub name: Option<String>,
    pub default_value: Option<String>,
}

impl Argument {
    pub fn new(
        qualifiers: Option<&str>,
        ty: &str,
        name: Option<&str>,
        default_value: Option<&str>,
    ) -> Self {
        Self {
            qualifiers: qualifiers.map(str::to_string),
            ty: ty.to_string(),
            name: name.map(str::to_string),
            default_value: default_value.map(str::to_string),
        }
    }

    /// Parse a single argument.
    ///
    /// ```text
    /// "int x"                     → (None, "int", "x", None)
    /// "const std::string& s"      → ("const", "std::string&", "s", None)
    /// "int x = 5"                 → (None, "int", "x", "5")
    /// "int (*callback)(int, int)" → (None, "int (*)(int, int)", "callback", None)
    /// "void (Class::*method)()"   → (None, "void (Class::*)()", "method", None)
    /// "void"                      → (None, "void", None, None)
    /// "const unsigned long"       → ("const", "unsigned long", None, None)
    /// ```
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            return Self::default();
        }

        let (base, default_value) = match find_top_level(text, '=') {
            Some(eq) => (text[..eq].trim(), Some(text[eq + 1..].trim().to_string())),
            None => (text, None),
        };

        let (qualifiers, base) = extract_qualifiers(base);

        if let Some((ty, name)) = split_pointer_declarator(&base) {
            return Self {
                qualifiers,
                ty,
                name: Some(name),
                default_value,
            };
        }

        let (ty, name) = match base.rsplit_once(char::is_whitespace) {
            Some((prefix, last)) => {
                let prefix = prefix.trim_end();
                let completes_type = looks_like_type_token(last)
                    || is_cv_qualifier(last)
                    || (prefix_is_all_qualifiers(prefix) && is_type_specifier(last));
                if completes_type {
                    (base.clone(), None)
                } else {
                    (prefix.to_string(), Some(last.to_string()))
                }
            }
            None => (base.clone(), None),
        };

        Self {
            qualifiers,
            ty,
            name,
            default_value,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.qualifiers.is_none() && self.ty.is_empty()
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(qualifiers) = self.qualifiers.as_deref().filter(|q| !q.is_empty()) {
            write!(f, "{} ", qualifiers)?;
        }
        f.write_str(&self.ty)?;
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            write!(f, " {}", name)?;
        }
        if let Some(default) = self.default_value.as_deref().filter(|d| !d.is_empty()) {
            write!(f, " = {}", default)?;
        }
        Ok(())
    }
}

// -- Helpers ------------------------------------------------------------------

/// Split leading CV-qualifiers off a type.
///
/// Returns `(None, type)` when there are none, or when the type consists of
/// qualifiers only (so the type never ends up empty).
///
/// ```text
/// "const std::string&"  → ("const", "std::string&")
/// "const volatile int*" → ("const volatile", "int*")
/// "unsigned long"       → (None, "unsigned long")
/// "const"               → (None, "const")
/// ```
pub fn extract_qualifiers(ty: &str) -> (Option<String>, String) {
    let tokens: Vec<&str> = ty.split_whitespace().collect();
    let count = tokens.iter().take_while(|t| is_cv_qualifier(t)).count();

    if count == 0 || count >= tokens.len() {
        return (None, ty.to_string());
    }
    (Some(tokens[..count].join(" ")), tokens[count..].join(" "))
}

/// Parse the inside of a parameter list (without the parentheses).
pub fn parse_argument_list(body: &str) -> Vec<Argument> {
    split_top_level(body, ',')
        .into_iter()
        .map(Argument::parse)
        .filter(|arg| !arg.is_empty())
        .collect()
}

/// `"const int x, float y = 0.0"`
pub fn format_arguments(arguments: &[Argument]) -> String {
    arguments
        .iter()
        .map(Argument::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Match `(*name)(...)` / `(&name)[N]` style declarators and excise the name.
fn split_pointer_declarator(base: &str) -> Option<(String, String)> {
    let caps = RE_POINTER_DECLARATOR.captures_iter(base).find(|caps| {
        caps.get(0)
            .is_some_and(|group| base[group.end()..].trim_start().starts_with(['(', '[']))
    })?;
    let name = caps.get(1)?;
    let ty = format!("{}{}", &base[..name.start()], &base[name.end()..]);
    Some((ty.trim().to_string(), name.as_str().to_string()))
}

fn looks_like_type_token(token: &str) -> bool {
    token.ends_with('*') || token.ends_with('&') || token.ends_with('>') || token.ends_with(']')
}

fn prefix_is_all_qualifiers(prefix: &str) -> bool {
    prefix
        .split_whitespace()
        .all(|t| is_cv_qualifier(t) || is_type_specifier(t))
}
