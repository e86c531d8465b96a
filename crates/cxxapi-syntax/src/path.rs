//! Qualified-name splitting that understands template argument lists.

use crate::scanner::Depth;

/// Split a qualified name on `::`, leaving template argument lists intact.
///
/// - `"std::vector<std::string>::iterator"` → `["std", "vector<std::string>", "iterator"]`
/// - `"std::enable_if<(N > 0)>::type"` → `["std", "enable_if<(N > 0)>", "type"]`
/// - `"decltype(ptr->member)::type"` → `["decltype(ptr->member)", "type"]`
pub fn parse_qualified_path(name: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut depth = Depth::default();
    let mut prev = None;
    let mut chars = name.chars().peekable();

    while let Some(c) = chars.next() {
        if c == ':' && chars.peek() == Some(&':') && depth.paren == 0 && depth.angle == 0 {
            chars.next();
            if !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
            prev = Some(':');
            continue;
        }
        depth.feed(prev, c);
        current.push(c);
        prev = Some(c);
    }

    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// The part of a path segment before its template argument list.
pub fn base_name(segment: &str) -> &str {
    match segment.find('<') {
        Some(idx) => &segment[..idx],
        None => segment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_path() {
        assert_eq!(parse_qualified_path("facebook::react::Node"), ["facebook", "react", "Node"]);
    }

    #[test]
    fn template_arguments_stay_whole() {
        assert_eq!(
            parse_qualified_path("std::vector<std::string>::test"),
            ["std", "vector<std::string>", "test"]
        );
        assert_eq!(parse_qualified_path("ns::Foo<A, B>::Bar"), ["ns", "Foo<A, B>", "Bar"]);
    }

    #[test]
    fn operators_inside_parens() {
        assert_eq!(
            parse_qualified_path("std::enable_if<(N > 0)>::type"),
            ["std", "enable_if<(N > 0)>", "type"]
        );
        assert_eq!(
            parse_qualified_path("std::integral_constant<int, (1 >> 2)>::value"),
            ["std", "integral_constant<int, (1 >> 2)>", "value"]
        );
        assert_eq!(
            parse_qualified_path("decltype(ptr->member)::type"),
            ["decltype(ptr->member)", "type"]
        );
    }

    #[test]
    fn leading_global_qualifier_is_dropped() {
        assert_eq!(parse_qualified_path("::Widget"), ["Widget"]);
        assert!(parse_qualified_path("").is_empty());
    }

    #[test]
    fn base_name_strips_template_args() {
        assert_eq!(base_name("vector<int>"), "vector");
        assert_eq!(base_name("Widget"), "Widget");
    }
}
