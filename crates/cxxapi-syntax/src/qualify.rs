//! Qualification of type expressions against a name resolver.
//!
//! Resolution itself lives with whoever owns the scope hierarchy; this module
//! only knows how to take a type expression apart, ask the resolver about
//! each name in it, and put the pieces back together. Every step is
//! best-effort: text the resolver does not know is left as it was.

use crate::argument::Argument;
use crate::scanner::{find_matching, split_top_level};
use crate::segment::TypeSegment;

/// Resolves a (possibly partially qualified) name to its fully qualified form.
pub trait NameResolver {
    /// `None` when the name cannot be resolved from the current scope.
    fn qualify_name(&self, name: &str) -> Option<String>;
}

impl<R: NameResolver + ?Sized> NameResolver for &R {
    fn qualify_name(&self, name: &str) -> Option<String> {
        (**self).qualify_name(name)
    }
}

/// Qualify every name reference inside a type expression.
///
/// Template arguments are qualified one by one and reassembled as
/// `prefix< a, b >suffix`. Trailing `*`, `&` and `const` decorators are peeled
/// off before lookup and put back afterwards.
pub fn qualify_type<R: NameResolver + ?Sized>(ty: &str, resolver: &R) -> String {
    if ty.is_empty() {
        return String::new();
    }

    if let Some(open) = ty.find('<') {
        if let Some(close) = find_matching(ty, open) {
            let prefix = &ty[..open];
            let qualified_prefix = resolver
                .qualify_name(prefix)
                .unwrap_or_else(|| prefix.to_string());

            let arguments: Vec<String> = split_top_level(&ty[open + 1..close], ',')
                .into_iter()
                .map(|arg| qualify_type(arg, resolver))
                .collect();
            let template = if arguments.is_empty() {
                "<>".to_string()
            } else {
                format!("< {} >", arguments.join(", "))
            };

            let suffix = qualify_type(&ty[close + 1..], resolver);
            return format!("{}{}{}", qualified_prefix, template, suffix);
        }
    }

    if let Some(qualified) = resolver.qualify_name(ty) {
        return qualified;
    }

    for declarator in ["(*", "(&"] {
        if let Some(prefix) = ty.strip_suffix(declarator) {
            let prefix = prefix.trim_end();
            if !prefix.is_empty() {
                let qualified = qualify_type(prefix, resolver);
                if qualified != prefix {
                    return format!("{}{}", qualified, declarator);
                }
            }
            return ty.to_string();
        }
    }

    let (core, decorators) = peel_decorators(ty);
    if !decorators.is_empty() && !core.is_empty() {
        if let Some(qualified) = resolver.qualify_name(core) {
            let decorators = decorators.trim_end();
            return if decorators.contains("const") {
                format!("{} {}", qualified, decorators)
            } else {
                format!("{}{}", qualified, decorators)
            };
        }
    }

    ty.to_string()
}

/// Split trailing `*`, `&` and `const` off a type, in any order.
///
/// `"Widget const*"` → `("Widget", "const *")`
fn peel_decorators(ty: &str) -> (&str, String) {
    let mut core = ty.trim_end();
    let mut decorators = String::new();

    loop {
        let mut changed = false;
        while let Some(last) = core.chars().last().filter(|c| *c == '*' || *c == '&') {
            decorators.insert(0, last);
            core = core[..core.len() - 1].trim_end();
            changed = true;
        }
        if core.ends_with(" const") || core.ends_with("*const") {
            decorators.insert_str(0, "const ");
            core = core[..core.len() - "const".len()].trim_end();
            changed = true;
        }
        if !changed {
            break;
        }
    }
    (core, decorators)
}

/// Qualify argument types and default values.
pub fn qualify_arguments<R: NameResolver + ?Sized>(arguments: &mut [Argument], resolver: &R) {
    for argument in arguments {
        argument.ty = qualify_type(&argument.ty, resolver);
        if let Some(default) = argument.default_value.as_mut() {
            if let Some(qualified) = resolver.qualify_name(default) {
                *default = qualified;
            }
        }
    }
}

/// Qualify the text and argument lists of a segmented type.
///
/// A text segment directly before an argument list ends with a return type
/// (`"std::function< Result"`), which is qualified on its own when the
/// segment as a whole does not resolve.
pub fn qualify_type_segments<R: NameResolver + ?Sized>(segments: &mut [TypeSegment], resolver: &R) {
    for i in 0..segments.len() {
        let next_is_arguments = matches!(segments.get(i + 1), Some(TypeSegment::Arguments(_)));
        match &mut segments[i] {
            TypeSegment::Arguments(arguments) => qualify_arguments(arguments, resolver),
            TypeSegment::Text(text) if next_is_arguments => {
                *text = qualify_text_before_arguments(text, resolver);
            }
            TypeSegment::Text(text) => *text = qualify_type(text, resolver),
        }
    }
}

fn qualify_text_before_arguments<R: NameResolver + ?Sized>(text: &str, resolver: &R) -> String {
    let qualified = qualify_type(text, resolver);
    if qualified != text {
        return qualified;
    }

    let trimmed = text.trim_end();
    let Some(split) = trimmed.rfind([' ', '<', ',']) else {
        return text.to_string();
    };
    let (prefix, last) = trimmed.split_at(split + 1);
    match resolver.qualify_name(last) {
        Some(qualified) => format!("{}{}", prefix, qualified),
        None => text.to_string(),
    }
}
