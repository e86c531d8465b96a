//! Member model: the declarations that live inside a scope.
//!
//! Every member owns its parsed argument lists and type segments, so
//! [`Member::close`] can rewrite the names in them in place once the whole
//! scope tree is known. Rendering produces one canonical line (two for
//! templates) per member.

use crate::template::TemplateList;
use cxxapi_syntax::{
    format_arguments, format_type_segments, parse_declarator, parse_function_pointer_argstring,
    parse_type_segments, qualify_arguments, qualify_type, qualify_type_segments, Argument,
    FunctionModifiers, NameResolver, TypeSegment,
};
use std::fmt;

// -- Classification -----------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Protected,
}

impl Visibility {
    /// `None` for anything that never reaches the snapshot.
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "public" => Some(Self::Public),
            "protected" => Some(Self::Protected),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse grouping of members, in the order a reader scans a namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MemberKind {
    Constant,
    TypeAlias,
    Concept,
    Function,
    Operator,
    Variable,
}

impl MemberKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Constant => "constant",
            Self::TypeAlias => "type alias",
            Self::Concept => "concept",
            Self::Function => "function",
            Self::Operator => "operator",
            Self::Variable => "variable",
        }
    }
}

/// How a member is laid out when rendered.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions<'a> {
    pub indent: usize,
    /// Prefix joined to the member name with `::` (namespace members).
    pub qualification: Option<&'a str>,
    pub hide_visibility: bool,
    pub store_initializers: bool,
}

// -- Member bodies ------------------------------------------------------------

/// An enumerator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constant {
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Initializer {
    pub value: String,
    /// `int x{5}` rather than `int x = 5`.
    pub brace: bool,
}

impl Initializer {
    /// Parse the generator's initializer text: `"= 5"` or `"{5}"`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Some(value) = raw.strip_prefix('=') {
            let value = value.trim();
            return (!value.is_empty()).then(|| Self {
                value: value.to_string(),
                brace: false,
            });
        }
        if let Some(inner) = raw.strip_prefix('{').and_then(|r| r.strip_suffix('}')) {
            return Some(Self {
                value: inner.trim().to_string(),
                brace: true,
            });
        }
        (!raw.is_empty()).then(|| Self {
            value: raw.to_string(),
            brace: false,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub ty: Vec<TypeSegment>,
    /// Arguments of a function-pointer variable (`void(*name)(args)`).
    pub function_pointer: Option<Vec<Argument>>,
    /// `[N]` of an array variable.
    pub array_suffix: Option<String>,
    pub is_static: bool,
    pub is_const: bool,
    pub is_constexpr: bool,
    pub is_mutable: bool,
    pub initializer: Option<Initializer>,
}

impl Variable {
    /// A variable from its raw type text and argument string.
    pub fn new(ty: &str, argstring: &str) -> Self {
        let argstring = argstring.trim();
        Self {
            ty: parse_type_segments(ty.trim()),
            function_pointer: argstring
                .starts_with(")(")
                .then(|| parse_function_pointer_argstring(argstring)),
            array_suffix: argstring.starts_with('[').then(|| argstring.to_string()),
            is_static: false,
            is_const: false,
            is_constexpr: false,
            is_mutable: false,
            initializer: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub return_type: String,
    pub arguments: Vec<Argument>,
    pub modifiers: FunctionModifiers,
    pub is_virtual: bool,
    pub is_static: bool,
    pub is_constexpr: bool,
    /// Argument string kept verbatim because it did not parse.
    pub raw_declarator: Option<String>,
}

impl Function {
    /// A function from its return type and declarator text. A declarator that
    /// does not parse is kept as raw text and rendered as given.
    pub fn new(return_type: &str, argstring: &str) -> Self {
        let argstring = argstring.trim();
        let mut raw_declarator = None;
        let declarator = if argstring.is_empty() {
            Default::default()
        } else {
            match parse_declarator(argstring) {
                Ok(declarator) => declarator,
                Err(err) => {
                    tracing::warn!("keeping unparsed declarator as text: {}", err);
                    raw_declarator = Some(argstring.to_string());
                    Default::default()
                }
            }
        };
        Self {
            return_type: return_type.trim().to_string(),
            arguments: declarator.arguments,
            modifiers: declarator.modifiers,
            is_virtual: false,
            is_static: false,
            is_constexpr: false,
            raw_declarator,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasKeyword {
    Using,
    Typedef,
}

impl AliasKeyword {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Using => "using",
            Self::Typedef => "typedef",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeAlias {
    pub keyword: AliasKeyword,
    pub ty: Vec<TypeSegment>,
    pub function_pointer: Option<Vec<Argument>>,
}

impl TypeAlias {
    pub fn new(keyword: AliasKeyword, ty: &str, argstring: &str) -> Self {
        let argstring = argstring.trim();
        Self {
            keyword,
            ty: parse_type_segments(ty.trim()),
            function_pointer: argstring
                .starts_with(")(")
                .then(|| parse_function_pointer_argstring(argstring)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Concept {
    pub constraint: String,
}

impl Concept {
    pub fn new(constraint: &str) -> Self {
        Self {
            constraint: normalize_constraint(constraint),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberBody {
    Constant(Constant),
    Variable(Variable),
    Function(Function),
    TypeAlias(TypeAlias),
    Concept(Concept),
}

// -- Member -------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub visibility: Visibility,
    pub template: Option<TemplateList>,
    pub body: MemberBody,
}

impl Member {
    pub fn new(name: &str, visibility: Visibility, body: MemberBody) -> Self {
        Self {
            name: name.to_string(),
            visibility,
            template: None,
            body,
        }
    }

    pub fn constant(name: &str, value: Option<&str>) -> Self {
        let value = value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string);
        Self::new(name, Visibility::Public, MemberBody::Constant(Constant { value }))
    }

    pub fn concept(name: &str, constraint: &str) -> Self {
        Self::new(name, Visibility::Public, MemberBody::Concept(Concept::new(constraint)))
    }

    pub fn with_template(mut self, template: Option<TemplateList>) -> Self {
        self.template = template;
        self
    }

    pub fn kind(&self) -> MemberKind {
        match &self.body {
            MemberBody::Constant(_) => MemberKind::Constant,
            MemberBody::Variable(v) if v.is_const || v.is_constexpr => MemberKind::Constant,
            MemberBody::Variable(_) => MemberKind::Variable,
            MemberBody::Function(_) if self.name.starts_with("operator") => MemberKind::Operator,
            MemberBody::Function(_) => MemberKind::Function,
            MemberBody::TypeAlias(_) => MemberKind::TypeAlias,
            MemberBody::Concept(_) => MemberKind::Concept,
        }
    }

    pub fn is_static(&self) -> bool {
        match &self.body {
            MemberBody::Variable(v) => v.is_static,
            MemberBody::Function(f) => f.is_static,
            _ => false,
        }
    }

    /// Qualify every name reference the member holds, as seen from the scope
    /// the resolver stands for.
    pub fn close<R: NameResolver + ?Sized>(&mut self, resolver: &R) {
        match &mut self.body {
            MemberBody::Variable(v) => {
                if let Some(arguments) = v.function_pointer.as_mut() {
                    qualify_arguments(arguments, resolver);
                }
                qualify_type_segments(&mut v.ty, resolver);
            }
            MemberBody::Function(f) => {
                f.return_type = qualify_type(&f.return_type, resolver);
                qualify_arguments(&mut f.arguments, resolver);
            }
            MemberBody::TypeAlias(t) => {
                if let Some(arguments) = t.function_pointer.as_mut() {
                    qualify_arguments(arguments, resolver);
                }
                qualify_type_segments(&mut t.ty, resolver);
            }
            // Constraints are expressions, not types.
            MemberBody::Constant(_) | MemberBody::Concept(_) => {}
        }
    }

    pub fn render(&self, options: &RenderOptions<'_>) -> String {
        let name = match options.qualification {
            Some(prefix) if !prefix.is_empty() => format!("{}::{}", prefix, self.name),
            _ => self.name.clone(),
        };
        let indent = " ".repeat(options.indent);
        let visibility = if options.hide_visibility {
            String::new()
        } else {
            format!("{} ", self.visibility)
        };

        match &self.body {
            MemberBody::Constant(c) => match &c.value {
                Some(value) if options.store_initializers => format!("{}{} = {}", indent, name, value),
                _ => format!("{}{}", indent, name),
            },
            MemberBody::Variable(v) => {
                let mut out = format!("{}{}", indent, visibility);
                push_flag(&mut out, v.is_static, "static");
                push_flag(&mut out, v.is_constexpr, "constexpr");
                push_flag(&mut out, v.is_const && !v.is_constexpr, "const");
                push_flag(&mut out, v.is_mutable, "mutable");

                let ty = format_type_segments(&v.ty);
                match &v.function_pointer {
                    Some(arguments) => out.push_str(&function_pointer(&ty, " ", &name, arguments)),
                    None => {
                        out.push_str(&format!("{} {}", ty, name));
                        if let Some(suffix) = &v.array_suffix {
                            out.push_str(suffix);
                        }
                    }
                }

                if let Some(init) = v.initializer.as_ref().filter(|_| options.store_initializers) {
                    if init.brace {
                        out.push_str(&format!("{{{}}}", init.value));
                    } else {
                        out.push_str(&format!(" = {}", init.value));
                    }
                }
                out.push(';');
                out
            }
            MemberBody::Function(f) => {
                let mut out = String::new();
                if let Some(template) = &self.template {
                    out.push_str(&format!("{}{}\n", indent, template));
                }
                out.push_str(&indent);
                out.push_str(&visibility);
                push_flag(&mut out, f.is_virtual, "virtual");
                push_flag(&mut out, f.is_static, "static");
                push_flag(&mut out, f.is_constexpr, "constexpr");
                if !f.return_type.is_empty() {
                    out.push_str(&f.return_type);
                    out.push(' ');
                }
                match &f.raw_declarator {
                    Some(raw) => out.push_str(&format!("{}{};", name, raw)),
                    None => out.push_str(&format!(
                        "{}({}){};",
                        name,
                        format_arguments(&f.arguments),
                        f.modifiers
                    )),
                }
                out
            }
            MemberBody::TypeAlias(t) => {
                let mut out = indent.clone();
                if t.keyword == AliasKeyword::Using {
                    if let Some(template) = &self.template {
                        out.push_str(&format!("{}\n{}", template, indent));
                    }
                }
                out.push_str(&visibility);
                out.push_str(t.keyword.as_str());

                let ty = format_type_segments(&t.ty);
                match (t.keyword, &t.function_pointer) {
                    (AliasKeyword::Using, _) => out.push_str(&format!(" {} = {};", name, ty)),
                    (AliasKeyword::Typedef, Some(arguments)) => {
                        out.push(' ');
                        out.push_str(&function_pointer(&ty, "", &name, arguments));
                        out.push(';');
                    }
                    (AliasKeyword::Typedef, None) => out.push_str(&format!(" {} {};", ty, name)),
                }
                out
            }
            MemberBody::Concept(c) => {
                let mut out = String::new();
                if let Some(template) = &self.template {
                    out.push_str(&format!("{}{}\n", indent, template));
                }
                out.push_str(&format!("{}concept {} = {};", indent, name, c.constraint));
                out
            }
        }
    }
}

fn push_flag(out: &mut String, set: bool, keyword: &str) {
    if set {
        out.push_str(keyword);
        out.push(' ');
    }
}

/// `RET(*NAME)(ARGS)`. The generator usually leaves the `(*` in the type text
/// and the `)(` in the argument string; `separator` goes between a bare
/// return type and a `(*` that has to be supplied here.
fn function_pointer(ty: &str, separator: &str, name: &str, arguments: &[Argument]) -> String {
    let arguments = format_arguments(arguments);
    if ty.contains("(*") {
        format!("{}{})({})", ty, name, arguments)
    } else {
        format!("{}{}(*{})({})", ty, separator, name, arguments)
    }
}

/// Normalise the indentation of a multi-line constraint expression.
///
/// The first line is trimmed. Following lines lose their common indentation;
/// if that leaves every line flush left, they are indented by two spaces so
/// the continuation still reads as one.
fn normalize_constraint(constraint: &str) -> String {
    let lines: Vec<&str> = constraint.split('\n').collect();
    let Some((first, rest)) = lines.split_first() else {
        return String::new();
    };
    if rest.is_empty() {
        return constraint.trim().to_string();
    }

    let min_indent = rest
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut out = vec![first.trim().to_string()];
    for line in rest {
        if line.trim().is_empty() {
            out.push(String::new());
        } else {
            let dedented = line.get(min_indent..).unwrap_or_else(|| line.trim_start());
            out.push(dedented.trim_end().to_string());
        }
    }

    if out.iter().all(|line| !line.starts_with(' ')) {
        for line in out.iter_mut().skip(1).filter(|line| !line.is_empty()) {
            line.insert_str(0, "  ");
        }
    }
    out.join("\n")
}
