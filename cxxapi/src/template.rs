//! Template parameter lists: `template <typename T, int N = 4>`.

use std::fmt;

/// One template parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateParam {
    /// `typename`, `class`, `int`, a concept name, ...
    pub ty: String,
    pub name: Option<String>,
    pub default: Option<String>,
}

impl TemplateParam {
    pub fn new(ty: &str, name: Option<&str>, default: Option<&str>) -> Self {
        Self {
            ty: ty.trim().to_string(),
            name: name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
            default: default.map(|d| d.trim().to_string()).filter(|d| !d.is_empty()),
        }
    }

    /// Build a parameter from generator output, where the name is sometimes
    /// left inside the type text (`"typename T"` with no separate name).
    ///
    /// ```text
    /// ("typename T", None) → type "typename", name "T"
    /// ("typename", None)   → type "typename", no name
    /// ```
    pub fn from_parts(ty: &str, name: Option<&str>, default: Option<&str>) -> Self {
        if name.is_some_and(|n| !n.trim().is_empty()) {
            return Self::new(ty, name, default);
        }
        let tokens: Vec<&str> = ty.split_whitespace().collect();
        match tokens.split_last() {
            Some((last, rest)) if !rest.is_empty() => Self::new(&rest.join(" "), Some(last), default),
            _ => Self::new(ty, None, default),
        }
    }
}

impl fmt::Display for TemplateParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.ty)?;
        if let Some(name) = &self.name {
            write!(f, " {}", name)?;
        }
        if let Some(default) = &self.default {
            write!(f, " = {}", default)?;
        }
        Ok(())
    }
}

/// A non-empty, ordered template parameter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateList(Vec<TemplateParam>);

impl TemplateList {
    /// `None` for an empty parameter list: a declaration without template
    /// parameters is not a template.
    pub fn from_params(params: Vec<TemplateParam>) -> Option<Self> {
        if params.is_empty() {
            None
        } else {
            Some(Self(params))
        }
    }

    pub fn params(&self) -> &[TemplateParam] {
        &self.0
    }
}

impl fmt::Display for TemplateList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("template <")?;
        for (i, param) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", param)?;
        }
        f.write_str(">")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_split_from_type() {
        let p = TemplateParam::from_parts("typename T", None, None);
        assert_eq!(p.ty, "typename");
        assert_eq!(p.name.as_deref(), Some("T"));

        let p = TemplateParam::from_parts("typename", None, None);
        assert_eq!(p.ty, "typename");
        assert_eq!(p.name, None);

        let p = TemplateParam::from_parts("class", Some("T"), Some("int"));
        assert_eq!(p.to_string(), "class T = int");
    }

    #[test]
    fn list_display() {
        let list = TemplateList::from_params(vec![
            TemplateParam::new("typename", Some("T"), None),
            TemplateParam::new("size_t", Some("N"), Some("4")),
        ])
        .unwrap();
        assert_eq!(list.to_string(), "template <typename T, size_t N = 4>");
    }

    #[test]
    fn empty_list_is_not_a_template() {
        assert!(TemplateList::from_params(Vec::new()).is_none());
    }
}
