//! C++ declarator parsing.
//!
//! Works on the already-segmented fragments a documentation generator emits
//! for each declaration (a raw type string, a raw argument string) rather than
//! on whole source files:
//!
//! - [`scanner`]: bracket depth tracking, top-level splitting and matching
//! - [`path`]: `::` splitting that keeps template argument lists whole
//! - [`argument`]: one `qualifiers type name = default` argument
//! - [`declarator`]: `(args) modifiers`
//! - [`segment`]: type strings with inline parameter lists
//! - [`qualify`]: rewriting names in types through a [`NameResolver`]

pub mod argument;
pub mod declarator;
pub mod error;
pub mod path;
pub mod qualify;
pub mod scanner;
pub mod segment;

pub use argument::{extract_qualifiers, format_arguments, parse_argument_list, Argument};
pub use declarator::{parse_declarator, parse_function_pointer_argstring, Declarator, FunctionModifiers};
pub use error::DeclaratorError;
pub use path::{base_name, parse_qualified_path};
pub use qualify::{qualify_arguments, qualify_type, qualify_type_segments, NameResolver};
pub use segment::{format_type_segments, parse_type_segments, TypeSegment};
