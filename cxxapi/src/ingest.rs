//! Record ingestion: turning declaration records into scopes and members.

use crate::error::SnapshotError;
use crate::member::{AliasKeyword, Function, Initializer, Member, MemberBody, TypeAlias, Variable, Visibility};
use crate::record::{ParamRecord, Record};
use crate::scope::{BaseClass, ScopeKind, StructKeyword};
use crate::snapshot::Snapshot;
use crate::template::{TemplateList, TemplateParam};
use cxxapi_syntax::{extract_qualifiers, parse_qualified_path, Argument};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

static RE_CONSTEXPR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bconstexpr\b\s*").unwrap());

/// Feed every record into the snapshot, stopping at the first scope conflict.
pub fn ingest<I>(snapshot: &mut Snapshot, records: I) -> Result<(), SnapshotError>
where
    I: IntoIterator<Item = Record>,
{
    for record in records {
        ingest_record(snapshot, &record)?;
    }
    Ok(())
}

pub fn ingest_record(snapshot: &mut Snapshot, record: &Record) -> Result<(), SnapshotError> {
    let kind = record.kind.as_str();
    if let Some(keyword) = StructKeyword::parse(kind) {
        return add_struct_like(snapshot, record, keyword);
    }
    match kind {
        "namespace" => {
            let id = snapshot.create_or_get_namespace(&record.qualified_name)?;
            snapshot.set_location(id, record.location.as_deref());
            Ok(())
        }
        "enum" => add_enum(snapshot, record),
        "concept" => add_concept(snapshot, record),
        "variable" | "function" | "typedef" => add_member(snapshot, record),
        "file" | "dir" | "page" => Ok(()),
        "category" | "protocol" => {
            warn!(name = %record.qualified_name, "{} records are not supported", kind);
            Ok(())
        }
        _ => {
            warn!(name = %record.qualified_name, "unknown record kind `{}`", kind);
            Ok(())
        }
    }
}

// -- Scopes -------------------------------------------------------------------

fn add_struct_like(snapshot: &mut Snapshot, record: &Record, keyword: StructKeyword) -> Result<(), SnapshotError> {
    if is_unnamed(&record.qualified_name) {
        warn!(name = %record.qualified_name, "skipped {} record without a name", keyword);
        return Ok(());
    }
    let id = snapshot.create_struct_like(&record.qualified_name, keyword)?;

    let bases = record
        .base_classes
        .iter()
        .filter_map(|base| match Visibility::parse(&base.protection) {
            Some(protection) => Some(BaseClass {
                name: base.name.trim().to_string(),
                protection,
                is_virtual: base.is_virtual,
            }),
            None => {
                debug!(class = %record.qualified_name, base = %base.name, "dropped {} base", base.protection);
                None
            }
        })
        .collect();

    *snapshot.scope_kind_mut(id) = ScopeKind::StructLike {
        keyword,
        bases,
        template: template_list(&record.template_params),
    };
    snapshot.set_location(id, record.location.as_deref());
    Ok(())
}

fn add_enum(snapshot: &mut Snapshot, record: &Record) -> Result<(), SnapshotError> {
    if visibility(record).is_none() {
        return Ok(());
    }
    if is_unnamed(&record.qualified_name) {
        warn!(name = %record.qualified_name, "skipped enum record without a name");
        return Ok(());
    }
    let id = snapshot.create_enum(&record.qualified_name)?;
    let underlying = record.ty.trim();
    *snapshot.scope_kind_mut(id) = ScopeKind::Enum {
        underlying: (!underlying.is_empty()).then(|| underlying.to_string()),
    };
    snapshot.set_location(id, record.location.as_deref());

    for value in &record.enum_values {
        let initializer = value
            .initializer
            .as_deref()
            .map(|i| i.trim().trim_start_matches('=').trim());
        snapshot.add_member(id, Member::constant(value.name.trim(), initializer));
    }
    Ok(())
}

/// Concepts belong to the namespace their name is in, which is opened if no
/// record has done so yet.
fn add_concept(snapshot: &mut Snapshot, record: &Record) -> Result<(), SnapshotError> {
    let path = parse_qualified_path(&record.qualified_name);
    let Some((name, prefix)) = path.split_last() else {
        warn!("concept record without a name");
        return Ok(());
    };
    let namespace = snapshot.create_or_get_namespace(&prefix.join("::"))?;

    let constraint = record
        .initializer
        .as_deref()
        .and_then(|text| text.split_once('='))
        .map(|(_, constraint)| constraint.trim())
        .unwrap_or_default();

    let member = Member::concept(name, constraint).with_template(template_list(&record.template_params));
    snapshot.add_member(namespace, member);
    Ok(())
}

// -- Members ------------------------------------------------------------------

fn add_member(snapshot: &mut Snapshot, record: &Record) -> Result<(), SnapshotError> {
    let Some(visibility) = visibility(record) else {
        return Ok(());
    };
    let qualified = record.qualified_name.trim();
    let path = parse_qualified_path(qualified);
    let (name, prefix) = match path.split_last() {
        Some((name, prefix)) if !is_unnamed(qualified) => (name, prefix),
        _ => {
            debug!(kind = %record.kind, scope = %qualified, "skipped anonymous declaration");
            return Ok(());
        }
    };

    let member = match record.kind.as_str() {
        "variable" => variable(name, visibility, record),
        "function" => function(name, visibility, record),
        _ => type_alias(name, visibility, record),
    };

    let scope = snapshot.ensure_scope(prefix);
    snapshot.add_member(scope, member);
    Ok(())
}

/// `""`, `"::"` and `"ns::"` name nothing.
fn is_unnamed(qualified_name: &str) -> bool {
    let qualified_name = qualified_name.trim();
    qualified_name.ends_with("::") || parse_qualified_path(qualified_name).is_empty()
}

/// `None` for declarations that never appear in the snapshot.
fn visibility(record: &Record) -> Option<Visibility> {
    match record.visibility.as_str() {
        "private" | "friend" => {
            debug!(name = %record.qualified_name, "dropped {} {}", record.visibility, record.kind);
            None
        }
        other => {
            let parsed = Visibility::parse(other);
            if parsed.is_none() {
                warn!(name = %record.qualified_name, "unrecognized visibility `{}`", other);
            }
            parsed
        }
    }
}

fn variable(name: &str, visibility: Visibility, record: &Record) -> Member {
    let mut ty = record.ty.trim().to_string();
    if record.is_constexpr {
        ty = RE_CONSTEXPR.replace_all(&ty, "").trim().to_string();
    }
    let leading_const = ty.split_whitespace().next() == Some("const");
    if leading_const {
        ty = ty["const".len()..].trim().to_string();
    }

    let mut body = Variable::new(&ty, &record.argstring);
    body.is_static = record.is_static;
    body.is_const = record.is_const || leading_const;
    body.is_constexpr = record.is_constexpr;
    body.is_mutable = record.is_mutable;
    body.initializer = record.initializer.as_deref().and_then(Initializer::parse);

    Member::new(name, visibility, MemberBody::Variable(body))
}

fn function(name: &str, visibility: Visibility, record: &Record) -> Member {
    let return_type = if record.is_constexpr {
        RE_CONSTEXPR.replace_all(&record.ty, "").trim().to_string()
    } else {
        record.ty.trim().to_string()
    };

    let mut body = Function::new(&return_type, &record.argstring);
    body.is_virtual = record.is_virtual || record.is_pure_virtual;
    body.is_static = record.is_static;
    body.is_constexpr = record.is_constexpr;
    // Trailing-return declarations carry no `= 0` in their argstring.
    if record.is_pure_virtual {
        body.modifiers.is_pure_virtual = true;
    }
    if let Some(params) = record.params.as_ref().filter(|p| !p.is_empty()) {
        body.arguments = params.iter().map(argument).collect();
        body.raw_declarator = None;
    }

    Member::new(name, visibility, MemberBody::Function(body)).with_template(template_list(&record.template_params))
}

fn type_alias(name: &str, visibility: Visibility, record: &Record) -> Member {
    let keyword = if record.definition.trim_start().starts_with("typedef") {
        AliasKeyword::Typedef
    } else {
        AliasKeyword::Using
    };
    let body = TypeAlias::new(keyword, &record.ty, &record.argstring);
    Member::new(name, visibility, MemberBody::TypeAlias(body)).with_template(template_list(&record.template_params))
}

fn argument(param: &ParamRecord) -> Argument {
    let (qualifiers, ty) = extract_qualifiers(param.ty.trim());
    let non_empty = |s: &Option<String>| s.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
    Argument {
        qualifiers,
        ty,
        name: non_empty(&param.name),
        default_value: non_empty(&param.default),
    }
}

fn template_list(params: &[ParamRecord]) -> Option<TemplateList> {
    TemplateList::from_params(
        params
            .iter()
            .map(|p| TemplateParam::from_parts(&p.ty, p.name.as_deref(), p.default.as_deref()))
            .collect(),
    )
}
