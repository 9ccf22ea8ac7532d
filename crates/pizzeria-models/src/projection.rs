//! Selective serialization over a static schema description.
//!
//! An [`EntitySchema`] lists an entity's fields and, for each relation, the
//! schema on the far side. A [`Record`] carries the values that were actually
//! loaded. [`project`] walks both together, keeping only the fields named in
//! an allow-list.
//!
//! Allow-list entries are either plain field names (`"name"`) or dotted paths
//! that step through one relation (`"restaurant_pizzas.pizza"`). A relation
//! selected without a dotted suffix is rendered with the target's full field
//! list minus the parent's `nested_exclusions` for that relation, which is how
//! the two sides of a many-to-many link avoid expanding into each other. A
//! plain relation name takes precedence over dotted paths through the same
//! relation.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised while projecting a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    /// The allow-list names a field the entity does not declare.
    #[error("{entity} has no field named '{field}'")]
    UnknownField {
        /// Entity being projected.
        entity: &'static str,
        /// The offending field name.
        field: String,
    },

    /// A dotted path tried to step through a scalar field.
    #[error("{entity}.{field} is not a relation")]
    NotARelation {
        /// Entity being projected.
        entity: &'static str,
        /// The scalar field used as a path segment.
        field: String,
    },
}

/// Kind of a declared field.
#[derive(Clone, Copy)]
pub enum FieldKind {
    /// A plain column value.
    Scalar,
    /// A single related record.
    ToOne(&'static EntitySchema),
    /// A list of related records.
    ToMany(&'static EntitySchema),
}

impl FieldKind {
    fn target(self) -> Option<&'static EntitySchema> {
        match self {
            FieldKind::Scalar => None,
            FieldKind::ToOne(schema) | FieldKind::ToMany(schema) => Some(schema),
        }
    }
}

// Schemas reference each other, so Debug prints the target name only.
impl fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Scalar => f.write_str("Scalar"),
            FieldKind::ToOne(schema) => write!(f, "ToOne({})", schema.name),
            FieldKind::ToMany(schema) => write!(f, "ToMany({})", schema.name),
        }
    }
}

/// A declared field of an entity.
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    /// Field name as it appears in JSON output.
    pub name: &'static str,
    /// Scalar or relation.
    pub kind: FieldKind,
}

impl FieldDef {
    /// Declares a scalar field.
    pub const fn scalar(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Scalar,
        }
    }

    /// Declares a to-one relation.
    pub const fn to_one(name: &'static str, target: &'static EntitySchema) -> Self {
        Self {
            name,
            kind: FieldKind::ToOne(target),
        }
    }

    /// Declares a to-many relation.
    pub const fn to_many(name: &'static str, target: &'static EntitySchema) -> Self {
        Self {
            name,
            kind: FieldKind::ToMany(target),
        }
    }
}

/// Static description of an entity's serializable shape.
#[derive(Debug)]
pub struct EntitySchema {
    /// Entity name, used in error messages.
    pub name: &'static str,
    /// Fields in output order.
    pub fields: &'static [FieldDef],
    /// Dotted `relation.field` paths dropped from default nested output.
    pub nested_exclusions: &'static [&'static str],
}

impl EntitySchema {
    /// Looks up a declared field by name.
    pub fn field(&self, name: &str) -> Option<&'static FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    fn exclusions_below(&self, relation: &str) -> Vec<&'static str> {
        self.nested_exclusions
            .iter()
            .filter_map(|path| {
                path.split_once('.')
                    .filter(|(head, _)| *head == relation)
                    .map(|(_, rest)| rest)
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Slot {
    Scalar(Value),
    One(Record),
    Many(Vec<Record>),
}

/// Loaded values of one entity instance.
///
/// Relations that were not loaded are simply absent and never appear in
/// projected output.
#[derive(Debug, Clone)]
pub struct Record {
    schema: &'static EntitySchema,
    values: BTreeMap<&'static str, Slot>,
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.schema, other.schema) && self.values == other.values
    }
}

impl Record {
    /// Starts an empty record for the given schema.
    pub fn new(schema: &'static EntitySchema) -> Self {
        Self {
            schema,
            values: BTreeMap::new(),
        }
    }

    /// The schema this record was built for.
    pub fn schema(&self) -> &'static EntitySchema {
        self.schema
    }

    /// Sets a scalar value.
    pub fn with_scalar(mut self, name: &'static str, value: impl Into<Value>) -> Self {
        self.values.insert(name, Slot::Scalar(value.into()));
        self
    }

    /// Attaches a loaded to-one relation.
    pub fn with_one(mut self, name: &'static str, record: Record) -> Self {
        self.values.insert(name, Slot::One(record));
        self
    }

    /// Attaches a loaded to-many relation.
    pub fn with_many(mut self, name: &'static str, records: Vec<Record>) -> Self {
        self.values.insert(name, Slot::Many(records));
        self
    }
}

/// Renders `record` as a JSON object.
///
/// With `only = None` every declared field that was loaded is rendered.
/// Otherwise only the listed fields and paths are.
///
/// # Errors
///
/// Returns [`ProjectionError`] if the allow-list names an undeclared field or
/// steps through a scalar.
pub fn project(record: &Record, only: Option<&[&str]>) -> Result<Value, ProjectionError> {
    render(record, only, &[])
}

fn render(
    record: &Record,
    only: Option<&[&str]>,
    excluded: &[&str],
) -> Result<Value, ProjectionError> {
    let schema = record.schema;
    let selection = match only {
        Some(paths) => select(schema, paths)?,
        None => schema
            .fields
            .iter()
            .filter(|f| !excluded.contains(&f.name))
            .map(|f| (f, None))
            .collect(),
    };

    let mut out = Map::new();
    for (field, nested_only) in selection {
        let Some(slot) = record.values.get(field.name) else {
            continue;
        };
        let nested_excluded = schema.exclusions_below(field.name);
        let value = match slot {
            Slot::Scalar(value) => value.clone(),
            Slot::One(child) => render(child, nested_only.as_deref(), &nested_excluded)?,
            Slot::Many(children) => Value::Array(
                children
                    .iter()
                    .map(|child| render(child, nested_only.as_deref(), &nested_excluded))
                    .collect::<Result<_, _>>()?,
            ),
        };
        out.insert(field.name.to_string(), value);
    }

    Ok(Value::Object(out))
}

type Selection<'a> = Vec<(&'static FieldDef, Option<Vec<&'a str>>)>;

/// Groups allow-list paths by their first segment, in schema order.
///
/// A plain relation name selects the whole relation even when dotted paths
/// under the same relation are also listed.
fn select<'a>(
    schema: &'static EntitySchema,
    paths: &[&'a str],
) -> Result<Selection<'a>, ProjectionError> {
    let mut nested: BTreeMap<&'static str, Option<Vec<&'a str>>> = BTreeMap::new();

    for path in paths {
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (*path, None),
        };

        let field = schema
            .field(head)
            .ok_or_else(|| ProjectionError::UnknownField {
                entity: schema.name,
                field: head.to_string(),
            })?;

        let entry = nested.entry(field.name).or_insert_with(|| Some(Vec::new()));
        match rest {
            None => *entry = None,
            Some(rest) => {
                if field.kind.target().is_none() {
                    return Err(ProjectionError::NotARelation {
                        entity: schema.name,
                        field: head.to_string(),
                    });
                }
                if let Some(paths) = entry {
                    paths.push(rest);
                }
            }
        }
    }

    Ok(schema
        .fields
        .iter()
        .filter_map(|f| nested.remove(f.name).map(|sub| (f, sub)))
        .collect())
}
