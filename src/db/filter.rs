//! Document query semantics shared by every store backend.
//!
//! Filter, sort, and projection clauses arrive as opaque documents. This module
//! gives them one meaning so the in-memory and SQLite stores agree.

use super::{Document, FindOptions, Value};
use crate::error::{DynuiError, Result};
use std::cmp::Ordering;

/// Applies the full find pipeline: filter, sort, skip, limit, projection.
pub fn apply_find(docs: Vec<Document>, options: &FindOptions) -> Result<Vec<Document>> {
    let mut matched = Vec::with_capacity(docs.len());
    for doc in docs {
        let keep = match &options.filter {
            Some(filter) => matches(&doc, filter)?,
            None => true,
        };
        if keep {
            matched.push(doc);
        }
    }

    if let Some(sort) = &options.sort {
        sort_documents(&mut matched, sort)?;
    }

    let saturate = |n: u64| usize::try_from(n).unwrap_or(usize::MAX);
    let skip = options.skip.map_or(0, saturate);
    let limit = options.limit.map_or(usize::MAX, saturate);
    let window = matched.into_iter().skip(skip).take(limit);

    match &options.projection {
        Some(projection) => {
            let projection = Projection::parse(projection)?;
            Ok(window.map(|doc| projection.apply(doc)).collect())
        }
        None => Ok(window.collect()),
    }
}

/// Returns true if the document satisfies every clause of the filter.
pub fn matches(doc: &Document, filter: &Document) -> Result<bool> {
    for (key, condition) in filter.iter() {
        let ok = match key {
            "$and" => sub_filters(key, condition)?
                .iter()
                .try_fold(true, |acc, f| Ok::<_, DynuiError>(acc && matches(doc, f)?))?,
            "$or" => {
                let mut any = false;
                for f in sub_filters(key, condition)? {
                    if matches(doc, f)? {
                        any = true;
                        break;
                    }
                }
                any
            }
            "$nor" => {
                let mut none = true;
                for f in sub_filters(key, condition)? {
                    if matches(doc, f)? {
                        none = false;
                        break;
                    }
                }
                none
            }
            op if op.starts_with('$') => {
                return Err(DynuiError::store(format!("unknown top-level operator: {op}")));
            }
            path => field_matches(doc.get_path(path), condition)?,
        };
        if !ok {
            return Ok(false);
        }
    }
    Ok(true)
}

fn sub_filters<'a>(op: &str, condition: &'a Value) -> Result<Vec<&'a Document>> {
    let items = condition
        .as_array()
        .ok_or_else(|| DynuiError::store(format!("{op} expects an array of filters")))?;
    items
        .iter()
        .map(|item| {
            item.as_document()
                .ok_or_else(|| DynuiError::store(format!("{op} entries must be documents")))
        })
        .collect()
}

/// Operator documents are objects whose keys all start with `$`.
fn is_operator_document(doc: &Document) -> bool {
    !doc.is_empty() && doc.keys().all(|k| k.starts_with('$'))
}

fn field_matches(field: Option<&Value>, condition: &Value) -> Result<bool> {
    match condition {
        Value::Object(ops) if is_operator_document(ops) => {
            for (op, operand) in ops.iter() {
                if !apply_operator(field, op, operand)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        literal => Ok(equals(field, literal)),
    }
}

/// Equality with array-membership semantics: `{tags: "a"}` matches `tags: ["a", "b"]`.
fn equals(field: Option<&Value>, expected: &Value) -> bool {
    match field {
        None => expected.is_null(),
        Some(actual) => {
            if actual.loosely_equals(expected) {
                return true;
            }
            match actual {
                Value::Array(items) => items.iter().any(|item| item.loosely_equals(expected)),
                _ => false,
            }
        }
    }
}

fn ordered(field: Option<&Value>, operand: &Value, accept: fn(Ordering) -> bool) -> bool {
    let Some(actual) = field else {
        return false;
    };
    let check = |v: &Value| match (v, operand) {
        // Ordering never crosses types; null only compares through $eq/$ne
        (Value::Null, _) | (_, Value::Null) => false,
        _ => v.compare(operand).is_some_and(accept),
    };
    match actual {
        Value::Array(items) => items.iter().any(check),
        other => check(other),
    }
}

fn apply_operator(field: Option<&Value>, op: &str, operand: &Value) -> Result<bool> {
    let result = match op {
        "$eq" => equals(field, operand),
        "$ne" => !equals(field, operand),
        "$gt" => ordered(field, operand, |o| o == Ordering::Greater),
        "$gte" => ordered(field, operand, |o| o != Ordering::Less),
        "$lt" => ordered(field, operand, |o| o == Ordering::Less),
        "$lte" => ordered(field, operand, |o| o != Ordering::Greater),
        "$in" => {
            let candidates = operand
                .as_array()
                .ok_or_else(|| DynuiError::store("$in expects an array"))?;
            candidates.iter().any(|c| equals(field, c))
        }
        "$nin" => {
            let candidates = operand
                .as_array()
                .ok_or_else(|| DynuiError::store("$nin expects an array"))?;
            !candidates.iter().any(|c| equals(field, c))
        }
        "$exists" => field.is_some() == operand.is_truthy(),
        other => return Err(DynuiError::store(format!("unknown operator: {other}"))),
    };
    Ok(result)
}

/// Sorts documents by the keys of the sort spec, in key order.
///
/// Directions are `1` (ascending) or `-1` (descending). Missing fields sort first.
pub fn sort_documents(docs: &mut [Document], sort: &Document) -> Result<()> {
    let mut keys = Vec::with_capacity(sort.len());
    for (field, direction) in sort.iter() {
        let descending = match direction.as_f64() {
            Some(d) if d > 0.0 => false,
            Some(d) if d < 0.0 => true,
            _ => {
                return Err(DynuiError::store(format!(
                    "invalid sort direction for '{field}': {direction}"
                )))
            }
        };
        keys.push((field, descending));
    }

    docs.sort_by(|a, b| {
        for (field, descending) in &keys {
            let ord = compare_fields(a.get_path(field), b.get_path(field));
            let ord = if *descending { ord.reverse() } else { ord };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
    Ok(())
}

fn compare_fields(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => x
            .compare(y)
            .unwrap_or_else(|| type_rank(x).cmp(&type_rank(y))),
    }
}

/// Cross-type ordering: null < numbers < strings < objects < arrays < booleans.
fn type_rank(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::Int(_) | Value::Float(_) => 1,
        Value::String(_) => 2,
        Value::Object(_) => 3,
        Value::Array(_) => 4,
        Value::Bool(_) => 5,
    }
}

#[derive(Debug)]
enum Projection {
    Include { fields: Vec<String>, keep_id: bool },
    Exclude(Vec<String>),
}

impl Projection {
    fn parse(spec: &Document) -> Result<Self> {
        let mut include = Vec::new();
        let mut exclude = Vec::new();
        let mut keep_id = true;

        for (field, flag) in spec.iter() {
            if field == "_id" {
                keep_id = flag.is_truthy();
                continue;
            }
            if flag.is_truthy() {
                include.push(field.to_string());
            } else {
                exclude.push(field.to_string());
            }
        }

        match (include.is_empty(), exclude.is_empty()) {
            (false, false) => Err(DynuiError::store(
                "projection cannot mix inclusion and exclusion",
            )),
            (false, true) => Ok(Self::Include {
                fields: include,
                keep_id,
            }),
            (true, _) => {
                if !keep_id {
                    exclude.push("_id".to_string());
                }
                Ok(Self::Exclude(exclude))
            }
        }
    }

    fn apply(&self, doc: Document) -> Document {
        match self {
            Self::Include { fields, keep_id } => doc
                .into_iter()
                .filter(|(k, _)| (*keep_id && k == "_id") || fields.iter().any(|f| f == k))
                .collect(),
            Self::Exclude(fields) => doc
                .into_iter()
                .filter(|(k, _)| !fields.iter().any(|f| f == k))
                .collect(),
        }
    }
}
