//! Option mappings and deep merge
//!
//! Options are arbitrary JSON mappings. Merging never replaces the mapping
//! itself: nested mappings merge recursively, everything else (arrays,
//! scalars, null) is replaced wholesale by the later value.

use serde_json::{Map, Value};
use thiserror::Error;

/// A component's option mapping
pub type Options = Map<String, Value>;

/// Option payload errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionsError {
    /// The payload was not a JSON object
    #[error("options must be a mapping, found {found}")]
    NotAMapping { found: &'static str },
}

/// Deep-merge `partial` into `current` in place
pub fn merge(current: &mut Options, partial: &Options) {
    for (key, value) in partial {
        match (current.get_mut(key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                merge(existing, incoming);
            }
            _ => {
                current.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Deep-merge several partials in order; later keys win
pub fn merge_all<'a>(current: &mut Options, partials: impl IntoIterator<Item = &'a Options>) {
    for partial in partials {
        merge(current, partial);
    }
}

/// Accept a JSON value only if it is a mapping
pub fn options_from_value(value: Value) -> Result<Options, OptionsError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(OptionsError::NotAMapping {
            found: kind_of(&other),
        }),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
