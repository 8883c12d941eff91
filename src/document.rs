//! Config document handling.
//! Decodes the stored file, overwrites exactly one field with the new color,
//! and re-encodes it as pretty JSON with a trailing newline.
//! Key order is kept (serde_json `preserve_order`), so a commit only diffs the touched line.

use anyhow::{Context, Result, bail};
use base64::{Engine as _, engine::general_purpose};
use serde_json::{Map, Value};

/// Which field of the document receives the color.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldTarget {
    /// Top-level key, shallow-merged over the document.
    Flat(String),
    /// Dotted path; missing or non-object intermediates are replaced by fresh objects.
    Nested(Vec<String>),
}

impl FieldTarget {
    pub fn nested(path: &str) -> Self {
        FieldTarget::Nested(path.split('.').map(str::to_string).collect())
    }

    /// Value currently stored at the target, if any.
    pub fn current<'a>(&self, document: &'a Map<String, Value>) -> Option<&'a Value> {
        match self {
            FieldTarget::Flat(key) => document.get(key),
            FieldTarget::Nested(path) => get_path(document, path),
        }
    }

    /// Overwrites the target field with `color`, leaving everything else untouched.
    pub fn apply(&self, document: &mut Map<String, Value>, color: &str) {
        match self {
            FieldTarget::Flat(key) => {
                document.insert(key.clone(), Value::String(color.to_string()));
            }
            FieldTarget::Nested(path) => set_path(document, path, Value::String(color.to_string())),
        }
    }
}

impl std::fmt::Display for FieldTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldTarget::Flat(key) => write!(f, "{}", key),
            FieldTarget::Nested(path) => write!(f, "{}", path.join(".")),
        }
    }
}

/// Assigns `value` at `path`, creating (or clobbering) intermediate objects on the way.
pub fn set_path(object: &mut Map<String, Value>, path: &[String], value: Value) {
    let Some((leaf, parents)) = path.split_last() else {
        return;
    };

    let mut cursor = object;
    for key in parents {
        let slot = cursor
            .entry(key.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        cursor = match slot {
            Value::Object(map) => map,
            _ => unreachable!("slot was just made an object"),
        };
    }
    cursor.insert(leaf.clone(), value);
}

/// Reads the value at `path`, if every step along it is an object.
pub fn get_path<'a>(object: &'a Map<String, Value>, path: &[String]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    rest.iter()
        .try_fold(object.get(first)?, |value, key| value.as_object()?.get(key))
}

/// Turns a base64 `content` field (line breaks allowed) into a JSON object.
pub fn decode_content(content: &str) -> Result<Map<String, Value>> {
    let compact: String = content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = general_purpose::STANDARD
        .decode(compact)
        .context("File content is not valid base64")?;
    let text = String::from_utf8(bytes).context("File content is not valid UTF-8")?;

    match serde_json::from_str(&text).context("Stored file is not valid JSON")? {
        Value::Object(map) => Ok(map),
        other => bail!("Stored file is not a JSON object (found {})", kind(&other)),
    }
}

/// Pretty JSON (two-space indent) plus a trailing newline.
pub fn render(document: &Map<String, Value>) -> Result<String> {
    let mut text = serde_json::to_string_pretty(document).context("Failed to serialize document")?;
    text.push('\n');
    Ok(text)
}

pub fn encode_content(document: &Map<String, Value>) -> Result<String> {
    Ok(general_purpose::STANDARD.encode(render(document)?))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn test_flat_target_overwrites_single_key() {
        let mut doc = object(json!({"name": "Mini", "statusBarBgColor": "#000", "tabs": [1, 2]}));
        FieldTarget::Flat("statusBarBgColor".into()).apply(&mut doc, "#112233");
        assert_eq!(
            Value::Object(doc),
            json!({"name": "Mini", "statusBarBgColor": "#112233", "tabs": [1, 2]})
        );
    }

    #[test]
    fn test_flat_target_adds_missing_key() {
        let mut doc = object(json!({"name": "Mini"}));
        FieldTarget::Flat("statusBarBgColor".into()).apply(&mut doc, "red");
        assert_eq!(Value::Object(doc), json!({"name": "Mini", "statusBarBgColor": "red"}));
    }

    #[test]
    fn test_nested_target_creates_path_in_empty_document() {
        let mut doc = Map::new();
        FieldTarget::nested("a.b.c").apply(&mut doc, "C");
        assert_eq!(Value::Object(doc), json!({"a": {"b": {"c": "C"}}}));
    }

    #[test]
    fn test_nested_target_discards_scalar_on_path() {
        let mut doc = object(json!({"a": 5}));
        FieldTarget::nested("a.b.c").apply(&mut doc, "C");
        assert_eq!(Value::Object(doc), json!({"a": {"b": {"c": "C"}}}));
    }

    #[test]
    fn test_nested_target_keeps_siblings() {
        let mut doc = object(json!({
            "statusBar": {
                "height": 44,
                "theme": {
                    "dark": {"backgroundColor": "#111"},
                    "light": {"backgroundColor": "#fff", "textColor": "#000"}
                }
            },
            "version": 3
        }));
        FieldTarget::nested("statusBar.theme.light.backgroundColor").apply(&mut doc, "#abcdef");
        assert_eq!(
            Value::Object(doc),
            json!({
                "statusBar": {
                    "height": 44,
                    "theme": {
                        "dark": {"backgroundColor": "#111"},
                        "light": {"backgroundColor": "#abcdef", "textColor": "#000"}
                    }
                },
                "version": 3
            })
        );
    }

    #[test]
    fn test_apply_is_idempotent() {
        for target in [FieldTarget::Flat("k".into()), FieldTarget::nested("x.y")] {
            let mut once = object(json!({"k": 1, "x": {"z": true}}));
            target.apply(&mut once, "blue");
            let mut twice = once.clone();
            target.apply(&mut twice, "blue");
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_current_reads_target() {
        let doc = object(json!({"k": "old", "a": {"b": "deep"}}));
        assert_eq!(FieldTarget::Flat("k".into()).current(&doc), Some(&json!("old")));
        assert_eq!(FieldTarget::nested("a.b").current(&doc), Some(&json!("deep")));
        assert_eq!(FieldTarget::nested("a.b.c").current(&doc), None);
    }

    #[test]
    fn test_get_path() {
        let doc = object(json!({"a": {"b": {"c": "C"}}, "n": 1}));
        let path = |p: &str| p.split('.').map(str::to_string).collect::<Vec<_>>();
        assert_eq!(get_path(&doc, &path("a.b.c")), Some(&json!("C")));
        assert_eq!(get_path(&doc, &path("a.b")), Some(&json!({"c": "C"})));
        assert_eq!(get_path(&doc, &path("n.x")), None);
        assert_eq!(get_path(&doc, &path("missing")), None);
        assert_eq!(get_path(&doc, &[]), None);
    }

    #[test]
    fn test_render_is_pretty_with_trailing_newline_and_keeps_order() {
        let doc = object(json!({"zeta": 1, "alpha": {"b": "x"}}));
        assert_eq!(
            render(&doc).unwrap(),
            "{\n  \"zeta\": 1,\n  \"alpha\": {\n    \"b\": \"x\"\n  }\n}\n"
        );
    }

    #[test]
    fn test_decode_content_handles_wrapped_base64() {
        let encoded = general_purpose::STANDARD.encode(r##"{"statusBarBgColor":"#000"}"##);
        let (head, tail) = encoded.split_at(10);
        let wrapped = format!("{}\n{}\n", head, tail);
        let doc = decode_content(&wrapped).unwrap();
        assert_eq!(Value::Object(doc), json!({"statusBarBgColor": "#000"}));
    }

    #[test]
    fn test_decode_content_rejects_bad_payloads() {
        assert!(decode_content("!!!not base64").is_err());

        let not_json = general_purpose::STANDARD.encode("{oops");
        assert!(decode_content(&not_json).is_err());

        let array = general_purpose::STANDARD.encode("[1,2,3]");
        let err = decode_content(&array).unwrap_err();
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_encode_content_decodes_back_to_rendered_text() {
        let doc = object(json!({"statusBarBgColor": "#112233"}));
        let encoded = encode_content(&doc).unwrap();
        let text = String::from_utf8(general_purpose::STANDARD.decode(encoded).unwrap()).unwrap();
        assert_eq!(text, "{\n  \"statusBarBgColor\": \"#112233\"\n}\n");
    }
}
