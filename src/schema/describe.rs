//! JSON-Schema-like description of a record schema
//!
//! The only consumer of field metadata (titles, descriptions, examples).

use serde_json::{json, Map, Value as Json};

use super::model::RecordSchema;
use super::types::{Constraints, FieldSpec, FieldType};

impl RecordSchema {
    /// Describes the schema as a JSON document.
    ///
    /// Fields appear in declaration order. Nested records are described
    /// inline.
    pub fn describe(&self) -> Json {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for spec in self.fields() {
            if spec.is_required() {
                required.push(Json::String(spec.input_key().to_string()));
            }
            properties.insert(spec.input_key().to_string(), describe_field(spec));
        }

        let mut doc = Map::new();
        doc.insert("title".into(), json!(self.name()));
        if let Some(description) = self.description() {
            doc.insert("description".into(), json!(description));
        }
        doc.insert("type".into(), json!("object"));
        doc.insert("properties".into(), Json::Object(properties));
        doc.insert("required".into(), Json::Array(required));

        let computed: Vec<_> = self.computed_fields().map(|c| json!(c.name())).collect();
        if !computed.is_empty() {
            doc.insert("computed".into(), Json::Array(computed));
        }

        Json::Object(doc)
    }
}

fn describe_field(spec: &FieldSpec) -> Json {
    let mut out = match describe_type(spec.field_type()) {
        Json::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("type".into(), other);
            map
        }
    };

    let meta = spec.meta();
    if let Some(title) = &meta.title {
        out.insert("title".into(), json!(title));
    }
    if let Some(description) = &meta.description {
        out.insert("description".into(), json!(description));
    }
    if !meta.examples.is_empty() {
        out.insert(
            "examples".into(),
            Json::Array(meta.examples.iter().map(|v| v.to_json()).collect()),
        );
    }
    if let Some(default) = spec.default_value() {
        out.insert("default".into(), default.to_json());
    }
    if spec.is_strict() {
        out.insert("strict".into(), json!(true));
    }

    describe_constraints(spec.field_type(), spec.constraints(), &mut out);
    Json::Object(out)
}

fn describe_type(field_type: &FieldType) -> Json {
    match field_type {
        FieldType::Str => json!({"type": "string"}),
        FieldType::Int => json!({"type": "integer"}),
        FieldType::Float => json!({"type": "number"}),
        FieldType::Bool => json!({"type": "boolean"}),
        FieldType::Date => json!({"type": "string", "format": "date"}),
        FieldType::Email => json!({"type": "string", "format": "email"}),
        FieldType::Url => json!({"type": "string", "format": "uri"}),
        FieldType::List(inner) => json!({"type": "array", "items": describe_type(inner)}),
        FieldType::Dict(inner) => json!({"type": "object", "additionalProperties": describe_type(inner)}),
        FieldType::Optional(inner) => json!({"anyOf": [describe_type(inner), {"type": "null"}]}),
        FieldType::Record(schema) => schema.describe(),
        FieldType::Any => json!({}),
    }
}

fn describe_constraints(field_type: &FieldType, c: &Constraints, out: &mut Map<String, Json>) {
    let (min_key, max_key) = match field_type.innermost() {
        FieldType::List(_) => ("minItems", "maxItems"),
        FieldType::Dict(_) => ("minProperties", "maxProperties"),
        FieldType::Int => ("minDigits", "maxDigits"),
        _ => ("minLength", "maxLength"),
    };
    if let Some(n) = c.min_length {
        out.insert(min_key.into(), json!(n));
    }
    if let Some(n) = c.max_length {
        out.insert(max_key.into(), json!(n));
    }

    let bounds = [
        ("exclusiveMinimum", &c.gt),
        ("minimum", &c.ge),
        ("exclusiveMaximum", &c.lt),
        ("maximum", &c.le),
    ];
    for (key, bound) in bounds {
        if let Some(bound) = bound {
            out.insert(key.into(), bound.to_json());
        }
    }

    if let Some(allowed) = &c.one_of {
        out.insert("enum".into(), Json::Array(allowed.iter().map(|v| v.to_json()).collect()));
    }
    if let Some(pattern) = &c.pattern {
        out.insert("pattern".into(), json!(pattern.as_str()));
    }
    if let Some(format) = c.format {
        out.insert("format".into(), json!(format.as_str()));
    }
}
