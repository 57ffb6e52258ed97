// =============================================================================
// SPARQL 1.1 Query Results JSON
// =============================================================================
// Wire types for the document returned by the upstream endpoint. They are
// decoded and re-encoded without interpretation.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Treats an explicit `null` like an absent member.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A SPARQL results document (`application/sparql-results+json`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SparqlResults {
    #[serde(default, deserialize_with = "null_as_default")]
    pub head: Head,
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Results,
    /// Answer of an ASK query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boolean: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Head {
    #[serde(default, deserialize_with = "null_as_default")]
    pub link: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vars: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Results {
    /// One map per solution row, keyed by variable name in the order received.
    #[serde(default, deserialize_with = "null_as_default")]
    pub bindings: Vec<IndexMap<String, Binding>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub distinct: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ordered: bool,
}

/// A single variable binding inside a solution row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    /// `uri`, `literal`, `typed-literal` or `bnode`.
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(
        rename = "xml:lang",
        alias = "lang",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
}

impl SparqlResults {
    pub fn row_count(&self) -> usize {
        self.results.bindings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_dbpedia_document() {
        let doc = json!({
            "head": { "link": [], "vars": ["city", "name"] },
            "results": {
                "distinct": false,
                "ordered": true,
                "bindings": [{
                    "city": { "type": "uri", "value": "http://dbpedia.org/resource/Berlin" },
                    "name": { "type": "literal", "xml:lang": "de", "value": "Berlin" }
                }]
            }
        });

        let results: SparqlResults = serde_json::from_value(doc).unwrap();
        assert_eq!(results.head.vars, vec!["city", "name"]);
        assert_eq!(results.row_count(), 1);
        let row = &results.results.bindings[0];
        assert_eq!(row.keys().collect::<Vec<_>>(), vec!["city", "name"]);
        assert_eq!(row["name"].lang.as_deref(), Some("de"));
        assert_eq!(row["city"].kind, "uri");
        assert!(results.results.ordered);
        assert_eq!(results.boolean, None);
    }

    #[test]
    fn missing_members_default() {
        let results: SparqlResults = serde_json::from_str(r#"{"head":{},"boolean":true}"#).unwrap();
        assert!(results.head.vars.is_empty());
        assert!(results.results.bindings.is_empty());
        assert_eq!(results.boolean, Some(true));
    }

    #[test]
    fn null_members_decode_as_empty() {
        let doc = r#"{
            "head": { "link": null, "vars": ["x"] },
            "results": {
                "distinct": null,
                "ordered": null,
                "bindings": [
                    { "x": { "type": "literal", "value": "a", "xml:lang": null, "datatype": null } }
                ]
            }
        }"#;

        let results: SparqlResults = serde_json::from_str(doc).unwrap();
        assert!(results.head.link.is_empty());
        assert_eq!(results.head.vars, vec!["x"]);
        assert!(!results.results.distinct);
        let binding = &results.results.bindings[0]["x"];
        assert_eq!(binding.lang, None);
        assert_eq!(binding.datatype, None);

        let results: SparqlResults =
            serde_json::from_str(r#"{"head":null,"results":{"bindings":null}}"#).unwrap();
        assert_eq!(results, SparqlResults::default());
    }

    #[test]
    fn binding_without_type_or_value_decodes_empty() {
        let results: SparqlResults =
            serde_json::from_str(r#"{"results":{"bindings":[{"x":{"type":"bnode"}},{"y":{}}]}}"#)
                .unwrap();
        assert_eq!(results.row_count(), 2);

        let bnode = &results.results.bindings[0]["x"];
        assert_eq!(bnode.kind, "bnode");
        assert_eq!(bnode.value, "");

        let bare = &results.results.bindings[1]["y"];
        assert_eq!(bare.kind, "");
        assert_eq!(bare.value, "");
    }

    #[test]
    fn optional_binding_members_are_omitted() {
        let binding = Binding {
            kind: "typed-literal".to_string(),
            value: "42".to_string(),
            lang: None,
            datatype: Some("http://www.w3.org/2001/XMLSchema#integer".to_string()),
        };
        let value = serde_json::to_value(&binding).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "typed-literal",
                "value": "42",
                "datatype": "http://www.w3.org/2001/XMLSchema#integer"
            })
        );
    }

    #[test]
    fn lang_alias_is_accepted() {
        let binding: Binding =
            serde_json::from_str(r#"{"type":"literal","value":"Wien","lang":"de"}"#).unwrap();
        assert_eq!(binding.lang.as_deref(), Some("de"));
        let value = serde_json::to_value(&binding).unwrap();
        assert_eq!(value["xml:lang"], "de");
    }
}
