//! JSON encoding of the cache snapshot.
//!
//! Decoding is the schema check: every required field must be present with the
//! right type, report ranges must carry `line`, `column` and `raw` on both
//! ends, and report data may only hold primitives. Encoding drops multi-file
//! suggestions, so `encode(decode(encode(x)))` equals `encode(x)`.

use crate::{CacheError, CacheSnapshot};

/// Encodes a snapshot as JSON.
pub fn encode(snapshot: &CacheSnapshot) -> Result<String, CacheError> {
    serde_json::to_string(snapshot).map_err(|e| CacheError::serialization(e.to_string()))
}

/// Decodes a snapshot from JSON.
pub fn decode(payload: &str) -> Result<CacheSnapshot, CacheError> {
    serde_json::from_str(payload).map_err(|e| CacheError::invalid(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};
    use std::path::PathBuf;

    use lintel_ast::{Position, Range, Span};
    use lintel_plugin::{
        Diagnostic, Fix, FileSuggestion, MultiFileSuggestion, Report, RuleAbout, RuleMessage,
        Suggestion,
    };
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::FileCacheEntry;

    fn report(suggestions: Vec<Suggestion>) -> Report {
        let data = BTreeMap::from([("name".to_string(), "x".into())]);
        Report {
            about: RuleAbout::new("no-unused"),
            message: RuleMessage::new("'{{ name }}' is unused.")
                .with_suggestion("Remove it.")
                .resolve(&data),
            range: Range::new(Position::new(0, 4, 4), Position::new(0, 5, 5)),
            fix: Some(vec![Fix::delete(Span::new(0, 7))]),
            suggestions: (!suggestions.is_empty()).then_some(suggestions),
            data: Some(data),
            dependencies: None,
        }
    }

    fn snapshot(suggestions: Vec<Suggestion>) -> CacheSnapshot {
        let entry = FileCacheEntry::from_results(
            10,
            vec![PathBuf::from("src/b.ts")],
            vec![Diagnostic::new("Unexpected token").with_code("TS1005")],
            vec![report(suggestions)],
        );
        CacheSnapshot {
            configs: BTreeMap::from([
                (PathBuf::from("lintel.json"), 3),
                (PathBuf::from("package.json"), 2),
            ]),
            files: BTreeMap::from([
                (PathBuf::from("src/a.ts"), entry),
                (PathBuf::from("src/b.ts"), FileCacheEntry::new(10)),
            ]),
        }
    }

    fn remove_suggestion() -> Suggestion {
        FileSuggestion::new("remove", Span::new(0, 7), "").into()
    }

    fn rename_suggestion() -> Suggestion {
        MultiFileSuggestion::new("rename", || {
            BTreeMap::from([(PathBuf::from("src/b.ts"), vec![Fix::insert(0, "y")])])
        })
        .into()
    }

    #[test]
    fn test_round_trip_with_file_suggestions() {
        let original = snapshot(vec![remove_suggestion()]);
        let decoded = decode(&encode(&original).unwrap()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_multi_file_suggestions_are_dropped() {
        let original = snapshot(vec![remove_suggestion(), rename_suggestion()]);

        let encoded = encode(&original).unwrap();
        let decoded = decode(&encoded).unwrap();

        let suggestions = decoded.files[&PathBuf::from("src/a.ts")].reports()[0]
            .suggestions
            .clone()
            .unwrap();
        assert_eq!(suggestions, vec![remove_suggestion()]);
        assert_eq!(encode(&decoded).unwrap(), encoded);
    }

    #[test]
    fn test_only_multi_file_suggestions_are_omitted() {
        let original = snapshot(vec![rename_suggestion()]);

        let encoded = encode(&original).unwrap();
        let decoded = decode(&encoded).unwrap();

        let json: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        let report = json["files"]["src/a.ts"]["reports"][0].as_object().unwrap();
        assert!(!report.contains_key("suggestions"));
        assert!(decoded.files[&PathBuf::from("src/a.ts")].reports()[0]
            .suggestions
            .is_none());
        assert_eq!(encode(&decoded).unwrap(), encoded);
    }

    #[test]
    fn test_persisted_shape() {
        let encoded = encode(&snapshot(vec![remove_suggestion()])).unwrap();
        let json: serde_json::Value = serde_json::from_str(&encoded).unwrap();

        let entry = &json["files"]["src/a.ts"];
        assert_eq!(entry["timestamp"], 10);
        assert_eq!(entry["dependencies"][0], "src/b.ts");
        assert_eq!(entry["diagnostics"][0]["code"], "TS1005");

        let report = &entry["reports"][0];
        assert_eq!(report["about"]["id"], "no-unused");
        assert_eq!(report["message"]["primary"], "'x' is unused.");
        assert_eq!(report["range"]["begin"]["raw"], 4);
        assert_eq!(report["fix"][0]["range"]["end"], 7);
        assert_eq!(report["suggestions"][0]["id"], "remove");
        assert_eq!(report["data"]["name"], "x");

        let keys: BTreeSet<&str> = json["configs"]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, BTreeSet::from(["lintel.json", "package.json"]));
    }

    #[rstest]
    #[case::not_json("{")]
    #[case::missing_configs(r#"{"files": {}}"#)]
    #[case::missing_files(r#"{"configs": {}}"#)]
    #[case::configs_wrong_type(r#"{"configs": {"lintel.json": "3"}, "files": {}}"#)]
    #[case::missing_timestamp(r#"{"configs": {}, "files": {"a.js": {}}}"#)]
    #[case::range_missing_raw(
        r#"{"configs": {}, "files": {"a.js": {"timestamp": 1, "reports": [{
            "about": {"id": "r"},
            "message": {"primary": "p", "secondary": [], "suggestions": []},
            "range": {"begin": {"line": 0, "column": 0}, "end": {"line": 0, "column": 1, "raw": 1}}
        }]}}}"#
    )]
    #[case::range_missing_end(
        r#"{"configs": {}, "files": {"a.js": {"timestamp": 1, "reports": [{
            "about": {"id": "r"},
            "message": {"primary": "p", "secondary": [], "suggestions": []},
            "range": {"begin": {"line": 0, "column": 0, "raw": 0}}
        }]}}}"#
    )]
    #[case::nested_data(
        r#"{"configs": {}, "files": {"a.js": {"timestamp": 1, "reports": [{
            "about": {"id": "r"},
            "message": {"primary": "p", "secondary": [], "suggestions": []},
            "range": {"begin": {"line": 0, "column": 0, "raw": 0}, "end": {"line": 0, "column": 1, "raw": 1}},
            "data": {"nested": {"a": 1}}
        }]}}}"#
    )]
    #[case::message_missing_secondary(
        r#"{"configs": {}, "files": {"a.js": {"timestamp": 1, "reports": [{
            "about": {"id": "r"},
            "message": {"primary": "p", "suggestions": []},
            "range": {"begin": {"line": 0, "column": 0, "raw": 0}, "end": {"line": 0, "column": 1, "raw": 1}}
        }]}}}"#
    )]
    fn test_decode_rejects_schema_violations(#[case] payload: &str) {
        assert!(matches!(decode(payload), Err(CacheError::Invalid(_))));
    }

    #[test]
    fn test_decode_minimal_report() {
        let payload = r#"{"configs": {"lintel.json": 1}, "files": {"a.js": {"timestamp": 1, "reports": [{
            "about": {"id": "r"},
            "message": {"primary": "p", "secondary": [], "suggestions": []},
            "range": {"begin": {"line": 0, "column": 0, "raw": 0}, "end": {"line": 0, "column": 1, "raw": 1}},
            "data": {"flag": true, "count": 2, "name": "n"}
        }]}}}"#;

        let snapshot = decode(payload).unwrap();
        let report = &snapshot.files[&PathBuf::from("a.js")].reports()[0];
        assert_eq!(report.about.id, "r");
        assert_eq!(report.data.as_ref().unwrap().len(), 3);
    }
}
