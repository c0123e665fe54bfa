use super::*;
use camino::Utf8PathBuf;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    path: Utf8PathBuf,
}

impl Fixture {
    fn new(files: &[(&str, &str)]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        for (name, contents) in files {
            std::fs::write(path.join(name), contents).unwrap();
        }
        Self { _dir: dir, path }
    }

    fn source(&self, policy: ParseFailurePolicy) -> DocumentSource {
        DocumentSource::new(self.path.clone(), policy)
    }
}

fn records(documents: &[LoadedDocument]) -> Value {
    Value::Array(
        documents
            .iter()
            .map(|document| Value::Object(document.record.clone()))
            .collect(),
    )
}

#[test]
fn loads_single_document() {
    let fixture = Fixture::new(&[("doc1.yaml", "title: \"Audit 1\"\nrevision: 2\n")]);
    let documents = fixture.source(ParseFailurePolicy::Abort).load_all().unwrap();

    assert_eq!(records(&documents), json!([{ "title": "Audit 1", "revision": 2 }]));
    assert_eq!(documents[0].name, "doc1");
}

#[test]
fn one_record_per_file_sorted_by_name() {
    let fixture = Fixture::new(&[
        ("b.yml", "title: B\n"),
        ("a.yaml", "title: A\n"),
        ("c.YML", "title: C\n"),
    ]);
    let documents = fixture.source(ParseFailurePolicy::Abort).load_all().unwrap();

    let names: Vec<&str> = documents.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ["a", "b", "c"]);
}

#[test]
fn ignores_unrecognised_entries() {
    let fixture = Fixture::new(&[
        ("doc.yml", "title: kept\n"),
        ("notes.txt", "not: yaml: at all: ["),
        ("README", "plain"),
    ]);
    std::fs::create_dir(fixture.path.join("nested.yml")).unwrap();

    let documents = fixture.source(ParseFailurePolicy::Abort).load_all().unwrap();
    assert_eq!(records(&documents), json!([{ "title": "kept" }]));
}

#[test]
fn empty_directory_yields_no_documents() {
    let fixture = Fixture::new(&[]);
    let documents = fixture.source(ParseFailurePolicy::Abort).load_all().unwrap();
    assert!(documents.is_empty());
}

#[test]
fn missing_directory_is_not_found() {
    let fixture = Fixture::new(&[]);
    let source = DocumentSource::new(fixture.path.join("yml"), ParseFailurePolicy::Abort);

    let err = source.load_all().unwrap_err();
    assert!(matches!(err, LoadError::SourceNotFound(_)), "{err:?}");
}

#[test]
fn file_as_source_is_not_a_directory() {
    let fixture = Fixture::new(&[("doc.yml", "title: x\n")]);
    let source = DocumentSource::new(fixture.path.join("doc.yml"), ParseFailurePolicy::Abort);

    let err = source.load_all().unwrap_err();
    assert!(matches!(err, LoadError::NotADirectory(_)), "{err:?}");
}

#[test]
fn abort_policy_fails_the_batch() {
    let fixture = Fixture::new(&[("good.yml", "title: ok\n"), ("bad.yml", "title: [oops\n")]);

    let err = fixture
        .source(ParseFailurePolicy::Abort)
        .load_all()
        .unwrap_err();
    match err {
        LoadError::Parse { file, .. } => assert_eq!(file.file_name(), Some("bad.yml")),
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn skip_policy_omits_malformed_files() {
    let fixture = Fixture::new(&[
        ("good.yml", "title: ok\n"),
        ("bad.yml", "title: [oops\n"),
        ("list.yml", "- not\n- a mapping\n"),
        ("empty.yml", ""),
    ]);

    let documents = fixture.source(ParseFailurePolicy::Skip).load_all().unwrap();
    assert_eq!(records(&documents), json!([{ "title": "ok" }]));
}

#[test]
fn invalid_utf8_is_a_parse_error() {
    let fixture = Fixture::new(&[]);
    std::fs::write(fixture.path.join("latin1.yml"), b"title: caf\xe9\n").unwrap();

    let err = fixture
        .source(ParseFailurePolicy::Abort)
        .load_all()
        .unwrap_err();
    assert!(matches!(err, LoadError::Parse { .. }), "{err:?}");
}

#[test]
fn load_named_reads_only_matching_files() {
    let fixture = Fixture::new(&[
        ("audit.v2.yml", "title: Audit\n"),
        ("broken.yml", "title: [oops\n"),
    ]);
    let source = fixture.source(ParseFailurePolicy::Abort);

    let document = source.load_named("audit").unwrap().unwrap();
    assert_eq!(Value::Object(document.record), json!({ "title": "Audit" }));
    assert!(source.load_named("missing").unwrap().is_none());
}

#[test]
fn load_named_prefers_the_first_file_in_collection_order() {
    let fixture = Fixture::new(&[("a.yml", "from: yml\n"), ("a.yaml", "from: yaml\n")]);

    let document = fixture
        .source(ParseFailurePolicy::Abort)
        .load_named("a")
        .unwrap()
        .unwrap();
    assert_eq!(Value::Object(document.record), json!({ "from": "yaml" }));
}

#[test]
fn colliding_keys_fail_the_load() {
    let fixture = Fixture::new(&[("k.yml", "1: int\n\"1\": str\n")]);

    let err = fixture
        .source(ParseFailurePolicy::Abort)
        .load_named("k")
        .unwrap_err();
    assert!(matches!(err, LoadError::Parse { .. }), "{err:?}");

    let documents = fixture.source(ParseFailurePolicy::Skip).load_all().unwrap();
    assert!(documents.is_empty());
}

#[test]
fn names_follow_collection_order() {
    let fixture = Fixture::new(&[("sop-2.yml", "a: 1\n"), ("sop-1.yaml", "a: 1\n")]);
    let names = fixture.source(ParseFailurePolicy::Abort).names().unwrap();
    assert_eq!(names, ["sop-1", "sop-2"]);
}

#[test]
fn document_name_stops_at_first_dot() {
    assert_eq!(document_name("audit.v2.yml"), "audit");
    assert_eq!(document_name("plain"), "plain");
}

#[test]
fn extensions_are_case_insensitive() {
    assert_eq!(DocumentFormat::from_extension("YAML"), Some(DocumentFormat::Yaml));
    assert_eq!(DocumentFormat::from_extension("json"), None);
}
