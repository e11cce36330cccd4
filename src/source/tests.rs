use super::*;
use crate::quantize::EmbeddingVector;
use std::io::Write;

fn raw(identifier: &str) -> RawEmbeddingEntry {
    RawEmbeddingEntry {
        identifier: identifier.to_string(),
        embedding: EmbeddingVector::zeros().to_base64(),
    }
}

#[test]
fn test_join_asset_url_collapses_slashes() {
    assert_eq!(
        join_asset_url("https://cdn.example.com/", "/embeddings//archive.json"),
        "https://cdn.example.com/embeddings/archive.json"
    );
    assert_eq!(
        join_asset_url("https://cdn.example.com", "embeddings/archive.json"),
        "https://cdn.example.com/embeddings/archive.json"
    );
}

#[test]
fn test_join_asset_url_strips_leading_slashes() {
    assert_eq!(
        join_asset_url("http://localhost:3000/public", "///a.json"),
        "http://localhost:3000/public/a.json"
    );
}

#[test]
fn test_http_source_url_encodes_spaces() {
    let source = HttpSource::new("https://cdn.example.com/assets");
    let url = source.url_for("embeddings/my set.json").unwrap();
    assert_eq!(
        url.as_str(),
        "https://cdn.example.com/assets/embeddings/my%20set.json"
    );
}

#[test]
fn test_http_source_rejects_unparseable_base() {
    let source = HttpSource::new("not a url");
    assert!(matches!(
        source.url_for("a.json"),
        Err(LoadError::InvalidPath { .. })
    ));
}

#[test]
fn test_asset_source_from_base() {
    assert!(matches!(
        AssetSource::from_base("https://example.com"),
        AssetSource::Http(_)
    ));
    assert!(matches!(
        AssetSource::from_base("./public"),
        AssetSource::File(_)
    ));
}

#[test]
fn test_file_source_rejects_traversal() {
    let source = FileSource::new("/srv/assets");
    for bad in ["../secret.json", "embeddings/../../etc/passwd", "", "/", "."] {
        assert!(
            matches!(source.resolve(bad), Err(LoadError::InvalidPath { .. })),
            "{bad:?} should be rejected"
        );
    }
}

#[test]
fn test_file_source_tolerates_leading_slash() {
    let source = FileSource::new("/srv/assets");
    assert_eq!(
        source.resolve("/embeddings/./archive.json").unwrap(),
        std::path::PathBuf::from("/srv/assets/embeddings/archive.json")
    );
}

#[tokio::test]
async fn test_file_source_reads_set() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("embeddings")).unwrap();
    let mut file = std::fs::File::create(dir.path().join("embeddings/archive.json")).unwrap();
    let json = serde_json::to_vec(&vec![raw("a"), raw("b")]).unwrap();
    file.write_all(&json).unwrap();

    let source = FileSource::new(dir.path());
    let entries = source.fetch("embeddings/archive.json").await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].identifier, "b");
}

#[tokio::test]
async fn test_file_source_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = FileSource::new(dir.path()).fetch("nope.json").await.unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}

#[tokio::test]
async fn test_file_source_bad_json() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("bad.json"), b"{\"not\": \"an array\"}").unwrap();
    let err = FileSource::new(dir.path()).fetch("bad.json").await.unwrap_err();
    assert!(matches!(err, LoadError::Json(_)));
}

#[tokio::test]
async fn test_mock_source_counts_and_fails() {
    let source = MockSource::new();
    source.insert("a.json", vec![raw("x")]);

    assert_eq!(source.fetch("a.json").await.unwrap().len(), 1);
    source.set_failing(true);
    assert!(matches!(
        source.fetch("a.json").await,
        Err(LoadError::Status { status: 503, .. })
    ));
    assert!(matches!(
        MockSource::new().fetch("missing.json").await,
        Err(LoadError::Status { status: 404, .. })
    ));
    assert_eq!(source.fetch_count(), 2);
}

#[test]
fn test_raw_entry_wire_shape() {
    let json = serde_json::to_value(raw("id-1")).unwrap();
    assert_eq!(json["identifier"], "id-1");
    assert!(json["embedding"].as_str().unwrap().len() > 300);
}
