//! HTTP sink adapter tests against a mock index server

use ctgov_ingest::record::StudyRecord;
use ctgov_ingest::sink::{DocumentSink, ElasticsearchSink, SinkError};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sample_record() -> StudyRecord {
    StudyRecord {
        nct_id: Some("NCT00530764".to_string()),
        brief_title: Some("A Study of Something".to_string()),
        minimum_age: Some(18),
        maximum_age: Some(65),
        keyword: Some(vec!["asthma".to_string()]),
        ..StudyRecord::empty()
    }
}

#[tokio::test]
async fn put_writes_document_keyed_by_sequence_number() {
    let server = MockServer::start().await;
    let record = sample_record();

    Mock::given(method("PUT"))
        .and(path("/clinical-trials/_doc/42"))
        .and(body_json(&record))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let sink = ElasticsearchSink::new(&server.uri(), "clinical-trials").unwrap();
    sink.put(42, &record).await.unwrap();
}

#[tokio::test]
async fn rewrite_of_same_id_is_a_plain_put() {
    let server = MockServer::start().await;
    let record = sample_record();

    // Overwrite semantics are the index's: same id, same endpoint, 200 OK
    Mock::given(method("PUT"))
        .and(path("/clinical-trials/_doc/7"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&server)
        .await;

    let sink = ElasticsearchSink::new(&server.uri(), "clinical-trials").unwrap();
    sink.put(7, &record).await.unwrap();
    sink.put(7, &record).await.unwrap();
}

#[tokio::test]
async fn rejected_write_surfaces_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(500).set_body_string("disk full"))
        .mount(&server)
        .await;

    let sink = ElasticsearchSink::new(&server.uri(), "clinical-trials").unwrap();
    let err = sink.put(3, &sample_record()).await.unwrap_err();

    match err {
        SinkError::Rejected { id, status, message } => {
            assert_eq!(id, 3);
            assert_eq!(status, 500);
            assert_eq!(message, "disk full");
        },
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn healthcheck_succeeds_against_live_server() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let sink = ElasticsearchSink::new(&server.uri(), "clinical-trials").unwrap();
    sink.healthcheck().await.unwrap();
}

#[tokio::test]
async fn healthcheck_fails_when_sink_is_unreachable() {
    // Nothing listens on this port
    let sink = ElasticsearchSink::new("http://127.0.0.1:1", "clinical-trials").unwrap();
    let err = sink.healthcheck().await.unwrap_err();
    assert!(matches!(err, SinkError::Unavailable { .. }));
}
