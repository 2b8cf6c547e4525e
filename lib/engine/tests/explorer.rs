use async_trait::async_trait;
use explorer_engine::error::{EndpointError, ExecutionError};
use explorer_engine::{parse_solutions, Explorer, QuerySolution, SparqlEndpoint};
use explorer_model::{Fragment, Proto, QueryDescriptor, QueryParams, ResolvedQuery};
use serde_json::{json, Value};
use std::sync::Mutex;

const SMELLS: &str = r#"{
  "head": { "vars": ["id", "label", "source", "sourceLabel"] },
  "results": { "bindings": [
    { "id": { "type": "uri", "value": "http://data.odeuropa.eu/smell/1" },
      "label": { "type": "literal", "value": "smell of roses" } },
    { "id": { "type": "uri", "value": "http://data.odeuropa.eu/smell/1" },
      "source": { "type": "uri", "value": "http://data.odeuropa.eu/vocabulary/olfactory-objects/rose" },
      "sourceLabel": { "type": "literal", "value": "rose", "xml:lang": "en" } },
    { "id": { "type": "uri", "value": "http://data.odeuropa.eu/smell/2" },
      "label": { "type": "literal", "value": "stench" } },
    { "id": { "type": "uri", "value": "http://data.odeuropa.eu/smell/2" },
      "label": { "type": "literal", "value": "foul air" } }
  ] }
}"#;

const COUNT: &str = r#"{
  "head": { "vars": ["count"] },
  "results": { "bindings": [
    { "count": { "type": "literal", "value": "2", "datatype": "http://www.w3.org/2001/XMLSchema#integer" } }
  ] }
}"#;

/// Serves canned documents and records the queries it receives.
#[derive(Default)]
struct FakeEndpoint {
    fail_select: bool,
    fail_count: bool,
    queries: Mutex<Vec<String>>,
}

#[async_trait]
impl SparqlEndpoint for FakeEndpoint {
    async fn select(&self, query: &str) -> Result<Vec<QuerySolution>, EndpointError> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.to_owned());
        }
        let is_count = query.contains("COUNT(DISTINCT");
        if (is_count && self.fail_count) || (!is_count && self.fail_select) {
            return Err(EndpointError::Status {
                status: 503,
                body: "Service Unavailable".to_owned(),
            });
        }
        parse_solutions(if is_count { COUNT } else { SMELLS }.as_bytes())
    }
}

fn smells() -> ResolvedQuery {
    QueryDescriptor::new(
        Proto::new("id")
            .field("label", "label")
            .object("source", Proto::new("source").field("label", "sourceLabel")),
    )
    .with_where("?id a od:L11_Smell .")
    .with_where(Fragment::optional([Fragment::raw("?id rdfs:label ?label .")]))
    .limit(20)
    .resolve(&QueryParams::default())
}

fn as_json(results: Vec<serde_json::Map<String, Value>>) -> Value {
    Value::Array(results.into_iter().map(Value::Object).collect())
}

#[tokio::test]
async fn search_returns_results_and_total() -> Result<(), ExecutionError> {
    let explorer = Explorer::new(FakeEndpoint::default());
    let response = explorer.search(&smells()).await?;
    assert_eq!(response.total_results, 2);
    assert!(response.query.ends_with("LIMIT 20"));
    assert_eq!(
        as_json(response.results),
        json!([
            {
                "@id": "http://data.odeuropa.eu/smell/1",
                "label": "smell of roses",
                "source": {
                    "@id": "http://data.odeuropa.eu/vocabulary/olfactory-objects/rose",
                    "label": "rose"
                }
            },
            {
                "@id": "http://data.odeuropa.eu/smell/2",
                "label": ["stench", "foul air"]
            }
        ])
    );
    Ok(())
}

#[tokio::test]
async fn failing_count_degrades_to_zero() -> Result<(), ExecutionError> {
    let explorer = Explorer::new(FakeEndpoint {
        fail_count: true,
        ..FakeEndpoint::default()
    });
    let response = explorer.search(&smells()).await?;
    assert_eq!(response.total_results, 0);
    assert_eq!(response.results.len(), 2);
    Ok(())
}

#[tokio::test]
async fn failing_main_query_fails_the_search() {
    let explorer = Explorer::new(FakeEndpoint {
        fail_select: true,
        ..FakeEndpoint::default()
    });
    let result = explorer.search(&smells()).await;
    assert!(matches!(
        result,
        Err(ExecutionError::Endpoint(EndpointError::Status { status: 503, .. }))
    ));
}

#[tokio::test]
async fn count_uses_the_same_where_clause() -> Result<(), ExecutionError> {
    let explorer = Explorer::new(FakeEndpoint::default());
    explorer.search(&smells()).await?;
    let queries = explorer
        .endpoint()
        .queries
        .lock()
        .map(|queries| queries.clone())
        .unwrap_or_default();
    assert_eq!(queries.len(), 2);
    let bodies: Vec<_> = queries
        .iter()
        .filter_map(|query| query.split_once(" WHERE {\n").map(|(_, body)| body))
        .filter_map(|body| body.split_once("\n}").map(|(body, _)| body.to_owned()))
        .collect();
    assert_eq!(bodies.len(), 2);
    assert_eq!(bodies[0], bodies[1]);
    Ok(())
}

#[tokio::test]
async fn count_matches_unlimited_results() -> Result<(), ExecutionError> {
    let explorer = Explorer::new(FakeEndpoint::default());
    let mut query = smells();
    query.options.limit = None;
    let results = explorer.execute(&query).await?.results;
    let count = explorer.count(&query).await?;
    assert_eq!(results.len(), count);
    Ok(())
}

#[tokio::test]
async fn entity_takes_the_first_result() -> Result<(), ExecutionError> {
    let explorer = Explorer::new(FakeEndpoint::default());
    let response = explorer.entity(&smells()).await?;
    assert_eq!(
        response.result.and_then(|entity| entity.get("@id").cloned()),
        Some(json!("http://data.odeuropa.eu/smell/1"))
    );
    Ok(())
}

#[tokio::test]
async fn empty_results_are_not_an_error() -> Result<(), ExecutionError> {
    struct EmptyEndpoint;

    #[async_trait]
    impl SparqlEndpoint for EmptyEndpoint {
        async fn select(&self, _query: &str) -> Result<Vec<QuerySolution>, EndpointError> {
            parse_solutions(br#"{ "head": { "vars": ["id"] }, "results": { "bindings": [] } }"#)
        }
    }

    let explorer = Explorer::new(EmptyEndpoint);
    let search = explorer.search(&smells()).await?;
    assert!(search.results.is_empty());
    assert_eq!(search.total_results, 0);
    assert_eq!(explorer.entity(&smells()).await?.result, None);
    Ok(())
}

#[tokio::test]
async fn compile_errors_never_reach_the_endpoint() {
    let explorer = Explorer::new(FakeEndpoint::default());
    let query = QueryDescriptor::new(Proto::new("id")).resolve(&QueryParams::default());
    let result = explorer.execute(&query).await;
    assert!(matches!(result, Err(ExecutionError::Compile(_))));
    let sent = explorer
        .endpoint()
        .queries
        .lock()
        .map(|queries| queries.len())
        .unwrap_or_default();
    assert_eq!(sent, 0);
}
