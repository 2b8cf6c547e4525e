use explorer_model::{
    Fragment, LanguageTagHandling, Proto, QueryDescriptor, QueryParams, Value, ValuesBinding,
    Variable,
};
use explorer_query::{compile, compile_count, render_where, unbound_variables, CompileError};

fn smell_descriptor() -> QueryDescriptor {
    QueryDescriptor::new(
        Proto::new("id")
            .field("label", "label")
            .object("source", Proto::new("source").field("label", "sourceLabel")),
    )
    .prefix("od", "http://data.odeuropa.eu/ontology/")
    .with_where("?id a od:L11_Smell .")
    .with_where(Fragment::union([
        vec![Fragment::raw("?id rdfs:label ?label .")],
        vec![Fragment::raw(
            "?emission od:F1_generated ?id .\n?emission od:F3_had_source ?source .\n?source rdfs:label ?sourceLabel .",
        )],
    ]))
}

#[test]
fn compile_select_query() -> Result<(), CompileError> {
    let query = compile(&smell_descriptor().limit(20).offset(40).resolve(&QueryParams::default()))?;
    insta::assert_snapshot!(query.text, @r"
    PREFIX od: <http://data.odeuropa.eu/ontology/>
    SELECT DISTINCT ?id ?label ?source ?sourceLabel WHERE {
      ?id a od:L11_Smell .
      {
        ?id rdfs:label ?label .
      }
      UNION
      {
        ?emission od:F1_generated ?id .
        ?emission od:F3_had_source ?source .
        ?source rdfs:label ?sourceLabel .
      }
    }
    OFFSET 40
    LIMIT 20
    ");
    Ok(())
}

#[test]
fn compile_count_query() -> Result<(), CompileError> {
    let query = compile_count(&smell_descriptor().limit(20).resolve(&QueryParams::default()))?;
    insta::assert_snapshot!(query, @r"
    PREFIX od: <http://data.odeuropa.eu/ontology/>
    SELECT (COUNT(DISTINCT ?id) AS ?count) WHERE {
      ?id a od:L11_Smell .
      {
        ?id rdfs:label ?label .
      }
      UNION
      {
        ?emission od:F1_generated ?id .
        ?emission od:F3_had_source ?source .
        ?source rdfs:label ?sourceLabel .
      }
    }
    ");
    Ok(())
}

#[test]
fn count_and_select_share_where_clause() -> Result<(), CompileError> {
    let resolved = smell_descriptor()
        .limit(5)
        .order_by("label", false)
        .values(ValuesBinding::new(
            Variable::new_unchecked("id"),
            [Value::iri("http://data.odeuropa.eu/smell/1").map_err(CompileError::from)?],
        ))
        .resolve(&QueryParams::default());
    let body = render_where(&resolved);
    let select = compile(&resolved)?.text;
    let count = compile_count(&resolved)?;

    let select_body = select
        .split_once("WHERE {\n")
        .and_then(|(_, rest)| rest.rsplit_once("\n}"))
        .map(|(body, _)| body);
    let count_body = count
        .split_once("WHERE {\n")
        .and_then(|(_, rest)| rest.rsplit_once("\n}"))
        .map(|(body, _)| body);
    assert_eq!(select_body, Some(body.trim_end()));
    assert_eq!(count_body, Some(body.trim_end()));
    Ok(())
}

#[test]
fn distinct_can_be_disabled() -> Result<(), CompileError> {
    let query = compile(&smell_descriptor().distinct(false).resolve(&QueryParams::default()))?;
    assert!(query.text.contains("SELECT ?id ?label ?source ?sourceLabel WHERE {"));
    assert!(!query.text.contains("LIMIT"));
    Ok(())
}

#[test]
fn ordering_keys() -> Result<(), CompileError> {
    let query = compile(
        &smell_descriptor()
            .order_by("?label", false)
            .order_by("source", true)
            .resolve(&QueryParams::default()),
    )?;
    assert!(query.text.ends_with("}\nORDER BY ?label DESC(?source)"));
    Ok(())
}

#[test]
fn language_handling_is_carried_to_the_executor() -> Result<(), CompileError> {
    let query = compile(
        &smell_descriptor()
            .language_tags(LanguageTagHandling::Keep)
            .preferred_language(Some("fr".to_owned()))
            .resolve(&QueryParams::default()),
    )?;
    assert_eq!(query.language_tags, LanguageTagHandling::Keep);
    assert_eq!(query.preferred_language.as_deref(), Some("fr"));
    Ok(())
}

#[test]
fn empty_where_is_rejected() {
    let descriptor = QueryDescriptor::new(Proto::new("id").field("label", "label"))
        .with_template(|_| vec![Fragment::raw("  ")]);
    let result = compile(&descriptor.resolve(&QueryParams::default()));
    assert!(matches!(result, Err(CompileError::EmptyWhere(name)) if name == "id"));
}

#[test]
fn invalid_variable_is_rejected() {
    let descriptor = QueryDescriptor::new(Proto::new("id").field("label", "bad name"))
        .with_where("?id a ?type .");
    let result = compile(&descriptor.resolve(&QueryParams::default()));
    assert!(matches!(result, Err(CompileError::Model(_))));
}

#[test]
fn unbound_variables_are_reported() {
    let descriptor = QueryDescriptor::new(
        Proto::new("id").field("label", "label").field("date", "date"),
    )
    .with_where("?id rdfs:label ?label .");
    let unbound = unbound_variables(&descriptor.resolve(&QueryParams::default()));
    assert_eq!(unbound, vec![Variable::new_unchecked("date")]);
}

#[test]
fn date_template_is_applied_before_compilation() -> Result<(), CompileError> {
    let descriptor = smell_descriptor().with_template(|params| {
        params
            .start_years()
            .first()
            .map(|year| Fragment::filter(format!("YEAR(?date) >= {year}")))
            .into_iter()
            .collect()
    });
    let with_date = compile(&descriptor.resolve(&QueryParams::default().with_date("1650")))?;
    let without_date = compile(&descriptor.resolve(&QueryParams::default()))?;
    assert!(with_date.text.contains("  FILTER(YEAR(?date) >= 1650)\n}"));
    assert!(!without_date.text.contains("FILTER"));
    Ok(())
}

#[test]
fn compile_aggregate_query() -> Result<(), CompileError> {
    let descriptor = QueryDescriptor::new(
        Proto::new("word")
            .field("label", "wordLabel")
            .aggregate("count", "count", "COUNT(DISTINCT ?id)"),
    )
    .with_where("?id od:F1_generated/crm:P2_has_type ?word .\n?word skos:prefLabel ?wordLabel .")
    .group_by("word")
    .group_by("wordLabel")
    .order_by("count", true)
    .limit(50);
    let query = compile(&descriptor.resolve(&QueryParams::default()))?;
    insta::assert_snapshot!(query.text, @r"
    SELECT DISTINCT ?word ?wordLabel (COUNT(DISTINCT ?id) AS ?count) WHERE {
      ?id od:F1_generated/crm:P2_has_type ?word .
      ?word skos:prefLabel ?wordLabel .
    }
    GROUP BY ?word ?wordLabel
    ORDER BY DESC(?count)
    LIMIT 50
    ");
    assert!(unbound_variables(&descriptor.resolve(&QueryParams::default())).is_empty());
    Ok(())
}

#[test]
fn page_selects_identifiers_before_joining() -> Result<(), CompileError> {
    let resolved = QueryDescriptor::new(Proto::new("id").field("label", "label"))
        .with_where("?id rdfs:label ?label .")
        .page(20, 40)
        .resolve(&QueryParams::default());
    let query = compile(&resolved)?;
    insta::assert_snapshot!(query.text, @r"
    SELECT DISTINCT ?id ?label WHERE {
      {
        SELECT DISTINCT ?id WHERE {
          ?id rdfs:label ?label .
        }
        ORDER BY ?id
        OFFSET 40
        LIMIT 20
      }
      ?id rdfs:label ?label .
    }
    ");

    let count = compile_count(&resolved)?;
    assert!(!count.contains("LIMIT"));
    Ok(())
}

#[test]
fn ordered_page_ranks_identifiers_by_sort_key() -> Result<(), CompileError> {
    let resolved = QueryDescriptor::new(Proto::new("id").field("label", "label"))
        .with_where("?id skos:prefLabel ?label .")
        .order_by("label", false)
        .page(20, 20)
        .resolve(&QueryParams::default());
    let query = compile(&resolved)?;
    insta::assert_snapshot!(query.text, @r"
    SELECT DISTINCT ?id ?label WHERE {
      {
        SELECT ?id (MIN(?label) AS ?pageKey0) WHERE {
          ?id skos:prefLabel ?label .
        }
        GROUP BY ?id
        ORDER BY ?pageKey0 ?id
        OFFSET 20
        LIMIT 20
      }
      ?id skos:prefLabel ?label .
    }
    ORDER BY ?label
    ");
    Ok(())
}

#[test]
fn descending_page_keys_use_the_largest_value() -> Result<(), CompileError> {
    let resolved = QueryDescriptor::new(Proto::new("id").field("date", "date"))
        .with_where("?id schema:dateCreated ?date .")
        .order_by("date", true)
        .order_by("id", false)
        .page(10, 0)
        .resolve(&QueryParams::default());
    let query = compile(&resolved)?;
    assert!(query
        .text
        .contains("    SELECT ?id (MAX(?date) AS ?pageKey0) WHERE {"));
    assert!(query.text.contains("    ORDER BY DESC(?pageKey0) ?id\n"));
    assert!(query.text.ends_with("}\nORDER BY DESC(?date) ?id"));
    assert!(!query.text.contains("OFFSET"));
    Ok(())
}
