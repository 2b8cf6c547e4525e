//! The routes of the Odeuropa knowledge graph explorer.

use crate::error::ConfigError;
use crate::registry::RouteRegistry;
use crate::route::{FilterDefinition, PluginKind, RouteDefinition, ViewKind};
use crate::templates::{
    category_binding, date_range_filter, id_binding, iri_filter, language_filter,
    literal_filter, year_bounds_filter,
};
use explorer_model::{
    parse_variable, Fragment, Node, Proto, QueryDescriptor, QueryParams, Value, Variable,
};

const PREFIXES: [(&str, &str); 8] = [
    ("crm", "http://erlangen-crm.org/current/"),
    ("od", "http://data.odeuropa.eu/ontology/"),
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("schema", "http://schema.org/"),
    ("skos", "http://www.w3.org/2004/02/skos/core#"),
    ("time", "http://www.w3.org/2006/time#"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
];

const SMELL_BASE: &str = "http://data.odeuropa.eu/smell/";
const TEXT_BASE: &str = "http://data.odeuropa.eu/source/";
const VISUAL_BASE: &str = "http://data.odeuropa.eu/image/";
const VOCABULARY_BASE: &str = "http://data.odeuropa.eu/vocabulary/";

/// Number of words shown in a word cloud.
const WORD_CLOUD_SIZE: usize = 100;
/// Number of options listed for a facet filter.
const FILTER_VALUES_LIMIT: usize = 200;

/// The vocabularies that can be explored, with the path linking a smell to one of their concepts.
const VOCABULARIES: [(&str, &str, &str); 3] = [
    (
        "smell-sources",
        "olfactory-objects",
        "^od:F1_generated/od:F3_had_source/crm:P137_exemplifies",
    ),
    (
        "fragrant-spaces",
        "fragrant-spaces",
        "^od:F1_generated/crm:P7_took_place_at/crm:P137_exemplifies",
    ),
    (
        "gestures",
        "olfactory-gestures",
        "^od:F2_perceived/od:F5_involved_gesture/crm:P137_exemplifies",
    ),
];

/// Builds the registry of every Odeuropa route.
pub fn registry() -> Result<RouteRegistry, ConfigError> {
    let mut builder = RouteRegistry::builder()
        .route(smells()?)
        .route(texts()?)
        .route(visual_items()?);
    for (name, scheme, path) in VOCABULARIES {
        builder = builder.route(vocabulary(name, scheme, path)?);
    }
    builder.build()
}

fn descriptor(proto: Proto) -> QueryDescriptor {
    PREFIXES
        .iter()
        .fold(QueryDescriptor::new(proto), |descriptor, (prefix, namespace)| {
            descriptor.prefix(prefix, namespace)
        })
}

fn smells() -> Result<RouteDefinition, ConfigError> {
    let proto = Proto::new("id")
        .field("label", "label")
        .object("source", Proto::new("source").field("label", "sourceLabel"))
        .object("carrier", Proto::new("carrier").field("label", "carrierLabel"))
        .object("place", Proto::new("place").field("label", "placeLabel"))
        .object(
            "time",
            Proto::new("time")
                .field("label", "timeLabel")
                .field("begin", "begin"),
        )
        .list("qualities", Proto::new("quality").field("label", "qualityLabel"))
        .list(
            "texts",
            Proto::new("text")
                .field("label", "textLabel")
                .list_field("excerpts", "excerpt"),
        );
    let main = descriptor(proto)
        .with_where(Fragment::optional([Fragment::raw("?id rdfs:label ?label .")]))
        .with_where(Fragment::union([
            vec![Fragment::raw(
                "?emission od:F1_generated ?id .
                ?emission od:F3_had_source ?source .
                ?source rdfs:label ?sourceLabel .",
            )],
            vec![Fragment::raw(
                "?emission od:F1_generated ?id .
                ?emission od:F4_had_carrier ?carrier .
                ?carrier rdfs:label ?carrierLabel .",
            )],
            vec![Fragment::raw(
                "?emission od:F1_generated ?id .
                ?emission crm:P7_took_place_at ?place .
                ?place rdfs:label ?placeLabel .",
            )],
            vec![
                Fragment::raw(
                    "?emission od:F1_generated ?id .
                    ?emission crm:P4_has_time-span ?time .
                    ?time rdfs:label ?timeLabel .",
                ),
                Fragment::optional([Fragment::raw(
                    "?time crm:P82a_begin_of_the_begin ?begin .",
                )]),
            ],
            vec![Fragment::raw(
                "?assignment crm:P140_assigned_attribute_to ?id .
                ?assignment crm:P141_assigned ?quality .
                ?quality rdfs:label ?qualityLabel .",
            )],
            vec![Fragment::raw(
                "?id crm:P67i_is_referred_to_by ?fragment .
                ?fragment crm:P106i_forms_part_of ?text .
                ?text rdfs:label ?textLabel .
                ?fragment rdf:value ?excerpt .",
            )],
        ]))
        .order_by("id", false);

    let [(_, sources, source_path), (_, spaces, space_path), _] = VOCABULARIES;
    Ok(RouteDefinition::new("smells", ViewKind::Browse, main)
        .uri_base(SMELL_BASE)
        .rdf_type(Value::prefixed("od:L11_Smell"))
        .search_label("label")?
        .filter(concept_filter("source", sources, source_path))
        .filter(concept_filter("place", spaces, space_path)))
}

/// A facet filter on the concepts of a vocabulary linked to a smell by `path`.
fn concept_filter(id: &str, scheme: &str, path: &str) -> FilterDefinition {
    let variable = format!("{id}Filter");
    let values = descriptor(
        Proto::new("value")
            .field("label", "label")
            .aggregate("count", "count", "COUNT(DISTINCT ?smell)"),
    )
    .with_where(Fragment::raw(format!(
        "?value skos:inScheme <{VOCABULARY_BASE}{scheme}> .
        ?value skos:prefLabel ?label .
        ?smell {path} ?value ."
    )))
    .with_template(|params: &QueryParams| language_filter("label", params))
    .group_by("value")
    .group_by("label")
    .order_by("count", true)
    .limit(FILTER_VALUES_LIMIT);

    FilterDefinition::new(
        id,
        iri_filter(&variable, &format!("?id {path} ?{variable} .")),
    )
    .with_values_query(values)
}

fn texts_proto() -> Proto {
    Proto::new("id")
        .field("label", "label")
        .object("author", Proto::new("author").field("name", "authorName"))
        .field("date", "dateCreated")
        .list_field("languages", "language")
}

fn texts_main() -> QueryDescriptor {
    descriptor(texts_proto())
        .with_where("?id rdfs:label ?label .")
        .with_where(Fragment::optional([Fragment::raw(
            "?id schema:author ?author .
            ?author rdfs:label ?authorName .",
        )]))
        .with_where(Fragment::optional([Fragment::raw(
            "?id schema:dateCreated ?dateCreated .",
        )]))
        .with_where(Fragment::optional([Fragment::raw(
            "?id schema:inLanguage ?language .",
        )]))
        .order_by("id", false)
}

fn texts() -> Result<RouteDefinition, ConfigError> {
    let detail = descriptor(texts_proto().list(
        "fragments",
        Proto::new("fragment").field("value", "fragmentValue"),
    ))
    .extend_where(texts_main().where_parts)
    .with_where(Fragment::optional([Fragment::raw(
        "?fragment crm:P106i_forms_part_of ?id .
        ?fragment rdf:value ?fragmentValue .",
    )]));

    let languages = descriptor(
        Proto::new("value").aggregate("count", "count", "COUNT(DISTINCT ?text)"),
    )
    .with_where("?text a crm:E33_Linguistic_Object .")
    .with_where("?text schema:inLanguage ?value .")
    .group_by("value")
    .order_by("count", true)
    .limit(FILTER_VALUES_LIMIT);

    RouteDefinition::new("texts", ViewKind::Browse, texts_main())
        .uri_base(TEXT_BASE)
        .rdf_type(Value::prefixed("crm:E33_Linguistic_Object"))
        .detail_query(detail)
        .filter(
            FilterDefinition::new(
                "language",
                literal_filter("languageFilter", "?id schema:inLanguage ?languageFilter ."),
            )
            .with_values_query(languages),
        )
        .search_label("label")
}

fn visuals_proto() -> Proto {
    Proto::new("id")
        .field("label", "label")
        .list_field("images", "image")
        .object("artist", Proto::new("artist").field("name", "artistName"))
        .field("date", "dateCreated")
}

fn visual_items() -> Result<RouteDefinition, ConfigError> {
    let main = descriptor(visuals_proto())
        .with_where("?id rdfs:label ?label .")
        .with_where(Fragment::optional([Fragment::raw("?id schema:image ?image .")]))
        .with_where(Fragment::optional([Fragment::raw(
            "?id schema:author ?artist .
            ?artist rdfs:label ?artistName .",
        )]))
        .with_where(Fragment::optional([Fragment::raw(
            "?id schema:dateCreated ?dateCreated .",
        )]))
        .order_by("id", false);

    RouteDefinition::new("visual-items", ViewKind::Browse, main)
        .uri_base(VISUAL_BASE)
        .rdf_type(Value::prefixed("crm:E36_Visual_Item"))
        .search_label("label")
}

/// A vocabulary route with its five plugins.
///
/// `path` links a smell to a concept of the vocabulary.
fn vocabulary(name: &str, scheme: &str, path: &str) -> Result<RouteDefinition, ConfigError> {
    let scheme = Value::iri(&format!("{VOCABULARY_BASE}{scheme}"))?;
    let id = Node::from(parse_variable("id")?);
    let main = descriptor(
        Proto::new("id")
            .field("label", "label")
            .object("broader", Proto::new("broader").field("label", "broaderLabel")),
    )
    .with_where(Fragment::triple(id.clone(), "skos:inScheme", scheme))
    .with_where(Fragment::triple(id, "skos:prefLabel", parse_variable("label")?))
    .with_template(|params: &QueryParams| language_filter("label", params))
    .with_template(|params: &QueryParams| {
        let mut fragments = category_binding("category", params);
        if !fragments.is_empty() {
            fragments.push(Fragment::raw("?id skos:broader* ?category ."));
        }
        fragments
    })
    .with_where(Fragment::optional([Fragment::raw(
        "?id skos:broader ?broader .
        ?broader skos:prefLabel ?broaderLabel .",
    )]))
    .order_by("label", false);

    let link = |smell: &str| Fragment::raw(format!("?{smell} {path} ?concept ."));

    let word_cloud = descriptor(
        Proto::new("word")
            .field("label", "wordLabel")
            .aggregate("count", "count", "COUNT(DISTINCT ?id)"),
    )
    .with_where(link("id"))
    .with_template(|params: &QueryParams| id_binding("concept", params))
    .with_where(
        "?wordAssignment crm:P140_assigned_attribute_to ?id .
        ?wordAssignment crm:P141_assigned ?word .
        ?word skos:prefLabel ?wordLabel .",
    )
    .with_template(|params: &QueryParams| language_filter("wordLabel", params))
    .group_by("word")
    .group_by("wordLabel")
    .order_by("count", true)
    .limit(WORD_CLOUD_SIZE);

    let timeline = descriptor(
        Proto::new("year")
            .integer("year", "year")
            .aggregate("count", "count", "COUNT(DISTINCT ?id)"),
    )
    .with_where(link("id"))
    .with_template(|params: &QueryParams| id_binding("concept", params))
    .with_where(
        "?emission od:F1_generated ?id .
        ?emission crm:P4_has_time-span/crm:P82a_begin_of_the_begin ?begin .",
    )
    .with_template(|params: &QueryParams| {
        let interval = params.interval_or_default();
        vec![Fragment::bind(
            format!("FLOOR(YEAR(?begin) / {interval}) * {interval}"),
            Variable::new_unchecked("year"),
        )]
    })
    .with_template(|params: &QueryParams| year_bounds_filter("year", params))
    .group_by("year")
    .order_by("year", false);

    let texts = descriptor(texts_proto())
        .with_where(
            "?fragment crm:P106i_forms_part_of ?id .
            ?smell crm:P67i_is_referred_to_by ?fragment .",
        )
        .with_where(link("smell"))
        .with_template(|params: &QueryParams| id_binding("concept", params))
        .with_template(|params: &QueryParams| smell_date_filter("smell", params));

    let visuals = descriptor(visuals_proto())
        .with_where("?smell crm:P67i_is_referred_to_by ?id .")
        .with_where(link("smell"))
        .with_template(|params: &QueryParams| id_binding("concept", params))
        .with_template(|params: &QueryParams| smell_date_filter("smell", params));

    let dates = descriptor(
        Proto::new("time")
            .field("label", "timeLabel")
            .field("begin", "begin")
            .aggregate("count", "count", "COUNT(DISTINCT ?id)"),
    )
    .with_where(link("id"))
    .with_template(|params: &QueryParams| id_binding("concept", params))
    .with_where(
        "?emission od:F1_generated ?id .
        ?emission crm:P4_has_time-span ?time .
        ?time rdfs:label ?timeLabel .",
    )
    .with_where(Fragment::optional([Fragment::raw(
        "?time crm:P82a_begin_of_the_begin ?begin .",
    )]))
    .group_by("time")
    .group_by("timeLabel")
    .group_by("begin")
    .order_by("begin", false);

    Ok(RouteDefinition::new(name, ViewKind::Vocabulary, main)
        .uri_base(VOCABULARY_BASE)
        .rdf_type(Value::prefixed("skos:Concept"))
        .search_label("label")?
        .plugin(PluginKind::WordCloud, "smells", word_cloud)
        .plugin(PluginKind::Timeline, "smells", timeline)
        .plugin(PluginKind::Texts, "texts", texts)
        .plugin(PluginKind::Visuals, "visual-items", visuals)
        .plugin(PluginKind::Dates, "smells", dates))
}

/// Restricts `smell` to the timeline buckets selected in `params.date`.
fn smell_date_filter(smell: &str, params: &QueryParams) -> Vec<Fragment> {
    let filter = date_range_filter(&format!("{smell}Year"), params);
    if filter.is_empty() {
        return filter;
    }
    let mut fragments = vec![Fragment::raw(format!(
        "?{smell}Emission od:F1_generated ?{smell} .
        ?{smell}Emission crm:P4_has_time-span/crm:P82a_begin_of_the_begin ?{smell}Begin .
        BIND(YEAR(?{smell}Begin) AS ?{smell}Year)"
    ))];
    fragments.extend(filter);
    fragments
}
