#![allow(clippy::print_stdout, reason = "The compile command prints queries")]
use crate::cli::{Args, Command, CompileArgs};
use anyhow::{bail, Context};
use clap::Parser;
use explorer_engine::EndpointConfig;
use explorer_model::{NamedNode, QueryParams};
use explorer_query::{compile, compile_count};
use explorer_routes::{odeuropa, PluginKind};
use explorer_web::ServerConfig;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_level.as_deref())?;

    match args.command {
        Command::Serve {
            endpoint,
            bind,
            cors,
            timeout,
            results_per_page,
            same_as,
            default_graph,
            hide_debug_queries,
        } => {
            let mut endpoint = EndpointConfig::new(endpoint);
            endpoint.timeout = Duration::from_secs(timeout);
            endpoint.same_as = same_as;
            endpoint.default_graph = default_graph;
            let config = ServerConfig {
                bind,
                cors,
                results_per_page,
                debug_queries: !hide_debug_queries,
                ..ServerConfig::new(endpoint)
            };
            explorer_web::serve(config, odeuropa::registry()?).await
        }
        Command::Compile(args) => {
            for query in compile_queries(&args)? {
                println!("{query}\n");
            }
            Ok(())
        }
    }
}

fn init_tracing(level: Option<&str>) -> anyhow::Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).with_context(|| format!("Invalid log level {level}"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

/// Compiles the query a request with these arguments would send.
fn compile_queries(args: &CompileArgs) -> anyhow::Result<Vec<String>> {
    let registry = odeuropa::registry()?;
    let route = registry.route(&args.route)?;
    if args.page == 0 {
        bail!("Pages start at 1")
    }
    let offset = (args.page - 1).saturating_mul(args.results_per_page);
    let params = QueryParams {
        language: args.locale.clone(),
        id: args
            .id
            .as_deref()
            .map(|id| route.full_iri(id).map(NamedNode::into_string))
            .transpose()?,
        category: args.category.clone(),
        date: args.date.clone(),
        from: args.from.clone(),
        to: args.to.clone(),
        interval: args.interval,
    };

    let descriptor = match (&args.plugin, &args.id) {
        (Some(plugin), _) => {
            let Some(kind) = PluginKind::from_name(plugin) else {
                bail!("Unknown plugin '{plugin}'")
            };
            let descriptor = registry.plugin_descriptor(route.name(), kind)?;
            if kind.lists_entities() {
                descriptor.page(args.results_per_page, offset)
            } else {
                descriptor
            }
        }
        (None, Some(id)) => route.entity_descriptor(id)?,
        (None, None) => route
            .search_descriptor(&[], args.q.as_deref())?
            .page(args.results_per_page, offset),
    };
    let resolved = descriptor
        .preferred_language(params.language.clone())
        .resolve(&params);

    let mut queries = vec![compile(&resolved)?.text];
    if args.count {
        queries.push(compile_count(&resolved)?);
    }
    Ok(queries)
}
