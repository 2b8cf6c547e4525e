use clap::{Args as ClapArgs, Parser, Subcommand, ValueHint};
use url::Url;

#[derive(Parser)]
#[command(about, version, name = "odeuropa-explorer")]
/// Odeuropa explorer API server and query inspection tool
pub struct Args {
    /// Log filter, e.g. `debug` or `explorer_engine=debug`
    ///
    /// Overrides the `RUST_LOG` environment variable. Defaults to `info`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the explorer HTTP API
    Serve {
        /// Query URL of the SPARQL endpoint
        #[arg(short, long, value_hint = ValueHint::Url)]
        endpoint: Url,
        /// Host and port to listen to
        #[arg(short, long, default_value = "localhost:8080", value_hint = ValueHint::Hostname)]
        bind: String,
        /// Allows cross-origin requests
        #[arg(long)]
        cors: bool,
        /// Timeout of a single SPARQL request, in seconds
        #[arg(long, default_value_t = 60)]
        timeout: u64,
        /// Number of entities on one search page
        #[arg(long, default_value_t = 20)]
        results_per_page: usize,
        /// Value of the `sameAs` parameter sent to the endpoint
        #[arg(long)]
        same_as: Option<bool>,
        /// Graph sent as `default-graph-uri` with every query
        #[arg(long, value_hint = ValueHint::Url)]
        default_graph: Option<String>,
        /// Leave the SPARQL query out of the API responses
        #[arg(long)]
        hide_debug_queries: bool,
    },
    /// Print the SPARQL query of a route without contacting an endpoint
    Compile(CompileArgs),
}

#[derive(ClapArgs)]
pub struct CompileArgs {
    /// Name of the route, e.g. `smells`
    #[arg(long = "type")]
    pub route: String,
    /// Plugin of a vocabulary route, e.g. `word-cloud`
    #[arg(long)]
    pub plugin: Option<String>,
    /// Entity identifier
    ///
    /// Without a plugin, the entity query is printed instead of the search query.
    #[arg(long)]
    pub id: Option<String>,
    /// Requested language
    #[arg(long)]
    pub locale: Option<String>,
    /// Comma separated start years of timeline buckets
    #[arg(long)]
    pub date: Option<String>,
    /// Width of a timeline bucket in years
    #[arg(long)]
    pub interval: Option<u32>,
    /// Lower year bound
    #[arg(long)]
    pub from: Option<String>,
    /// Upper year bound
    #[arg(long)]
    pub to: Option<String>,
    /// Category IRI
    #[arg(long)]
    pub category: Option<String>,
    /// Free text search
    #[arg(short, long)]
    pub q: Option<String>,
    /// 1-based search page
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    /// Number of entities on one search page
    #[arg(long, default_value_t = 20)]
    pub results_per_page: usize,
    /// Also print the pagination count query
    #[arg(long)]
    pub count: bool,
}
