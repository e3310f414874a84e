//! Free-text search command.

use std::process::ExitCode;
use tokio::runtime::Runtime;

use crate::error::Result;
use crate::nutrition::{Aggregator, ClassifiedError, SearchQuery};

use super::print_outcome;

/// Search products across the text-search providers
pub fn cmd_search(
    rt: &Runtime,
    aggregator: &Aggregator,
    query: &str,
    max_results: i64,
    page: i64,
    region: &str,
    language: Option<&str>,
) -> Result<ExitCode> {
    let outcome = match build_query(query, max_results, page, region, language) {
        Ok(query) => rt.block_on(aggregator.search(query)),
        Err(e) => Err(e),
    };
    print_outcome(outcome)
}

fn build_query(
    expression: &str,
    max_results: i64,
    page: i64,
    region: &str,
    language: Option<&str>,
) -> std::result::Result<SearchQuery, ClassifiedError> {
    Ok(SearchQuery::new(expression)?
        .with_max_results(max_results)?
        .with_page_number(page)?
        .with_region(region)
        .with_language(language.map(str::to_string)))
}
