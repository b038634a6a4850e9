// Loads a batch of LTL queries to check against a transition system.

use ltl::formula::Formula;

use crate::error::{Error, Result};

/// A parsed query batch: global queries (verdict against the TS as
/// given) followed by per-start-state queries (verdict against the TS
/// re-rooted at `id`).
pub struct QueryBatch {
    pub global: Vec<Formula>,
    pub per_start: Vec<(usize, Formula)>,
}

pub fn parse(input: &str) -> Result<QueryBatch> {
    let mut lines = input.lines();

    let header = lines
        .next()
        .ok_or_else(|| Error::MalformedQueryHeader(String::new()))?;
    let mut header_tokens = header.split_whitespace();
    let n: usize = header_tokens
        .next()
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| Error::MalformedQueryHeader(header.to_string()))?;
    let m: usize = header_tokens
        .next()
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| Error::MalformedQueryHeader(header.to_string()))?;

    let mut global = Vec::with_capacity(n);
    for _ in 0..n {
        let line = lines.next().ok_or(Error::TruncatedQueries)?;
        global.push(Formula::parse(line)?);
    }

    let mut per_start = Vec::with_capacity(m);
    for _ in 0..m {
        let line = lines.next().ok_or(Error::TruncatedQueries)?;
        let line = line.trim();
        let (id_token, formula_src) = line
            .split_once(char::is_whitespace)
            .ok_or_else(|| Error::MalformedStartQuery(line.to_string()))?;
        let id: usize = id_token
            .parse()
            .map_err(|_| Error::MalformedStartQuery(line.to_string()))?;
        per_start.push((id, Formula::parse(formula_src.trim())?));
    }

    log::info!("parsed query batch: {n} global queries, {m} per-start-state queries");
    Ok(QueryBatch { global, per_start })
}
