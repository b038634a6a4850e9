//! Loads the transition-system input format into the shared labeled
//! directed graph type also used for GNBAs, NBAs and products
//! (`buchi::nba::Buchi`).

pub mod error;

use std::collections::BTreeSet;

use buchi::nba::Buchi;
pub use error::{Error, Result};

/// Parses a transition system from its line-delimited, whitespace
/// separated format:
///
/// 1. `N M` — node count and transition count.
/// 2. a line of initial node ids.
/// 3. a line of AP identifiers.
/// 4. `M` lines `from action to` (the action token is discarded).
/// 5. `N` lines of AP indices into (3); `-1` means "no AP here".
pub fn parse(input: &str) -> Result<Buchi> {
    let mut lines = input.lines();

    let header = lines.next().ok_or(Error::Truncated(0))?;
    let mut header_tokens = header.split_whitespace();
    let n = parse_usize(header_tokens.next().ok_or_else(|| Error::MalformedHeader(header.to_string()))?)?;
    let m = parse_usize(header_tokens.next().ok_or_else(|| Error::MalformedHeader(header.to_string()))?)?;

    let initial_line = lines.next().unwrap_or("");
    let initials = initial_line
        .split_whitespace()
        .map(parse_usize)
        .collect::<Result<Vec<usize>>>()?;

    let ap_line = lines.next().unwrap_or("");
    let alphabet: Vec<String> = ap_line.split_whitespace().map(str::to_string).collect();

    let mut raw_transitions = vec![Vec::new(); n];
    for _ in 0..m {
        let line = lines.next().ok_or(Error::Truncated(n + m))?;
        let mut tokens = line.split_whitespace();
        let from = parse_usize(tokens.next().ok_or_else(|| Error::MalformedHeader(line.to_string()))?)?;
        tokens.next(); // action label, discarded
        let to = parse_usize(tokens.next().ok_or_else(|| Error::MalformedHeader(line.to_string()))?)?;
        if from >= n {
            return Err(Error::UnknownNode(from));
        }
        if to >= n {
            return Err(Error::UnknownNode(to));
        }
        raw_transitions[from].push(to);
    }

    let mut node_aps = Vec::with_capacity(n);
    for _ in 0..n {
        let line = lines.next().ok_or(Error::Truncated(n + m))?;
        let mut ap = BTreeSet::new();
        for token in line.split_whitespace() {
            let idx: i64 = token
                .parse()
                .map_err(|_| Error::ExpectedInteger(token.to_string()))?;
            if idx == -1 {
                continue;
            }
            let name = alphabet
                .get(idx as usize)
                .ok_or(Error::ApIndexOutOfRange(idx, alphabet.len()))?;
            ap.insert(name.clone());
        }
        node_aps.push(ap);
    }

    for id in &initials {
        if *id >= n {
            return Err(Error::UnknownNode(*id));
        }
    }

    let mut ts = Buchi::new();
    ts.declare_alphabet(alphabet.iter().cloned());
    let states: Vec<_> = node_aps.into_iter().map(|ap| ts.new_state(ap)).collect();

    for (from, targets) in raw_transitions.into_iter().enumerate() {
        for to in targets {
            ts.add_transition(states[from], states[to]);
        }
    }
    ts.set_initial_states(initials.iter().map(|id| states[*id]));

    log::info!(
        "parsed transition system: {n} nodes, {m} transitions, {} atomic propositions",
        alphabet.len()
    );
    Ok(ts)
}

fn parse_usize(token: &str) -> Result<usize> {
    token
        .parse()
        .map_err(|_| Error::ExpectedInteger(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(lines: &[&str]) -> String {
        lines.join("\n")
    }

    #[test]
    fn parses_minimal_self_loop() {
        let input = joined(&["1 1", "0", "a", "0 act 0", "0"]);
        let ts = parse(&input).unwrap();
        assert_eq!(ts.states().len(), 1);
        assert_eq!(ts.initial_states().len(), 1);
        let s0 = ts.states()[0];
        assert!(ts.ap(&s0).contains("a"));
        assert!(ts.successors(&s0).contains(&s0));
    }

    #[test]
    fn discards_action_labels() {
        // two parallel transitions differing only by action collapse
        // into a single edge: edges carry no label here.
        let input = joined(&["2 2", "0", "", "0 act1 1", "0 act2 1", "", ""]);
        let ts = parse(&input).unwrap();
        let s0 = ts.states()[0];
        let s1 = ts.states()[1];
        assert_eq!(ts.successors(&s0).len(), 1);
        assert!(ts.successors(&s0).contains(&s1));
    }

    #[test]
    fn minus_one_means_no_ap() {
        let input = joined(&["1 0", "0", "a b", "-1 1"]);
        let ts = parse(&input).unwrap();
        let s0 = ts.states()[0];
        assert!(ts.ap(&s0).contains("b"));
        assert!(!ts.ap(&s0).contains("a"));
    }

    #[test]
    fn declared_but_unused_ap_is_still_in_alphabet() {
        let input = joined(&["1 0", "0", "a b", "-1 -1"]);
        let ts = parse(&input).unwrap();
        assert!(ts.alphabet().contains("a"));
        assert!(ts.alphabet().contains("b"));
    }

    #[test]
    fn rejects_out_of_range_ap_index() {
        let input = joined(&["1 0", "0", "a", "5"]);
        assert!(matches!(parse(&input), Err(Error::ApIndexOutOfRange(5, 1))));
    }

    #[test]
    fn rejects_unknown_transition_endpoint() {
        let input = joined(&["1 1", "0", "a", "0 act 7", "-1"]);
        assert!(matches!(parse(&input), Err(Error::UnknownNode(7))));
    }
}
