use std::collections::{BTreeSet, HashMap};

use buchi::nba::{Buchi, State};
use ltl::formula::{ap_projection, Closure, Expr};

/// Builds a GNBA from the closure of `root`. `root` must already be
/// the negated, normalized formula — the caller is responsible for
/// calling `Expr::negate`/`Expr::normalize` first.
pub fn ltl_to_gnba(root: &Expr) -> Buchi {
    let closure = Closure::build(root);
    let elementary = closure.elementary_sets();

    let mut gnba = Buchi::new();
    let mut states: HashMap<&BTreeSet<Expr>, State> = HashMap::new();
    for set in &elementary {
        states.insert(set, gnba.new_state(ap_projection(set)));
    }

    for set in &elementary {
        if set.contains(root) {
            gnba.set_initial_state(states[set]);
        }
    }

    for source in &elementary {
        for target in &elementary {
            if transition_allowed(source, target, &closure.elements) {
                gnba.add_transition(states[source], states[target]);
            }
        }
    }

    let until_formulas: Vec<&Expr> = closure
        .elements
        .iter()
        .filter(|e| matches!(e, Expr::Until(_, _)))
        .collect();

    if until_formulas.is_empty() {
        gnba.add_accepting_set(gnba.states());
    } else {
        for until in until_formulas {
            let rhs = match until {
                Expr::Until(_, b) => b.as_ref(),
                _ => unreachable!("filtered to Until above"),
            };
            let accepting: Vec<State> = elementary
                .iter()
                .filter(|set| set.contains(rhs) || !set.contains(until))
                .map(|set| states[set])
                .collect();
            gnba.add_accepting_set(accepting);
        }
    }

    log::debug!(
        "gnba for '{root}': {} states, {} acceptance families",
        gnba.states().len(),
        gnba.accepting_sets().len()
    );

    gnba
}

/// The i -> j transition predicate: for every `Next(a)` and
/// `Until(a,b)` in the closure, the corresponding biconditional must
/// hold between `source` and `target`.
fn transition_allowed(source: &BTreeSet<Expr>, target: &BTreeSet<Expr>, closure: &[Expr]) -> bool {
    for e in closure {
        match e {
            Expr::Next(a) => {
                if source.contains(e) != target.contains(a.as_ref()) {
                    return false;
                }
            }
            Expr::Until(a, b) => {
                let carries_on =
                    source.contains(b.as_ref()) || (source.contains(a.as_ref()) && target.contains(e));
                if source.contains(e) != carries_on {
                    return false;
                }
            }
            _ => {}
        }
    }
    true
}

/// Builds the product of a TS and a (single-acceptance-set) NBA. A
/// product state's label is `{"accepting"}` iff its NBA component is
/// accepting; those same states also form the product's (single)
/// accepting set, so `has_reachable_accepting_cycle` applies unchanged.
pub fn product(ts: &Buchi, nba: &Buchi) -> Buchi {
    let shared: BTreeSet<String> = ts.alphabet().intersection(nba.alphabet()).cloned().collect();
    let accepting_label: BTreeSet<String> = BTreeSet::from(["accepting".to_string()]);
    let nba_accepting = &nba.accepting_sets()[0];

    let mut prod = Buchi::new();
    let mut index: HashMap<(State, State), State> = HashMap::new();
    let mut accepting = Vec::new();

    for s in ts.states() {
        for q in nba.states() {
            let label = if nba_accepting.contains(&q) {
                accepting_label.clone()
            } else {
                BTreeSet::new()
            };
            let state = prod.new_state(label);
            if nba_accepting.contains(&q) {
                accepting.push(state);
            }
            index.insert((s, q), state);
        }
    }
    prod.add_accepting_set(accepting);

    for s in ts.states() {
        for q in nba.states() {
            for s2 in ts.successors(&s) {
                for q2 in nba.successors(&q) {
                    if ap_matches(nba.ap(&q), ts.ap(&s2), &shared) {
                        prod.add_transition(index[&(s, q)], index[&(s2, q2)]);
                    }
                }
            }
        }
    }

    for s in ts.states() {
        if !ts.initial_states().contains(&s) {
            continue;
        }
        for q0 in nba.initial_states() {
            if ap_matches(nba.ap(q0), ts.ap(&s), &shared) {
                for q in nba.successors(q0) {
                    prod.set_initial_state(index[&(s, q)]);
                }
            }
        }
    }

    log::debug!(
        "product: {} states, {} initial",
        prod.states().len(),
        prod.initial_states().len()
    );

    prod
}

/// The two labels agree on every AP in `scope`.
fn ap_matches(nba_ap: &BTreeSet<String>, ts_ap: &BTreeSet<String>, scope: &BTreeSet<String>) -> bool {
    scope
        .iter()
        .all(|a| nba_ap.contains(a) == ts_ap.contains(a))
}
