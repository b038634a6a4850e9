// Orchestrates the full tableau pipeline for a single query and
// returns a yes/no verdict.

use buchi::nba::Buchi;
use ltl::formula::Formula;

use crate::transform::{ltl_to_gnba, product};

/// Returns `true` iff every infinite trace of `ts` from its initial
/// states satisfies `formula`.
pub fn check(ts: &Buchi, formula: &Formula) -> bool {
    let negated = formula.negate().normalize();
    log::debug!("checking '{formula}' (negated normal form '{negated}')");

    let gnba = ltl_to_gnba(&negated);
    let nba = gnba.degeneralize();
    log::debug!("nba for '{formula}': {} states", nba.states().len());

    let prod = product(ts, &nba);
    let violated = prod.has_reachable_accepting_cycle();

    !violated
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn ap(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn tautology_holds() {
        let mut ts = Buchi::new();
        let s0 = ts.new_state(BTreeSet::new());
        ts.add_transition(s0, s0);
        ts.set_initial_state(s0);

        let formula = Formula::parse("G (a \\/ !a)").unwrap();
        assert!(check(&ts, &formula));
    }

    #[test]
    fn missing_ap_violates_trivially() {
        let mut ts = Buchi::new();
        let s0 = ts.new_state(BTreeSet::new());
        ts.add_transition(s0, s0);
        ts.set_initial_state(s0);

        let formula = Formula::parse("a").unwrap();
        assert!(!check(&ts, &formula));
    }

    #[test]
    fn until_satisfied() {
        let mut ts = Buchi::new();
        let s0 = ts.new_state(ap(&["a"]));
        let s1 = ts.new_state(ap(&["b"]));
        ts.add_transition(s0, s1);
        ts.add_transition(s1, s1);
        ts.set_initial_state(s0);
        ts.declare_alphabet(["a".to_string(), "b".to_string()]);

        let formula = Formula::parse("a U b").unwrap();
        assert!(check(&ts, &formula));
    }

    #[test]
    fn until_violated_when_b_never_holds() {
        let mut ts = Buchi::new();
        let s0 = ts.new_state(ap(&["a"]));
        let s1 = ts.new_state(ap(&["b"]));
        ts.add_transition(s0, s0);
        ts.add_transition(s1, s1);
        ts.set_initial_state(s0);
        ts.declare_alphabet(["a".to_string(), "b".to_string()]);

        let formula = Formula::parse("a U b").unwrap();
        assert!(!check(&ts, &formula));
    }

    #[test]
    fn next_distinguishes_successor_label() {
        let mut ts = Buchi::new();
        let s0 = ts.new_state(ap(&["a"]));
        let s1 = ts.new_state(BTreeSet::new());
        ts.add_transition(s0, s1);
        ts.add_transition(s1, s0);
        ts.set_initial_state(s0);
        ts.declare_alphabet(["a".to_string()]);

        assert!(check(&ts, &Formula::parse("X !a").unwrap()));
        assert!(!check(&ts, &Formula::parse("X a").unwrap()));
    }

    #[test]
    fn always_eventually_a() {
        let mut ts = Buchi::new();
        let s0 = ts.new_state(ap(&["a"]));
        let s1 = ts.new_state(BTreeSet::new());
        ts.add_transition(s0, s1);
        ts.add_transition(s1, s0);
        ts.set_initial_state(s0);
        ts.declare_alphabet(["a".to_string()]);

        assert!(check(&ts, &Formula::parse("G F a").unwrap()));
    }
}
