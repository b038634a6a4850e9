pub mod nba;

#[cfg(test)]
mod test {
    use super::nba::*;
    use std::collections::BTreeSet;

    fn no_ap() -> BTreeSet<String> {
        BTreeSet::new()
    }

    #[test]
    fn two_state_automaton() {
        let mut nba = Buchi::new();
        let s1 = nba.new_state(no_ap());
        let s2 = nba.new_state(no_ap());

        nba.add_transition(s1, s2);
        nba.add_transition(s2, s1);

        assert!(nba.successors(&s1).contains(&s2));
        assert!(nba.successors(&s2).contains(&s1));
    }

    #[test]
    fn three_state_automaton() {
        let mut nba = Buchi::new();
        let s1 = nba.new_state(no_ap());
        let s2 = nba.new_state(no_ap());
        let s3 = nba.new_state(no_ap());

        nba.add_transition(s1, s2);
        nba.add_transition(s1, s3);
        nba.add_transition(s3, s2);

        assert!(nba.successors(&s1).contains(&s2));
        assert!(nba.successors(&s1).contains(&s3));
        assert!(nba.successors(&s2).is_empty());
        assert!(nba.successors(&s3).contains(&s2));
    }

    #[test]
    fn tarjan_finds_expected_component_count() {
        let mut nba = Buchi::new();
        let a = nba.new_state(no_ap());
        let b = nba.new_state(no_ap());
        let e = nba.new_state(no_ap());
        let c = nba.new_state(no_ap());
        let d = nba.new_state(no_ap());
        let f = nba.new_state(no_ap());
        let g = nba.new_state(no_ap());
        let h = nba.new_state(no_ap());

        nba.add_transition(a, b);
        nba.add_transition(b, e);
        nba.add_transition(e, a);
        nba.add_transition(b, f);
        nba.add_transition(b, c);
        nba.add_transition(e, f);
        nba.add_transition(c, d);
        nba.add_transition(d, c);
        nba.add_transition(d, h);
        nba.add_transition(h, d);
        nba.add_transition(c, g);
        nba.add_transition(h, g);
        nba.add_transition(g, f);
        nba.add_transition(f, g);

        let components = nba.tarjans_scc();
        assert_eq!(components.len(), 3, "{:?}", components);
    }

    #[test]
    fn has_reachable_accepting_cycle_detects_counter_example() {
        let mut nba = Buchi::new();
        let s1 = nba.new_state(no_ap());
        let s2 = nba.new_state(no_ap());

        nba.add_transition(s1, s2);
        nba.add_transition(s2, s1);

        nba.set_initial_state(s1);
        nba.add_accepting_set([s2]);

        assert!(nba.has_reachable_accepting_cycle());
    }

    #[test]
    fn has_reachable_accepting_cycle_is_false_without_a_cycle() {
        let mut nba = Buchi::new();
        let s1 = nba.new_state(no_ap());
        let s2 = nba.new_state(no_ap());

        // s2 is a dead end: accepting but not part of any cycle.
        nba.add_transition(s1, s2);

        nba.set_initial_state(s1);
        nba.add_accepting_set([s2]);

        assert!(!nba.has_reachable_accepting_cycle());
    }

    #[test]
    fn has_reachable_accepting_cycle_is_false_with_no_accepting_states() {
        let mut nba = Buchi::new();
        let s1 = nba.new_state(no_ap());
        let s2 = nba.new_state(no_ap());

        nba.add_transition(s1, s2);
        nba.add_transition(s2, s1);

        nba.set_initial_state(s1);
        nba.add_accepting_set([]);

        assert!(!nba.has_reachable_accepting_cycle());
    }

    #[test]
    fn degeneralize_reduces_to_one_acceptance_set() {
        let mut gnba = Buchi::new();
        let a = gnba.new_state(no_ap());
        let b = gnba.new_state(no_ap());
        let c = gnba.new_state(no_ap());

        gnba.add_transition(a, b);
        gnba.add_transition(b, c);
        gnba.add_transition(c, a);

        gnba.set_initial_state(c);
        gnba.add_accepting_set([b]);
        gnba.add_accepting_set([a]);

        let nba = gnba.degeneralize();

        // One copy of the state space per acceptance family.
        assert_eq!(nba.states().len(), 6);
        assert_eq!(gnba.accepting_sets().len(), 2);
        assert_eq!(nba.accepting_sets().len(), 1);
        assert!(nba.has_reachable_accepting_cycle());
    }

    #[test]
    fn degeneralize_is_a_no_op_with_a_single_acceptance_set() {
        let mut gnba = Buchi::new();
        let a = gnba.new_state(no_ap());
        let b = gnba.new_state(no_ap());
        gnba.add_transition(a, b);
        gnba.add_transition(b, a);
        gnba.set_initial_state(a);
        gnba.add_accepting_set([b]);

        let nba = gnba.degeneralize();
        assert_eq!(nba.states().len(), 2);
        assert_eq!(nba.accepting_sets().len(), 1);
    }
}
