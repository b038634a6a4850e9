use itertools::Itertools;
use std::fmt::{self, Write};
use std::collections::{BTreeSet, HashMap, HashSet};

// A buchi automaton consists of 5 elements:
// - Q: set of states
// - E: an alphabet (subsets of a fixed set of atomic propositions)
// - d: a transition function Q -> 2^Q (unlabeled; the guard lives on the state)
// - Q_0: set of initial states
// - F: an ORDERED list of acceptance sets (a GNBA may have several; an NBA exactly one)
//
// This single type represents a transition system, a GNBA, an NBA and a
// TS x NBA product alike: they differ only in which fields are populated
// (a TS has no acceptance sets; a product's acceptance set marks the
// states whose NBA component is accepting).

/// States are minted by the automaton that owns them via [`Buchi::new_state`]
/// and must only be used with that automaton.
#[derive(Debug, Eq, Clone, Copy, Hash, PartialEq, PartialOrd, Ord)]
pub struct State {
    pub id: usize,
}

#[derive(Clone, Debug)]
pub struct Buchi {
    transitions: HashMap<State, HashSet<State>>,
    ap: HashMap<State, BTreeSet<String>>,
    alphabet: BTreeSet<String>,
    accepting_sets: Vec<BTreeSet<State>>,
    initial_states: HashSet<State>,
    size: usize,
}

impl Default for Buchi {
    fn default() -> Self {
        Self::new()
    }
}

impl Buchi {
    pub fn new() -> Self {
        Buchi {
            transitions: HashMap::new(),
            ap: HashMap::new(),
            alphabet: BTreeSet::new(),
            accepting_sets: Vec::new(),
            initial_states: HashSet::new(),
            size: 0,
        }
    }

    /// Mints a fresh state labeled with the given AP-guard.
    pub fn new_state(&mut self, ap: BTreeSet<String>) -> State {
        let state = State { id: self.size };
        self.size += 1;
        self.alphabet.extend(ap.iter().cloned());
        self.ap.insert(state, ap);
        self.transitions.insert(state, HashSet::new());
        state
    }

    pub fn set_initial_state(&mut self, state: State) {
        self.initial_states.insert(state);
    }

    pub fn set_initial_states(&mut self, states: impl IntoIterator<Item = State>) {
        self.initial_states.extend(states);
    }

    /// Re-roots this automaton at a single initial state, discarding any
    /// others (used to answer a per-start-state query).
    pub fn set_only_initial_state(&mut self, state: State) {
        self.initial_states.clear();
        self.initial_states.insert(state);
    }

    pub fn add_transition(&mut self, source: State, target: State) {
        self.transitions.entry(source).or_default().insert(target);
    }

    pub fn add_accepting_set(&mut self, set: impl IntoIterator<Item = State>) {
        self.accepting_sets.push(BTreeSet::from_iter(set));
    }

    pub fn states(&self) -> Vec<State> {
        self.ap.keys().copied().collect()
    }

    pub fn initial_states(&self) -> &HashSet<State> {
        &self.initial_states
    }

    pub fn accepting_sets(&self) -> &[BTreeSet<State>] {
        &self.accepting_sets
    }

    pub fn ap(&self, state: &State) -> &BTreeSet<String> {
        self.ap
            .get(state)
            .unwrap_or_else(|| panic!("state {state:?} is not a member of this automaton"))
    }

    pub fn alphabet(&self) -> &BTreeSet<String> {
        &self.alphabet
    }

    /// Extends the declared alphabet without attaching any of the
    /// names to a state (a TS may declare an AP that no node carries).
    pub fn declare_alphabet(&mut self, aps: impl IntoIterator<Item = String>) {
        self.alphabet.extend(aps);
    }

    pub fn successors(&self, state: &State) -> HashSet<State> {
        self.transitions.get(state).cloned().unwrap_or_default()
    }

    /// Returns the strongly connected components using Tarjan's algorithm.
    pub fn tarjans_scc(&self) -> Vec<HashSet<State>> {
        let mut index = 0;
        let mut stack = Vec::new();
        let mut colors = HashMap::new();
        let mut components = Vec::new();

        for state in self.states() {
            if !colors.contains_key(&state) {
                let mut found = self.tarjans_strongconnect(state, &mut stack, &mut colors, &mut index);
                components.append(&mut found);
            }
        }

        components
    }

    fn tarjans_strongconnect(
        &self,
        state: State,
        stack: &mut Vec<State>,
        colors: &mut HashMap<State, (i32, i32)>,
        index: &mut i32,
    ) -> Vec<HashSet<State>> {
        let mut components = vec![];
        colors.insert(state, (*index, *index));
        *index += 1;
        stack.push(state);

        for successor in self.successors(&state) {
            if !colors.contains_key(&successor) {
                let mut found = self.tarjans_strongconnect(successor, stack, colors, index);
                components.append(&mut found);

                let state_cols = colors[&state];
                let successor_cols = colors[&successor];
                colors.insert(state, (state_cols.0, state_cols.1.min(successor_cols.1)));
            } else if stack.contains(&successor) {
                let state_cols = colors[&state];
                let successor_cols = colors[&successor];
                colors.insert(state, (state_cols.0, state_cols.1.min(successor_cols.0)));
            }
        }

        let state_cols = colors[&state];
        if state_cols.0 == state_cols.1 {
            let mut component = HashSet::new();
            while let Some(w) = stack.pop() {
                component.insert(w);
                if w == state {
                    break;
                }
            }
            components.push(component);
        }
        components
    }

    fn scc_is_trivial(&self, scc: &HashSet<State>) -> bool {
        scc.len() == 1 && {
            let only = *scc.iter().next().unwrap();
            !self.successors(&only).contains(&only)
        }
    }

    fn reachable_from_initial(&self) -> HashSet<State> {
        let mut visited = HashSet::new();
        let mut stack: Vec<State> = self.initial_states.iter().copied().collect();
        while let Some(state) = stack.pop() {
            if visited.insert(state) {
                for successor in self.successors(&state) {
                    if !visited.contains(&successor) {
                        stack.push(successor);
                    }
                }
            }
        }
        visited
    }

    /// Decides whether an accepting state reachable from an initial
    /// state lies on a cycle. Requires this automaton to carry exactly
    /// one acceptance set (an NBA or a product, not a raw GNBA).
    pub fn has_reachable_accepting_cycle(&self) -> bool {
        assert_eq!(
            self.accepting_sets.len(),
            1,
            "emptiness check requires a single acceptance set; degeneralize first"
        );
        let accepting = &self.accepting_sets[0];
        let sccs = self.tarjans_scc();
        let scc_of: HashMap<State, usize> = sccs
            .iter()
            .enumerate()
            .flat_map(|(i, c)| c.iter().map(move |s| (*s, i)))
            .collect();

        for state in self.reachable_from_initial() {
            if accepting.contains(&state) {
                let scc = &sccs[scc_of[&state]];
                if !self.scc_is_trivial(scc) {
                    return true;
                }
            }
        }
        false
    }

    /// Converts this GNBA into an equivalent NBA by cross-product with
    /// the acceptance-family index. A no-op (besides
    /// cloning) when there is already a single acceptance family.
    pub fn degeneralize(&self) -> Buchi {
        let k = self.accepting_sets.len().max(1);
        log::debug!(
            "degeneralizing gnba with {} states and {} acceptance families",
            self.size,
            k
        );
        if k <= 1 {
            return self.clone();
        }

        let mut nba = Buchi::new();
        let mut index: HashMap<(State, usize), State> = HashMap::new();

        for q in self.states() {
            for layer in 0..k {
                let new_state = nba.new_state(self.ap(&q).clone());
                index.insert((q, layer), new_state);
            }
        }

        for q in self.states() {
            for layer in 0..k {
                let from = index[&(q, layer)];
                let next_layer = if self.accepting_sets[layer].contains(&q) {
                    (layer + 1) % k
                } else {
                    layer
                };
                for successor in self.successors(&q) {
                    let to = index[&(successor, next_layer)];
                    nba.add_transition(from, to);
                }
            }
        }

        for initial in self.initial_states() {
            nba.set_initial_state(index[&(*initial, 0)]);
        }

        let accepting: HashSet<State> = self.accepting_sets[0]
            .iter()
            .map(|q| index[&(*q, 0)])
            .collect();
        nba.add_accepting_set(accepting);

        nba
    }

    pub fn to_dot(&self) -> String {
        let mut out = String::new();
        writeln!(&mut out, "digraph g {{\nmindist = 2.0").unwrap();
        for (state, targets) in &self.transitions {
            for target in targets {
                writeln!(&mut out, "\"s{}\" -> \"s{}\"", state.id, target.id).unwrap();
            }
        }
        for (i, initial) in self.initial_states.iter().enumerate() {
            writeln!(
                &mut out,
                "init{0} [label=\"\", shape=point]\ninit{0} -> \"s{1}\"",
                i, initial.id
            )
            .unwrap();
        }
        out.push('}');
        out.push('\n');
        out
    }
}

impl fmt::Display for Buchi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Initial States: ({})",
            self.initial_states
                .iter()
                .sorted_by_key(|s| s.id)
                .map(|s| format!("s{}", s.id))
                .collect::<Vec<_>>()
                .join(", ")
        )?;
        writeln!(
            f,
            "Accepting Sets: ({})",
            self.accepting_sets
                .iter()
                .map(|s| format!("{{{}}}", s.iter().map(|a| format!("s{}", a.id)).join(", ")))
                .collect::<Vec<_>>()
                .join(", ")
        )?;
        writeln!(f, "Transitions:")?;
        for (s, targets) in self.transitions.iter().sorted_by_key(|(s, _)| s.id) {
            for t in targets.iter().sorted_by_key(|t| t.id) {
                writeln!(f, "s{} --> s{}", s.id, t.id)?;
            }
        }
        Ok(())
    }
}
