use tracing::debug;

use crate::prelude::*;

fn alphabet_of_size(symbols: usize) -> Vec<char> {
    (b'a'..=b'z').take(symbols).map(char::from).collect()
}

/// Generates a random [`Dfa`] with `size` states (at least one) named `0, 1, ...` over the
/// alphabet consisting of the first `symbols` lowercase letters (at most 26). The start state is
/// `0`. The algorithm is as follows:
/// 1. For each state and each symbol, with probability `density` add a transition to a uniformly
///    drawn target state.
/// 2. Every state becomes accepting with probability one half.
///
/// The result is completely determined by `seed`. Note that there may be unreachable states.
pub fn random_dfa(size: usize, symbols: usize, density: f64, seed: u64) -> Dfa<u32, char> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let size = size.max(1) as u32;
    let alphabet = alphabet_of_size(symbols);

    let mut transitions = vec![];
    for q in 0..size {
        for &sym in &alphabet {
            if rng.f64() < density {
                transitions.push((q, sym, rng.u32(..size)));
            }
        }
    }
    let accepting = (0..size).filter(|_| rng.bool()).collect::<Vec<_>>();
    debug!(
        "generated random dfa with {size} states and {} transitions from seed {seed}",
        transitions.len()
    );
    Dfa::from_parts(0..size, alphabet, transitions, 0, accepting)
}

/// Generates a random [`Nfa`] in the same manner as [`random_dfa`], except that every triple of
/// origin, symbol and destination becomes a transition with probability `density`. Additionally,
/// for every pair of distinct states an empty transition is added with probability `epsilon`.
pub fn random_nfa(
    size: usize,
    symbols: usize,
    density: f64,
    epsilon: f64,
    seed: u64,
) -> Nfa<u32, char> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let size = size.max(1) as u32;
    let alphabet = alphabet_of_size(symbols);

    let mut transitions = vec![];
    for q in 0..size {
        for &sym in &alphabet {
            for p in 0..size {
                if rng.f64() < density {
                    transitions.push((q, Label::Symbol(sym), p));
                }
            }
        }
        for p in (0..size).filter(|p| *p != q) {
            if rng.f64() < epsilon {
                transitions.push((q, Label::Epsilon, p));
            }
        }
    }
    let accepting = (0..size).filter(|_| rng.bool()).collect::<Vec<_>>();
    debug!(
        "generated random nfa with {size} states and {} transitions from seed {seed}",
        transitions.len()
    );
    Nfa::from_parts(0..size, alphabet, transitions, 0, accepting)
}

#[cfg(test)]
mod tests {
    use super::{random_dfa, random_nfa};
    use crate::prelude::*;

    #[test]
    fn generated_automata_are_well_formed() {
        for seed in 0..10 {
            let dfa = random_dfa(8, 3, 0.8, seed);
            assert!(dfa.validate().is_ok());
            assert_eq!(dfa.size(), 8);
            assert_eq!(dfa.alphabet().len(), 3);

            let nfa = random_nfa(6, 2, 0.2, 0.1, seed);
            assert!(nfa.validate().is_ok());
            assert_eq!(nfa.alphabet().iter().collect::<String>(), "ab");
        }
    }

    #[test]
    fn generation_is_reproducible() {
        assert_eq!(random_dfa(10, 2, 0.9, 7), random_dfa(10, 2, 0.9, 7));
        assert_eq!(random_nfa(5, 2, 0.3, 0.2, 7), random_nfa(5, 2, 0.3, 0.2, 7));
        assert!(random_dfa(10, 2, 1.0, 3).is_complete());
        assert_eq!(random_dfa(0, 1, 1.0, 3).size(), 1);
    }
}
