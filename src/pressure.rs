use std::collections::BTreeMap;

use log::debug;

use crate::cave::{Cave, NodeId, ParseCaveError};
use crate::distances::DistanceTable;

pub const START: &str = "AA";
pub const SOLO_MINUTES: u32 = 30;
pub const PAIRED_MINUTES: u32 = 26;

/// Outcome of one agent's walk: total pressure released, the valves visited
/// in order, and how many recursive steps it took to find them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Searched<T> {
    pub released: u32,
    pub path: Vec<T>,
    pub calls: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partitioned<T> {
    pub released: u32,
    pub first: Searched<T>,
    pub second: Searched<T>,
}

/// Exhaustively tries every visiting order of `candidates` reachable within
/// the budget and returns the most pressure a single agent can release.
/// `candidates` maps unvisited valves to their flow rates and must contain
/// the current valve; its ordering fixes how ties break.
pub fn best_release<T: NodeId>(
    start: T,
    candidates: &BTreeMap<T, u32>,
    distances: &DistanceTable<T>,
    minutes: u32,
) -> Searched<T> {
    let mut calls = 0;
    let (released, path) = explore(start, candidates, distances, minutes, &mut calls);
    Searched {
        released,
        path,
        calls,
    }
}

fn explore<T: NodeId>(
    start: T,
    candidates: &BTreeMap<T, u32>,
    distances: &DistanceTable<T>,
    minutes: u32,
    calls: &mut u64,
) -> (u32, Vec<T>) {
    *calls += 1;
    // opening costs a minute; a jammed start valve costs nothing and releases nothing
    let flow = candidates.get(&start).copied().unwrap_or(0);
    let minutes = if flow > 0 {
        minutes.saturating_sub(1)
    } else {
        minutes
    };
    let released_here = flow * minutes;

    let mut rest = candidates.clone();
    rest.remove(&start);

    let mut best = 0;
    let mut best_path = Vec::new();
    for &next in rest.keys() {
        let Some(travel) = distances.get(start, next) else {
            continue;
        };
        if travel < minutes {
            let (released, path) = explore(next, &rest, distances, minutes - travel, calls);
            if released > best {
                best = released;
                best_path = path;
            }
        }
    }

    let mut path = Vec::with_capacity(best_path.len() + 1);
    path.push(start);
    path.extend(best_path);
    (released_here + best, path)
}

/// Splits the non-start candidates every possible way between two agents,
/// searches each half independently and keeps the split with the best sum.
// todo: precompute the best value per candidate subset so complementary
// splits stop re-running identical sub-searches
pub fn best_release_pair<T: NodeId>(
    start: T,
    candidates: &BTreeMap<T, u32>,
    distances: &DistanceTable<T>,
    minutes: u32,
) -> Partitioned<T> {
    let split: Vec<T> = candidates
        .keys()
        .copied()
        .filter(|&valve| valve != start)
        .collect();
    let start_flow = candidates.get(&start).copied().unwrap_or(0);
    debug!(
        "splitting {} valves {} ways",
        split.len(),
        1u64 << split.len()
    );

    let halves = |mask: u64| {
        let mut mine = BTreeMap::from([(start, start_flow)]);
        let mut theirs = BTreeMap::from([(start, start_flow)]);
        for (bit, &valve) in split.iter().enumerate() {
            let side = if mask & (1 << bit) != 0 {
                &mut mine
            } else {
                &mut theirs
            };
            side.insert(valve, candidates[&valve]);
        }
        let first = best_release(start, &mine, distances, minutes);
        let second = best_release(start, &theirs, distances, minutes);
        Partitioned {
            released: first.released + second.released,
            first,
            second,
        }
    };

    let mut best = halves(0);
    for mask in 1..1u64 << split.len() {
        let found = halves(mask);
        if found.released > best.released {
            debug!("split {:b} raises the total to {}", mask, found.released);
            best = found;
        }
    }
    best
}

/// Both answers for a valve-network input: the best a single agent manages
/// in 30 minutes, and the best two agents manage in 26.
pub fn answers(input: &str) -> Result<(u32, u32), ParseCaveError> {
    let cave = Cave::parse(input)?.reduced(START);
    let distances = DistanceTable::new(&cave);
    let candidates = cave.candidates(START);

    let solo = best_release(START, &candidates, &distances, SOLO_MINUTES);
    debug!(
        "single agent opens {:?} after {} steps",
        solo.path, solo.calls
    );
    let pair = best_release_pair(START, &candidates, &distances, PAIRED_MINUTES);
    debug!(
        "paired agents open {:?} and {:?}",
        pair.first.path, pair.second.path
    );
    Ok((solo.released, pair.released))
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const EXAMPLE: &str = indoc! {"
        Valve AA has flow rate=0; tunnels lead to valves DD, II, BB
        Valve BB has flow rate=13; tunnels lead to valves CC, AA
        Valve CC has flow rate=2; tunnels lead to valves DD, BB
        Valve DD has flow rate=20; tunnels lead to valves CC, AA, EE
        Valve EE has flow rate=3; tunnels lead to valves FF, DD
        Valve FF has flow rate=0; tunnels lead to valves EE, GG
        Valve GG has flow rate=0; tunnels lead to valves FF, HH
        Valve HH has flow rate=22; tunnel leads to valve GG
        Valve II has flow rate=0; tunnels lead to valves AA, JJ
        Valve JJ has flow rate=21; tunnel leads to valve II
    "};

    fn example() -> (DistanceTable<&'static str>, BTreeMap<&'static str, u32>) {
        let cave = Cave::parse(EXAMPLE).unwrap().reduced(START);
        let distances = DistanceTable::new(&cave);
        let candidates = cave.candidates(START);
        (distances, candidates)
    }

    /// Walks a reported path under the same rules the search uses and
    /// returns the pressure it would release.
    fn replay(
        path: &[&str],
        candidates: &BTreeMap<&str, u32>,
        distances: &DistanceTable<&str>,
        mut minutes: u32,
    ) -> u32 {
        let mut at = path[0];
        let mut total = 0;
        let flow = candidates[&at];
        if flow > 0 {
            minutes -= 1;
            total += flow * minutes;
        }
        for &next in &path[1..] {
            minutes -= distances.get(at, next).unwrap();
            minutes -= 1;
            total += candidates[&next] * minutes;
            at = next;
        }
        total
    }

    #[test]
    fn single_agent_releases_1651_on_the_example() {
        let (distances, candidates) = example();
        let found = best_release(START, &candidates, &distances, SOLO_MINUTES);
        assert_eq!(found.released, 1651);
        assert_eq!(found.path[0], START);
        assert!(found.calls > 0);
        assert_eq!(
            replay(&found.path, &candidates, &distances, SOLO_MINUTES),
            1651
        );
    }

    #[test]
    fn paired_agents_release_1707_on_the_example() {
        let (distances, candidates) = example();
        let found = best_release_pair(START, &candidates, &distances, PAIRED_MINUTES);
        assert_eq!(found.released, 1707);
        assert_eq!(
            found.released,
            found.first.released + found.second.released
        );
    }

    #[test]
    fn paired_paths_share_only_the_start() {
        let (distances, candidates) = example();
        let found = best_release_pair(START, &candidates, &distances, PAIRED_MINUTES);
        for valve in &found.first.path {
            if *valve != START {
                assert!(!found.second.path.contains(valve), "{valve} opened twice");
            }
        }
    }

    #[test]
    fn longer_budgets_never_release_less() {
        let (distances, candidates) = example();
        let mut last = 0;
        for minutes in 0..=SOLO_MINUTES {
            let found = best_release(START, &candidates, &distances, minutes);
            assert!(found.released >= last, "budget {minutes} lost pressure");
            last = found.released;
        }
    }

    #[test]
    fn pairing_at_least_matches_a_single_agent() {
        let (distances, candidates) = example();
        let solo = best_release(START, &candidates, &distances, PAIRED_MINUTES);
        let pair = best_release_pair(START, &candidates, &distances, PAIRED_MINUTES);
        // one valid split hands every valve to a single agent
        assert!(pair.released >= solo.released);
    }

    #[test]
    fn repeated_searches_agree() {
        let (distances, candidates) = example();
        let first = best_release(START, &candidates, &distances, SOLO_MINUTES);
        let second = best_release(START, &candidates, &distances, SOLO_MINUTES);
        assert_eq!(first, second);
    }

    #[test]
    fn zero_budget_releases_nothing() {
        let (distances, candidates) = example();
        let found = best_release(START, &candidates, &distances, 0);
        assert_eq!(found.released, 0);
        assert_eq!(found.path, [START]);
    }

    #[test]
    fn answers_match_the_example() {
        assert_eq!(answers(EXAMPLE), Ok((1651, 1707)));
    }
}
