use std::cmp::Reverse;
use std::collections::HashMap;

use priority_queue::PriorityQueue;

use crate::cave::{Cave, NodeId};

/// All-pairs travel costs, computed once and read-only afterwards.
#[derive(Debug, Clone)]
pub struct DistanceTable<T: NodeId>(HashMap<(T, T), u32>);

impl<T: NodeId> DistanceTable<T> {
    pub fn new(cave: &Cave<T>) -> Self {
        let mut table = HashMap::new();
        for source in cave.nodes() {
            for (destination, cost) in costs_from(cave, source) {
                table.insert((source, destination), cost);
            }
        }
        DistanceTable(table)
    }

    pub fn get(&self, from: T, to: T) -> Option<u32> {
        self.0.get(&(from, to)).copied()
    }
}

fn costs_from<T: NodeId>(cave: &Cave<T>, source: T) -> HashMap<T, u32> {
    let mut settled: HashMap<T, u32> = HashMap::new();
    // max-heap with reversed costs, so push_increase acts as decrease-key
    let mut queue: PriorityQueue<T, Reverse<u32>> = PriorityQueue::new();
    queue.push(source, Reverse(0));
    while let Some((node, Reverse(cost))) = queue.pop() {
        settled.insert(node, cost);
        for (next, step) in cave.tunnels(node) {
            if !settled.contains_key(&next) {
                queue.push_increase(next, Reverse(cost + step));
            }
        }
    }
    settled
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;
    use rand_chacha::ChaCha8Rng;

    fn triangle_with_shortcut() -> Cave<&'static str> {
        let mut cave = Cave::new();
        for id in ["aa", "bb", "cc"] {
            cave.add_valve(id, 1);
        }
        cave.add_tunnel("aa", "bb", 2);
        cave.add_tunnel("bb", "cc", 3);
        cave.add_tunnel("aa", "cc", 10);
        cave
    }

    #[test]
    fn weights_are_costs_not_hops() {
        let table = DistanceTable::new(&triangle_with_shortcut());
        // two cheap tunnels beat the direct expensive one
        assert_eq!(table.get("aa", "cc"), Some(5));
        assert_eq!(table.get("aa", "bb"), Some(2));
    }

    #[test]
    fn distance_to_self_is_zero() {
        let table = DistanceTable::new(&triangle_with_shortcut());
        assert_eq!(table.get("bb", "bb"), Some(0));
    }

    #[test]
    fn unknown_pairs_are_absent() {
        let table = DistanceTable::new(&triangle_with_shortcut());
        assert_eq!(table.get("aa", "zz"), None);
    }

    #[test]
    fn tables_are_symmetric() {
        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut cave = Cave::new();
            cave.add_valve(0u32, 1);
            for id in 1..15u32 {
                cave.add_valve(id, 1);
                cave.add_tunnel(id, rng.gen_range(0..id), rng.gen_range(1..5));
            }
            let table = DistanceTable::new(&cave);
            for a in cave.nodes() {
                for b in cave.nodes() {
                    assert_eq!(table.get(a, b), table.get(b, a), "seed {seed}: {a} vs {b}");
                }
            }
        }
    }
}
