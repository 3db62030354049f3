use std::collections::{BTreeMap, HashMap};
use std::fmt::{Debug, Display};
use std::hash::Hash;

use log::debug;
use petgraph::graphmap::UnGraphMap;
use thiserror::Error;

pub trait NodeId: Copy + Ord + Eq + Hash + Debug + Display {}
impl<T> NodeId for T where T: Copy + Ord + Eq + Hash + Debug + Display {}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseCaveError {
    #[error("expected `Valve <id> has flow rate=<n>;` in {0:?}")]
    BadValve(String),
    #[error("flow rate is not a number in {0:?}")]
    BadFlowRate(String, #[source] std::num::ParseIntError),
    #[error("expected a tunnel list after `;` in {0:?}")]
    BadTunnels(String),
}

#[derive(Debug, Clone)]
pub struct Cave<T: NodeId> {
    graph: UnGraphMap<T, u32>,
    flows: HashMap<T, u32>,
}

impl<T: NodeId> Cave<T> {
    pub fn new() -> Self {
        Cave {
            graph: UnGraphMap::new(),
            flows: HashMap::new(),
        }
    }

    pub fn add_valve(&mut self, id: T, flow: u32) {
        self.graph.add_node(id);
        self.flows.insert(id, flow);
    }

    /// Connects two valves, keeping the cheaper tunnel if one already exists.
    pub fn add_tunnel(&mut self, a: T, b: T, cost: u32) -> bool {
        if a == b {
            return false;
        }
        match self.graph.edge_weight(a, b) {
            Some(&existing) if existing <= cost => false,
            _ => {
                self.graph.add_edge(a, b, cost);
                true
            }
        }
    }

    pub fn flow(&self, id: T) -> u32 {
        self.flows.get(&id).copied().unwrap_or(0)
    }

    pub fn nodes(&self) -> impl Iterator<Item = T> + '_ {
        self.graph.nodes()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn tunnels(&self, id: T) -> impl Iterator<Item = (T, u32)> + '_ {
        self.graph.edges(id).map(|(_, other, &cost)| (other, cost))
    }

    pub fn tunnel_cost(&self, a: T, b: T) -> Option<u32> {
        self.graph.edge_weight(a, b).copied()
    }

    /// The valves worth visiting: every one with positive flow, plus `start`.
    pub fn candidates(&self, start: T) -> BTreeMap<T, u32> {
        let mut out: BTreeMap<T, u32> = self
            .flows
            .iter()
            .filter(|&(_, &flow)| flow > 0)
            .map(|(&id, &flow)| (id, flow))
            .collect();
        out.insert(start, self.flow(start));
        out
    }

    /// Folds every zero-flow valve other than `keep` into direct tunnels
    /// between its neighbours, so only valves worth opening remain.
    pub fn reduced(mut self, keep: T) -> Self {
        let dead: Vec<T> = self
            .graph
            .nodes()
            .filter(|&id| id != keep && self.flow(id) == 0)
            .collect();
        let mut shortcuts = 0;
        for id in dead {
            let spokes: Vec<(T, u32)> = self.tunnels(id).collect();
            // a pair of spokes keeps its through-cost; duplicates keep the cheaper route
            for (i, &(a, cost_a)) in spokes.iter().enumerate() {
                for &(b, cost_b) in &spokes[i + 1..] {
                    if self.add_tunnel(a, b, cost_a + cost_b) {
                        shortcuts += 1;
                    }
                }
            }
            self.graph.remove_node(id);
            self.flows.remove(&id);
        }
        debug!(
            "reduced to {} valves, {} shortcut tunnels added",
            self.graph.node_count(),
            shortcuts
        );
        self
    }
}

impl<T: NodeId> Default for Cave<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Cave<&'a str> {
    pub fn parse(input: &'a str) -> Result<Self, ParseCaveError> {
        let mut cave = Cave::new();
        for line in input.lines().filter(|line| !line.is_empty()) {
            let bad = || ParseCaveError::BadValve(line.to_owned());
            let rest = line.strip_prefix("Valve ").ok_or_else(bad)?;
            let (id, rest) = rest.split_once(' ').ok_or_else(bad)?;
            let (_, rest) = rest.split_once("flow rate=").ok_or_else(bad)?;
            let (rate, rest) = rest.split_once(';').ok_or_else(bad)?;
            let flow = rate
                .trim()
                .parse()
                .map_err(|e| ParseCaveError::BadFlowRate(line.to_owned(), e))?;
            // both `valve BB` and `valves BB, CC` leave the id list six bytes past the match
            let list_at = rest
                .find("valve")
                .ok_or_else(|| ParseCaveError::BadTunnels(line.to_owned()))?;
            let list = rest
                .get(list_at + "valves".len()..)
                .ok_or_else(|| ParseCaveError::BadTunnels(line.to_owned()))?;
            cave.add_valve(id, flow);
            let mut exits = 0;
            for tunnel in list.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                cave.add_tunnel(id, tunnel, 1);
                exits += 1;
            }
            if exits == 0 {
                return Err(ParseCaveError::BadTunnels(line.to_owned()));
            }
        }
        Ok(cave)
    }
}
