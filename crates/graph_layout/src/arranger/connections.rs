use crate::{Connection, Slot};
use petgraph::graphmap::{DiGraphMap, NodeTrait};

/// Ports of one connection and its index in the host's list
#[derive(Debug, Clone, Copy)]
struct PortPair {
    order: usize,
    from_port: usize,
    to_port: usize,
}

/// Snapshot of the host's connection list, indexed by node
///
/// Parallel connections between the same two nodes are kept on a single
/// edge, with their position in the host list.
#[derive(Debug, Clone)]
pub(crate) struct ConnectionIndex<N>
where
    N: NodeTrait,
{
    graph: DiGraphMap<N, Vec<PortPair>>,
}

impl<N> ConnectionIndex<N>
where
    N: NodeTrait,
{
    pub fn new<I>(connections: I) -> Self
    where
        I: IntoIterator<Item = Connection<N>>,
    {
        let mut graph = DiGraphMap::<N, Vec<PortPair>>::new();
        for (order, c) in connections.into_iter().enumerate() {
            let ports = PortPair {
                order,
                from_port: c.from_port,
                to_port: c.to_port,
            };
            match graph.edge_weight_mut(c.from_node, c.to_node) {
                Some(existing) => existing.push(ports),
                None => {
                    graph.add_edge(c.from_node, c.to_node, vec![ports]);
                }
            }
        }
        Self { graph }
    }

    /// Connections ending at `node` for [`Slot::Input`], starting from it
    /// for [`Slot::Output`], in host list order
    pub fn connections_to_node(&self, node: N, slot: Slot) -> Vec<Connection<N>> {
        if !self.graph.contains_node(node) {
            return Vec::new();
        }

        let mut connections = Vec::new();
        for other in self.graph.neighbors_directed(node, slot.into()) {
            let (from, to) = match slot {
                Slot::Input => (other, node),
                Slot::Output => (node, other),
            };
            let Some(ports) = self.graph.edge_weight(from, to) else {
                continue;
            };
            connections.extend(
                ports
                    .iter()
                    .map(|p| (p.order, Connection::new(from, p.from_port, to, p.to_port))),
            );
        }

        connections.sort_unstable_by_key(|&(order, _)| order);
        connections.into_iter().map(|(_, c)| c).collect()
    }

    /// Neighbors on the given side of `node` with the port they attach to
    ///
    /// The port is the one on `node`'s side. A neighbor reached through
    /// several connections appears once, its port being the running integer
    /// average of all of them. Self-loops are ignored. The result is sorted
    /// by port, keeping first-seen order for equal ports.
    pub fn connected_ports(&self, node: N, slot: Slot) -> Vec<(N, usize)> {
        let mut connected: Vec<(N, usize)> = Vec::new();

        for connection in self.connections_to_node(node, slot) {
            let (other, port) = match slot {
                Slot::Input => (connection.from_node, connection.to_port),
                Slot::Output => (connection.to_node, connection.from_port),
            };
            if other == node {
                continue;
            }

            match connected.iter_mut().find(|(n, _)| *n == other) {
                Some((_, averaged)) => *averaged = (*averaged + port) / 2,
                None => connected.push((other, port)),
            }
        }

        connected.sort_by_key(|&(_, port)| port);
        connected
    }

    pub fn connected_nodes(&self, node: N, slot: Slot) -> Vec<N> {
        self.connected_ports(node, slot)
            .into_iter()
            .map(|(n, _)| n)
            .collect()
    }
}
