use super::connections::ConnectionIndex;
use crate::{GraphHost, Slot};
use std::collections::HashSet;

/// One node being explored, with the neighbors still to visit
struct SearchFrame<N> {
    node: N,
    /// Distance change when going from the parent frame to this node
    modifier: i32,
    pending: std::vec::IntoIter<(N, i32)>,
    furthest: Option<(N, i32)>,
}

impl<N: Copy> SearchFrame<N> {
    fn consider(&mut self, (candidate, distance): (N, i32), modifier: i32) {
        let distance = distance + modifier;
        if distance > self.furthest.map_or(0, |(_, d)| d) {
            self.furthest = Some((candidate, distance));
        }
    }
}

/// Find the node of `start`'s selected component that should sit in the
/// leftmost column
///
/// Walking to an input neighbor moves one column left, walking to an output
/// neighbor one column right. The node furthest to the left wins, the first
/// one found on ties. Returns `None` if `start` isn't selected.
pub(crate) fn leftmost_connected_node<H>(
    host: &H,
    connections: &ConnectionIndex<H::NodeId>,
    start: H::NodeId,
) -> Option<H::NodeId>
where
    H: GraphHost + ?Sized,
{
    leftmost_with_distance(host, connections, start).map(|(node, _)| node)
}

pub(crate) fn leftmost_with_distance<H>(
    host: &H,
    connections: &ConnectionIndex<H::NodeId>,
    start: H::NodeId,
) -> Option<(H::NodeId, i32)>
where
    H: GraphHost + ?Sized,
{
    if !host.is_selected(start) {
        return None;
    }

    let mut visited = HashSet::new();
    let enter = |node: H::NodeId, modifier: i32, visited: &mut HashSet<H::NodeId>| {
        visited.insert(node);
        let outputs = connections.connected_nodes(node, Slot::Output);
        let inputs = connections.connected_nodes(node, Slot::Input);
        let pending: Vec<_> = outputs
            .into_iter()
            .map(|n| (n, -1))
            .chain(inputs.into_iter().map(|n| (n, 1)))
            .collect();
        SearchFrame {
            node,
            modifier,
            pending: pending.into_iter(),
            furthest: None,
        }
    };

    let mut stack = vec![enter(start, 0, &mut visited)];
    loop {
        let next = stack.last_mut()?.pending.next();
        match next {
            Some((neighbor, modifier)) => {
                if visited.contains(&neighbor) || !host.is_selected(neighbor) {
                    continue;
                }
                stack.push(enter(neighbor, modifier, &mut visited));
            }
            None => {
                let done = stack.pop()?;
                let result = done.furthest.unwrap_or((done.node, 0));
                match stack.last_mut() {
                    Some(parent) => parent.consider(result, done.modifier),
                    None => return Some(result),
                }
            }
        }
    }
}
