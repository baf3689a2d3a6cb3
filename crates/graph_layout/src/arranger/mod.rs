mod config;
mod connections;
mod leftmost;
mod occupancy;
mod placement;

use crate::{GraphHost, GridPos, Point};
use std::cell::{Cell, RefCell};
use thiserror::Error;
use tracing::debug;

use placement::ArrangeSession;

pub use config::{ArrangerConfig, ChunkBookkeeping};

/// Errors that can occur when arranging a graph
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArrangeError {
    /// No graph is attached to the arranger
    #[error("no graph attached to the arranger")]
    NoHost,

    /// The cell size isn't strictly positive or the padding is negative
    #[error("invalid grid: cell size {cell_size:?}, padding {cell_padding:?}")]
    InvalidGrid {
        cell_size: GridPos,
        cell_padding: GridPos,
    },

    /// Selected nodes lie too far from the origin, or are too big, for
    /// their placement to fit the grid
    #[error("selected nodes don't fit the layout grid")]
    OutOfRange,
}

/// Counters of a finished arrangement pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArrangeStats {
    /// Nodes that were given a position
    pub nodes: usize,

    /// Connected components placed
    pub chunks: usize,

    /// Chunk rectangles kept to push later components down
    pub recorded_chunks: usize,
}

/// Result of a call to [`GraphArranger::arrange_nodes`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrangement {
    Done(ArrangeStats),
    /// An arrangement was already running, nothing was done
    Skipped,
}

/// Sets the arranging flag for as long as it lives
struct ArrangingGuard<'a>(&'a Cell<bool>);

impl<'a> ArrangingGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            return None;
        }
        Some(Self(flag))
    }
}

impl Drop for ArrangingGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Arranges the selected nodes of a graph on a grid
///
/// Each connected component of the selection is laid out from its leftmost
/// node, outputs to the right and inputs to the left, every node moving
/// down until its padded footprint doesn't cover an already placed node.
///
/// The arranger keeps a handle on its host. Host callbacks may hold a
/// reference to the arranger: calling [`arrange_nodes`](Self::arrange_nodes)
/// from inside a running arrangement does nothing.
#[derive(Debug)]
pub struct GraphArranger<H> {
    config: ArrangerConfig,
    host: RefCell<Option<H>>,
    arranging: Cell<bool>,
}

impl<H> Default for GraphArranger<H> {
    fn default() -> Self {
        Self::new(ArrangerConfig::default())
    }
}

impl<H> GraphArranger<H> {
    /// Create an arranger without a host
    pub fn new(config: ArrangerConfig) -> Self {
        Self {
            config,
            host: RefCell::new(None),
            arranging: Cell::new(false),
        }
    }

    pub fn with_host(config: ArrangerConfig, host: H) -> Self {
        Self {
            config,
            host: RefCell::new(Some(host)),
            arranging: Cell::new(false),
        }
    }

    pub fn config(&self) -> &ArrangerConfig {
        &self.config
    }

    pub fn is_arranging(&self) -> bool {
        self.arranging.get()
    }

    /// Attach a host, returning the previous one
    ///
    /// # Panics
    /// Panics if called while arranging
    pub fn attach(&self, host: H) -> Option<H> {
        self.host.replace(Some(host))
    }

    /// Detach and return the host
    ///
    /// # Panics
    /// Panics if called while arranging
    pub fn detach(&self) -> Option<H> {
        self.host.take()
    }

    /// Run `f` on the attached host
    ///
    /// # Panics
    /// Panics if called while arranging
    pub fn with_host_mut<R>(&self, f: impl FnOnce(&mut H) -> R) -> Option<R> {
        self.host.borrow_mut().as_mut().map(f)
    }

    pub fn into_host(self) -> Option<H> {
        self.host.into_inner()
    }
}

impl<H> GraphArranger<H>
where
    H: GraphHost,
{
    /// Arrange the selected nodes of the attached host
    ///
    /// Every selected node reachable from a selected node through selected
    /// nodes is moved. Unselected nodes are never touched.
    ///
    /// # Errors
    /// Returns an error if no host is attached, the grid configuration is
    /// invalid or the selection doesn't fit the grid. No node moves then.
    pub fn arrange_nodes(&self) -> Result<Arrangement, ArrangeError> {
        let Some(_guard) = ArrangingGuard::enter(&self.arranging) else {
            debug!("Already arranging, ignoring request");
            return Ok(Arrangement::Skipped);
        };

        let mut host = self.host.borrow_mut();
        let host = host.as_mut().ok_or(ArrangeError::NoHost)?;

        if !self.config.is_valid() {
            return Err(ArrangeError::InvalidGrid {
                cell_size: self.config.cell_size,
                cell_padding: self.config.cell_padding,
            });
        }

        let mut session = ArrangeSession::new(host, &self.config);
        if !session.fits_grid() {
            return Err(ArrangeError::OutOfRange);
        }
        let stats = session.run();
        debug!(
            "Arranged {} nodes in {} chunks ({} recorded)",
            stats.nodes, stats.chunks, stats.recorded_chunks
        );

        Ok(Arrangement::Done(stats))
    }

    /// Grid cell a sixth of the way into the visible area
    ///
    /// # Errors
    /// Returns an error if no host is attached
    pub fn default_grid_position(&self) -> Result<GridPos, ArrangeError> {
        let host = self.host.borrow();
        let host = host.as_ref().ok_or(ArrangeError::NoHost)?;

        let (scroll, view, zoom) = (host.scroll_offset(), host.view_size(), host.zoom());
        let position = Point::new(
            (scroll.x + view.x / 6.0) / zoom,
            (scroll.y + view.y / 6.0) / zoom,
        );
        Ok(GridPos::from_pixels(position, self.config.cell_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryHost;
    use crate::{Connection, Vec2};
    use std::rc::{Rc, Weak};
    use test_log::test;

    #[test]
    fn missing_host_is_an_error() {
        let arranger = GraphArranger::<MemoryHost>::default();
        assert_eq!(arranger.arrange_nodes(), Err(ArrangeError::NoHost));
        assert_eq!(arranger.default_grid_position(), Err(ArrangeError::NoHost));
        assert!(!arranger.is_arranging());
    }

    #[test]
    fn invalid_grid_is_an_error() {
        let arranger = GraphArranger::with_host(
            ArrangerConfig::new(GridPos::new(100, 0)),
            MemoryHost::default(),
        );
        assert!(matches!(
            arranger.arrange_nodes(),
            Err(ArrangeError::InvalidGrid { .. })
        ));
        assert!(!arranger.is_arranging());
    }

    #[test]
    fn far_away_selection_is_an_error() {
        let mut host = MemoryHost::default();
        let a = host.add_node(0.0, 0.0);
        let far = host.add_node(1.0e12, 0.0);
        host.connect(a, 0, far, 0);

        let arranger = GraphArranger::with_host(ArrangerConfig::default(), host);
        assert_eq!(arranger.arrange_nodes(), Err(ArrangeError::OutOfRange));
        assert!(!arranger.is_arranging());

        let host = arranger.into_host().unwrap();
        assert_eq!(host.writes, 0);
        assert_eq!(host.nodes[far].position, Point::new(1.0e12, 0.0));
    }

    #[test]
    fn arranges_attached_host() {
        let mut host = MemoryHost::default();
        let a = host.add_node(0.0, 0.0);
        let b = host.add_node(0.0, 0.0);
        host.connect(a, 0, b, 0);

        let arranger = GraphArranger::default();
        assert!(arranger.attach(host).is_none());

        let result = arranger.arrange_nodes();
        assert_eq!(
            result,
            Ok(Arrangement::Done(ArrangeStats {
                nodes: 2,
                chunks: 1,
                recorded_chunks: 0,
            }))
        );

        let host = arranger.detach().unwrap();
        assert_eq!(host.nodes[b].position, Point::new(300.0, -25.0));
    }

    #[test]
    fn works_through_a_borrowed_host() {
        let mut host = MemoryHost::default();
        host.add_node(0.0, 0.0);
        host.add_node(0.0, 0.0);

        let arranger = GraphArranger::with_host(ArrangerConfig::default(), &mut host);
        arranger.arrange_nodes().unwrap();
        drop(arranger);

        assert_eq!(host.nodes[1].position, Point::new(0.0, 75.0));
    }

    #[test]
    fn state_does_not_leak_between_calls() {
        let mut host = MemoryHost::default();
        host.add_node(0.0, 0.0);
        let arranger = GraphArranger::with_host(ArrangerConfig::default(), host);

        // A single node never collides with the cells of the previous run
        for _ in 0..3 {
            arranger.arrange_nodes().unwrap();
            let position = arranger.with_host_mut(|h| h.nodes[0].position).unwrap();
            assert_eq!(position, Point::new(0.0, 0.0));
        }
    }

    #[test]
    fn default_position_follows_the_view() {
        let host = MemoryHost {
            scroll_offset: Vec2::new(600.0, 300.0),
            view_size: Vec2::new(1200.0, 600.0),
            zoom: 2.0,
            ..Default::default()
        };
        let arranger = GraphArranger::with_host(ArrangerConfig::default(), host);
        // ((600, 300) + (200, 100)) / 2 / (100, 25)
        assert_eq!(arranger.default_grid_position(), Ok(GridPos::new(4, 8)));
    }

    /// Host calling back into its own arranger whenever a node moves
    struct ReentrantHost {
        inner: MemoryHost,
        arranger: Weak<GraphArranger<ReentrantHost>>,
        nested: Vec<Result<Arrangement, ArrangeError>>,
    }

    impl GraphHost for ReentrantHost {
        type NodeId = usize;

        fn selected_nodes(&self) -> Vec<usize> {
            self.inner.selected_nodes()
        }

        fn is_selected(&self, node: usize) -> bool {
            self.inner.is_selected(node)
        }

        fn position(&self, node: usize) -> Point {
            self.inner.position(node)
        }

        fn set_position(&mut self, node: usize, position: Point) {
            self.inner.set_position(node, position);
            if let Some(arranger) = self.arranger.upgrade() {
                self.nested.push(arranger.arrange_nodes());
            }
        }

        fn size(&self, node: usize) -> Vec2 {
            self.inner.size(node)
        }

        fn connection_list(&self) -> Vec<Connection<usize>> {
            self.inner.connection_list()
        }
    }

    #[test]
    fn nested_call_is_skipped() {
        let mut inner = MemoryHost::default();
        let a = inner.add_node(0.0, 0.0);
        let b = inner.add_node(0.0, 0.0);
        inner.connect(a, 0, b, 0);

        let arranger = Rc::new(GraphArranger::default());
        arranger.attach(ReentrantHost {
            inner,
            arranger: Rc::downgrade(&arranger),
            nested: Vec::new(),
        });

        let result = arranger.arrange_nodes().unwrap();
        assert!(matches!(result, Arrangement::Done(ArrangeStats { nodes: 2, .. })));
        assert!(!arranger.is_arranging());

        let (nested, writes) = arranger
            .with_host_mut(|h| (h.nested.clone(), h.inner.writes))
            .unwrap();
        assert_eq!(nested, vec![Ok(Arrangement::Skipped); 2]);
        // One write per node, nothing from the nested calls
        assert_eq!(writes, 2);
    }
}
