//! Asynchronous path resolution over fresh topology snapshots.

use super::dijkstra::shortest_path;
use super::hop::{Endpoint, Hop};
use crate::topology::Graph;
use rswitch_openflow::{LinkStatus, RequestId, SendError, TopologyService};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// A completed resolution, handed back with the caller's context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<C> {
    pub request: RequestId,
    pub from: Endpoint,
    pub to: Endpoint,
    /// Empty when no path exists.
    pub hops: Vec<Hop>,
    pub context: C,
}

#[derive(Debug)]
struct PendingResolve<C> {
    from: Endpoint,
    to: Endpoint,
    context: C,
    issued_at: Instant,
}

/// Owns the graph store and the table of outstanding resolutions.
///
/// Each request completes at most once. A request whose snapshot never
/// arrives stays parked until [`expire_pending`](Self::expire_pending)
/// drops it; it is never completed late.
#[derive(Debug)]
pub struct PathResolver<C> {
    graph: Graph,
    pending: HashMap<RequestId, PendingResolve<C>>,
    next_request: u64,
    pending_timeout: Duration,
}

impl<C> PathResolver<C> {
    pub fn new(pending_timeout: Duration) -> Self {
        Self {
            graph: Graph::new(),
            pending: HashMap::new(),
            next_request: 1,
            pending_timeout,
        }
    }

    /// Starts a resolution from `from` to `to`.
    ///
    /// Issues a link query tagged with a fresh [`RequestId`] and parks
    /// `context` until [`on_link_snapshot`](Self::on_link_snapshot) is called
    /// with that id. If the query cannot be issued nothing is parked.
    pub fn resolve(
        &mut self,
        topology: &dyn TopologyService,
        from: Endpoint,
        to: Endpoint,
        context: C,
        now: Instant,
    ) -> Result<RequestId, SendError> {
        let request = RequestId::new(self.next_request);
        self.next_request = self.next_request.wrapping_add(1);

        self.pending.insert(
            request,
            PendingResolve {
                from,
                to,
                context,
                issued_at: now,
            },
        );

        if let Err(e) = topology.query_links(request) {
            self.pending.remove(&request);
            return Err(e);
        }

        debug!(request_id = %request, %from, %to, "Issued topology query");
        Ok(request)
    }

    /// Completes the resolution waiting on `request`.
    ///
    /// The graph is rebuilt from `snapshot` before the search. Returns `None`
    /// if no resolution is waiting on `request`.
    pub fn on_link_snapshot(
        &mut self,
        request: RequestId,
        snapshot: &[LinkStatus],
    ) -> Option<Resolution<C>> {
        let Some(pending) = self.pending.remove(&request) else {
            debug!(request_id = %request, "Snapshot for unknown or expired request");
            return None;
        };

        self.graph.rebuild(snapshot);
        let hops = shortest_path(&self.graph, pending.from, pending.to);

        Some(Resolution {
            request,
            from: pending.from,
            to: pending.to,
            hops,
            context: pending.context,
        })
    }

    /// Drops resolutions that have waited longer than the pending timeout.
    ///
    /// Returns the number dropped.
    pub fn expire_pending(&mut self, now: Instant) -> usize {
        let timeout = self.pending_timeout;
        let before = self.pending.len();
        self.pending
            .retain(|_, p| now.saturating_duration_since(p.issued_at) <= timeout);
        before - self.pending.len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, request: RequestId) -> bool {
        self.pending.contains_key(&request)
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Mutable access for incremental link updates between snapshots.
    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }
}
