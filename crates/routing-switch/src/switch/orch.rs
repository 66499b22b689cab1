//! Packet-in handling and flow programming.

use super::types::{DropReason, PacketInVerdict, PathOutcome, PendingPacket, RoutingSwitchStats};
use crate::clock::Clock;
use crate::config::RoutingSwitchConfig;
use crate::fdb::{FdbOrch, LearnOutcome, Location};
use crate::path::{Endpoint, Hop, PathResolver};
use crate::topology::{PortTable, LINK_COST_UP};
use rswitch_openflow::packet::ETH_TYPE_LLDP;
use rswitch_openflow::{
    pad_to_minimum, Action, EthernetHeader, FeaturesReply, FlowMod, FlowModFlags, LinkStatus,
    Match, Message, MessageSender, PacketIn, PacketOut, PortState, PortStatus, RequestId,
    SwitchConfig, TopologyService, XidGenerator,
};
use rswitch_types::{MacAddress, PortNo, SwitchId};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Priority of discard flows.
pub const DISCARD_PRIORITY: u16 = u16::MAX;

/// The routing switch.
pub struct RoutingSwitchOrch {
    config: RoutingSwitchConfig,
    ports: PortTable,
    fdb: FdbOrch,
    resolver: PathResolver<PendingPacket>,
    sender: Arc<dyn MessageSender>,
    topology: Arc<dyn TopologyService>,
    clock: Arc<dyn Clock>,
    xids: XidGenerator,
    stats: RoutingSwitchStats,
}

impl RoutingSwitchOrch {
    pub fn new(
        config: RoutingSwitchConfig,
        sender: Arc<dyn MessageSender>,
        topology: Arc<dyn TopologyService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let fdb = FdbOrch::new(config.fdb.clone());
        let resolver = PathResolver::new(config.resolver.pending_timeout());
        Self {
            config,
            ports: PortTable::new(),
            fdb,
            resolver,
            sender,
            topology,
            clock,
            xids: XidGenerator::new(),
            stats: RoutingSwitchStats::default(),
        }
    }

    /// Handles a packet that missed a switch's flow table.
    pub fn on_packet_in(&mut self, packet_in: PacketIn) -> PacketInVerdict {
        self.stats.packet_ins += 1;
        let switch = packet_in.switch;
        let in_port = packet_in.in_port;

        let eth = match EthernetHeader::parse(&packet_in.data) {
            Ok(eth) => eth,
            Err(e) => {
                debug!(%switch, port = %in_port, error = %e, "Dropping unclassifiable packet");
                return self.drop_packet(DropReason::Unclassifiable);
            }
        };
        if eth.ethertype == ETH_TYPE_LLDP {
            return self.drop_packet(DropReason::Discovery);
        }

        let Some(port) = self.ports.lookup_port(switch, in_port).copied() else {
            warn!(%switch, port = %in_port, "Packet-in from unknown port");
            return self.drop_packet(DropReason::UnknownPort);
        };

        // Internal ports only relay towards known hosts over confirmed links
        if !port.external_link
            && !(port.is_confirmed_relay() && self.fdb.lookup(eth.dst).is_some())
        {
            debug!(%switch, port = %in_port, dst = %eth.dst, "Ingress port not eligible");
            return self.drop_packet(DropReason::NotEligible);
        }

        let now = self.clock.now();
        match self.fdb.learn(eth.src, switch, in_port, now) {
            LearnOutcome::Created | LearnOutcome::Refreshed => {}
            LearnOutcome::Moved { previous } => {
                self.stats.hosts_moved += 1;
                self.poison(previous.switch, eth.src);
            }
            LearnOutcome::Rejected { .. } => {
                return self.drop_packet(DropReason::HostMoveGuard);
            }
            LearnOutcome::InvalidSource => {
                debug!(%switch, port = %in_port, src = %eth.src, "Group source address");
                return self.drop_packet(DropReason::InvalidSource);
            }
        }

        match self.fdb.lookup(eth.dst) {
            None => self.flood(&packet_in),
            Some(location) if location == Location::new(switch, in_port) => {
                debug!(%switch, port = %in_port, dst = %eth.dst, "Destination already on ingress port");
                self.drop_packet(DropReason::AlreadyPlaced)
            }
            Some(location) => self.resolve(packet_in, location, now),
        }
    }

    /// Finishes the resolution waiting on `request`.
    ///
    /// Returns `None` if nothing was waiting on it.
    pub fn on_link_snapshot(
        &mut self,
        request: RequestId,
        links: &[LinkStatus],
    ) -> Option<PathOutcome> {
        let resolution = self.resolver.on_link_snapshot(request, links)?;

        if resolution.hops.is_empty() {
            debug!(
                request_id = %request,
                from = %resolution.from,
                to = %resolution.to,
                "No path, installing discard flow"
            );
            return Some(self.install_discard(&resolution.context));
        }

        debug!(
            request_id = %request,
            from = %resolution.from,
            to = %resolution.to,
            hops = resolution.hops.len(),
            "Installing path"
        );
        Some(self.install_path(&resolution.hops, &resolution.context))
    }

    /// Applies a single port-status record.
    pub fn on_port_status(&mut self, status: &PortStatus) {
        let switch = status.switch;
        let port = status.port;

        match status.status {
            PortState::Up => {
                if self.ports.lookup_port(switch, port).is_some() {
                    if let Err(e) = self.ports.update_port(switch, port, status.external) {
                        warn!(%switch, %port, error = %e, "Failed to update port");
                    }
                } else {
                    self.ports.add_port(switch, port, status.external);
                    debug!(%switch, %port, external = status.external, "Port added");
                }
            }
            PortState::Down => match self.ports.remove_port(switch, port) {
                Ok(_) => {
                    let purged = self.fdb.delete_entries_for(switch, port);
                    debug!(%switch, %port, purged, "Port removed");
                }
                Err(e) => warn!(%switch, %port, error = %e, "Port-status for unknown port"),
            },
        }
    }

    /// Applies a single link-status record.
    pub fn on_link_status(&mut self, link: &LinkStatus) {
        let up = link.status.is_up();

        if let Err(e) = self.ports.mark_link(link.from_switch, link.from_port, up) {
            warn!(error = %e, "Link-status for unknown source port");
        }
        if let Err(e) = self
            .ports
            .mark_reverse_link(link.to_switch, link.to_port, up)
        {
            warn!(error = %e, "Link-status for unknown destination port");
        }

        let graph = self.resolver.graph_mut();
        if up {
            graph.add_link(
                link.from_switch,
                link.from_port,
                link.to_switch,
                link.to_port,
                LINK_COST_UP,
            );
        } else {
            graph.update_link(link.from_switch, link.from_port, false);
        }
    }

    /// A switch finished its handshake: ask for its features.
    pub fn on_switch_ready(&mut self, switch: SwitchId) {
        info!(%switch, "Switch ready");
        let message = Message::features_request(self.xids.next_xid());
        self.send(switch, message);
    }

    /// Pushes the configured miss-send length to a newly joined switch.
    pub fn on_features_reply(&mut self, reply: &FeaturesReply) {
        debug!(
            switch = %reply.switch,
            n_buffers = reply.n_buffers,
            n_tables = reply.n_tables,
            ports = reply.ports.len(),
            "Features reply"
        );
        let config = SwitchConfig {
            flags: 0,
            miss_send_len: self.config.switching.miss_send_len,
        };
        let message = Message::set_config(self.xids.next_xid(), config);
        self.send(reply.switch, message);
    }

    /// Periodic maintenance: ages out hosts and drops abandoned resolutions.
    ///
    /// Returns the number of FDB entries evicted.
    pub fn on_timer(&mut self) -> usize {
        let now = self.clock.now();
        let evicted = self.fdb.evict_expired(now);
        let expired = self.resolver.expire_pending(now);

        self.stats.fdb_evictions += evicted as u64;
        self.stats.resolutions_expired += expired as u64;
        if evicted > 0 || expired > 0 {
            debug!(evicted, expired, "Timer sweep");
        }
        evicted
    }

    pub fn config(&self) -> &RoutingSwitchConfig {
        &self.config
    }

    pub fn ports(&self) -> &PortTable {
        &self.ports
    }

    pub fn fdb(&self) -> &FdbOrch {
        &self.fdb
    }

    pub fn resolver(&self) -> &PathResolver<PendingPacket> {
        &self.resolver
    }

    pub fn stats(&self) -> &RoutingSwitchStats {
        &self.stats
    }

    fn drop_packet(&mut self, reason: DropReason) -> PacketInVerdict {
        self.stats.record_drop(reason);
        PacketInVerdict::Dropped(reason)
    }

    /// Sends the packet out of every external port in the network except
    /// the one it came in on.
    fn flood(&mut self, packet_in: &PacketIn) -> PacketInVerdict {
        let data = pad_to_minimum(&packet_in.data);

        let packet_outs: Vec<(SwitchId, PacketOut)> = self
            .ports
            .switches()
            .filter_map(|info| {
                let is_ingress_switch = info.id() == packet_in.switch;
                let actions: Vec<Action> = info
                    .ports()
                    .filter(|p| p.is_flood_target())
                    .filter(|p| !(is_ingress_switch && p.port_no == packet_in.in_port))
                    .map(|p| Action::output(p.port_no))
                    .collect();
                if actions.is_empty() {
                    return None;
                }
                let in_port = if is_ingress_switch {
                    packet_in.in_port
                } else {
                    PortNo::NONE
                };
                Some((info.id(), PacketOut::with_data(in_port, actions, data.clone())))
            })
            .collect();

        let switches = packet_outs.len();
        for (switch, packet_out) in packet_outs {
            self.send_packet_out(switch, packet_out);
        }
        self.stats.floods += 1;
        debug!(switch = %packet_in.switch, port = %packet_in.in_port, switches, "Flooded packet");
        PacketInVerdict::Flooded { switches }
    }

    fn resolve(
        &mut self,
        packet_in: PacketIn,
        destination: Location,
        now: Instant,
    ) -> PacketInVerdict {
        let from = Endpoint::new(packet_in.switch, packet_in.in_port);
        let context = PendingPacket {
            switch: packet_in.switch,
            in_port: packet_in.in_port,
            data: packet_in.data,
        };

        match self.resolver.resolve(
            self.topology.as_ref(),
            from,
            destination.into(),
            context,
            now,
        ) {
            Ok(request) => {
                self.stats.resolutions_started += 1;
                PacketInVerdict::Resolving(request)
            }
            Err(e) => {
                warn!(%from, to = %destination, error = %e, "Failed to query topology");
                self.stats.send_failures += 1;
                self.drop_packet(DropReason::TopologyUnavailable)
            }
        }
    }

    /// Installs one flow per hop, tail first, then releases the packet at
    /// the tail.
    ///
    /// Hop `i` (1-based from the ingress switch) idles out after
    /// `idle_timeout_secs + i` so flows nearer the source expire first.
    fn install_path(&mut self, hops: &[Hop], packet: &PendingPacket) -> PathOutcome {
        let Some(tail) = hops.last().copied() else {
            return self.install_discard(packet);
        };
        let base_match = match Match::from_packet(packet.in_port, &packet.data) {
            Ok(m) => m,
            Err(e) => {
                debug!(switch = %packet.switch, error = %e, "Cannot build match for path");
                return PathOutcome::Unclassifiable;
            }
        };

        let switching = &self.config.switching;
        let base_idle = switching.idle_timeout_secs;
        let priority = switching.flow_priority;
        let flags = FlowModFlags {
            send_flow_removed: true,
            ..FlowModFlags::default()
        };

        for (index, hop) in hops.iter().enumerate().rev() {
            let distance = u16::try_from(index + 1).unwrap_or(u16::MAX);
            let flow_mod = FlowMod::add(
                base_match.clone().with_in_port(hop.in_port),
                base_idle.saturating_add(distance),
                0,
                priority,
                vec![Action::output(hop.out_port)],
            )
            .with_flags(flags);
            // A failed hop does not stop the rest of the path
            self.send_flow_mod(hop.switch, flow_mod);
        }

        let packet_out = PacketOut::with_data(
            PortNo::NONE,
            vec![Action::output(tail.out_port)],
            pad_to_minimum(&packet.data),
        );
        self.send_packet_out(tail.switch, packet_out);

        self.stats.paths_installed += 1;
        PathOutcome::Installed { hops: hops.len() }
    }

    /// Installs a short-lived drop flow for the packet at its ingress switch.
    fn install_discard(&mut self, packet: &PendingPacket) -> PathOutcome {
        let flow_match = match Match::from_packet(packet.in_port, &packet.data) {
            Ok(m) => m,
            Err(e) => {
                debug!(switch = %packet.switch, error = %e, "Cannot build match for discard");
                return PathOutcome::Unclassifiable;
            }
        };

        let flow_mod = FlowMod::add(
            flow_match,
            0,
            self.config.switching.discard_hard_timeout_secs,
            DISCARD_PRIORITY,
            Vec::new(),
        );
        self.send_flow_mod(packet.switch, flow_mod);
        self.stats.discards_installed += 1;
        PathOutcome::Discarded
    }

    /// Deletes flows to and from a moved host at its old switch.
    fn poison(&mut self, switch: SwitchId, mac: MacAddress) {
        debug!(%switch, %mac, "Poisoning stale flows");
        self.send_flow_mod(switch, FlowMod::delete(Match::dl_src(mac)));
        self.send_flow_mod(switch, FlowMod::delete(Match::dl_dst(mac)));
    }

    fn send_flow_mod(&mut self, switch: SwitchId, flow_mod: FlowMod) -> bool {
        let message = Message::flow_mod(self.xids.next_xid(), flow_mod);
        let sent = self.send(switch, message);
        if sent {
            self.stats.flow_mods_sent += 1;
        }
        sent
    }

    fn send_packet_out(&mut self, switch: SwitchId, packet_out: PacketOut) -> bool {
        let message = Message::packet_out(self.xids.next_xid(), packet_out);
        let sent = self.send(switch, message);
        if sent {
            self.stats.packet_outs_sent += 1;
        }
        sent
    }

    fn send(&mut self, switch: SwitchId, message: Message) -> bool {
        match self.sender.send_message(switch, message) {
            Ok(()) => true,
            Err(e) => {
                warn!(%switch, error = %e, "Failed to send message");
                self.stats.send_failures += 1;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use pretty_assertions::assert_eq;
    use rswitch_openflow::{FlowModCommand, LinkState, MessageBody, PacketInReason, SendError};
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingSender {
        sent: Mutex<Vec<(SwitchId, Message)>>,
        unreachable: Mutex<HashSet<SwitchId>>,
    }

    impl RecordingSender {
        fn take(&self) -> Vec<(SwitchId, Message)> {
            std::mem::take(&mut *self.sent.lock().unwrap())
        }
    }

    impl MessageSender for RecordingSender {
        fn send_message(&self, switch: SwitchId, message: Message) -> Result<(), SendError> {
            if self.unreachable.lock().unwrap().contains(&switch) {
                return Err(SendError::NotConnected(switch));
            }
            self.sent.lock().unwrap().push((switch, message));
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingTopology {
        queries: Mutex<Vec<RequestId>>,
    }

    impl TopologyService for RecordingTopology {
        fn query_links(&self, request: RequestId) -> Result<(), SendError> {
            self.queries.lock().unwrap().push(request);
            Ok(())
        }
    }

    struct Harness {
        orch: RoutingSwitchOrch,
        sender: Arc<RecordingSender>,
        topology: Arc<RecordingTopology>,
        clock: Arc<ManualClock>,
    }

    fn harness() -> Harness {
        let sender = Arc::new(RecordingSender::default());
        let topology = Arc::new(RecordingTopology::default());
        let clock = Arc::new(ManualClock::new());
        let orch = RoutingSwitchOrch::new(
            RoutingSwitchConfig::default(),
            sender.clone(),
            topology.clone(),
            clock.clone(),
        );
        Harness {
            orch,
            sender,
            topology,
            clock,
        }
    }

    const SW1: SwitchId = SwitchId::new(1);
    const SW2: SwitchId = SwitchId::new(2);

    fn mac(last: u8) -> MacAddress {
        MacAddress::new([0, 0, 0, 0, 0, last])
    }

    fn frame(dst: MacAddress, src: MacAddress) -> Vec<u8> {
        let mut f = Vec::new();
        f.extend_from_slice(dst.as_bytes());
        f.extend_from_slice(src.as_bytes());
        f.extend_from_slice(&0x88b5u16.to_be_bytes());
        f.extend_from_slice(&[0u8; 8]);
        f
    }

    fn packet_in(switch: SwitchId, port: u16, dst: MacAddress, src: MacAddress) -> PacketIn {
        let data = frame(dst, src);
        PacketIn {
            switch,
            xid: 0,
            buffer_id: None,
            total_len: data.len() as u16,
            in_port: PortNo::new(port),
            reason: PacketInReason::NoMatch,
            data,
        }
    }

    fn port_up(switch: SwitchId, port: u16, external: bool) -> PortStatus {
        PortStatus {
            switch,
            port: PortNo::new(port),
            external,
            status: PortState::Up,
        }
    }

    fn link(from: SwitchId, from_port: u16, to: SwitchId, to_port: u16, status: LinkState) -> LinkStatus {
        LinkStatus {
            from_switch: from,
            from_port: PortNo::new(from_port),
            to_switch: to,
            to_port: PortNo::new(to_port),
            status,
        }
    }

    /// Two switches joined on port 2, each with hosts on ports 1 and 3.
    fn two_switches(h: &mut Harness) {
        for sw in [SW1, SW2] {
            h.orch.on_port_status(&port_up(sw, 1, true));
            h.orch.on_port_status(&port_up(sw, 2, false));
            h.orch.on_port_status(&port_up(sw, 3, true));
        }
        h.orch.on_link_status(&link(SW1, 2, SW2, 2, LinkState::Up));
        h.orch.on_link_status(&link(SW2, 2, SW1, 2, LinkState::Up));
    }

    #[test]
    fn test_unknown_port_dropped() {
        let mut h = harness();
        let verdict = h.orch.on_packet_in(packet_in(SW1, 1, mac(2), mac(1)));

        assert_eq!(verdict, PacketInVerdict::Dropped(DropReason::UnknownPort));
        assert!(h.sender.take().is_empty());
        assert!(h.orch.fdb().is_empty());
    }

    #[test]
    fn test_runt_frame_dropped() {
        let mut h = harness();
        two_switches(&mut h);
        let mut pi = packet_in(SW1, 1, mac(2), mac(1));
        pi.data.truncate(10);

        let verdict = h.orch.on_packet_in(pi);
        assert_eq!(verdict, PacketInVerdict::Dropped(DropReason::Unclassifiable));
    }

    #[test]
    fn test_lldp_not_learned() {
        let mut h = harness();
        two_switches(&mut h);
        let mut pi = packet_in(SW1, 1, mac(2), mac(1));
        pi.data[12..14].copy_from_slice(&ETH_TYPE_LLDP.to_be_bytes());

        let verdict = h.orch.on_packet_in(pi);
        assert_eq!(verdict, PacketInVerdict::Dropped(DropReason::Discovery));
        assert!(h.orch.fdb().is_empty());
    }

    #[test]
    fn test_flood_skips_ingress_and_internal_ports() {
        let mut h = harness();
        two_switches(&mut h);

        let verdict = h.orch.on_packet_in(packet_in(SW1, 1, mac(9), mac(1)));
        assert_eq!(verdict, PacketInVerdict::Flooded { switches: 2 });

        let sent = h.sender.take();
        assert_eq!(sent.len(), 2);

        let (sw, msg) = &sent[0];
        assert_eq!(*sw, SW1);
        let po = msg.as_packet_out().unwrap();
        assert_eq!(po.output_ports(), vec![PortNo::new(3)]);
        assert_eq!(po.in_port, PortNo::new(1));
        assert_eq!(po.buffer_id, None);
        assert_eq!(po.data.len(), 60);

        let (sw, msg) = &sent[1];
        assert_eq!(*sw, SW2);
        let po = msg.as_packet_out().unwrap();
        assert_eq!(po.output_ports(), vec![PortNo::new(1), PortNo::new(3)]);
        assert_eq!(po.in_port, PortNo::NONE);

        assert_eq!(h.orch.fdb().lookup(mac(1)), Some(Location::new(SW1, PortNo::new(1))));
    }

    #[test]
    fn test_flood_skips_reverse_link_ports() {
        let mut h = harness();
        h.orch.on_port_status(&port_up(SW1, 1, true));
        h.orch.on_port_status(&port_up(SW1, 2, true));
        h.orch.on_port_status(&port_up(SW2, 1, true));
        // Only one direction discovered so far: SW2 still reports port 1 external
        h.orch.on_link_status(&link(SW1, 2, SW2, 1, LinkState::Up));

        let verdict = h.orch.on_packet_in(packet_in(SW1, 1, mac(9), mac(1)));
        assert_eq!(verdict, PacketInVerdict::Flooded { switches: 1 });

        let sent = h.sender.take();
        assert_eq!(sent[0].0, SW1);
        assert_eq!(sent[0].1.as_packet_out().unwrap().output_ports(), vec![PortNo::new(2)]);
    }

    #[test]
    fn test_internal_port_without_relay_dropped() {
        let mut h = harness();
        two_switches(&mut h);

        // Destination unknown: relay exception does not apply
        let verdict = h.orch.on_packet_in(packet_in(SW2, 2, mac(9), mac(1)));
        assert_eq!(verdict, PacketInVerdict::Dropped(DropReason::NotEligible));
        assert!(h.orch.fdb().is_empty());
    }

    #[test]
    fn test_confirmed_relay_accepted_for_known_destination() {
        let mut h = harness();
        two_switches(&mut h);
        h.orch.on_packet_in(packet_in(SW2, 3, mac(9), mac(5)));
        h.sender.take();

        let verdict = h.orch.on_packet_in(packet_in(SW2, 2, mac(5), mac(1)));
        assert!(matches!(verdict, PacketInVerdict::Resolving(_)));
    }

    #[test]
    fn test_half_confirmed_link_not_relayed() {
        let mut h = harness();
        for sw in [SW1, SW2] {
            h.orch.on_port_status(&port_up(sw, 2, false));
            h.orch.on_port_status(&port_up(sw, 3, true));
        }
        // Only SW1 -> SW2 discovered: SW2 port 2 has the reverse flag only
        h.orch.on_link_status(&link(SW1, 2, SW2, 2, LinkState::Up));
        h.orch.on_packet_in(packet_in(SW2, 3, mac(9), mac(5)));

        let verdict = h.orch.on_packet_in(packet_in(SW2, 2, mac(5), mac(1)));
        assert_eq!(verdict, PacketInVerdict::Dropped(DropReason::NotEligible));
    }

    #[test]
    fn test_destination_on_ingress_port_dropped() {
        let mut h = harness();
        two_switches(&mut h);
        h.orch.on_packet_in(packet_in(SW1, 1, mac(9), mac(2)));
        h.sender.take();

        let verdict = h.orch.on_packet_in(packet_in(SW1, 1, mac(2), mac(1)));
        assert_eq!(verdict, PacketInVerdict::Dropped(DropReason::AlreadyPlaced));
        assert!(h.sender.take().is_empty());
    }

    #[test]
    fn test_multicast_source_dropped() {
        let mut h = harness();
        two_switches(&mut h);

        let verdict = h.orch.on_packet_in(packet_in(SW1, 1, mac(2), MacAddress::BROADCAST));
        assert_eq!(verdict, PacketInVerdict::Dropped(DropReason::InvalidSource));
        assert!(h.orch.fdb().is_empty());
    }

    #[test]
    fn test_host_move_guard_and_poisoning() {
        let mut h = harness();
        two_switches(&mut h);
        h.orch.on_packet_in(packet_in(SW1, 1, mac(9), mac(1)));
        h.sender.take();

        h.clock.advance(Duration::from_secs(2));
        let verdict = h.orch.on_packet_in(packet_in(SW2, 1, mac(9), mac(1)));
        assert_eq!(verdict, PacketInVerdict::Dropped(DropReason::HostMoveGuard));
        assert!(h.sender.take().is_empty());

        h.clock.advance(Duration::from_secs(4));
        let verdict = h.orch.on_packet_in(packet_in(SW2, 1, mac(9), mac(1)));
        assert!(matches!(verdict, PacketInVerdict::Flooded { .. }));

        let sent = h.sender.take();
        let deletes: Vec<&FlowMod> = sent
            .iter()
            .filter(|(sw, _)| *sw == SW1)
            .filter_map(|(_, m)| m.as_flow_mod())
            .collect();
        assert_eq!(deletes.len(), 2);
        assert!(deletes.iter().all(|fm| fm.command == FlowModCommand::Delete));
        assert_eq!(deletes[0].flow_match, Match::dl_src(mac(1)));
        assert_eq!(deletes[1].flow_match, Match::dl_dst(mac(1)));
        assert_eq!(h.orch.stats().hosts_moved, 1);
    }

    #[test]
    fn test_resolution_installs_path() {
        let mut h = harness();
        two_switches(&mut h);
        h.orch.on_packet_in(packet_in(SW2, 3, mac(9), mac(5)));
        h.sender.take();

        let PacketInVerdict::Resolving(request) =
            h.orch.on_packet_in(packet_in(SW1, 1, mac(5), mac(1)))
        else {
            panic!("expected resolution");
        };
        assert_eq!(*h.topology.queries.lock().unwrap(), vec![request]);

        let outcome = h.orch.on_link_snapshot(
            request,
            &[
                link(SW1, 2, SW2, 2, LinkState::Up),
                link(SW2, 2, SW1, 2, LinkState::Up),
            ],
        );
        assert_eq!(outcome, Some(PathOutcome::Installed { hops: 2 }));

        let sent = h.sender.take();
        assert_eq!(sent.len(), 3);
        assert_eq!(sent[0].0, SW2);
        let tail = sent[0].1.as_flow_mod().unwrap();
        assert_eq!(tail.flow_match.in_port, Some(PortNo::new(2)));
        assert_eq!(tail.actions, vec![Action::output(PortNo::new(3))]);
        assert_eq!(tail.idle_timeout, 62);
        assert!(tail.flags.send_flow_removed);

        assert_eq!(sent[1].0, SW1);
        let head = sent[1].1.as_flow_mod().unwrap();
        assert_eq!(head.flow_match.in_port, Some(PortNo::new(1)));
        assert_eq!(head.actions, vec![Action::output(PortNo::new(2))]);
        assert_eq!(head.idle_timeout, 61);

        assert_eq!(sent[2].0, SW2);
        let po = sent[2].1.as_packet_out().unwrap();
        assert_eq!(po.output_ports(), vec![PortNo::new(3)]);

        // Completed once only
        assert_eq!(h.orch.on_link_snapshot(request, &[]), None);
    }

    #[test]
    fn test_no_path_installs_discard() {
        let mut h = harness();
        two_switches(&mut h);
        h.orch.on_packet_in(packet_in(SW2, 3, mac(9), mac(5)));
        h.sender.take();

        let PacketInVerdict::Resolving(request) =
            h.orch.on_packet_in(packet_in(SW1, 1, mac(5), mac(1)))
        else {
            panic!("expected resolution");
        };
        let outcome = h.orch.on_link_snapshot(request, &[]);
        assert_eq!(outcome, Some(PathOutcome::Discarded));

        let sent = h.sender.take();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, SW1);
        let fm = sent[0].1.as_flow_mod().unwrap();
        assert!(fm.is_drop());
        assert_eq!(fm.hard_timeout, 1);
        assert_eq!(fm.priority, DISCARD_PRIORITY);
        assert_eq!(fm.buffer_id, None);
    }

    #[test]
    fn test_send_failure_does_not_abort_path() {
        let mut h = harness();
        two_switches(&mut h);
        h.orch.on_packet_in(packet_in(SW2, 3, mac(9), mac(5)));
        h.sender.take();
        h.sender.unreachable.lock().unwrap().insert(SW2);

        let PacketInVerdict::Resolving(request) =
            h.orch.on_packet_in(packet_in(SW1, 1, mac(5), mac(1)))
        else {
            panic!("expected resolution");
        };
        h.orch.on_link_snapshot(request, &[link(SW1, 2, SW2, 2, LinkState::Up)]);

        let sent = h.sender.take();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, SW1);
        assert_eq!(h.orch.stats().send_failures, 2);
    }

    #[test]
    fn test_port_down_purges_fdb() {
        let mut h = harness();
        two_switches(&mut h);
        h.orch.on_packet_in(packet_in(SW1, 1, mac(9), mac(1)));
        assert!(h.orch.fdb().lookup(mac(1)).is_some());

        h.orch.on_port_status(&PortStatus {
            switch: SW1,
            port: PortNo::new(1),
            external: true,
            status: PortState::Down,
        });
        assert!(h.orch.ports().lookup_port(SW1, PortNo::new(1)).is_none());
        assert_eq!(h.orch.fdb().lookup(mac(1)), None);
    }

    #[test]
    fn test_port_up_updates_existing_port() {
        let mut h = harness();
        h.orch.on_port_status(&port_up(SW1, 1, true));
        h.orch.on_port_status(&port_up(SW1, 1, false));

        let port = h.orch.ports().lookup_port(SW1, PortNo::new(1)).unwrap();
        assert!(!port.external_link);
        assert_eq!(h.orch.ports().port_count(), 1);
    }

    #[test]
    fn test_link_status_marks_both_ends() {
        let mut h = harness();
        two_switches(&mut h);
        h.orch.on_link_status(&link(SW1, 2, SW2, 2, LinkState::Down));

        let from = h.orch.ports().lookup_port(SW1, PortNo::new(2)).unwrap();
        assert!(!from.switch_to_switch_link);
        assert!(from.switch_to_switch_reverse_link);
        let to = h.orch.ports().lookup_port(SW2, PortNo::new(2)).unwrap();
        assert!(to.switch_to_switch_link);
        assert!(!to.switch_to_switch_reverse_link);

        let edge = h.orch.resolver().graph().get_node(SW1).unwrap().edge_to(SW2).unwrap();
        assert!(!edge.up);
    }

    #[test]
    fn test_handshake_messages() {
        let mut h = harness();
        h.orch.on_switch_ready(SW1);
        h.orch.on_features_reply(&FeaturesReply {
            switch: SW1,
            xid: 1,
            n_buffers: 256,
            n_tables: 1,
            ports: vec![PortNo::new(1)],
        });

        let sent = h.sender.take();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].1.body, MessageBody::FeaturesRequest);
        assert_eq!(
            sent[1].1.body,
            MessageBody::SetConfig(SwitchConfig {
                flags: 0,
                miss_send_len: u16::MAX
            })
        );
        assert_ne!(sent[0].1.xid, sent[1].1.xid);
    }

    #[test]
    fn test_timer_evicts_and_expires() {
        let mut h = harness();
        two_switches(&mut h);
        h.orch.on_packet_in(packet_in(SW2, 3, mac(9), mac(5)));
        let verdict = h.orch.on_packet_in(packet_in(SW1, 1, mac(5), mac(1)));
        assert!(matches!(verdict, PacketInVerdict::Resolving(_)));

        h.clock.advance(Duration::from_secs(301));
        assert_eq!(h.orch.on_timer(), 2);
        assert!(h.orch.fdb().is_empty());
        assert_eq!(h.orch.resolver().pending_count(), 0);
        assert_eq!(h.orch.stats().resolutions_expired, 1);
    }
}
