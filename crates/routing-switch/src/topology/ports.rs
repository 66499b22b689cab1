//! Per-switch port state.

use crate::error::TopologyError;
use rswitch_types::{PortNo, SwitchId};
use std::collections::BTreeMap;

/// State of one switch port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortInfo {
    pub switch: SwitchId,
    pub port_no: PortNo,
    /// No switch-to-switch link has been discovered on the port.
    pub external_link: bool,
    /// A discovered link leaves from this port.
    pub switch_to_switch_link: bool,
    /// A discovered link arrives at this port.
    pub switch_to_switch_reverse_link: bool,
}

impl PortInfo {
    pub fn new(switch: SwitchId, port_no: PortNo, external_link: bool) -> Self {
        Self {
            switch,
            port_no,
            external_link,
            switch_to_switch_link: false,
            switch_to_switch_reverse_link: false,
        }
    }

    /// Whether a flooded packet should leave through this port.
    pub fn is_flood_target(&self) -> bool {
        self.external_link && !self.switch_to_switch_reverse_link
    }

    /// An internal port with a link confirmed in both directions.
    pub fn is_confirmed_relay(&self) -> bool {
        !self.external_link && self.switch_to_switch_link && self.switch_to_switch_reverse_link
    }
}

/// A switch and its ports, in port order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchInfo {
    id: SwitchId,
    ports: BTreeMap<PortNo, PortInfo>,
}

impl SwitchInfo {
    fn new(id: SwitchId) -> Self {
        Self {
            id,
            ports: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> SwitchId {
        self.id
    }

    pub fn ports(&self) -> impl Iterator<Item = &PortInfo> {
        self.ports.values()
    }

    pub fn port(&self, port_no: PortNo) -> Option<&PortInfo> {
        self.ports.get(&port_no)
    }

    pub fn port_count(&self) -> usize {
        self.ports.len()
    }
}

/// All known switches and ports.
///
/// A [`SwitchInfo`] exists exactly as long as it has at least one port.
#[derive(Debug, Clone, Default)]
pub struct PortTable {
    switches: BTreeMap<SwitchId, SwitchInfo>,
}

impl PortTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a port, creating its switch on first use.
    ///
    /// Returns false (and leaves the port untouched) if it already exists.
    pub fn add_port(&mut self, switch: SwitchId, port_no: PortNo, external_link: bool) -> bool {
        let info = self
            .switches
            .entry(switch)
            .or_insert_with(|| SwitchInfo::new(switch));
        if info.ports.contains_key(&port_no) {
            return false;
        }
        info.ports
            .insert(port_no, PortInfo::new(switch, port_no, external_link));
        true
    }

    /// Removes a port, dropping its switch once the last port is gone.
    pub fn remove_port(
        &mut self,
        switch: SwitchId,
        port_no: PortNo,
    ) -> Result<PortInfo, TopologyError> {
        let info = self
            .switches
            .get_mut(&switch)
            .ok_or(TopologyError::UnknownSwitch(switch))?;
        let removed = info
            .ports
            .remove(&port_no)
            .ok_or(TopologyError::UnknownPort {
                switch,
                port: port_no,
            })?;
        if info.ports.is_empty() {
            self.switches.remove(&switch);
        }
        Ok(removed)
    }

    /// Sets a port's external flag.
    pub fn update_port(
        &mut self,
        switch: SwitchId,
        port_no: PortNo,
        external_link: bool,
    ) -> Result<(), TopologyError> {
        self.port_mut(switch, port_no)?.external_link = external_link;
        Ok(())
    }

    /// Sets the switch-to-switch flag of the port a link leaves from.
    pub fn mark_link(
        &mut self,
        switch: SwitchId,
        port_no: PortNo,
        up: bool,
    ) -> Result<(), TopologyError> {
        self.port_mut(switch, port_no)?.switch_to_switch_link = up;
        Ok(())
    }

    /// Sets the reverse flag of the port a link arrives at.
    pub fn mark_reverse_link(
        &mut self,
        switch: SwitchId,
        port_no: PortNo,
        up: bool,
    ) -> Result<(), TopologyError> {
        self.port_mut(switch, port_no)?.switch_to_switch_reverse_link = up;
        Ok(())
    }

    pub fn lookup_port(&self, switch: SwitchId, port_no: PortNo) -> Option<&PortInfo> {
        self.switches.get(&switch)?.port(port_no)
    }

    pub fn switch(&self, switch: SwitchId) -> Option<&SwitchInfo> {
        self.switches.get(&switch)
    }

    /// Switches in ascending datapath id order.
    pub fn switches(&self) -> impl Iterator<Item = &SwitchInfo> {
        self.switches.values()
    }

    pub fn switch_count(&self) -> usize {
        self.switches.len()
    }

    pub fn port_count(&self) -> usize {
        self.switches.values().map(SwitchInfo::port_count).sum()
    }

    fn port_mut(
        &mut self,
        switch: SwitchId,
        port_no: PortNo,
    ) -> Result<&mut PortInfo, TopologyError> {
        self.switches
            .get_mut(&switch)
            .ok_or(TopologyError::UnknownSwitch(switch))?
            .ports
            .get_mut(&port_no)
            .ok_or(TopologyError::UnknownPort {
                switch,
                port: port_no,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SW1: SwitchId = SwitchId::new(1);
    const SW2: SwitchId = SwitchId::new(2);

    #[test]
    fn test_add_port_creates_switch() {
        let mut table = PortTable::new();
        assert!(table.add_port(SW1, PortNo::new(1), true));
        assert!(!table.add_port(SW1, PortNo::new(1), false));

        assert_eq!(table.switch_count(), 1);
        let port = table.lookup_port(SW1, PortNo::new(1)).unwrap();
        assert!(port.external_link);
        assert!(!port.switch_to_switch_link);
        assert!(!port.switch_to_switch_reverse_link);
    }

    #[test]
    fn test_remove_last_port_drops_switch() {
        let mut table = PortTable::new();
        table.add_port(SW1, PortNo::new(1), true);
        table.add_port(SW1, PortNo::new(2), true);

        table.remove_port(SW1, PortNo::new(1)).unwrap();
        assert_eq!(table.switch_count(), 1);

        let removed = table.remove_port(SW1, PortNo::new(2)).unwrap();
        assert_eq!(removed.port_no, PortNo::new(2));
        assert_eq!(table.switch_count(), 0);
        assert!(table.switch(SW1).is_none());
    }

    #[test]
    fn test_remove_unknown() {
        let mut table = PortTable::new();
        assert_eq!(
            table.remove_port(SW1, PortNo::new(1)),
            Err(TopologyError::UnknownSwitch(SW1))
        );

        table.add_port(SW1, PortNo::new(1), true);
        assert_eq!(
            table.remove_port(SW1, PortNo::new(2)),
            Err(TopologyError::UnknownPort {
                switch: SW1,
                port: PortNo::new(2)
            })
        );
    }

    #[test]
    fn test_update_port() {
        let mut table = PortTable::new();
        table.add_port(SW1, PortNo::new(1), true);
        table.update_port(SW1, PortNo::new(1), false).unwrap();
        assert!(!table.lookup_port(SW1, PortNo::new(1)).unwrap().external_link);

        assert!(table.update_port(SW2, PortNo::new(1), false).is_err());
    }

    #[test]
    fn test_link_flags_set_independently() {
        let mut table = PortTable::new();
        table.add_port(SW1, PortNo::new(2), false);
        table.add_port(SW2, PortNo::new(1), false);

        table.mark_link(SW1, PortNo::new(2), true).unwrap();
        let port = *table.lookup_port(SW1, PortNo::new(2)).unwrap();
        assert!(port.switch_to_switch_link);
        assert!(!port.switch_to_switch_reverse_link);
        assert!(!port.is_confirmed_relay());

        table.mark_reverse_link(SW1, PortNo::new(2), true).unwrap();
        assert!(table.lookup_port(SW1, PortNo::new(2)).unwrap().is_confirmed_relay());

        table.mark_link(SW1, PortNo::new(2), false).unwrap();
        assert!(!table.lookup_port(SW1, PortNo::new(2)).unwrap().is_confirmed_relay());
    }

    #[test]
    fn test_flood_target() {
        let mut port = PortInfo::new(SW1, PortNo::new(1), true);
        assert!(port.is_flood_target());

        port.switch_to_switch_reverse_link = true;
        assert!(!port.is_flood_target());

        let internal = PortInfo::new(SW1, PortNo::new(2), false);
        assert!(!internal.is_flood_target());
    }

    #[test]
    fn test_switches_in_id_order() {
        let mut table = PortTable::new();
        table.add_port(SW2, PortNo::new(1), true);
        table.add_port(SW1, PortNo::new(1), true);
        table.add_port(SW1, PortNo::new(3), true);

        let ids: Vec<SwitchId> = table.switches().map(SwitchInfo::id).collect();
        assert_eq!(ids, vec![SW1, SW2]);
        assert_eq!(table.port_count(), 3);
    }
}
