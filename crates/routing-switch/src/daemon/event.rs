//! Inbound events.

use crate::switch::RoutingSwitchOrch;
use rswitch_openflow::{FeaturesReply, LinkStatus, PacketIn, PortStatus, RequestId};
use rswitch_types::SwitchId;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Everything the controller reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ControllerEvent {
    PacketIn(PacketIn),
    PortStatus(PortStatus),
    LinkStatus(LinkStatus),
    /// Answer to a topology query.
    LinkSnapshot {
        request_id: RequestId,
        links: Vec<LinkStatus>,
    },
    SwitchReady {
        switch: SwitchId,
    },
    FeaturesReply(FeaturesReply),
}

impl ControllerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ControllerEvent::PacketIn(_) => "packet_in",
            ControllerEvent::PortStatus(_) => "port_status",
            ControllerEvent::LinkStatus(_) => "link_status",
            ControllerEvent::LinkSnapshot { .. } => "link_snapshot",
            ControllerEvent::SwitchReady { .. } => "switch_ready",
            ControllerEvent::FeaturesReply(_) => "features_reply",
        }
    }

    /// Runs the matching handler to completion.
    pub fn dispatch(self, orch: &mut RoutingSwitchOrch) {
        match self {
            ControllerEvent::PacketIn(packet_in) => {
                let verdict = orch.on_packet_in(packet_in);
                debug!(?verdict, "Packet-in handled");
            }
            ControllerEvent::PortStatus(status) => orch.on_port_status(&status),
            ControllerEvent::LinkStatus(status) => orch.on_link_status(&status),
            ControllerEvent::LinkSnapshot { request_id, links } => {
                if let Some(outcome) = orch.on_link_snapshot(request_id, &links) {
                    debug!(request_id = %request_id, ?outcome, "Resolution finished");
                }
            }
            ControllerEvent::SwitchReady { switch } => orch.on_switch_ready(switch),
            ControllerEvent::FeaturesReply(reply) => orch.on_features_reply(&reply),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rswitch_openflow::{LinkState, PortState};
    use rswitch_types::PortNo;

    #[test]
    fn test_parse_port_status() {
        let json = r#"{"event":"port_status","switch":10,"port":1,"external":true,"status":"up"}"#;
        let event: ControllerEvent = serde_json::from_str(json).unwrap();
        assert_eq!(
            event,
            ControllerEvent::PortStatus(PortStatus {
                switch: SwitchId::new(10),
                port: PortNo::new(1),
                external: true,
                status: PortState::Up,
            })
        );
        assert_eq!(event.name(), "port_status");
    }

    #[test]
    fn test_parse_link_snapshot() {
        let json = r#"{"event":"link_snapshot","request_id":7,"links":[
            {"from_switch":1,"from_port":2,"to_switch":2,"to_port":1,"status":"unstable"}]}"#;
        let event: ControllerEvent = serde_json::from_str(json).unwrap();
        let ControllerEvent::LinkSnapshot { request_id, links } = event else {
            panic!("expected link snapshot");
        };
        assert_eq!(request_id, RequestId::new(7));
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].status, LinkState::Unstable);
    }

    #[test]
    fn test_parse_switch_ready() {
        let json = r#"{"event":"switch_ready","switch":3}"#;
        let event: ControllerEvent = serde_json::from_str(json).unwrap();
        assert_eq!(
            event,
            ControllerEvent::SwitchReady {
                switch: SwitchId::new(3)
            }
        );
    }

    #[test]
    fn test_unknown_event_rejected() {
        let json = r#"{"event":"flow_removed","switch":3}"#;
        assert!(serde_json::from_str::<ControllerEvent>(json).is_err());
    }
}
