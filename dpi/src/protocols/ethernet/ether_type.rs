use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

#[derive(
    Clone, Copy, Debug, Display, Eq, IntoPrimitive, PartialEq, Serialize, Deserialize, TryFromPrimitive,
)]
#[repr(u16)]
pub enum EtherType {
    #[strum(to_string = "IPv4")]
    Ipv4 = 0x0800,
    #[strum(to_string = "ARP")]
    Arp = 0x0806,
    #[strum(to_string = "Frame Relay ARP")]
    ArpFrameRelay = 0x0808,
    #[strum(to_string = "RARP")]
    ArpReverse = 0x8035,
    #[strum(to_string = "VLAN-tagged frame (IEEE 802.1Q)")]
    Vlan = 0x8100,
    #[strum(to_string = "IPv6")]
    Ipv6 = 0x86DD,
    #[strum(to_string = "MPLS unicast")]
    MplsUnicast = 0x8847,
    #[strum(to_string = "MPLS multicast")]
    MplsMulticast = 0x8848,
    #[strum(to_string = "PPPoE Discovery")]
    PppoeDiscovery = 0x8863,
    #[strum(to_string = "PPPoE Session")]
    PppoeSession = 0x8864,
    #[strum(to_string = "802.1X Authentication")]
    Eapol = 0x888E,
    #[strum(to_string = "LLDP")]
    Lldp = 0x88CC,
}

pub fn describe(value: u16) -> String {
    match EtherType::try_from(value) {
        Ok(ether_type) => ether_type.to_string(),
        Err(_) => format!("Unknown (0x{:04X})", value),
    }
}
