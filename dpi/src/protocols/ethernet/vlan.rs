use nom::number::be_u16;
use nom::{IResult, Parser, bits};
use serde::{Deserialize, Serialize};

// IEEE 802.1Q tag control information
pub const PRIORITY_LENGTH_BITS: usize = 3;
pub const DROP_ELIGIBLE_LENGTH_BITS: usize = 1;
pub const VLAN_ID_LENGTH_BITS: usize = 12;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct VlanTag {
    pub priority: u8,
    pub drop_eligible: bool,
    pub vlan_id: u16,
}

/// Tag control information, then the encapsulated EtherType.
pub fn parse(input: &[u8]) -> IResult<&[u8], (VlanTag, u16)> {
    // PCP (3 bits), DEI (1 bit), VID (12 bits)
    let (rest, (priority, drop_eligible, vlan_id)): (&[u8], (u8, u8, u16)) =
        bits::bits::<_, _, nom::error::Error<_>, _, _>((
            bits::complete::take(PRIORITY_LENGTH_BITS),
            bits::complete::take(DROP_ELIGIBLE_LENGTH_BITS),
            bits::complete::take(VLAN_ID_LENGTH_BITS),
        ))(input)?;

    // Encapsulated EtherType, 2 bytes
    let (rest, ether_type) = be_u16().parse(rest)?;

    let tag = VlanTag {
        priority,
        drop_eligible: drop_eligible == 1,
        vlan_id,
    };

    Ok((rest, (tag, ether_type)))
}
