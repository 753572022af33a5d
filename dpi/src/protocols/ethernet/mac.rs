use crate::protocols::ethernet::EthernetError;
use nom::bytes::complete::take;
use nom::combinator::map_res;
use nom::{IResult, Parser};
use serde::{Deserialize, Serialize};

pub const LENGTH_BYTES: usize = 6;

const GROUP_BIT: u8 = 0b0000_0001;

/// 48-bit hardware address, used by both Ethernet and 802.11 headers.
#[derive(Clone, Debug, Eq, Hash, Serialize, Deserialize, PartialEq)]
pub struct MacAddress(pub [u8; LENGTH_BYTES]);

impl MacAddress {
    pub const BROADCAST: Self = Self([0xFF; LENGTH_BYTES]);

    pub fn is_broadcast(&self) -> bool {
        self == &Self::BROADCAST
    }

    /// Group addresses other than broadcast.
    pub fn is_multicast(&self) -> bool {
        self.0[0] & GROUP_BIT != 0 && !self.is_broadcast()
    }
}

impl From<[u8; LENGTH_BYTES]> for MacAddress {
    fn from(value: [u8; LENGTH_BYTES]) -> Self {
        Self(value)
    }
}

impl TryFrom<&[u8]> for MacAddress {
    type Error = EthernetError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        <[u8; LENGTH_BYTES]>::try_from(value)
            .map(Self)
            .map_err(|_| EthernetError::MacInvalidBytesLength)
    }
}

/// Accepts `aa:bb:cc:dd:ee:ff`, `aa-bb-..` and `aabb.ccdd.eeff`, any case.
impl TryFrom<&str> for MacAddress {
    type Error = EthernetError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let digits = value.trim().replace([':', '.', '-'], "");
        let bytes = hex::decode(&digits).map_err(|_| EthernetError::MacFailedHexDecode)?;

        Self::try_from(bytes.as_slice()).map_err(|_| EthernetError::MacInvalidStringLength)
    }
}

impl std::fmt::Display for MacAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

pub fn parse(input: &[u8]) -> IResult<&[u8], MacAddress> {
    map_res(take(LENGTH_BYTES), MacAddress::try_from).parse(input)
}
