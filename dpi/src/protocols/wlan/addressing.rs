use crate::protocols::ethernet::mac::MacAddress;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Travel direction relative to the distribution system (ToDS, FromDS).
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum DsDirection {
    #[strum(to_string = "Station to Station (Ad-Hoc)")]
    AdHoc,
    #[strum(to_string = "Station to Distribution System")]
    ToDistribution,
    #[strum(to_string = "Distribution System to Station")]
    FromDistribution,
    #[strum(to_string = "Distribution System to Distribution System")]
    Wds,
}

impl DsDirection {
    pub fn from_flags(to_ds: bool, from_ds: bool) -> Self {
        match (to_ds, from_ds) {
            (false, false) => Self::AdHoc,
            (true, false) => Self::ToDistribution,
            (false, true) => Self::FromDistribution,
            (true, true) => Self::Wds,
        }
    }

    pub fn flags(&self) -> (bool, bool) {
        match self {
            Self::AdHoc => (false, false),
            Self::ToDistribution => (true, false),
            Self::FromDistribution => (false, true),
            Self::Wds => (true, true),
        }
    }
}

/// Address roles resolved from the four address slots.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Addressing {
    pub direction: DsDirection,

    pub destination: Option<MacAddress>,
    pub source: Option<MacAddress>,
    pub bssid: Option<MacAddress>,

    pub receiver: MacAddress,
    pub transmitter: MacAddress,
}

/// | ToDS | FromDS | DA    | SA    | BSSID |
/// |------|--------|-------|-------|-------|
/// | 0    | 0      | Addr1 | Addr2 | Addr3 |
/// | 1    | 0      | Addr3 | Addr2 | Addr1 |
/// | 0    | 1      | Addr1 | Addr3 | Addr2 |
/// | 1    | 1      | Addr3 | Addr4 | -     |
///
/// Receiver and transmitter are always Addr1 and Addr2. A WDS frame cut
/// before Addr4 has no source.
pub fn resolve(
    direction: DsDirection, address_1: &MacAddress, address_2: &MacAddress,
    address_3: &MacAddress, address_4: Option<&MacAddress>,
) -> Addressing {
    let (destination, source, bssid) = match direction {
        DsDirection::AdHoc => (
            Some(address_1.clone()),
            Some(address_2.clone()),
            Some(address_3.clone()),
        ),
        DsDirection::ToDistribution => (
            Some(address_3.clone()),
            Some(address_2.clone()),
            Some(address_1.clone()),
        ),
        DsDirection::FromDistribution => (
            Some(address_1.clone()),
            Some(address_3.clone()),
            Some(address_2.clone()),
        ),
        DsDirection::Wds => (Some(address_3.clone()), address_4.cloned(), None),
    };

    Addressing {
        direction,
        destination,
        source,
        bssid,
        receiver: address_1.clone(),
        transmitter: address_2.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addresses() -> [MacAddress; 4] {
        [
            MacAddress([0x02, 0, 0, 0, 0, 0x01]),
            MacAddress([0x02, 0, 0, 0, 0, 0x02]),
            MacAddress([0x02, 0, 0, 0, 0, 0x03]),
            MacAddress([0x02, 0, 0, 0, 0, 0x04]),
        ]
    }

    #[test]
    fn test_ad_hoc() {
        let [a1, a2, a3, _] = addresses();
        let actual = resolve(DsDirection::AdHoc, &a1, &a2, &a3, None);

        assert_eq!(actual.destination, Some(a1.clone()));
        assert_eq!(actual.source, Some(a2.clone()));
        assert_eq!(actual.bssid, Some(a3));
    }

    #[test]
    fn test_station_to_ap() {
        let [a1, a2, a3, _] = addresses();
        let actual = resolve(DsDirection::ToDistribution, &a1, &a2, &a3, None);

        assert_eq!(actual.destination, Some(a3));
        assert_eq!(actual.source, Some(a2));
        assert_eq!(actual.bssid, Some(a1));
    }

    #[test]
    fn test_ap_to_station() {
        let [a1, a2, a3, _] = addresses();
        let actual = resolve(DsDirection::FromDistribution, &a1, &a2, &a3, None);

        assert_eq!(actual.destination, Some(a1));
        assert_eq!(actual.source, Some(a3));
        assert_eq!(actual.bssid, Some(a2));
    }

    #[test]
    fn test_wds() {
        let [a1, a2, a3, a4] = addresses();
        let actual = resolve(DsDirection::Wds, &a1, &a2, &a3, Some(&a4));

        assert_eq!(actual.destination, Some(a3.clone()));
        assert_eq!(actual.source, Some(a4));
        assert_eq!(actual.bssid, None);
        assert_eq!(actual.receiver, a1.clone());
        assert_eq!(actual.transmitter, a2.clone());

        let cut = resolve(DsDirection::Wds, &a1, &a2, &a3, None);
        assert_eq!(cut.destination, Some(a3));
        assert_eq!(cut.source, None);
    }

    #[test]
    fn test_direction_flags() {
        for (to_ds, from_ds) in [(false, false), (true, false), (false, true), (true, true)] {
            assert_eq!(DsDirection::from_flags(to_ds, from_ds).flags(), (to_ds, from_ds));
        }
        assert_eq!(
            DsDirection::ToDistribution.to_string(),
            "Station to Distribution System"
        );
    }
}
