use crate::config::Config;
use thiserror::Error;

const SNAPSHOT_LENGTH: i32 = 65535;

/// Every interface, those with more addresses first.
/// Monitor-mode WLAN interfaces usually carry no address, so none are dropped.
pub fn sorted() -> Result<Vec<pcap::Device>, InterfaceError> {
    let mut interfaces = pcap::Device::list().map_err(InterfaceError::PcapError)?;

    interfaces.sort_by_key(|device| std::cmp::Reverse(device.addresses.len()));

    Ok(interfaces)
}

pub fn get_network_interface_name(network_interface: &pcap::Device) -> String {
    #[cfg(target_os = "windows")]
    let name = if let Some(desc) = &network_interface.desc {
        desc.clone()
    } else {
        network_interface.name.clone()
    };

    #[cfg(not(target_os = "windows"))]
    let name = network_interface.name.clone();

    name
}

/// Get `Device` by its name or description.
pub fn get_network_interface(device_name: &str) -> Result<pcap::Device, InterfaceError> {
    let needed_interface = |device: &pcap::Device| {
        device.name == device_name || device.desc.as_deref() == Some(device_name)
    };

    sorted()?
        .into_iter()
        .find(needed_interface)
        .ok_or_else(|| InterfaceError::UnknownInterface(device_name.to_string()))
}

pub fn get_capture(
    device: pcap::Device, config: &Config,
) -> Result<pcap::Capture<pcap::Active>, InterfaceError> {
    let mut capture = pcap::Capture::from_device(device)
        .map_err(InterfaceError::PcapError)?
        .snaplen(SNAPSHOT_LENGTH)
        .promisc(config.promiscuous)
        .timeout(config.read_timeout_ms)
        .immediate_mode(true)
        .open()
        .map_err(InterfaceError::PcapError)?;

    if let Some(program) = &config.bpf_filter {
        capture
            .filter(program, true)
            .map_err(|err| InterfaceError::BpfFilter(program.clone(), err))?;
    }

    Ok(capture)
}

#[derive(Debug, Error)]
pub enum InterfaceError {
    #[error("Pcap Library error.")]
    PcapError(pcap::Error),

    #[error("There are no interfaces with config interface name.")]
    UnknownInterface(String),

    #[error("Failed to compile the capture filter.")]
    BpfFilter(String, pcap::Error),
}

impl InterfaceError {
    pub fn additional_info(&self) -> Option<String> {
        match self {
            InterfaceError::PcapError(err) => Some(err.to_string()),
            InterfaceError::UnknownInterface(name) => Some(name.clone()),
            InterfaceError::BpfFilter(program, err) => Some(format!("{program}: {err}")),
        }
    }
}
