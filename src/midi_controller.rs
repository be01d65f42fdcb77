pub mod midi_device;
pub mod midi_message;

use tracing::info;

use crate::config::MidiDeviceConfig;
use crate::midi_controller::midi_device::connection::ConnectionError;
use crate::midi_controller::midi_device::MidiDevice;

pub struct MidiController {
    midi_devices: Vec<MidiDevice>,
}

impl MidiController {
    pub fn new(configs: &[MidiDeviceConfig]) -> Result<MidiController, ConnectionError> {
        let mut midi_devices = Vec::new();
        for config in configs {
            midi_devices.push(MidiDevice::new(config)?);
            info!(bindings = config.bindings.len(), "listening on {}", config.midi_in_port_name);
        }

        Ok(MidiController {
            midi_devices
        })
    }

    pub fn device_count(&self) -> usize {
        self.midi_devices.len()
    }
}
