use std::{fs, fs::File, io::Write, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::binding::BoundValue;
use crate::midi_controller::midi_device::model::action::{Action, LogAction, SendMidiAction};
use crate::midi_controller::midi_device::model::trigger::{MidiTrigger, TriggerSlot};
use crate::midi_controller::midi_message::MessageType;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    /// The config file does not exist yet. Every other error means the file
    /// is there but unusable.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// `tracing` filter directive, used when `RUST_LOG` is not set.
    #[serde(default)]
    pub log_filter: Option<String>,
    pub midi_devices: Vec<MidiDeviceConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MidiDeviceConfig {
    pub midi_in_port_name: String,
    pub midi_out_port_name: String,
    #[serde(default)]
    pub bindings: Vec<BindingConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingConfig {
    pub name: String,
    #[serde(default)]
    pub trigger: MidiTrigger,
    pub action: Action,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            log_filter: Some(String::from("info")),
            midi_devices: vec![MidiDeviceConfig::example()],
        }
    }
}

impl MidiDeviceConfig {
    /// Four drum pads naming themselves and lighting their LED, and a fader
    /// mirrored upside down on another controller number.
    fn example() -> MidiDeviceConfig {
        let pads = vec![36, 37, 38, 39];
        MidiDeviceConfig {
            midi_in_port_name: String::from("X-TOUCH MINI"),
            midi_out_port_name: String::from("X-TOUCH MINI"),
            bindings: vec![
                BindingConfig {
                    name: String::from("pad names"),
                    trigger: MidiTrigger {
                        channel: BoundValue::fixed(9),
                        message_type: BoundValue::fixed(MessageType::NoteOn),
                        note: BoundValue::discrete(pads.clone(), 0),
                        ..MidiTrigger::default()
                    },
                    action: Action::Log(LogAction::new(BoundValue::discrete(
                        ["kick", "snare", "closed hat", "open hat"].map(String::from).to_vec(),
                        TriggerSlot::Note.index(),
                    ))),
                },
                BindingConfig {
                    name: String::from("pad leds"),
                    trigger: MidiTrigger {
                        channel: BoundValue::fixed(9),
                        message_type: BoundValue::fixed(MessageType::NoteOn),
                        note: BoundValue::discrete(pads.clone(), 0),
                        ..MidiTrigger::default()
                    },
                    action: Action::SendMidi(SendMidiAction::new(
                        BoundValue::fixed(9),
                        BoundValue::fixed(MessageType::NoteOn),
                        BoundValue::discrete(pads, TriggerSlot::Note.index()),
                        BoundValue::toggle(vec![127, 0]),
                    )),
                },
                BindingConfig {
                    name: String::from("inverted fader"),
                    trigger: MidiTrigger {
                        channel: BoundValue::fixed(0),
                        message_type: BoundValue::fixed(MessageType::ControlChange),
                        note: BoundValue::fixed(9),
                        value: BoundValue::range(0, 127, 0),
                        ..MidiTrigger::default()
                    },
                    action: Action::SendMidi(SendMidiAction::new(
                        BoundValue::fixed(0),
                        BoundValue::fixed(MessageType::ControlChange),
                        BoundValue::fixed(10),
                        BoundValue::range(127, 0, TriggerSlot::Value.index()),
                    )),
                },
            ],
        }
    }
}

impl Config {
    pub fn write_default_config_file(filename: impl AsRef<Path>) -> Result<(), ConfigError> {
        let default_config = Config::default();
        let serialized = serde_json::to_string_pretty(&default_config)?;

        let mut file = File::create(filename)?;
        file.write_all(serialized.as_bytes())?;
        Ok(())
    }

    pub fn read_from_config(file_name: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let content = fs::read_to_string(file_name)?;
        Config::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Config, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }
}
