use std::future;

use futures_util::StreamExt;
use midir::{MidiIO, MidiInput, MidiInputConnection, MidiOutput, MidiOutputConnection};
use thiserror::Error;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{info, trace, warn};

use crate::config::MidiDeviceConfig;
use crate::midi_controller::midi_message::MidiEvent;

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("midi initialisation failed: {0}")]
    Init(#[from] midir::InitError),
    #[error("could not read midi port name: {0}")]
    PortInfo(#[from] midir::PortInfoError),
    #[error("the midi port `{0}` couldn't be found")]
    PortNotFound(String),
    #[error("could not connect to midi port `{port}`: {reason}")]
    Connect { port: String, reason: String },
}

pub struct Connection {
    _midi_connection_rx: MidiInputConnection<()>,
    sender_task: JoinHandle<()>,
}

pub struct TxRxChannels {
    pub sender: UnboundedSender<MidiEvent>,
    pub receiver: UnboundedReceiver<MidiEvent>,
}

impl Connection {
    pub fn new(config: &MidiDeviceConfig) -> Result<(Self, TxRxChannels), ConnectionError> {
        let midi_out = MidiOutput::new(&format!("midi_binding out {}", config.midi_out_port_name))?;
        let midi_in = MidiInput::new(&format!("midi_binding in {}", config.midi_in_port_name))?;
        let port_in = Self::find_midi_port(&midi_in, &config.midi_in_port_name)?;
        let port_out = Self::find_midi_port(&midi_out, &config.midi_out_port_name)?;

        let (midi_rx_sender, midi_rx_receiver) = unbounded_channel();

        let midi_connection_tx = midi_out
            .connect(&port_out, &config.midi_out_port_name)
            .map_err(|e| ConnectionError::Connect {
                port: config.midi_out_port_name.clone(),
                reason: e.to_string(),
            })?;
        let midi_connection_rx = midi_in
            .connect(&port_in, &config.midi_in_port_name, move |_stamp, message, _| {
                match MidiEvent::from_slice(message) {
                    Ok(event) => {
                        let _ = midi_rx_sender.send(event);
                    }
                    Err(e) => trace!("ignoring midi input {message:02x?}: {e}"),
                }
            }, ())
            .map_err(|e| ConnectionError::Connect {
                port: config.midi_in_port_name.clone(),
                reason: e.to_string(),
            })?;
        info!(input = %config.midi_in_port_name, output = %config.midi_out_port_name, "midi device connected");

        let (midi_tx_sender, midi_tx_receiver) = unbounded_channel();
        let sender_task = tokio::spawn(Self::forward_tx_messages(midi_tx_receiver, midi_connection_tx));

        Ok(
            (
                Self {
                    _midi_connection_rx: midi_connection_rx,
                    sender_task,
                },
                TxRxChannels {
                    receiver: midi_rx_receiver,
                    sender: midi_tx_sender,
                }
            )
        )
    }

    fn find_midi_port<T: MidiIO>(midi: &T, port_name: &str) -> Result<T::Port, ConnectionError> {
        for port in midi.ports() {
            if midi.port_name(&port)?.eq_ignore_ascii_case(port_name) {
                return Ok(port);
            }
        }
        Err(ConnectionError::PortNotFound(port_name.to_string()))
    }

    async fn forward_tx_messages(source: UnboundedReceiver<MidiEvent>, mut sink_connection: MidiOutputConnection) {
        let source_stream = UnboundedReceiverStream::new(source);
        source_stream.for_each(|event| {
            if let Err(e) = sink_connection.send(&event.to_bytes()) {
                warn!(?event, "midi output failed: {e}");
            }
            future::ready(())
        }).await;
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.sender_task.abort();
    }
}
