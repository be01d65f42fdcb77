use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::config::MidiDeviceConfig;
use crate::midi_controller::midi_device::connection::{Connection, ConnectionError};
use crate::midi_controller::midi_device::feedback_handle::ModelFeedbackHandle;
use crate::midi_controller::midi_device::model::components::{MidiEventReceiver, ReceivingState};
use crate::midi_controller::midi_device::model::DeviceModel;
use crate::midi_controller::midi_message::MidiEvent;

pub mod connection;
pub mod feedback_handle;
pub mod model;

/// One opened controller. Incoming events are matched against the device's
/// bindings by a single task, so a binding is never tested twice at once.
pub struct MidiDevice {
    _connection: Connection,
    midi_input_process_task: JoinHandle<()>,
}

impl MidiDevice {
    pub fn new(config: &MidiDeviceConfig) -> Result<Self, ConnectionError> {
        let (connection, channels) = Connection::new(config)?;

        let feedback_handle = ModelFeedbackHandle::new(channels.sender);
        let model = DeviceModel::new(config.bindings.clone(), feedback_handle);

        let midi_input_process_task = tokio::spawn(Self::process_all_midi_inputs(channels.receiver, model));

        Ok(Self {
            _connection: connection,
            midi_input_process_task,
        })
    }

    async fn process_all_midi_inputs(mut source: UnboundedReceiver<MidiEvent>, mut model: DeviceModel) {
        while let Some(event) = source.recv().await {
            if model.receive_midi_event(&event) == ReceivingState::Pass {
                trace!(?event, "no binding matched");
            }
        }
    }
}

impl Drop for MidiDevice {
    fn drop(&mut self) {
        self.midi_input_process_task.abort();
    }
}
