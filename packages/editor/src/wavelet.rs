//! Wavelet-level mutations: new blips in the main thread and participants.

use crate::EditorError;
use ripple_model::{Blip, BlipId, Context, EntityKind, Operation, OperationKind, Payload, User};
use tracing::{debug, warn};

/// Editing handle for one wavelet in a batch context
#[derive(Debug)]
pub struct WaveletEditor<'ctx> {
    ctx: &'ctx mut Context,
    wavelet_id: String,
    wave_id: String,
}

impl<'ctx> WaveletEditor<'ctx> {
    pub fn open(ctx: &'ctx mut Context, wavelet_id: &str) -> Result<Self, EditorError> {
        let wave_id = ctx
            .wavelet(wavelet_id)
            .map(|w| w.wave_id.clone())
            .ok_or_else(|| EditorError::WaveletNotFound(wavelet_id.to_string()))?;

        Ok(Self {
            ctx,
            wavelet_id: wavelet_id.to_string(),
            wave_id,
        })
    }

    pub fn wavelet_id(&self) -> &str {
        &self.wavelet_id
    }

    fn operation(&self, kind: OperationKind) -> Operation {
        Operation::new(kind, self.wave_id.as_str(), self.wavelet_id.as_str())
    }

    /// Append an empty blip to the end of the main thread
    pub fn create_blip(&mut self) -> Result<BlipId, EditorError> {
        let parent_id = self
            .ctx
            .final_blip(&self.wavelet_id)
            .map(|b| b.id.clone())
            .ok_or_else(|| EditorError::NoRootBlip(self.wavelet_id.clone()))?;

        let id = BlipId::Pending(self.ctx.allocate_id(EntityKind::Blip));
        let blip = Blip::new(id.clone(), self.wave_id.as_str(), self.wavelet_id.as_str());
        self.ctx
            .add_child_blip(&parent_id, blip)
            .ok_or_else(|| EditorError::BlipNotFound(parent_id.clone()))?;
        let created = self
            .ctx
            .blip(&id)
            .cloned()
            .ok_or_else(|| EditorError::BlipNotFound(id.clone()))?;

        debug!(wavelet = %self.wavelet_id, parent = %parent_id, blip = %id, "Appended blip");

        let op = self
            .operation(OperationKind::WaveletAppendBlip)
            .with(Payload::Blip(Box::new(created)));
        self.ctx.add_operation(op);
        Ok(id)
    }

    /// Add a participant; adding an existing participant is ignored
    pub fn add_participant(&mut self, user_id: &str) -> Result<(), EditorError> {
        let wavelet = self
            .ctx
            .wavelet(&self.wavelet_id)
            .ok_or_else(|| EditorError::WaveletNotFound(self.wavelet_id.clone()))?;

        if wavelet.has_participant(user_id) {
            warn!(
                wavelet = %self.wavelet_id,
                participant = user_id,
                "Participant already in wavelet, ignoring"
            );
            return Ok(());
        }

        let user = self.ctx.add_user(User::new(user_id)).clone();
        let op = self
            .operation(OperationKind::WaveletAddParticipant)
            .with(Payload::Participant(user));
        self.ctx.add_operation(op);

        if let Some(wavelet) = self.ctx.wavelet_mut(&self.wavelet_id) {
            wavelet.participant_ids.push(user_id.to_string());
        }
        Ok(())
    }

    pub fn remove_robot(&mut self) -> Result<(), EditorError> {
        Err(EditorError::NotImplemented("remove_robot"))
    }

    pub fn set_data_document(&mut self, _name: &str, _data: &str) -> Result<(), EditorError> {
        Err(EditorError::NotImplemented("set_data_document"))
    }

    pub fn set_title(&mut self, _title: &str) -> Result<(), EditorError> {
        Err(EditorError::NotImplemented("set_title"))
    }
}
