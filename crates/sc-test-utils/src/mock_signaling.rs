//! Mock signaling endpoint: drains the coordinator's outbound commands,
//! records them, and acks resumes with a configurable answer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use signal_protocol::{ResumeAck, SignalRequest, SignalingHandle};
use tokio::task::JoinHandle;

/// One recorded outbound command, by server consumer id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCommand {
    Pause(String),
    Resume(String),
}

/// A running mock signaling endpoint.
///
/// Drop ends the endpoint once the last [`SignalingHandle`] clone is gone.
#[derive(Debug)]
pub struct MockSignaling {
    handle: SignalingHandle,
    resume_ack: Arc<AtomicBool>,
    commands: Arc<Mutex<Vec<RecordedCommand>>>,
    _task: JoinHandle<()>,
}

impl MockSignaling {
    /// Spawn an endpoint that acks every resume with `{resumed: true}`.
    #[must_use]
    pub fn spawn() -> Self {
        Self::spawn_with_ack(true)
    }

    /// Spawn an endpoint with a fixed resume-ack answer.
    #[must_use]
    pub fn spawn_with_ack(resumed: bool) -> Self {
        let (handle, mut receiver) = SignalingHandle::channel();
        let resume_ack = Arc::new(AtomicBool::new(resumed));
        let commands = Arc::new(Mutex::new(Vec::new()));

        let ack = Arc::clone(&resume_ack);
        let log = Arc::clone(&commands);
        let task = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                match request {
                    SignalRequest::Pause(command) => {
                        log.lock()
                            .unwrap()
                            .push(RecordedCommand::Pause(command.server_consumer_id));
                    }
                    SignalRequest::Resume {
                        command,
                        respond_to,
                    } => {
                        log.lock()
                            .unwrap()
                            .push(RecordedCommand::Resume(command.server_consumer_id));
                        let _ = respond_to.send(ResumeAck {
                            resumed: ack.load(Ordering::SeqCst),
                        });
                    }
                }
            }
        });

        Self {
            handle,
            resume_ack,
            commands,
            _task: task,
        }
    }

    /// The handle to hand to the coordinator.
    #[must_use]
    pub fn handle(&self) -> SignalingHandle {
        self.handle.clone()
    }

    /// Change the resume-ack answer for subsequent resumes.
    pub fn set_resume_ack(&self, resumed: bool) {
        self.resume_ack.store(resumed, Ordering::SeqCst);
    }

    /// All recorded commands in arrival order.
    #[must_use]
    pub fn commands(&self) -> Vec<RecordedCommand> {
        self.commands.lock().unwrap().clone()
    }

    /// Number of recorded `consumer-pause` commands.
    #[must_use]
    pub fn pause_count(&self) -> usize {
        self.commands
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, RecordedCommand::Pause(_)))
            .count()
    }

    /// Number of recorded `consumer-resume` commands.
    #[must_use]
    pub fn resume_count(&self) -> usize {
        self.commands
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, RecordedCommand::Resume(_)))
            .count()
    }
}
