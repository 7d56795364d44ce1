//! Background AI execution
//!
//! AI calls are blocking HTTP, so each operation runs on its own spawned
//! thread and reports back over an mpsc channel that the update loop
//! drains once per frame. There is no cancellation: a reply arriving after
//! the user closed the panel still lands in shared state on the next drain.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use log::debug;

use crate::ai::client::AiClient;
use crate::ai::profile::{AiProfile, ImageSize};
use crate::ai::ChatRole;
use crate::error::{Error, Result};

/// One queued AI operation, with everything the worker thread needs.
#[derive(Debug, Clone)]
pub enum AiTask {
    Chat {
        profile: AiProfile,
        prompt: String,
        history: Vec<(ChatRole, String)>,
    },
    AutoLayout {
        profile: AiProfile,
        content: String,
    },
    GenerateImage {
        profile: AiProfile,
        prompt: String,
        size: ImageSize,
    },
    GenerateSkinCss {
        profile: AiProfile,
        description: String,
    },
}

impl AiTask {
    fn kind(&self) -> &'static str {
        match self {
            AiTask::Chat { .. } => "chat",
            AiTask::AutoLayout { .. } => "auto-layout",
            AiTask::GenerateImage { .. } => "image",
            AiTask::GenerateSkinCss { .. } => "skin-css",
        }
    }
}

/// A finished operation, queued for the UI thread. Image and skin results
/// carry the prompt back so history entries and skin names can be built
/// without tracking request state elsewhere.
#[derive(Debug)]
pub enum AiEvent {
    ChatReply(Result<String>),
    LayoutReady(Result<String>),
    ImageReady {
        prompt: String,
        result: Result<String>,
    },
    SkinCssReady {
        prompt: String,
        result: Result<String>,
    },
}

pub struct AiWorker {
    tx: Sender<AiEvent>,
    rx: Receiver<AiEvent>,
}

impl Default for AiWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl AiWorker {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    /// Run one task on its own thread; the result surfaces through
    /// [`AiWorker::drain`].
    pub fn submit(&self, task: AiTask) {
        debug!("Submitting AI task: {}", task.kind());
        let tx = self.tx.clone();
        thread::spawn(move || {
            let event = run_task(task);
            // The receiver only disappears during shutdown.
            let _ = tx.send(event);
        });
    }

    /// Collect every finished task without blocking.
    pub fn drain(&self) -> Vec<AiEvent> {
        self.rx.try_iter().collect()
    }
}

fn run_task(task: AiTask) -> AiEvent {
    let client = match AiClient::new() {
        Ok(client) => client,
        Err(err) => return failure_event(&task, err),
    };
    match task {
        AiTask::Chat {
            profile,
            prompt,
            history,
        } => AiEvent::ChatReply(client.chat(&profile, &prompt, &history)),
        AiTask::AutoLayout { profile, content } => {
            AiEvent::LayoutReady(client.auto_layout(&profile, &content))
        }
        AiTask::GenerateImage {
            profile,
            prompt,
            size,
        } => {
            let result = client.generate_image(&profile, &prompt, size);
            AiEvent::ImageReady { prompt, result }
        }
        AiTask::GenerateSkinCss {
            profile,
            description,
        } => {
            let result = client.generate_skin_css(&profile, &description);
            AiEvent::SkinCssReady {
                prompt: description,
                result,
            }
        }
    }
}

fn failure_event(task: &AiTask, err: Error) -> AiEvent {
    match task {
        AiTask::Chat { .. } => AiEvent::ChatReply(Err(err)),
        AiTask::AutoLayout { .. } => AiEvent::LayoutReady(Err(err)),
        AiTask::GenerateImage { prompt, .. } => AiEvent::ImageReady {
            prompt: prompt.clone(),
            result: Err(err),
        },
        AiTask::GenerateSkinCss { description, .. } => AiEvent::SkinCssReady {
            prompt: description.clone(),
            result: Err(err),
        },
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
