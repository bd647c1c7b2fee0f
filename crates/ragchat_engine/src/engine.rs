use std::io;
use std::sync::{mpsc, Arc};
use std::thread;

use chat_logging::{chat_debug, chat_warn};

use crate::{BackendClient, BackendRequest, EngineEvent};

struct EngineCommand<T> {
    tag: T,
    stack: String,
    request: BackendRequest,
}

/// Runs backend calls on a private tokio runtime.
///
/// Every submitted request becomes its own task, so a batch submitted back to
/// back is in flight at once and a slow stack never delays its siblings.
/// Completions are delivered on the channel given to [`EngineHandle::new`].
pub struct EngineHandle<T> {
    cmd_tx: mpsc::Sender<EngineCommand<T>>,
}

impl<T> Clone for EngineHandle<T> {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
        }
    }
}

impl<T: Send + 'static> EngineHandle<T> {
    pub fn new(
        client: Arc<dyn BackendClient>,
        event_tx: mpsc::Sender<EngineEvent<T>>,
    ) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("ragchat-engine")
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel::<EngineCommand<T>>();

        thread::Builder::new()
            .name("ragchat-engine-dispatch".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let client = client.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(client.as_ref(), command, event_tx).await;
                    });
                }
                chat_debug!("Engine command channel closed; shutting down runtime");
            })?;

        Ok(Self { cmd_tx })
    }

    /// Queues `request` against `stack`. The reply carries `tag` back.
    pub fn submit(&self, tag: T, stack: impl Into<String>, request: BackendRequest) {
        let command = EngineCommand {
            tag,
            stack: stack.into(),
            request,
        };
        if self.cmd_tx.send(command).is_err() {
            chat_warn!("Engine is gone; dropping request");
        }
    }
}

async fn handle_command<T>(
    client: &dyn BackendClient,
    command: EngineCommand<T>,
    event_tx: mpsc::Sender<EngineEvent<T>>,
) {
    let EngineCommand {
        tag,
        stack,
        request,
    } = command;
    let result = client.execute(&stack, &request).await;
    match &result {
        Ok(_) => chat_debug!("{} {} succeeded", stack, request.name()),
        Err(err) => chat_warn!("{} {} failed: {}", stack, request.name(), err),
    }
    let _ = event_tx.send(EngineEvent { tag, stack, result });
}
