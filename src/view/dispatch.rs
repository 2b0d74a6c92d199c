use {
    crate::view::channel::{queue_channel, ChannelReceiver, ChannelSender},
    async_std::stream::StreamExt,
    std::sync::Arc,
};

/// One pending delivery of a notification.
pub type Task = Box<dyn FnOnce() + Send>;

                    /*\
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
                 Dispatch
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
                    \*/
/// Decides where and when observers of a view get notified.
///
/// A dispatch only moves the delivery of a message, never the message
/// itself. Tasks handed to the same dispatch must run in the order they
/// were handed over.
pub trait Dispatch: Send + Sync {
    fn dispatch(&self, task: Task);
}

/// Delivers on the call stack of the mutation that caused the message.
#[derive(Clone, Copy, Debug, Default)]
pub struct Immediate;

impl Dispatch for Immediate {
    fn dispatch(&self, task: Task) {
        task();
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

/// Enqueues deliveries until the owning [`QueueRunner`] runs them.
#[derive(Clone)]
pub struct QueueDispatch {
    tx: ChannelSender<Vec<Task>>,
}

impl Dispatch for QueueDispatch {
    fn dispatch(&self, task: Task) {
        self.tx.send(task);
    }
}

pub struct QueueRunner {
    rx: ChannelReceiver<Vec<Task>>,
}

impl QueueRunner {
    /// Runs every queued delivery, including the ones queued while running.
    /// Returns the number of deliveries performed.
    pub fn run_pending(&self) -> usize {
        let mut count = 0;
        while let Some(tasks) = self.rx.try_recv() {
            for task in tasks {
                task();
                count += 1;
            }
        }

        if count > 0 {
            tracing::debug!(count, "ran queued notifications");
        }
        count
    }

    /// Runs deliveries as they arrive until every [`QueueDispatch`] is dropped.
    pub async fn run(self) {
        let mut rx = self.rx;
        while let Some(task) = rx.next().await {
            task();
        }
    }
}

pub fn queue_dispatch() -> (Arc<QueueDispatch>, QueueRunner) {
    let (tx, rx) = queue_channel::<Task>();
    (Arc::new(QueueDispatch { tx }), QueueRunner { rx })
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
