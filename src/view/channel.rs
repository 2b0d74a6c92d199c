use {
    crate::view::{Observer, View},
    async_std::stream::Stream,
    core::{
        pin::Pin,
        task::{Context, Poll, Waker},
    },
    std::sync::{Arc, Mutex},
};

                    /*\
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
                  Traits
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
                    \*/
/// Buffer collecting the messages sent between two receives.
pub trait ChannelData: Default + IntoIterator + Send {
    fn channel_insert(&mut self, x: Self::Item);
}

/// Keeps every message, in order.
impl<T: Send> ChannelData for Vec<T> {
    fn channel_insert(&mut self, x: T) {
        self.push(x);
    }
}

/// Keeps only the latest message.
impl<T: Send> ChannelData for Option<T> {
    fn channel_insert(&mut self, x: T) {
        *self = Some(x);
    }
}

/*\
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
                  Channel
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
                    \*/
struct ChannelState<Data: ChannelData> {
    send_buf: Option<Data>,
    recv_iter: Option<Data::IntoIter>,
    num_senders: usize,
    waker: Option<Waker>,
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

pub struct ChannelSender<Data: ChannelData>(Arc<Mutex<ChannelState<Data>>>);
pub struct ChannelReceiver<Data: ChannelData>(Arc<Mutex<ChannelState<Data>>>);

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

impl<Data: ChannelData> ChannelSender<Data> {
    pub fn send(&self, msg: Data::Item) {
        let mut state = self.0.lock().unwrap();
        state
            .send_buf
            .get_or_insert_with(Data::default)
            .channel_insert(msg);

        if let Some(waker) = state.waker.take() {
            waker.wake();
        }
    }
}

impl<V: View + ?Sized, Data: ChannelData<Item = V::Msg>> Observer<V> for ChannelSender<Data>
where
    V::Msg: Clone,
    Data::IntoIter: Send,
{
    fn notify(&self, msg: &V::Msg) {
        self.send(msg.clone());
    }
}

impl<Data: ChannelData> Clone for ChannelSender<Data> {
    fn clone(&self) -> Self {
        self.0.lock().unwrap().num_senders += 1;
        ChannelSender(self.0.clone())
    }
}

impl<Data: ChannelData> Drop for ChannelSender<Data> {
    fn drop(&mut self) {
        let mut state = self.0.lock().unwrap();
        state.num_senders -= 1;
        if let Some(waker) = state.waker.take() {
            waker.wake();
        }
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

impl<Data: ChannelData> ChannelReceiver<Data> {
    /// Waits for the next batch of messages.
    /// Resolves to `None` once every sender is gone and nothing is buffered.
    pub async fn recv(&self) -> Option<Data> {
        ChannelRead(self.0.clone()).await
    }

    pub fn try_recv(&self) -> Option<Data> {
        self.0.lock().unwrap().send_buf.take()
    }

    pub fn is_closed(&self) -> bool {
        self.0.lock().unwrap().num_senders == 0
    }
}

struct ChannelRead<Data: ChannelData>(Arc<Mutex<ChannelState<Data>>>);

impl<Data: ChannelData> std::future::Future for ChannelRead<Data> {
    type Output = Option<Data>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context) -> Poll<Self::Output> {
        let mut state = self.0.lock().unwrap();
        if let Some(buf) = state.send_buf.take() {
            Poll::Ready(Some(buf))
        } else if state.num_senders == 0 {
            Poll::Ready(None)
        } else {
            state.waker = Some(cx.waker().clone());
            Poll::Pending
        }
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

impl<Data: ChannelData> Stream for ChannelReceiver<Data> {
    type Item = Data::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut state = self.0.lock().unwrap();

        loop {
            if let Some(val) = state.recv_iter.as_mut().and_then(|it| it.next()) {
                return Poll::Ready(Some(val));
            }
            state.recv_iter = None;

            match state.send_buf.take() {
                // an empty batch is skipped
                Some(send_buf) => state.recv_iter = Some(send_buf.into_iter()),
                None if state.num_senders == 0 => return Poll::Ready(None),
                None => {
                    state.waker = Some(cx.waker().clone());
                    return Poll::Pending;
                }
            }
        }
    }
}

/*\
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
             Factory Functions
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
                    \*/
pub fn channel<Data: ChannelData>() -> (ChannelSender<Data>, ChannelReceiver<Data>) {
    let state = Arc::new(Mutex::new(ChannelState {
        send_buf: None,
        recv_iter: None,
        num_senders: 1,
        waker: None,
    }));

    (ChannelSender(state.clone()), ChannelReceiver(state))
}

pub fn queue_channel<T: Send>() -> (ChannelSender<Vec<T>>, ChannelReceiver<Vec<T>>) {
    channel::<Vec<T>>()
}

pub fn singleton_channel<T: Send>() -> (ChannelSender<Option<T>>, ChannelReceiver<Option<T>>) {
    channel::<Option<T>>()
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

#[cfg(test)]
mod tests {
    use super::*;
    use async_std::stream::StreamExt;

    #[test]
    fn queue_channel_keeps_order() {
        let (tx, rx) = queue_channel::<u32>();
        tx.send(1);
        tx.send(2);
        tx.send(3);

        assert_eq!(rx.try_recv(), Some(vec![1, 2, 3]));
        assert_eq!(rx.try_recv(), None);
    }

    #[test]
    fn singleton_channel_keeps_latest() {
        let (tx, rx) = singleton_channel::<char>();
        tx.send('a');
        tx.send('b');

        assert_eq!(rx.try_recv(), Some(Some('b')));
    }

    #[async_std::test]
    async fn recv_ends_when_senders_dropped() {
        let (tx, rx) = singleton_channel::<char>();
        let tx2 = tx.clone();
        drop(tx);
        assert!(!rx.is_closed());

        tx2.send('x');
        drop(tx2);

        assert_eq!(rx.recv().await, Some(Some('x')));
        assert_eq!(rx.recv().await, None);
        assert!(rx.is_closed());
    }

    #[async_std::test]
    async fn stream_flattens_batches() {
        let (tx, mut rx) = queue_channel::<u32>();
        tx.send(1);
        tx.send(2);
        drop(tx);

        let mut out = Vec::new();
        while let Some(x) = rx.next().await {
            out.push(x);
        }
        assert_eq!(out, vec![1, 2]);
    }
}
