use {
    crate::{
        buffer::vec::VecBuffer,
        error::ListError,
        projection::vec2list::Vec2List,
        view::{
            list::{ListDiff, ListMsg, ListView, ListViewExt},
            InnerViewPort, Observer, ObserverBroadcast, View, ViewPort,
        },
    },
    core::{
        future::Future,
        pin::Pin,
        task::{Context, Poll, Waker},
    },
    std::sync::{Arc, Mutex, RwLock, Weak},
};

                    /*\
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
               Deferred List
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
                    \*/
/// List whose backing container is produced asynchronously.
///
/// Until the container arrives the list is empty and every read fails
/// with [`ListError::NotReady`]. On arrival all its items are announced
/// with a single [`ListDiff::Add`] at index 0 (nothing for an empty
/// container), afterwards the container's diffs are passed on unchanged.
pub struct DeferredList<T>
where
    T: Clone + Send + Sync + 'static,
{
    state: RwLock<DeferredState<T>>,
    readiness: Mutex<Readiness>,
    cast: Arc<ObserverBroadcast<dyn ListView<T>>>,
}

enum DeferredState<T>
where
    T: Clone + Send + Sync + 'static,
{
    Pending,
    Ready {
        view: Arc<dyn ListView<T>>,
        _forward: Arc<DeferredForward<T>>,
    },
}

enum Readiness {
    Waiting(Vec<Waker>),
    Done(Result<(), ListError>),
}

impl<T> DeferredList<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates the list on `port` and returns it together with the future
    /// that awaits `source` and connects the list to the produced container.
    /// The list does not change until that future is driven.
    pub fn new<F>(
        source: F,
        port: InnerViewPort<dyn ListView<T>>,
    ) -> (Arc<Self>, impl Future<Output = ()> + Send + 'static)
    where
        F: Future<Output = Result<VecBuffer<T>, ListError>> + Send + 'static,
    {
        let deferred = Arc::new(DeferredList {
            state: RwLock::new(DeferredState::Pending),
            readiness: Mutex::new(Readiness::Waiting(Vec::new())),
            cast: port.get_broadcast(),
        });
        port.set_view(Some(deferred.clone()));

        let resolver = Resolver {
            deferred: Arc::downgrade(&deferred),
        };
        let driver = async move {
            let result = source.await;
            resolver.resolve(result);
        };

        (deferred, driver)
    }

    /// Like [`new`](DeferredList::new), drives the source on the async-std executor.
    pub fn spawn<F>(source: F, port: InnerViewPort<dyn ListView<T>>) -> Arc<Self>
    where
        F: Future<Output = Result<VecBuffer<T>, ListError>> + Send + 'static,
    {
        let (deferred, driver) = DeferredList::new(source, port);
        async_std::task::spawn(driver);
        deferred
    }

    pub fn is_ready(&self) -> bool {
        matches!(*self.state.read().unwrap(), DeferredState::Ready { .. })
    }

    /// Completes once initialization has ended.
    ///
    /// A cancelled source still completes with `Ok`, the list then stays empty.
    pub fn ready(self: &Arc<Self>) -> Initialized<T> {
        Initialized {
            deferred: self.clone(),
        }
    }

    fn resolve(&self, result: Result<VecBuffer<T>, ListError>) {
        match result {
            Ok(buffer) => self.connect(buffer),
            Err(ListError::Cancelled) => {
                tracing::debug!("deferred list source was cancelled");
                self.finish(Ok(()));
            }
            Err(err) => {
                tracing::warn!(%err, "deferred list source failed");
                self.finish(Err(err));
            }
        }
    }

    fn connect(&self, buffer: VecBuffer<T>) {
        let items = {
            let mut state = self.state.write().unwrap();
            if let DeferredState::Ready { .. } = *state {
                tracing::warn!("deferred list is already connected");
                return;
            }

            let port = ViewPort::new();
            let list = Vec2List::new(port.inner());
            buffer.get_port().add_observer(list.clone());

            let forward = Arc::new(DeferredForward {
                cast: self.cast.clone(),
            });
            port.add_observer(forward.clone());

            let items = list.to_vec();
            *state = DeferredState::Ready {
                view: list,
                _forward: forward,
            };
            items
        };

        let len = items.len();
        tracing::debug!(len, "deferred list is ready");

        if len > 0 {
            self.cast.notify(&ListMsg::Diff(ListDiff::Add { items, idx: 0 }));
            self.cast.notify(&ListMsg::LenChanged(len));
        }
        self.finish(Ok(()));
    }

    /// Ends initialization, returns false if it had already ended.
    fn finish(&self, result: Result<(), ListError>) -> bool {
        let wakers = {
            let mut readiness = self.readiness.lock().unwrap();
            if let Readiness::Done(_) = *readiness {
                return false;
            }
            match std::mem::replace(&mut *readiness, Readiness::Done(result)) {
                Readiness::Waiting(wakers) => wakers,
                Readiness::Done(_) => Vec::new(),
            }
        };

        for waker in wakers {
            waker.wake();
        }
        true
    }
}

impl<T> View for DeferredList<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Msg = ListMsg<T>;
}

impl<T> ListView<T> for DeferredList<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn len(&self) -> usize {
        match &*self.state.read().unwrap() {
            DeferredState::Pending => 0,
            DeferredState::Ready { view, .. } => view.len(),
        }
    }

    fn get(&self, idx: &usize) -> Result<T, ListError> {
        match &*self.state.read().unwrap() {
            DeferredState::Pending => Err(ListError::NotReady),
            DeferredState::Ready { view, .. } => view.get(idx),
        }
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

/// Passes the container's messages on to the deferred list's observers.
struct DeferredForward<T>
where
    T: Clone + Send + Sync + 'static,
{
    cast: Arc<ObserverBroadcast<dyn ListView<T>>>,
}

impl<T> Observer<dyn ListView<T>> for DeferredForward<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn notify(&self, msg: &ListMsg<T>) {
        self.cast.notify(msg);
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

/// Owned by the driver future. Ends initialization when the driver
/// is dropped before its source completed.
struct Resolver<T>
where
    T: Clone + Send + Sync + 'static,
{
    deferred: Weak<DeferredList<T>>,
}

impl<T> Resolver<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn resolve(self, result: Result<VecBuffer<T>, ListError>) {
        match self.deferred.upgrade() {
            Some(deferred) => deferred.resolve(result),
            None => tracing::debug!("deferred list was dropped before its source completed"),
        }
    }
}

impl<T> Drop for Resolver<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn drop(&mut self) {
        if let Some(deferred) = self.deferred.upgrade() {
            if deferred.finish(Ok(())) {
                tracing::debug!("deferred list driver dropped before completion");
            }
        }
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

/// Future returned by [`DeferredList::ready`].
pub struct Initialized<T>
where
    T: Clone + Send + Sync + 'static,
{
    deferred: Arc<DeferredList<T>>,
}

impl<T> Future for Initialized<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Output = Result<Arc<DeferredList<T>>, ListError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context) -> Poll<Self::Output> {
        let mut readiness = self.deferred.readiness.lock().unwrap();
        match &mut *readiness {
            Readiness::Done(Ok(())) => Poll::Ready(Ok(self.deferred.clone())),
            Readiness::Done(Err(err)) => Poll::Ready(Err(err.clone())),
            Readiness::Waiting(wakers) => {
                if !wakers.iter().any(|w| w.will_wake(cx.waker())) {
                    wakers.push(cx.waker().clone());
                }
                Poll::Pending
            }
        }
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{deferred, deferred_on};
    use crate::view::{queue_channel, queue_dispatch, singleton_channel};

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[async_std::test]
    async fn announces_all_items_once_ready() {
        let (tx, rx) = singleton_channel::<VecBuffer<char>>();
        let (list, init) =
            deferred(async move { rx.recv().await.flatten().ok_or(ListError::Cancelled) });

        let (otx, orx) = queue_channel::<ListMsg<char>>();
        let otx = Arc::new(otx);
        list.add_observer(otx.clone());

        assert!(!init.is_ready());
        assert_eq!(list.len(), 0);
        assert_eq!(list.get_view().get(&0), Err(ListError::NotReady));

        tx.send(VecBuffer::with_data(chars("ABCDEF")));
        let view = init.ready().await.unwrap();

        assert!(view.is_ready());
        assert_eq!(view.len(), 6);
        assert_eq!(
            orx.try_recv(),
            Some(vec![
                ListMsg::Diff(ListDiff::Add {
                    items: chars("ABCDEF"),
                    idx: 0
                }),
                ListMsg::LenChanged(6),
            ])
        );
    }

    #[async_std::test]
    async fn forwards_container_diffs_after_ready() {
        let (tx, rx) = singleton_channel::<VecBuffer<u32>>();
        let (list, init) =
            deferred(async move { rx.recv().await.flatten().ok_or(ListError::Cancelled) });

        let mut buffer = VecBuffer::new();
        // mutations before hand-over are part of the initial snapshot
        buffer.push(1);
        buffer.push(2);
        tx.send(buffer.clone());
        init.ready().await.unwrap();

        let (otx, orx) = queue_channel::<ListMsg<u32>>();
        let otx = Arc::new(otx);
        list.add_observer(otx.clone());

        buffer.remove(0).unwrap();
        buffer.push(3);

        assert_eq!(list.to_vec(), vec![2, 3]);
        assert_eq!(
            orx.try_recv(),
            Some(vec![
                ListMsg::Diff(ListDiff::Remove {
                    items: vec![1],
                    idx: 0
                }),
                ListMsg::LenChanged(1),
                ListMsg::Diff(ListDiff::Add {
                    items: vec![3],
                    idx: 1
                }),
                ListMsg::LenChanged(2),
            ])
        );
    }

    #[async_std::test]
    async fn cancelled_source_stays_pending() {
        let (tx, rx) = singleton_channel::<VecBuffer<u32>>();
        let (list, init) =
            deferred(async move { rx.recv().await.flatten().ok_or(ListError::Cancelled) });

        drop(tx);
        let view = init.ready().await.unwrap();

        assert!(!view.is_ready());
        assert_eq!(list.len(), 0);
        assert_eq!(view.get(&0), Err(ListError::NotReady));
    }

    #[async_std::test]
    async fn failed_source_reports_error() {
        let (list, init) = deferred::<u32, _>(async {
            Err(ListError::InitFailed("no connection".into()))
        });

        assert_eq!(
            init.ready().await.err(),
            Some(ListError::InitFailed("no connection".into()))
        );
        assert!(!init.is_ready());
        assert!(list.is_empty());
    }

    #[test]
    fn nothing_happens_until_driven() {
        let port = ViewPort::new();
        let (list, driver) =
            DeferredList::new(async { Ok(VecBuffer::with_data(vec!['a', 'b'])) }, port.inner());
        let mapped = port.outer().map(|c: &char| c.to_ascii_uppercase());

        assert_eq!(list.len(), 0);
        assert!(mapped.is_empty());

        async_std::task::block_on(driver);

        assert!(list.is_ready());
        assert_eq!(mapped.to_vec(), vec!['A', 'B']);
    }

    #[test]
    fn dropped_driver_ends_initialization() {
        let port = ViewPort::new();
        let (list, driver) = DeferredList::new(
            std::future::pending::<Result<VecBuffer<u8>, ListError>>(),
            port.inner(),
        );
        drop(driver);

        let view = async_std::task::block_on(list.ready()).unwrap();
        assert!(!view.is_ready());
    }

    #[async_std::test]
    async fn empty_container_announces_nothing() {
        let (list, init) = deferred(async { Ok(VecBuffer::<u8>::new()) });

        let (otx, orx) = queue_channel::<ListMsg<u8>>();
        let otx = Arc::new(otx);
        list.add_observer(otx.clone());

        let view = init.ready().await.unwrap();

        assert!(view.is_ready());
        assert!(list.is_empty());
        assert_eq!(view.get(&0), Err(ListError::OutOfRange { idx: 0, len: 0 }));
        assert_eq!(orx.try_recv(), None);
    }

    #[async_std::test]
    async fn deferred_on_delivers_through_its_dispatch() {
        let (tx, rx) = singleton_channel::<VecBuffer<i32>>();
        let (dispatch, runner) = queue_dispatch();
        let (list, init) = deferred_on(
            async move { rx.recv().await.flatten().ok_or(ListError::Cancelled) },
            dispatch,
        );

        let (otx, orx) = queue_channel::<ListMsg<i32>>();
        let otx = Arc::new(otx);
        list.add_observer(otx.clone());

        tx.send(VecBuffer::with_data(vec![4, 5]));
        init.ready().await.unwrap();
        assert_eq!(list.to_vec(), vec![4, 5]);
        assert_eq!(orx.try_recv(), None);

        assert_eq!(runner.run_pending(), 2);
        assert_eq!(
            orx.try_recv(),
            Some(vec![
                ListMsg::Diff(ListDiff::Add {
                    items: vec![4, 5],
                    idx: 0
                }),
                ListMsg::LenChanged(2),
            ])
        );
    }
}
