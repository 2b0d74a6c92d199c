use {
    crate::view::{
        dispatch::{Dispatch, Immediate},
        View,
    },
    std::sync::{Arc, RwLock, Weak},
};

                    /*\
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
                 Observer
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
                    \*/
/// Observers take `&self` so a handler may read any view,
/// including the one that is notifying it, while being notified.
pub trait Observer<V: View + ?Sized>: Send + Sync {
    fn reset(&self, _view: Option<Arc<V>>) {}
    fn notify(&self, msg: &V::Msg);
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

impl<V: View + ?Sized, O: Observer<V> + ?Sized> Observer<V> for Arc<O> {
    fn reset(&self, view: Option<Arc<V>>) {
        (**self).reset(view);
    }

    fn notify(&self, msg: &V::Msg) {
        (**self).notify(msg);
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

                    /*\
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
                 Broadcast
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
                    \*/
/// Registry of the observers of one view.
///
/// Observers are held weakly, whoever registers one keeps it alive.
/// Every message is handed to the broadcast's [`Dispatch`] as one task
/// delivering it to all observers registered at the time it was sent.
pub struct ObserverBroadcast<V: View + ?Sized> {
    observers: RwLock<Vec<Weak<dyn Observer<V>>>>,
    dispatch: Arc<dyn Dispatch>,
}

impl<V: View + ?Sized + 'static> ObserverBroadcast<V>
where
    V::Msg: Clone,
{
    pub fn new() -> Self {
        ObserverBroadcast::with_dispatch(Arc::new(Immediate))
    }

    pub fn with_dispatch(dispatch: Arc<dyn Dispatch>) -> Self {
        ObserverBroadcast {
            observers: RwLock::new(Vec::new()),
            dispatch,
        }
    }

    pub fn add_observer(&self, obs: Weak<dyn Observer<V>>) {
        let mut observers = self.observers.write().unwrap();
        observers.retain(|o| o.strong_count() > 0);
        observers.push(obs);
    }

    pub fn get_dispatch(&self) -> Arc<dyn Dispatch> {
        self.dispatch.clone()
    }

    fn live(&self) -> Vec<Arc<dyn Observer<V>>> {
        self.observers
            .read()
            .unwrap()
            .iter()
            .filter_map(|o| o.upgrade())
            .collect()
    }
}

impl<V: View + ?Sized + 'static> Default for ObserverBroadcast<V>
where
    V::Msg: Clone,
{
    fn default() -> Self {
        ObserverBroadcast::new()
    }
}

impl<V: View + ?Sized + 'static> Observer<V> for ObserverBroadcast<V>
where
    V::Msg: Clone,
{
    fn reset(&self, view: Option<Arc<V>>) {
        for o in self.live() {
            o.reset(view.clone());
        }
    }

    fn notify(&self, msg: &V::Msg) {
        let observers = self.live();
        if observers.is_empty() {
            return;
        }

        let msg = msg.clone();
        self.dispatch.dispatch(Box::new(move || {
            for o in observers {
                o.notify(&msg);
            }
        }));
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

pub struct NotifyFnObserver<V, F>
where
    V: View + ?Sized,
    F: Fn(&V::Msg) + Send + Sync,
{
    f: F,
    _phantom: std::marker::PhantomData<V>,
}

impl<V, F> NotifyFnObserver<V, F>
where
    V: View + ?Sized,
    F: Fn(&V::Msg) + Send + Sync,
{
    pub fn new(f: F) -> Self {
        NotifyFnObserver {
            f,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<V, F> Observer<V> for NotifyFnObserver<V, F>
where
    V: View + ?Sized,
    F: Fn(&V::Msg) + Send + Sync,
{
    fn notify(&self, msg: &V::Msg) {
        (self.f)(msg);
    }
}
