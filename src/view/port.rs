use {
    crate::view::{
        dispatch::{Dispatch, Immediate},
        NotifyFnObserver, Observer, ObserverBroadcast, View,
    },
    std::sync::{Arc, RwLock},
};

                    /*\
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
                 View Port
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
                    \*/
pub struct ViewPort<V: View + ?Sized> {
    view: Arc<RwLock<Option<Arc<V>>>>,
    cast: Arc<ObserverBroadcast<V>>,
}

impl<V: View + ?Sized + 'static> ViewPort<V>
where
    V::Msg: Clone,
{
    pub fn new() -> Self {
        ViewPort::with_dispatch(Arc::new(Immediate))
    }

    /// Port whose observers are notified through `dispatch`.
    pub fn with_dispatch(dispatch: Arc<dyn Dispatch>) -> Self {
        ViewPort {
            view: Arc::new(RwLock::new(None)),
            cast: Arc::new(ObserverBroadcast::with_dispatch(dispatch)),
        }
    }

    pub fn set_view(&self, view: Option<Arc<V>>) {
        *self.view.write().unwrap() = view.clone();
        self.cast.reset(view);
    }

    /// Registers `observer` and immediately resets it to the current view.
    pub fn add_observer(&self, observer: Arc<dyn Observer<V>>) {
        self.cast.add_observer(Arc::downgrade(&observer));

        let view = self.view.read().unwrap().clone();
        observer.reset(view);
    }

    pub fn inner(&self) -> InnerViewPort<V> {
        InnerViewPort(self.clone())
    }

    pub fn outer(&self) -> OuterViewPort<V> {
        OuterViewPort(self.clone())
    }

    pub fn into_inner(self) -> InnerViewPort<V> {
        InnerViewPort(self)
    }

    pub fn into_outer(self) -> OuterViewPort<V> {
        OuterViewPort(self)
    }
}

impl<V: View + ?Sized> Clone for ViewPort<V> {
    fn clone(&self) -> Self {
        ViewPort {
            view: self.view.clone(),
            cast: self.cast.clone(),
        }
    }
}

impl<V: View + ?Sized + 'static> Default for ViewPort<V>
where
    V::Msg: Clone,
{
    fn default() -> Self {
        ViewPort::new()
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

/// Producer side of a port: sets the view and sends its messages.
pub struct InnerViewPort<V: View + ?Sized>(pub ViewPort<V>);

/// Consumer side of a port: reads the view and observes it.
pub struct OuterViewPort<V: View + ?Sized>(pub ViewPort<V>);

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

impl<V: View + ?Sized + 'static> InnerViewPort<V>
where
    V::Msg: Clone,
{
    pub fn get_broadcast(&self) -> Arc<ObserverBroadcast<V>> {
        self.0.cast.clone()
    }

    pub fn set_view(&self, view: Option<Arc<V>>) -> Arc<ObserverBroadcast<V>> {
        self.0.set_view(view);
        self.get_broadcast()
    }

    pub fn get_view(&self) -> Option<Arc<V>> {
        self.0.view.read().unwrap().clone()
    }

    pub fn notify(&self, msg: &V::Msg) {
        self.0.cast.notify(msg);
    }
}

impl<V: View + ?Sized> Clone for InnerViewPort<V> {
    fn clone(&self) -> Self {
        InnerViewPort(self.0.clone())
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

impl<V: View + ?Sized + 'static> OuterViewPort<V>
where
    V::Msg: Clone,
{
    pub fn get_view(&self) -> Option<Arc<V>> {
        self.0.view.read().unwrap().clone()
    }

    pub fn get_dispatch(&self) -> Arc<dyn Dispatch> {
        self.0.cast.get_dispatch()
    }

    pub fn add_observer(&self, observer: Arc<dyn Observer<V>>) {
        self.0.add_observer(observer);
    }

    /// The returned observer stays registered as long as it is kept alive.
    pub fn add_notify_fn<F: Fn(&V::Msg) + Send + Sync + 'static>(
        &self,
        notify: F,
    ) -> Arc<NotifyFnObserver<V, F>> {
        let obs = Arc::new(NotifyFnObserver::new(notify));
        self.add_observer(obs.clone());
        obs
    }
}

impl<V: View + ?Sized> Clone for OuterViewPort<V> {
    fn clone(&self) -> Self {
        OuterViewPort(self.0.clone())
    }
}

impl<V: View + ?Sized + 'static> Default for OuterViewPort<V>
where
    V::Msg: Clone,
{
    fn default() -> Self {
        ViewPort::new().into_outer()
    }
}
