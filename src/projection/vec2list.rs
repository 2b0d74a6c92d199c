use {
    crate::{
        error::{check_idx, ListError},
        view::{
            dispatch::{Dispatch, Immediate},
            list::{ListMsg, ListView},
            InnerViewPort, Observer, ObserverBroadcast, OuterViewPort, View, ViewPort,
        },
    },
    std::sync::{Arc, RwLock},
};

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

/// Adapter View implementing `List` for `Vec`
///
/// Reads straight from the shared vector and passes its messages on unchanged.
pub struct Vec2List<T>
where
    T: Clone + Send + Sync + 'static,
{
    src_view: RwLock<Option<Arc<RwLock<Vec<T>>>>>,
    cast: Arc<ObserverBroadcast<dyn ListView<T>>>,
}

impl<T> Vec2List<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(port: InnerViewPort<dyn ListView<T>>) -> Arc<Self> {
        let v2l = Arc::new(Vec2List {
            src_view: RwLock::new(None),
            cast: port.get_broadcast(),
        });
        port.set_view(Some(v2l.clone()));
        v2l
    }
}

impl<T> Observer<RwLock<Vec<T>>> for Vec2List<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn reset(&self, view: Option<Arc<RwLock<Vec<T>>>>) {
        *self.src_view.write().unwrap() = view;
    }

    fn notify(&self, msg: &ListMsg<T>) {
        self.cast.notify(msg);
    }
}

impl<T> View for Vec2List<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Msg = ListMsg<T>;
}

impl<T> ListView<T> for Vec2List<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn get(&self, idx: &usize) -> Result<T, ListError> {
        let src = self.src_view.read().unwrap();
        let data = src.as_ref().ok_or(ListError::NotReady)?.read().unwrap();
        check_idx(*idx, data.len())?;
        Ok(data[*idx].clone())
    }

    fn len(&self) -> usize {
        self.src_view
            .read()
            .unwrap()
            .as_ref()
            .map_or(0, |data| data.read().unwrap().len())
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

impl<T> OuterViewPort<RwLock<Vec<T>>>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn to_list(&self) -> OuterViewPort<dyn ListView<T>> {
        self.to_list_on(Arc::new(Immediate))
    }

    pub fn to_list_on(&self, dispatch: Arc<dyn Dispatch>) -> OuterViewPort<dyn ListView<T>> {
        let port = ViewPort::with_dispatch(dispatch);
        let v2l = Vec2List::new(port.inner());
        self.add_observer(v2l);
        port.into_outer()
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
