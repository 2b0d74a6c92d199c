use {
    crate::{
        error::ListError,
        view::{
            dispatch::{Dispatch, Immediate},
            list::{ListDiff, ListMsg, ListView, ListViewExt},
            Observer, ObserverBroadcast, OuterViewPort, View, ViewPort,
        },
    },
    std::sync::{Arc, RwLock},
};

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

impl<Item: Clone + Send + Sync + 'static> OuterViewPort<dyn ListView<Item>> {
    /// Presents the items of this list as a more general type.
    ///
    /// Unlike [`map`](OuterViewPort::map) nothing is stored,
    /// every read and every diff converts the source items again.
    pub fn upcast<DstItem>(&self) -> OuterViewPort<dyn ListView<DstItem>>
    where
        Item: Into<DstItem>,
        DstItem: Clone + Send + Sync + 'static,
    {
        self.upcast_with(|item: Item| item.into())
    }

    pub fn upcast_with<DstItem, F>(&self, f: F) -> OuterViewPort<dyn ListView<DstItem>>
    where
        DstItem: Clone + Send + Sync + 'static,
        F: Fn(Item) -> DstItem + Send + Sync + 'static,
    {
        self.upcast_with_on(f, Arc::new(Immediate))
    }

    pub fn upcast_with_on<DstItem, F>(
        &self,
        f: F,
        dispatch: Arc<dyn Dispatch>,
    ) -> OuterViewPort<dyn ListView<DstItem>>
    where
        DstItem: Clone + Send + Sync + 'static,
        F: Fn(Item) -> DstItem + Send + Sync + 'static,
    {
        let port = ViewPort::with_dispatch(dispatch);

        let upcast = Arc::new(UpcastList {
            src_view: RwLock::new(None),
            f,
            cast: port.inner().get_broadcast(),
        });

        self.add_observer(upcast.clone());
        port.inner().set_view(Some(upcast));
        port.into_outer()
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

pub struct UpcastList<SrcItem, DstItem, F>
where
    SrcItem: Clone + Send + Sync + 'static,
    DstItem: Clone + Send + Sync + 'static,
    F: Fn(SrcItem) -> DstItem + Send + Sync,
{
    src_view: RwLock<Option<Arc<dyn ListView<SrcItem>>>>,
    f: F,
    cast: Arc<ObserverBroadcast<dyn ListView<DstItem>>>,
}

impl<SrcItem, DstItem, F> View for UpcastList<SrcItem, DstItem, F>
where
    SrcItem: Clone + Send + Sync + 'static,
    DstItem: Clone + Send + Sync + 'static,
    F: Fn(SrcItem) -> DstItem + Send + Sync,
{
    type Msg = ListMsg<DstItem>;
}

impl<SrcItem, DstItem, F> ListView<DstItem> for UpcastList<SrcItem, DstItem, F>
where
    SrcItem: Clone + Send + Sync + 'static,
    DstItem: Clone + Send + Sync + 'static,
    F: Fn(SrcItem) -> DstItem + Send + Sync,
{
    fn len(&self) -> usize {
        self.src_view.read().unwrap().len()
    }

    fn get(&self, idx: &usize) -> Result<DstItem, ListError> {
        self.src_view.read().unwrap().get(idx).map(&self.f)
    }
}

impl<SrcItem, DstItem, F> Observer<dyn ListView<SrcItem>> for UpcastList<SrcItem, DstItem, F>
where
    SrcItem: Clone + Send + Sync + 'static,
    DstItem: Clone + Send + Sync + 'static,
    F: Fn(SrcItem) -> DstItem + Send + Sync,
{
    fn reset(&self, view: Option<Arc<dyn ListView<SrcItem>>>) {
        let old = self.to_vec();
        *self.src_view.write().unwrap() = view;
        let new = self.to_vec();

        if !old.is_empty() {
            self.cast.notify(&ListMsg::Diff(ListDiff::Remove { items: old, idx: 0 }));
            self.cast.notify(&ListMsg::LenChanged(0));
        }
        if !new.is_empty() {
            let len = new.len();
            self.cast.notify(&ListMsg::Diff(ListDiff::Add { items: new, idx: 0 }));
            self.cast.notify(&ListMsg::LenChanged(len));
        }
    }

    fn notify(&self, msg: &ListMsg<SrcItem>) {
        let forwarded_msg = match msg {
            ListMsg::Diff(diff) => ListMsg::Diff(diff.map_items(|item| (self.f)(item.clone()))),
            ListMsg::LenChanged(len) => ListMsg::LenChanged(*len),
        };
        self.cast.notify(&forwarded_msg);
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

#[cfg(test)]
mod tests {
    use crate::buffer::vec::VecBuffer;
    use crate::view::{
        list::{ListDiff, ListMsg, ListView, ListViewExt},
        queue_channel, queue_dispatch,
    };
    use std::sync::{Arc, Mutex};

    trait Shape: Send + Sync {
        fn area(&self) -> f64;
    }

    struct Circle {
        r: f64,
    }

    impl Shape for Circle {
        fn area(&self) -> f64 {
            3.0 * self.r * self.r
        }
    }

    #[test]
    fn upcast_keeps_instances() {
        let c1 = Arc::new(Circle { r: 1.0 });
        let c2 = Arc::new(Circle { r: 2.0 });

        let mut circles = VecBuffer::with_data(vec![c1.clone()]);
        let shapes = circles
            .get_port()
            .to_list()
            .upcast_with(|c: Arc<Circle>| -> Arc<dyn Shape> { c });

        let added = Arc::new(Mutex::new(Vec::<Arc<dyn Shape>>::new()));
        let _obs = {
            let added = added.clone();
            shapes.add_diff_fn(move |diff| {
                if let ListDiff::Add { items, .. } = diff {
                    added.lock().unwrap().extend(items.iter().cloned());
                }
            })
        };

        circles.push(c2.clone());

        let view = shapes.get_view();
        assert_eq!(view.len(), 2);
        assert_eq!(view.to_vec().iter().map(|s| s.area()).collect::<Vec<_>>(), vec![3.0, 12.0]);

        let first = view.get(&0).unwrap();
        assert!(Arc::ptr_eq(&(c1 as Arc<dyn Shape>), &first));

        let added = added.lock().unwrap();
        assert_eq!(added.len(), 1);
        assert!(Arc::ptr_eq(&(c2 as Arc<dyn Shape>), &added[0]));
    }

    #[test]
    fn upcast_into() {
        let mut buffer = VecBuffer::<u8>::with_data(vec![1, 2]);
        let wide = buffer.get_port().to_list().upcast::<u64>();

        buffer.update(0, 200).unwrap();
        buffer.remove(1).unwrap();

        assert_eq!(wide.to_vec(), vec![200u64]);
        assert!(wide.get_view().get(&1).is_err());
    }

    #[test]
    fn upcast_with_on_delivers_through_its_dispatch() {
        let mut buffer = VecBuffer::<u8>::with_data(vec![1]);
        let (dispatch, runner) = queue_dispatch();
        let wide = buffer
            .get_port()
            .to_list()
            .upcast_with_on(|x: u8| u32::from(x) * 1000, dispatch);

        let (tx, rx) = queue_channel::<ListMsg<u32>>();
        let tx = Arc::new(tx);
        wide.add_observer(tx.clone());

        buffer.push(2);
        // reads go straight to the source
        assert_eq!(wide.to_vec(), vec![1000, 2000]);
        assert_eq!(rx.try_recv(), None);

        runner.run_pending();
        assert_eq!(
            rx.try_recv(),
            Some(vec![
                ListMsg::Diff(ListDiff::Add { items: vec![2000], idx: 1 }),
                ListMsg::LenChanged(2),
            ])
        );
    }
}
