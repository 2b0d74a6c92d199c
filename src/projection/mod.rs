
pub mod vec2list;
pub mod map_list;
pub mod upcast_list;
pub mod concat_list;
pub mod deferred_list;

use {
    crate::{
        buffer::vec::VecBuffer,
        error::ListError,
        projection::deferred_list::DeferredList,
        view::{
            dispatch::{Dispatch, Immediate},
            list::ListView,
            OuterViewPort, ViewPort,
        },
    },
    core::future::Future,
    std::sync::{Arc, RwLock},
};

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

/// Anything that can be observed as a list.
pub trait IntoListPort<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn into_list_port(self) -> OuterViewPort<dyn ListView<T>>;
}

impl<T> IntoListPort<T> for OuterViewPort<dyn ListView<T>>
where
    T: Clone + Send + Sync + 'static,
{
    fn into_list_port(self) -> OuterViewPort<dyn ListView<T>> {
        self
    }
}

impl<T> IntoListPort<T> for OuterViewPort<RwLock<Vec<T>>>
where
    T: Clone + Send + Sync + 'static,
{
    fn into_list_port(self) -> OuterViewPort<dyn ListView<T>> {
        self.to_list()
    }
}

impl<T> IntoListPort<T> for VecBuffer<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn into_list_port(self) -> OuterViewPort<dyn ListView<T>> {
        self.get_port().to_list()
    }
}

impl<T> IntoListPort<T> for &VecBuffer<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn into_list_port(self) -> OuterViewPort<dyn ListView<T>> {
        self.get_port().to_list()
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

impl<T> VecBuffer<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn to_list(&self) -> OuterViewPort<dyn ListView<T>> {
        self.get_port().to_list()
    }

    pub fn map<DstItem, F>(&self, f: F) -> OuterViewPort<dyn ListView<DstItem>>
    where
        DstItem: Clone + Send + Sync + 'static,
        F: Fn(&T) -> DstItem + Send + Sync + 'static,
    {
        self.to_list().map(f)
    }
}

impl<T> OuterViewPort<RwLock<Vec<T>>>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn map<DstItem, F>(&self, f: F) -> OuterViewPort<dyn ListView<DstItem>>
    where
        DstItem: Clone + Send + Sync + 'static,
        F: Fn(&T) -> DstItem + Send + Sync + 'static,
    {
        self.to_list().map(f)
    }

    pub fn map_on<DstItem, F>(
        &self,
        f: F,
        dispatch: Arc<dyn Dispatch>,
    ) -> OuterViewPort<dyn ListView<DstItem>>
    where
        DstItem: Clone + Send + Sync + 'static,
        F: Fn(&T) -> DstItem + Send + Sync + 'static,
    {
        self.to_list().map_on(f, dispatch)
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

/// Exposes `src` as a list, unchanged.
pub fn wrap<T, S>(src: S) -> OuterViewPort<dyn ListView<T>>
where
    T: Clone + Send + Sync + 'static,
    S: IntoListPort<T>,
{
    src.into_list_port()
}

pub fn map<T, DstItem, S, F>(src: S, f: F) -> OuterViewPort<dyn ListView<DstItem>>
where
    T: Clone + Send + Sync + 'static,
    DstItem: Clone + Send + Sync + 'static,
    S: IntoListPort<T>,
    F: Fn(&T) -> DstItem + Send + Sync + 'static,
{
    src.into_list_port().map(f)
}

pub fn upcast<T, DstItem, S>(src: S) -> OuterViewPort<dyn ListView<DstItem>>
where
    T: Clone + Send + Sync + Into<DstItem> + 'static,
    DstItem: Clone + Send + Sync + 'static,
    S: IntoListPort<T>,
{
    src.into_list_port().upcast()
}

pub fn concat<T, A, B>(first: A, second: B) -> OuterViewPort<dyn ListView<T>>
where
    T: Clone + Send + Sync + 'static,
    A: IntoListPort<T>,
    B: IntoListPort<T>,
{
    first.into_list_port().concat(&second.into_list_port())
}

/// Creates a [`DeferredList`] whose source is driven on the async-std executor.
pub fn deferred<T, F>(source: F) -> (OuterViewPort<dyn ListView<T>>, Arc<DeferredList<T>>)
where
    T: Clone + Send + Sync + 'static,
    F: Future<Output = Result<VecBuffer<T>, ListError>> + Send + 'static,
{
    deferred_on(source, Arc::new(Immediate))
}

pub fn deferred_on<T, F>(
    source: F,
    dispatch: Arc<dyn Dispatch>,
) -> (OuterViewPort<dyn ListView<T>>, Arc<DeferredList<T>>)
where
    T: Clone + Send + Sync + 'static,
    F: Future<Output = Result<VecBuffer<T>, ListError>> + Send + 'static,
{
    let port = ViewPort::with_dispatch(dispatch);
    let list = DeferredList::spawn(source, port.inner());
    (port.into_outer(), list)
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helpers_accept_buffers_and_ports() {
        let mut a = VecBuffer::with_data(vec![1, 2]);
        let b = VecBuffer::with_data(vec![3]);

        let ab = concat(&a, b.get_port());
        let labels = map(ab.clone(), |x: &i32| x.to_string());
        let same = wrap(&a);

        a.push(9);

        assert_eq!(ab.to_vec(), vec![1, 2, 9, 3]);
        assert_eq!(labels.to_vec(), vec!["1", "2", "9", "3"]);
        assert_eq!(same.to_vec(), vec![1, 2, 9]);
        assert_eq!(a.map(|x| x * 2).to_vec(), vec![2, 4, 18]);
    }

    #[test]
    fn upcast_helper() {
        let buffer = VecBuffer::with_data(vec![1u16, 2]);
        let wide = upcast::<u16, u32, _>(&buffer);
        assert_eq!(wide.to_vec(), vec![1u32, 2]);
    }
}
