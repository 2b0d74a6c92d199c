use {
    crate::{
        error::{check_idx, check_range, ListError},
        view::{
            list::{splice_in, ListDiff, ListMsg},
            InnerViewPort, OuterViewPort, ViewPort,
        },
    },
    std::sync::{Arc, RwLock},
};

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

/// Observable vector.
///
/// Every mutation sends exactly one [`ListDiff`], followed by
/// [`ListMsg::LenChanged`] if the length changed.
/// Clones share the same data and port.
#[derive(Clone)]
pub struct VecBuffer<T>
where
    T: Clone + Send + Sync + 'static,
{
    data: Arc<RwLock<Vec<T>>>,
    port: InnerViewPort<RwLock<Vec<T>>>,
}

impl<T> VecBuffer<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn with_data_port(data: Vec<T>, port: InnerViewPort<RwLock<Vec<T>>>) -> Self {
        let data = Arc::new(RwLock::new(data));
        port.set_view(Some(data.clone()));
        VecBuffer { data, port }
    }

    pub fn with_data(data: Vec<T>) -> Self {
        VecBuffer::with_data_port(data, ViewPort::new().into_inner())
    }

    pub fn with_port(port: InnerViewPort<RwLock<Vec<T>>>) -> Self {
        VecBuffer::with_data_port(vec![], port)
    }

    pub fn new() -> Self {
        VecBuffer::with_port(ViewPort::new().into_inner())
    }

    pub fn get_port(&self) -> OuterViewPort<RwLock<Vec<T>>> {
        self.port.0.outer()
    }

    /// Runs `f` on the data and sends the diff it returns.
    /// The data lock is released before any observer is notified.
    fn apply(
        &mut self,
        f: impl FnOnce(&mut Vec<T>) -> Result<Option<ListDiff<T>>, ListError>,
    ) -> Result<(), ListError> {
        let (diff, len) = {
            let mut data = self.data.write().unwrap();
            (f(&mut *data)?, data.len())
        };

        if let Some(diff) = diff {
            let changes_len = diff.changes_len();
            self.port.notify(&ListMsg::Diff(diff));
            if changes_len {
                self.port.notify(&ListMsg::LenChanged(len));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.data.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, idx: usize) -> Option<T> {
        self.data.read().unwrap().get(idx).cloned()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.data.read().unwrap().clone()
    }

    pub fn clear(&mut self) {
        // a cleared vector still sends its reset
        let _ = self.apply(|data| {
            data.clear();
            Ok(Some(ListDiff::Reset))
        });
    }

    pub fn push(&mut self, val: T) {
        let _ = self.apply(|data| {
            data.push(val.clone());
            Ok(Some(ListDiff::Add {
                items: vec![val],
                idx: data.len() - 1,
            }))
        });
    }

    pub fn insert(&mut self, idx: usize, val: T) -> Result<(), ListError> {
        self.insert_many(idx, vec![val])
    }

    /// Inserts `items` at `idx` as one diff.
    pub fn insert_many(&mut self, idx: usize, items: Vec<T>) -> Result<(), ListError> {
        self.apply(|data| {
            if idx > data.len() {
                return Err(ListError::OutOfRange {
                    idx,
                    len: data.len(),
                });
            }
            if items.is_empty() {
                return Ok(None);
            }
            splice_in(data, idx, items.iter().cloned());
            Ok(Some(ListDiff::Add { items, idx }))
        })
    }

    pub fn remove(&mut self, idx: usize) -> Result<T, ListError> {
        let mut removed = None;
        self.apply(|data| {
            check_idx(idx, data.len())?;
            let val = data.remove(idx);
            removed = Some(val.clone());
            Ok(Some(ListDiff::Remove {
                items: vec![val],
                idx,
            }))
        })?;
        removed.ok_or(ListError::OutOfRange { idx, len: 0 })
    }

    /// Removes `count` items starting at `idx` as one diff.
    pub fn remove_range(&mut self, idx: usize, count: usize) -> Result<Vec<T>, ListError> {
        let mut removed = Vec::new();
        self.apply(|data| {
            check_range(idx, count, data.len())?;
            if count == 0 {
                return Ok(None);
            }
            removed = data.drain(idx..idx + count).collect();
            Ok(Some(ListDiff::Remove {
                items: removed.clone(),
                idx,
            }))
        })?;
        Ok(removed)
    }

    /// Replaces the item at `idx`, returns the replaced one.
    pub fn update(&mut self, idx: usize, val: T) -> Result<T, ListError> {
        let mut replaced = None;
        self.apply(|data| {
            check_idx(idx, data.len())?;
            let old = std::mem::replace(&mut data[idx], val.clone());
            replaced = Some(old.clone());
            Ok(Some(ListDiff::Replace {
                new_items: vec![val],
                old_items: vec![old],
                idx,
            }))
        })?;
        replaced.ok_or(ListError::OutOfRange { idx, len: 0 })
    }

    /// Moves the item at `old_idx` so that it ends up at `new_idx`.
    pub fn move_item(&mut self, old_idx: usize, new_idx: usize) -> Result<(), ListError> {
        self.apply(|data| {
            check_idx(old_idx, data.len())?;
            check_idx(new_idx, data.len())?;
            let val = data.remove(old_idx);
            data.insert(new_idx, val.clone());
            Ok(Some(ListDiff::Move {
                items: vec![val],
                new_idx,
                old_idx,
            }))
        })
    }
}

impl<T> Default for VecBuffer<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        VecBuffer::new()
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::queue_channel;

    #[test]
    fn vec_buffer_sends_one_diff_per_mutation() {
        let mut buffer = VecBuffer::new();
        let (tx, rx) = queue_channel::<ListMsg<char>>();
        let tx = Arc::new(tx);
        buffer.get_port().add_observer(tx.clone());

        buffer.push('a');
        buffer.push('b');
        buffer.push('c');
        buffer.update(1, 'x').unwrap();
        buffer.move_item(0, 2).unwrap();

        assert_eq!(buffer.to_vec(), vec!['x', 'c', 'a']);
        assert_eq!(
            rx.try_recv(),
            Some(vec![
                ListMsg::Diff(ListDiff::Add { items: vec!['a'], idx: 0 }),
                ListMsg::LenChanged(1),
                ListMsg::Diff(ListDiff::Add { items: vec!['b'], idx: 1 }),
                ListMsg::LenChanged(2),
                ListMsg::Diff(ListDiff::Add { items: vec!['c'], idx: 2 }),
                ListMsg::LenChanged(3),
                ListMsg::Diff(ListDiff::Replace {
                    new_items: vec!['x'],
                    old_items: vec!['b'],
                    idx: 1
                }),
                ListMsg::Diff(ListDiff::Move {
                    items: vec!['a'],
                    new_idx: 2,
                    old_idx: 0
                }),
            ])
        );
    }

    #[test]
    fn vec_buffer_ranges() {
        let mut buffer = VecBuffer::with_data(vec![1, 2, 3, 4, 5]);
        let (tx, rx) = queue_channel::<ListMsg<i32>>();
        let tx = Arc::new(tx);
        buffer.get_port().add_observer(tx.clone());

        assert_eq!(buffer.remove_range(1, 3), Ok(vec![2, 3, 4]));
        buffer.insert_many(1, vec![7, 8]).unwrap();
        buffer.insert_many(0, vec![]).unwrap();

        assert_eq!(buffer.to_vec(), vec![1, 7, 8, 5]);
        assert_eq!(
            rx.try_recv(),
            Some(vec![
                ListMsg::Diff(ListDiff::Remove {
                    items: vec![2, 3, 4],
                    idx: 1
                }),
                ListMsg::LenChanged(2),
                ListMsg::Diff(ListDiff::Add {
                    items: vec![7, 8],
                    idx: 1
                }),
                ListMsg::LenChanged(4),
            ])
        );
    }

    #[test]
    fn vec_buffer_rejects_bad_indices() {
        let mut buffer = VecBuffer::with_data(vec!['a']);
        let (tx, rx) = queue_channel::<ListMsg<char>>();
        let tx = Arc::new(tx);
        buffer.get_port().add_observer(tx.clone());

        assert_eq!(buffer.remove(1), Err(ListError::OutOfRange { idx: 1, len: 1 }));
        assert_eq!(buffer.insert(2, 'b'), Err(ListError::OutOfRange { idx: 2, len: 1 }));
        assert_eq!(buffer.move_item(0, 1), Err(ListError::OutOfRange { idx: 1, len: 1 }));
        assert!(buffer.remove_range(0, 2).is_err());

        assert_eq!(buffer.to_vec(), vec!['a']);
        assert_eq!(rx.try_recv(), None);
    }

    #[test]
    fn vec_buffer_clear_resets() {
        let mut buffer = VecBuffer::with_data(vec!['a', 'b']);
        let (tx, rx) = queue_channel::<ListMsg<char>>();
        let tx = Arc::new(tx);
        buffer.get_port().add_observer(tx.clone());

        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(
            rx.try_recv(),
            Some(vec![ListMsg::Diff(ListDiff::Reset), ListMsg::LenChanged(0)])
        );
    }
}
