use crate::{
    error::ListError,
    view::{Observer, OuterViewPort, View},
};

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

/// One atomic change of an ordered list.
///
/// Positions are always given in the coordinates of the list that sends the diff.
#[derive(Clone, Debug, PartialEq)]
pub enum ListDiff<T> {
    /// `items` were inserted at `idx`, everything behind moved right.
    Add { items: Vec<T>, idx: usize },

    /// `items` were removed from `idx`, everything behind moved left.
    Remove { items: Vec<T>, idx: usize },

    /// `old_items` starting at `idx` were exchanged for `new_items`.
    Replace {
        new_items: Vec<T>,
        old_items: Vec<T>,
        idx: usize,
    },

    /// The run `items` moved from `old_idx` to `new_idx`,
    /// where `new_idx` is its position after the move.
    Move {
        items: Vec<T>,
        new_idx: usize,
        old_idx: usize,
    },

    /// Anything may have changed, re-read the whole list.
    Reset,
}

impl<T> ListDiff<T> {
    pub fn name(&self) -> &'static str {
        match self {
            ListDiff::Add { .. } => "add",
            ListDiff::Remove { .. } => "remove",
            ListDiff::Replace { .. } => "replace",
            ListDiff::Move { .. } => "move",
            ListDiff::Reset => "reset",
        }
    }

    /// Whether receivers of this diff must also be told that the length changed.
    pub fn changes_len(&self) -> bool {
        match self {
            ListDiff::Add { .. } | ListDiff::Remove { .. } | ListDiff::Reset => true,
            ListDiff::Replace {
                new_items,
                old_items,
                ..
            } => new_items.len() != old_items.len(),
            ListDiff::Move { .. } => false,
        }
    }

    /// Moves every position of this diff by `offset`.
    pub fn shifted(self, offset: usize) -> Self {
        match self {
            ListDiff::Add { items, idx } => ListDiff::Add {
                items,
                idx: idx + offset,
            },
            ListDiff::Remove { items, idx } => ListDiff::Remove {
                items,
                idx: idx + offset,
            },
            ListDiff::Replace {
                new_items,
                old_items,
                idx,
            } => ListDiff::Replace {
                new_items,
                old_items,
                idx: idx + offset,
            },
            ListDiff::Move {
                items,
                new_idx,
                old_idx,
            } => ListDiff::Move {
                items,
                new_idx: new_idx + offset,
                old_idx: old_idx + offset,
            },
            ListDiff::Reset => ListDiff::Reset,
        }
    }

    /// Converts the carried items, keeping all positions.
    pub fn map_items<U>(&self, mut f: impl FnMut(&T) -> U) -> ListDiff<U> {
        let mut conv = |items: &Vec<T>| items.iter().map(&mut f).collect::<Vec<U>>();
        match self {
            ListDiff::Add { items, idx } => ListDiff::Add {
                items: conv(items),
                idx: *idx,
            },
            ListDiff::Remove { items, idx } => ListDiff::Remove {
                items: conv(items),
                idx: *idx,
            },
            ListDiff::Replace {
                new_items,
                old_items,
                idx,
            } => ListDiff::Replace {
                new_items: conv(new_items),
                old_items: conv(old_items),
                idx: *idx,
            },
            ListDiff::Move {
                items,
                new_idx,
                old_idx,
            } => ListDiff::Move {
                items: conv(items),
                new_idx: *new_idx,
                old_idx: *old_idx,
            },
            ListDiff::Reset => ListDiff::Reset,
        }
    }
}

impl<T: Clone> ListDiff<T> {
    /// Applies this diff to a plain vector.
    /// Fails without touching `data` if the positions do not fit.
    pub fn apply_to(&self, data: &mut Vec<T>) -> Result<(), ListError> {
        match self {
            ListDiff::Add { items, idx } => {
                if *idx > data.len() {
                    return Err(ListError::OutOfRange {
                        idx: *idx,
                        len: data.len(),
                    });
                }
                splice_in(data, *idx, items.iter().cloned());
            }
            ListDiff::Remove { items, idx } => {
                crate::error::check_range(*idx, items.len(), data.len())?;
                data.drain(*idx..*idx + items.len());
            }
            ListDiff::Replace {
                new_items,
                old_items,
                idx,
            } => {
                crate::error::check_range(*idx, old_items.len(), data.len())?;
                data.splice(*idx..*idx + old_items.len(), new_items.iter().cloned());
            }
            ListDiff::Move {
                items,
                new_idx,
                old_idx,
            } => {
                crate::error::check_range(*old_idx, items.len(), data.len())?;
                crate::error::check_range(*new_idx, items.len(), data.len())?;
                let moved: Vec<T> = data.drain(*old_idx..*old_idx + items.len()).collect();
                splice_in(data, *new_idx, moved);
            }
            ListDiff::Reset => data.clear(),
        }
        Ok(())
    }
}

/// Inserts `items` at `idx`, keeping their order.
pub(crate) fn splice_in<T>(data: &mut Vec<T>, idx: usize, items: impl IntoIterator<Item = T>) {
    let tail = data.split_off(idx);
    data.extend(items);
    data.extend(tail);
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

/// Notification message of a [`ListView`].
#[derive(Clone, Debug, PartialEq)]
pub enum ListMsg<T> {
    Diff(ListDiff<T>),

    /// The length changed, carries the new length.
    LenChanged(usize),
}

pub trait ListView<Item>: View<Msg = ListMsg<Item>>
where
    Item: Clone + Send + Sync + 'static,
{
    fn len(&self) -> usize;
    fn get(&self, idx: &usize) -> Result<Item, ListError>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

pub trait ListViewExt<T>: ListView<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn iter<'a>(&'a self) -> ListViewIter<'a, T, Self> {
        ListViewIter {
            _phantom: std::marker::PhantomData,
            view: self,
            cur: 0,
        }
    }

    fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }
}

impl<T, V: ListView<T> + ?Sized> ListViewExt<T> for V where T: Clone + Send + Sync + 'static {}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

/// Reads the view item by item, ends at the first index it cannot read.
pub struct ListViewIter<'a, T, V>
where
    T: Clone + Send + Sync + 'static,
    V: ListView<T> + ?Sized,
{
    _phantom: std::marker::PhantomData<T>,
    view: &'a V,
    cur: usize,
}

impl<'a, T, V> Iterator for ListViewIter<'a, T, V>
where
    T: Clone + Send + Sync + 'static,
    V: ListView<T> + ?Sized,
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let i = self.cur;
        self.cur += 1;
        self.view.get(&i).ok()
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

use std::sync::RwLock;
use std::{ops::Deref, sync::Arc};

impl<T> View for Vec<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Msg = ListMsg<T>;
}

impl<Item: Clone + Send + Sync + 'static, V: ListView<Item> + ?Sized> ListView<Item> for RwLock<V> {
    fn get(&self, idx: &usize) -> Result<Item, ListError> {
        self.read().unwrap().get(idx)
    }

    fn len(&self) -> usize {
        self.read().unwrap().len()
    }
}

impl<Item: Clone + Send + Sync + 'static, V: ListView<Item> + ?Sized> ListView<Item> for Arc<V> {
    fn get(&self, idx: &usize) -> Result<Item, ListError> {
        self.deref().get(idx)
    }

    fn len(&self) -> usize {
        self.deref().len()
    }
}

/// A missing view is an empty list that is not ready yet.
impl<Item: Clone + Send + Sync + 'static, V: ListView<Item>> ListView<Item> for Option<V> {
    fn get(&self, idx: &usize) -> Result<Item, ListError> {
        self.as_ref().ok_or(ListError::NotReady)?.get(idx)
    }

    fn len(&self) -> usize {
        self.as_ref().map_or(0, |v| v.len())
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

impl<T> OuterViewPort<dyn ListView<T>>
where
    T: Clone + Send + Sync + 'static,
{
    /// Subscribes `f` to the change diffs of this list.
    pub fn add_diff_fn<F: Fn(&ListDiff<T>) + Send + Sync + 'static>(
        &self,
        f: F,
    ) -> Arc<dyn Observer<dyn ListView<T>>> {
        self.add_notify_fn(move |msg: &ListMsg<T>| {
            if let ListMsg::Diff(diff) = msg {
                f(diff);
            }
        })
    }

    /// Subscribes `f` to the size-changed signal of this list.
    pub fn add_len_fn<F: Fn(usize) + Send + Sync + 'static>(
        &self,
        f: F,
    ) -> Arc<dyn Observer<dyn ListView<T>>> {
        self.add_notify_fn(move |msg: &ListMsg<T>| {
            if let ListMsg::LenChanged(len) = msg {
                f(*len);
            }
        })
    }

    /// Current length, zero while the port has no view.
    pub fn len(&self) -> usize {
        self.get_view().map_or(0, |v| v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.get_view().map(|v| v.to_vec()).unwrap_or_default()
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shifted_moves_every_position() {
        let diff = ListDiff::Move {
            items: vec!['x'],
            new_idx: 0,
            old_idx: 2,
        };
        assert_eq!(
            diff.shifted(7),
            ListDiff::Move {
                items: vec!['x'],
                new_idx: 7,
                old_idx: 9
            }
        );
        assert_eq!(ListDiff::<char>::Reset.shifted(7), ListDiff::Reset);
    }

    #[test]
    fn changes_len_rules() {
        let add = ListDiff::Add { items: vec![1], idx: 0 };
        let same_replace = ListDiff::Replace {
            new_items: vec![1],
            old_items: vec![2],
            idx: 0,
        };
        let growing_replace = ListDiff::Replace {
            new_items: vec![1, 3],
            old_items: vec![2],
            idx: 0,
        };
        let mv = ListDiff::Move {
            items: vec![1],
            new_idx: 0,
            old_idx: 1,
        };

        assert!(add.changes_len());
        assert!(!same_replace.changes_len());
        assert!(growing_replace.changes_len());
        assert!(!mv.changes_len());
        assert!(ListDiff::<i32>::Reset.changes_len());
    }

    #[test]
    fn apply_to_vec() {
        let mut data = vec!['a', 'b', 'c', 'd'];

        ListDiff::Move {
            items: vec!['a'],
            new_idx: 2,
            old_idx: 0,
        }
        .apply_to(&mut data)
        .unwrap();
        assert_eq!(data, vec!['b', 'c', 'a', 'd']);

        ListDiff::Replace {
            new_items: vec!['x', 'y'],
            old_items: vec!['c'],
            idx: 1,
        }
        .apply_to(&mut data)
        .unwrap();
        assert_eq!(data, vec!['b', 'x', 'y', 'a', 'd']);

        assert_eq!(
            ListDiff::Remove {
                items: vec!['?', '?'],
                idx: 4
            }
            .apply_to(&mut data),
            Err(ListError::OutOfRange { idx: 4, len: 5 })
        );
        assert_eq!(data.len(), 5);
    }

    #[test]
    fn missing_view_is_not_ready() {
        struct Fixed(Vec<u8>);

        impl View for Fixed {
            type Msg = ListMsg<u8>;
        }

        impl ListView<u8> for Fixed {
            fn len(&self) -> usize {
                self.0.len()
            }

            fn get(&self, idx: &usize) -> Result<u8, ListError> {
                crate::error::check_idx(*idx, self.0.len())?;
                Ok(self.0[*idx])
            }
        }

        let none: Option<Fixed> = None;
        assert_eq!(none.len(), 0);
        assert_eq!(none.get(&0), Err(ListError::NotReady));
        assert_eq!(none.to_vec(), Vec::<u8>::new());

        let some = Some(Fixed(vec![1, 2]));
        assert_eq!(some.get(&1), Ok(2));
        assert_eq!(some.get(&2), Err(ListError::OutOfRange { idx: 2, len: 2 }));
        assert_eq!(some.to_vec(), vec![1, 2]);
    }
}
