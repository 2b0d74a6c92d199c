use {
    crate::{
        error::{check_idx, check_range, ListError},
        view::{
            dispatch::{Dispatch, Immediate},
            list::{splice_in, ListDiff, ListMsg, ListView, ListViewExt},
            Observer, ObserverBroadcast, OuterViewPort, View, ViewPort,
        },
    },
    std::sync::{Arc, RwLock},
};

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

impl<Item: Clone + Send + Sync + 'static> OuterViewPort<dyn ListView<Item>> {
    /// Maps every item through `f`.
    ///
    /// Each source item is mapped exactly once; the mapped value follows
    /// its item through moves and is only recomputed when the item is replaced.
    pub fn map<DstItem, F>(&self, f: F) -> OuterViewPort<dyn ListView<DstItem>>
    where
        DstItem: Clone + Send + Sync + 'static,
        F: Fn(&Item) -> DstItem + Send + Sync + 'static,
    {
        self.map_on(f, Arc::new(Immediate))
    }

    pub fn map_on<DstItem, F>(
        &self,
        f: F,
        dispatch: Arc<dyn Dispatch>,
    ) -> OuterViewPort<dyn ListView<DstItem>>
    where
        DstItem: Clone + Send + Sync + 'static,
        F: Fn(&Item) -> DstItem + Send + Sync + 'static,
    {
        let port = ViewPort::with_dispatch(dispatch);

        let map = Arc::new(MapListItem {
            src_view: RwLock::new(None),
            shadow: RwLock::new(Vec::new()),
            f,
            cast: port.inner().get_broadcast(),
        });

        // the reset on registration performs the initial mapping
        self.add_observer(map.clone());
        port.inner().set_view(Some(map));
        port.into_outer()
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

pub struct MapListItem<SrcItem, DstItem, F>
where
    SrcItem: Clone + Send + Sync + 'static,
    DstItem: Clone + Send + Sync + 'static,
    F: Fn(&SrcItem) -> DstItem + Send + Sync,
{
    src_view: RwLock<Option<Arc<dyn ListView<SrcItem>>>>,
    shadow: RwLock<Vec<DstItem>>,
    f: F,
    cast: Arc<ObserverBroadcast<dyn ListView<DstItem>>>,
}

impl<SrcItem, DstItem, F> MapListItem<SrcItem, DstItem, F>
where
    SrcItem: Clone + Send + Sync + 'static,
    DstItem: Clone + Send + Sync + 'static,
    F: Fn(&SrcItem) -> DstItem + Send + Sync,
{
    fn map_items(&self, items: &[SrcItem]) -> Vec<DstItem> {
        items.iter().map(&self.f).collect()
    }

    /// Maps the whole current content of the source.
    fn remap(&self) -> Vec<DstItem> {
        match &*self.src_view.read().unwrap() {
            Some(src) => src.iter().map(|item| (self.f)(&item)).collect(),
            None => Vec::new(),
        }
    }

    /// Brings the shadow in line with `diff` and returns the diff to send on.
    /// `mapped` holds the already mapped items the diff brings in.
    fn apply(
        shadow: &mut Vec<DstItem>,
        diff: &ListDiff<SrcItem>,
        mapped: Vec<DstItem>,
    ) -> Result<ListDiff<DstItem>, ListError> {
        Ok(match diff {
            ListDiff::Add { idx, .. } => {
                if *idx > shadow.len() {
                    return Err(ListError::OutOfRange {
                        idx: *idx,
                        len: shadow.len(),
                    });
                }
                splice_in(shadow, *idx, mapped.iter().cloned());
                ListDiff::Add {
                    items: mapped,
                    idx: *idx,
                }
            }
            ListDiff::Remove { items, idx } => {
                check_range(*idx, items.len(), shadow.len())?;
                ListDiff::Remove {
                    items: shadow.drain(*idx..*idx + items.len()).collect(),
                    idx: *idx,
                }
            }
            ListDiff::Replace { old_items, idx, .. } => {
                check_range(*idx, old_items.len(), shadow.len())?;
                let replaced = shadow
                    .splice(*idx..*idx + old_items.len(), mapped.iter().cloned())
                    .collect();
                ListDiff::Replace {
                    new_items: mapped,
                    old_items: replaced,
                    idx: *idx,
                }
            }
            ListDiff::Move {
                items,
                new_idx,
                old_idx,
            } => {
                check_range(*old_idx, items.len(), shadow.len())?;
                check_range(*new_idx, items.len(), shadow.len())?;
                let moved: Vec<DstItem> = shadow.drain(*old_idx..*old_idx + items.len()).collect();
                splice_in(shadow, *new_idx, moved.iter().cloned());
                ListDiff::Move {
                    items: moved,
                    new_idx: *new_idx,
                    old_idx: *old_idx,
                }
            }
            ListDiff::Reset => {
                shadow.clear();
                ListDiff::Reset
            }
        })
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

impl<SrcItem, DstItem, F> View for MapListItem<SrcItem, DstItem, F>
where
    SrcItem: Clone + Send + Sync + 'static,
    DstItem: Clone + Send + Sync + 'static,
    F: Fn(&SrcItem) -> DstItem + Send + Sync,
{
    type Msg = ListMsg<DstItem>;
}

impl<SrcItem, DstItem, F> ListView<DstItem> for MapListItem<SrcItem, DstItem, F>
where
    SrcItem: Clone + Send + Sync + 'static,
    DstItem: Clone + Send + Sync + 'static,
    F: Fn(&SrcItem) -> DstItem + Send + Sync,
{
    fn len(&self) -> usize {
        self.shadow.read().unwrap().len()
    }

    fn get(&self, idx: &usize) -> Result<DstItem, ListError> {
        let shadow = self.shadow.read().unwrap();
        check_idx(*idx, shadow.len())?;
        Ok(shadow[*idx].clone())
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

impl<SrcItem, DstItem, F> Observer<dyn ListView<SrcItem>> for MapListItem<SrcItem, DstItem, F>
where
    SrcItem: Clone + Send + Sync + 'static,
    DstItem: Clone + Send + Sync + 'static,
    F: Fn(&SrcItem) -> DstItem + Send + Sync,
{
    fn reset(&self, view: Option<Arc<dyn ListView<SrcItem>>>) {
        *self.src_view.write().unwrap() = view;
        let mapped = self.remap();
        let old = std::mem::replace(&mut *self.shadow.write().unwrap(), mapped.clone());

        // a Reset downstream means "now empty", so a new source is
        // announced as its old content leaving and its new content arriving
        if !old.is_empty() {
            self.cast.notify(&ListMsg::Diff(ListDiff::Remove { items: old, idx: 0 }));
            self.cast.notify(&ListMsg::LenChanged(0));
        }
        if !mapped.is_empty() {
            let len = mapped.len();
            self.cast.notify(&ListMsg::Diff(ListDiff::Add { items: mapped, idx: 0 }));
            self.cast.notify(&ListMsg::LenChanged(len));
        }
    }

    fn notify(&self, msg: &ListMsg<SrcItem>) {
        let diff = match msg {
            ListMsg::Diff(diff) => diff,
            // our own length signal follows the translated diff
            ListMsg::LenChanged(_) => return,
        };

        // user code never runs under the shadow lock
        let mapped = match diff {
            ListDiff::Add { items, .. } => self.map_items(items),
            ListDiff::Replace { new_items, .. } => self.map_items(new_items),
            ListDiff::Remove { .. } | ListDiff::Move { .. } | ListDiff::Reset => Vec::new(),
        };

        let (out, len) = {
            let mut shadow = self.shadow.write().unwrap();
            match Self::apply(&mut shadow, diff, mapped) {
                Ok(out) => (out, shadow.len()),
                Err(err) => {
                    tracing::error!(%err, diff = diff.name(), "source diff does not fit the mapped list");
                    panic!("mapped list is out of sync with its source: {}", err);
                }
            }
        };

        tracing::trace!(diff = out.name(), len, "mapped source diff");

        let changes_len = out.changes_len();
        self.cast.notify(&ListMsg::Diff(out));
        if changes_len {
            self.cast.notify(&ListMsg::LenChanged(len));
        }
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
