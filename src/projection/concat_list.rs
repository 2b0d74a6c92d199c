use {
    crate::{
        error::{check_idx, ListError},
        view::{
            dispatch::{Dispatch, Immediate},
            list::{ListDiff, ListMsg, ListView, ListViewExt},
            InnerViewPort, Observer, ObserverBroadcast, OuterViewPort, View, ViewPort,
        },
    },
    std::sync::{Arc, RwLock, Weak},
};

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

impl<T: Clone + Send + Sync + 'static> OuterViewPort<dyn ListView<T>> {
    /// All items of `self` followed by all items of `other`.
    pub fn concat(&self, other: &OuterViewPort<dyn ListView<T>>) -> OuterViewPort<dyn ListView<T>> {
        self.concat_on(other, Arc::new(Immediate))
    }

    pub fn concat_on(
        &self,
        other: &OuterViewPort<dyn ListView<T>>,
        dispatch: Arc<dyn Dispatch>,
    ) -> OuterViewPort<dyn ListView<T>> {
        let port = ViewPort::with_dispatch(dispatch);
        let concat = ConcatList::new(port.inner());
        concat.observe(Operand::First, self);
        concat.observe(Operand::Second, other);
        port.into_outer()
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    First,
    Second,
}

/// Observes one operand on behalf of a [`ConcatList`].
pub struct ConcatArg<T>
where
    T: Clone + Send + Sync + 'static,
{
    operand: Operand,
    concat: Weak<ConcatList<T>>,
}

impl<T> Observer<dyn ListView<T>> for ConcatArg<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn reset(&self, view: Option<Arc<dyn ListView<T>>>) {
        if let Some(concat) = self.concat.upgrade() {
            concat.set_operand(self.operand, view);
        }
    }

    fn notify(&self, msg: &ListMsg<T>) {
        if let Some(concat) = self.concat.upgrade() {
            concat.forward(self.operand, msg);
        }
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

/// Items of both operands as announced by their diffs so far.
///
/// Offsets for the second operand and the announced length are taken
/// from here, so they agree with the diffs already sent even when an
/// operand delivers its diffs later than it changes.
struct Seen<T> {
    first: Vec<T>,
    second: Vec<T>,
}

impl<T> Seen<T> {
    fn of(&mut self, operand: Operand) -> &mut Vec<T> {
        match operand {
            Operand::First => &mut self.first,
            Operand::Second => &mut self.second,
        }
    }

    fn offset(&self, operand: Operand) -> usize {
        match operand {
            Operand::First => 0,
            Operand::Second => self.first.len(),
        }
    }

    fn len(&self) -> usize {
        self.first.len() + self.second.len()
    }
}

pub struct ConcatList<T>
where
    T: Clone + Send + Sync + 'static,
{
    first: RwLock<Option<Arc<dyn ListView<T>>>>,
    second: RwLock<Option<Arc<dyn ListView<T>>>>,
    seen: RwLock<Seen<T>>,
    cast: Arc<ObserverBroadcast<dyn ListView<T>>>,

    // sources hold their observers weakly
    args: RwLock<Vec<Arc<ConcatArg<T>>>>,
}

impl<T> ConcatList<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(port: InnerViewPort<dyn ListView<T>>) -> Arc<Self> {
        let concat = Arc::new(ConcatList {
            first: RwLock::new(None),
            second: RwLock::new(None),
            seen: RwLock::new(Seen {
                first: Vec::new(),
                second: Vec::new(),
            }),
            cast: port.get_broadcast(),
            args: RwLock::new(Vec::new()),
        });
        port.set_view(Some(concat.clone()));
        concat
    }

    /// Makes `src` the given operand of this list.
    pub fn observe(self: &Arc<Self>, operand: Operand, src: &OuterViewPort<dyn ListView<T>>) {
        let arg = Arc::new(ConcatArg {
            operand,
            concat: Arc::downgrade(self),
        });
        self.args.write().unwrap().push(arg.clone());
        src.add_observer(arg);
    }

    fn slot(&self, operand: Operand) -> &RwLock<Option<Arc<dyn ListView<T>>>> {
        match operand {
            Operand::First => &self.first,
            Operand::Second => &self.second,
        }
    }

    fn first_len(&self) -> usize {
        self.first.read().unwrap().len()
    }

    fn second_len(&self) -> usize {
        self.second.read().unwrap().len()
    }

    /// A new operand view replaces the range of the old one.
    fn set_operand(&self, operand: Operand, view: Option<Arc<dyn ListView<T>>>) {
        let items = view.to_vec();
        *self.slot(operand).write().unwrap() = view;

        let (old, offset, len) = {
            let mut seen = self.seen.write().unwrap();
            let old = std::mem::replace(seen.of(operand), items.clone());
            (old, seen.offset(operand), seen.len())
        };

        if !old.is_empty() {
            self.cast.notify(&ListMsg::Diff(ListDiff::Remove { items: old, idx: offset }));
            self.cast.notify(&ListMsg::LenChanged(len - items.len()));
        }
        if !items.is_empty() {
            self.cast.notify(&ListMsg::Diff(ListDiff::Add { items, idx: offset }));
            self.cast.notify(&ListMsg::LenChanged(len));
        }
    }

    fn forward(&self, operand: Operand, msg: &ListMsg<T>) {
        let diff = match msg {
            ListMsg::Diff(diff) => diff,
            // recomputed from both operands below
            ListMsg::LenChanged(_) => return,
        };

        let (out, len) = {
            let mut seen = self.seen.write().unwrap();
            let offset = seen.offset(operand);

            let out = match diff {
                // only the operand's own range is cleared
                ListDiff::Reset => {
                    let old = std::mem::take(seen.of(operand));
                    if seen.len() == 0 {
                        Some(ListDiff::Reset)
                    } else if old.is_empty() {
                        None
                    } else {
                        Some(ListDiff::Remove { items: old, idx: offset })
                    }
                }
                diff => {
                    if let Err(err) = diff.apply_to(seen.of(operand)) {
                        tracing::error!(%err, ?operand, diff = diff.name(), "operand diff does not fit the concatenation");
                        panic!("concatenation is out of sync with its {:?} operand: {}", operand, err);
                    }
                    Some(diff.clone().shifted(offset))
                }
            };
            (out, seen.len())
        };

        let out = match out {
            Some(out) => out,
            None => return,
        };

        tracing::trace!(?operand, diff = out.name(), len, "forwarding operand diff");

        let changes_len = out.changes_len();
        self.cast.notify(&ListMsg::Diff(out));
        if changes_len {
            self.cast.notify(&ListMsg::LenChanged(len));
        }
    }
}

impl<T> View for ConcatList<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Msg = ListMsg<T>;
}

impl<T> ListView<T> for ConcatList<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn len(&self) -> usize {
        self.first_len() + self.second_len()
    }

    fn get(&self, idx: &usize) -> Result<T, ListError> {
        let first_len = self.first_len();
        check_idx(*idx, first_len + self.second_len())?;

        if *idx < first_len {
            self.first.read().unwrap().get(idx)
        } else {
            self.second.read().unwrap().get(&(*idx - first_len))
        }
    }
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
