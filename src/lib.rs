
//! Live, composable list views
//!
//! Using **livelist** you can define *Projections* of an observable list,
//! i.e. read-only lists that are derived from another list and stay
//! in sync with it while the source changes.
//! Every change is announced as one fine-grained [`ListDiff`](view::list::ListDiff)
//! (items added, removed, replaced or moved, or a reset), followed by a
//! length notification whenever the number of items changed.
//!
//! *Views* are read accessors that also define the message protocol (the diff).
//! *Observers* register at the *Port* of a view and receive its messages.
//! *Projections* are made of a target view and an observer of the source view.
//!
//! The projections provided are
//! - `to_list`: the container itself, as a list,
//! - `map`: every item transformed once and kept until it is replaced,
//! - `upcast`: every item presented as a more general type,
//! - `concat`: one list followed by another,
//! - `deferred`: a list whose container arrives asynchronously.
//!
//!# Examples
//!
//! ```
//! use livelist::buffer::vec::VecBuffer;
//! use std::sync::{Arc, Mutex};
//!
//! let mut todo = VecBuffer::with_data(vec!["wash", "cook"]);
//! let mut done = VecBuffer::new();
//!
//! let all = todo.to_list()
//!               .concat(&done.to_list())
//!               .map(|task: &&str| task.to_uppercase());
//!
//! let lengths = Arc::new(Mutex::new(Vec::new()));
//! let _observer = {
//!     let lengths = lengths.clone();
//!     all.add_len_fn(move |len| lengths.lock().unwrap().push(len))
//! };
//!
//! done.push("shop");               // appended behind the two todo items
//! let task = todo.remove(0).unwrap();
//! done.insert(0, task).unwrap();   // moved from one list into the other
//!
//! assert_eq!(all.to_vec(), vec!["COOK", "WASH", "SHOP"]);
//! assert_eq!(*lengths.lock().unwrap(), vec![3, 2, 3]);
//! ```

pub mod error;
pub mod view;
pub mod buffer;
pub mod projection;

pub use error::ListError;
