
                    /*\
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
                   View
<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>
                    \*/
pub trait View: Send + Sync {
    /// Notification message for the observers
    type Msg: Send + Sync + 'static;
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

use std::sync::{Arc, RwLock};

impl<V: View + ?Sized> View for RwLock<V> {
    type Msg = V::Msg;
}

impl<V: View + ?Sized> View for Arc<V> {
    type Msg = V::Msg;
}

impl<V: View> View for Option<V> {
    type Msg = V::Msg;
}

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

pub mod channel;
pub mod dispatch;
pub mod observer;
pub mod port;

pub use {
    channel::{queue_channel, singleton_channel, ChannelReceiver, ChannelSender},
    dispatch::{queue_dispatch, Dispatch, Immediate, QueueDispatch, QueueRunner},
    observer::{NotifyFnObserver, Observer, ObserverBroadcast},
    port::{InnerViewPort, OuterViewPort, ViewPort},
};

//<<<<>>>><<>><><<>><<<*>>><<>><><<>><<<<>>>>

pub mod list;
