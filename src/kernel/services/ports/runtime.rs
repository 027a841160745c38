use std::future::Future;
use std::pin::Pin;

/// Future returned by collaborators that run on the single-threaded event
/// loop. Not `Send`: everything behind it lives in `Rc`s.
pub type LocalBoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;
