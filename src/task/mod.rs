// ABOUTME: Cancellable tasks and the cancellation token they share.
// ABOUTME: Cancellation is cooperative and flows from a scope down to its tasks.

mod cancellable;
mod scope;
mod token;

pub use cancellable::{CancelPolicy, CancellableTask, Cancelled};
pub use scope::TaskScope;
pub use token::CancelToken;
