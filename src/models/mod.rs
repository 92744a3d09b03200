//! Data models for Plume
//!
//! Domain objects are held behind [`Shared`] handles: a stream can hold the
//! same post in several rows, and an in-place merge must be observed by
//! every holder.

mod avatars;
mod badge;
mod comment;
mod editorial;
mod love;
mod notification;
mod payload;
mod post;
mod user;

use std::cell::RefCell;
use std::rc::Rc;

pub use avatars::{AvatarsKind, UserAvatars};
pub use badge::Badge;
pub use comment::Comment;
pub use editorial::{Editorial, EditorialKind};
pub use love::Love;
pub use notification::{Notification, NotificationKind};
pub use payload::{Payload, PayloadId, PayloadKind};
pub use post::{Post, Region};
pub use user::{RelationshipPriority, User};

/// Shared, interior-mutable handle to a domain object
pub type Shared<T> = Rc<RefCell<T>>;

/// Wrap a value in a [`Shared`] handle
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}
