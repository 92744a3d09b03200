//! Closed set of domain objects a stream row can carry

use std::rc::Rc;

use super::{
    Badge, Comment, Editorial, Love, Notification, Post, Shared, User, UserAvatars,
};

/// A domain object carried by a cell item or a content event
#[derive(Debug, Clone)]
pub enum Payload {
    /// A post
    Post(Shared<Post>),
    /// A comment
    Comment(Shared<Comment>),
    /// A user
    User(Shared<User>),
    /// A love
    Love(Shared<Love>),
    /// A notification
    Notification(Shared<Notification>),
    /// An editorial card
    Editorial(Shared<Editorial>),
    /// A profile badge
    Badge(Shared<Badge>),
    /// A lovers/reposters avatar strip
    UserAvatars(Shared<UserAvatars>),
}

/// Which variant a payload is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PayloadKind {
    /// [`Payload::Post`]
    Post,
    /// [`Payload::Comment`]
    Comment,
    /// [`Payload::User`]
    User,
    /// [`Payload::Love`]
    Love,
    /// [`Payload::Notification`]
    Notification,
    /// [`Payload::Editorial`]
    Editorial,
    /// [`Payload::Badge`]
    Badge,
    /// [`Payload::UserAvatars`]
    UserAvatars,
}

/// Stable identity of a domain object: its kind plus its server ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PayloadId {
    /// Payload variant
    pub kind: PayloadKind,
    /// Server ID (or derived ID for client-side objects)
    pub id: String,
}

impl Payload {
    /// Which variant this is
    pub const fn kind(&self) -> PayloadKind {
        match self {
            Self::Post(_) => PayloadKind::Post,
            Self::Comment(_) => PayloadKind::Comment,
            Self::User(_) => PayloadKind::User,
            Self::Love(_) => PayloadKind::Love,
            Self::Notification(_) => PayloadKind::Notification,
            Self::Editorial(_) => PayloadKind::Editorial,
            Self::Badge(_) => PayloadKind::Badge,
            Self::UserAvatars(_) => PayloadKind::UserAvatars,
        }
    }

    /// Server ID of the wrapped object
    pub fn id(&self) -> String {
        match self {
            Self::Post(p) => p.borrow().id.clone(),
            Self::Comment(c) => c.borrow().id.clone(),
            Self::User(u) => u.borrow().id.clone(),
            Self::Love(l) => l.borrow().id.clone(),
            Self::Notification(n) => n.borrow().id.clone(),
            Self::Editorial(e) => e.borrow().id.clone(),
            Self::Badge(b) => b.borrow().slug.clone(),
            Self::UserAvatars(a) => a.borrow().id(),
        }
    }

    /// Stable identity used for lookups and diffing
    pub fn identity(&self) -> PayloadId {
        PayloadId {
            kind: self.kind(),
            id: self.id(),
        }
    }

    /// Whether both payloads refer to the same domain object
    pub fn is_same(&self, other: &Payload) -> bool {
        self.kind() == other.kind() && self.id() == other.id()
    }

    /// The wrapped post, if any
    pub const fn as_post(&self) -> Option<&Shared<Post>> {
        match self {
            Self::Post(p) => Some(p),
            _ => None,
        }
    }

    /// The wrapped comment, if any
    pub const fn as_comment(&self) -> Option<&Shared<Comment>> {
        match self {
            Self::Comment(c) => Some(c),
            _ => None,
        }
    }

    /// The wrapped user, if any
    pub const fn as_user(&self) -> Option<&Shared<User>> {
        match self {
            Self::User(u) => Some(u),
            _ => None,
        }
    }

    /// The wrapped avatar strip, if any
    pub const fn as_user_avatars(&self) -> Option<&Shared<UserAvatars>> {
        match self {
            Self::UserAvatars(a) => Some(a),
            _ => None,
        }
    }

    /// ID of the post this payload is, if it is a post
    pub fn post_id(&self) -> Option<String> {
        self.as_post().map(|p| p.borrow().id.clone())
    }

    /// ID of the user who authored this payload
    pub fn author_id(&self) -> Option<String> {
        match self {
            Self::Post(p) => Some(p.borrow().author_id.clone()),
            Self::Comment(c) => Some(c.borrow().author_id.clone()),
            Self::Notification(n) => n.borrow().author_id.clone(),
            Self::User(_)
            | Self::Love(_)
            | Self::Editorial(_)
            | Self::Badge(_)
            | Self::UserAvatars(_) => None,
        }
    }

    /// The resolved author of this payload
    pub fn author(&self) -> Option<Shared<User>> {
        match self {
            Self::Post(p) => p.borrow().author.clone(),
            Self::Comment(c) => c.borrow().author.clone(),
            Self::Notification(n) => n.borrow().author.clone(),
            Self::User(_)
            | Self::Love(_)
            | Self::Editorial(_)
            | Self::Badge(_)
            | Self::UserAvatars(_) => None,
        }
    }

    /// Merge a fresher copy of the same kind into this payload in place.
    ///
    /// Returns `false` (and changes nothing) when the kinds differ.
    pub fn merge_from(&self, fresh: &Payload) -> bool {
        match (self, fresh) {
            (Self::Post(a), Self::Post(b)) => {
                if !Rc::ptr_eq(a, b) {
                    a.borrow_mut().merge(&b.borrow());
                }
                true
            }
            (Self::Comment(a), Self::Comment(b)) => {
                if !Rc::ptr_eq(a, b) {
                    a.borrow_mut().merge(&b.borrow());
                }
                true
            }
            (Self::User(a), Self::User(b)) => {
                if !Rc::ptr_eq(a, b) {
                    a.borrow_mut().merge(&b.borrow());
                }
                true
            }
            (Self::Love(a), Self::Love(b)) => replace_in_place(a, b),
            (Self::Notification(a), Self::Notification(b)) => replace_in_place(a, b),
            (Self::Editorial(a), Self::Editorial(b)) => replace_in_place(a, b),
            (Self::Badge(a), Self::Badge(b)) => replace_in_place(a, b),
            (Self::UserAvatars(a), Self::UserAvatars(b)) => replace_in_place(a, b),
            _ => false,
        }
    }
}

fn replace_in_place<T: Clone>(target: &Shared<T>, fresh: &Shared<T>) -> bool {
    if !Rc::ptr_eq(target, fresh) {
        let value = fresh.borrow().clone();
        *target.borrow_mut() = value;
    }
    true
}

macro_rules! impl_from_shared {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<Shared<$ty>> for Payload {
                fn from(value: Shared<$ty>) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from_shared! {
    Post => Post,
    Comment => Comment,
    User => User,
    Love => Love,
    Notification => Notification,
    Editorial => Editorial,
    Badge => Badge,
    UserAvatars => UserAvatars,
}
