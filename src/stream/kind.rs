//! Tags used by the stream: row kinds, regions, stream contexts

/// Which visual template renders a cell item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CellKind {
    /// Marker holding an empty placeholder group's slot
    Placeholder,
    /// Author line above a post
    StreamHeader,
    /// Text region of a post (index into the post's content)
    Text(usize),
    /// Image region of a post
    Image(usize),
    /// Embedded media region of a post
    Embed(usize),
    /// Loves/comments/reposts toolbar under a post
    Footer,
    /// "Write a comment" bar
    CreateComment,
    /// Author line above a comment
    CommentHeader,
    /// Comment text
    CommentBody,
    /// "See more comments" row
    SeeMoreComments,
    /// Vertical spacing
    Spacer,
    /// Loading spinner
    Loading,
    /// "No posts yet" row
    NoPosts,
    /// Section title
    TextHeader,
    /// Profile header
    ProfileHeader,
    /// Notification row
    Notification,
    /// Badge row
    Badge,
    /// Editorial card
    Editorial,
    /// User row in a user list
    UserListItem,
    /// Lovers/reposters avatar strip
    UserAvatars,
}

impl CellKind {
    /// Post regions that disappear when their post is collapsed
    pub const fn is_collapsable(&self) -> bool {
        matches!(self, Self::Text(_) | Self::Image(_) | Self::Embed(_))
    }

    /// Structural rows that no filter may hide
    pub const fn always_show(&self) -> bool {
        matches!(self, Self::Loading | Self::Spacer)
    }

    /// Rows that render follow/mute/block state of a user
    pub const fn shows_user_relationship(&self) -> bool {
        matches!(
            self,
            Self::StreamHeader | Self::UserListItem | Self::ProfileHeader | Self::Notification
        )
    }

    /// Whether this is a placeholder marker
    pub const fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder)
    }
}

/// Named region of a stream whose contents are replaced wholesale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlaceholderGroup {
    /// Profile header rows
    ProfileHeader,
    /// Main paginated content
    StreamItems,
    /// Post detail: the post itself
    PostHeader,
    /// Post detail: lovers strip
    PostLovers,
    /// Post detail: reposters strip
    PostReposters,
    /// Post detail: spacing under the avatar strips
    PostSocialPadding,
    /// Post detail: create-comment bar
    PostCommentBar,
    /// Post detail: comments
    PostComments,
    /// Post detail: "see more comments"
    PostLoadingComments,
    /// Post detail: related posts
    PostRelatedPosts,
    /// Notifications list
    Notifications,
    /// Editorial cards
    Editorials,
    /// Badge list
    Badges,
}

/// Expanded/collapsed state of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellState {
    /// Not applicable
    #[default]
    None,
    /// Shown in full
    Expanded,
    /// Hidden behind its post's collapse affordance
    Collapsed,
}

impl CellState {
    /// The state a collapse toggle moves to
    pub const fn toggled(&self) -> Self {
        match self {
            Self::Expanded => Self::Collapsed,
            Self::Collapsed | Self::None => Self::Expanded,
        }
    }
}

/// Which screen a stream is rendering
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StreamKind {
    /// Posts from followed users
    #[default]
    Following,
    /// A user's profile stream
    UserStream {
        /// Profile owner ID
        user_id: String,
    },
    /// Posts a user loves
    UserLoves {
        /// Username of the lover
        username: String,
    },
    /// A post with its comments and related content
    PostDetail {
        /// Post ID
        post_id: String,
    },
    /// Notifications
    Notifications,
    /// The current user's blocked-users list
    BlockedUsers,
    /// The current user's muted-users list
    MutedUsers,
    /// Editorial cards
    Editorials,
}

impl StreamKind {
    /// Whether this is the detail stream of the given post
    pub fn is_detail(&self, post_id: &str) -> bool {
        matches!(self, Self::PostDetail { post_id: id } if id == post_id)
    }

    /// Display name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Following => "Following",
            Self::UserStream { .. } => "Profile",
            Self::UserLoves { .. } => "Loves",
            Self::PostDetail { .. } => "Post",
            Self::Notifications => "Notifications",
            Self::BlockedUsers => "Blocked",
            Self::MutedUsers => "Muted",
            Self::Editorials => "Editorials",
        }
    }
}

/// What happened to a domain object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentChange {
    /// Newly created
    Create,
    /// Deleted
    Delete,
    /// Fresh server state for an existing object
    Update,
    /// Rows must be rebuilt from the object
    Replaced,
    /// Love state changed
    Loved,
    /// Repost state changed
    Reposted,
    /// Comment-watching state changed
    Watching,
}
