/// What a `subscribe` call did to the user's record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeOutcome {
    /// First subscription: the record was created with this channel.
    Created,
    Added,
    AlreadySubscribed,
}

/// What an `unsubscribe` call did to the user's record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsubscribeOutcome {
    Removed,
    NotSubscribed,
    /// The user has never subscribed to anything.
    NoRecord,
}
