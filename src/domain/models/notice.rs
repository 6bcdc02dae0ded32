#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeType {
    Success,
    Error,
    Info,
}

/// A transient user-facing notification. Lifetime management lives in the
/// notices service; this is just the displayable record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub ntype: NoticeType,
    pub text: String,
}
