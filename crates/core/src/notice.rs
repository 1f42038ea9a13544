//! User-visible notices raised by license operations

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    /// CSS class the admin UI renders the notice with
    pub fn css_class(&self) -> &'static str {
        match self {
            NoticeKind::Success => "updated",
            NoticeKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Receives notices for display. The host decides how and when to render them.
pub trait Notifier {
    fn notify(&self, notice: Notice);
}

impl<T: Notifier + ?Sized> Notifier for Box<T> {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice)
    }
}

impl<T: Notifier + ?Sized> Notifier for Rc<T> {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice)
    }
}

/// Collects notices until the host drains them.
#[derive(Debug, Default)]
pub struct NoticeLog {
    notices: RefCell<Vec<Notice>>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every queued notice, oldest first.
    pub fn drain(&self) -> Vec<Notice> {
        self.notices.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.notices.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.borrow().is_empty()
    }
}

impl Notifier for NoticeLog {
    fn notify(&self, notice: Notice) {
        self.notices.borrow_mut().push(notice);
    }
}
