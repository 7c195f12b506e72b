use crate::estimator::CompletionRecord;

/// Callbacks a session reports its outcome to.
///
/// `on_complete` fires exactly once when a session completes; `on_cancel`
/// fires exactly once when it is cancelled. Never both.
pub trait SessionHooks {
    fn on_complete(&mut self, record: &CompletionRecord);

    fn on_cancel(&mut self) {}
}

/// Ignores both outcomes.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl SessionHooks for NoopHooks {
    fn on_complete(&mut self, _record: &CompletionRecord) {}
}

/// Keeps what it was told, for callers that inspect outcomes afterwards.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CollectingHooks {
    pub completed: Vec<CompletionRecord>,
    pub cancelled: usize,
}

impl SessionHooks for CollectingHooks {
    fn on_complete(&mut self, record: &CompletionRecord) {
        self.completed.push(record.clone());
    }

    fn on_cancel(&mut self) {
        self.cancelled += 1;
    }
}

impl<H: SessionHooks + ?Sized> SessionHooks for &mut H {
    fn on_complete(&mut self, record: &CompletionRecord) {
        (**self).on_complete(record);
    }

    fn on_cancel(&mut self) {
        (**self).on_cancel();
    }
}

impl<H: SessionHooks + ?Sized> SessionHooks for Box<H> {
    fn on_complete(&mut self, record: &CompletionRecord) {
        (**self).on_complete(record);
    }

    fn on_cancel(&mut self) {
        (**self).on_cancel();
    }
}

/// `None` ignores both outcomes.
impl<H: SessionHooks> SessionHooks for Option<H> {
    fn on_complete(&mut self, record: &CompletionRecord) {
        if let Some(hooks) = self {
            hooks.on_complete(record);
        }
    }

    fn on_cancel(&mut self) {
        if let Some(hooks) = self {
            hooks.on_cancel();
        }
    }
}
