/// Identifies one streaming attempt; a new search starts a new session
pub type SessionId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SummaryStatus {
    #[default]
    Idle,
    Streaming,
    Done,
    Failed(String),
    /// No backend for the requested model; `text` holds the notice
    Unavailable,
}

/// Growing summary text owned by exactly one session at a time
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SummaryState {
    session: SessionId,
    text: String,
    status: SummaryStatus,
}

impl SummaryState {
    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn status(&self) -> &SummaryStatus {
        &self.status
    }

    pub fn is_current(&self, session: SessionId) -> bool {
        self.session == session
    }

    /// Terminal states end a session's output
    pub fn is_finished(&self) -> bool {
        matches!(
            self.status,
            SummaryStatus::Done | SummaryStatus::Failed(_) | SummaryStatus::Unavailable
        )
    }

    /// Invalidate the running session and start an empty one
    pub fn reset(&mut self) -> SessionId {
        self.session += 1;
        self.text.clear();
        self.status = SummaryStatus::Idle;
        self.session
    }

    pub fn begin(&mut self, session: SessionId) -> bool {
        if !self.is_current(session) {
            return false;
        }
        self.status = SummaryStatus::Streaming;
        true
    }

    /// Append a delta; chunks from a stale session are dropped
    pub fn append(&mut self, session: SessionId, delta: &str) -> bool {
        if !self.is_current(session) || self.is_finished() {
            return false;
        }
        self.text.push_str(delta);
        true
    }

    pub fn finish(&mut self, session: SessionId) -> bool {
        if !self.is_current(session) || self.is_finished() {
            return false;
        }
        self.status = SummaryStatus::Done;
        true
    }

    pub fn fail(&mut self, session: SessionId, reason: impl Into<String>) -> bool {
        if !self.is_current(session) || self.is_finished() {
            return false;
        }
        self.status = SummaryStatus::Failed(reason.into());
        true
    }

    pub fn set_unavailable(&mut self, session: SessionId, notice: impl Into<String>) -> bool {
        if !self.is_current(session) {
            return false;
        }
        self.text = notice.into();
        self.status = SummaryStatus::Unavailable;
        true
    }
}
