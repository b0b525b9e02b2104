use std::cell::{Cell, RefCell};

use chat_types::{CompanyInfo, SessionId};
use futures::future::AbortHandle;

use crate::api::ChatTransport;
use crate::config::WidgetConfig;

/// Per-page-load client state, owned by the mounted widget.
///
/// Holds the session id attached to every request, the transport, contact
/// details learned from the back-end and the keep-alive loop handle.
pub struct ChatSession<T: ChatTransport> {
    pub id: SessionId,
    pub config: WidgetConfig,
    pub transport: T,
    company: RefCell<Option<CompanyInfo>>,
    keepalive: RefCell<Option<AbortHandle>>,
    torn_down: Cell<bool>,
}

impl<T: ChatTransport> ChatSession<T> {
    pub fn new(config: WidgetConfig, transport: T) -> Self {
        Self::with_id(SessionId::new(), config, transport)
    }

    pub fn with_id(id: SessionId, config: WidgetConfig, transport: T) -> Self {
        Self {
            id,
            config,
            transport,
            company: RefCell::new(None),
            keepalive: RefCell::new(None),
            torn_down: Cell::new(false),
        }
    }

    pub fn set_company_info(&self, info: CompanyInfo) {
        *self.company.borrow_mut() = Some(info);
    }

    pub fn fallback_message(&self) -> String {
        self.config.fallback_message(self.company.borrow().as_ref())
    }

    /// Register the running keep-alive loop. A session that is already torn
    /// down aborts it immediately.
    pub fn attach_keepalive(&self, handle: AbortHandle) {
        if self.torn_down.get() {
            handle.abort();
            return;
        }
        if let Some(previous) = self.keepalive.borrow_mut().replace(handle) {
            previous.abort();
        }
    }

    /// Stop background work. Safe to call more than once.
    pub fn teardown(&self) {
        self.torn_down.set(true);
        if let Some(handle) = self.keepalive.borrow_mut().take() {
            handle.abort();
        }
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down.get()
    }
}


#[cfg(test)]
mod tests {
    use futures::future::{AbortHandle, Abortable};

    use super::testing::ScriptedTransport;
    use super::*;

    fn session() -> ChatSession<ScriptedTransport> {
        ChatSession::with_id(
            SessionId("session-1-test".to_string()),
            WidgetConfig::default(),
            ScriptedTransport::default(),
        )
    }

    #[test]
    fn teardown_aborts_keepalive() {
        let session = session();
        let (handle, registration) = AbortHandle::new_pair();
        let task = Abortable::new(futures::future::pending::<()>(), registration);
        session.attach_keepalive(handle);

        session.teardown();
        assert!(session.is_torn_down());
        assert!(futures::executor::block_on(task).is_err());

        // Second teardown is a no-op.
        session.teardown();
    }

    #[test]
    fn keepalive_attached_after_teardown_is_aborted() {
        let session = session();
        session.teardown();

        let (handle, registration) = AbortHandle::new_pair();
        session.attach_keepalive(handle);
        let task = Abortable::new(futures::future::pending::<()>(), registration);
        assert!(futures::executor::block_on(task).is_err());
    }

    #[test]
    fn replacing_keepalive_stops_the_previous_loop() {
        let session = session();
        let (first, first_registration) = AbortHandle::new_pair();
        let (second, _second_registration) = AbortHandle::new_pair();
        session.attach_keepalive(first);
        session.attach_keepalive(second);

        let task = Abortable::new(futures::future::pending::<()>(), first_registration);
        assert!(futures::executor::block_on(task).is_err());
    }

    #[test]
    fn fallback_uses_remote_contacts_once_known() {
        let session = session();
        assert!(session.fallback_message().contains("+8613323273311"));

        session.set_company_info(CompanyInfo {
            website: Some("www.paperbagglue.com".to_string()),
            whatsapp: Some("+8600000000000".to_string()),
            email: Some("sales@paperbagglue.com".to_string()),
        });
        let text = session.fallback_message();
        assert!(text.contains("WhatsApp: +8600000000000"));
        assert!(text.contains("Email: sales@paperbagglue.com"));
    }
}
