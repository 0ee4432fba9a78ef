//! Test support: a scripted transport standing in for the remote services.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::future::LocalBoxFuture;
use futures::FutureExt;

use crate::transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};

enum Scripted {
    Ready(Result<HttpResponse, TransportError>),
    /// Resolves when the paired sender fires, for tests that control
    /// completion order.
    Gated(oneshot::Receiver<Result<HttpResponse, TransportError>>),
}

#[derive(Default)]
struct MockInner {
    responses: RefCell<VecDeque<Scripted>>,
    requests: RefCell<Vec<HttpRequest>>,
}

/// Pops one scripted response per executed request, recording every request
/// for later assertions. Clones share the same script and recording.
#[derive(Clone, Default)]
pub(crate) struct MockTransport {
    inner: Rc<MockInner>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_json(&self, status: u16, body: &str) {
        self.inner
            .responses
            .borrow_mut()
            .push_back(Scripted::Ready(Ok(HttpResponse {
                status,
                body: body.to_string(),
            })));
    }

    pub fn push_error(&self, message: &str) {
        self.inner
            .responses
            .borrow_mut()
            .push_back(Scripted::Ready(Err(TransportError(message.to_string()))));
    }

    /// Scripts a response that stays pending until the returned sender
    /// fires.
    pub fn push_gated(&self) -> oneshot::Sender<Result<HttpResponse, TransportError>> {
        let (tx, rx) = oneshot::channel();
        self.inner
            .responses
            .borrow_mut()
            .push_back(Scripted::Gated(rx));
        tx
    }

    pub fn request_count(&self) -> usize {
        self.inner.requests.borrow().len()
    }

    pub fn request(&self, index: usize) -> HttpRequest {
        self.inner.requests.borrow()[index].clone()
    }
}

impl HttpTransport for MockTransport {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> LocalBoxFuture<'static, Result<HttpResponse, TransportError>> {
        self.inner.requests.borrow_mut().push(request);
        let next = self.inner.responses.borrow_mut().pop_front();
        async move {
            match next {
                Some(Scripted::Ready(result)) => result,
                Some(Scripted::Gated(rx)) => rx
                    .await
                    .unwrap_or_else(|_| Err(TransportError("gate dropped".to_string()))),
                None => Err(TransportError("no scripted response left".to_string())),
            }
        }
        .boxed_local()
    }
}
