use std::io;
use std::sync::{Arc, Mutex};

use super::{BoxFuture, HttpFailure, HttpRequest, HttpResponse, HttpTransport};

#[derive(Debug, Clone)]
enum FakeOutcome {
    Respond { status: u16, body: String },
    Timeout,
    Network(String),
}

/// Recording transport: never touches the network, answers every POST the same way.
#[derive(Debug, Clone)]
pub(crate) struct FakeTransport {
    state: Arc<Mutex<FakeTransportState>>,
}

#[derive(Debug)]
struct FakeTransportState {
    requests: Vec<HttpRequest>,
    outcome: FakeOutcome,
}

impl FakeTransport {
    fn with_outcome(outcome: FakeOutcome) -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeTransportState {
                requests: Vec::new(),
                outcome,
            })),
        }
    }

    pub(crate) fn respond(status: u16, body: impl Into<String>) -> Self {
        Self::with_outcome(FakeOutcome::Respond {
            status,
            body: body.into(),
        })
    }

    pub(crate) fn timeout() -> Self {
        Self::with_outcome(FakeOutcome::Timeout)
    }

    pub(crate) fn network_error(message: impl Into<String>) -> Self {
        Self::with_outcome(FakeOutcome::Network(message.into()))
    }

    pub(crate) fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    pub(crate) fn last_request(&self) -> Option<HttpRequest> {
        self.state.lock().unwrap().requests.last().cloned()
    }
}

impl HttpTransport for FakeTransport {
    fn post(&self, request: HttpRequest) -> BoxFuture<'_, Result<HttpResponse, HttpFailure>> {
        Box::pin(async move {
            let outcome = {
                let mut state = self.state.lock().unwrap();
                state.requests.push(request);
                state.outcome.clone()
            };
            match outcome {
                FakeOutcome::Respond { status, body } => Ok(HttpResponse { status, body }),
                FakeOutcome::Timeout => Err(HttpFailure::Timeout),
                FakeOutcome::Network(message) => Err(HttpFailure::Network(Box::new(
                    io::Error::new(io::ErrorKind::ConnectionReset, message),
                ))),
            }
        })
    }
}
