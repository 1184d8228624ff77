/// Identifies a backend request in issuance order.
///
/// Tokens are small and copyable so they can travel with a response back
/// into the event loop.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Request(pub u64);

/// Monotonic token source. The most recently issued token is the only one
/// whose response may be applied.
#[derive(Debug, Default)]
pub struct RequestSequence {
    last_issued: u64,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> Request {
        self.last_issued += 1;
        Request(self.last_issued)
    }

    pub fn latest(&self) -> Option<Request> {
        (self.last_issued > 0).then_some(Request(self.last_issued))
    }

    pub fn is_latest(&self, request: Request) -> bool {
        self.latest() == Some(request)
    }
}
