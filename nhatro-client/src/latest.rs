//! Latest-request tracking
//!
//! A view that refetches whenever its input changes issues a fresh ticket
//! per fetch. Issuing cancels the previous ticket, and results are only
//! committed for the most recent, uncancelled one, so a slow superseded
//! reply can never overwrite a newer one.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio_util::sync::CancellationToken;

/// Handle for one issued fetch
#[derive(Debug, Clone)]
pub struct RequestTicket {
    generation: u64,
    token: CancellationToken,
}

impl RequestTicket {
    /// Token to pass to the request
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Default)]
struct Current {
    generation: u64,
    token: Option<CancellationToken>,
}

#[derive(Debug, Default)]
pub struct LatestRequest {
    current: Mutex<Current>,
}

impl LatestRequest {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Current> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a new fetch, cancelling the one in flight
    pub fn issue(&self) -> RequestTicket {
        let mut current = self.lock();
        if let Some(previous) = current.token.take() {
            previous.cancel();
        }
        current.generation += 1;
        let token = CancellationToken::new();
        current.token = Some(token.clone());
        tracing::trace!(generation = current.generation, "Issued request ticket");
        RequestTicket {
            generation: current.generation,
            token,
        }
    }

    /// Cancel the fetch in flight (the view went away)
    pub fn cancel(&self) {
        if let Some(token) = self.lock().token.take() {
            token.cancel();
        }
    }

    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        !ticket.token.is_cancelled() && self.lock().generation == ticket.generation
    }

    /// Store `value` into `slot` if `ticket` is still current.
    /// Returns whether the value was applied.
    pub fn commit<T>(&self, ticket: &RequestTicket, value: T, slot: &mut T) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(generation = ticket.generation, "Dropping stale result");
            return false;
        }
        *slot = value;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ResourceClient;
    use crate::test_support::{MockHttpClient, StaticToken};
    use crate::transport::Transport;
    use http::StatusCode;
    use serde_json::json;
    use shared::QueryParams;
    use shared::models::Room;
    use std::sync::Arc;

    fn rooms(mock: &MockHttpClient) -> ResourceClient<Room, MockHttpClient> {
        ResourceClient::new(
            Transport::new(mock.clone(), Arc::new(StaticToken(Some("tok".into())))),
            "rooms",
        )
    }

    fn page(number: &str) -> serde_json::Value {
        json!({ "data": [{ "MaPhong": 1, "SoPhong": number, "GiaThue": 1000000 }] })
    }

    async fn wait_for_requests(mock: &MockHttpClient, count: usize) {
        while mock.requests().len() < count {
            tokio::task::yield_now().await;
        }
    }

    #[test]
    fn test_issue_cancels_previous() {
        let latest = LatestRequest::new();
        let a = latest.issue();
        let b = latest.issue();
        assert!(a.token().is_cancelled());
        assert!(!latest.is_current(&a));
        assert!(latest.is_current(&b));

        let mut slot = 0;
        assert!(!latest.commit(&a, 1, &mut slot));
        assert!(latest.commit(&b, 2, &mut slot));
        assert_eq!(slot, 2);

        latest.cancel();
        assert!(!latest.is_current(&b));
    }

    #[tokio::test]
    async fn test_stale_response_never_overwrites_newer() {
        let mock = MockHttpClient::new();
        let gate_a = mock.reply_gated(StatusCode::OK, page("A"));
        mock.reply_json(StatusCode::OK, page("B"));
        let client = rooms(&mock);
        let latest = LatestRequest::new();
        let mut displayed: Vec<Room> = Vec::new();

        let a = latest.issue();
        let request_a = {
            let client = client.clone();
            let token = a.token().clone();
            tokio::spawn(async move { client.list(QueryParams::new(), Some(&token)).await })
        };
        wait_for_requests(&mock, 1).await;

        let b = latest.issue();
        let reply_b = client.list(QueryParams::new(), Some(b.token())).await.unwrap();
        assert!(latest.commit(&b, reply_b.data.unwrap().into_items(), &mut displayed));

        let _ = gate_a.send(());
        match request_a.await.unwrap() {
            Err(err) => assert!(err.is_cancelled()),
            Ok(reply) => {
                assert!(!latest.commit(&a, reply.data.unwrap().into_items(), &mut displayed))
            }
        }
        assert_eq!(displayed.len(), 1);
        assert_eq!(displayed[0].number, "B");
    }

    #[tokio::test]
    async fn test_cancelled_fetch_is_silent() {
        let mock = MockHttpClient::new();
        let gate = mock.reply_gated(StatusCode::OK, page("A"));
        let client = rooms(&mock);
        let latest = LatestRequest::new();
        let displayed: Vec<Room> = Vec::new();

        let ticket = latest.issue();
        let request = {
            let client = client.clone();
            let token = ticket.token().clone();
            tokio::spawn(async move { client.list(QueryParams::new(), Some(&token)).await })
        };
        wait_for_requests(&mock, 1).await;
        latest.cancel();
        let _ = gate.send(());

        let err = request.await.unwrap().unwrap_err();
        assert!(err.is_cancelled());
        assert!(err.notice().is_none());
        assert!(displayed.is_empty());
    }
}
