use async_trait::async_trait;
use tracing::*;

#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("Connection is closed")]
    Closed,
}

/// Outgoing half of a message-framed client connection.
///
/// Handles are cloned between the inbound and outbound loops of a stream, so
/// every operation must tolerate the other side closing concurrently: once
/// closed, `push` and `pong` fail instead of blocking.
#[async_trait(?Send)]
pub trait Connection: Clone + 'static {
    async fn push(&mut self, text: String) -> Result<(), ConnectionError>;

    async fn pong(&mut self, payload: &[u8]) -> Result<(), ConnectionError>;

    async fn close(self);
}

#[async_trait(?Send)]
impl Connection for actix_ws::Session {
    async fn push(&mut self, text: String) -> Result<(), ConnectionError> {
        self.text(text).await.map_err(|_| ConnectionError::Closed)
    }

    async fn pong(&mut self, payload: &[u8]) -> Result<(), ConnectionError> {
        actix_ws::Session::pong(self, payload)
            .await
            .map_err(|_| ConnectionError::Closed)
    }

    async fn close(self) {
        if actix_ws::Session::close(self, None).await.is_err() {
            debug!("Session was already closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{http::header, test::TestRequest, web, FromRequest};

    use super::*;

    #[actix_web::test]
    async fn closing_one_handle_fails_the_others() {
        let (req, mut payload) = TestRequest::get()
            .insert_header((header::UPGRADE, "websocket"))
            .insert_header((header::CONNECTION, "upgrade"))
            .insert_header((header::SEC_WEBSOCKET_VERSION, "13"))
            .insert_header((header::SEC_WEBSOCKET_KEY, "dGhlIHNhbXBsZSBub25jZQ=="))
            .to_http_parts();
        let body = web::Payload::from_request(&req, &mut payload).await.unwrap();
        // The response owns the outgoing half, keep it alive
        let (_response, session, _messages) = actix_ws::handle(&req, body).unwrap();

        let mut publisher = session.clone();
        assert!(publisher.push("[0,1]".to_string()).await.is_ok());

        Connection::close(session).await;

        assert!(matches!(
            publisher.push("[1,1]".to_string()).await,
            Err(ConnectionError::Closed)
        ));
        assert!(matches!(
            Connection::pong(&mut publisher, b"late").await,
            Err(ConnectionError::Closed)
        ));
    }
}
