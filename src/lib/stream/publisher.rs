use actix_web::rt;
use actix_ws::{Message, ProtocolError};
use futures::{Stream, StreamExt};
use tokio::sync::oneshot;
use tracing::*;

use crate::metrics::MetricsError;

use super::{Connection, ConnectionError, SampleProducer};

/// Why the outbound half of a stream stopped.
#[derive(Debug, thiserror::Error)]
pub enum Termination {
    #[error("Failed pushing sample: {0}")]
    PushFailed(#[source] ConnectionError),

    #[error("Failed reading metrics: {0}")]
    MetricsFailed(#[source] MetricsError),

    #[error("Failed encoding sample: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Drive one client connection until it breaks.
///
/// The inbound loop runs on its own task, the outbound loop runs here. The
/// first failure on either side ends both: the inbound loop is the one that
/// closes the connection, and it also stops once this side returns. Resolves
/// after both halves are done.
#[instrument(level = "debug", skip_all, fields(stream = producer.name()))]
pub async fn serve<C, S, P>(connection: C, inbound: S, mut producer: P) -> Termination
where
    C: Connection,
    S: Stream<Item = Result<Message, ProtocolError>> + Unpin + 'static,
    P: SampleProducer,
{
    let name = producer.name();
    info!("Starting {name} stream");

    // Dropping `alive` is how the reader learns that this side is gone
    let (alive, publisher_gone) = oneshot::channel::<()>();
    let reader = rt::spawn(
        read_loop(name, connection.clone(), inbound, publisher_gone).in_current_span(),
    );

    let termination = publish_loop(connection, &mut producer).await;
    drop(alive);

    match &termination {
        Termination::PushFailed(error) => info!("{name} stream ended: {error}"),
        other => warn!("{name} stream ended: {other}"),
    }

    if let Err(error) = reader.await {
        warn!("{name} reader task failed: {error}");
    }

    debug!("{name} stream closed");
    termination
}

async fn publish_loop<C, P>(mut connection: C, producer: &mut P) -> Termination
where
    C: Connection,
    P: SampleProducer,
{
    let name = producer.name();
    let interval = producer.interval();
    let mut sequence: i64 = 0;

    loop {
        let sample = match producer.produce(sequence) {
            Ok(sample) => sample,
            Err(error) => {
                warn!("Failed to read {name} metrics: {error}");
                return Termination::MetricsFailed(error);
            }
        };

        let message = match serde_json::to_string(&sample) {
            Ok(message) => message,
            Err(error) => return Termination::Encode(error),
        };

        if let Err(error) = connection.push(message).await {
            return Termination::PushFailed(error);
        }
        trace!("Sent {name} sample #{sequence}");

        sequence += 1;
        tokio::time::sleep(interval).await;
    }
}

async fn read_loop<C, S>(
    name: &'static str,
    mut connection: C,
    mut inbound: S,
    mut publisher_gone: oneshot::Receiver<()>,
) where
    C: Connection,
    S: Stream<Item = Result<Message, ProtocolError>> + Unpin,
{
    loop {
        tokio::select! {
            message = inbound.next() => match message {
                Some(Ok(Message::Ping(payload))) => {
                    if connection.pong(&payload).await.is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Close(reason))) => {
                    info!("{name} client closed the connection: {reason:?}");
                    break;
                }
                Some(Ok(message)) => {
                    info!("{name} received {message:?}");
                }
                Some(Err(error)) => {
                    info!("{name} receive failed: {error}");
                    break;
                }
                None => {
                    info!("{name} client went away");
                    break;
                }
            },
            _ = &mut publisher_gone => {
                debug!("{name} publisher is gone");
                break;
            }
        }
    }

    connection.close().await;
}
