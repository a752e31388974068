//! # Transport Flows
//!
//! Client, reply listener, and a simulated peer wired together over the
//! in-memory loopback transport:
//!
//! 1. **Out-of-order replies**: the peer answers a batch in reverse order
//! 2. **Mixed outcomes**: error frames and silently dropped requests
//! 3. **Connection loss**: closing the inbound side fails every waiter

#[cfg(test)]
mod tests {
    use request_manager::transport::channel::{loopback, Loopback};
    use request_manager::{
        InboundFrame, ManagerConfig, Payload, RemoteError, ReplyListener, RequestError,
        RequestManager, RpcClient,
    };
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    struct Harness {
        client: RpcClient,
        requests: mpsc::Receiver<request_manager::OutboundFrame>,
        replies: mpsc::Sender<InboundFrame>,
        listener: tokio::task::JoinHandle<()>,
    }

    fn harness(default_timeout: Duration) -> Harness {
        rpc_telemetry::init_test_logging();

        let config = ManagerConfig::default().with_default_timeout(default_timeout);
        let manager = RequestManager::with_config(config).unwrap();
        let Loopback {
            sender,
            receiver,
            requests,
            replies,
        } = loopback(64);

        let listener = tokio::spawn(ReplyListener::new(manager.clone(), Arc::new(receiver)).run());
        let client = RpcClient::new(manager, Arc::new(sender));

        Harness {
            client,
            requests,
            replies,
            listener,
        }
    }

    // =============================================================================
    // FLOWS
    // =============================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_replies_in_reverse_order_reach_their_callers() {
        const BATCH: usize = 32;
        let Harness {
            client,
            mut requests,
            replies,
            listener,
        } = harness(Duration::from_secs(5));

        // Peer: collect the whole batch, then echo it back last-first.
        let peer = tokio::spawn(async move {
            let mut batch = Vec::with_capacity(BATCH);
            while batch.len() < BATCH {
                batch.push(requests.recv().await.unwrap());
            }
            for frame in batch.into_iter().rev() {
                rpc_telemetry::log_request_event!(debug, frame.id, "Peer echoing request");
                replies
                    .send(InboundFrame::Reply {
                        id: frame.id,
                        payload: frame.payload,
                    })
                    .await
                    .unwrap();
            }
            replies
        });

        let callers: Vec<_> = (0..BATCH)
            .map(|i| {
                let client = client.clone();
                tokio::spawn(async move {
                    let outcome = client.query("echo", Payload::utf8(format!("msg-{i}"))).await;
                    (i, outcome)
                })
            })
            .collect();

        for caller in callers {
            let (i, outcome) = caller.await.unwrap();
            assert_eq!(outcome.unwrap(), Payload::utf8(format!("msg-{i}")));
        }

        let _replies = peer.await.unwrap();
        assert_eq!(client.manager().pending_count(), 0);
        assert_eq!(client.manager().stats().fulfilled, BATCH as u64);
        listener.abort();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_error_frames_and_dropped_requests() {
        let Harness {
            client,
            mut requests,
            replies,
            listener,
        } = harness(Duration::from_millis(100));
        let manager = client.manager().clone();

        // Peer: fail "deny", ignore "drop", answer anything else; then send a
        // late reply for the ignored request once it has timed out.
        let peer = tokio::spawn(async move {
            let mut ignored = None;
            for _ in 0..3 {
                let frame = requests.recv().await.unwrap();
                let reply = match frame.name.as_deref() {
                    Some("deny") => InboundFrame::Error {
                        id: frame.id,
                        error: RemoteError::request("E_DENIED", "not allowed"),
                    },
                    Some("drop") => {
                        ignored = Some(frame.id);
                        continue;
                    }
                    _ => InboundFrame::Reply {
                        id: frame.id,
                        payload: Payload::utf8("fine"),
                    },
                };
                replies.send(reply).await.unwrap();
            }
            (ignored, replies)
        });

        let (deny, dropped, ok) = tokio::join!(
            client.query("deny", Payload::empty()),
            client.query("drop", Payload::empty()),
            client.query("ok", Payload::empty()),
        );

        assert_eq!(
            deny.unwrap_err(),
            RequestError::Remote(RemoteError::request("E_DENIED", "not allowed"))
        );
        assert!(dropped.unwrap_err().is_timeout());
        assert_eq!(ok.unwrap(), Payload::utf8("fine"));

        let (ignored, replies) = peer.await.unwrap();
        let ignored = ignored.unwrap();
        replies
            .send(InboundFrame::Reply {
                id: ignored,
                payload: Payload::utf8("too late"),
            })
            .await
            .unwrap();

        // The listener drops the late reply; wait until it has been seen.
        tokio::time::timeout(Duration::from_secs(2), async {
            while manager.stats().unmatched == 0 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();

        assert_eq!(manager.pending_count(), 0);
        assert_eq!(manager.stats().timed_out, 1);
        listener.abort();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_connection_loss_fails_waiters() {
        let Harness {
            client,
            mut requests,
            replies,
            listener,
        } = harness(Duration::from_secs(30));

        let waiters: Vec<_> = (0..4)
            .map(|_| {
                let client = client.clone();
                tokio::spawn(async move { client.query("hang", Payload::empty()).await })
            })
            .collect();

        for _ in 0..4 {
            requests.recv().await.unwrap();
        }
        drop(replies);
        listener.await.unwrap();

        for waiter in waiters {
            let err = tokio::time::timeout(Duration::from_secs(2), waiter)
                .await
                .expect("waiter not released on connection loss")
                .unwrap()
                .unwrap_err();
            assert_eq!(
                err,
                RequestError::Remote(RemoteError::transport("connection closed"))
            );
        }
        assert_eq!(client.manager().pending_count(), 0);
    }
}
