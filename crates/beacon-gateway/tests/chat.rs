use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;

use beacon_db::Database;
use beacon_gateway::chat::ChatSession;
use beacon_gateway::dispatcher::Dispatcher;
use beacon_types::models::Identity;

fn session() -> (ChatSession, Dispatcher) {
    let db = Arc::new(Database::open_in_memory().unwrap());
    let dispatcher = Dispatcher::new();
    (ChatSession::new(db, dispatcher.clone()), dispatcher)
}

async fn next_within(
    sub: &mut beacon_gateway::chat::ChatSubscription,
) -> Option<beacon_types::models::Message> {
    tokio::time::timeout(Duration::from_secs(2), sub.next())
        .await
        .expect("timed out waiting for message")
}

#[tokio::test]
async fn history_then_live() {
    let (chat, _) = session();
    let alice = Identity::new("alice");
    let bob = Identity::new("bob");

    chat.send(&alice, "general", "first", Some(10)).await.unwrap();

    let mut sub = chat.subscribe("general").await.unwrap();
    assert_eq!(sub.channel(), "general");

    let first = next_within(&mut sub).await.unwrap();
    assert_eq!((first.sender.as_str(), first.text.as_str(), first.timestamp), ("alice", "first", 10));

    chat.send(&bob, "general", "second", None).await.unwrap();
    let second = next_within(&mut sub).await.unwrap();
    assert_eq!(second.sender, "bob");
    assert_eq!(second.text, "second");
    assert!(second.seq > first.seq);
    assert!(second.timestamp > 0);
}

#[tokio::test]
async fn other_channels_are_filtered_out() {
    let (chat, _) = session();
    let alice = Identity::new("alice");

    let mut sub = chat.subscribe("general").await.unwrap();
    chat.send(&alice, "random", "not for you", None).await.unwrap();
    chat.send(&alice, "general", "for you", None).await.unwrap();

    let message = next_within(&mut sub).await.unwrap();
    assert_eq!(message.channel, "general");
    assert_eq!(message.text, "for you");
}

#[tokio::test]
async fn no_delivery_after_unsubscribe() {
    let (chat, _) = session();
    let alice = Identity::new("alice");

    let mut sub = chat.subscribe("general").await.unwrap();
    chat.send(&alice, "general", "one", None).await.unwrap();
    assert!(next_within(&mut sub).await.is_some());

    sub.unsubscribe();
    assert!(!sub.is_active());
    chat.send(&alice, "general", "two", None).await.unwrap();
    assert!(next_within(&mut sub).await.is_none());
    // Not restartable.
    assert!(next_within(&mut sub).await.is_none());
}

#[tokio::test]
async fn cancelling_wakes_a_pending_reader() {
    let (chat, _) = session();
    let mut sub = chat.subscribe("quiet").await.unwrap();
    let cancel = sub.cancellation();

    let reader = tokio::spawn(async move { sub.next().await });
    tokio::time::sleep(Duration::from_millis(20)).await;
    cancel.cancel();

    let result = tokio::time::timeout(Duration::from_secs(2), reader)
        .await
        .unwrap()
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn dropping_releases_the_listener() {
    let (chat, dispatcher) = session();
    let sub = chat.subscribe("general").await.unwrap();
    assert_eq!(dispatcher.listener_count(), 1);
    drop(sub);
    assert_eq!(dispatcher.listener_count(), 0);
}

#[tokio::test]
async fn stream_adapter_yields_history_and_live() {
    let (chat, _) = session();
    let alice = Identity::new("alice");
    chat.send(&alice, "general", "a", None).await.unwrap();

    let stream = chat.subscribe("general").await.unwrap().into_stream();
    let mut stream = Box::pin(stream);

    chat.send(&alice, "general", "b", None).await.unwrap();

    let texts: Vec<String> = tokio::time::timeout(
        Duration::from_secs(2),
        stream.as_mut().take(2).map(|m| m.text).collect::<Vec<_>>(),
    )
    .await
    .unwrap();
    assert_eq!(texts, vec!["a", "b"]);
}

#[tokio::test]
async fn lagging_behind_other_channels_loses_nothing() {
    let (chat, _) = session();
    let alice = Identity::new("alice");

    let mut sub = chat.subscribe("quiet").await.unwrap();

    chat.send(&alice, "quiet", "important", None).await.unwrap();
    for i in 0..1100 {
        chat.send(&alice, "busy", &format!("noise {i}"), None).await.unwrap();
    }
    chat.send(&alice, "quiet", "later", None).await.unwrap();

    let first = next_within(&mut sub).await.unwrap();
    assert_eq!(first.text, "important");
    let second = next_within(&mut sub).await.unwrap();
    assert_eq!(second.text, "later");

    // The buffered live copy of "later" is not delivered again.
    chat.send(&alice, "quiet", "after", None).await.unwrap();
    let third = next_within(&mut sub).await.unwrap();
    assert_eq!(third.text, "after");
    assert!(third.seq > second.seq);
}
