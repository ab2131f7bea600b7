// End-to-end coverage of BoundedMemoryStore as an external consumer would
// drive it: multiple conversations, role/tail filtering, and statistics.

use agentflow_core::{Message, MessageFilter, RequestContext, Role};
use agentflow_memory::{BoundedMemoryStore, MemoryStore};

#[tokio::test]
async fn statistics_count_conversations_and_messages_per_tenant() {
    let store = BoundedMemoryStore::default();
    let ctx_a1 = RequestContext::new("conv-1").with_tenant("tenant-a");
    let ctx_a2 = RequestContext::new("conv-2").with_tenant("tenant-a");
    let ctx_b1 = RequestContext::new("conv-1").with_tenant("tenant-b");

    store.add(&ctx_a1, Message::user("hi")).await.unwrap();
    store.add(&ctx_a1, Message::assistant("hello")).await.unwrap();
    store.add(&ctx_a2, Message::user("another conversation")).await.unwrap();
    store.add(&ctx_b1, Message::user("different tenant")).await.unwrap();

    let stats_a = store.statistics(&ctx_a1).await.unwrap();
    assert_eq!(stats_a.conversation_count, 2);
    assert_eq!(stats_a.message_count, 3);

    let stats_b = store.statistics(&ctx_b1).await.unwrap();
    assert_eq!(stats_b.conversation_count, 1);
    assert_eq!(stats_b.message_count, 1);
}

#[tokio::test]
async fn list_conversations_scoped_to_tenant() {
    let store = BoundedMemoryStore::default();
    let ctx_a1 = RequestContext::new("conv-1").with_tenant("tenant-a");
    let ctx_a2 = RequestContext::new("conv-2").with_tenant("tenant-a");
    let ctx_b1 = RequestContext::new("conv-1").with_tenant("tenant-b");

    store.add(&ctx_a1, Message::user("hi")).await.unwrap();
    store.add(&ctx_a2, Message::user("hi")).await.unwrap();
    store.add(&ctx_b1, Message::user("hi")).await.unwrap();

    let mut conversations = store.list_conversations(&ctx_a1).await.unwrap();
    conversations.sort();
    assert_eq!(conversations, vec!["conv-1".to_string(), "conv-2".to_string()]);

    let conversations_b = store.list_conversations(&ctx_b1).await.unwrap();
    assert_eq!(conversations_b, vec!["conv-1".to_string()]);
}

#[tokio::test]
async fn get_applies_role_and_tail_filter_on_stored_history() {
    let store = BoundedMemoryStore::default();
    let ctx = RequestContext::new("conv-1");

    store.add(&ctx, Message::system("setup")).await.unwrap();
    store.add(&ctx, Message::user("what's 2+2?")).await.unwrap();
    store.add(&ctx, Message::assistant("4")).await.unwrap();
    store.add(&ctx, Message::user("and 3+3?")).await.unwrap();
    store.add(&ctx, Message::assistant("6")).await.unwrap();

    let assistant_only = store
        .get(&ctx, MessageFilter::with_roles(vec![Role::Assistant]))
        .await
        .unwrap();
    assert_eq!(assistant_only.len(), 2);
    assert_eq!(assistant_only[0].content, "4");
    assert_eq!(assistant_only[1].content, "6");

    let last_two = store.get(&ctx, MessageFilter::tail(2)).await.unwrap();
    assert_eq!(last_two.len(), 2);
    assert_eq!(last_two[0].content, "and 3+3?");
    assert_eq!(last_two[1].content, "6");
}
