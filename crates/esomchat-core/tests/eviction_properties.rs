mod common;

use common::{numbered_history, test_config, RecordingView, ScriptedTransport};
use esomchat_core::{decode_snapshot, encode_snapshot, ChatSession, MemoryStore};
use esomchat_types::{ChatError, ChatReply, WidgetConfig};
use futures::executor::block_on;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_log_bounded_for_any_exchange_sequence(
        max in 1usize..12,
        outcomes in proptest::collection::vec(any::<bool>(), 0..30),
    ) {
        let store = MemoryStore::new();
        let config = WidgetConfig { max_history_items: max, ..test_config() };
        let mut session = ChatSession::new(config, &store, RecordingView::default());
        let transport = ScriptedTransport::new();
        session.open();

        for (n, succeed) in outcomes.iter().enumerate() {
            if *succeed {
                transport.push_reply(ChatReply::new(format!("answer {}", n)));
            } else {
                transport.push_failure(ChatError::Timeout(30_000));
            }
            block_on(session.send_message(&transport, &format!("question {}", n)));

            prop_assert!(session.log().durable_len() <= max);
            prop_assert!(!session.is_busy());
        }

        if let Some(contents) = store.contents() {
            let persisted = decode_snapshot(&contents).unwrap();
            prop_assert!(persisted.len() <= max);
            if outcomes.last() == Some(&true) {
                prop_assert_eq!(persisted, session.log().snapshot());
            }
        }
    }

    #[test]
    fn prop_snapshot_is_newest_suffix(max in 2usize..12, exchanges in 1usize..20) {
        let store = MemoryStore::new();
        let config = WidgetConfig { max_history_items: max, ..test_config() };
        let mut session = ChatSession::new(config, &store, RecordingView::default());
        let transport = ScriptedTransport::new();

        let mut all = Vec::new();
        for n in 0..exchanges {
            transport.push_reply(ChatReply::new(format!("a{}", n)));
            block_on(session.send_message(&transport, &format!("q{}", n)));
            all.push(format!("q{}", n));
            all.push(format!("a{}", n));
        }

        let persisted: Vec<String> = decode_snapshot(&store.contents().unwrap())
            .unwrap()
            .into_iter()
            .map(|m| m.content)
            .collect();
        let expected = all[all.len().saturating_sub(max)..].to_vec();
        prop_assert_eq!(persisted, expected);
    }

    #[test]
    fn prop_failures_never_evict_saved_turns(
        max in 1usize..12,
        outcomes in proptest::collection::vec(any::<bool>(), 1..30),
    ) {
        let prior = numbered_history(max);
        let store = MemoryStore::with_snapshot(encode_snapshot(&prior).unwrap());
        let config = WidgetConfig { max_history_items: max, ..test_config() };
        let mut session = ChatSession::new(config, &store, RecordingView::default());
        let transport = ScriptedTransport::new();
        session.open();

        let mut durable: Vec<String> = prior.iter().map(|m| m.content.clone()).collect();
        for (n, succeed) in outcomes.iter().enumerate() {
            let expected_history = durable[durable.len().saturating_sub(max)..].to_vec();
            if *succeed {
                transport.push_reply(ChatReply::new(format!("a{}", n)));
            } else {
                transport.push_failure(ChatError::Transport("connection refused".to_string()));
            }
            block_on(session.send_message(&transport, &format!("q{}", n)));

            let sent: Vec<String> = transport.requests()[n]
                .chat_history
                .iter()
                .map(|m| m.content.clone())
                .collect();
            prop_assert_eq!(sent, expected_history);
            if *succeed {
                durable.push(format!("q{}", n));
                durable.push(format!("a{}", n));
            }
        }

        let expected = durable[durable.len().saturating_sub(max)..].to_vec();
        let persisted: Vec<String> = decode_snapshot(&store.contents().unwrap())
            .unwrap()
            .into_iter()
            .map(|m| m.content)
            .collect();
        prop_assert_eq!(persisted, expected);
    }
}
