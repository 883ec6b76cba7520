#[derive(Clone, Debug, PartialEq, Eq)]
struct CounterEvent(pub usize);

#[cfg(test)]
mod tests {
    use super::CounterEvent;
    use hearth_events::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_event_flow() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe::<CounterEvent>().unwrap();

        bus.publish(CounterEvent(42)).unwrap();

        let received = rx.recv().await.unwrap();
        assert_eq!(*received, CounterEvent(42));
    }

    #[tokio::test]
    async fn test_publish_arc_avoids_clone() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe::<CounterEvent>().unwrap();

        let shared = Arc::new(CounterEvent(7));
        bus.publish_arc(shared.clone()).unwrap();

        let received = rx.recv().await.unwrap();
        assert!(Arc::ptr_eq(&received, &shared));
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_dropped() {
        let bus = EventBus::new();
        let delivered = bus.publish(CounterEvent(1)).unwrap();
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn test_multiple_subscribers_receive_same_event() {
        let bus = EventBus::new();
        let mut rx1 = bus.subscribe::<CounterEvent>().unwrap();
        let mut rx2 = bus.subscribe::<CounterEvent>().unwrap();

        let delivered = bus.publish(CounterEvent(100)).unwrap();
        assert_eq!(delivered, 2);

        assert_eq!(rx1.recv().await.unwrap().0, 100);
        assert_eq!(rx2.recv().await.unwrap().0, 100);
    }

    #[tokio::test]
    async fn test_event_types_are_isolated() {
        #[derive(Clone, Debug, PartialEq, Eq)]
        struct OtherEvent(pub usize);

        let bus = EventBus::new();
        let mut rx_counter = bus.subscribe::<CounterEvent>().unwrap();
        let mut rx_other = bus.subscribe::<OtherEvent>().unwrap();

        bus.publish(CounterEvent(7)).unwrap();
        bus.publish(OtherEvent(13)).unwrap();

        assert_eq!(rx_counter.recv().await.unwrap().0, 7);
        assert_eq!(rx_other.recv().await.unwrap().0, 13);
    }

    #[tokio::test]
    async fn test_lagged_receiver_resumes_from_retained_tail() {
        let bus = EventBus::new();
        let capacity = 2;
        let mut rx = bus.subscribe_with_capacity::<CounterEvent>(capacity).unwrap();

        let total = 100;
        for i in 0..total {
            bus.publish(CounterEvent(i)).unwrap();
        }

        // EventReceiverExt::recv absorbs the Lagged error internally. The
        // explicit call avoids the inherent broadcast recv.
        let first = EventReceiverExt::recv(&mut rx).await.expect("should recover from lag");
        assert!(
            first.0 >= total - capacity,
            "expected resume near the tail, got {}",
            first.0
        );

        let second =
            EventReceiverExt::recv(&mut rx).await.expect("should keep receiving after lag");
        assert_eq!(second.0, first.0 + 1);
    }

    #[tokio::test]
    async fn test_zero_capacity_rejected() {
        let bus = EventBus::new();
        let result = bus.subscribe_with_capacity::<CounterEvent>(0);
        assert!(matches!(result, Err(EventBusError::InvalidCapacity { .. })));
    }

    #[tokio::test]
    async fn test_watch_delivers_latest_value() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe_watch(CounterEvent(0)).unwrap();

        bus.publish_watch(CounterEvent(1)).unwrap();
        bus.publish_watch(CounterEvent(2)).unwrap();

        // Only the latest value is observable.
        let latest = rx.recv().await.unwrap();
        assert_eq!(latest.0, 2);
    }

    #[tokio::test]
    async fn test_channel_kind_mismatch() {
        let bus = EventBus::new();
        let _rx = bus.subscribe::<CounterEvent>().unwrap();

        let result = bus.publish_watch(CounterEvent(1));
        assert!(matches!(result, Err(EventBusError::ChannelKindMismatch { .. })));

        let result = bus.subscribe_watch(CounterEvent(1));
        assert!(matches!(result, Err(EventBusError::ChannelKindMismatch { .. })));
    }

    #[tokio::test]
    async fn test_shutdown_closes_all_channels() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe::<CounterEvent>().unwrap();

        let closed = bus.shutdown();
        assert_eq!(closed, 1);

        let result = EventReceiverExt::recv(&mut rx).await;
        assert!(result.is_none(), "receiver should observe channel closure");
    }
}
