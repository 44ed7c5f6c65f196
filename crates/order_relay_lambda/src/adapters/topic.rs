use order_relay_core::notification::OrderNotification;

pub trait NotificationPublisher {
    fn publish(&self, notification: &OrderNotification) -> Result<(), String>;
}
