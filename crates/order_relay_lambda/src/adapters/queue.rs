pub trait MessageQueue {
    fn send_message(&self, body: &str) -> Result<(), String>;
}
