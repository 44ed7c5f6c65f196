use order_relay_core::contract::OrderRecord;

pub trait OrderTable {
    fn put_order(&self, record: &OrderRecord) -> Result<(), String>;
}
