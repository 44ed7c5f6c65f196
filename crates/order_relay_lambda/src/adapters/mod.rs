pub mod aws;
pub mod order_table;
pub mod queue;
pub mod topic;
