pub mod feed;
pub mod poller;
