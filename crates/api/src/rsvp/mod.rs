pub mod respond_to_event;
mod subscribers;
