mod queue;

pub use queue::Broadcast;
