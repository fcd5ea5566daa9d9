mod time;

pub use time::time_millis;
