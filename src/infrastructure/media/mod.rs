pub mod prober;
pub mod thumbnail;
