// src/core/commands/hash/mod.rs

pub mod hdel;
pub mod hexists;
pub mod hget;
pub mod hgetall;
pub mod hlen;
pub mod hset;

pub use hdel::HDel;
pub use hexists::HExists;
pub use hget::HGet;
pub use hgetall::HGetAll;
pub use hlen::HLen;
pub use hset::HSet;
