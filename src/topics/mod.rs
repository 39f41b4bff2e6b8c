// Topic preparation — vocabulary ranking and per-topic term extraction.

pub mod terms;
pub mod vocabulary;
