pub mod export;
pub mod progressive;
