mod worth;

pub use worth::expr::{STRICTNESS_PENALTY, Worth, WorthExpr, id, lex, num, trunc};
pub use worth::merit::Merit;
pub use worth::reward::{RewardStack, RewardVec};
