/// Standard card geometry, paints and strings.
pub mod card;
