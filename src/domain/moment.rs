//! Shop moments

use serde::Serialize;

/// A purchasable moment that restores life points
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Moment {
    pub id: &'static str,
    pub name: &'static str,
    pub price: u64,
    pub life_restored: u32,
}
