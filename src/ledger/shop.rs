//! Moment shop with a weekly rotating offer

use chrono::{DateTime, Datelike, Utc, Weekday};

use super::events::LedgerEvent;
use super::weekly_reset::week_start;
use super::LedgerError;
use crate::domain::{Moment, User};
use crate::store::{run_transaction, DocumentStore};

/// Moments on offer each week
pub const OFFER_SIZE: usize = 3;

/// Every moment the shop can offer
pub static CATALOG: &[Moment] = &[
    Moment {
        id: "coffee",
        name: "Coffee with a friend",
        price: 30,
        life_restored: 10,
    },
    Moment {
        id: "nap",
        name: "Afternoon nap",
        price: 20,
        life_restored: 5,
    },
    Moment {
        id: "movie",
        name: "Movie night",
        price: 60,
        life_restored: 20,
    },
    Moment {
        id: "walk",
        name: "Walk in the park",
        price: 15,
        life_restored: 5,
    },
    Moment {
        id: "dinner",
        name: "Dinner out",
        price: 90,
        life_restored: 30,
    },
    Moment {
        id: "gaming",
        name: "Gaming session",
        price: 45,
        life_restored: 15,
    },
    Moment {
        id: "spa",
        name: "Spa day",
        price: 150,
        life_restored: 50,
    },
    Moment {
        id: "trip",
        name: "Weekend trip",
        price: 250,
        life_restored: 80,
    },
];

pub fn find_moment(id: &str) -> Option<&'static Moment> {
    CATALOG.iter().find(|m| m.id == id)
}

/// The moments on offer in the week containing `now`
pub fn weekly_offer(now: DateTime<Utc>, reset_day: Weekday) -> Vec<&'static Moment> {
    let start = week_start(now.date_naive(), reset_day);
    let week_index = i64::from(start.num_days_from_ce()).div_euclid(7);
    let first = (week_index * OFFER_SIZE as i64).rem_euclid(CATALOG.len() as i64) as usize;
    (0..OFFER_SIZE)
        .map(|i| &CATALOG[(first + i) % CATALOG.len()])
        .collect()
}

/// Buy `moment_id` for `user_id`: costs coins, restores life up to max
pub fn purchase_moment(
    store: &dyn DocumentStore,
    max_attempts: u32,
    user_id: &str,
    moment_id: &str,
    now: DateTime<Utc>,
    reset_day: Weekday,
) -> Result<Vec<LedgerEvent>, LedgerError> {
    let moment = find_moment(moment_id).ok_or_else(|| LedgerError::NotFound {
        entity: "moment",
        id: moment_id.to_string(),
    })?;
    if !weekly_offer(now, reset_day).contains(&moment) {
        return Err(LedgerError::NotOffered(moment_id.to_string()));
    }

    run_transaction(store, max_attempts, |tx| {
        let mut user: User = tx
            .get(user_id)?
            .ok_or_else(|| LedgerError::user_not_found(user_id))?;

        if user.moments_bought.iter().any(|m| m == moment.id) {
            return Err(LedgerError::AlreadyPurchased(moment.id.to_string()));
        }
        if user.coins < moment.price {
            return Err(LedgerError::InsufficientCoins {
                needed: moment.price,
                available: user.coins,
            });
        }

        let coins_before = user.coins;
        let life_before = user.current_life;
        user.coins -= moment.price;
        user.current_life = user
            .current_life
            .saturating_add(moment.life_restored)
            .min(user.max_life);
        user.moments_bought.push(moment.id.to_string());
        tx.put(&user)?;

        Ok(vec![
            LedgerEvent::CoinsChanged {
                before: coins_before,
                after: user.coins,
            },
            LedgerEvent::LifeRestored {
                amount: user.current_life - life_before,
                current: user.current_life,
            },
        ])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_offer_is_stable_within_a_week_and_rotates() {
        let monday = Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap();
        let sunday = monday + Duration::days(6);
        let next_monday = monday + Duration::days(7);

        let offer = weekly_offer(monday, Weekday::Mon);
        assert_eq!(offer.len(), OFFER_SIZE);
        assert_eq!(offer, weekly_offer(sunday, Weekday::Mon));
        assert_ne!(offer, weekly_offer(next_monday, Weekday::Mon));
    }

    #[test]
    fn test_offer_before_common_era() {
        let ancient = Utc.with_ymd_and_hms(-40, 6, 1, 0, 0, 0).unwrap();
        let offer = weekly_offer(ancient, Weekday::Mon);
        assert_eq!(offer.len(), OFFER_SIZE);
        assert!(offer.iter().all(|m| find_moment(m.id).is_some()));
    }

    #[test]
    fn test_catalog_ids_are_unique() {
        for (i, a) in CATALOG.iter().enumerate() {
            assert!(CATALOG[i + 1..].iter().all(|b| b.id != a.id));
            assert_eq!(find_moment(a.id), Some(a));
        }
    }
}
